//! Query pipeline: filter, then sort, then paginate.
//!
//! Every function here is pure. The pipeline operates on a copy of the
//! records it is given and never reorders the caller's backing store.
//! Totals in the resulting envelope are computed over the filtered set.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use pagination::{PageRequest, Paginated};
use serde::{Deserialize, Serialize};

use super::{UserRecord, UserStatus};

/// Direction applied by [`sort_users`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl FromStr for SortDirection {
    type Err = UnknownSortInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(UnknownSortInput::Direction {
                input: other.to_owned(),
            }),
        }
    }
}

/// Rejection of unrecognised sort parameters.
///
/// The original implementation indexed records with the raw field name and
/// silently produced undefined comparisons for typos; unknown names are
/// rejected here instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnknownSortInput {
    /// The sort field name matched no sortable field.
    #[error("unknown sort field '{input}'")]
    Field {
        /// The rejected input.
        input: String,
    },
    /// The direction was neither `asc` nor `desc`.
    #[error("unknown sort direction '{input}'; expected asc|desc")]
    Direction {
        /// The rejected input.
        input: String,
    },
}

/// The closed set of sortable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Synthetic `"{first} {last}"` field.
    Name,
    /// Given name.
    FirstName,
    /// Family name.
    LastName,
    /// Email address.
    Email,
    /// Role identifier.
    Role,
    /// Lifecycle status.
    Status,
    /// Department, which may be absent.
    Department,
    /// Location, which may be absent.
    Location,
    /// Creation instant.
    CreatedAt,
    /// Last sign-in instant, which may be absent.
    LastLogin,
}

impl FromStr for SortField {
    type Err = UnknownSortInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "firstName" => Ok(Self::FirstName),
            "lastName" => Ok(Self::LastName),
            "email" => Ok(Self::Email),
            "role" => Ok(Self::Role),
            "status" => Ok(Self::Status),
            "department" => Ok(Self::Department),
            "location" => Ok(Self::Location),
            "createdAt" => Ok(Self::CreatedAt),
            "lastLogin" => Ok(Self::LastLogin),
            other => Err(UnknownSortInput::Field {
                input: other.to_owned(),
            }),
        }
    }
}

/// A sort field plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    /// Field to order by.
    pub field: SortField,
    /// Direction to order in.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Convenience constructor.
    #[must_use]
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Filter criteria; an absent member imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilters {
    /// Case-insensitive substring matched against full name or email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Exact role identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Exact status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    /// Exact department.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl UserFilters {
    /// Whether `record` satisfies every present predicate.
    #[must_use]
    pub fn matches(&self, record: &UserRecord) -> bool {
        if let Some(search) = &self.search {
            let term = search.to_lowercase();
            let full_name = record.full_name().to_lowercase();
            if !full_name.contains(&term) && !record.email.to_lowercase().contains(&term) {
                return false;
            }
        }
        if let Some(role) = &self.role {
            if &record.role != role {
                return false;
            }
        }
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(department) = &self.department {
            if record.department.as_ref() != Some(department) {
                return false;
            }
        }
        true
    }

    /// Whether no predicate is present.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self == &Self::default()
    }
}

/// Comparable projection of a record under one [`SortField`].
///
/// Text keys are lowercased at extraction so comparisons are
/// case-insensitive; date fields compare as instants. A field never mixes
/// variants across records.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Text(String),
    Instant(DateTime<Utc>),
}

fn sort_key(record: &UserRecord, field: SortField) -> Option<SortKey> {
    match field {
        SortField::Name => Some(SortKey::Text(record.full_name().to_lowercase())),
        SortField::FirstName => Some(SortKey::Text(record.first_name.to_lowercase())),
        SortField::LastName => Some(SortKey::Text(record.last_name.to_lowercase())),
        SortField::Email => Some(SortKey::Text(record.email.to_lowercase())),
        SortField::Role => Some(SortKey::Text(record.role.to_lowercase())),
        SortField::Status => Some(SortKey::Text(record.status.as_str().to_owned())),
        SortField::Department => record
            .department
            .as_ref()
            .map(|value| SortKey::Text(value.to_lowercase())),
        SortField::Location => record
            .location
            .as_ref()
            .map(|value| SortKey::Text(value.to_lowercase())),
        SortField::CreatedAt => Some(SortKey::Instant(record.created_at)),
        SortField::LastLogin => record.last_login.map(SortKey::Instant),
    }
}

fn compare(a: &UserRecord, b: &UserRecord, spec: SortSpec) -> Ordering {
    match (sort_key(a, spec.field), sort_key(b, spec.field)) {
        (None, None) => Ordering::Equal,
        // Missing values sort first ascending and last descending; the
        // direction is baked in here, not applied by reversal afterwards.
        (None, Some(_)) => match spec.direction {
            SortDirection::Asc => Ordering::Less,
            SortDirection::Desc => Ordering::Greater,
        },
        (Some(_), None) => match spec.direction {
            SortDirection::Asc => Ordering::Greater,
            SortDirection::Desc => Ordering::Less,
        },
        (Some(key_a), Some(key_b)) => {
            let ordering = key_a.cmp(&key_b);
            match spec.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

/// Retain the records satisfying every present predicate.
#[must_use]
pub fn filter_users(records: &[UserRecord], filters: &UserFilters) -> Vec<UserRecord> {
    records
        .iter()
        .filter(|record| filters.matches(record))
        .cloned()
        .collect()
}

/// Stable-sort a copied sequence under the given spec.
#[must_use]
pub fn sort_users(mut records: Vec<UserRecord>, spec: SortSpec) -> Vec<UserRecord> {
    records.sort_by(|a, b| compare(a, b, spec));
    records
}

/// Run the full pipeline: filter, sort, paginate, in that fixed order.
///
/// `sort = None` leaves the filtered records in input order.
#[must_use]
pub fn query(
    records: &[UserRecord],
    filters: &UserFilters,
    sort: Option<SortSpec>,
    page: PageRequest,
) -> Paginated<UserRecord> {
    let filtered = filter_users(records, filters);
    let ordered = match sort {
        Some(spec) => sort_users(filtered, spec),
        None => filtered,
    };
    Paginated::cut(ordered, page)
}
