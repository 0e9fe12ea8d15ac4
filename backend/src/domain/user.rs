//! User record model and mutation payloads.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::{Error, ErrorCode};

/// Validation errors raised while constructing or validating user payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier contained non-digit characters or overflowed.
    #[error("user id must be a numeric string")]
    NonNumericId,
    /// A required field was absent or blank.
    #[error("Field '{field}' is required")]
    MissingField {
        /// Wire name of the missing field.
        field: &'static str,
    },
    /// The email did not match the `local@domain.tld` shape.
    #[error("Invalid email format")]
    InvalidEmail,
}

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        let details = match &value {
            UserValidationError::MissingField { field } => {
                json!({ "field": field, "code": "missing_field" })
            }
            UserValidationError::InvalidEmail => {
                json!({ "field": "email", "code": "invalid_email" })
            }
            UserValidationError::EmptyId | UserValidationError::NonNumericId => {
                json!({ "field": "id", "code": "invalid_id" })
            }
        };
        Self::new(ErrorCode::InvalidRequest, value.to_string()).with_details(details)
    }
}

/// Stable user identifier stored as a numeric string.
///
/// Records are numbered from 1; the directory assigns new ids as
/// `max(existing) + 1`. The numeric value is kept alongside the original
/// string so max-id computation never reparses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(u64, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Construct a [`UserId`] directly from its numeric value.
    #[must_use]
    pub fn from_number(value: u64) -> Self {
        Self(value, value.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        let parsed = id
            .parse::<u64>()
            .map_err(|_| UserValidationError::NonNumericId)?;
        Ok(Self(parsed, id))
    }

    /// Numeric value of the identifier.
    #[must_use]
    pub fn as_number(&self) -> u64 {
        self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Lifecycle status of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// The account is live.
    Active,
    /// The account has been switched off.
    Inactive,
    /// The account awaits activation.
    Pending,
}

impl UserStatus {
    /// Wire representation of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Pending => "pending",
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "pending" => Ok(Self::Pending),
            other => Err(Error::invalid_request(format!(
                "unknown status '{other}'; expected active|inactive|pending"
            ))),
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directory user record.
///
/// ## Invariants
/// - `id` and `created_at` are immutable after creation; [`UserUpdate`]
///   cannot touch them.
/// - The record store owns the authoritative instance; clients hold copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Unique numeric-string identifier.
    #[schema(value_type = String, example = "17")]
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email; shape-validated on create, uniqueness not enforced.
    pub email: String,
    /// Role identifier referencing the role catalogue.
    pub role: String,
    /// Lifecycle status.
    pub status: UserStatus,
    /// Organisational department, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Office location, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Creation instant, set by the directory.
    pub created_at: DateTime<Utc>,
    /// Most recent sign-in, if the user ever signed in.
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// `"{first} {last}"`, the synthetic field searched and sorted as `name`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // local@domain.tld with no whitespace; deliberately loose beyond that.
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Payload for creating a user. The directory assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Given name; required.
    pub first_name: String,
    /// Family name; required.
    pub last_name: String,
    /// Contact email; required, shape-validated.
    pub email: String,
    /// Role identifier; required.
    pub role: String,
    /// Lifecycle status; required, validated at runtime so a missing value
    /// reports `Field 'status' is required` like the other required fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    /// Organisational department.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Office location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl NewUser {
    /// Check required fields and the email shape.
    ///
    /// Blank-after-trim counts as missing. Fields are reported in wire
    /// order: firstName, lastName, email, role, status.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        let required: [(&'static str, &str); 4] = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("role", &self.role),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(UserValidationError::MissingField { field });
            }
        }
        if self.status.is_none() {
            return Err(UserValidationError::MissingField { field: "status" });
        }
        if !email_regex().is_match(&self.email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(())
    }

    /// Materialise the record the directory will store.
    ///
    /// Callers run [`NewUser::validate`] first, so `status` is present on
    /// every authoritative path. The only unvalidated caller is the client's
    /// speculative insert, whose record is replaced or rolled back; it falls
    /// back to [`UserStatus::Pending`].
    #[must_use]
    pub fn into_record(self, id: UserId, created_at: DateTime<Utc>) -> UserRecord {
        UserRecord {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            role: self.role,
            status: self.status.unwrap_or(UserStatus::Pending),
            department: self.department,
            location: self.location,
            created_at,
            last_login: None,
        }
    }
}

/// Partial update payload; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    /// Replacement given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Replacement family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Replacement email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Replacement role identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Replacement status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    /// Replacement department.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Replacement location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Replacement last-login instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl UserUpdate {
    /// Merge the present fields over `record`.
    ///
    /// `id` and `created_at` are not representable here, so the merge can
    /// never violate their immutability.
    pub fn apply(&self, record: &mut UserRecord) {
        if let Some(first_name) = &self.first_name {
            record.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            record.last_name = last_name.clone();
        }
        if let Some(email) = &self.email {
            record.email = email.clone();
        }
        if let Some(role) = &self.role {
            record.role = role.clone();
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(department) = &self.department {
            record.department = Some(department.clone());
        }
        if let Some(location) = &self.location {
            record.location = Some(location.clone());
        }
        if let Some(last_login) = self.last_login {
            record.last_login = Some(last_login);
        }
    }

    /// Whether the patch carries no changes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
