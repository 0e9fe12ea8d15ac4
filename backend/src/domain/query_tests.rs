//! Tests for the filter → sort → paginate pipeline.

use chrono::{TimeZone, Utc};
use pagination::PageRequest;
use rstest::rstest;

use super::query::{
    SortDirection, SortField, SortSpec, UserFilters, filter_users, query, sort_users,
};
use super::{UserId, UserRecord, UserStatus};

fn record(
    id: u64,
    first: &str,
    last: &str,
    role: &str,
    status: UserStatus,
    department: Option<&str>,
    last_login_day: Option<u32>,
) -> UserRecord {
    UserRecord {
        id: UserId::from_number(id),
        first_name: first.into(),
        last_name: last.into(),
        email: format!(
            "{}.{}@example.com",
            first.to_lowercase(),
            last.to_lowercase()
        ),
        role: role.into(),
        status,
        department: department.map(Into::into),
        location: None,
        created_at: Utc
            .with_ymd_and_hms(2023, 1, u32::try_from(id).expect("small id"), 0, 0, 0)
            .single()
            .expect("valid date"),
        last_login: last_login_day.map(|day| {
            Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0)
                .single()
                .expect("valid date")
        }),
    }
}

fn fixture_records() -> Vec<UserRecord> {
    vec![
        record(1, "Carol", "Zimmer", "admin", UserStatus::Active, Some("Sales"), Some(3)),
        record(2, "alice", "Young", "user", UserStatus::Pending, None, None),
        record(3, "Bob", "adams", "manager", UserStatus::Active, Some("Sales"), Some(1)),
        record(4, "Dave", "Brown", "user", UserStatus::Inactive, Some("HR"), Some(2)),
    ]
}

fn page(page: u32, page_size: u32) -> PageRequest {
    PageRequest::new(page, page_size).expect("valid page request")
}

mod filtering {
    use super::*;

    #[rstest]
    #[case(UserFilters { search: Some("you".into()), ..UserFilters::default() }, vec![2])]
    #[case(UserFilters { search: Some("ALICE".into()), ..UserFilters::default() }, vec![2])]
    #[case(UserFilters { search: Some("example.com".into()), ..UserFilters::default() }, vec![1, 2, 3, 4])]
    #[case(UserFilters { role: Some("user".into()), ..UserFilters::default() }, vec![2, 4])]
    #[case(UserFilters { status: Some(UserStatus::Active), ..UserFilters::default() }, vec![1, 3])]
    #[case(UserFilters { department: Some("Sales".into()), ..UserFilters::default() }, vec![1, 3])]
    #[case(
        UserFilters {
            role: Some("user".into()),
            status: Some(UserStatus::Inactive),
            ..UserFilters::default()
        },
        vec![4]
    )]
    #[case(UserFilters::default(), vec![1, 2, 3, 4])]
    fn predicates_combine_with_and(#[case] filters: UserFilters, #[case] expected_ids: Vec<u64>) {
        let records = fixture_records();
        let filtered = filter_users(&records, &filters);

        let ids: Vec<u64> = filtered.iter().map(|r| r.id.as_number()).collect();
        assert_eq!(ids, expected_ids);
        // Output is always a subset satisfying every predicate.
        assert!(filtered.iter().all(|r| filters.matches(r)));
    }

    #[test]
    fn search_matches_full_name_across_the_space() {
        let records = fixture_records();
        let filters = UserFilters {
            search: Some("carol z".into()),
            ..UserFilters::default()
        };
        let filtered = filter_users(&records, &filters);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id.as_number(), 1);
    }

    #[test]
    fn department_filter_never_matches_records_without_one() {
        let records = fixture_records();
        let filters = UserFilters {
            department: Some("Sales".into()),
            ..UserFilters::default()
        };
        assert!(filter_users(&records, &filters)
            .iter()
            .all(|r| r.department.as_deref() == Some("Sales")));
    }
}

mod sorting {
    use super::*;

    fn ids(records: &[UserRecord]) -> Vec<u64> {
        records.iter().map(|r| r.id.as_number()).collect()
    }

    #[rstest]
    // Case-insensitive: "alice Young" < "Bob adams" < "Carol Zimmer" < "Dave Brown".
    #[case(SortField::Name, SortDirection::Asc, vec![2, 3, 1, 4])]
    #[case(SortField::Name, SortDirection::Desc, vec![4, 1, 3, 2])]
    #[case(SortField::FirstName, SortDirection::Asc, vec![2, 3, 1, 4])]
    #[case(SortField::LastName, SortDirection::Asc, vec![3, 4, 2, 1])]
    #[case(SortField::CreatedAt, SortDirection::Asc, vec![1, 2, 3, 4])]
    #[case(SortField::CreatedAt, SortDirection::Desc, vec![4, 3, 2, 1])]
    fn orders_by_field(
        #[case] field: SortField,
        #[case] direction: SortDirection,
        #[case] expected: Vec<u64>,
    ) {
        let sorted = sort_users(fixture_records(), SortSpec::new(field, direction));
        assert_eq!(ids(&sorted), expected);
    }

    #[test]
    fn missing_values_sort_first_ascending() {
        let sorted = sort_users(
            fixture_records(),
            SortSpec::new(SortField::LastLogin, SortDirection::Asc),
        );
        // Record 2 has no last login; present values ascend after it.
        assert_eq!(ids(&sorted), vec![2, 3, 4, 1]);
    }

    #[test]
    fn missing_values_sort_last_descending() {
        let sorted = sort_users(
            fixture_records(),
            SortSpec::new(SortField::LastLogin, SortDirection::Desc),
        );
        assert_eq!(ids(&sorted), vec![1, 4, 3, 2]);
    }

    #[test]
    fn missing_departments_follow_the_same_rule() {
        let sorted = sort_users(
            fixture_records(),
            SortSpec::new(SortField::Department, SortDirection::Asc),
        );
        assert_eq!(ids(&sorted)[0], 2);
    }

    #[test]
    fn sorting_does_not_touch_the_input_slice() {
        let records = fixture_records();
        let before = ids(&records);
        let _sorted = sort_users(records.clone(), SortSpec::new(SortField::Name, SortDirection::Asc));
        assert_eq!(ids(&records), before);
    }

    #[rstest]
    #[case("name", SortField::Name)]
    #[case("createdAt", SortField::CreatedAt)]
    #[case("lastLogin", SortField::LastLogin)]
    fn sort_field_parses_wire_names(#[case] input: &str, #[case] expected: SortField) {
        assert_eq!(input.parse::<SortField>(), Ok(expected));
    }

    #[rstest]
    #[case("nams")]
    #[case("created_at")]
    #[case("")]
    fn sort_field_rejects_unknown_names(#[case] input: &str) {
        assert!(input.parse::<SortField>().is_err());
    }

    #[test]
    fn sort_direction_parses_and_rejects() {
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert!("descending".parse::<SortDirection>().is_err());
    }
}

mod pipeline {
    use super::*;

    #[test]
    fn totals_reflect_the_filtered_set_not_the_store() {
        let records = fixture_records();
        let filters = UserFilters {
            status: Some(UserStatus::Active),
            ..UserFilters::default()
        };
        let result = query(&records, &filters, None, page(1, 1));

        assert_eq!(result.data.len(), 1);
        assert_eq!(result.pagination.total_items, 2);
        assert_eq!(result.pagination.total_pages, 2);
    }

    #[test]
    fn no_sort_preserves_input_order() {
        let records = fixture_records();
        let result = query(&records, &UserFilters::default(), None, page(1, 10));
        let ids: Vec<u64> = result.data.iter().map(|r| r.id.as_number()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn out_of_range_page_is_empty_with_correct_descriptor() {
        let records = fixture_records();
        let result = query(&records, &UserFilters::default(), None, page(9, 10));

        assert!(result.data.is_empty());
        assert_eq!(result.pagination.page, 9);
        assert_eq!(result.pagination.total_items, 4);
        assert_eq!(result.pagination.total_pages, 1);
    }

    #[test]
    fn filter_then_sort_then_paginate_compose() {
        let records = fixture_records();
        let filters = UserFilters {
            status: Some(UserStatus::Active),
            ..UserFilters::default()
        };
        let sort = Some(SortSpec::new(SortField::Name, SortDirection::Desc));
        let result = query(&records, &filters, sort, page(1, 1));

        assert_eq!(result.data.len(), 1);
        // "Carol Zimmer" > "Bob adams" case-insensitively.
        assert_eq!(result.data[0].id.as_number(), 1);
        assert_eq!(result.pagination.total_items, 2);
    }
}
