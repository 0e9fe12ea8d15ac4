//! The record store: the authoritative in-memory collection of user records.
//!
//! The store is a plain ordered sequence plus the synthetic dataset
//! generator. All locking lives in the directory adapter wrapping it; the
//! runtime model guarantees one logical operation mutates the store at a
//! time between suspension points.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::domain::role;
use crate::domain::{UserId, UserRecord, UserStatus};

/// Number of records a freshly seeded store holds.
pub const SEED_USER_COUNT: usize = 55;

const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Michael", "Emily", "David", "Sarah", "Robert", "Lisa", "William", "Emma",
    "James", "Olivia", "Daniel", "Sophia", "Matthew", "Ava", "Christopher", "Isabella", "Andrew",
    "Mia",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Jones", "Brown", "Davis", "Miller", "Wilson", "Moore",
    "Taylor", "Anderson", "Thomas", "Jackson", "White", "Harris", "Martin", "Thompson", "Garcia",
    "Martinez", "Robinson",
];

const DOMAINS: &[&str] = &[
    "example.com",
    "testmail.com",
    "mockdata.org",
    "fakecorp.net",
    "demosite.io",
];

const DEPARTMENTS: &[&str] = &["Sales", "Marketing", "Engineering", "HR", "Finance", "Support"];

const LOCATIONS: &[&str] = &[
    "New York",
    "San Francisco",
    "London",
    "Berlin",
    "Tokyo",
    "Sydney",
    "Remote",
];

const STATUSES: &[UserStatus] = &[UserStatus::Active, UserStatus::Inactive, UserStatus::Pending];

fn pick<'a, T>(rng: &mut SmallRng, items: &'a [T]) -> &'a T {
    items.choose(rng).unwrap_or_else(|| panic!("seed table must not be empty"))
}

fn synthetic_record(index: u64, rng: &mut SmallRng, now: DateTime<Utc>) -> UserRecord {
    let first_name = *pick(rng, FIRST_NAMES);
    let last_name = *pick(rng, LAST_NAMES);
    let domain = *pick(rng, DOMAINS);
    let role_id = pick(rng, role::catalogue()).id.clone();

    // Created between one and three years back.
    let created_at = now - TimeDelta::days(rng.gen_range(365..=3 * 365));
    // Roughly one in five users has never signed in.
    let last_login = if rng.gen_range(0.0..1.0) > 0.2 {
        Some(now - TimeDelta::days(rng.gen_range(0..60)))
    } else {
        None
    };

    UserRecord {
        id: UserId::from_number(index),
        first_name: first_name.into(),
        last_name: last_name.into(),
        email: format!(
            "{}.{}@{domain}",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        ),
        role: role_id,
        status: *pick(rng, STATUSES),
        department: Some((*pick(rng, DEPARTMENTS)).into()),
        location: Some((*pick(rng, LOCATIONS)).into()),
        created_at,
        last_login,
    }
}

/// Ordered, owned collection of user records.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<UserRecord>,
}

impl RecordStore {
    /// A store seeded with `count` synthetic records numbered from 1.
    #[must_use]
    pub fn seeded(count: usize, rng: &mut SmallRng, now: DateTime<Utc>) -> Self {
        let mut store = Self::default();
        store.reset(count, rng, now);
        store
    }

    /// A store holding exactly `records`, for tests.
    #[must_use]
    pub fn from_records(records: Vec<UserRecord>) -> Self {
        Self { records }
    }

    /// Discard all records and regenerate `count` synthetic ones.
    pub fn reset(&mut self, count: usize, rng: &mut SmallRng, now: DateTime<Utc>) {
        self.records = (1..=count as u64)
            .map(|index| synthetic_record(index, rng, now))
            .collect();
    }

    /// Copy of the current records, in store order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<UserRecord> {
        self.records.clone()
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Borrow a record by id.
    #[must_use]
    pub fn get(&self, id: &UserId) -> Option<&UserRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Mutably borrow a record by id.
    pub fn get_mut(&mut self, id: &UserId) -> Option<&mut UserRecord> {
        self.records.iter_mut().find(|record| &record.id == id)
    }

    /// Identifier one past the largest numeric id in the store.
    #[must_use]
    pub fn next_id(&self) -> UserId {
        let max = self
            .records
            .iter()
            .map(|record| record.id.as_number())
            .max()
            .unwrap_or(0);
        UserId::from_number(max + 1)
    }

    /// Append a record.
    pub fn push(&mut self, record: UserRecord) {
        self.records.push(record);
    }

    /// Remove and return the record with `id`, if present.
    pub fn remove(&mut self, id: &UserId) -> Option<UserRecord> {
        let position = self.records.iter().position(|record| &record.id == id)?;
        Some(self.records.remove(position))
    }
}
