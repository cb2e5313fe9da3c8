//! Factory functions for in-memory models.
//!
//! Pure functions returning models with standard test values, for unit tests that do not
//! need a database.

use chrono::{NaiveDate, Utc};

/// Create a child model named `first_name` Johnson, born 2019-06-15.
pub fn mock_child_model(id: i32, first_name: &str) -> entity::child::Model {
    entity::child::Model {
        id,
        family_id: 1,
        first_name: first_name.to_string(),
        last_name: "Johnson".to_string(),
        birth_date: NaiveDate::from_ymd_opt(2019, 6, 15).unwrap_or_default(),
        allergies: None,
        medications: None,
        medical_notes: None,
        special_notes: None,
        active: true,
        created_at: Utc::now().naive_utc(),
    }
}
