//! Shared fixtures for the integration tests.

use std::collections::BTreeSet;

use rusty_carat::data::{Column, Dataset};

/// A small diamonds table with every category represented at least once.
pub fn diamonds() -> Dataset {
    Dataset::new(vec![
        (
            "carat".into(),
            Column::float(vec![0.23, 0.21, 0.23, 0.29, 0.31, 0.24, 0.24, 0.26, 0.22, 0.23]),
        ),
        (
            "cut".into(),
            Column::text([
                "Ideal", "Premium", "Good", "Premium", "Good", "Very Good", "Very Good",
                "Very Good", "Fair", "Very Good",
            ]),
        ),
        (
            "color".into(),
            Column::text(["E", "E", "E", "I", "J", "J", "I", "H", "E", "H"]),
        ),
        (
            "clarity".into(),
            Column::text([
                "SI2", "SI1", "VS1", "VS2", "SI2", "VVS2", "VVS1", "SI1", "VS2", "VS1",
            ]),
        ),
        (
            "price".into(),
            Column::float(vec![326.0, 326.0, 327.0, 334.0, 335.0, 336.0, 336.0, 337.0, 337.0, 338.0]),
        ),
    ])
    .expect("fixture columns line up")
}

pub fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|s| s.to_string()).collect()
}
