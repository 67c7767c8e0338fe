//! Shared fixtures for integration tests

#![allow(dead_code)]

use fake::faker::lorem::en::Word;
use fake::Fake;
use lifeguard_mav::{AttrStore, Attribute, NewAttribute, ValueType};

/// A slug that does not collide with earlier ones, even across test runs
pub fn unique_slug(n: usize) -> String {
    let word: String = Word().fake();
    let salt: u32 = (0..u32::MAX).fake();
    format!("{}_{n}_{salt}", word.to_lowercase())
}

/// Create one attribute of each value type
pub fn one_of_each<S: AttrStore + ?Sized>(store: &S) -> Vec<Attribute> {
    ValueType::ALL
        .iter()
        .enumerate()
        .map(|(n, value_type)| {
            store
                .create_attribute(NewAttribute::new(unique_slug(n), *value_type))
                .expect("create attribute")
        })
        .collect()
}

/// Database URL for PostgreSQL tests, `None` skips them
pub fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL") {
        Ok(url) if !url.is_empty() => Some(url),
        _ => {
            eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL test");
            None
        }
    }
}
