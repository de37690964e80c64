//! Domain models for Yardline.
//!
//! These are the core types shared across all crates.

pub mod alert;
pub mod equipment;
pub mod notification;
pub mod onboarding;
pub mod profile;
pub mod project;
pub mod tenant;
pub mod user;
pub mod webhook;

/// Serde adapter for `Option<Option<T>>` patch fields: an absent key
/// is `None`, an explicit `null` is `Some(None)`.
pub mod nullable {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
