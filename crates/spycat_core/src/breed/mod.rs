//! Breed validation seam for cat creation.
//!
//! # Responsibility
//! - Define the contract the store uses to vet breeds at hiring time.
//! - Provide an in-process directory implementation for tests and local use.
//!
//! # Invariants
//! - Validation fails closed: an implementation that cannot complete its
//!   lookup must answer `false`, never guess `true`.
//! - Breed comparison is case-insensitive on trimmed names.

use std::collections::BTreeSet;

/// External capability consulted once per cat creation.
///
/// Expected to be backed by a network breed registry in production. The
/// store never retries a lookup; a single failure is a definitive "invalid".
pub trait BreedValidator {
    fn is_valid_breed(&self, name: &str) -> bool;
}

impl<V: BreedValidator + ?Sized> BreedValidator for &V {
    fn is_valid_breed(&self, name: &str) -> bool {
        (**self).is_valid_breed(name)
    }
}

/// In-process allow-list of known breeds.
///
/// Names are normalized to lowercase on insert and lookup, matching how the
/// external registry compares breed names.
#[derive(Debug, Clone, Default)]
pub struct StaticBreedDirectory {
    breeds: BTreeSet<String>,
}

impl StaticBreedDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from an iterator of breed names.
    pub fn with_breeds<I, S>(breeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut directory = Self::new();
        for breed in breeds {
            directory.insert(breed.as_ref());
        }
        directory
    }

    /// Registers one breed name.
    pub fn insert(&mut self, name: &str) {
        let normalized = normalize(name);
        if !normalized.is_empty() {
            self.breeds.insert(normalized);
        }
    }

    pub fn len(&self) -> usize {
        self.breeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breeds.is_empty()
    }
}

impl BreedValidator for StaticBreedDirectory {
    fn is_valid_breed(&self, name: &str) -> bool {
        self.breeds.contains(&normalize(name))
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
