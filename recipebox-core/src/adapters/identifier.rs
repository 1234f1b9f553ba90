//! Identifier sources

use uuid::Uuid;

use crate::ports::IdentifierSource;

/// Random UUID v4 identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdentifier;

impl IdentifierSource for RandomIdentifier {
    fn next_identifier(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Always returns the same identifier
///
/// For tests and reproducible output.
#[derive(Debug, Clone)]
pub struct FixedIdentifier(String);

impl FixedIdentifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl IdentifierSource for FixedIdentifier {
    fn next_identifier(&self) -> String {
        self.0.clone()
    }
}
