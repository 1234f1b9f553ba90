//! Identifier source port

/// Produces fresh identifiers for generated names (e.g. upload paths)
///
/// Production code uses random UUIDs; tests substitute a fixed value so
/// generated names can be asserted exactly.
pub trait IdentifierSource: Send + Sync {
    fn next_identifier(&self) -> String;
}
