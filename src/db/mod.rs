// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod category_repository;
pub mod contact_repository;
pub mod image_repository;
pub mod rating_repository;
pub mod statistics_repository;
pub mod user_repository;
pub mod venue_repository;

pub use category_repository::*;
pub use contact_repository::*;
pub use image_repository::*;
pub use rating_repository::*;
pub use statistics_repository::*;
pub use user_repository::*;
pub use venue_repository::*;

/// Postgres unique_violation
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

/// Case-insensitive "contains" pattern for ILIKE with wildcards escaped
pub(crate) fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term.trim()))
}

pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern(" lisbon "), "%lisbon%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
