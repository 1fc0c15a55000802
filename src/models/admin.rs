// src/models/admin.rs
// DOCUMENTATION: Admin dashboard payloads
// PURPOSE: Category management views, inline venue edits, and bulk actions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, Statistics, VenueSummary};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Categories with their venue counts
    pub categories: Vec<Category>,
    pub statistics: Statistics,
}

/// Venues of one category, active or not
#[derive(Debug, Serialize)]
pub struct CategoryVenuesResponse {
    pub category: Category,
    pub venues: Vec<VenueSummary>,
    pub search_query: Option<String>,
    pub total_venues: i64,
    pub active_venues: i64,
    pub featured_venues: i64,
    pub total_ratings: i64,
}

/// Inline status toggle on the category edit page
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateFlagsRequest {
    pub venue_id: Uuid,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Activate,
    Deactivate,
    Delete,
}

impl BulkAction {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "activate" => Some(BulkAction::Activate),
            "deactivate" => Some(BulkAction::Deactivate),
            "delete" => Some(BulkAction::Delete),
            _ => None,
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            BulkAction::Activate => "activated",
            BulkAction::Deactivate => "deactivated",
            BulkAction::Delete => "deleted",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkActionRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub venue_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct BulkActionResponse {
    pub message: String,
    pub affected: u64,
}

/// Generic confirmation body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_action_parse() {
        assert_eq!(BulkAction::parse("activate"), Some(BulkAction::Activate));
        assert_eq!(BulkAction::parse("deactivate"), Some(BulkAction::Deactivate));
        assert_eq!(BulkAction::parse("delete"), Some(BulkAction::Delete));
        assert_eq!(BulkAction::parse("Delete"), None);
        assert_eq!(BulkAction::parse(""), None);
    }

    #[test]
    fn test_flags_default_to_unchecked() {
        let req: UpdateFlagsRequest = serde_json::from_str(
            r#"{"venue_id": "6f1c2a48-8d1e-4c1a-9f5e-0a2b3c4d5e6f", "is_active": true}"#,
        )
        .unwrap();
        assert!(req.is_active);
        assert!(!req.is_featured);
    }
}
