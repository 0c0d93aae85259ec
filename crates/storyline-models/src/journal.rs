//! Journal entries (`GET /api/journal`, `POST /api/journal`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ids::{JournalEntryId, StoryId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub content: String,
    #[serde(default)]
    pub story_id: Option<StoryId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct CreateJournalEntryDto {
    #[validate(length(min = 1, max = 5000, message = "Entry must be 1-5000 characters"))]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_id: Option<StoryId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_with_timestamp() {
        let json = r#"{"id":"00000000-0000-0000-0000-000000000001","content":"Day one","created_at":"2026-03-01T10:00:00Z"}"#;
        let entry: JournalEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.content, "Day one");
        assert!(entry.created_at.is_some());
        assert_eq!(entry.story_id, None);
    }

    #[test]
    fn test_empty_content_rejected() {
        let dto = CreateJournalEntryDto {
            content: String::new(),
            story_id: None,
        };
        assert!(dto.validate().is_err());
    }
}
