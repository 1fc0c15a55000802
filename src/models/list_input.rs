// src/models/list_input.rs

use serde::{Deserialize, Serialize};

/// Text list field that accepts either a JSON array or a comma-separated string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ListInput {
    Items(Vec<String>),
    Text(String),
}

impl ListInput {
    /// Trimmed entries with blanks removed
    pub fn into_list(self) -> Vec<String> {
        match self {
            ListInput::Items(items) => items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            ListInput::Text(text) => text
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl Default for ListInput {
    fn default() -> Self {
        ListInput::Items(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_separated_text() {
        let input = ListInput::Text(" WiFi, Pool ,, Parking ,".to_string());
        assert_eq!(input.into_list(), vec!["WiFi", "Pool", "Parking"]);
    }

    #[test]
    fn test_array_entries_are_trimmed() {
        let input = ListInput::Items(vec![" English ".into(), "".into(), "French".into()]);
        assert_eq!(input.into_list(), vec!["English", "French"]);
    }

    #[test]
    fn test_deserializes_both_shapes() {
        let text: ListInput = serde_json::from_str(r#""a, b""#).unwrap();
        let items: ListInput = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(text.into_list(), items.into_list());
    }

    #[test]
    fn test_blank_text_is_empty_list() {
        assert!(ListInput::Text("   ".into()).into_list().is_empty());
    }
}
