use serde::Deserialize;
use serde_json::Value;

/// One entry of a `TodoWrite` tool call's `todos` input.
///
/// Status and priority are kept as the raw wire strings so unknown
/// values still display verbatim; `status()`/`priority()` classify
/// them for styling.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoItem {
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_priority")]
    pub priority: String,
}

impl Default for TodoItem {
    fn default() -> Self {
        Self {
            content: String::new(),
            status: default_status(),
            priority: default_priority(),
        }
    }
}

fn default_status() -> String {
    "pending".to_string()
}

fn default_priority() -> String {
    "medium".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoStatus {
    Completed,
    InProgress,
    Pending,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoPriority {
    High,
    Medium,
    Low,
    Other,
}

impl TodoItem {
    pub fn status(&self) -> TodoStatus {
        match self.status.as_str() {
            "completed" => TodoStatus::Completed,
            "in_progress" => TodoStatus::InProgress,
            "pending" => TodoStatus::Pending,
            _ => TodoStatus::Other,
        }
    }

    pub fn priority(&self) -> TodoPriority {
        match self.priority.as_str() {
            "high" => TodoPriority::High,
            "medium" => TodoPriority::Medium,
            "low" => TodoPriority::Low,
            _ => TodoPriority::Other,
        }
    }
}

/// Extract todo items from a `todos` input value. Items that fail to
/// deserialize degrade to defaults instead of dropping the whole list.
pub fn parse_todos(value: &Value) -> Option<Vec<TodoItem>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .map(|item| serde_json::from_value(item.clone()).unwrap_or_default())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_todos() {
        let value = serde_json::json!([
            {"content": "write spec", "status": "completed", "priority": "high"},
            {"content": "review", "status": "in_progress", "priority": "medium"}
        ]);
        let todos = parse_todos(&value).unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].status(), TodoStatus::Completed);
        assert_eq!(todos[0].priority(), TodoPriority::High);
        assert_eq!(todos[1].content, "review");
        assert_eq!(todos[1].status(), TodoStatus::InProgress);
    }

    #[test]
    fn test_unknown_status_and_priority_kept_verbatim() {
        let value = serde_json::json!([
            {"content": "x", "status": "paused", "priority": "urgent"}
        ]);
        let todos = parse_todos(&value).unwrap();
        assert_eq!(todos[0].status, "paused");
        assert_eq!(todos[0].status(), TodoStatus::Other);
        assert_eq!(todos[0].priority, "urgent");
        assert_eq!(todos[0].priority(), TodoPriority::Other);
    }

    #[test]
    fn test_missing_fields_default() {
        let value = serde_json::json!([{}]);
        let todos = parse_todos(&value).unwrap();
        assert_eq!(todos[0].content, "");
        assert_eq!(todos[0].status(), TodoStatus::Pending);
        assert_eq!(todos[0].priority(), TodoPriority::Medium);
    }

    #[test]
    fn test_non_array_is_none() {
        assert!(parse_todos(&serde_json::json!("nope")).is_none());
        assert!(parse_todos(&serde_json::json!({"a": 1})).is_none());
    }

    #[test]
    fn test_malformed_item_degrades_to_default() {
        let value = serde_json::json!([
            {"content": "good", "status": "pending", "priority": "low"},
            "not an object"
        ]);
        let todos = parse_todos(&value).unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].priority(), TodoPriority::Low);
        assert_eq!(todos[1].status(), TodoStatus::Pending);
    }
}
