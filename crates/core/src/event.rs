use serde::Deserialize;
use serde_json::Value;

/// One decoded line of the transcript stream.
///
/// The stream is a loose, evolving convention rather than a versioned
/// schema, so every field is optional and defaults to an empty value.
/// Shape-dependent behavior lives in the accessor methods below instead
/// of ad-hoc JSON lookups at the call sites.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Event {
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub tools: Option<Vec<Value>>,
    #[serde(default)]
    pub result: Option<Value>,
}

/// Classification of the `type` field. Unknown strings map to `Other`
/// and still render generically under their own name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    System,
    User,
    Assistant,
    ToolResult,
    Result,
    Other,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self.event_type.as_str() {
            "system" => EventKind::System,
            "user" => EventKind::User,
            "assistant" => EventKind::Assistant,
            "tool_result" => EventKind::ToolResult,
            "result" => EventKind::Result,
            _ => EventKind::Other,
        }
    }

    pub fn content_items(&self) -> &[ContentItem] {
        self.message
            .as_ref()
            .and_then(|m| m.content.as_ref())
            .map(MessageContent::items)
            .unwrap_or(&[])
    }

    pub fn first_content_item(&self) -> Option<&ContentItem> {
        self.content_items().first()
    }

    /// The first content item of an assistant message when it names a tool.
    pub fn tool_use(&self) -> Option<&ContentItem> {
        if self.kind() != EventKind::Assistant {
            return None;
        }
        self.first_content_item().filter(|item| item.name.is_some())
    }

    /// Tool-call identifier of an assistant message. Pairing keys on
    /// the id alone; a tool name is not required.
    pub fn call_id(&self) -> Option<&str> {
        if self.kind() != EventKind::Assistant {
            return None;
        }
        self.first_content_item()
            .and_then(|item| item.id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// The first content item of a user message when it is a tool result.
    pub fn tool_result(&self) -> Option<&ContentItem> {
        if self.kind() != EventKind::User {
            return None;
        }
        self.first_content_item().filter(|item| item.is_tool_result())
    }

    /// Text of the first content item declared as `text`. Items of
    /// other types are skipped even when they carry a `text` field.
    pub fn text_content(&self) -> Option<&str> {
        self.content_items()
            .iter()
            .find(|item| item.item_type.as_deref() == Some("text"))
            .and_then(|item| item.text.as_deref())
    }

    /// String `output` field, ignored when the value is not a string.
    pub fn output_str(&self) -> Option<&str> {
        self.output.as_ref().and_then(Value::as_str)
    }

    /// The `result` payload as display text: strings pass through
    /// verbatim, anything else is serialized as JSON.
    pub fn result_text(&self) -> Option<String> {
        self.result.as_ref().map(value_to_text)
    }

    pub fn usage(&self) -> Option<&Usage> {
        self.message.as_ref().and_then(|m| m.usage.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub content: Option<MessageContent>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// Message content arrives either as a plain string or as an ordered
/// list of content items; anything else is kept but treated as empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Items(Vec<ContentItem>),
    Other(Value),
}

impl MessageContent {
    pub fn items(&self) -> &[ContentItem] {
        match self {
            MessageContent::Items(items) => items,
            _ => &[],
        }
    }

    /// Number of content items, counting a bare string as one.
    pub fn len(&self) -> usize {
        match self {
            MessageContent::Text(_) => 1,
            MessageContent::Items(items) => items.len(),
            MessageContent::Other(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

/// An element of `message.content`. Only the fields the renderer
/// consults are modeled; everything else on the wire is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub tool_use_id: Option<String>,
}

impl ContentItem {
    pub fn is_tool_result(&self) -> bool {
        self.item_type.as_deref() == Some("tool_result")
    }

    pub fn input_value(&self, key: &str) -> Option<&Value> {
        self.input.get(key)
    }

    pub fn input_str(&self, key: &str) -> Option<&str> {
        self.input_value(key).and_then(Value::as_str)
    }

    /// Back-reference to the originating call, empty ids filtered out.
    pub fn result_call_id(&self) -> Option<&str> {
        self.tool_use_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Result payload as display text: a string passes through as-is,
    /// a structured value is serialized, absence is empty.
    pub fn payload_text(&self) -> String {
        self.content.as_ref().map(value_to_text).unwrap_or_default()
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_tool_use() {
        let json = r#"{"type":"assistant","message":{"content":[{"type":"tool_use","id":"t1","name":"Bash","input":{"command":"ls"}}]}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind(), EventKind::Assistant);
        let item = event.tool_use().expect("tool use item");
        assert_eq!(item.name.as_deref(), Some("Bash"));
        assert_eq!(item.input_str("command"), Some("ls"));
        assert_eq!(event.call_id(), Some("t1"));
    }

    #[test]
    fn test_assistant_text_is_not_a_tool_use() {
        let json = r#"{"type":"assistant","message":{"content":[{"type":"text","text":"hello"}]}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(event.tool_use().is_none());
        assert_eq!(event.text_content(), Some("hello"));
    }

    #[test]
    fn test_text_content_requires_a_text_item() {
        let json = r#"{"type":"assistant","message":{"content":[{"type":"tool_use","id":"t1","name":"Bash","text":"echoed"},{"type":"text","text":"real reply"}]}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.text_content(), Some("real reply"));

        let json = r#"{"type":"assistant","message":{"content":[{"type":"tool_use","text":"only"}]}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.text_content(), None);
    }

    #[test]
    fn test_call_id_does_not_require_a_name() {
        let json = r#"{"type":"assistant","message":{"content":[{"id":"t9","input":{}}]}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(event.tool_use().is_none());
        assert_eq!(event.call_id(), Some("t9"));
    }

    #[test]
    fn test_user_tool_result() {
        let json = r#"{"type":"user","message":{"content":[{"type":"tool_result","tool_use_id":"t1","content":"ok","is_error":false}]}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        let item = event.tool_result().expect("tool result item");
        assert_eq!(item.result_call_id(), Some("t1"));
        assert_eq!(item.payload_text(), "ok");
    }

    #[test]
    fn test_empty_tool_use_id_is_filtered() {
        let json = r#"{"type":"user","message":{"content":[{"type":"tool_result","tool_use_id":"","content":"ok"}]}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        let item = event.tool_result().unwrap();
        assert_eq!(item.result_call_id(), None);
    }

    #[test]
    fn test_structured_payload_is_serialized() {
        let json = r#"{"type":"user","message":{"content":[{"type":"tool_result","tool_use_id":"t1","content":{"files":3}}]}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        let item = event.tool_result().unwrap();
        assert_eq!(item.payload_text(), r#"{"files":3}"#);
    }

    #[test]
    fn test_string_message_content() {
        let json = r#"{"type":"user","message":{"content":"just words"}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(event.content_items().is_empty());
        assert_eq!(event.message.unwrap().content.unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_type_and_missing_fields() {
        let event: Event = serde_json::from_str(r#"{"type":"wibble"}"#).unwrap();
        assert_eq!(event.kind(), EventKind::Other);
        assert!(event.first_content_item().is_none());
        assert!(event.output_str().is_none());
        assert!(event.usage().is_none());
    }

    #[test]
    fn test_output_must_be_a_string() {
        let event: Event = serde_json::from_str(r#"{"type":"system","output":{"a":1}}"#).unwrap();
        assert!(event.output_str().is_none());
        let event: Event = serde_json::from_str(r#"{"type":"system","output":"abc"}"#).unwrap();
        assert_eq!(event.output_str(), Some("abc"));
    }

    #[test]
    fn test_result_text_verbatim_for_strings() {
        let event: Event = serde_json::from_str(r#"{"type":"result","result":"All done."}"#).unwrap();
        assert_eq!(event.result_text().as_deref(), Some("All done."));
    }

    #[test]
    fn test_usage_defaults() {
        let json = r#"{"type":"assistant","message":{"content":[],"usage":{"input_tokens":7}}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        let usage = event.usage().unwrap();
        assert_eq!(usage.input_tokens, 7);
        assert_eq!(usage.output_tokens, 0);
    }
}
