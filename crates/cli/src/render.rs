//! Event rendering.
//!
//! Every function here is pure: it turns one event (or one half of a
//! call/result pair) into a styled multi-line `String`. The stream loop
//! owns the output sink and writes whatever these return, which keeps
//! the formatting rules testable without capturing stdout.
//!
//! Styling is applied only by wrapping already-final text in ANSI
//! sequences, so payloads and tool arguments are always emitted
//! verbatim and cannot inject formatting of their own.

use colored::Colorize;
use serde_json::Value;
use tracelight_core::{
    parse_todos, ContentItem, Event, EventKind, TodoItem, TodoPriority, TodoStatus,
};

/// `prompt` key arguments are cut harder than other free text.
const PROMPT_ARG_MAX: usize = 30;
/// Inline user message text.
const USER_TEXT_MAX: usize = 50;
/// Each side of an `old_string` → `new_string` replace summary.
const REPLACE_ARG_MAX: usize = 20;
/// Offending line shown in a parse-error entry.
const PARSE_ERROR_MAX: usize = 50;

/// Hard character cut with a literal `...` marker. Text at or below
/// the limit passes through untouched.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

// ── Lone-event rendering ─────────────────────────────────────────────────

/// Render a single event outside of any call/result pairing.
pub fn render_event(event: &Event) -> String {
    if let Some(item) = event.tool_use() {
        if item.name.as_deref() == Some("TodoWrite") {
            if let Some(todos) = item.input_value("todos").and_then(parse_todos) {
                return render_todo_list(&todos);
            }
        }
        return render_tool_use(item);
    }
    render_generic(event)
}

/// Tool invocation line plus an optional dimmed arguments line.
pub fn render_tool_use(item: &ContentItem) -> String {
    let name = item.name.as_deref().unwrap_or("unknown");
    let mut out = match key_argument(item) {
        Some(arg) => format!("🔧 {}({arg})\n", name.cyan().bold()),
        None => format!("🔧 {}\n", name.cyan().bold()),
    };
    let extras = extra_arguments(item);
    if !extras.is_empty() {
        out.push_str(&format!("   {}\n", extras.join(", ").dimmed()));
    }
    out
}

/// The single most informative input field, by fixed priority.
fn key_argument(item: &ContentItem) -> Option<String> {
    for (key, quoted) in [
        ("file_path", false),
        ("path", false),
        ("pattern", true),
        ("command", false),
        ("cmd", false),
        ("query", true),
        ("description", false),
        ("prompt", true),
        ("url", false),
    ] {
        if let Some(value) = item.input_value(key) {
            let mut text = value_display(value);
            if key == "prompt" {
                text = truncate(&text, PROMPT_ARG_MAX);
            }
            return Some(if quoted { format!("\"{text}\"") } else { text });
        }
    }
    None
}

/// Secondary arguments worth a mention, comma-joined in fixed order.
fn extra_arguments(item: &ContentItem) -> Vec<String> {
    let mut parts = Vec::new();
    if item.name.as_deref() == Some("Bash") {
        if let Some(cwd) = item.input_value("cwd") {
            parts.push(format!("cwd: {}", value_display(cwd)));
        }
    }
    for key in ["limit", "offset", "include"] {
        if let Some(value) = item.input_value(key) {
            parts.push(format!("{key}: {}", value_display(value)));
        }
    }
    if let Some(old) = item.input_value("old_string") {
        let new = item
            .input_value("new_string")
            .map(value_display)
            .unwrap_or_default();
        parts.push(format!(
            "replace \"{}\" → \"{}\"",
            truncate(&value_display(old), REPLACE_ARG_MAX),
            truncate(&new, REPLACE_ARG_MAX)
        ));
    }
    if let Some(timeout) = item.input_value("timeout") {
        parts.push(format!("timeout: {}ms", value_display(timeout)));
    }
    parts
}

fn value_display(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

fn render_generic(event: &Event) -> String {
    let mut out = String::new();

    if let Some(item) = event.tool_result() {
        out.push_str(&render_lone_tool_result(item));
    } else {
        let label = styled_type_label(event);
        match event.kind() {
            EventKind::System => match event.subtype.as_deref() {
                Some(subtype) => out.push_str(&format!("● {label} ({subtype})\n")),
                None => out.push_str(&format!("● {label}\n")),
            },
            EventKind::ToolResult => match event.name.as_deref() {
                Some(name) => out.push_str(&format!("● {label} ({name})\n")),
                None => out.push_str(&format!("● {label}\n")),
            },
            EventKind::User => {
                match event.first_content_item().and_then(|i| i.text.as_deref()) {
                    Some(text) => {
                        out.push_str(&format!("● {label}: {}\n", truncate(text, USER_TEXT_MAX)));
                    }
                    None => out.push_str(&format!("● {label}\n")),
                }
            }
            EventKind::Assistant => {
                out.push_str(&format!("● {label}\n"));
                if let Some(text) = event.text_content() {
                    out.push_str(&text_preview(text, 3));
                }
            }
            EventKind::Result | EventKind::Other => out.push_str(&format!("● {label}\n")),
        }
    }

    if let Some(summary) = summary_line(event) {
        out.push_str(&format!("   {}\n", summary.dimmed()));
    }
    out
}

/// Capitalized type name, colored per the fixed type table.
fn styled_type_label(event: &Event) -> String {
    let label = if event.event_type.is_empty() {
        "Unknown".to_string()
    } else {
        capitalize(&event.event_type)
    };
    match event.event_type.as_str() {
        "system" => label.magenta().to_string(),
        "user" => label.blue().to_string(),
        "assistant" => label.green().to_string(),
        "tool_result" => label.yellow().to_string(),
        "message" => label.dimmed().to_string(),
        _ => label,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Tool result embedded in a user message, rendered without its call.
fn render_lone_tool_result(item: &ContentItem) -> String {
    let payload = item.payload_text();
    let label = "Tool Result".yellow();
    let counts = payload_counts(&payload);
    let mut out = if item.is_error {
        format!("● {label} {counts} {}\n", "ERROR".red().bold())
    } else {
        format!("● {label} {counts}\n")
    };
    out.push_str(&payload_preview(&payload, 2, false));
    out
}

fn payload_counts(payload: &str) -> String {
    format!(
        "({} lines, {} chars)",
        payload.lines().count(),
        payload.chars().count()
    )
}

/// First non-blank lines of a result payload, first one plain and the
/// rest dimmed, optionally followed by a `... N more lines` marker.
fn payload_preview(payload: &str, max_lines: usize, more_marker: bool) -> String {
    let non_blank: Vec<&str> = payload.lines().filter(|l| !l.trim().is_empty()).collect();
    let mut out = String::new();
    for (i, line) in non_blank.iter().take(max_lines).enumerate() {
        if i == 0 {
            out.push_str(&format!("   {line}\n"));
        } else {
            out.push_str(&format!("   {}\n", line.dimmed()));
        }
    }
    if more_marker && non_blank.len() > max_lines {
        let marker = format!("... {} more lines", non_blank.len() - max_lines);
        out.push_str(&format!("   {}\n", marker.dimmed()));
    }
    out
}

/// Assistant reply preview: raw lines, not filtered for blanks.
fn text_preview(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out = String::new();
    for (i, line) in lines.iter().take(max_lines).enumerate() {
        if i == 0 {
            out.push_str(&format!("   {line}\n"));
        } else {
            out.push_str(&format!("   {}\n", line.dimmed()));
        }
    }
    if lines.len() > max_lines {
        out.push_str(&format!("   {}\n", "...".dimmed()));
    }
    out
}

/// One trailing stats line, first match wins.
fn summary_line(event: &Event) -> Option<String> {
    if let Some(usage) = event.usage() {
        return Some(format!("{}/{} tokens", usage.input_tokens, usage.output_tokens));
    }
    if let Some(output) = event.output_str() {
        return Some(format!("{} chars output", output.chars().count()));
    }
    if let Some(content) = event.message.as_ref().and_then(|m| m.content.as_ref()) {
        return Some(format!("{} content items", content.len()));
    }
    if let Some(tools) = &event.tools {
        return Some(format!("{} tools available", tools.len()));
    }
    None
}

// ── Todo list ────────────────────────────────────────────────────────────

pub fn render_todo_list(todos: &[TodoItem]) -> String {
    let mut out = format!("📋 {}\n", "Todo List".cyan().bold());

    let mut completed = 0usize;
    let mut in_progress = 0usize;
    let mut pending = 0usize;

    for todo in todos {
        let status = todo.status();
        match status {
            TodoStatus::Completed => completed += 1,
            TodoStatus::InProgress => in_progress += 1,
            TodoStatus::Pending => pending += 1,
            TodoStatus::Other => {}
        }

        let checkbox = if status == TodoStatus::Completed {
            "[x]"
        } else {
            "[ ]"
        };
        let icon = match status {
            TodoStatus::Completed => "✅",
            TodoStatus::InProgress => "🔄",
            TodoStatus::Pending => "⏸️",
            TodoStatus::Other => "❓",
        };
        let content = match status {
            TodoStatus::Completed => todo.content.green().dimmed().to_string(),
            TodoStatus::InProgress => todo.content.yellow().bold().to_string(),
            _ => todo.content.clone(),
        };
        let tag = format!("[{}]", todo.priority);
        let tag = match todo.priority() {
            TodoPriority::High => tag.red().to_string(),
            TodoPriority::Medium => tag.yellow().to_string(),
            TodoPriority::Low => tag.dimmed().to_string(),
            TodoPriority::Other => tag,
        };
        let suffix = if status == TodoStatus::InProgress {
            " ← ACTIVE"
        } else {
            ""
        };
        out.push_str(&format!("  {checkbox} {icon} {content} {tag}{suffix}\n"));
    }

    let percent = if todos.is_empty() {
        0
    } else {
        (completed as f64 * 100.0 / todos.len() as f64).round() as u32
    };
    out.push_str(&format!(
        "   {completed} completed, {in_progress} active, {pending} pending ({percent}% done)\n"
    ));
    out
}

// ── Combined call/result rendering ───────────────────────────────────────

/// Render a resolved pair: the invocation line, then the result half.
pub fn render_combined(call: &Event, result: &Event) -> String {
    let mut out = String::new();
    if let Some(item) = call.tool_use() {
        out.push_str(&render_tool_use(item));
    }
    if let Some(item) = result.tool_result() {
        out.push_str(&render_paired_result(item));
    }
    out
}

/// The result half of a combined block.
pub fn render_paired_result(item: &ContentItem) -> String {
    let payload = item.payload_text();
    let counts = payload_counts(&payload);
    let mut out = if item.is_error {
        format!(
            "❌ {} {counts} {}\n",
            "Tool Result".red(),
            "ERROR".red().bold()
        )
    } else {
        format!("✅ {} {counts}\n", "Tool Result".green())
    };
    out.push_str(&payload_preview(&payload, 3, true));
    out
}

/// Trailer for a call whose result has not arrived yet.
pub fn render_waiting_trailer() -> String {
    format!("   {}\n", "⏳ Waiting for result...".dimmed())
}

// ── Stream-level blocks ──────────────────────────────────────────────────

pub fn render_parse_error(line: &str) -> String {
    format!(
        "⚠ {}: {}\n",
        "Parse Error".red().bold(),
        truncate(line, PARSE_ERROR_MAX)
    )
}

pub fn render_final_result(text: &str) -> String {
    final_block("🏁 Final Result", text)
}

pub fn render_final_assistant_message(text: &str) -> String {
    final_block("💬 Final Assistant Message", text)
}

/// Distinguished block with the given text emitted verbatim.
fn final_block(title: &str, text: &str) -> String {
    let mut out = format!("{}\n{}\n", "─".repeat(40).dimmed(), title.green().bold());
    out.push_str(text);
    if !text.ends_with('\n') {
        out.push('\n');
    }
    out
}

pub fn debug_stamp(seen_at: chrono::DateTime<chrono::Utc>) -> String {
    let stamp = seen_at.format("[%Y-%m-%d %H:%M:%S%.3f UTC]").to_string();
    format!("{}\n", stamp.dimmed())
}
