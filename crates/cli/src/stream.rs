//! Line-by-line stream processing.
//!
//! Owns the pairing buffer and the output sink. Each input line is
//! decoded, classified, and either rendered immediately or buffered
//! until its complementary call/result half arrives.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use tracelight_core::{Event, EventKind, PairingBuffer};

use crate::render;

pub struct StreamProcessor<W: Write> {
    out: W,
    debug: bool,
    buffer: PairingBuffer,
    last_event: Option<Event>,
}

impl<W: Write> StreamProcessor<W> {
    pub fn new(out: W, debug: bool) -> Self {
        Self {
            out,
            debug,
            buffer: PairingBuffer::new(),
            last_event: None,
        }
    }

    /// Handle one raw input line. Blank lines are skipped; lines that
    /// fail to decode produce a parse-error entry and processing
    /// continues with the next line.
    pub fn process_line(&mut self, line: &str) -> io::Result<()> {
        if line.trim().is_empty() {
            return Ok(());
        }
        let seen_at = Utc::now();
        match serde_json::from_str::<Event>(line) {
            Ok(event) => self.process_event(event, seen_at),
            Err(e) => {
                tracing::debug!("undecodable line: {e}");
                let block = self.stamped(render::render_parse_error(line), seen_at);
                self.emit(&block)
            }
        }
    }

    fn process_event(&mut self, event: Event, seen_at: DateTime<Utc>) -> io::Result<()> {
        let block = if let Some(id) = event.call_id().map(str::to_string) {
            match self.buffer.offer_call(&id, event.clone(), seen_at) {
                Some(result) => {
                    self.combined_block(&event, seen_at, &result.event, result.seen_at)
                }
                None => {
                    let mut b = render::render_event(&event);
                    b.push_str(&render::render_waiting_trailer());
                    self.stamped(b, seen_at)
                }
            }
        } else if let Some(id) = event
            .tool_result()
            .and_then(|item| item.result_call_id())
            .map(str::to_string)
        {
            match self.buffer.offer_result(&id, event.clone(), seen_at) {
                Some(call) => self.combined_block(&call.event, call.seen_at, &event, seen_at),
                // Buffered until the call shows up; nothing to print yet.
                None => String::new(),
            }
        } else if event.kind() == EventKind::Result && event.result.is_some() {
            let mut b = render::render_event(&event);
            if let Some(text) = event.result_text() {
                b.push_str(&render::render_final_result(&text));
            }
            self.stamped(b, seen_at)
        } else {
            self.stamped(render::render_event(&event), seen_at)
        };

        self.last_event = Some(event);
        if block.is_empty() {
            return Ok(());
        }
        self.emit(&block)
    }

    /// A resolved pair. In debug mode each half keeps the stamp from
    /// when it was actually read, so a buffered half shows its own
    /// arrival time rather than the resolving event's.
    fn combined_block(
        &self,
        call: &Event,
        call_seen: DateTime<Utc>,
        result: &Event,
        result_seen: DateTime<Utc>,
    ) -> String {
        if !self.debug {
            return render::render_combined(call, result);
        }
        let mut block = String::new();
        if let Some(item) = call.tool_use() {
            block.push_str(&render::debug_stamp(call_seen));
            block.push_str(&render::render_tool_use(item));
        }
        if let Some(item) = result.tool_result() {
            block.push_str(&render::debug_stamp(result_seen));
            block.push_str(&render::render_paired_result(item));
        }
        block
    }

    fn stamped(&self, block: String, seen_at: DateTime<Utc>) -> String {
        if self.debug {
            format!("{}{block}", render::debug_stamp(seen_at))
        } else {
            block
        }
    }

    /// End of stream. If the transcript trails off with a plain
    /// assistant message, promote its text to a closing block.
    pub fn finish(&mut self) -> io::Result<()> {
        let text = match &self.last_event {
            Some(event)
                if event.kind() == EventKind::Assistant && event.call_id().is_none() =>
            {
                event.text_content().map(str::to_string)
            }
            _ => None,
        };
        if let Some(text) = text {
            let block = self.stamped(render::render_final_assistant_message(&text), Utc::now());
            self.emit(&block)?;
        }
        Ok(())
    }

    fn emit(&mut self, block: &str) -> io::Result<()> {
        self.out.write_all(block.as_bytes())?;
        self.out.flush()
    }
}
