//! Message template rendering.
//!
//! Templates interpolate `{{dotted.path}}` placeholders from an event
//! payload. A placeholder whose path is absent (or resolves to null)
//! is left verbatim in the output, which makes rendering idempotent
//! and keeps a half-filled template visibly half-filled instead of
//! silently blank.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::value::{coerce_to_string, resolve_path};

/// Regex pattern matching `{{dotted.path}}` tokens in message templates.
pub const PLACEHOLDER_PATTERN: &str = r"\{\{([A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)*)\}\}";

/// Compiled regex for placeholder extraction. Compiled once, reused forever.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("valid regex"));

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Placeholder { path: String, raw: String },
}

/// A message template compiled into literal and placeholder segments.
///
/// Compiling is cheap and infallible; text without placeholders is a
/// single literal segment.
#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn compile(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;
        for m in PLACEHOLDER_RE.find_iter(text) {
            if m.start() > last {
                segments.push(Segment::Literal(text[last..m.start()].to_string()));
            }
            let raw = m.as_str();
            segments.push(Segment::Placeholder {
                path: raw[2..raw.len() - 2].to_string(),
                raw: raw.to_string(),
            });
            last = m.end();
        }
        if last < text.len() {
            segments.push(Segment::Literal(text[last..].to_string()));
        }
        Template { segments }
    }

    /// Render against a payload, leaving unresolvable placeholders as-is.
    pub fn render(&self, payload: &Value) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Placeholder { path, raw } => match resolve_path(payload, path) {
                    Some(v) if !v.is_null() => out.push_str(&coerce_to_string(v)),
                    _ => out.push_str(raw),
                },
            }
        }
        out
    }
}

/// Compile and render in one step.
pub fn render_str(text: &str, payload: &Value) -> String {
    Template::compile(text).render(payload)
}
