//! Log sanitization for patient values.
//!
//! Redacts the value half of `name=value` / `name: value` pairs for every
//! demographic and biomarker field, in the shapes they take in formatted log
//! output:
//! - `il6r=1800.5` (structured tracing fields)
//! - `il6r: 1800.5`, `tnfr1: Some(900.0)`, `sex: Female` (`Debug` output)
//! - `"crp": 4.0` (JSON)
//!
//! Field names survive so logs remain readable; only the values go.
//!
//! # Performance
//!
//! Input is capped (see `ENDOTYPE_SANITIZE_MAX_BYTES`) before scanning, and a
//! single `RegexSet` pass decides whether any replacement is needed at all.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::DEFAULT_SANITIZE_MAX_BYTES;

static VALUE_PATTERNS: OnceLock<ValuePatterns> = OnceLock::new();

const REDACTED: &str = "[REDACTED]";

struct ValuePattern {
    regex: Regex,
    replacement: String,
}

struct ValuePatterns {
    set: RegexSet,
    patterns: Vec<ValuePattern>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn get_patterns() -> &'static ValuePatterns {
    VALUE_PATTERNS.get_or_init(|| {
        let rules: [&str; 2] = [
            // Numeric fields, optionally wrapped in Some(..)
            r#"(?i)\b(age|bmi|il6r|hspb1|tnfr1|crp|ldl|hdl)("?\s*[:=]\s*)(?:Some\()?-?(?:\d+(?:\.\d*)?|\.\d+)(?:e[+-]?\d+)?\)?"#,
            // Categorical fields
            r#"(?i)\b(sex|smoking)("?\s*[:=]\s*)(?:Some\()?"?(?:male|female|never|former|current)"?\)?"#,
        ];

        let set = RegexSet::new(rules).expect("Valid regex set");
        let patterns = rules
            .iter()
            .map(|pattern| ValuePattern {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement: format!("${{1}}${{2}}{REDACTED}"),
            })
            .collect();

        ValuePatterns { set, patterns }
    })
}

/// Redact patient values from a string, scanning at most the default cap.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, DEFAULT_SANITIZE_MAX_BYTES)
}

/// Redact patient values from at most `max_bytes` of `input`.
#[must_use]
pub fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = get_patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = if patterns.set.is_match(prefix) {
        let mut out = prefix.to_string();
        for idx in patterns.set.matches(prefix).into_iter() {
            let pattern = &patterns.patterns[idx];
            out = pattern
                .regex
                .replace_all(&out, pattern.replacement.as_str())
                .into_owned();
        }
        out
    } else {
        prefix.to_string()
    };

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Whether a string carries any patient value that `sanitize` would redact.
#[must_use]
pub fn contains_patient_values(input: &str) -> bool {
    let (prefix, _truncated) = truncate_to_char_boundary(input, DEFAULT_SANITIZE_MAX_BYTES);
    get_patterns().set.is_match(prefix)
}

/// A `tracing_subscriber` writer wrapper that sanitizes each formatted log
/// line before it reaches the underlying sink.
#[derive(Debug)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
    max_bytes: usize,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self::with_limit(inner, DEFAULT_SANITIZE_MAX_BYTES)
    }

    #[must_use]
    pub fn with_limit(inner: M, max_bytes: usize) -> Self {
        Self {
            inner,
            max_bytes: max_bytes.max(1),
        }
    }
}

impl<M> Clone for SanitizingMakeWriter<M>
where
    M: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            max_bytes: self.max_bytes,
        }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
    max_bytes: usize,
}

impl<W> SanitizingWriter<W> {
    fn new(inner: W, max_bytes: usize) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            max_bytes,
        }
    }
}

impl<W> SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.drain(..=pos).collect::<Vec<u8>>();
            let line_str = String::from_utf8_lossy(&line);
            let sanitized = sanitize_with_limit(&line_str, self.max_bytes);
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W> std::io::Write for SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A formatter that never emits a newline must not buffer forever.
        let hard_cap = self.max_bytes.saturating_mul(2);
        if self.buffer.len() > hard_cap {
            let s = String::from_utf8_lossy(&self.buffer).to_string();
            let sanitized = sanitize_with_limit(&s, self.max_bytes);
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;

        if !self.buffer.is_empty() {
            let s = String::from_utf8_lossy(&self.buffer);
            let sanitized = sanitize_with_limit(&s, self.max_bytes);
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }

        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer(), self.max_bytes)
    }
}
