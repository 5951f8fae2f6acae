//! Inter-stage context for a single pipeline run

use std::fmt;

/// Keys under which stage output is shared with later stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKey {
    /// Seeded with the rendered service descriptor before any stage runs
    Project,
    ApiDesign,
    BackendDb,
    Messaging,
    TestingSecurity,
}

impl ContextKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKey::Project => "project_context",
            ContextKey::ApiDesign => "api_design",
            ContextKey::BackendDb => "backend_db",
            ContextKey::Messaging => "messaging",
            ContextKey::TestingSecurity => "testing_security",
        }
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered association of context keys to truncated stage output.
///
/// Stages only ever get a shared reference; entries are added by the
/// pipeline, in execution order, and never removed.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    entries: Vec<(ContextKey, String)>,
    cap: usize,
}

impl ExecutionContext {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: Vec::new(),
            cap,
        }
    }

    /// Returns the value stored under `key`, if that key has been produced.
    pub fn get(&self, key: ContextKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: ContextKey) -> bool {
        self.get(key).is_some()
    }

    /// Keys in the order they were written
    pub fn keys(&self) -> Vec<ContextKey> {
        self.entries.iter().map(|(k, _)| *k).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Stores the first `cap` characters of `value` under `key`.
    pub(crate) fn insert(&mut self, key: ContextKey, value: &str) {
        let trimmed = truncate_chars(value, self.cap).to_string();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = trimmed,
            None => self.entries.push((key, trimmed)),
        }
    }
}

/// Prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
