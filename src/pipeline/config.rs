use crate::config::{DEFAULT_CONTEXT_CAP, DEFAULT_MAX_TOKENS};

/// Per-run knobs shared by the pipeline and its agent stages
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Characters of each stage's output exposed to later stages
    pub context_cap: usize,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            context_cap: DEFAULT_CONTEXT_CAP,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.2,
        }
    }
}

impl PipelineSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context_cap(mut self, context_cap: usize) -> Self {
        self.context_cap = context_cap;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}
