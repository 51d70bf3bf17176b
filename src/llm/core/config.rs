//! Per-request generation settings

/// Gemini 2.5 models spend part of the output budget on thinking, so the
/// default leaves room for a full answer after a tool round-trip.
pub const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Sampling settings sent with every model call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Output token budget, thinking tokens included
    pub max_tokens: u32,
    /// Provider default when `None`
    pub temperature: Option<f32>,
    /// Ask for an `application/json` answer instead of free text
    pub json_output: bool,
}

impl GenerationConfig {
    pub fn new(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            temperature: None,
            json_output: false,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOKENS)
    }
}
