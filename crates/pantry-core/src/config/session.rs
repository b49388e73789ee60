use crate::constants::{limits, models};
use crate::error::PantryError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// The chef models the settings panel offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChefModel {
    #[default]
    MistralLarge2,
    Llama31_70b,
    SnowflakeArctic,
}

impl ChefModel {
    pub const ALL: [ChefModel; 3] = [
        ChefModel::MistralLarge2,
        ChefModel::Llama31_70b,
        ChefModel::SnowflakeArctic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChefModel::MistralLarge2 => models::MISTRAL_LARGE2,
            ChefModel::Llama31_70b => models::LLAMA3_1_70B,
            ChefModel::SnowflakeArctic => models::SNOWFLAKE_ARCTIC,
        }
    }
}

impl fmt::Display for ChefModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChefModel {
    type Err = PantryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChefModel::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                PantryError::config(format!(
                    "Unsupported model '{}'. Options: {}",
                    s,
                    models::SUPPORTED_MODELS.join(", ")
                ))
            })
    }
}

/// A count bounded to `MIN_WINDOW..=MAX_WINDOW`. Used for both the context
/// chunk count and the chat memory length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WindowSize(u8);

impl WindowSize {
    pub fn new(value: i64, field: &str) -> Result<Self, PantryError> {
        let range = i64::from(limits::MIN_WINDOW)..=i64::from(limits::MAX_WINDOW);
        if range.contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(PantryError::config(format!(
                "{} must be between {} and {}, got {}",
                field,
                limits::MIN_WINDOW,
                limits::MAX_WINDOW,
                value
            )))
        }
    }

    pub fn get(&self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated per-session settings. Each turn works from its own clone.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub selected_search_service: Option<String>,
    pub model: ChefModel,
    pub context_chunk_count: WindowSize,
    pub chat_memory_length: WindowSize,
    pub use_history: bool,
    pub debug_mode: bool,
    pub request_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        use crate::constants::defaults;
        Self {
            selected_search_service: None,
            model: ChefModel::default(),
            context_chunk_count: WindowSize(defaults::CONTEXT_CHUNK_COUNT),
            chat_memory_length: WindowSize(defaults::CHAT_MEMORY_LENGTH),
            use_history: true,
            debug_mode: false,
            request_timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
        }
    }
}
