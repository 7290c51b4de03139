use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),
    #[error("temperature variance must be positive, got {0}")]
    InvalidVariance(f32),
    #[error("unknown timezone `{0}`")]
    InvalidTimezone(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("entity `{0}` is unavailable")]
    Unavailable(String),
    #[error("entity `{entity_id}` reported malformed state `{raw}`")]
    Malformed { entity_id: String, raw: String },
    #[error("command to `{entity_id}` failed: {reason}")]
    CommandFailed { entity_id: String, reason: String },
}
