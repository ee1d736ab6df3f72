use thiserror::Error;

/// All errors generated in `market-backdrop`.
#[derive(Debug, Error)]
pub enum BackdropError {
    #[error("terminal I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("unknown preset: {0} (expected terminal, hover or compact)")]
    UnknownPreset(String),

    #[error("frame loop task failed: {0}")]
    LoopTask(String),

    #[error("fx state file {path}: {source}")]
    FxState {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl BackdropError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        BackdropError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Configuration problems are reported before the terminal is touched.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            BackdropError::InvalidConfig { .. }
                | BackdropError::ConfigParse(_)
                | BackdropError::UnknownPreset(_)
        )
    }
}
