#![forbid(unsafe_code)]

//! Error types for chord construction and configuration loading.

use thiserror::Error;

/// A chord declaration that can never be reached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChordError {
    #[error("chord `{cmd}` has an empty key sequence")]
    EmptySequence { cmd: String },

    #[error("chord `{cmd}` has no keys in sequence step {step}")]
    EmptyStep { cmd: String, step: usize },
}

/// Failure loading an [`InputConfig`](crate::config::InputConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-file")]
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_command() {
        let err = ChordError::EmptyStep {
            cmd: "flip".into(),
            step: 1,
        };
        assert_eq!(err.to_string(), "chord `flip` has no keys in sequence step 1");
    }

    #[test]
    fn invalid_config_joins_problems() {
        let err = ConfigError::Invalid(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "invalid configuration: a; b");
    }
}
