//! Engine error type.

use thiserror::Error;

use crate::schema::ValidationError;

/// Errors surfaced by the game-state model and the command processor.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("expected a '{expected}' node, found '{found}'")]
    TypeMismatch { expected: String, found: String },
    #[error("{} validation problem(s): {}", .0.len(), summarize(.0))]
    Validation(Vec<ValidationError>),
    #[error("Failed to save! {path}: {reason}")]
    SaveFailed { path: String, reason: String },
    #[error("Failed to load! {path}: {reason}")]
    LoadFailed { path: String, reason: String },
    #[error("internal error: {0}")]
    Internal(String),
    #[error("not implemented yet: {0}")]
    NotImplemented(String),
}

impl EngineError {
    pub(crate) fn save_failed(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        EngineError::SaveFailed {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn load_failed(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        EngineError::LoadFailed {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    const SHOWN: usize = 3;
    let mut text = errors
        .iter()
        .take(SHOWN)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    if errors.len() > SHOWN {
        text.push_str(&format!("; and {} more", errors.len() - SHOWN));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_messages_lead_with_failure() {
        let err = EngineError::save_failed("maps/crypt.xml", "disk full");
        assert_eq!(err.to_string(), "Failed to save! maps/crypt.xml: disk full");
        let err = EngineError::load_failed("crypt.xml", "no such file");
        assert!(err.to_string().starts_with("Failed to load!"));
    }

    #[test]
    fn validation_message_is_capped() {
        let errors: Vec<_> = (0..5)
            .map(|i| ValidationError::UnknownProperty {
                path: "gameMap".into(),
                id: format!("p{i}"),
            })
            .collect();
        let text = EngineError::Validation(errors).to_string();
        assert!(text.starts_with("5 validation problem(s)"));
        assert!(text.ends_with("and 2 more"));
    }
}
