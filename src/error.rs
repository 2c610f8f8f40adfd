//! Crate-level error type.

use crate::path::NamePath;

/// Errors surfaced by fallible operations.
///
/// Ordinary misconfiguration (unregistered widget tags, a `custom` field
/// without a component) never ends up here: those degrade to placeholder
/// nodes in the render tree instead.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("invalid name path `{input}`: {message}")]
    InvalidPath { input: String, message: String },
    #[error("component registry is frozen; cannot register input [{0}]")]
    RegistryFrozen(String),
    #[error("invalid field descriptor: {0}")]
    Descriptor(#[from] serde_json::Error),
    #[error("value at `{0}` is not a list")]
    UnknownListPath(NamePath),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_path_message() {
        let err = ComposeError::InvalidPath {
            input: "a..b".into(),
            message: "empty segment".into(),
        };
        assert_eq!(err.to_string(), "invalid name path `a..b`: empty segment");
    }

    #[test]
    fn frozen_message_names_tag() {
        let err = ComposeError::RegistryFrozen("text".into());
        assert!(err.to_string().contains("[text]"));
    }

    #[test]
    fn descriptor_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ComposeError = serde_err.into();
        assert!(matches!(err, ComposeError::Descriptor(_)));
    }
}
