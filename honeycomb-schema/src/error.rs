//! Error types for column schema operations

use thiserror::Error;

/// Validation errors raised while building or decoding a column schema.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl ValidationError {
    pub(crate) fn missing(field: &str) -> Self {
        ValidationError::RequiredFieldMissing {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(field: &str, value: impl ToString, reason: &str) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Errors for byte sequences that are not a well-formed serialized schema.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Truncated input: needed {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("Payload of {len} bytes exceeds limit of {limit}")]
    PayloadTooLarge { len: usize, limit: usize },

    #[error("Unsupported format version: {version}")]
    UnsupportedVersion { version: u8 },

    #[error("Unknown payload encoding tag: {tag}")]
    UnknownEncoding { tag: u8 },

    #[error("Unknown column type tag: {tag}")]
    UnknownColumnType { tag: u8 },

    #[error("Unknown flag bits: {bits:#04x}")]
    UnknownFlags { bits: u8 },

    #[error("{count} trailing bytes after payload")]
    TrailingBytes { count: usize },

    #[error("JSON payload error: {reason}")]
    Json { reason: String },
}

/// Master error type for column schema operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Result type alias for column schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field_missing_display() {
        let err = ValidationError::missing("column_name");
        let msg = format!("{}", err);
        assert!(msg.contains("Required field missing"));
        assert!(msg.contains("column_name"));
    }

    #[test]
    fn test_invalid_value_display_carries_field_and_value() {
        let err = ValidationError::invalid("scale", -1, "must be non-negative");
        let msg = format!("{}", err);
        assert!(msg.contains("scale"));
        assert!(msg.contains("-1"));
        assert!(msg.contains("must be non-negative"));
    }

    #[test]
    fn test_unknown_flags_display_is_hex() {
        let err = CodecError::UnknownFlags { bits: 0x80 };
        assert_eq!(format!("{}", err), "Unknown flag bits: 0x80");
    }

    #[test]
    fn test_schema_error_from_validation() {
        let err: SchemaError = ValidationError::missing("column_name").into();
        assert!(matches!(err, SchemaError::Validation(_)));
        assert!(format!("{}", err).starts_with("Validation error"));
    }

    #[test]
    fn test_schema_error_from_codec() {
        let err: SchemaError = CodecError::UnsupportedVersion { version: 9 }.into();
        assert!(matches!(err, SchemaError::Codec(_)));
        assert!(format!("{}", err).contains("9"));
    }
}
