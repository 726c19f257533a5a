//! Codec configuration

use crate::{SchemaResult, ValidationError};
use serde::{Deserialize, Serialize};

/// Default upper bound on the size of a serialized column schema.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 4096;

/// Body encoding written after the two-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum PayloadEncoding {
    /// Compact tag/flags/int layout
    #[default]
    Binary,
    /// Self-describing JSON object, for inspection and migration tooling
    Json,
}

/// Settings for encoding and decoding column schemas.
///
/// Decoding detects the payload encoding from the header, so `encoding`
/// only selects what the encoder writes. `max_payload_bytes` applies both
/// ways.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CodecConfig {
    pub encoding: PayloadEncoding,
    pub max_payload_bytes: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            encoding: PayloadEncoding::Binary,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

impl CodecConfig {
    /// Config that writes JSON payloads.
    pub fn json() -> Self {
        Self {
            encoding: PayloadEncoding::Json,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - max_payload_bytes > 0
    pub fn validate(&self) -> SchemaResult<()> {
        if self.max_payload_bytes == 0 {
            return Err(ValidationError::invalid(
                "max_payload_bytes",
                self.max_payload_bytes,
                "must be greater than zero",
            )
            .into());
        }
        Ok(())
    }
}
