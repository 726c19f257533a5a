//! Byte codec for column schemas.
//!
//! # Binary Format
//!
//! The column name is never part of the payload; it is supplied by the
//! caller on decode, since the schema store indexes columns by name.
//!
//! - Byte 0: format version
//! - Byte 1: payload encoding (0 = binary, 1 = JSON)
//!
//! Binary payload:
//! - Byte 2: column type tag
//! - Byte 3: flags (see [`ColumnFlags`])
//! - Then scale, precision and max length as little-endian `i32`, each only
//!   when its flag is set, in that order. Nothing may follow.
//!
//! JSON payload: a single object with `column_type`, `is_nullable`,
//! `is_auto_increment` and the optional `scale`, `precision`, `max_length`.
//!
//! Decoded fields are replayed through [`ColumnSchemaBuilder`], so corrupted
//! but well-formed bytes hit the same validation as freshly built schemas.

use crate::{
    CodecConfig, CodecError, ColumnKind, ColumnSchema, ColumnSchemaBuilder, ColumnType,
    PayloadEncoding, SchemaResult, ValidationError,
};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Current format version written by the encoder.
pub const FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = 2;
const ENCODING_BINARY: u8 = 0;
const ENCODING_JSON: u8 = 1;
const INT_LEN: usize = 4;

bitflags! {
    /// Flag byte of the binary payload.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColumnFlags: u8 {
        /// Column accepts NULL
        const NULLABLE = 0b0000_0001;
        /// Column is auto-increment
        const AUTO_INCREMENT = 0b0000_0010;
        /// Scale follows
        const SCALE = 0b0000_0100;
        /// Precision follows
        const PRECISION = 0b0000_1000;
        /// Max length follows
        const MAX_LENGTH = 0b0001_0000;
    }
}

/// Field values as they travel on the wire, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireColumn {
    column_type: ColumnType,
    is_nullable: bool,
    is_auto_increment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scale: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    precision: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_length: Option<i32>,
}

impl WireColumn {
    fn from_schema(schema: &ColumnSchema) -> Self {
        Self {
            column_type: schema.column_type(),
            is_nullable: schema.is_nullable(),
            is_auto_increment: schema.is_auto_increment(),
            scale: schema.scale(),
            precision: schema.precision(),
            max_length: schema.max_length(),
        }
    }

    fn into_schema(self, column_name: &str) -> SchemaResult<ColumnSchema> {
        let mut builder: ColumnSchemaBuilder = ColumnSchema::builder(column_name, self.column_type)?
            .nullable(self.is_nullable)
            .auto_increment(self.is_auto_increment);
        if let Some(scale) = self.scale {
            builder = builder.scale(scale)?;
        }
        if let Some(precision) = self.precision {
            builder = builder.precision(precision)?;
        }
        if let Some(max_length) = self.max_length {
            builder = builder.max_length(max_length)?;
        }
        builder.build()
    }
}

impl ColumnSchema {
    /// Serialize to the binary format. The column name is not included.
    pub fn serialize(&self) -> Vec<u8> {
        let bytes = encode_binary(self);
        trace!(column = %self.column_name(), len = bytes.len(), "serialized column schema");
        bytes
    }

    /// Serialize with the encoding and size limit from `config`.
    pub fn encode_with(&self, config: &CodecConfig) -> SchemaResult<Vec<u8>> {
        config.validate()?;
        let bytes = match config.encoding {
            PayloadEncoding::Binary => encode_binary(self),
            PayloadEncoding::Json => encode_json(self)?,
        };
        if bytes.len() > config.max_payload_bytes {
            return Err(CodecError::PayloadTooLarge {
                len: bytes.len(),
                limit: config.max_payload_bytes,
            }
            .into());
        }
        trace!(
            column = %self.column_name(),
            encoding = ?config.encoding,
            len = bytes.len(),
            "encoded column schema"
        );
        Ok(bytes)
    }

    /// Rebuild a schema from bytes produced by [`serialize`](Self::serialize)
    /// or [`encode_with`](Self::encode_with), naming it `column_name`.
    ///
    /// Fails with `RequiredFieldMissing` on empty input and `InvalidValue`
    /// on an empty name.
    pub fn deserialize(bytes: &[u8], column_name: &str) -> SchemaResult<ColumnSchema> {
        Self::deserialize_with(bytes, column_name, &CodecConfig::default())
    }

    /// Like [`deserialize`](Self::deserialize) with an explicit config.
    pub fn deserialize_with(
        bytes: &[u8],
        column_name: &str,
        config: &CodecConfig,
    ) -> SchemaResult<ColumnSchema> {
        decode(bytes, column_name, config)
            .inspect(|schema| {
                trace!(column = %schema.column_name(), len = bytes.len(), "decoded column schema")
            })
            .inspect_err(|err| {
                debug!(column = %column_name, len = bytes.len(), error = %err, "rejected serialized column schema")
            })
    }
}

fn decode(bytes: &[u8], column_name: &str, config: &CodecConfig) -> SchemaResult<ColumnSchema> {
    if bytes.is_empty() {
        return Err(ValidationError::missing("serialized_schema").into());
    }
    if column_name.is_empty() {
        return Err(ValidationError::invalid("column_name", "\"\"", "must not be empty").into());
    }
    config.validate()?;
    if bytes.len() > config.max_payload_bytes {
        return Err(CodecError::PayloadTooLarge {
            len: bytes.len(),
            limit: config.max_payload_bytes,
        }
        .into());
    }
    if bytes.len() < HEADER_LEN {
        return Err(CodecError::Truncated {
            needed: HEADER_LEN,
            got: bytes.len(),
        }
        .into());
    }
    if bytes[0] != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion { version: bytes[0] }.into());
    }

    let wire = match bytes[1] {
        ENCODING_BINARY => decode_binary(bytes)?,
        ENCODING_JSON => decode_json(&bytes[HEADER_LEN..])?,
        tag => return Err(CodecError::UnknownEncoding { tag }.into()),
    };
    wire.into_schema(column_name)
}

// =============================================================================
// BINARY PAYLOAD
// =============================================================================

fn encode_binary(schema: &ColumnSchema) -> Vec<u8> {
    let mut flags = ColumnFlags::empty();
    flags.set(ColumnFlags::NULLABLE, schema.is_nullable());
    flags.set(ColumnFlags::AUTO_INCREMENT, schema.is_auto_increment());

    let mut params: Vec<i32> = Vec::with_capacity(2);
    match schema.kind() {
        ColumnKind::Decimal { scale, precision } => {
            flags |= ColumnFlags::SCALE | ColumnFlags::PRECISION;
            params.push(scale);
            params.push(precision);
        }
        ColumnKind::String {
            max_length: Some(max_length),
        }
        | ColumnKind::Binary {
            max_length: Some(max_length),
        } => {
            flags |= ColumnFlags::MAX_LENGTH;
            params.push(max_length);
        }
        _ => {}
    }

    let mut bytes = Vec::with_capacity(HEADER_LEN + 2 + params.len() * INT_LEN);
    bytes.push(FORMAT_VERSION);
    bytes.push(ENCODING_BINARY);
    bytes.push(column_type_to_byte(schema.column_type()));
    bytes.push(flags.bits());
    for param in params {
        bytes.extend_from_slice(&param.to_le_bytes());
    }
    bytes
}

/// Decode the binary payload of `bytes`, which still carries its header.
fn decode_binary(bytes: &[u8]) -> Result<WireColumn, CodecError> {
    let fixed_len = HEADER_LEN + 2;
    if bytes.len() < fixed_len {
        return Err(CodecError::Truncated {
            needed: fixed_len,
            got: bytes.len(),
        });
    }

    let tag = bytes[HEADER_LEN];
    let column_type =
        byte_to_column_type(tag).ok_or(CodecError::UnknownColumnType { tag })?;

    let raw_flags = bytes[HEADER_LEN + 1];
    let flags = ColumnFlags::from_bits(raw_flags).ok_or(CodecError::UnknownFlags {
        bits: raw_flags & !ColumnFlags::all().bits(),
    })?;

    let int_fields = [ColumnFlags::SCALE, ColumnFlags::PRECISION, ColumnFlags::MAX_LENGTH]
        .iter()
        .filter(|flag| flags.contains(**flag))
        .count();
    let needed = fixed_len + int_fields * INT_LEN;
    if bytes.len() < needed {
        return Err(CodecError::Truncated {
            needed,
            got: bytes.len(),
        });
    }
    if bytes.len() > needed {
        return Err(CodecError::TrailingBytes {
            count: bytes.len() - needed,
        });
    }

    let mut offset = fixed_len;
    let mut next_int = |flag: ColumnFlags| -> Result<Option<i32>, CodecError> {
        if !flags.contains(flag) {
            return Ok(None);
        }
        let value = read_i32(bytes, offset)?;
        offset += INT_LEN;
        Ok(Some(value))
    };

    Ok(WireColumn {
        column_type,
        is_nullable: flags.contains(ColumnFlags::NULLABLE),
        is_auto_increment: flags.contains(ColumnFlags::AUTO_INCREMENT),
        scale: next_int(ColumnFlags::SCALE)?,
        precision: next_int(ColumnFlags::PRECISION)?,
        max_length: next_int(ColumnFlags::MAX_LENGTH)?,
    })
}

fn read_i32(bytes: &[u8], offset: usize) -> Result<i32, CodecError> {
    let end = offset + INT_LEN;
    let raw: [u8; INT_LEN] = bytes
        .get(offset..end)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(CodecError::Truncated {
            needed: end,
            got: bytes.len(),
        })?;
    Ok(i32::from_le_bytes(raw))
}

/// Convert ColumnType to its single-byte wire tag.
fn column_type_to_byte(column_type: ColumnType) -> u8 {
    match column_type {
        ColumnType::Long => 0,
        ColumnType::ULong => 1,
        ColumnType::Double => 2,
        ColumnType::Decimal => 3,
        ColumnType::String => 4,
        ColumnType::Binary => 5,
        ColumnType::Date => 6,
        ColumnType::Time => 7,
        ColumnType::DateTime => 8,
    }
}

/// Convert a wire tag back to ColumnType.
fn byte_to_column_type(byte: u8) -> Option<ColumnType> {
    match byte {
        0 => Some(ColumnType::Long),
        1 => Some(ColumnType::ULong),
        2 => Some(ColumnType::Double),
        3 => Some(ColumnType::Decimal),
        4 => Some(ColumnType::String),
        5 => Some(ColumnType::Binary),
        6 => Some(ColumnType::Date),
        7 => Some(ColumnType::Time),
        8 => Some(ColumnType::DateTime),
        _ => None,
    }
}

// =============================================================================
// JSON PAYLOAD
// =============================================================================

fn encode_json(schema: &ColumnSchema) -> Result<Vec<u8>, CodecError> {
    let body = serde_json::to_vec(&WireColumn::from_schema(schema))
        .map_err(|e| CodecError::Json { reason: e.to_string() })?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
    bytes.push(FORMAT_VERSION);
    bytes.push(ENCODING_JSON);
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

fn decode_json(body: &[u8]) -> Result<WireColumn, CodecError> {
    serde_json::from_slice(body).map_err(|e| CodecError::Json { reason: e.to_string() })
}

// =============================================================================
// TESTS
// =============================================================================
