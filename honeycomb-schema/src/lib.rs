//! Honeycomb Schema - Column Descriptors
//!
//! Validated, immutable column metadata for the Honeycomb storage engine,
//! plus the byte codec used to persist it. A [`ColumnSchema`] can only be
//! obtained through [`ColumnSchemaBuilder::build`] or by decoding bytes, and
//! both paths run the same per-type legality checks.
//!
//! ```
//! use honeycomb_schema::{ColumnSchema, ColumnType, SchemaResult};
//!
//! fn price_column() -> SchemaResult<ColumnSchema> {
//!     ColumnSchema::builder("price", ColumnType::Decimal)?
//!         .scale(2)?
//!         .precision(10)?
//!         .nullable(false)
//!         .build()
//! }
//!
//! let price = price_column().unwrap();
//! let restored = ColumnSchema::deserialize(&price.serialize(), "price").unwrap();
//! assert_eq!(price, restored);
//! ```

pub mod codec;
pub mod column_type;
pub mod config;
pub mod error;
pub mod schema;

pub use codec::{ColumnFlags, FORMAT_VERSION};
pub use column_type::{ColumnType, ColumnTypeParseError};
pub use config::{CodecConfig, PayloadEncoding, DEFAULT_MAX_PAYLOAD_BYTES};
pub use error::{CodecError, SchemaError, SchemaResult, ValidationError};
pub use schema::{ColumnKind, ColumnSchema, ColumnSchemaBuilder};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_field_changes_break_equality() {
        let build = |t: ColumnType, s: Option<i32>, p: Option<i32>, len: Option<i32>, auto: bool| {
            let mut builder = ColumnSchema::builder("c", t).unwrap().auto_increment(auto);
            if let Some(s) = s {
                builder = builder.scale(s).unwrap();
            }
            if let Some(p) = p {
                builder = builder.precision(p).unwrap();
            }
            if let Some(len) = len {
                builder = builder.max_length(len).unwrap();
            }
            builder.build().unwrap()
        };

        let decimal = build(ColumnType::Decimal, Some(2), Some(10), None, false);
        assert_ne!(decimal, build(ColumnType::Decimal, Some(3), Some(10), None, false));
        assert_ne!(decimal, build(ColumnType::Decimal, Some(2), Some(11), None, false));

        let string = build(ColumnType::String, None, None, Some(10), false);
        assert_ne!(string, build(ColumnType::String, None, None, Some(11), false));
        assert_ne!(string, build(ColumnType::String, None, None, None, false));
        assert_ne!(string, build(ColumnType::Binary, None, None, Some(10), false));

        let long = build(ColumnType::Long, None, None, None, false);
        assert_ne!(long, build(ColumnType::Long, None, None, None, true));
        assert_ne!(long, build(ColumnType::ULong, None, None, None, false));
    }
}
