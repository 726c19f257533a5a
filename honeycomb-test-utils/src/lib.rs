//! Honeycomb Test Utilities
//!
//! Shared test infrastructure for column schemas:
//! - Proptest generators for column types and valid schemas
//! - Fixtures for the common column shapes
//! - Assertions for matching schema error variants

pub use honeycomb_schema::{
    CodecConfig, CodecError, ColumnFlags, ColumnKind, ColumnSchema, ColumnSchemaBuilder,
    ColumnType, PayloadEncoding, SchemaError, SchemaResult, ValidationError, FORMAT_VERSION,
};

/// Column name used by fixtures.
pub const TEST_COLUMN: &str = "testColumn";

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for column schema types.

    use super::*;
    use proptest::prelude::*;

    /// Generate any column type.
    pub fn arb_column_type() -> impl Strategy<Value = ColumnType> {
        proptest::sample::select(ColumnType::ALL.to_vec())
    }

    /// Generate a column type that carries no parameters.
    pub fn arb_fixed_width_type() -> impl Strategy<Value = ColumnType> {
        prop_oneof![
            Just(ColumnType::Long),
            Just(ColumnType::ULong),
            Just(ColumnType::Double),
            Just(ColumnType::Date),
            Just(ColumnType::Time),
            Just(ColumnType::DateTime),
        ]
    }

    /// Generate a type that may be auto-increment.
    pub fn arb_auto_increment_type() -> impl Strategy<Value = ColumnType> {
        arb_column_type().prop_filter("decimal cannot auto-increment", |t| {
            t.supports_auto_increment()
        })
    }

    /// Generate a non-empty column name.
    pub fn arb_column_name() -> impl Strategy<Value = String> {
        "[a-zA-Z_][a-zA-Z0-9_]{0,31}"
    }

    /// Generate a non-negative parameter value.
    pub fn arb_param() -> impl Strategy<Value = i32> {
        0i32..=i32::MAX
    }

    /// Generate a negative parameter value.
    pub fn arb_negative_param() -> impl Strategy<Value = i32> {
        i32::MIN..0
    }

    /// Generate a valid DECIMAL schema.
    pub fn arb_decimal_schema() -> impl Strategy<Value = ColumnSchema> {
        (arb_column_name(), 0i32..=30, 1i32..=65, any::<bool>()).prop_map(
            |(name, scale, precision, nullable)| {
                ColumnSchema::builder(name, ColumnType::Decimal)
                    .and_then(|b| b.scale(scale))
                    .and_then(|b| b.precision(precision))
                    .map(|b| b.nullable(nullable))
                    .and_then(|b| b.build())
                    .expect("generated decimal schema is valid")
            },
        )
    }

    /// Generate a valid STRING or BINARY schema, with or without max length.
    pub fn arb_variable_length_schema() -> impl Strategy<Value = ColumnSchema> {
        (
            arb_column_name(),
            prop_oneof![Just(ColumnType::String), Just(ColumnType::Binary)],
            proptest::option::of(arb_param()),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(name, column_type, max_length, nullable, auto_increment)| {
                let builder = ColumnSchema::builder(name, column_type)
                    .expect("generated name is non-empty")
                    .nullable(nullable)
                    .auto_increment(auto_increment);
                let built = match max_length {
                    Some(len) => builder.max_length(len).and_then(|b| b.build()),
                    None => builder.build(),
                };
                built.expect("generated variable-length schema is valid")
            })
    }

    /// Generate a valid schema of a parameterless type.
    pub fn arb_fixed_width_schema() -> impl Strategy<Value = ColumnSchema> {
        (
            arb_column_name(),
            arb_fixed_width_type(),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(name, column_type, nullable, auto_increment)| {
                ColumnSchema::builder(name, column_type)
                    .expect("generated name is non-empty")
                    .nullable(nullable)
                    .auto_increment(auto_increment)
                    .build()
                    .expect("generated fixed-width schema is valid")
            })
    }

    /// Generate any valid schema.
    pub fn arb_column_schema() -> impl Strategy<Value = ColumnSchema> {
        prop_oneof![
            arb_decimal_schema(),
            arb_variable_length_schema(),
            arb_fixed_width_schema(),
        ]
    }

    /// Generate a codec config with a payload limit large enough for any schema.
    pub fn arb_codec_config() -> impl Strategy<Value = CodecConfig> {
        (
            prop_oneof![Just(PayloadEncoding::Binary), Just(PayloadEncoding::Json)],
            256usize..=8192,
        )
            .prop_map(|(encoding, max_payload_bytes)| CodecConfig {
                encoding,
                max_payload_bytes,
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built schemas for common testing scenarios.

    use super::*;

    /// `ULONG` column with default settings.
    pub fn ulong_column() -> ColumnSchema {
        ColumnSchema::builder(TEST_COLUMN, ColumnType::ULong)
            .and_then(|b| b.build())
            .expect("ulong fixture is valid")
    }

    /// Non-null `DECIMAL(precision, scale)` column.
    pub fn decimal_column(precision: i32, scale: i32) -> ColumnSchema {
        ColumnSchema::builder(TEST_COLUMN, ColumnType::Decimal)
            .and_then(|b| b.scale(scale))
            .and_then(|b| b.precision(precision))
            .map(|b| b.nullable(false))
            .and_then(|b| b.build())
            .expect("decimal fixture is valid")
    }

    /// `STRING(max_length)` column.
    pub fn string_column(max_length: i32) -> ColumnSchema {
        ColumnSchema::builder(TEST_COLUMN, ColumnType::String)
            .and_then(|b| b.max_length(max_length))
            .and_then(|b| b.build())
            .expect("string fixture is valid")
    }

    /// Non-null auto-increment `LONG` primary-key style column.
    pub fn auto_increment_id() -> ColumnSchema {
        ColumnSchema::builder("id", ColumnType::Long)
            .map(|b| b.nullable(false).auto_increment(true))
            .and_then(|b| b.build())
            .expect("id fixture is valid")
    }

    /// Binary encoding of `column` with one byte replaced.
    pub fn corrupted_bytes(column: &ColumnSchema, index: usize, byte: u8) -> Vec<u8> {
        let mut bytes = column.serialize();
        bytes[index] = byte;
        bytes
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for schema error variants.

    use super::*;

    /// Assert that a SchemaResult is `RequiredFieldMissing` for `field`.
    #[track_caller]
    pub fn assert_missing<T: std::fmt::Debug>(result: &SchemaResult<T>, field: &str) {
        match result {
            Err(SchemaError::Validation(ValidationError::RequiredFieldMissing { field: f })) => {
                assert_eq!(f, field, "Wrong field in RequiredFieldMissing");
            }
            other => panic!("Expected RequiredFieldMissing for {}, got: {:?}", field, other),
        }
    }

    /// Assert that a SchemaResult is `InvalidValue` for `field`.
    #[track_caller]
    pub fn assert_invalid<T: std::fmt::Debug>(result: &SchemaResult<T>, field: &str) {
        match result {
            Err(SchemaError::Validation(ValidationError::InvalidValue { field: f, .. })) => {
                assert_eq!(f, field, "Wrong field in InvalidValue");
            }
            other => panic!("Expected InvalidValue for {}, got: {:?}", field, other),
        }
    }

    /// Assert that a SchemaResult is a Codec error.
    #[track_caller]
    pub fn assert_codec_error<T: std::fmt::Debug>(result: &SchemaResult<T>) {
        match result {
            Err(SchemaError::Codec(_)) => {}
            other => panic!("Expected Codec error, got: {:?}", other),
        }
    }

    /// Assert that `schema` survives a round trip under `config`.
    #[track_caller]
    pub fn assert_roundtrip(schema: &ColumnSchema, config: &CodecConfig) {
        let bytes = schema.encode_with(config).expect("encode schema");
        let decoded = ColumnSchema::deserialize_with(&bytes, schema.column_name(), config)
            .expect("decode schema");
        assert_eq!(&decoded, schema, "Round trip changed the schema");
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fixtures_are_consistent() {
        let ulong = fixtures::ulong_column();
        assert_eq!(ulong.column_name(), TEST_COLUMN);
        assert!(ulong.is_nullable());

        let decimal = fixtures::decimal_column(10, 2);
        assert_eq!(decimal.precision(), Some(10));
        assert_eq!(decimal.scale(), Some(2));
        assert!(!decimal.is_nullable());

        assert_eq!(fixtures::string_column(64).max_length(), Some(64));

        let id = fixtures::auto_increment_id();
        assert!(id.is_auto_increment());
        assert!(!id.is_nullable());
    }

    #[test]
    fn test_corrupted_bytes_fixture() {
        let bytes = fixtures::corrupted_bytes(&fixtures::ulong_column(), 0, 0xFF);
        assertions::assert_codec_error(&ColumnSchema::deserialize(&bytes, TEST_COLUMN));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_generated_schemas_match_their_kind(schema in generators::arb_column_schema()) {
            prop_assert!(!schema.column_name().is_empty());
            prop_assert_eq!(schema.kind().column_type(), schema.column_type());
            if schema.column_type().is_decimal() {
                prop_assert!(schema.scale().is_some() && schema.precision().is_some());
                prop_assert!(!schema.is_auto_increment());
            } else {
                prop_assert!(schema.scale().is_none() && schema.precision().is_none());
            }
            if !schema.column_type().is_variable_length() {
                prop_assert!(schema.max_length().is_none());
            }
        }

        #[test]
        fn prop_generated_configs_are_valid(config in generators::arb_codec_config()) {
            prop_assert!(config.validate().is_ok());
        }
    }
}
