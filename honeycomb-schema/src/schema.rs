//! Column schema descriptor and its validating builder

use crate::{ColumnType, SchemaResult, ValidationError};
use std::fmt;
use tracing::debug;

/// Type-specific parameters of a column, keyed by its type.
///
/// Scale and precision exist only on `Decimal`, max length only on
/// `String`/`Binary`, so a built schema can never carry a parameter that
/// does not belong to its type. Parameter values are always non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Long,
    ULong,
    Double,
    Decimal { scale: i32, precision: i32 },
    String { max_length: Option<i32> },
    Binary { max_length: Option<i32> },
    Date,
    Time,
    DateTime,
}

impl ColumnKind {
    /// The type tag this kind belongs to.
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnKind::Long => ColumnType::Long,
            ColumnKind::ULong => ColumnType::ULong,
            ColumnKind::Double => ColumnType::Double,
            ColumnKind::Decimal { .. } => ColumnType::Decimal,
            ColumnKind::String { .. } => ColumnType::String,
            ColumnKind::Binary { .. } => ColumnType::Binary,
            ColumnKind::Date => ColumnType::Date,
            ColumnKind::Time => ColumnType::Time,
            ColumnKind::DateTime => ColumnType::DateTime,
        }
    }
}

/// Validated, immutable metadata for a single table column.
///
/// Only obtainable through [`ColumnSchemaBuilder::build`] or by decoding
/// bytes produced by [`ColumnSchema::serialize`]. Equality and hashing are
/// structural over every field, the name included.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnSchema {
    column_name: String,
    kind: ColumnKind,
    is_nullable: bool,
    is_auto_increment: bool,
}

impl ColumnSchema {
    /// Start building a schema for `column_name` of type `column_type`.
    ///
    /// Fails with `RequiredFieldMissing` if the name is empty.
    pub fn builder(
        column_name: impl Into<String>,
        column_type: ColumnType,
    ) -> SchemaResult<ColumnSchemaBuilder> {
        ColumnSchemaBuilder::new(column_name.into(), column_type)
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn column_type(&self) -> ColumnType {
        self.kind.column_type()
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }

    pub fn is_auto_increment(&self) -> bool {
        self.is_auto_increment
    }

    /// Decimal scale; `None` unless the column is `DECIMAL`.
    pub fn scale(&self) -> Option<i32> {
        match self.kind {
            ColumnKind::Decimal { scale, .. } => Some(scale),
            _ => None,
        }
    }

    /// Decimal precision; `None` unless the column is `DECIMAL`.
    pub fn precision(&self) -> Option<i32> {
        match self.kind {
            ColumnKind::Decimal { precision, .. } => Some(precision),
            _ => None,
        }
    }

    /// Maximum byte length; only ever set on `STRING` and `BINARY` columns.
    pub fn max_length(&self) -> Option<i32> {
        match self.kind {
            ColumnKind::String { max_length } | ColumnKind::Binary { max_length } => max_length,
            _ => None,
        }
    }
}

impl fmt::Display for ColumnSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column_name, self.column_type())?;
        match self.kind {
            ColumnKind::Decimal { scale, precision } => write!(f, "({},{})", precision, scale)?,
            ColumnKind::String {
                max_length: Some(len),
            }
            | ColumnKind::Binary {
                max_length: Some(len),
            } => write!(f, "({})", len)?,
            _ => {}
        }
        if !self.is_nullable {
            f.write_str(" NOT NULL")?;
        }
        if self.is_auto_increment {
            f.write_str(" AUTO_INCREMENT")?;
        }
        Ok(())
    }
}

/// Accumulates candidate column settings and validates them once in
/// [`build`](Self::build).
///
/// Setters only range-check their own argument; cross-field rules are
/// deferred to `build`.
#[derive(Debug, Clone)]
pub struct ColumnSchemaBuilder {
    column_name: String,
    column_type: ColumnType,
    is_nullable: bool,
    is_auto_increment: bool,
    scale: Option<i32>,
    precision: Option<i32>,
    max_length: Option<i32>,
}

impl ColumnSchemaBuilder {
    fn new(column_name: String, column_type: ColumnType) -> SchemaResult<Self> {
        if column_name.is_empty() {
            debug!(%column_type, "rejected column schema without a name");
            return Err(ValidationError::missing("column_name").into());
        }
        Ok(Self {
            column_name,
            column_type,
            is_nullable: true,
            is_auto_increment: false,
            scale: None,
            precision: None,
            max_length: None,
        })
    }

    /// Set the decimal scale (digits after the point).
    pub fn scale(mut self, scale: i32) -> SchemaResult<Self> {
        self.scale = Some(self.non_negative("scale", scale)?);
        Ok(self)
    }

    /// Set the decimal precision (total digits).
    pub fn precision(mut self, precision: i32) -> SchemaResult<Self> {
        self.precision = Some(self.non_negative("precision", precision)?);
        Ok(self)
    }

    /// Set the maximum byte length of a string or binary column.
    pub fn max_length(mut self, max_length: i32) -> SchemaResult<Self> {
        self.max_length = Some(self.non_negative("max_length", max_length)?);
        Ok(self)
    }

    /// Set whether the column accepts NULL (default: true).
    pub fn nullable(mut self, is_nullable: bool) -> Self {
        self.is_nullable = is_nullable;
        self
    }

    /// Set whether the column is auto-increment (default: false).
    pub fn auto_increment(mut self, is_auto_increment: bool) -> Self {
        self.is_auto_increment = is_auto_increment;
        self
    }

    /// Validate the accumulated settings and produce the schema.
    ///
    /// Checks run in a fixed order and the first violation wins:
    /// 1. `DECIMAL` needs scale and precision, and no max length.
    /// 2. `STRING`/`BINARY` take no scale or precision.
    /// 3. Every other type takes none of the three.
    /// 4. `DECIMAL` columns can never be auto-increment.
    pub fn build(self) -> SchemaResult<ColumnSchema> {
        match self.validate() {
            Ok(kind) => Ok(ColumnSchema {
                column_name: self.column_name,
                kind,
                is_nullable: self.is_nullable,
                is_auto_increment: self.is_auto_increment,
            }),
            Err(err) => {
                debug!(
                    column = %self.column_name,
                    column_type = %self.column_type,
                    error = %err,
                    "rejected column schema"
                );
                Err(err.into())
            }
        }
    }

    fn validate(&self) -> Result<ColumnKind, ValidationError> {
        let kind = match self.column_type {
            ColumnType::Decimal => {
                let scale = self.scale.ok_or_else(|| decimal_param_required("scale"))?;
                let precision = self
                    .precision
                    .ok_or_else(|| decimal_param_required("precision"))?;
                if let Some(max_length) = self.max_length {
                    return Err(ValidationError::invalid(
                        "max_length",
                        max_length,
                        "not allowed on DECIMAL columns",
                    ));
                }
                ColumnKind::Decimal { scale, precision }
            }
            ColumnType::String => {
                self.reject_decimal_params()?;
                ColumnKind::String {
                    max_length: self.max_length,
                }
            }
            ColumnType::Binary => {
                self.reject_decimal_params()?;
                ColumnKind::Binary {
                    max_length: self.max_length,
                }
            }
            ColumnType::Long => self.fixed_width(ColumnKind::Long)?,
            ColumnType::ULong => self.fixed_width(ColumnKind::ULong)?,
            ColumnType::Double => self.fixed_width(ColumnKind::Double)?,
            ColumnType::Date => self.fixed_width(ColumnKind::Date)?,
            ColumnType::Time => self.fixed_width(ColumnKind::Time)?,
            ColumnType::DateTime => self.fixed_width(ColumnKind::DateTime)?,
        };

        if self.is_auto_increment && !self.column_type.supports_auto_increment() {
            return Err(ValidationError::invalid(
                "is_auto_increment",
                true,
                &format!("{} columns cannot be auto-increment", self.column_type),
            ));
        }

        Ok(kind)
    }

    fn fixed_width(&self, kind: ColumnKind) -> Result<ColumnKind, ValidationError> {
        self.reject_decimal_params()?;
        match self.max_length {
            Some(max_length) => Err(ValidationError::invalid(
                "max_length",
                max_length,
                &format!("not allowed on {} columns", self.column_type),
            )),
            None => Ok(kind),
        }
    }

    fn reject_decimal_params(&self) -> Result<(), ValidationError> {
        let offending = match (self.scale, self.precision) {
            (Some(scale), _) => ("scale", scale),
            (None, Some(precision)) => ("precision", precision),
            (None, None) => return Ok(()),
        };
        Err(ValidationError::invalid(
            offending.0,
            offending.1,
            &format!("only allowed on DECIMAL columns, not {}", self.column_type),
        ))
    }

    fn non_negative(&self, field: &str, value: i32) -> SchemaResult<i32> {
        if value < 0 {
            debug!(column = %self.column_name, field, value, "rejected negative column parameter");
            return Err(ValidationError::invalid(field, value, "must be non-negative").into());
        }
        Ok(value)
    }
}

fn decimal_param_required(field: &str) -> ValidationError {
    ValidationError::invalid(field, "None", "required on DECIMAL columns")
}

// =============================================================================
// TESTS
// =============================================================================
