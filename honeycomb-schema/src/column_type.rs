//! Column type tags understood by the storage adapter

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical data type of a column.
///
/// This is the closed set of scalar kinds the backing store can encode.
/// Integer SQL types collapse to `Long`/`ULong`, floating types to `Double`,
/// and char/varchar/blob types to `String`/`Binary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Long,
    ULong,
    Double,
    Decimal,
    String,
    Binary,
    Date,
    Time,
    DateTime,
}

impl ColumnType {
    /// All column types, in wire tag order.
    pub const ALL: [ColumnType; 9] = [
        ColumnType::Long,
        ColumnType::ULong,
        ColumnType::Double,
        ColumnType::Decimal,
        ColumnType::String,
        ColumnType::Binary,
        ColumnType::Date,
        ColumnType::Time,
        ColumnType::DateTime,
    ];

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Long => "LONG",
            ColumnType::ULong => "ULONG",
            ColumnType::Double => "DOUBLE",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::String => "STRING",
            ColumnType::Binary => "BINARY",
            ColumnType::Date => "DATE",
            ColumnType::Time => "TIME",
            ColumnType::DateTime => "DATETIME",
        }
    }

    /// Whether columns of this type carry scale and precision.
    pub fn is_decimal(&self) -> bool {
        matches!(self, ColumnType::Decimal)
    }

    /// Whether columns of this type may carry a maximum byte length.
    pub fn is_variable_length(&self) -> bool {
        matches!(self, ColumnType::String | ColumnType::Binary)
    }

    /// Whether a column of this type may be auto-increment.
    pub fn supports_auto_increment(&self) -> bool {
        !self.is_decimal()
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid column type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTypeParseError(pub String);

impl fmt::Display for ColumnTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid column type: {}", self.0)
    }
}

impl std::error::Error for ColumnTypeParseError {}

impl FromStr for ColumnType {
    type Err = ColumnTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "long" => Ok(ColumnType::Long),
            "ulong" => Ok(ColumnType::ULong),
            "double" => Ok(ColumnType::Double),
            "decimal" => Ok(ColumnType::Decimal),
            "string" => Ok(ColumnType::String),
            "binary" => Ok(ColumnType::Binary),
            "date" => Ok(ColumnType::Date),
            "time" => Ok(ColumnType::Time),
            "datetime" => Ok(ColumnType::DateTime),
            _ => Err(ColumnTypeParseError(s.to_string())),
        }
    }
}

fn normalize_token(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_from_str_agree() {
        for column_type in ColumnType::ALL {
            let parsed: ColumnType = column_type.to_string().parse().unwrap();
            assert_eq!(parsed, column_type);
        }
    }

    #[test]
    fn test_from_str_is_lenient_about_case_and_separators() {
        assert_eq!("date_time".parse::<ColumnType>(), Ok(ColumnType::DateTime));
        assert_eq!("U-Long".parse::<ColumnType>(), Ok(ColumnType::ULong));
        assert_eq!(" decimal ".parse::<ColumnType>(), Ok(ColumnType::Decimal));
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "varchar".parse::<ColumnType>().unwrap_err();
        assert_eq!(err, ColumnTypeParseError("varchar".to_string()));
        assert_eq!(err.to_string(), "Invalid column type: varchar");
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&ColumnType::DateTime).unwrap();
        assert_eq!(json, "\"DATETIME\"");
        let json = serde_json::to_string(&ColumnType::ULong).unwrap();
        assert_eq!(json, "\"ULONG\"");
        for column_type in ColumnType::ALL {
            let json = serde_json::to_string(&column_type).unwrap();
            assert_eq!(json, format!("\"{}\"", column_type.as_str()));
            let back: ColumnType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, column_type);
        }
    }

    #[test]
    fn test_type_predicates() {
        assert!(ColumnType::Decimal.is_decimal());
        assert!(!ColumnType::Decimal.supports_auto_increment());
        assert!(ColumnType::String.is_variable_length());
        assert!(ColumnType::Binary.is_variable_length());
        assert!(!ColumnType::Long.is_variable_length());
        assert!(ColumnType::Double.supports_auto_increment());
    }
}
