//! Column-type mapping (spec §4.6).

/// Whether a length was declared in characters or bytes (`VARCHAR2(n CHAR|BYTE)`).
/// PostgreSQL's `varchar(n)` is always character-based, so this is carried
/// only for completeness; it does not change the mapped type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharSemantics {
    Char,
    Byte,
}

/// Everything `map_column_type` needs about one Oracle column.
#[derive(Debug, Clone)]
pub struct ColumnTypeInput<'a> {
    /// The bare Oracle type keyword, e.g. `"NUMBER"`, `"VARCHAR2"`, `"TIMESTAMP WITH TIME ZONE"`.
    pub oracle_type: &'a str,
    pub length: Option<u32>,
    pub char_semantics: Option<CharSemantics>,
    pub precision: Option<u32>,
    pub scale: Option<i32>,
}

impl<'a> ColumnTypeInput<'a> {
    pub fn new(oracle_type: &'a str) -> Self {
        Self {
            oracle_type,
            length: None,
            char_semantics: None,
            precision: None,
            scale: None,
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision_scale(mut self, precision: u32, scale: i32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }
}

/// An Oracle type this mapper has no rule for. Callers attach this to
/// `CreationOutcome` as a warning rather than treating it as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unmapped {
    pub oracle_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedType {
    Mapped(String),
    Unmapped(Unmapped),
}

impl MappedType {
    pub fn mapped(sql_type: impl Into<String>) -> Self {
        MappedType::Mapped(sql_type.into())
    }

    pub fn as_mapped(&self) -> Option<&str> {
        match self {
            MappedType::Mapped(s) => Some(s.as_str()),
            MappedType::Unmapped(_) => None,
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, MappedType::Mapped(_))
    }
}

/// Maps `NUMBER(p,s)` per spec §4.6's precision/scale table.
fn map_number(precision: Option<u32>, scale: Option<i32>) -> String {
    let p = match precision {
        Some(p) => p,
        None => return "numeric".to_string(),
    };
    let s = scale.unwrap_or(0);
    if s > 0 {
        format!("numeric({p},{s})")
    } else if p <= 4 {
        "smallint".to_string()
    } else if p <= 9 {
        "integer".to_string()
    } else if p <= 18 {
        "bigint".to_string()
    } else {
        format!("numeric({p})")
    }
}

/// Translates one Oracle column type to its PostgreSQL equivalent, or an
/// `Unmapped` warning when no rule applies. `object_type_lookup` resolves a
/// type name to `Some(schema)` when it is a known Oracle object type (user
/// defined composite type), so it maps to the identically-named composite
/// type in that (lower-cased) schema rather than failing as unmapped.
pub fn map_column_type(input: &ColumnTypeInput, object_type_lookup: impl Fn(&str) -> Option<String>) -> MappedType {
    let ty = input.oracle_type.trim().to_uppercase();

    match ty.as_str() {
        "NUMBER" => MappedType::mapped(map_number(input.precision, input.scale)),
        "FLOAT" => MappedType::mapped("double precision"),
        "VARCHAR2" => MappedType::mapped(format!("varchar({})", input.length.unwrap_or(1))),
        "NVARCHAR2" => MappedType::mapped(format!("varchar({})", input.length.unwrap_or(1))),
        "CHAR" => MappedType::mapped(format!("char({})", input.length.unwrap_or(1))),
        "NCHAR" => MappedType::mapped(format!("char({})", input.length.unwrap_or(1))),
        "CLOB" | "NCLOB" | "LONG" => MappedType::mapped("text"),
        "BLOB" | "RAW" | "LONG RAW" | "BFILE" => MappedType::mapped("bytea"),
        "DATE" => MappedType::mapped("timestamp(0)"),
        "TIMESTAMP" => match input.precision {
            Some(p) => MappedType::mapped(format!("timestamp({p})")),
            None => MappedType::mapped("timestamp(0)"),
        },
        "TIMESTAMP WITH TIME ZONE" => MappedType::mapped("timestamptz"),
        "TIMESTAMP WITH LOCAL TIME ZONE" => MappedType::mapped("timestamptz"),
        "INTERVAL YEAR TO MONTH" => MappedType::mapped("interval year to month"),
        "INTERVAL DAY TO SECOND" => MappedType::mapped("interval day to second"),
        "XMLTYPE" => MappedType::mapped("xml"),
        "ROWID" | "UROWID" => MappedType::mapped("text"),
        other => match object_type_lookup(other) {
            Some(schema) => MappedType::mapped(format!("{}.{}", schema.to_lowercase(), crate::map_identifier(other))),
            None => MappedType::Unmapped(Unmapped {
                oracle_type: input.oracle_type.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_object_types(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn number_10_0_maps_to_bigint() {
        let input = ColumnTypeInput::new("NUMBER").with_precision_scale(10, 0);
        assert_eq!(
            map_column_type(&input, no_object_types).as_mapped(),
            Some("bigint")
        );
    }

    #[test]
    fn number_5_2_maps_to_numeric_5_2() {
        let input = ColumnTypeInput::new("NUMBER").with_precision_scale(5, 2);
        assert_eq!(
            map_column_type(&input, no_object_types).as_mapped(),
            Some("numeric(5,2)")
        );
    }

    #[test]
    fn number_without_precision_maps_to_bare_numeric() {
        let input = ColumnTypeInput::new("NUMBER");
        assert_eq!(map_column_type(&input, no_object_types).as_mapped(), Some("numeric"));
    }

    #[test]
    fn small_integral_numbers_map_to_smallint() {
        let input = ColumnTypeInput::new("NUMBER").with_precision_scale(3, 0);
        assert_eq!(map_column_type(&input, no_object_types).as_mapped(), Some("smallint"));
    }

    #[test]
    fn mid_integral_numbers_map_to_integer() {
        let input = ColumnTypeInput::new("NUMBER").with_precision_scale(9, 0);
        assert_eq!(map_column_type(&input, no_object_types).as_mapped(), Some("integer"));
    }

    #[test]
    fn large_precision_with_no_scale_maps_to_numeric_p() {
        let input = ColumnTypeInput::new("NUMBER").with_precision_scale(30, 0);
        assert_eq!(map_column_type(&input, no_object_types).as_mapped(), Some("numeric(30)"));
    }

    #[test]
    fn date_maps_to_timestamp_zero() {
        let input = ColumnTypeInput::new("DATE");
        assert_eq!(map_column_type(&input, no_object_types).as_mapped(), Some("timestamp(0)"));
    }

    #[test]
    fn long_is_treated_as_a_lob_mapping_to_text() {
        let input = ColumnTypeInput::new("LONG");
        assert_eq!(map_column_type(&input, no_object_types).as_mapped(), Some("text"));
    }

    #[test]
    fn unknown_type_without_object_type_match_is_unmapped() {
        let input = ColumnTypeInput::new("SOME_UNKNOWN_TYPE");
        let result = map_column_type(&input, no_object_types);
        assert!(!result.is_mapped());
    }

    #[test]
    fn user_defined_object_type_maps_to_composite_type_in_lowercased_schema() {
        let input = ColumnTypeInput::new("ADDRESS_T");
        let result = map_column_type(&input, |name| {
            (name == "ADDRESS_T").then(|| "HR".to_string())
        });
        assert_eq!(result.as_mapped(), Some("hr.address_t"));
    }
}
