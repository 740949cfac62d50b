//! Default-expression mapping (spec §4.6): a fixed recognizer table for the
//! handful of default forms the source schema actually uses; anything else
//! is reported as `Unmapped` so the Creator can create the column without a
//! default and attach the warning to its `CreationOutcome`.

use crate::identifier::map_identifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmappedDefault {
    pub oracle_default: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedDefault {
    Mapped(String),
    Unmapped(UnmappedDefault),
}

impl MappedDefault {
    pub fn as_mapped(&self) -> Option<&str> {
        match self {
            MappedDefault::Mapped(s) => Some(s.as_str()),
            MappedDefault::Unmapped(_) => None,
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, MappedDefault::Mapped(_))
    }
}

/// `schema` is the schema the owning column's table lives in, used to
/// qualify a `<sequence>.NEXTVAL` translation.
pub fn map_default_expression(expr: &str, schema: &str) -> MappedDefault {
    let trimmed = expr.trim();
    let upper = trimmed.to_uppercase();

    match upper.as_str() {
        "SYSDATE" | "SYSTIMESTAMP" => return MappedDefault::Mapped("CURRENT_TIMESTAMP".to_string()),
        "USER" => return MappedDefault::Mapped("CURRENT_USER".to_string()),
        _ => {}
    }

    if let Some(stripped_len) = upper.strip_suffix(".NEXTVAL").map(str::len) {
        let seq_part = &trimmed[..stripped_len];
        let seq_ident = map_identifier(seq_part);
        return MappedDefault::Mapped(format!("nextval('{}.{}')", schema.to_lowercase(), seq_ident));
    }

    if is_numeric_literal(trimmed) {
        return MappedDefault::Mapped(trimmed.to_string());
    }

    if is_quoted_string_literal(trimmed) {
        return MappedDefault::Mapped(trimmed.to_string());
    }

    MappedDefault::Unmapped(UnmappedDefault {
        oracle_default: expr.to_string(),
    })
}

fn is_numeric_literal(s: &str) -> bool {
    !s.is_empty() && s.parse::<f64>().is_ok()
}

fn is_quoted_string_literal(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sysdate_maps_to_current_timestamp() {
        assert_eq!(
            map_default_expression("SYSDATE", "hr").as_mapped(),
            Some("CURRENT_TIMESTAMP")
        );
    }

    #[test]
    fn systimestamp_maps_to_current_timestamp() {
        assert_eq!(
            map_default_expression("SYSTIMESTAMP", "hr").as_mapped(),
            Some("CURRENT_TIMESTAMP")
        );
    }

    #[test]
    fn user_maps_to_current_user() {
        assert_eq!(map_default_expression("USER", "hr").as_mapped(), Some("CURRENT_USER"));
    }

    #[test]
    fn sequence_nextval_is_qualified_and_lowercased() {
        assert_eq!(
            map_default_expression("EMP_SEQ.NEXTVAL", "HR").as_mapped(),
            Some("nextval('hr.emp_seq')")
        );
    }

    #[test]
    fn numeric_literal_passes_through() {
        assert_eq!(map_default_expression("0", "hr").as_mapped(), Some("0"));
    }

    #[test]
    fn string_literal_passes_through() {
        assert_eq!(map_default_expression("'ACTIVE'", "hr").as_mapped(), Some("'ACTIVE'"));
    }

    #[test]
    fn unrecognized_expression_is_unmapped() {
        let result = map_default_expression("PKG.F()", "hr");
        assert!(!result.is_mapped());
        match result {
            MappedDefault::Unmapped(u) => assert_eq!(u.oracle_default, "PKG.F()"),
            _ => panic!("expected unmapped"),
        }
    }
}
