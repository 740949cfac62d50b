//! Shared SQLSTATE conflict classification used by every Creator (spec §4.8):
//! "known conflict (SQLSTATE 42P06/42P07/42710/42723 etc.) -> skipped with
//! reason 'already exists'; any other failure -> errors".

/// `duplicate_table`, `duplicate_object`, `duplicate_object` (schema/type),
/// `duplicate_function` (and their near neighbors) — the codes PostgreSQL
/// raises for "this already exists".
pub const CONFLICT_SQLSTATES: &[&str] = &["42P06", "42P07", "42710", "42723"];

pub fn is_conflict(sqlstate: Option<&str>) -> bool {
    sqlstate.map(|code| CONFLICT_SQLSTATES.contains(&code)).unwrap_or(false)
}

pub fn sqlstate_of(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_conflict_codes_are_recognized() {
        assert!(is_conflict(Some("42P07")));
        assert!(is_conflict(Some("42710")));
    }

    #[test]
    fn unrelated_codes_are_not_conflicts() {
        assert!(!is_conflict(Some("23505")));
        assert!(!is_conflict(None));
    }
}
