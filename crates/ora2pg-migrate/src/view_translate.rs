//! A small, best-effort translator from Oracle view-definition SQL to
//! PostgreSQL (spec §4.8's `ViewImplementationCreator`). Views are plain
//! `SELECT` statements, not procedural PL/SQL, so unlike functions/type
//! methods/triggers they don't need the stub-forever treatment — a handful
//! of textual substitutions for the Oracle idioms that appear in almost
//! every view body cover most real cases. Anything this misses still
//! compiles (or fails loudly as a per-item Creator error, not silently).

/// Case-insensitive whole-word replacement, since `sql` may mix case the
/// way hand-written Oracle view bodies usually do.
fn replace_word(sql: &str, word: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut rest = sql;
    let word_upper = word.to_uppercase();

    while let Some(pos) = rest.to_uppercase().find(&word_upper) {
        let before_ok = pos == 0 || !rest.as_bytes()[pos - 1].is_ascii_alphanumeric() && rest.as_bytes()[pos - 1] != b'_';
        let after = pos + word.len();
        let after_ok = after >= rest.len() || !rest.as_bytes()[after].is_ascii_alphanumeric() && rest.as_bytes()[after] != b'_';

        out.push_str(&rest[..pos]);
        if before_ok && after_ok {
            out.push_str(replacement);
        } else {
            out.push_str(&rest[pos..after]);
        }
        rest = &rest[after..];
    }
    out.push_str(rest);
    out
}

pub fn translate_view_sql(oracle_sql: &str) -> String {
    let mut sql = oracle_sql.to_string();
    sql = replace_word(&sql, "SYSDATE", "CURRENT_TIMESTAMP");
    sql = replace_word(&sql, "SYSTIMESTAMP", "CURRENT_TIMESTAMP");
    sql = replace_word(&sql, "NVL", "COALESCE");
    sql = replace_word(&sql, "DUAL", "(SELECT 1) AS dual");
    sql
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nvl_becomes_coalesce() {
        assert_eq!(translate_view_sql("SELECT NVL(a, 0) FROM t"), "SELECT COALESCE(a, 0) FROM t");
    }

    #[test]
    fn sysdate_becomes_current_timestamp() {
        assert_eq!(translate_view_sql("SELECT SYSDATE FROM t"), "SELECT CURRENT_TIMESTAMP FROM t");
    }

    #[test]
    fn does_not_replace_inside_longer_identifiers() {
        assert_eq!(translate_view_sql("SELECT dual_column FROM t"), "SELECT dual_column FROM t");
    }
}
