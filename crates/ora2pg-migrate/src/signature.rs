//! Parses the `signature` JSON string Extractors attach to
//! `FunctionOrProcedure`/`TypeMethod` (an ordered array of
//! `{name, type}`, with the return value – if any – named `(return)`), and
//! renders it into PostgreSQL parameter/return-type fragments for the stub
//! creators.

use serde::Deserialize;

use ora2pg_typemap::{map_column_type, map_identifier, ColumnTypeInput, MappedType};

#[derive(Deserialize)]
struct RawArg {
    name: String,
    #[serde(rename = "type")]
    oracle_type: String,
}

pub struct ParsedSignature {
    pub params: Vec<(String, String)>,
    pub return_type: Option<String>,
}

fn mapped_sql_type(oracle_type: &str) -> String {
    match map_column_type(&ColumnTypeInput::new(oracle_type), |_| None) {
        MappedType::Mapped(ty) => ty,
        MappedType::Unmapped(_) => "text".to_string(),
    }
}

pub fn parse_signature(signature_json: &str) -> ParsedSignature {
    let raw: Vec<RawArg> = serde_json::from_str(signature_json).unwrap_or_default();
    let mut params = Vec::new();
    let mut return_type = None;

    for arg in raw {
        let sql_type = mapped_sql_type(&arg.oracle_type);
        if arg.name == "(return)" {
            return_type = Some(sql_type);
        } else {
            params.push((map_identifier(&arg.name), sql_type));
        }
    }

    ParsedSignature { params, return_type }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_argument_is_separated_from_parameters() {
        let json = r#"[{"name":"p_id","type":"NUMBER"},{"name":"(return)","type":"VARCHAR2"}]"#;
        let parsed = parse_signature(json);
        assert_eq!(parsed.params.len(), 1);
        assert_eq!(parsed.params[0].0, "p_id");
        assert_eq!(parsed.return_type.as_deref(), Some("varchar(1)"));
    }

    #[test]
    fn malformed_signature_yields_no_parameters() {
        let parsed = parse_signature("not json");
        assert!(parsed.params.is_empty());
        assert!(parsed.return_type.is_none());
    }
}
