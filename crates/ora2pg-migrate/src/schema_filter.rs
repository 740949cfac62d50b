//! Schema-scoping helper shared by every Extractor (spec §4.7): "filtered to
//! configured schemas, optionally further filtered to a single test schema
//! when `do.all-schemas=false`".

use ora2pg_model::JobConfig;

pub struct SchemaFilter {
    pub all_schemas: bool,
    pub test_schema: Option<String>,
}

impl SchemaFilter {
    pub fn from_config(config: &JobConfig) -> Self {
        Self {
            all_schemas: config.do_all_schemas,
            test_schema: config.only_test_schema.clone(),
        }
    }

    /// A SQL predicate restricting `owner_column` to the configured scope.
    /// Oracle-maintained schemas (`SYS`, `SYSTEM`, component schemas) are
    /// excluded whenever every user schema is in play.
    pub fn owner_predicate(&self, owner_column: &str) -> String {
        if !self.all_schemas {
            if let Some(schema) = &self.test_schema {
                return format!("{owner_column} = '{}'", schema.to_uppercase());
            }
        }
        format!("{owner_column} NOT IN (SELECT username FROM all_users WHERE oracle_maintained = 'Y')")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_schemas_excludes_oracle_maintained_users() {
        let filter = SchemaFilter {
            all_schemas: true,
            test_schema: None,
        };
        assert!(filter.owner_predicate("owner").contains("NOT IN"));
    }

    #[test]
    fn single_test_schema_restricts_to_exact_owner() {
        let filter = SchemaFilter {
            all_schemas: false,
            test_schema: Some("hr".to_string()),
        };
        assert_eq!(filter.owner_predicate("owner"), "owner = 'HR'");
    }
}
