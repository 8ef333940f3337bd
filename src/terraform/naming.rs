//! Resource identifiers and schema/database references

use crate::model::QualifiedName;

/// Expression every resource with a database uses for its `database` attribute
pub const DATABASE_REFERENCE: &str = "local.databases[var.DATABASE]";

/// Turn an object name into a Terraform identifier.
///
/// Uppercased; every character outside `[A-Z0-9_]` becomes `_`; a leading digit is
/// prefixed with `_`.
pub fn resource_identifier(name: &str) -> String {
    let mut identifier: String = name
        .chars()
        .map(|c| {
            let upper = c.to_ascii_uppercase();
            if upper.is_ascii_uppercase() || upper.is_ascii_digit() || upper == '_' {
                upper
            } else {
                '_'
            }
        })
        .collect();
    if identifier.starts_with(|c: char| c.is_ascii_digit()) {
        identifier.insert(0, '_');
    }
    identifier
}

/// Schema identifier with the first matching environment suffix removed
pub fn normalize_schema(schema: &str, suffixes: &[String]) -> String {
    let identifier = resource_identifier(schema);
    for suffix in suffixes {
        let suffix = resource_identifier(suffix);
        if let Some(stripped) = identifier.strip_suffix(suffix.as_str()) {
            if !stripped.is_empty() {
                return stripped.to_string();
            }
        }
    }
    identifier
}

/// Resource name for an object: `<SCHEMA>_<NAME>` when prefixing and a schema is
/// present, otherwise `<NAME>`.
pub fn resource_name(name: &QualifiedName, schema_prefix: bool, suffixes: &[String]) -> String {
    let object = resource_identifier(&name.name);
    match name.schema.as_deref() {
        Some(schema) if schema_prefix => {
            format!("{}_{}", normalize_schema(schema, suffixes), object)
        }
        _ => object,
    }
}

/// `snowflake_schema.<SCHEMA>.name`
pub fn schema_reference(schema: &str, suffixes: &[String]) -> String {
    format!("snowflake_schema.{}.name", normalize_schema(schema, suffixes))
}
