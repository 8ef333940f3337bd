//! SQL type to Terraform column type mapping

/// Aliases the provider expects in canonical form. Matched case-insensitively and
/// exactly; parameterized and unknown types pass through unchanged.
const TYPE_MAP: &[(&str, &str)] = &[
    ("INT", "NUMBER(38,0)"),
    ("INTEGER", "NUMBER(38,0)"),
    ("BIGINT", "NUMBER(38,0)"),
    ("SMALLINT", "NUMBER(38,0)"),
    ("TINYINT", "NUMBER(38,0)"),
    ("BYTEINT", "NUMBER(38,0)"),
    ("FLOAT", "FLOAT"),
    ("DOUBLE", "FLOAT"),
    ("REAL", "FLOAT"),
    ("TEXT", "VARCHAR(16777216)"),
    ("STRING", "VARCHAR(16777216)"),
    ("BINARY", "BINARY"),
    ("VARBINARY", "BINARY"),
    ("BOOLEAN", "BOOLEAN"),
    ("BOOL", "BOOLEAN"),
    ("DATE", "DATE"),
    ("DATETIME", "TIMESTAMP_NTZ(9)"),
    ("TIMESTAMP", "TIMESTAMP_NTZ(9)"),
    ("TIME", "TIME(9)"),
    ("VARIANT", "VARIANT"),
    ("OBJECT", "OBJECT"),
    ("ARRAY", "ARRAY"),
];

/// Map a SQL column type to the type written in `column` blocks
pub fn map_data_type(sql_type: &str) -> String {
    let trimmed = sql_type.trim();
    TYPE_MAP
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
        .map(|(_, mapped)| mapped.to_string())
        .unwrap_or_else(|| sql_type.to_string())
}
