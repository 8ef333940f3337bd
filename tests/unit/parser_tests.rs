//! Unit tests for the Snowflake DDL parser
//!
//! These go through the public parsing API: whole scripts via `parse`/`parse_ddl`
//! and single statements via the per-object extractors.

use snowflake_tf::model::{ConstraintKind, DdlObject, ExecuteAs};
use snowflake_tf::parser::identifier_utils::{split_qualified_name, split_top_level_commas};
use snowflake_tf::parser::{
    parse, parse_create_procedure, parse_create_table, parse_create_view, parse_ddl,
};
use snowflake_tf::DdlParseError;

// ============================================================================
// Script Level
// ============================================================================

#[test]
fn test_scenario_single_table() {
    let objects = parse("CREATE TABLE t (id NUMBER(38,0) NOT NULL, name VARCHAR(50));");
    assert_eq!(objects.len(), 1);
    let DdlObject::Table(table) = &objects[0] else {
        panic!("expected a table, got {:?}", objects[0]);
    };
    assert_eq!(table.name.name, "t");
    assert_eq!(table.columns.len(), 2);
    assert!(!table.columns[0].nullable);
    assert!(table.columns[1].nullable);
    assert_eq!(table.columns[1].data_type, "VARCHAR(50)");
}

#[test]
fn test_scenario_select_only_yields_nothing() {
    let output = parse_ddl("SELECT * FROM t;");
    assert!(output.objects.is_empty());
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_objects_keep_statement_order() {
    let objects = parse(
        "CREATE PROCEDURE p() RETURNS INT AS 'SELECT 1';\n\
         CREATE SECURE VIEW v AS SELECT 1;\n\
         ALTER TABLE t ADD COLUMN x INT;\n\
         CREATE TABLE t (id INT);",
    );
    let kinds: Vec<&str> = objects.iter().map(DdlObject::type_name).collect();
    assert_eq!(kinds, vec!["PROCEDURE", "VIEW", "TABLE"]);
}

#[test]
fn test_malformed_statements_reported_with_lines() {
    let sql = "CREATE TABLE ok (id INT);\n\
               CREATE TABLE broken;\n\
               CREATE VIEW no_body;\n\
               CREATE TABLE also_ok (id INT);";
    let output = parse_ddl(sql);
    assert_eq!(output.objects.len(), 2);
    assert_eq!(output.diagnostics.len(), 2);

    assert_eq!(output.diagnostics[0].line, 2);
    assert_eq!(output.diagnostics[0].error, DdlParseError::MissingColumnList);
    assert_eq!(output.diagnostics[1].line, 3);
    assert_eq!(
        output.diagnostics[1].error,
        DdlParseError::MissingBody { object: "VIEW" }
    );
    assert!(output.diagnostics[1].to_string().starts_with("line 3: "));
}

// ============================================================================
// Identifier Helpers
// ============================================================================

#[test]
fn test_split_top_level_commas() {
    assert_eq!(split_top_level_commas("a(1,2), b"), vec!["a(1,2)", "b"]);
    assert_eq!(
        split_top_level_commas("x DEFAULT 'a,b', \"c,d\" INT"),
        vec!["x DEFAULT 'a,b'", "\"c,d\" INT"]
    );
}

#[test]
fn test_qualified_name_by_part_count() {
    let three = split_qualified_name("db.sales.orders");
    assert_eq!(three.database.as_deref(), Some("db"));
    assert_eq!(three.schema.as_deref(), Some("sales"));
    assert_eq!(three.name, "orders");

    let quoted = split_qualified_name("\"My.Schema\".\"Order Items\"");
    assert_eq!(quoted.database, None);
    assert_eq!(quoted.schema.as_deref(), Some("My.Schema"));
    assert_eq!(quoted.name, "Order Items");
}

// ============================================================================
// Tables
// ============================================================================

#[test]
fn test_table_with_quoted_names_and_if_not_exists() {
    let table = parse_create_table(
        "CREATE TABLE IF NOT EXISTS \"Sales\".\"Order Items\" (\"Line No\" INT, note TEXT)",
    )
    .unwrap();
    assert_eq!(table.name.schema.as_deref(), Some("Sales"));
    assert_eq!(table.name.name, "Order Items");
    assert_eq!(table.columns[0].name, "Line No");
    assert_eq!(table.columns[1].data_type, "TEXT");
}

#[test]
fn test_table_defaults_and_comments() {
    let table = parse_create_table(
        "CREATE TABLE t (\n\
           status VARCHAR(20) DEFAULT 'new order' COMMENT 'It''s the status',\n\
           amount NUMBER(10, 2) DEFAULT 0.00,\n\
           loaded_at TIMESTAMP_NTZ DEFAULT CURRENT_TIMESTAMP()\n\
         ) COMMENT = 'Orders (raw)' CLUSTER BY (loaded_at, status)",
    )
    .unwrap();

    assert_eq!(table.columns[0].default_value.as_deref(), Some("'new order'"));
    assert_eq!(table.columns[0].comment.as_deref(), Some("It's the status"));
    assert_eq!(table.columns[1].data_type, "NUMBER(10, 2)");
    assert_eq!(table.columns[1].default_value.as_deref(), Some("0.00"));
    assert_eq!(
        table.columns[2].default_value.as_deref(),
        Some("CURRENT_TIMESTAMP()")
    );
    assert_eq!(table.comment.as_deref(), Some("Orders (raw)"));
    assert_eq!(
        table.cluster_by,
        Some(vec!["loaded_at".to_string(), "status".to_string()])
    );
}

#[test]
fn test_table_constraint_names() {
    let table = parse_create_table(
        "CREATE TABLE line_items (\n\
           id INT PRIMARY KEY,\n\
           sku VARCHAR UNIQUE,\n\
           order_id INT REFERENCES orders (id),\n\
           UNIQUE (order_id, sku),\n\
           CONSTRAINT fk_sku FOREIGN KEY (sku) REFERENCES catalog.products (sku) RELY\n\
         )",
    )
    .unwrap();

    let names: Vec<&str> = table.constraints.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "LINE_ITEMS_PK",
            "LINE_ITEMS_UK",
            "LINE_ITEMS_FK",
            "LINE_ITEMS_UK_2",
            "fk_sku"
        ]
    );

    let inline_fk = &table.constraints[2];
    assert_eq!(inline_fk.kind, ConstraintKind::ForeignKey);
    assert_eq!(inline_fk.columns, vec!["order_id"]);
    let reference = inline_fk.references.as_ref().unwrap();
    assert_eq!(reference.table.name, "orders");
    assert_eq!(reference.columns, vec!["id"]);

    let named_fk = &table.constraints[4];
    assert_eq!(named_fk.properties.rely, Some(true));
    let reference = named_fk.references.as_ref().unwrap();
    assert_eq!(reference.table.schema.as_deref(), Some("catalog"));
}

// ============================================================================
// Views
// ============================================================================

#[test]
fn test_view_query_keeps_comments_and_terminator() {
    let view = parse_create_view(
        "CREATE OR REPLACE VIEW analytics.v AS\n\
         -- recent orders only\n\
         SELECT * FROM orders WHERE created_at > DATEADD(day, -7, CURRENT_DATE())",
    )
    .unwrap();
    assert!(view.or_replace);
    assert!(!view.secure);
    assert_eq!(
        view.query,
        "-- recent orders only\nSELECT * FROM orders WHERE created_at > DATEADD(day, -7, CURRENT_DATE());"
    );
}

#[test]
fn test_view_column_list() {
    let view = parse_create_view(
        "CREATE VIEW IF NOT EXISTS v (id COMMENT 'key', \"Total Amount\") AS SELECT id, amount FROM t;",
    )
    .unwrap();
    assert_eq!(
        view.columns,
        Some(vec!["id".to_string(), "Total Amount".to_string()])
    );
    assert_eq!(view.query, "SELECT id, amount FROM t;");
}

// ============================================================================
// Procedures
// ============================================================================

#[test]
fn test_scenario_procedure() {
    let procedure = parse_create_procedure(
        "CREATE PROCEDURE p(x NUMBER DEFAULT 1) RETURNS STRING LANGUAGE SQL AS $$ SELECT 1; $$",
    )
    .unwrap();
    assert_eq!(procedure.parameters.len(), 1);
    assert_eq!(procedure.parameters[0].name, "x");
    assert_eq!(procedure.parameters[0].data_type, "NUMBER");
    assert_eq!(procedure.parameters[0].default_value.as_deref(), Some("1"));
    assert_eq!(procedure.return_type.as_deref(), Some("STRING"));
    assert_eq!(procedure.language, "SQL");
    assert_eq!(procedure.body, "SELECT 1;");
}

#[test]
fn test_procedure_parameter_types_with_parentheses() {
    let procedure = parse_create_procedure(
        "CREATE OR REPLACE PROCEDURE util.load(\"Batch Id\" NUMBER(38,0), label VARCHAR(100) DEFAULT 'x, y')\n\
         RETURNS NUMBER(38,0)\n\
         LANGUAGE JAVASCRIPT\n\
         EXECUTE AS OWNER\n\
         AS '\n  return 1;\n'",
    )
    .unwrap();
    assert_eq!(procedure.name.schema.as_deref(), Some("util"));
    assert_eq!(procedure.parameters[0].name, "Batch Id");
    assert_eq!(procedure.parameters[0].data_type, "NUMBER(38,0)");
    assert_eq!(procedure.parameters[1].data_type, "VARCHAR(100)");
    assert_eq!(procedure.parameters[1].default_value.as_deref(), Some("'x, y'"));
    assert_eq!(procedure.return_type.as_deref(), Some("NUMBER(38,0)"));
    assert!(procedure.is_javascript());
    assert_eq!(procedure.execute_as, Some(ExecuteAs::Owner));
    assert_eq!(procedure.body, "return 1;");
}

#[test]
fn test_procedure_without_parameter_list() {
    let output = parse_ddl("CREATE PROCEDURE p RETURNS INT AS 'SELECT 1';");
    assert!(output.objects.is_empty());
    assert_eq!(
        output.diagnostics[0].error,
        DdlParseError::MissingParameterList
    );
}
