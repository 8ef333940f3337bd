//! End-to-end conversion tests: SQL text in, rendered Terraform out

use pretty_assertions::assert_eq;

use snowflake_tf::{convert_sql, ConvertOptions, ResourceKind};

use crate::common::{convert, load_fixture, resource};

// ============================================================================
// Core Scenarios
// ============================================================================

#[test]
fn test_view_depends_on_table_in_same_schema() {
    let conversion = convert("CREATE TABLE a (id NUMBER); CREATE VIEW v AS SELECT * FROM a;");
    assert_eq!(conversion.objects.len(), 2);
    assert_eq!(conversion.resources.len(), 2);

    let view = resource(&conversion, "snowflake_view.V");
    assert_eq!(view.dependencies, vec!["snowflake_table.A"]);
    assert!(view.content.ends_with("\n  depends_on = [snowflake_table.A]\n}\n"));
}

#[test]
fn test_procedure_scenario_renders_argument_and_body() {
    let conversion = convert(
        "CREATE PROCEDURE p(x NUMBER DEFAULT 1) RETURNS STRING LANGUAGE SQL AS $$ SELECT 1; $$;",
    );
    assert_eq!(
        conversion.output,
        r#"resource "snowflake_procedure" "P" {
  name = "p"
  language = "SQL"
  return_type = "STRING"

  argument {
    name = "x"
    type = "NUMBER"
    default_value = "1"
  }

  statement = <<-EOT
    SELECT 1;
  EOT
}
"#
    );
}

#[test]
fn test_non_ddl_input_renders_nothing() {
    let conversion = convert("SELECT * FROM t;");
    assert!(conversion.objects.is_empty());
    assert!(conversion.diagnostics.is_empty());
    assert_eq!(conversion.output, "");
}

#[test]
fn test_default_constants_and_expressions() {
    let conversion = convert(
        "CREATE TABLE t (n INT DEFAULT 0, ts TIMESTAMP DEFAULT CURRENT_TIMESTAMP(), f BOOLEAN DEFAULT False);",
    );
    let table = resource(&conversion, "snowflake_table.T");
    assert!(table.content.contains("    default {\n      constant = 0\n    }\n"));
    assert!(table
        .content
        .contains("    default {\n      expression = \"CURRENT_TIMESTAMP()\"\n    }\n"));
    assert!(table.content.contains("      constant = false\n"));
}

#[test]
fn test_malformed_statement_does_not_stop_conversion() {
    let conversion = convert(
        "CREATE TABLE broken;\nCREATE TABLE fine (id INT);\nCREATE VIEW v (a AS SELECT 1;",
    );
    assert_eq!(conversion.resources.len(), 1);
    assert_eq!(conversion.resources[0].name, "FINE");
    let lines: Vec<usize> = conversion.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![1, 3]);
}

// ============================================================================
// Fixture Script
// ============================================================================

#[test]
fn test_fixture_resources_in_order() {
    let conversion = convert(&load_fixture("sales_schema.sql"));
    assert!(conversion.diagnostics.is_empty());
    assert_eq!(conversion.objects.len(), 5);

    let addresses: Vec<String> = conversion.resources.iter().map(|r| r.address()).collect();
    assert_eq!(
        addresses,
        vec![
            "snowflake_table.SALES_CUSTOMERS",
            "snowflake_table_constraint.SALES_CUSTOMERS_PK_CUSTOMERS",
            "snowflake_table.SALES_ORDERS",
            "snowflake_table_constraint.SALES_ORDERS_PK_ORDERS",
            "snowflake_table_constraint.SALES_ORDERS_FK_ORDERS_CUSTOMER",
            "snowflake_view.SALES_VW_CUSTOMER_ORDERS",
            "snowflake_procedure.SALES_PURGE_ORDERS",
            "snowflake_procedure_javascript.SALES_REFRESH_STATS",
        ]
    );
}

#[test]
fn test_fixture_table_block() {
    let conversion = convert(&load_fixture("sales_schema.sql"));
    let table = resource(&conversion, "snowflake_table.SALES_CUSTOMERS");
    assert_eq!(
        table.content,
        r#"resource "snowflake_table" "SALES_CUSTOMERS" {
  name = "customers"
  database = local.databases[var.DATABASE]
  schema = snowflake_schema.SALES.name
  comment = "Customer master"

  column {
    name = "id"
    type = "NUMBER(38,0)"
    nullable = false
  }

  column {
    name = "email"
    type = "VARCHAR(255)"
    nullable = false
    comment = "Primary contact, \"verified\""
  }

  column {
    name = "status"
    type = "VARCHAR(16777216)"
    default {
      expression = "\'active\'"
    }
  }

  column {
    name = "created_at"
    type = "TIMESTAMP_NTZ(9)"
    default {
      expression = "CURRENT_TIMESTAMP()"
    }
  }
}
"#
    );

    let orders = resource(&conversion, "snowflake_table.SALES_ORDERS");
    assert!(orders.content.contains("  cluster_by = [\"customer_id\"]\n"));
    assert!(orders.content.contains("    type = \"DECIMAL(10, 2)\"\n"));
}

#[test]
fn test_fixture_constraints() {
    let conversion = convert(&load_fixture("sales_schema.sql"));

    let pk = resource(
        &conversion,
        "snowflake_table_constraint.SALES_ORDERS_PK_ORDERS",
    );
    assert!(pk.content.contains("  type = \"PRIMARY KEY\"\n"));
    assert!(pk.content.contains("  rely = true\n"));
    assert_eq!(pk.dependencies, vec!["snowflake_table.SALES_ORDERS"]);

    let fk = resource(
        &conversion,
        "snowflake_table_constraint.SALES_ORDERS_FK_ORDERS_CUSTOMER",
    );
    assert!(fk.content.contains(
        "      table_id = snowflake_table.SALES_CUSTOMERS.fully_qualified_name\n"
    ));
    assert_eq!(
        fk.dependencies,
        vec!["snowflake_table.SALES_CUSTOMERS", "snowflake_table.SALES_ORDERS"]
    );
}

#[test]
fn test_fixture_view_block() {
    let conversion = convert(&load_fixture("sales_schema.sql"));
    let view = resource(&conversion, "snowflake_view.SALES_VW_CUSTOMER_ORDERS");
    assert_eq!(
        view.content,
        r#"resource "snowflake_view" "SALES_VW_CUSTOMER_ORDERS" {
  name = "vw_customer_orders"
  database = local.databases[var.DATABASE]
  schema = snowflake_schema.SALES.name
  comment = "Orders per customer"
  is_secure = true
  or_replace = true

  column {
    column_name = "customer_id"
  }

  column {
    column_name = "order_count"
  }

  statement = <<-EOT
    SELECT c.id, COUNT(o.id) -- all orders
    FROM ${local.databases[var.DATABASE]}.SALES.customers c
    LEFT JOIN orders o ON o.customer_id = c.id
    GROUP BY c.id;
  EOT

  depends_on = [snowflake_table.SALES_CUSTOMERS, snowflake_table.SALES_ORDERS]
}
"#
    );
}

#[test]
fn test_fixture_procedures() {
    let conversion = convert(&load_fixture("sales_schema.sql"));

    let purge = resource(&conversion, "snowflake_procedure.SALES_PURGE_ORDERS");
    assert_eq!(
        purge.content,
        r#"resource "snowflake_procedure" "SALES_PURGE_ORDERS" {
  name = "purge_orders"
  database = local.databases[var.DATABASE]
  schema = snowflake_schema.SALES.name
  language = "SQL"
  return_type = "VARCHAR"

  argument {
    name = "days"
    type = "NUMBER"
    default_value = "30"
  }

  statement = <<-EOT
    BEGIN
        DELETE FROM ${local.databases[var.DATABASE]}.SALES.orders WHERE created_at < DATEADD(day, -:days, CURRENT_DATE());
        RETURN 'done';
    END;
  EOT

  depends_on = [snowflake_table.SALES_ORDERS]
}
"#
    );

    let refresh = resource(
        &conversion,
        "snowflake_procedure_javascript.SALES_REFRESH_STATS",
    );
    assert_eq!(refresh.kind, ResourceKind::JavascriptProcedure);
    assert!(refresh.content.contains("  execute_as = \"OWNER\"\n"));
    assert!(refresh.content.contains("  procedure_definition = <<-EOT\n"));
    assert!(refresh
        .content
        .contains("FROM ${local.databases[var.DATABASE]}.SALES.vw_customer_orders`"));
    assert_eq!(
        refresh.dependencies,
        vec!["snowflake_view.SALES_VW_CUSTOMER_ORDERS"]
    );
}

// ============================================================================
// Naming Policies
// ============================================================================

#[test]
fn test_without_schema_prefix() {
    let options = ConvertOptions {
        schema_prefix: false,
        ..Default::default()
    };
    let conversion = convert_sql(&load_fixture("sales_schema.sql"), &options);
    let names: Vec<&str> = conversion.resources.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "CUSTOMERS",
            "CUSTOMERS_PK_CUSTOMERS",
            "ORDERS",
            "ORDERS_PK_ORDERS",
            "ORDERS_FK_ORDERS_CUSTOMER",
            "VW_CUSTOMER_ORDERS",
            "PURGE_ORDERS",
            "REFRESH_STATS",
        ]
    );
    let view = resource(&conversion, "snowflake_view.VW_CUSTOMER_ORDERS");
    assert_eq!(
        view.dependencies,
        vec!["snowflake_table.CUSTOMERS", "snowflake_table.ORDERS"]
    );
    assert!(view.content.contains("  schema = snowflake_schema.SALES.name\n"));
}

#[test]
fn test_extra_database_tokens() {
    let options = ConvertOptions {
        database_tokens: vec!["SHARED".to_string()],
        ..Default::default()
    };
    let conversion = convert_sql(
        "CREATE VIEW REPORTING.v AS SELECT * FROM shared.REPORTING.events;",
        &options,
    );
    let view = resource(&conversion, "snowflake_view.REPORTING_V");
    assert!(view
        .content
        .contains("SELECT * FROM ${local.databases[var.DATABASE]}.REPORTING.events;"));
    assert_eq!(view.dependencies, vec!["snowflake_table.REPORTING_EVENTS"]);
}
