//! `snowflake_table_constraint` resource writing.

use crate::model::{ConstraintDefinition, ConstraintKind, QualifiedName, TableDefinition};

use super::hcl_helpers::HclWriter;
use super::naming::resource_identifier;
use super::resource::{resource_address, Resource, ResourceKind};
use super::ConvertOptions;

/// A constraint resource together with the table its foreign key points at
#[derive(Debug, Clone)]
pub(crate) struct ConstraintResource {
    pub resource: Resource,
    /// Referenced table with the owning table's schema filled in when omitted
    pub references: Option<QualifiedName>,
}

/// Write one resource per supported constraint of `table`.
///
/// Every constraint resource depends on the owning table resource.
pub(crate) fn write_table_constraints(
    table: &TableDefinition,
    table_resource: &str,
    options: &ConvertOptions,
) -> Vec<ConstraintResource> {
    table
        .constraints
        .iter()
        .filter_map(|constraint| {
            if constraint.kind == ConstraintKind::Check {
                log::warn!(
                    "Skipping CHECK constraint {} on {}: not supported by snowflake_table_constraint",
                    constraint.name,
                    table.name.full_name()
                );
                return None;
            }
            Some(write_constraint(table, table_resource, constraint, options))
        })
        .collect()
}

fn write_constraint(
    table: &TableDefinition,
    table_resource: &str,
    constraint: &ConstraintDefinition,
    options: &ConvertOptions,
) -> ConstraintResource {
    let resource_name = format!("{}_{}", table_resource, resource_identifier(&constraint.name));
    let mut writer = HclWriter::resource(
        ResourceKind::TableConstraint.terraform_type(),
        &resource_name,
    );

    writer.string("name", &constraint.name);
    writer.string("type", constraint.kind.sql_keyword());
    writer.raw("table_id", &fully_qualified_name(table_resource));
    writer.string_list("columns", &constraint.columns);

    let properties = &constraint.properties;
    if let Some(rely) = properties.rely {
        writer.bool("rely", rely);
    }
    if let Some(enable) = properties.enable {
        writer.bool("enable", enable);
    }
    if let Some(deferrable) = properties.deferrable {
        writer.bool("deferrable", deferrable);
    }

    let references = constraint.references.as_ref().map(|reference| {
        let mut target = reference.table.clone();
        if target.schema.is_none() {
            target.schema = table.name.schema.clone();
        }

        writer.open_block("foreign_key_properties");
        writer.open_block("references");
        writer.raw(
            "table_id",
            &fully_qualified_name(&options.resource_name(&target)),
        );
        if !reference.columns.is_empty() {
            writer.string_list("columns", &reference.columns);
        }
        writer.close_block();
        writer.close_block();
        target
    });

    let mut resource = Resource::new(ResourceKind::TableConstraint, resource_name, writer.finish());
    resource.add_dependencies([resource_address(ResourceKind::Table, table_resource)]);
    ConstraintResource {
        resource,
        references,
    }
}

fn fully_qualified_name(table_resource: &str) -> String {
    format!(
        "{}.fully_qualified_name",
        resource_address(ResourceKind::Table, table_resource)
    )
}
