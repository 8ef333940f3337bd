//! Terraform resource synthesis
//!
//! Turns parsed DDL objects into `resource` blocks for the Snowflake provider,
//! adds `depends_on` ordering between them and renders the final document.

mod constraint_writer;
mod dependencies;
mod hcl_helpers;
mod naming;
mod procedure_writer;
mod resource;
mod substitutions;
mod table_writer;
mod types;
mod view_writer;

use std::collections::HashSet;

use crate::model::{DdlObject, QualifiedName};

use constraint_writer::write_table_constraints;
use dependencies::{analyze_dependencies, ObjectResources};
use procedure_writer::write_procedure;
use table_writer::write_table;
use view_writer::write_view;

pub use hcl_helpers::{escape_string, format_heredoc, DefaultValue, HclWriter};
pub use naming::{resource_identifier, schema_reference, DATABASE_REFERENCE};
pub use resource::{resource_address, Resource, ResourceKind};
pub use substitutions::BodySubstitutions;
pub use types::map_data_type;

/// Schema suffix stripped from schema names unless configured otherwise
pub const DEFAULT_SCHEMA_SUFFIX: &str = "_SANDBOX";

/// Naming and substitution policy for a conversion
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Prefix resource names with the (normalized) schema name
    pub schema_prefix: bool,
    /// Extra database names replaced in view queries and procedure bodies
    pub database_tokens: Vec<String>,
    /// Environment suffixes removed from schema names
    pub schema_suffixes: Vec<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            schema_prefix: true,
            database_tokens: Vec::new(),
            schema_suffixes: vec![DEFAULT_SCHEMA_SUFFIX.to_string()],
        }
    }
}

impl ConvertOptions {
    /// Resource name for an object under this policy
    pub fn resource_name(&self, name: &QualifiedName) -> String {
        naming::resource_name(name, self.schema_prefix, &self.schema_suffixes)
    }
}

/// Write the `name`, `database` and `schema` attributes shared by every object resource
pub(crate) fn write_object_location(
    writer: &mut HclWriter,
    name: &QualifiedName,
    options: &ConvertOptions,
) {
    writer.string("name", &name.name);
    if name.database.is_some() {
        writer.raw("database", DATABASE_REFERENCE);
    }
    if let Some(schema) = &name.schema {
        writer.raw("schema", &schema_reference(schema, &options.schema_suffixes));
    }
}

/// Convert parsed objects into resources, in input order, with dependencies added.
///
/// A table is followed by its constraint resources.
pub fn convert_to_resources(objects: &[DdlObject], options: &ConvertOptions) -> Vec<Resource> {
    let substitutions = body_substitutions(objects, options);

    let mut resources = Vec::with_capacity(objects.len());
    let mut converted = Vec::with_capacity(objects.len());
    for object in objects {
        let index = resources.len();
        let mut foreign_keys = Vec::new();
        match object {
            DdlObject::Table(table) => {
                let table_resource = write_table(table, options);
                let table_name = table_resource.name.clone();
                resources.push(table_resource);
                for constraint in write_table_constraints(table, &table_name, options) {
                    if let Some(target) = constraint.references {
                        foreign_keys.push((resources.len(), target));
                    }
                    resources.push(constraint.resource);
                }
            }
            DdlObject::View(view) => resources.push(write_view(view, options, &substitutions)),
            DdlObject::Procedure(procedure) => {
                resources.push(write_procedure(procedure, options, &substitutions))
            }
        }
        converted.push(ObjectResources {
            object,
            resource: index,
            foreign_keys,
        });
    }

    warn_duplicate_names(&resources);
    analyze_dependencies(&converted, &mut resources, options);
    resources
}

/// Render resources as one document, blocks separated by a blank line
pub fn render(resources: &[Resource]) -> String {
    resources
        .iter()
        .map(|resource| resource.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Substitutions covering every database named in the input plus the configured ones
fn body_substitutions(objects: &[DdlObject], options: &ConvertOptions) -> BodySubstitutions {
    let mut databases: Vec<String> = objects
        .iter()
        .filter_map(|object| object.database())
        .map(str::to_string)
        .collect();
    databases.extend(options.database_tokens.iter().cloned());
    BodySubstitutions::new(databases.as_slice(), options.schema_suffixes.as_slice())
}

fn warn_duplicate_names(resources: &[Resource]) {
    let mut seen = HashSet::new();
    for resource in resources {
        let address = resource.address();
        if !seen.insert(address.clone()) {
            log::warn!("Duplicate resource {}", address);
        }
    }
}
