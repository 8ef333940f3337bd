//! `snowflake_procedure` and `snowflake_procedure_javascript` resource writing.
//!
//! JavaScript procedures use the provider's dedicated resource, whose argument block
//! and body attribute are named differently from the SQL one.

use crate::model::{ExecuteAs, ProcedureDefinition};

use super::hcl_helpers::HclWriter;
use super::resource::{Resource, ResourceKind};
use super::substitutions::BodySubstitutions;
use super::{write_object_location, ConvertOptions};

/// Write a procedure resource, choosing the resource type by language.
pub(crate) fn write_procedure(
    procedure: &ProcedureDefinition,
    options: &ConvertOptions,
    substitutions: &BodySubstitutions,
) -> Resource {
    if procedure.is_javascript() {
        write_javascript_procedure(procedure, options, substitutions)
    } else {
        write_sql_procedure(procedure, options, substitutions)
    }
}

fn write_sql_procedure(
    procedure: &ProcedureDefinition,
    options: &ConvertOptions,
    substitutions: &BodySubstitutions,
) -> Resource {
    let resource_name = options.resource_name(&procedure.name);
    let mut writer = HclWriter::resource(ResourceKind::Procedure.terraform_type(), &resource_name);

    write_object_location(&mut writer, &procedure.name, options);
    writer.string("language", &procedure.language.to_uppercase());
    if let Some(return_type) = &procedure.return_type {
        writer.string("return_type", return_type);
    }
    if let Some(comment) = &procedure.comment {
        writer.string("comment", comment);
    }

    for parameter in &procedure.parameters {
        writer.open_block("argument");
        writer.string("name", &parameter.name);
        writer.string("type", &parameter.data_type);
        if let Some(default_value) = &parameter.default_value {
            writer.string("default_value", default_value);
        }
        writer.close_block();
    }

    writer.heredoc("statement", &substitutions.apply(&procedure.body));

    Resource::new(ResourceKind::Procedure, resource_name, writer.finish())
}

fn write_javascript_procedure(
    procedure: &ProcedureDefinition,
    options: &ConvertOptions,
    substitutions: &BodySubstitutions,
) -> Resource {
    let resource_name = options.resource_name(&procedure.name);
    let mut writer = HclWriter::resource(
        ResourceKind::JavascriptProcedure.terraform_type(),
        &resource_name,
    );

    write_object_location(&mut writer, &procedure.name, options);
    if let Some(return_type) = &procedure.return_type {
        writer.string("return_type", return_type);
    }
    let execute_as = procedure.execute_as.unwrap_or(ExecuteAs::Owner);
    writer.string("execute_as", execute_as.as_str());
    if let Some(comment) = &procedure.comment {
        writer.string("comment", comment);
    }

    for parameter in &procedure.parameters {
        writer.open_block("arguments");
        writer.string("arg_name", &parameter.name);
        writer.string("arg_data_type", &parameter.data_type);
        if let Some(default_value) = &parameter.default_value {
            writer.string("arg_default_value", default_value);
        }
        writer.close_block();
    }

    writer.heredoc("procedure_definition", &substitutions.apply(&procedure.body));

    Resource::new(ResourceKind::JavascriptProcedure, resource_name, writer.finish())
}
