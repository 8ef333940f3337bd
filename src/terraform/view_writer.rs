//! `snowflake_view` resource writing.

use crate::model::ViewDefinition;

use super::hcl_helpers::HclWriter;
use super::resource::{Resource, ResourceKind};
use super::substitutions::BodySubstitutions;
use super::{write_object_location, ConvertOptions};

/// Write a view resource. The query is embedded as a heredoc after body substitutions.
pub(crate) fn write_view(
    view: &ViewDefinition,
    options: &ConvertOptions,
    substitutions: &BodySubstitutions,
) -> Resource {
    let resource_name = options.resource_name(&view.name);
    let mut writer = HclWriter::resource(ResourceKind::View.terraform_type(), &resource_name);

    write_object_location(&mut writer, &view.name, options);
    if let Some(comment) = &view.comment {
        writer.string("comment", comment);
    }
    if view.secure {
        writer.bool("is_secure", true);
    }
    if view.or_replace {
        writer.bool("or_replace", true);
    }

    for column in view.columns.iter().flatten() {
        writer.open_block("column");
        writer.string("column_name", column);
        writer.close_block();
    }

    writer.heredoc("statement", &substitutions.apply(&view.query));

    Resource::new(ResourceKind::View, resource_name, writer.finish())
}
