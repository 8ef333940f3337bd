//! `snowflake_table` resource writing.

use crate::model::{ColumnDefinition, TableDefinition};

use super::hcl_helpers::{DefaultValue, HclWriter};
use super::resource::{Resource, ResourceKind};
use super::types::map_data_type;
use super::{write_object_location, ConvertOptions};

/// Write a table resource with one `column` block per column.
pub(crate) fn write_table(table: &TableDefinition, options: &ConvertOptions) -> Resource {
    let resource_name = options.resource_name(&table.name);
    let mut writer = HclWriter::resource(ResourceKind::Table.terraform_type(), &resource_name);

    write_object_location(&mut writer, &table.name, options);
    if let Some(comment) = &table.comment {
        writer.string("comment", comment);
    }
    if let Some(cluster_by) = &table.cluster_by {
        writer.string_list("cluster_by", cluster_by);
    }

    if table.columns.is_empty() {
        log::debug!("Table {} has no columns", table.name.full_name());
    }
    for column in &table.columns {
        write_column(&mut writer, column);
    }

    Resource::new(ResourceKind::Table, resource_name, writer.finish())
}

fn write_column(writer: &mut HclWriter, column: &ColumnDefinition) {
    writer.open_block("column");
    writer.string("name", &column.name);
    writer.string("type", &map_data_type(&column.data_type));

    if !column.nullable {
        writer.bool("nullable", false);
    }

    if let Some(default_value) = &column.default_value {
        let (attribute, value) = DefaultValue::classify(default_value).attribute();
        writer.open_block("default");
        writer.raw(attribute, &value);
        writer.close_block();
    }

    if let Some(comment) = &column.comment {
        writer.string("comment", comment);
    }
    writer.close_block();
}
