//! snowflake-tf: Convert Snowflake DDL into Terraform resources
//!
//! This library reads CREATE TABLE / VIEW / PROCEDURE statements and emits
//! equivalent resource blocks for the Snowflake Terraform provider, including
//! `depends_on` ordering inferred from view queries and procedure bodies.

pub mod batch;
pub mod error;
pub mod model;
pub mod parser;
pub mod terraform;
mod util;

pub use error::{ConvertError, DdlParseError};
pub use model::DdlObject;
pub use parser::{parse, parse_ddl, Diagnostic, ParseOutput};
pub use terraform::{convert_to_resources, render, ConvertOptions, Resource, ResourceKind};

/// Everything produced by converting one SQL document
#[derive(Debug, Clone)]
pub struct Conversion {
    pub objects: Vec<DdlObject>,
    pub resources: Vec<Resource>,
    /// Recognized statements that could not be converted
    pub diagnostics: Vec<Diagnostic>,
    /// Rendered Terraform document
    pub output: String,
}

/// Parse, convert and render a SQL document
pub fn convert_sql(sql: &str, options: &ConvertOptions) -> Conversion {
    let ParseOutput {
        objects,
        diagnostics,
    } = parse_ddl(sql);

    let resources = convert_to_resources(&objects, options);
    let output = render(&resources);

    Conversion {
        objects,
        resources,
        diagnostics,
        output,
    }
}
