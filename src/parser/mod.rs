//! Snowflake DDL parsing

mod column_parser;
mod constraint_parser;
mod ddl_parser;
pub mod identifier_utils;
mod procedure_parser;
pub mod scanner;
mod table_parser;
mod view_parser;

pub use column_parser::{parse_column_definition, ParsedColumn};
pub use constraint_parser::{parse_table_constraint, ParsedConstraint};
pub use ddl_parser::{parse, parse_ddl, Diagnostic, ParseOutput};
pub use procedure_parser::parse_create_procedure;
pub use table_parser::parse_create_table;
pub use view_parser::parse_create_view;
