//! DDL object model element types

/// A parsed DDL object. The variant is decided once, at extraction time.
#[derive(Debug, Clone, PartialEq)]
pub enum DdlObject {
    Table(TableDefinition),
    View(ViewDefinition),
    Procedure(ProcedureDefinition),
}

impl DdlObject {
    /// Get the object kind as written in SQL
    pub fn type_name(&self) -> &'static str {
        match self {
            DdlObject::Table(_) => "TABLE",
            DdlObject::View(_) => "VIEW",
            DdlObject::Procedure(_) => "PROCEDURE",
        }
    }

    /// Get the (possibly partial) qualified name of the object
    pub fn qualified_name(&self) -> &QualifiedName {
        match self {
            DdlObject::Table(t) => &t.name,
            DdlObject::View(v) => &v.name,
            DdlObject::Procedure(p) => &p.name,
        }
    }

    /// Bare object name without database or schema
    pub fn name(&self) -> &str {
        &self.qualified_name().name
    }

    /// Schema name, if the statement specified one
    pub fn schema(&self) -> Option<&str> {
        self.qualified_name().schema.as_deref()
    }

    /// Database name, if the statement specified one
    pub fn database(&self) -> Option<&str> {
        self.qualified_name().database.as_deref()
    }
}

/// A dot-separated object name, split by part count:
/// three parts are database.schema.name, two are schema.name, one is name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualifiedName {
    pub database: Option<String>,
    pub schema: Option<String>,
    pub name: String,
}

impl QualifiedName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            database: None,
            schema: None,
            name: name.into(),
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Full name with only the parts that were specified, e.g. `db.schema.name`,
    /// `schema.name` or `name`.
    pub fn full_name(&self) -> String {
        match (&self.database, &self.schema) {
            (Some(db), Some(schema)) => format!("{}.{}.{}", db, schema, self.name),
            (Some(db), None) => format!("{}..{}", db, self.name),
            (None, Some(schema)) => format!("{}.{}", schema, self.name),
            (None, None) => self.name.clone(),
        }
    }
}

/// Table definition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableDefinition {
    pub name: QualifiedName,
    pub columns: Vec<ColumnDefinition>,
    pub constraints: Vec<ConstraintDefinition>,
    pub comment: Option<String>,
    pub cluster_by: Option<Vec<String>>,
}

/// Column definition
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    /// Raw SQL type text (e.g., "DECIMAL(10, 2)")
    pub data_type: String,
    pub nullable: bool,
    /// Raw default expression, quotes included (e.g., "'active'", "CURRENT_TIMESTAMP()")
    pub default_value: Option<String>,
    pub comment: Option<String>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            default_value: None,
            comment: None,
        }
    }
}

/// Constraint type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey,
    ForeignKey,
    Unique,
    Check,
}

impl ConstraintKind {
    /// Constraint type as written in SQL
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            ConstraintKind::PrimaryKey => "PRIMARY KEY",
            ConstraintKind::ForeignKey => "FOREIGN KEY",
            ConstraintKind::Unique => "UNIQUE",
            ConstraintKind::Check => "CHECK",
        }
    }

    /// Short suffix used when a constraint has no name of its own
    pub fn abbreviation(&self) -> &'static str {
        match self {
            ConstraintKind::PrimaryKey => "PK",
            ConstraintKind::ForeignKey => "FK",
            ConstraintKind::Unique => "UK",
            ConstraintKind::Check => "CK",
        }
    }
}

/// Constraint flags. `None` means the statement did not say.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintProperties {
    pub rely: Option<bool>,
    pub deferrable: Option<bool>,
    pub enable: Option<bool>,
}

/// Target of a foreign key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyReference {
    pub table: QualifiedName,
    pub columns: Vec<String>,
}

/// Table constraint definition
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintDefinition {
    pub name: String,
    pub kind: ConstraintKind,
    pub columns: Vec<String>,
    pub properties: ConstraintProperties,
    pub references: Option<ForeignKeyReference>,
    /// CHECK expression without the surrounding parentheses
    pub expression: Option<String>,
}

/// View definition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewDefinition {
    pub name: QualifiedName,
    /// Explicit output column names, `None` when the statement had no column list
    pub columns: Option<Vec<String>>,
    /// Verbatim query text after AS, comments preserved, terminated by `;`
    pub query: String,
    pub comment: Option<String>,
    pub secure: bool,
    pub or_replace: bool,
}

/// Procedure parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureParameter {
    pub name: String,
    pub data_type: String,
    pub default_value: Option<String>,
}

/// EXECUTE AS mode of a procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteAs {
    Owner,
    Caller,
}

impl ExecuteAs {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecuteAs::Owner => "OWNER",
            ExecuteAs::Caller => "CALLER",
        }
    }
}

/// Language assumed when a procedure has no LANGUAGE clause
pub const DEFAULT_PROCEDURE_LANGUAGE: &str = "SQL";

/// Procedure definition
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureDefinition {
    pub name: QualifiedName,
    pub parameters: Vec<ProcedureParameter>,
    pub return_type: Option<String>,
    /// Verbatim body with one layer of delimiters removed
    pub body: String,
    pub comment: Option<String>,
    pub language: String,
    pub execute_as: Option<ExecuteAs>,
}

impl Default for ProcedureDefinition {
    fn default() -> Self {
        Self {
            name: QualifiedName::default(),
            parameters: Vec::new(),
            return_type: None,
            body: String::new(),
            comment: None,
            language: DEFAULT_PROCEDURE_LANGUAGE.to_string(),
            execute_as: None,
        }
    }
}

impl ProcedureDefinition {
    /// Whether the body is JavaScript rather than Snowflake Scripting
    pub fn is_javascript(&self) -> bool {
        self.language.eq_ignore_ascii_case("JAVASCRIPT")
    }
}
