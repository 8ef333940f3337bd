//! Terraform resource blocks produced by the synthesizer

/// Kind of a generated resource; fixes its Terraform type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Table,
    View,
    Procedure,
    JavascriptProcedure,
    TableConstraint,
}

impl ResourceKind {
    pub fn terraform_type(&self) -> &'static str {
        match self {
            ResourceKind::Table => "snowflake_table",
            ResourceKind::View => "snowflake_view",
            ResourceKind::Procedure => "snowflake_procedure",
            ResourceKind::JavascriptProcedure => "snowflake_procedure_javascript",
            ResourceKind::TableConstraint => "snowflake_table_constraint",
        }
    }

    pub fn from_terraform_type(terraform_type: &str) -> Option<Self> {
        match terraform_type {
            "snowflake_table" => Some(ResourceKind::Table),
            "snowflake_view" => Some(ResourceKind::View),
            "snowflake_procedure" => Some(ResourceKind::Procedure),
            "snowflake_procedure_javascript" => Some(ResourceKind::JavascriptProcedure),
            "snowflake_table_constraint" => Some(ResourceKind::TableConstraint),
            _ => None,
        }
    }

    /// Position in `depends_on` lists: tables, views, procedures, constraints
    fn dependency_rank(&self) -> u8 {
        match self {
            ResourceKind::Table => 0,
            ResourceKind::View => 1,
            ResourceKind::Procedure | ResourceKind::JavascriptProcedure => 2,
            ResourceKind::TableConstraint => 3,
        }
    }
}

/// Build a `<type>.<name>` reference
pub fn resource_address(kind: ResourceKind, name: &str) -> String {
    format!("{}.{}", kind.terraform_type(), name)
}

/// One rendered `resource` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub kind: ResourceKind,
    pub name: String,
    /// Rendered block, `depends_on` included, ending in `}\n`
    pub content: String,
    /// `<type>.<name>` references, sorted
    pub dependencies: Vec<String>,
    /// Rendered block without `depends_on`
    block: String,
}

impl Resource {
    pub fn new(kind: ResourceKind, name: impl Into<String>, block: String) -> Self {
        Self {
            kind,
            name: name.into(),
            content: block.clone(),
            dependencies: Vec::new(),
            block,
        }
    }

    /// This resource's `<type>.<name>` reference
    pub fn address(&self) -> String {
        resource_address(self.kind, &self.name)
    }

    /// Add dependencies and re-render the `depends_on` section.
    ///
    /// Duplicates and references to this resource itself are dropped.
    pub fn add_dependencies<I>(&mut self, dependencies: I)
    where
        I: IntoIterator<Item = String>,
    {
        let own = self.address();
        for dependency in dependencies {
            if dependency != own && !self.dependencies.contains(&dependency) {
                self.dependencies.push(dependency);
            }
        }
        self.dependencies.sort_by(|a, b| {
            dependency_sort_key(a)
                .cmp(&dependency_sort_key(b))
                .then_with(|| a.cmp(b))
        });
        self.content = self.render_content();
    }

    fn render_content(&self) -> String {
        if self.dependencies.is_empty() {
            return self.block.clone();
        }
        let body = self.block.strip_suffix("}\n").unwrap_or(&self.block);
        format!(
            "{}\n  depends_on = [{}]\n}}\n",
            body,
            self.dependencies.join(", ")
        )
    }
}

fn dependency_sort_key(reference: &str) -> u8 {
    reference
        .split_once('.')
        .and_then(|(terraform_type, _)| ResourceKind::from_terraform_type(terraform_type))
        .map(|kind| kind.dependency_rank())
        .unwrap_or(u8::MAX)
}
