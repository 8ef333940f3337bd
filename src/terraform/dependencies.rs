//! Dependency analysis between generated resources
//!
//! Runs after synthesis. View queries and procedure bodies are scanned for the objects
//! they read or write, and every match becomes a `depends_on` entry on the resource.
//!
//! Matching rules differ by object kind:
//!
//! - Views only track references inside their own schema. A reference that names no
//!   converted object still produces a dependency, with the kind guessed from the name
//!   (`VW_` prefix for views).
//! - Procedures only track references to converted objects, matched on the trailing name
//!   parts. When several objects match, the first one in declaration order wins.
//! - Foreign-key constraints depend on the referenced table when it was converted too.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::model::{DdlObject, ProcedureDefinition, QualifiedName, ViewDefinition};
use crate::parser::identifier_utils::{split_qualified_name, unquote_identifier};
use crate::parser::scanner::{strip_comments, strip_comments_and_strings};

use super::naming::{normalize_schema, resource_identifier};
use super::resource::{resource_address, Resource, ResourceKind};
use super::ConvertOptions;

/// Input: upper-cased, comment-stripped view query; unanchored.
/// Group 1 is the keyword, group 2 the 1-3 part object chain after an optional `${...}.`
/// token, group 3 a following opening parenthesis.
static VIEW_REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\b(FROM|JOIN)\s+(?:\$\{[^}]*\}\.)?((?:"[^"]+"|[A-Z_][A-Z0-9_$]*)(?:\.(?:"[^"]+"|[A-Z_][A-Z0-9_$]*)){0,2})(\s*\()?"#,
    )
    .unwrap()
});

/// Input: upper-cased, comment-stripped procedure body; unanchored.
/// `DELETE FROM` is covered by `FROM`. Groups as in [`VIEW_REFERENCE_RE`]; after `INTO`
/// the parenthesis opens a column list.
static PROCEDURE_REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\b(FROM|UPDATE|INTO)\s+(?:\$\{[^}]*\}\.)?((?:"[^"]+"|[A-Z_][A-Z0-9_$]*)(?:\.(?:"[^"]+"|[A-Z_][A-Z0-9_$]*)){0,2})(\s*\()?"#,
    )
    .unwrap()
});

/// Input: upper-cased, comment-stripped query; unanchored.
/// Captures the name of each common table expression (`WITH x AS (`, `, y (a, b) AS (`).
static CTE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:\bWITH\s+(?:RECURSIVE\s+)?|,\s*)("[^"]+"|[A-Z_][A-Z0-9_$]*)\s*(?:\([^)]*\)\s*)?AS\s*\("#,
    )
    .unwrap()
});

/// Words that follow FROM/JOIN without naming an object
const NON_OBJECT_WORDS: &[&str] = &["LATERAL", "TABLE", "VALUES", "SELECT"];

/// Functions whose argument syntax uses FROM (`EXTRACT(YEAR FROM d)`)
const FROM_FUNCTIONS: &[&str] = &["EXTRACT", "TRIM", "SUBSTRING", "SUBSTR", "POSITION", "OVERLAY"];

/// Resources generated for one DDL object
#[derive(Debug)]
pub(crate) struct ObjectResources<'a> {
    pub object: &'a DdlObject,
    /// Index of the object's main resource
    pub resource: usize,
    /// Constraint resource indexes with the table their foreign key references
    pub foreign_keys: Vec<(usize, QualifiedName)>,
}

/// A converted object, keyed by normalized name parts
#[derive(Debug)]
struct KnownObject {
    database: Option<String>,
    schema: Option<String>,
    name: String,
    kind: ResourceKind,
    address: String,
}

impl KnownObject {
    /// `[database, schema, name]` with the unspecified parts left out
    fn parts(&self) -> Vec<&str> {
        [self.database.as_deref(), self.schema.as_deref(), Some(self.name.as_str())]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// An object reference found in a body, normalized like [`KnownObject`]
#[derive(Debug)]
struct ObjectReference {
    database: Option<String>,
    schema: Option<String>,
    name: String,
}

impl ObjectReference {
    fn parts(&self) -> Vec<&str> {
        [self.database.as_deref(), self.schema.as_deref(), Some(self.name.as_str())]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Add `depends_on` entries to `resources` for every object in `converted`.
pub(crate) fn analyze_dependencies(
    converted: &[ObjectResources<'_>],
    resources: &mut [Resource],
    options: &ConvertOptions,
) {
    let known = known_objects(converted, resources, options);

    let mut pending: Vec<(usize, Vec<String>)> = Vec::new();
    for entry in converted {
        let dependencies = match entry.object {
            DdlObject::View(view) => view_dependencies(view, &known, options),
            DdlObject::Procedure(procedure) => procedure_dependencies(procedure, &known, options),
            DdlObject::Table(_) => Vec::new(),
        };
        pending.push((entry.resource, dependencies));

        for (constraint, target) in &entry.foreign_keys {
            if let Some(address) = referenced_table(target, &known, options) {
                pending.push((*constraint, vec![address]));
            }
        }
    }

    for (index, dependencies) in pending {
        if dependencies.is_empty() {
            continue;
        }
        if let Some(resource) = resources.get_mut(index) {
            log::debug!(
                "{} depends on {}",
                resource.address(),
                dependencies.join(", ")
            );
            resource.add_dependencies(dependencies);
        }
    }
}

fn known_objects(
    converted: &[ObjectResources<'_>],
    resources: &[Resource],
    options: &ConvertOptions,
) -> Vec<KnownObject> {
    converted
        .iter()
        .filter_map(|entry| {
            let resource = resources.get(entry.resource)?;
            let name = entry.object.qualified_name();
            Some(KnownObject {
                database: name.database.as_deref().map(resource_identifier),
                schema: name
                    .schema
                    .as_deref()
                    .map(|schema| normalize_schema(schema, &options.schema_suffixes)),
                name: resource_identifier(&name.name),
                kind: resource.kind,
                address: resource.address(),
            })
        })
        .collect()
}

fn view_dependencies(
    view: &ViewDefinition,
    known: &[KnownObject],
    options: &ConvertOptions,
) -> Vec<String> {
    let query = strip_comments_and_strings(&view.query).to_uppercase();
    let cte_names = cte_names(&query);
    let view_schema = view
        .name
        .schema
        .as_deref()
        .map(|schema| normalize_schema(schema, &options.schema_suffixes));

    let mut dependencies = Vec::new();
    for caps in VIEW_REFERENCE_RE.captures_iter(&query) {
        let Some(reference) = object_reference(&query, &caps, options) else {
            continue;
        };
        if reference.schema.is_none() && cte_names.contains(&reference.name) {
            continue;
        }

        let schema = reference.schema.clone().or_else(|| view_schema.clone());
        if schema != view_schema {
            continue;
        }

        let address = known
            .iter()
            .find(|object| object.name == reference.name && object.schema == schema)
            .map(|object| object.address.clone())
            .unwrap_or_else(|| inferred_address(&reference.name, view, options));
        if !dependencies.contains(&address) {
            dependencies.push(address);
        }
    }
    dependencies
}

/// Address of an object that is not part of the conversion, in the view's schema
fn inferred_address(name: &str, view: &ViewDefinition, options: &ConvertOptions) -> String {
    let kind = if name.starts_with("VW_") {
        ResourceKind::View
    } else {
        ResourceKind::Table
    };
    let mut target = QualifiedName::new(name);
    target.schema = view.name.schema.clone();
    resource_address(kind, &options.resource_name(&target))
}

fn procedure_dependencies(
    procedure: &ProcedureDefinition,
    known: &[KnownObject],
    options: &ConvertOptions,
) -> Vec<String> {
    // JavaScript bodies carry their SQL in string literals
    let body = if procedure.is_javascript() {
        strip_comments(&procedure.body)
    } else {
        strip_comments_and_strings(&procedure.body)
    }
    .to_uppercase();

    let mut dependencies = Vec::new();
    for caps in PROCEDURE_REFERENCE_RE.captures_iter(&body) {
        let Some(reference) = object_reference(&body, &caps, options) else {
            continue;
        };
        let reference_parts = reference.parts();
        let matched = known.iter().find(|object| {
            let parts = object.parts();
            reference_parts.len() <= parts.len()
                && parts[parts.len() - reference_parts.len()..] == reference_parts[..]
        });
        if let Some(object) = matched {
            if !dependencies.contains(&object.address) {
                dependencies.push(object.address.clone());
            }
        }
    }
    dependencies
}

/// Address of the converted table a foreign key points at
fn referenced_table(
    target: &QualifiedName,
    known: &[KnownObject],
    options: &ConvertOptions,
) -> Option<String> {
    let name = resource_identifier(&target.name);
    let schema = target
        .schema
        .as_deref()
        .map(|schema| normalize_schema(schema, &options.schema_suffixes));
    known
        .iter()
        .find(|object| {
            object.kind == ResourceKind::Table && object.name == name && object.schema == schema
        })
        .map(|object| object.address.clone())
}

/// Normalize a reference match, skipping function calls and keywords
fn object_reference(
    text: &str,
    caps: &Captures<'_>,
    options: &ConvertOptions,
) -> Option<ObjectReference> {
    let whole = caps.get(0)?;
    let keyword = caps.get(1)?.as_str();
    let calls_function = caps.get(3).is_some() && matches!(keyword, "FROM" | "JOIN");
    if calls_function || inside_from_function(text, whole.start()) {
        return None;
    }
    let chain = caps.get(2)?.as_str();
    if NON_OBJECT_WORDS.contains(&chain) {
        return None;
    }

    let name = split_qualified_name(chain);
    Some(ObjectReference {
        database: name.database.as_deref().map(resource_identifier),
        schema: name
            .schema
            .as_deref()
            .map(|schema| normalize_schema(schema, &options.schema_suffixes)),
        name: resource_identifier(&name.name),
    })
}

/// Whether `at` lies inside the arguments of one of [`FROM_FUNCTIONS`]
fn inside_from_function(text: &str, at: usize) -> bool {
    let mut depth = 0usize;
    for (i, c) in text[..at].char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' if depth > 0 => depth -= 1,
            '(' => {
                let before = text[..i].trim_end();
                let word_start = before
                    .char_indices()
                    .rev()
                    .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
                    .map_or(0, |(p, c)| p + c.len_utf8());
                return FROM_FUNCTIONS.contains(&&before[word_start..]);
            }
            _ => {}
        }
    }
    false
}

fn cte_names(query: &str) -> Vec<String> {
    CTE_NAME_RE
        .captures_iter(query)
        .map(|caps| resource_identifier(&unquote_identifier(&caps[1])))
        .collect()
}
