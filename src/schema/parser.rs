//! Schema front end.
//!
//! Reads schema text line by line and builds the IR:
//!
//! ```text
//! model User {
//!   id        Int      @id @auto
//!   email     String   @unique
//!   name      String?
//!   createdAt DateTime @default(now())
//!   posts     Post[]   @relation("UserPosts")
//! }
//! ```
//!
//! Blank lines and `//` comments are skipped. A declaration whose type ends in
//! `[]` is a relation; anything else is a scalar field. Unknown annotations are
//! ignored so that newer schema files still load. A model left open at the end
//! of input is still committed.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use super::attributes::{parse_attributes, parse_relation_args, Attribute, AttributeError};
use super::definition::{
    DefaultValue, FieldSchema, FieldType, ModelSchema, Relation, RelationKind, Schema,
};

/// File extension of schema files discovered in a directory.
pub const SCHEMA_EXTENSION: &str = "cmt";

/// Schema parsing errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("line {line}: invalid field definition '{text}'")]
    InvalidDeclaration { line: usize, text: String },

    #[error("line {line}: model declaration without a name")]
    MissingModelName { line: usize },

    #[error("line {line}, column {column}: {message} in '{text}'")]
    MalformedAttribute {
        line: usize,
        column: usize,
        text: String,
        message: String,
    },

    #[error("Failed to read schema '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No .cmt schema files found in '{dir}'")]
    NoSchemaFiles { dir: String },

    #[error("{path}: {source}")]
    File {
        path: String,
        #[source]
        source: Box<SchemaError>,
    },
}

/// Parse schema text into a [`Schema`].
pub fn parse_schema(text: &str) -> Result<Schema, SchemaError> {
    Parser::default().parse(text)
}

/// Parse a single schema file.
pub fn parse_file(path: &Path) -> Result<Schema, SchemaError> {
    let text = fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_schema(&text).map_err(|source| SchemaError::File {
        path: path.display().to_string(),
        source: Box::new(source),
    })
}

/// Load a schema from a file, or from every `*.cmt` file in a directory.
///
/// Directory entries are read in file-name order and their models concatenated.
pub fn load_schema(path: &Path) -> Result<Schema, SchemaError> {
    if !path.is_dir() {
        return parse_file(path);
    }

    let io_err = |source| SchemaError::Io {
        path: path.display().to_string(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(io_err)? {
        let entry_path = entry.map_err(io_err)?.path();
        if entry_path.extension().is_some_and(|ext| ext == SCHEMA_EXTENSION) {
            files.push(entry_path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(SchemaError::NoSchemaFiles {
            dir: path.display().to_string(),
        });
    }

    let mut schema = Schema::default();
    for file in &files {
        debug!(file = %file.display(), "loading schema file");
        schema.extend(parse_file(file)?);
    }
    Ok(schema)
}

#[derive(Default)]
struct Parser {
    models: Vec<ModelSchema>,
    current: Option<ModelSchema>,
}

/// A declaration split into name, type and the annotation text after the type.
struct Declaration<'a> {
    name: &'a str,
    ty: &'a str,
    rest: &'a str,
    /// Byte offset of `rest` within the line.
    rest_offset: usize,
}

impl<'a> Declaration<'a> {
    fn split(line: &'a str) -> Option<Self> {
        let name_end = line.find(char::is_whitespace)?;
        let after_name = line[name_end..].trim_start();
        if after_name.is_empty() {
            return None;
        }
        let ty_start = line.len() - after_name.len();
        let ty_len = after_name
            .find(char::is_whitespace)
            .unwrap_or(after_name.len());
        let rest_offset = ty_start + ty_len;
        Some(Self {
            name: &line[..name_end],
            ty: &after_name[..ty_len],
            rest: &line[rest_offset..],
            rest_offset,
        })
    }

    fn attributes(&self, line: usize, text: &str) -> Result<Vec<Attribute>, SchemaError> {
        parse_attributes(self.rest).map_err(|e| self.attribute_error(line, text, e, 0))
    }

    fn attribute_error(
        &self,
        line: usize,
        text: &str,
        err: AttributeError,
        base: usize,
    ) -> SchemaError {
        SchemaError::MalformedAttribute {
            line,
            column: self.rest_offset + base + err.offset + 1,
            text: text.to_string(),
            message: err.message,
        }
    }
}

impl Parser {
    fn parse(mut self, text: &str) -> Result<Schema, SchemaError> {
        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            if let Some(rest) = model_header(line) {
                self.open_model(rest, line_no)?;
                continue;
            }

            if self.current.is_none() {
                warn!(line = line_no, text = line, "ignoring text outside a model block");
                continue;
            }

            self.body_line(line, line_no)?;
        }

        if let Some(model) = self.current.take() {
            warn!(model = %model.name, "model block not closed before end of input");
            self.commit(model);
        }

        Ok(Schema {
            models: self.models,
        })
    }

    fn open_model(&mut self, rest: &str, line_no: usize) -> Result<(), SchemaError> {
        if let Some(previous) = self.current.take() {
            warn!(model = %previous.name, line = line_no, "model block not closed before next model");
            self.commit(previous);
        }

        let (name, body) = match rest.split_once('{') {
            Some((name, body)) => (name.trim(), Some(body.trim())),
            None => (rest.trim(), None),
        };
        if name.is_empty() {
            return Err(SchemaError::MissingModelName { line: line_no });
        }

        self.current = Some(ModelSchema::new(name));
        match body {
            Some(body) if !body.is_empty() => self.body_line(body, line_no),
            _ => Ok(()),
        }
    }

    fn body_line(&mut self, line: &str, line_no: usize) -> Result<(), SchemaError> {
        if line == "{" {
            return Ok(());
        }
        if line == "}" {
            self.close_model();
            return Ok(());
        }
        if let Some(decl) = line.strip_suffix('}') {
            let decl = decl.trim();
            if !decl.is_empty() {
                self.declaration(decl, line_no)?;
            }
            self.close_model();
            return Ok(());
        }
        self.declaration(line, line_no)
    }

    fn close_model(&mut self) {
        if let Some(model) = self.current.take() {
            self.commit(model);
        }
    }

    fn commit(&mut self, model: ModelSchema) {
        let primaries = model.fields.iter().filter(|f| f.primary).count();
        if primaries > 1 {
            warn!(model = %model.name, count = primaries, "more than one primary field");
        }
        for (i, field) in model.fields.iter().enumerate() {
            if model.fields[..i].iter().any(|f| f.name == field.name) {
                warn!(model = %model.name, field = %field.name, "duplicate field name");
            }
        }
        debug!(
            model = %model.name,
            table = %model.table_name,
            fields = model.fields.len(),
            relations = model.relations.len(),
            "parsed model"
        );
        self.models.push(model);
    }

    fn declaration(&mut self, line: &str, line_no: usize) -> Result<(), SchemaError> {
        let decl = Declaration::split(line).ok_or_else(|| SchemaError::InvalidDeclaration {
            line: line_no,
            text: line.to_string(),
        })?;

        let Some(model) = self.current.as_mut() else {
            return Ok(());
        };

        if let Some(target) = decl.ty.strip_suffix("[]") {
            let relation = parse_relation(&decl, target, line, line_no)?;
            model.relations.push(relation);
        } else {
            let field = parse_field(&decl, line, line_no)?;
            model.fields.push(field);
        }
        Ok(())
    }
}

/// Returns the text after the `model` keyword, if the line opens a model.
fn model_header(line: &str) -> Option<&str> {
    line.strip_prefix("model")
        .filter(|rest| rest.starts_with(char::is_whitespace))
}

fn parse_field(decl: &Declaration<'_>, line: &str, line_no: usize) -> Result<FieldSchema, SchemaError> {
    let mut field = FieldSchema::new(decl.name, FieldType::parse(decl.ty));
    field.optional = decl.ty.ends_with('?');

    for attr in decl.attributes(line_no, line)? {
        match attr.name.as_str() {
            "id" => field.primary = true,
            "auto" => field.auto_generate = true,
            "unique" => field.unique = true,
            "default" => {
                field.default = Some(parse_default(attr.args.as_deref().unwrap_or("")));
            }
            "updatedAt" => {
                field.field_type = FieldType::DateTime;
                field.default = Some(DefaultValue::Now);
            }
            other => debug!(line = line_no, attribute = other, "ignoring unknown field attribute"),
        }
    }

    Ok(field)
}

fn parse_relation(
    decl: &Declaration<'_>,
    target: &str,
    line: &str,
    line_no: usize,
) -> Result<Relation, SchemaError> {
    let mut relation = Relation {
        name: decl.name.to_string(),
        kind: RelationKind::HasMany,
        model: target.to_string(),
        fields: Vec::new(),
        references: Vec::new(),
    };

    for attr in decl.attributes(line_no, line)? {
        if attr.name != "relation" {
            continue;
        }
        let Some(args) = attr.args.as_deref() else {
            continue;
        };
        let parsed = parse_relation_args(args)
            .map_err(|e| decl.attribute_error(line_no, line, e, attr.offset))?;

        if let Some(label) = parsed.label {
            relation.name = label;
        }
        relation.fields = parsed.fields;
        relation.references = parsed.references;
    }

    if !relation.fields.is_empty() && !relation.references.is_empty() {
        relation.kind = RelationKind::BelongsTo;
    }

    Ok(relation)
}

/// Interprets the argument of `@default(...)`.
///
/// `now()` (quoted or not) becomes [`DefaultValue::Now`], `true`/`false` become
/// booleans, unquoted numbers stay numeric and everything else is text.
pub fn parse_default(raw: &str) -> DefaultValue {
    let raw = raw.trim();
    let quoted = raw.len() >= 2
        && ((raw.starts_with('"') && raw.ends_with('"'))
            || (raw.starts_with('\'') && raw.ends_with('\'')));
    let value = raw.trim_matches(|c| c == '"' || c == '\'');

    match value {
        "now()" | "now" => DefaultValue::Now,
        "true" => DefaultValue::Bool(true),
        "false" => DefaultValue::Bool(false),
        _ if !quoted && is_numeric_literal(value) => DefaultValue::Number(value.to_string()),
        _ => DefaultValue::Text(value.to_string()),
    }
}

fn is_numeric_literal(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
        && value.parse::<f64>().is_ok()
}
