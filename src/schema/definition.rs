//! Core schema definition types.
//!
//! The parsed, dialect-independent model of a schema file. These values are
//! produced by one parse pass and never mutated afterwards; the drivers read
//! them to generate DDL.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::table_name;

/// Abstract field type as written in the schema.
///
/// Unrecognised names are kept verbatim in `Other` and map to the dialect's
/// generic text type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Int,
    Int64,
    String,
    Boolean,
    Float,
    DateTime,
    Other(String),
}

impl FieldType {
    /// Parses a type name, ignoring a trailing optional marker (`?`).
    pub fn parse(name: &str) -> Self {
        match name.strip_suffix('?').unwrap_or(name) {
            "Int" => FieldType::Int,
            "Int64" => FieldType::Int64,
            "String" => FieldType::String,
            "Boolean" => FieldType::Boolean,
            "Float" => FieldType::Float,
            "DateTime" => FieldType::DateTime,
            other => FieldType::Other(other.to_string()),
        }
    }

    /// Returns the schema-level type name.
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Int => "Int",
            FieldType::Int64 => "Int64",
            FieldType::String => "String",
            FieldType::Boolean => "Boolean",
            FieldType::Float => "Float",
            FieldType::DateTime => "DateTime",
            FieldType::Other(name) => name,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        FieldType::parse(&value)
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

/// Default value attached to a column via `@default(...)` or `@updatedAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DefaultValue {
    /// The current timestamp at insert time (`now()`).
    Now,
    Bool(bool),
    /// Unquoted numeric literal, kept as written.
    Number(String),
    Text(String),
}

/// A single scalar column of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub optional: bool,
    pub unique: bool,
    pub primary: bool,
    pub auto_generate: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<DefaultValue>,
}

impl FieldSchema {
    /// Creates a required field with no flags set.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            optional: false,
            unique: false,
            primary: false,
            auto_generate: false,
            default: None,
        }
    }

    /// True for a primary key whose value the database generates.
    pub fn is_surrogate_key(&self) -> bool {
        self.primary && self.auto_generate
    }
}

/// Relation cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    HasMany,
    BelongsTo,
}

/// A relation between two models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Relation name; the `@relation("...")` label when one is given.
    pub name: String,
    pub kind: RelationKind,
    /// Target model name.
    pub model: String,
    /// Owning-side fields.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<String>,
    /// Referenced fields on the target.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub references: Vec<String>,
}

/// A model block: one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub name: String,
    pub table_name: String,
    pub fields: Vec<FieldSchema>,
    pub relations: Vec<Relation>,
}

impl ModelSchema {
    /// Creates an empty model, deriving the table name from `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table_name: table_name(&name),
            name,
            fields: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// First field marked `@id`, if any.
    pub fn primary_key(&self) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.primary)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }
}

/// Ordered list of models from one or more schema files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub models: Vec<ModelSchema>,
}

impl Schema {
    pub fn model(&self, name: &str) -> Option<&ModelSchema> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Appends the models of another schema, preserving order.
    pub fn extend(&mut self, other: Schema) {
        self.models.extend(other.models);
    }
}
