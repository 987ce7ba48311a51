//! Schema language front end.
//!
//! Compiles schema text into a dialect-independent intermediate representation.
//!
//! # Overview
//!
//! 1. **Core Types** (`definition.rs`):
//!    - `Schema` - ordered list of models
//!    - `ModelSchema` - one model block with its derived table name
//!    - `FieldSchema` - a scalar column with flags and an optional default
//!    - `Relation` - a `hasMany`/`belongsTo` link to another model
//!
//! 2. **Parsing** (`parser.rs`, `attributes.rs`):
//!    - Line-oriented block scanner
//!    - Recursive-descent annotation parser for `@name(args)` tokens
//!
//! 3. **Type Mapping** (`typemap.rs`):
//!    - Schema type name + dialect → concrete column type

mod attributes;
mod definition;
mod parser;
pub mod typemap;

pub use attributes::{parse_attributes, parse_relation_args, Attribute, AttributeError, RelationArgs};
pub use definition::{
    DefaultValue, FieldSchema, FieldType, ModelSchema, Relation, RelationKind, Schema,
};
pub use parser::{load_schema, parse_default, parse_file, parse_schema, SchemaError, SCHEMA_EXTENSION};
