use std::error::Error;

use serde::Serialize;

use super::ParseCmd;
use crate::commands::{load_command_schema, Execute};
use crate::config::ConfigFile;
use crate::schema::ModelSchema;

/// Result of the parse command execution
#[derive(Debug, Serialize)]
pub struct ParseResult {
    pub source: String,
    pub models: Vec<ModelSchema>,
}

impl Execute for ParseCmd {
    type Output = ParseResult;

    fn execute(self, config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>> {
        let (path, schema) = load_command_schema(self.path.as_deref(), config)?;
        tracing::debug!(source = %path.display(), models = schema.models.len(), "parsed schema");

        Ok(ParseResult {
            source: path.display().to_string(),
            models: schema.models,
        })
    }
}
