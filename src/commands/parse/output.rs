//! Output formatting for parse command results.

use super::execute::ParseResult;
use crate::output::{align_columns, Outputable};
use crate::schema::{DefaultValue, FieldSchema, ModelSchema, Relation, RelationKind};

impl Outputable for ParseResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Schema: {}", self.source));
        lines.push(String::new());

        if self.models.is_empty() {
            lines.push("No models found.".to_string());
            return lines.join("\n");
        }

        lines.push(format!("Found {} model(s):", self.models.len()));
        for model in &self.models {
            lines.push(String::new());
            format_model(&mut lines, model);
        }

        lines.join("\n")
    }
}

fn format_model(lines: &mut Vec<String>, model: &ModelSchema) {
    lines.push(format!("{} ({})", model.name, model.table_name));

    let mut rows: Vec<Vec<String>> = model.fields.iter().map(field_row).collect();
    rows.extend(model.relations.iter().map(relation_row));

    for line in align_columns(&rows) {
        lines.push(format!("  {}", line));
    }
}

fn field_row(field: &FieldSchema) -> Vec<String> {
    let mut ty = field.field_type.to_string();
    if field.optional {
        ty.push('?');
    }

    let mut flags = Vec::new();
    if field.primary {
        flags.push("primary".to_string());
    }
    if field.auto_generate {
        flags.push("auto".to_string());
    }
    if field.unique {
        flags.push("unique".to_string());
    }
    if let Some(default) = &field.default {
        flags.push(format!("default={}", default_label(default)));
    }

    vec![field.name.clone(), ty, flags.join(" ")]
}

fn relation_row(relation: &Relation) -> Vec<String> {
    let kind = match relation.kind {
        RelationKind::HasMany => "hasMany",
        RelationKind::BelongsTo => "belongsTo",
    };
    let mut detail = kind.to_string();
    if !relation.fields.is_empty() {
        detail.push_str(&format!(
            " ({} -> {})",
            relation.fields.join(", "),
            relation.references.join(", ")
        ));
    }
    vec![relation.name.clone(), format!("{}[]", relation.model), detail]
}

fn default_label(default: &DefaultValue) -> String {
    match default {
        DefaultValue::Now => "now()".to_string(),
        DefaultValue::Bool(b) => b.to_string(),
        DefaultValue::Number(n) => n.clone(),
        DefaultValue::Text(t) => format!("\"{}\"", t),
    }
}
