use serde::Deserialize;
use std::collections::HashMap;

use crate::analyzer::EntityType;

/// How a detected span is rewritten
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Operator {
    /// Replace with `new_value`, or `<ENTITY_TYPE>` when unset
    Replace {
        #[serde(default)]
        new_value: Option<String>,
    },
    /// Remove the span entirely
    Redact,
    /// Overwrite characters with `masking_char`
    Mask {
        #[serde(default = "default_masking_char")]
        masking_char: char,
        #[serde(default = "default_chars_to_mask")]
        chars_to_mask: usize,
        #[serde(default)]
        from_end: bool,
    },
}

fn default_masking_char() -> char {
    '*'
}

fn default_chars_to_mask() -> usize {
    usize::MAX
}

impl Default for Operator {
    fn default() -> Self {
        Operator::Replace { new_value: None }
    }
}

impl Operator {
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Replace { .. } => "replace",
            Operator::Redact => "redact",
            Operator::Mask { .. } => "mask",
        }
    }

    pub fn operate(&self, original: &str, entity: EntityType) -> String {
        match self {
            Operator::Replace { new_value } => new_value
                .clone()
                .unwrap_or_else(|| format!("<{}>", entity)),
            Operator::Redact => String::new(),
            Operator::Mask { masking_char, chars_to_mask, from_end } => {
                let total = original.chars().count();
                let masked = (*chars_to_mask).min(total);
                original
                    .chars()
                    .enumerate()
                    .map(|(i, c)| {
                        let hit = if *from_end { i >= total - masked } else { i < masked };
                        if hit { *masking_char } else { c }
                    })
                    .collect()
            }
        }
    }
}

/// Default operator plus per-entity overrides keyed by entity label
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnonymizerConfig {
    pub default_operator: Operator,
    pub operators: HashMap<String, Operator>,
}
