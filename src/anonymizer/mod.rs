pub mod operators;

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

use crate::analyzer::{EntityType, RecognizerResult};
pub use self::operators::{AnonymizerConfig, Operator};

/// One replacement applied to the output text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorResult {
    pub entity_type: EntityType,
    pub operator: &'static str,
    /// Byte offsets into the anonymized text
    pub start: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnonymizedText {
    pub text: String,
    pub items: Vec<OperatorResult>,
}

#[derive(Debug, Clone)]
pub struct AnonymizerEngine {
    default_operator: Operator,
    operators: HashMap<EntityType, Operator>,
}

impl AnonymizerEngine {
    pub fn new(config: &AnonymizerConfig) -> Self {
        let mut operators = HashMap::new();
        for (label, operator) in &config.operators {
            match label.parse::<EntityType>() {
                Ok(entity) => {
                    operators.insert(entity, operator.clone());
                }
                Err(e) => warn!("Ignoring operator override: {}", e),
            }
        }

        Self {
            default_operator: config.default_operator.clone(),
            operators,
        }
    }

    fn operator_for(&self, entity: EntityType) -> &Operator {
        self.operators.get(&entity).unwrap_or(&self.default_operator)
    }

    /// Rewrites every span in `results`, copying all other text verbatim.
    pub fn anonymize(&self, text: &str, results: &[RecognizerResult]) -> AnonymizedText {
        let spans = resolve_conflicts(results, text.len());
        trace!("{} of {} results survive conflict resolution", spans.len(), results.len());

        let mut output = String::with_capacity(text.len());
        let mut items = Vec::with_capacity(spans.len());
        let mut cursor = 0;

        for span in spans {
            output.push_str(&text[cursor..span.start]);

            let operator = self.operator_for(span.entity_type);
            let replacement = operator.operate(&text[span.start..span.end], span.entity_type);
            let start = output.len();
            output.push_str(&replacement);

            items.push(OperatorResult {
                entity_type: span.entity_type,
                operator: operator.name(),
                start,
                end: output.len(),
                text: replacement,
            });
            cursor = span.end;
        }
        output.push_str(&text[cursor..]);

        debug!("Anonymized {} spans", items.len());
        AnonymizedText { text: output, items }
    }
}

impl Default for AnonymizerEngine {
    fn default() -> Self {
        Self::new(&AnonymizerConfig::default())
    }
}

/// Produces non-overlapping spans sorted by start.
///
/// Same-type overlaps are merged; a result enclosed by another with an equal
/// or higher score is dropped; leftover partial overlaps keep the higher
/// score, the earlier span on ties.
fn resolve_conflicts(results: &[RecognizerResult], text_len: usize) -> Vec<RecognizerResult> {
    let mut candidates: Vec<RecognizerResult> = results
        .iter()
        .filter(|r| !r.is_empty() && r.end <= text_len)
        .copied()
        .collect();
    candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut merged: Vec<RecognizerResult> = Vec::with_capacity(candidates.len());
    for result in candidates {
        match merged
            .iter_mut()
            .find(|m| m.entity_type == result.entity_type && m.intersects(&result))
        {
            Some(existing) => {
                existing.start = existing.start.min(result.start);
                existing.end = existing.end.max(result.end);
                existing.score = existing.score.max(result.score);
            }
            None => merged.push(result),
        }
    }

    let unique: Vec<RecognizerResult> = merged
        .iter()
        .enumerate()
        .filter(|(i, r)| {
            !merged.iter().enumerate().any(|(j, other)| {
                *i != j
                    && other.contains(r)
                    && other.score >= r.score
                    && (other.score > r.score || other.len() > r.len() || j < *i)
            })
        })
        .map(|(_, r)| *r)
        .collect();

    let mut by_rank = unique;
    by_rank.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.start.cmp(&b.start)));

    let mut chosen: Vec<RecognizerResult> = Vec::with_capacity(by_rank.len());
    for result in by_rank {
        if chosen.iter().all(|c| !c.intersects(&result)) {
            chosen.push(result);
        }
    }

    chosen.sort_by_key(|r| r.start);
    chosen
}
