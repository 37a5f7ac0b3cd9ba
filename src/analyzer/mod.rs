//! PII detection engine.
//!
//! Pattern recognizers cover structured identifiers (cards, emails, phone
//! numbers...) and the NLP engine tags names, places and organizations. The
//! engine is built once at startup and only read afterwards; per-call
//! recognizers such as a user's custom pattern are passed in as ad-hoc
//! recognizers instead of being registered.

pub mod lexicon;
pub mod nlp;
pub mod patterns;
pub mod recognizer;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

use self::nlp::{NlpEngine, NlpRecognizer};
use self::recognizer::{
    credit_card_recognizer, email_recognizer, iban_recognizer, ip_recognizer, phone_recognizer,
    url_recognizer, us_ssn_recognizer, Recognizer,
};

pub use self::recognizer::{build_custom_regex_recognizer, PatternRecognizer};

pub const MAX_SCORE: f64 = 1.0;

/// Score added when a context word precedes a match
const CONTEXT_SIMILARITY_FACTOR: f64 = 0.35;
/// Lowest score a context-enhanced match can have
const MIN_SCORE_WITH_CONTEXT: f64 = 0.4;
/// Tokens before a match searched for context words
const CONTEXT_PREFIX_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Person,
    Location,
    Organization,
    EmailAddress,
    PhoneNumber,
    CreditCard,
    UsSsn,
    IpAddress,
    Url,
    IbanCode,
    CustomPii,
}

impl EntityType {
    pub const ALL: [EntityType; 11] = [
        EntityType::Person,
        EntityType::Location,
        EntityType::Organization,
        EntityType::EmailAddress,
        EntityType::PhoneNumber,
        EntityType::CreditCard,
        EntityType::UsSsn,
        EntityType::IpAddress,
        EntityType::Url,
        EntityType::IbanCode,
        EntityType::CustomPii,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "PERSON",
            EntityType::Location => "LOCATION",
            EntityType::Organization => "ORGANIZATION",
            EntityType::EmailAddress => "EMAIL_ADDRESS",
            EntityType::PhoneNumber => "PHONE_NUMBER",
            EntityType::CreditCard => "CREDIT_CARD",
            EntityType::UsSsn => "US_SSN",
            EntityType::IpAddress => "IP_ADDRESS",
            EntityType::Url => "URL",
            EntityType::IbanCode => "IBAN_CODE",
            EntityType::CustomPii => "CUSTOM_PII",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .iter()
            .copied()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("Unknown entity type: {}", s))
    }
}

/// A detected span: byte offsets into the analysed text
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecognizerResult {
    pub entity_type: EntityType,
    pub start: usize,
    pub end: usize,
    pub score: f64,
}

impl RecognizerResult {
    pub fn new(entity_type: EntityType, start: usize, end: usize, score: f64) -> Self {
        Self { entity_type, start, end, score }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, other: &RecognizerResult) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    pub fn intersects(&self, other: &RecognizerResult) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Results scoring below this are discarded
    pub score_threshold: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self { score_threshold: 0.0 }
    }
}

pub struct AnalyzerEngine {
    nlp: NlpEngine,
    recognizers: Vec<Box<dyn Recognizer>>,
    score_threshold: f64,
}

impl AnalyzerEngine {
    /// Creates an engine with every predefined recognizer loaded
    pub fn new(config: &AnalyzerConfig) -> Self {
        let recognizers: Vec<Box<dyn Recognizer>> = vec![
            Box::new(credit_card_recognizer()),
            Box::new(email_recognizer()),
            Box::new(phone_recognizer()),
            Box::new(us_ssn_recognizer()),
            Box::new(ip_recognizer()),
            Box::new(url_recognizer()),
            Box::new(iban_recognizer()),
            Box::new(NlpRecognizer),
        ];
        Self::with_recognizers(recognizers, config.score_threshold)
    }

    pub fn with_recognizers(recognizers: Vec<Box<dyn Recognizer>>, score_threshold: f64) -> Self {
        debug!(
            "Analyzer loaded recognizers: {:?}",
            recognizers.iter().map(|r| r.name()).collect::<Vec<_>>()
        );
        Self {
            nlp: NlpEngine::new(),
            recognizers,
            score_threshold: score_threshold.clamp(0.0, MAX_SCORE),
        }
    }

    pub fn recognizers(&self) -> &[Box<dyn Recognizer>] {
        &self.recognizers
    }

    /// Runs detection over `text`.
    ///
    /// `entities` restricts both which recognizers run and which results are
    /// kept; `None` means every supported entity. `ad_hoc` recognizers apply
    /// to this call only.
    pub fn analyze(
        &self,
        text: &str,
        entities: Option<&[EntityType]>,
        ad_hoc: &[&dyn Recognizer],
    ) -> Vec<RecognizerResult> {
        if text.is_empty() {
            return Vec::new();
        }

        let wanted = |entity: &EntityType| entities.map_or(true, |list| list.contains(entity));
        let artifacts = self.nlp.process(text);

        let mut active: Vec<&dyn Recognizer> = self.recognizers.iter().map(|r| r.as_ref()).collect();
        active.extend_from_slice(ad_hoc);

        let mut results = Vec::new();
        for recognizer in active {
            if !recognizer.supported_entities().iter().any(|e| wanted(e)) {
                continue;
            }

            let found = recognizer.analyze(text, &artifacts);
            trace!("{} returned {} results", recognizer.name(), found.len());

            let context = recognizer.context();
            for mut result in found {
                if !wanted(&result.entity_type) {
                    continue;
                }
                if !context.is_empty() && result.score < MAX_SCORE {
                    let preceding = artifacts.words_before(result.start, CONTEXT_PREFIX_WINDOW);
                    if preceding.iter().any(|w| context.contains(&w.as_str())) {
                        result.score = (result.score + CONTEXT_SIMILARITY_FACTOR)
                            .max(MIN_SCORE_WITH_CONTEXT)
                            .min(MAX_SCORE);
                    }
                }
                if result.score >= self.score_threshold {
                    results.push(result);
                }
            }
        }

        let results = remove_duplicates(results);
        debug!("Analysis found {} entities in {} bytes", results.len(), text.len());
        results
    }
}

/// Drops results enclosed by a same-type result with an equal or higher
/// score, then returns the rest in document order.
pub fn remove_duplicates(mut results: Vec<RecognizerResult>) -> Vec<RecognizerResult> {
    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.start.cmp(&b.start))
            .then(b.len().cmp(&a.len()))
    });

    let mut kept: Vec<RecognizerResult> = Vec::with_capacity(results.len());
    for result in results {
        let enclosed = kept
            .iter()
            .any(|k| k.entity_type == result.entity_type && k.contains(&result));
        if !enclosed {
            kept.push(result);
        }
    }

    kept.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> AnalyzerEngine {
        AnalyzerEngine::new(&AnalyzerConfig::default())
    }

    fn labels(text: &str, results: &[RecognizerResult]) -> Vec<(EntityType, String)> {
        results
            .iter()
            .map(|r| (r.entity_type, text[r.start..r.end].to_string()))
            .collect()
    }

    #[test]
    fn test_entity_type_labels() {
        assert_eq!(EntityType::EmailAddress.to_string(), "EMAIL_ADDRESS");
        assert_eq!("custom_pii".parse::<EntityType>().unwrap(), EntityType::CustomPii);
        assert!("SOMETHING".parse::<EntityType>().is_err());
        assert_eq!(
            serde_json::to_string(&EntityType::CreditCard).unwrap(),
            "\"CREDIT_CARD\""
        );
    }

    #[test]
    fn test_empty_text() {
        assert!(engine().analyze("", None, &[]).is_empty());
    }

    #[test]
    fn test_document_order() {
        let text = "Contact John Doe at john@example.com";
        let results = engine().analyze(text, None, &[]);
        assert_eq!(
            labels(text, &results),
            vec![
                (EntityType::Person, "John Doe".to_string()),
                (EntityType::EmailAddress, "john@example.com".to_string()),
            ]
        );
    }

    #[test]
    fn test_entity_restriction() {
        let text = "Jane Smith works at Globex Corp";
        let results = engine().analyze(text, Some(&[EntityType::Person]), &[]);
        assert_eq!(labels(text, &results), vec![(EntityType::Person, "Jane Smith".to_string())]);
    }

    #[test]
    fn test_context_enhancement() {
        let text = "phone 555 123 4567";
        let results = engine().analyze(text, Some(&[EntityType::PhoneNumber]), &[]);
        assert_eq!(results.len(), 1);
        assert!((results[0].score - 0.75).abs() < 1e-9);

        let bare = engine().analyze("ref 555 123 4567", Some(&[EntityType::PhoneNumber]), &[]);
        assert!((bare[0].score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_ad_hoc_recognizer_applies_per_call() {
        let engine = engine();
        let custom = build_custom_regex_recognizer(Some(r"EMP-\d+")).unwrap();
        let text = "badge EMP-42";

        let with = engine.analyze(text, None, &[&custom]);
        assert_eq!(labels(text, &with), vec![(EntityType::CustomPii, "EMP-42".to_string())]);

        assert!(engine.analyze(text, None, &[]).is_empty());
    }

    #[test]
    fn test_score_threshold() {
        let engine = AnalyzerEngine::new(&AnalyzerConfig { score_threshold: 0.5 });
        let results = engine.analyze("ref 555 123 4567", None, &[]);
        assert!(results.is_empty());
    }

    #[test]
    fn test_remove_duplicates_keeps_enclosing_higher_score() {
        let results = remove_duplicates(vec![
            RecognizerResult::new(EntityType::PhoneNumber, 2, 8, 0.4),
            RecognizerResult::new(EntityType::PhoneNumber, 0, 10, 0.4),
            RecognizerResult::new(EntityType::PhoneNumber, 0, 10, 0.3),
            RecognizerResult::new(EntityType::Person, 2, 8, 0.85),
        ]);
        assert_eq!(
            results,
            vec![
                RecognizerResult::new(EntityType::PhoneNumber, 0, 10, 0.4),
                RecognizerResult::new(EntityType::Person, 2, 8, 0.85),
            ]
        );
    }
}
