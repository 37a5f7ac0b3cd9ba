//! Detection and anonymization helpers shared by every entry point.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, instrument};

use crate::analyzer::{
    build_custom_regex_recognizer, AnalyzerConfig, AnalyzerEngine, EntityType, RecognizerResult,
};
use crate::anonymizer::{AnonymizerConfig, AnonymizerEngine};

/// Entities reported by `detect_pii`. Anonymization always uses every entity.
pub const DETECTION_ENTITIES: [EntityType; 6] = [
    EntityType::Person,
    EntityType::EmailAddress,
    EntityType::PhoneNumber,
    EntityType::Location,
    EntityType::CreditCard,
    EntityType::CustomPii,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionMatch {
    pub entity: EntityType,
    pub score: f64,
    pub text: String,
}

/// Literal values that must never be anonymized. Matching is exact and
/// case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist(HashSet<String>);

impl Whitelist {
    /// Splits a comma-separated list, trimming each entry
    pub fn parse(raw: Option<&str>) -> Self {
        let entries = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();
        Whitelist(entries)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.contains(value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

/// The process-wide engines. Built once, then shared read-only.
pub struct PiiService {
    analyzer: AnalyzerEngine,
    anonymizer: AnonymizerEngine,
}

impl PiiService {
    pub fn new(analyzer: &AnalyzerConfig, anonymizer: &AnonymizerConfig) -> Self {
        Self {
            analyzer: AnalyzerEngine::new(analyzer),
            anonymizer: AnonymizerEngine::new(anonymizer),
        }
    }

    pub fn with_engines(analyzer: AnalyzerEngine, anonymizer: AnonymizerEngine) -> Self {
        Self { analyzer, anonymizer }
    }

    pub fn analyzer(&self) -> &AnalyzerEngine {
        &self.analyzer
    }

    fn analyze(
        &self,
        text: &str,
        entities: Option<&[EntityType]>,
        custom_regex: Option<&str>,
    ) -> Vec<RecognizerResult> {
        match build_custom_regex_recognizer(custom_regex) {
            Some(custom) => self.analyzer.analyze(text, entities, &[&custom]),
            None => self.analyzer.analyze(text, entities, &[]),
        }
    }

    /// Finds PII of the reported entity types, scores rounded to 3 places
    #[instrument(skip_all, fields(len = text.len()))]
    pub fn detect_pii(&self, text: &str, custom_regex: Option<&str>) -> Vec<DetectionMatch> {
        self.analyze(text, Some(&DETECTION_ENTITIES), custom_regex)
            .into_iter()
            .map(|r| DetectionMatch {
                entity: r.entity_type,
                score: round_score(r.score),
                text: text[r.start..r.end].to_string(),
            })
            .collect()
    }

    /// Replaces every non-whitelisted PII span with its placeholder
    #[instrument(skip_all, fields(len = text.len()))]
    pub fn anonymize_text(
        &self,
        text: &str,
        custom_regex: Option<&str>,
        whitelist: &Whitelist,
    ) -> String {
        let mut results = self.analyze(text, None, custom_regex);

        if !whitelist.is_empty() {
            let before = results.len();
            results.retain(|r| !whitelist.contains(&text[r.start..r.end]));
            debug!("Whitelist kept {} spans", before - results.len());
        }

        self.anonymizer.anonymize(text, &results).text
    }
}

impl Default for PiiService {
    fn default() -> Self {
        Self::new(&AnalyzerConfig::default(), &AnonymizerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymizer::Operator;
    use std::collections::HashMap;

    #[test]
    fn test_whitelist_parse() {
        let whitelist = Whitelist::parse(Some(" John Doe , ACME,, "));
        assert_eq!(whitelist.len(), 2);
        assert!(whitelist.contains("John Doe"));
        assert!(whitelist.contains("ACME"));
        assert!(!whitelist.contains("john doe"));
        assert!(Whitelist::parse(None).is_empty());
        assert!(Whitelist::parse(Some("")).is_empty());
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.85), 0.85);
        assert_eq!(round_score(0.123456), 0.123);
        assert_eq!(round_score(0.4 + 0.35), 0.75);
    }

    #[test]
    fn test_detect_empty_text() {
        assert!(PiiService::default().detect_pii("", None).is_empty());
    }

    #[test]
    fn test_detect_excludes_unreported_entities() {
        let matches = PiiService::default().detect_pii("Jane Smith works at Globex Corp", None);
        assert_eq!(
            matches,
            vec![DetectionMatch {
                entity: EntityType::Person,
                score: 0.85,
                text: "Jane Smith".to_string(),
            }]
        );
    }

    #[test]
    fn test_detect_with_custom_regex() {
        let matches = PiiService::default().detect_pii("id EMP-1234", Some(r"EMP-\d{4}"));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].entity, EntityType::CustomPii);
        assert_eq!(matches[0].text, "EMP-1234");
    }

    #[test]
    fn test_detect_with_invalid_regex_falls_back() {
        let matches = PiiService::default().detect_pii("mail john@example.com", Some("(oops"));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].entity, EntityType::EmailAddress);
    }

    #[test]
    fn test_anonymize_uses_all_entities() {
        let anonymized = PiiService::default().anonymize_text(
            "Jane Smith works at Globex Corp",
            None,
            &Whitelist::default(),
        );
        assert_eq!(anonymized, "<PERSON> works at <ORGANIZATION>");
    }

    #[test]
    fn test_whitelist_beats_custom_pattern() {
        let anonymized = PiiService::default().anonymize_text(
            "code ALPHA and BETA",
            Some("ALPHA|BETA"),
            &Whitelist::parse(Some("ALPHA")),
        );
        assert_eq!(anonymized, "code ALPHA and <CUSTOM_PII>");
    }

    #[test]
    fn test_injected_anonymizer_operators() {
        let anonymizer = AnonymizerEngine::new(&AnonymizerConfig {
            default_operator: Operator::Redact,
            operators: HashMap::from([(
                "EMAIL_ADDRESS".to_string(),
                Operator::Mask { masking_char: '*', chars_to_mask: 4, from_end: true },
            )]),
        });
        let service = PiiService::with_engines(
            AnalyzerEngine::new(&AnalyzerConfig::default()),
            anonymizer,
        );

        let anonymized = service.anonymize_text(
            "Contact John Doe at john@example.com",
            None,
            &Whitelist::default(),
        );
        assert_eq!(anonymized, "Contact  at john@example****");
    }
}
