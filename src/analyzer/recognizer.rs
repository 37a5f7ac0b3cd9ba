use regex::{Regex, RegexBuilder};
use tracing::{debug, trace};

use super::nlp::NlpArtifacts;
use super::patterns::*;
use super::{EntityType, RecognizerResult, MAX_SCORE};

/// Entity label and score given to the user-supplied pattern.
pub const CUSTOM_PATTERN_NAME: &str = "custom_pattern";
pub const CUSTOM_PATTERN_SCORE: f64 = 0.85;

/// Compiled size cap for user-supplied patterns.
const CUSTOM_REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Result of validating a raw pattern match.
/// `Some(true)` promotes the score to `MAX_SCORE`, `Some(false)` drops the match.
pub type Validator = fn(&str) -> Option<bool>;

/// A detection rule that can be registered with the analyzer
pub trait Recognizer: Send + Sync {
    fn name(&self) -> &str;

    fn supported_entities(&self) -> Vec<EntityType>;

    /// Words that, found just before a match, raise its score.
    fn context(&self) -> &[&'static str] {
        &[]
    }

    fn analyze(&self, text: &str, artifacts: &NlpArtifacts) -> Vec<RecognizerResult>;
}

/// A named regular expression with its base score
#[derive(Debug, Clone)]
pub struct Pattern {
    pub name: String,
    pub regex: Regex,
    pub score: f64,
}

impl Pattern {
    pub fn new(name: &str, regex: &Regex, score: f64) -> Self {
        Self {
            name: name.to_string(),
            regex: regex.clone(),
            score,
        }
    }
}

/// Regex-driven recognizer for a single entity type
#[derive(Clone)]
pub struct PatternRecognizer {
    name: String,
    entity: EntityType,
    patterns: Vec<Pattern>,
    context: Vec<&'static str>,
    validator: Option<Validator>,
}

impl PatternRecognizer {
    pub fn new(name: &str, entity: EntityType, patterns: Vec<Pattern>) -> Self {
        Self {
            name: name.to_string(),
            entity,
            patterns,
            context: Vec::new(),
            validator: None,
        }
    }

    pub fn with_context(mut self, words: &[&'static str]) -> Self {
        self.context = words.to_vec();
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn entity(&self) -> EntityType {
        self.entity
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

impl Recognizer for PatternRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_entities(&self) -> Vec<EntityType> {
        vec![self.entity]
    }

    fn context(&self) -> &[&'static str] {
        &self.context
    }

    fn analyze(&self, text: &str, _artifacts: &NlpArtifacts) -> Vec<RecognizerResult> {
        let mut results = Vec::new();

        for pattern in &self.patterns {
            for found in pattern.regex.find_iter(text) {
                if found.as_str().is_empty() {
                    continue;
                }

                let score = match self.validator.map(|validate| validate(found.as_str())) {
                    Some(Some(true)) => MAX_SCORE,
                    Some(Some(false)) => {
                        trace!("{} rejected candidate at {}..{}", self.name, found.start(), found.end());
                        continue;
                    }
                    _ => pattern.score,
                };

                results.push(RecognizerResult::new(
                    self.entity,
                    found.start(),
                    found.end(),
                    score,
                ));
            }
        }

        results
    }
}

/// Builds the single-pattern recognizer for a user-supplied regex.
///
/// Returns `None` both when no pattern was given and when it fails to compile;
/// callers can't tell the two apart.
pub fn build_custom_regex_recognizer(pattern: Option<&str>) -> Option<PatternRecognizer> {
    let pattern = pattern.filter(|p| !p.trim().is_empty())?;

    match RegexBuilder::new(pattern)
        .size_limit(CUSTOM_REGEX_SIZE_LIMIT)
        .build()
    {
        Ok(regex) => Some(PatternRecognizer::new(
            "CustomRegexRecognizer",
            EntityType::CustomPii,
            vec![Pattern {
                name: CUSTOM_PATTERN_NAME.to_string(),
                regex,
                score: CUSTOM_PATTERN_SCORE,
            }],
        )),
        Err(e) => {
            debug!("Ignoring custom pattern that failed to compile: {}", e);
            None
        }
    }
}

pub fn credit_card_recognizer() -> PatternRecognizer {
    PatternRecognizer::new(
        "CreditCardRecognizer",
        EntityType::CreditCard,
        vec![Pattern::new("all_credit_cards", &CREDIT_CARD_REGEX, 0.3)],
    )
    .with_context(&[
        "credit", "card", "visa", "mastercard", "cc", "amex", "discover", "jcb", "diners",
        "maestro", "instapayment",
    ])
    .with_validator(validate_credit_card)
}

pub fn email_recognizer() -> PatternRecognizer {
    PatternRecognizer::new(
        "EmailRecognizer",
        EntityType::EmailAddress,
        vec![Pattern::new("email", &EMAIL_REGEX, 0.5)],
    )
    .with_context(&["email", "mail", "e-mail"])
    .with_validator(validate_email)
}

pub fn phone_recognizer() -> PatternRecognizer {
    PatternRecognizer::new(
        "PhoneRecognizer",
        EntityType::PhoneNumber,
        vec![
            Pattern::new("phone_nanp", &PHONE_REGEX, 0.4),
            Pattern::new("phone_international", &INTL_PHONE_REGEX, 0.4),
        ],
    )
    .with_context(&["phone", "number", "telephone", "tel", "cell", "cellphone", "mobile", "call", "fax"])
    .with_validator(validate_phone)
}

pub fn us_ssn_recognizer() -> PatternRecognizer {
    PatternRecognizer::new(
        "UsSsnRecognizer",
        EntityType::UsSsn,
        vec![Pattern::new("ssn", &US_SSN_REGEX, 0.5)],
    )
    .with_context(&["social", "security", "ssn", "ssns", "ssid"])
    .with_validator(invalidate_ssn)
}

pub fn ip_recognizer() -> PatternRecognizer {
    PatternRecognizer::new(
        "IpRecognizer",
        EntityType::IpAddress,
        vec![Pattern::new("ipv4", &IPV4_REGEX, 0.6)],
    )
    .with_context(&["ip", "ipv4"])
    .with_validator(invalidate_ipv4)
}

pub fn url_recognizer() -> PatternRecognizer {
    PatternRecognizer::new(
        "UrlRecognizer",
        EntityType::Url,
        vec![Pattern::new("url", &URL_REGEX, 0.5)],
    )
    .with_context(&["url", "website", "link", "site"])
}

pub fn iban_recognizer() -> PatternRecognizer {
    PatternRecognizer::new(
        "IbanRecognizer",
        EntityType::IbanCode,
        vec![Pattern::new("iban", &IBAN_REGEX, 0.5)],
    )
    .with_context(&["iban", "bank", "transaction"])
    .with_validator(validate_iban)
}

/// Luhn checksum over the digits of a candidate card number
pub fn validate_credit_card(candidate: &str) -> Option<bool> {
    let digits: Vec<u32> = candidate.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 12 {
        return Some(false);
    }

    let checksum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    Some(checksum % 10 == 0)
}

fn validate_email(candidate: &str) -> Option<bool> {
    let tld = candidate.rsplit('.').next()?;
    let valid = (2..=24).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic());
    Some(valid)
}

fn validate_phone(candidate: &str) -> Option<bool> {
    let digits = candidate.chars().filter(char::is_ascii_digit).count();
    if (7..=15).contains(&digits) {
        None
    } else {
        Some(false)
    }
}

fn invalidate_ssn(candidate: &str) -> Option<bool> {
    let digits: String = candidate.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 9 {
        return Some(false);
    }

    let (area, rest) = digits.split_at(3);
    let (group, serial) = rest.split_at(2);
    let invalid = area == "000"
        || area == "666"
        || area.starts_with('9')
        || group == "00"
        || serial == "0000"
        || digits.chars().all(|c| c == digits.as_bytes()[0] as char);

    if invalid { Some(false) } else { None }
}

fn invalidate_ipv4(candidate: &str) -> Option<bool> {
    let valid = candidate
        .split('.')
        .all(|octet| octet.parse::<u16>().map(|n| n <= 255).unwrap_or(false));
    if valid { None } else { Some(false) }
}

/// ISO 13616 mod-97 check
fn validate_iban(candidate: &str) -> Option<bool> {
    let compact: String = candidate.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() < 15 || compact.len() > 34 {
        return Some(false);
    }

    let (head, tail) = compact.split_at(4);
    let mut remainder: u32 = 0;
    for c in tail.chars().chain(head.chars()) {
        let value = c.to_digit(36)?;
        remainder = if value >= 10 {
            (remainder * 100 + value) % 97
        } else {
            (remainder * 10 + value) % 97
        };
    }

    Some(remainder == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(recognizer: &PatternRecognizer, text: &str) -> Vec<RecognizerResult> {
        recognizer.analyze(text, &NlpArtifacts::default())
    }

    #[test]
    fn test_custom_recognizer_absent_or_empty() {
        assert!(build_custom_regex_recognizer(None).is_none());
        assert!(build_custom_regex_recognizer(Some("")).is_none());
        assert!(build_custom_regex_recognizer(Some("   ")).is_none());
    }

    #[test]
    fn test_custom_recognizer_invalid_pattern_is_swallowed() {
        assert!(build_custom_regex_recognizer(Some("(unclosed")).is_none());
        assert!(build_custom_regex_recognizer(Some("[z-a]")).is_none());
    }

    #[test]
    fn test_custom_recognizer_matches() {
        let recognizer = build_custom_regex_recognizer(Some(r"EMP-\d{4}")).unwrap();
        assert_eq!(recognizer.entity(), EntityType::CustomPii);
        assert_eq!(recognizer.patterns()[0].name, CUSTOM_PATTERN_NAME);

        let results = run(&recognizer, "badge EMP-1234 issued");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].start, 6);
        assert_eq!(results[0].end, 14);
        assert_eq!(results[0].score, CUSTOM_PATTERN_SCORE);
    }

    #[test]
    fn test_custom_recognizer_skips_empty_matches() {
        let recognizer = build_custom_regex_recognizer(Some("x*")).unwrap();
        let results = run(&recognizer, "abc x");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].start, 4);
    }

    #[test]
    fn test_luhn() {
        assert_eq!(validate_credit_card("4111 1111 1111 1111"), Some(true));
        assert_eq!(validate_credit_card("4111-1111-1111-1112"), Some(false));
    }

    #[test]
    fn test_credit_card_validated_score() {
        let results = run(&credit_card_recognizer(), "card 4111111111111111 on file");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, MAX_SCORE);

        assert!(run(&credit_card_recognizer(), "card 4111111111111112").is_empty());
    }

    #[test]
    fn test_email_validated() {
        let results = run(&email_recognizer(), "write to john@example.com today");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, MAX_SCORE);
        assert_eq!(&"write to john@example.com today"[results[0].start..results[0].end], "john@example.com");
    }

    #[test]
    fn test_phone_formats() {
        let text = "Call (555) 123-4567 or +44 20 7946 0958";
        let results = run(&phone_recognizer(), text);
        let found: Vec<&str> = results.iter().map(|r| &text[r.start..r.end]).collect();
        assert!(found.contains(&"(555) 123-4567"));
        assert!(found.iter().any(|f| f.starts_with("+44")));
    }

    #[test]
    fn test_ssn_invalidation() {
        assert_eq!(run(&us_ssn_recognizer(), "ssn 123-45-6789").len(), 1);
        assert!(run(&us_ssn_recognizer(), "ssn 000-45-6789").is_empty());
        assert!(run(&us_ssn_recognizer(), "ssn 666-45-6789").is_empty());
    }

    #[test]
    fn test_ipv4_octets() {
        assert_eq!(run(&ip_recognizer(), "host 192.168.1.10 up").len(), 1);
        assert!(run(&ip_recognizer(), "version 999.1.1.1").is_empty());
    }

    #[test]
    fn test_iban_checksum() {
        assert_eq!(validate_iban("GB82 WEST 1234 5698 7654 32"), Some(true));
        assert_eq!(validate_iban("GB82 WEST 1234 5698 7654 33"), Some(false));
    }

    #[test]
    fn test_url() {
        let text = "see https://example.com/path, thanks";
        let results = run(&url_recognizer(), text);
        assert_eq!(results.len(), 1);
        assert_eq!(&text[results[0].start..results[0].end], "https://example.com/path");
    }
}
