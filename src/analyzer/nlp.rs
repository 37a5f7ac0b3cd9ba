//! Lightweight NLP pipeline: word tokenization plus a lexicon-driven tagger
//! for person, location and organization names.

use tracing::trace;

use super::lexicon::{
    is_first_name, is_location, is_organization_suffix, is_person_title, MAX_LOCATION_WORDS,
};
use super::patterns::WORD_REGEX;
use super::recognizer::Recognizer;
use super::{EntityType, RecognizerResult};

/// Score attached to every entity the tagger emits
pub const NLP_ENTITY_SCORE: f64 = 0.85;

/// Longest person name the tagger will take, in tokens
const MAX_NAME_TOKENS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    fn is_capitalized(&self) -> bool {
        let mut chars = self.text.chars();
        match chars.next() {
            Some(first) if first.is_uppercase() => chars.any(|c| c.is_lowercase()),
            _ => false,
        }
    }
}

/// Output of one pipeline run over a text
#[derive(Debug, Clone, Default)]
pub struct NlpArtifacts {
    pub tokens: Vec<Token>,
    pub entities: Vec<RecognizerResult>,
}

impl NlpArtifacts {
    /// Lower-cased words among the `window` tokens ending before `offset`
    pub fn words_before(&self, offset: usize, window: usize) -> Vec<String> {
        let preceding = self.tokens.iter().take_while(|t| t.end <= offset).count();
        self.tokens[preceding.saturating_sub(window)..preceding]
            .iter()
            .map(|t| t.text.to_lowercase())
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NlpEngine;

impl NlpEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, text: &str) -> NlpArtifacts {
        let tokens: Vec<Token> = WORD_REGEX
            .find_iter(text)
            .map(|m| Token {
                text: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
            })
            .collect();

        let mut entities = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let end = name_group_end(text, &tokens, i);
            if end == i {
                i += 1;
                continue;
            }
            tag_group(&tokens[i..end], &mut entities);
            i = end;
        }

        trace!("NLP pass produced {} tokens, {} entities", tokens.len(), entities.len());
        NlpArtifacts { tokens, entities }
    }
}

fn is_name_like(token: &Token) -> bool {
    token.is_capitalized() || is_organization_suffix(&token.text)
}

/// Exclusive end of the run of name-like tokens starting at `start`. Tokens
/// must be separated by a single space, except after a title ("Dr. Smith").
fn name_group_end(text: &str, tokens: &[Token], start: usize) -> usize {
    if !tokens[start].is_capitalized() {
        return start;
    }

    let mut end = start + 1;
    while end < tokens.len() && is_name_like(&tokens[end]) {
        let gap = &text[tokens[end - 1].end..tokens[end].start];
        let joined = gap == " " || (gap == ". " && is_person_title(&tokens[end - 1].text));
        if !joined {
            break;
        }
        end += 1;
    }
    end
}

fn span(entity: EntityType, tokens: &[Token]) -> RecognizerResult {
    RecognizerResult::new(
        entity,
        tokens[0].start,
        tokens[tokens.len() - 1].end,
        NLP_ENTITY_SCORE,
    )
}

fn location_len(group: &[Token]) -> Option<usize> {
    (1..=MAX_LOCATION_WORDS.min(group.len())).rev().find(|&len| {
        let phrase = group[..len]
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        is_location(&phrase)
    })
}

fn tag_group(group: &[Token], entities: &mut Vec<RecognizerResult>) {
    if group.len() >= 2 && is_organization_suffix(&group[group.len() - 1].text) {
        entities.push(span(EntityType::Organization, group));
        return;
    }

    let mut j = 0;
    while j < group.len() {
        let rest = &group[j..];

        if is_person_title(&rest[0].text) && rest.len() > 1 {
            let len = (rest.len() - 1).min(MAX_NAME_TOKENS);
            entities.push(span(EntityType::Person, &rest[1..1 + len]));
            j += 1 + len;
        } else if is_first_name(&rest[0].text) {
            let len = rest
                .iter()
                .take(MAX_NAME_TOKENS)
                .take_while(|t| t.is_capitalized())
                .count();
            entities.push(span(EntityType::Person, &rest[..len]));
            j += len;
        } else if let Some(len) = location_len(rest) {
            entities.push(span(EntityType::Location, &rest[..len]));
            j += len;
        } else {
            j += 1;
        }
    }
}

/// Exposes the NLP engine's entities to the analyzer
#[derive(Debug, Clone, Default)]
pub struct NlpRecognizer;

impl Recognizer for NlpRecognizer {
    fn name(&self) -> &str {
        "NlpRecognizer"
    }

    fn supported_entities(&self) -> Vec<EntityType> {
        vec![EntityType::Person, EntityType::Location, EntityType::Organization]
    }

    fn analyze(&self, _text: &str, artifacts: &NlpArtifacts) -> Vec<RecognizerResult> {
        artifacts.entities.clone()
    }
}
