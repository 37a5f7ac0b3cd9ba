use once_cell::sync::Lazy;
use regex::Regex;

pub static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z0-9-]{2,}\b")
        .unwrap()
});

pub static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{3}\)|\b\d{3})[\s.-]?\d{3}[\s.-]?\d{4}\b").unwrap()
});

pub static INTL_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\+\d{1,3}(?:[\s.-]?\d{2,4}){2,5}\b").unwrap()
});

pub static CREDIT_CARD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:4\d{3}|5[0-5]\d{2}|6\d{3}|1\d{3}|3\d{3})[- ]?\d{3,4}[- ]?\d{3,4}[- ]?\d{3,5}\b").unwrap()
});

pub static US_SSN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{3}[- .]\d{2}[- .]\d{4}\b").unwrap()
});

pub static IPV4_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").unwrap()
});

pub static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b(?:https?://|www\.)[^\s<>"']+[^\s<>"'.,;:!?)\]]"#).unwrap()
});

pub static IBAN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z]{2}\d{2}(?: ?[A-Z0-9]{4}){2,7}(?: ?[A-Z0-9]{1,3})?\b").unwrap()
});

/// Word tokens used by the NLP engine and for context lookups. Apostrophes
/// split tokens so possessives ("Doe's") keep the name intact.
pub static WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\p{L}+(?:-\p{L}+)*|\d+").unwrap()
});
