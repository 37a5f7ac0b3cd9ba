use pii_anonymizer::files::{process_file, FileUpload, Mode, PDF_MESSAGE, UNSUPPORTED_MESSAGE};
use pii_anonymizer::pii::{PiiService, Whitelist};
use serde_json::{json, Value};

fn upload(name: &str, content: &str) -> FileUpload {
    FileUpload::new(name, content.as_bytes())
}

#[test]
fn test_quick_text_anonymization() {
    let service = PiiService::default();
    let anonymized = service.anonymize_text(
        "Contact John Doe at john@example.com",
        None,
        &Whitelist::default(),
    );
    assert_eq!(anonymized, "Contact <PERSON> at <EMAIL_ADDRESS>");
}

#[test]
fn test_whitelisted_name_is_kept() {
    let service = PiiService::default();
    let anonymized = service.anonymize_text(
        "Contact John Doe at john@example.com",
        None,
        &Whitelist::parse(Some("John Doe")),
    );
    assert_eq!(anonymized, "Contact John Doe at <EMAIL_ADDRESS>");
}

#[test]
fn test_whitelisted_possessive_name() {
    let service = PiiService::default();
    let anonymized = service.anonymize_text(
        "John Doe's email is john@example.com",
        None,
        &Whitelist::parse(Some("John Doe")),
    );
    assert_eq!(anonymized, "John Doe's email is <EMAIL_ADDRESS>");
}

#[test]
fn test_anonymized_output_is_stable() {
    let service = PiiService::default();
    let whitelist = Whitelist::default();
    let once = service.anonymize_text(
        "Call Mary Johnson on 212-555-0147 or mail mary@example.org",
        None,
        &whitelist,
    );
    let twice = service.anonymize_text(&once, None, &whitelist);
    assert_eq!(once, twice);
    assert!(!once.contains("Mary"));
    assert!(!once.contains("212-555-0147"));
}

#[test]
fn test_custom_pattern_and_detection_list() {
    let service = PiiService::default();
    let matches = service.detect_pii("Ticket EMP-0042 for jane@example.com", Some(r"EMP-\d{4}"));
    let rendered = serde_json::to_value(&matches).unwrap();
    assert_eq!(
        rendered,
        json!([
            { "entity": "CUSTOM_PII", "score": 0.85, "text": "EMP-0042" },
            { "entity": "EMAIL_ADDRESS", "score": 1.0, "text": "jane@example.com" }
        ])
    );
}

#[test]
fn test_csv_file_anonymized() {
    let outcome = process_file(
        &PiiService::default(),
        Some(&upload("people.csv", "name,email\nJohn Doe,john@example.com\n")),
        None,
        None,
        Mode::Anonymize,
    );
    assert_eq!(outcome.display, "name,email\n<PERSON>,<EMAIL_ADDRESS>\n");
    assert_eq!(outcome.payload.as_deref(), Some(outcome.display.as_str()));
}

#[test]
fn test_json_file_keeps_structure() {
    let outcome = process_file(
        &PiiService::default(),
        Some(&upload(
            "contacts.json",
            r#"{"owner": "John Doe", "tags": ["vip", 3], "email": "john@example.com"}"#,
        )),
        None,
        None,
        Mode::Anonymize,
    );
    let output: Value = serde_json::from_str(&outcome.display).unwrap();
    assert_eq!(
        output,
        json!({ "owner": "<PERSON>", "tags": ["vip", 3], "email": "<EMAIL_ADDRESS>" })
    );
    let keys: Vec<&String> = output.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["owner", "tags", "email"]);
}

#[test]
fn test_pdf_and_unknown_extensions() {
    let service = PiiService::default();
    for mode in [Mode::Detect, Mode::Anonymize] {
        let pdf = process_file(&service, Some(&upload("scan.pdf", "%PDF-1.7")), None, None, mode);
        assert_eq!(pdf.display, PDF_MESSAGE);
        assert!(pdf.payload.is_none());

        let other = process_file(&service, Some(&upload("data.xyz", "x")), None, None, mode);
        assert_eq!(other.display, UNSUPPORTED_MESSAGE);
        assert!(other.payload.is_none());
    }
}

#[test]
fn test_malformed_json_is_reported() {
    let outcome = process_file(
        &PiiService::default(),
        Some(&upload("broken.json", "{\"a\": ")),
        None,
        None,
        Mode::Detect,
    );
    assert!(outcome.display.starts_with("Error processing broken.json: Failed to parse JSON"));
    assert!(outcome.payload.is_none());
}
