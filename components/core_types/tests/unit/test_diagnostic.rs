//! Unit tests for Diagnostic and DiagnosticKind

use core_types::{Diagnostic, DiagnosticKind, SourcePosition};

#[test]
fn test_builder_methods() {
    let diagnostic = Diagnostic::new(DiagnosticKind::Syntax, "unexpected input")
        .at(SourcePosition::from_offset("let", 1))
        .expecting(vec!["\"=\"".to_string()]);
    assert_eq!(diagnostic.kind, DiagnosticKind::Syntax);
    assert_eq!(diagnostic.position.unwrap().column, 2);
    assert_eq!(diagnostic.expected, vec!["\"=\"".to_string()]);
}

#[test]
fn test_display_without_position() {
    let diagnostic = Diagnostic::new(DiagnosticKind::Dispatch, "worker disconnected");
    assert_eq!(diagnostic.to_string(), "worker disconnected");
}

#[test]
fn test_json_roundtrip_preserves_position() {
    let diagnostic = Diagnostic::new(DiagnosticKind::Incomplete, "trailing input")
        .at(SourcePosition::from_offset("a\nb", 2));
    let json = serde_json::to_string(&diagnostic).unwrap();
    let back: Diagnostic = serde_json::from_str(&json).unwrap();
    assert_eq!(back, diagnostic);
}

#[test]
fn test_missing_optional_fields_deserialize() {
    let back: Diagnostic =
        serde_json::from_str(r#"{"kind":"configuration","message":"no rule"}"#).unwrap();
    assert_eq!(back.kind, DiagnosticKind::Configuration);
    assert!(back.position.is_none());
    assert!(back.expected.is_empty());
}
