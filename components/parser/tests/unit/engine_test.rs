//! Per-node-kind matching behavior

use core_types::Value;
use parser::{GrammarBuilder, ParseError, ParseOptions, Success};

#[test]
fn test_sequence_returns_matched_substring() {
    let g = GrammarBuilder::new();
    let seq = g.sequence([g.literal("let"), g.regex(r"\s+"), g.regex("[a-z]+")]);
    let parser = g.compile(&seq).unwrap();
    assert_eq!(
        parser.parse("let  abc;"),
        Ok(Success::new(Value::from("let  abc"), 8))
    );
}

#[test]
fn test_sequence_fail_fast() {
    let g = GrammarBuilder::new();
    let seq = g.sequence([g.regex("[a-z]+"), g.literal("=")]);
    let parser = g.compile(&seq).unwrap();
    assert_eq!(
        parser.parse("abc;"),
        Err(ParseError::SequenceStopped {
            position: 3,
            cause: Box::new(ParseError::TerminalUnmatched {
                position: 3,
                expected: "\"=\"".into(),
            }),
        })
    );
}

#[test]
fn test_capture_aggregation() {
    let g = GrammarBuilder::new();
    let seq = g.sequence([
        g.literal("x").with_capture("a"),
        g.literal("y").with_capture("b"),
    ]);
    let parser = g.compile(&seq).unwrap();

    let expected: Value = vec![
        ("a".to_string(), Value::from("x")),
        ("b".to_string(), Value::from("y")),
    ]
    .into_iter()
    .collect();
    assert_eq!(parser.parse("xy"), Ok(Success::new(expected, 2)));

    assert_eq!(
        parser.parse("xz"),
        Err(ParseError::SequenceStopped {
            position: 1,
            cause: Box::new(ParseError::TerminalUnmatched {
                position: 1,
                expected: "\"y\"".into(),
            }),
        })
    );
}

#[test]
fn test_uncaptured_children_are_dropped_from_object() {
    let g = GrammarBuilder::new();
    let seq = g.sequence([
        g.regex("[a-z]+").with_capture("name"),
        g.literal(":"),
        g.regex("[a-z]+").with_capture("ty"),
    ]);
    let parser = g.compile(&seq).unwrap();
    let value = parser.parse("x:number").unwrap().value;
    assert_eq!(value.get("name"), Some(&Value::from("x")));
    assert_eq!(value.get("ty"), Some(&Value::from("number")));
    assert_eq!(value.get(":"), None);
}

#[test]
fn test_sequence_reshape_applies_to_object() {
    let g = GrammarBuilder::new();
    let seq = g
        .sequence([
            g.regex("[a-z]+").with_capture("name"),
            g.literal(":"),
            g.regex("[a-z]+"),
        ])
        .map(|v| v.get("name").cloned().unwrap_or_default());
    let parser = g.compile(&seq).unwrap();
    assert_eq!(parser.parse("x:number").unwrap().value, Value::from("x"));
}

#[test]
fn test_choice_left_wins() {
    let g = GrammarBuilder::new();
    let choice = g.choice([
        g.literal("a").map(|_| Value::from("first")),
        g.literal("a").map(|_| Value::from("second")),
    ]);
    let parser = g.compile(&choice).unwrap();
    assert_eq!(
        parser.parse("a"),
        Ok(Success::new(Value::from("first"), 1))
    );
}

#[test]
fn test_choice_prefers_order_over_length() {
    let g = GrammarBuilder::new();
    let choice = g.choice([g.literal("a"), g.literal("ab")]);
    let parser = g.compile(&choice).unwrap();
    assert_eq!(parser.parse("ab").unwrap().consumed, 1);
}

#[test]
fn test_choice_exhausted_keeps_trial_order() {
    let g = GrammarBuilder::new();
    let choice = g.choice([g.literal("a"), g.literal("b"), g.regex("[0-9]")]);
    let parser = g.compile(&choice).unwrap();
    match parser.parse("z") {
        Err(ParseError::ChoiceExhausted {
            position,
            alternatives,
        }) => {
            assert_eq!(position, 0);
            let expected: Vec<String> = alternatives
                .iter()
                .map(|e| match e {
                    ParseError::TerminalUnmatched { expected, .. } => expected.clone(),
                    other => panic!("unexpected {:?}", other),
                })
                .collect();
            assert_eq!(expected, vec!["\"a\"", "\"b\"", "/[0-9]/"]);
        }
        other => panic!("expected ChoiceExhausted, got {:?}", other),
    }
}

#[test]
fn test_nullable_choice_is_empty_success() {
    let g = GrammarBuilder::new();
    let choice = g.choice([g.literal("a"), g.literal("b")]).nullable();
    let parser = g.compile(&choice).unwrap();
    assert_eq!(parser.parse("z"), Ok(Success::empty()));
}

#[test]
fn test_nullable_inside_sequence() {
    let g = GrammarBuilder::new();
    let seq = g.sequence([
        g.regex("[a-z]+").with_capture("name"),
        g.sequence([g.literal(":"), g.regex("[a-z]+")])
            .nullable()
            .with_capture("annotation"),
        g.literal(";"),
    ]);
    let parser = g.compile(&seq).unwrap();

    let plain = parser.parse("x;").unwrap();
    assert_eq!(plain.value.get("annotation"), Some(&Value::Null));
    assert_eq!(plain.consumed, 2);

    let typed = parser.parse("x:number;").unwrap();
    assert_eq!(
        typed.value.get("annotation"),
        Some(&Value::from(":number"))
    );
}

#[test]
fn test_repetition_totality() {
    let g = GrammarBuilder::new();
    let parser = g.compile(&g.repetition(g.literal("x"))).unwrap();
    assert_eq!(
        parser.parse("yyy"),
        Ok(Success::new(Value::List(vec![]), 0))
    );
    assert_eq!(parser.parse(""), Ok(Success::new(Value::List(vec![]), 0)));
}

#[test]
fn test_repetition_collects_reshaped_values() {
    let g = GrammarBuilder::new();
    let digit = g
        .regex("[0-9]")
        .map(|v| Value::Number(v.as_text().and_then(|s| s.parse().ok()).unwrap_or(0.0)));
    let parser = g.compile(&g.repetition(digit)).unwrap();
    assert_eq!(
        parser.parse("123x"),
        Ok(Success::new(
            Value::List(vec![
                Value::Number(1.0),
                Value::Number(2.0),
                Value::Number(3.0)
            ]),
            3
        ))
    );
}

#[test]
fn test_repetition_does_not_backtrack() {
    // the repetition eats every "a", leaving none for the trailing literal
    let g = GrammarBuilder::new();
    let seq = g.sequence([g.repetition(g.literal("a")), g.literal("a")]);
    let parser = g.compile(&seq).unwrap();
    assert!(matches!(
        parser.parse("aaa"),
        Err(ParseError::SequenceStopped { position: 3, .. })
    ));
}

#[test]
fn test_repetition_of_nullable_child_terminates() {
    let g = GrammarBuilder::new();
    let parser = g
        .compile(&g.repetition(g.literal("x").nullable()))
        .unwrap();
    assert_eq!(
        parser.parse("xxy"),
        Ok(Success::new(
            Value::List(vec![Value::from("x"), Value::from("x")]),
            2
        ))
    );
}

#[test]
fn test_match_all_on_non_sequence_root() {
    let g = GrammarBuilder::new();
    let parser = g.compile(&g.repetition(g.literal("a"))).unwrap();
    assert_eq!(
        parser.parse_with("aab", ParseOptions::default().with_match_all(true)),
        Err(ParseError::SequenceIncomplete { position: 2 })
    );
}

#[test]
fn test_consumed_never_exceeds_input() {
    let g = GrammarBuilder::new();
    let parser = g.compile(&g.regex("(?s).*")).unwrap();
    let input = "line one\nline two";
    assert_eq!(parser.parse(input).unwrap().consumed, input.len());
}

#[test]
fn test_unicode_input() {
    let g = GrammarBuilder::new();
    let seq = g.sequence([g.literal("é"), g.regex(r"\w+")]);
    let parser = g.compile(&seq).unwrap();
    let success = parser.parse("éàb!").unwrap();
    assert_eq!(success.value, Value::from("éàb"));
    assert_eq!(success.consumed, "éàb".len());
}
