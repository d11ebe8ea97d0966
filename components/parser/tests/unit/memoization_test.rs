//! Memoization transparency and cache lifetime

use parser::{GrammarBuilder, Node, ParseOptions, Parser};

fn shared_prefix_grammar() -> (GrammarBuilder, Node) {
    let g = GrammarBuilder::new();
    let x = g.regex("[a-z]+").with_capture("x");
    let y = g.literal(":").with_capture("y");
    let z = g.literal("z").with_capture("z");
    let w = g.literal("w").with_capture("w");
    let root = g.choice([
        g.sequence([x.clone(), y.clone(), z]),
        g.sequence([x, y, w]),
    ]);
    (g, root)
}

fn compile(g: &GrammarBuilder, root: &Node) -> Parser {
    g.compile(root).unwrap()
}

#[test]
fn test_results_identical_with_and_without_cache() {
    let (g, root) = shared_prefix_grammar();
    let parser = compile(&g, &root);
    for input in ["abc:z", "abc:w", "abc:q", "abc", ":w", ""] {
        let cached = parser.parse_with(input, ParseOptions::default());
        let uncached = parser.parse_with(input, ParseOptions::default().with_memoize(false));
        assert_eq!(cached, uncached, "input {:?}", input);
    }
}

#[test]
fn test_second_alternative_reuses_shared_prefix() {
    let (g, root) = shared_prefix_grammar();
    let parser = compile(&g, &root);
    let report = parser.parse_detailed("abc:w", ParseOptions::default());
    assert!(report.result.is_ok());
    // x and y are answered from the cache while trying the second sequence
    assert!(report.stats.hits >= 2, "stats: {:?}", report.stats);

    let uncached = parser.parse_detailed("abc:w", ParseOptions::default().with_memoize(false));
    assert_eq!(uncached.stats.hits, 0);
    assert_eq!(uncached.stats.entries, 0);
    assert_eq!(uncached.result, report.result);
}

#[test]
fn test_repeated_invocations_are_deterministic() {
    let (g, root) = shared_prefix_grammar();
    let parser = compile(&g, &root);
    let first = parser.parse_detailed("abc:w", ParseOptions::default());
    let second = parser.parse_detailed("abc:w", ParseOptions::default());
    assert_eq!(first, second);
}

#[test]
fn test_cache_does_not_leak_between_inputs() {
    let (g, root) = shared_prefix_grammar();
    let parser = compile(&g, &root);
    assert!(parser.parse("abc:z").is_ok());
    // same positions, different text: a leaked entry would answer "ok"
    assert!(parser.parse("abc:q").is_err());
    assert!(parser.parse("abc:z").is_ok());
}

#[test]
fn test_parsers_are_shareable_across_threads() {
    let (g, root) = shared_prefix_grammar();
    let parser = compile(&g, &root);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let parser = parser.clone();
            std::thread::spawn(move || {
                let input = if i % 2 == 0 { "abc:z" } else { "abc:w" };
                parser.parse(input).is_ok()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
