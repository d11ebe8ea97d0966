use core_types::DiagnosticKind;
use transpiler::{TranspileConfig, Transpiler};

fn js(source: &str) -> String {
    let transpiler = Transpiler::new(&TranspileConfig::default()).unwrap();
    let output = transpiler.transform(source);
    assert!(!output.error, "unexpected failure: {:?}", output.diagnostic);
    output.code.unwrap()
}

#[test]
fn test_interface_is_erased() {
    assert_eq!(
        js("interface P { x: number }\nconst p: P = { x: 1 };\n"),
        "const p = { x: 1 };\n"
    );
}

#[test]
fn test_type_alias_and_type_imports_are_erased() {
    assert_eq!(
        js("import type { A } from './a';\ntype B = A | null;\nlet b: B;\n"),
        "let b;\n"
    );
}

#[test]
fn test_generic_interface_with_extends() {
    assert_eq!(
        js("export interface Box<T> extends Base { value: T; }\nlet n = 1;"),
        "let n = 1;\n"
    );
}

#[test]
fn test_function_signature_is_stripped() {
    assert_eq!(
        js("function add(a: number, b = 2): number {\n  return a + b;\n}"),
        "function add(a, b = 2) {\n  return a + b;\n}\n"
    );
}

#[test]
fn test_optional_and_rest_parameters() {
    assert_eq!(
        js("function f(x?: string, ...rest: number[]): void {}"),
        "function f(x, ...rest) {}\n"
    );
}

#[test]
fn test_generic_function() {
    assert_eq!(
        js("export function id<T>(value: T): T { return value; }"),
        "export function id(value) {\n  return value;\n}\n"
    );
}

#[test]
fn test_arrow_function_types_are_stripped() {
    assert_eq!(
        js("const double = (n: number): number => n * 2;"),
        "const double = (n) => n * 2;\n"
    );
}

#[test]
fn test_call_arguments_are_not_mistaken_for_arrows() {
    assert_eq!(js("log(a, b)"), "log(a, b);\n");
}

#[test]
fn test_if_else_blocks() {
    assert_eq!(
        js("if (x > 1) {\n  y = 2;\n} else {\n  y = 3;\n}"),
        "if (x > 1) {\n  y = 2;\n} else {\n  y = 3;\n}\n"
    );
}

#[test]
fn test_while_loop() {
    assert_eq!(
        js("while (i < 3) {\n  let step: number = i;\n}"),
        "while (i < 3) {\n  let step = i;\n}\n"
    );
}

#[test]
fn test_comments_are_kept() {
    assert_eq!(
        js("// hello\nlet a = 1; // trailing\n/* block */\n"),
        "// hello\nlet a = 1;\n// trailing\n/* block */\n"
    );
}

#[test]
fn test_nested_functions_are_indented() {
    assert_eq!(
        js("function outer() {\n  function inner(): void {\n    return;\n  }\n}"),
        "function outer() {\n  function inner() {\n    return;\n  }\n}\n"
    );
}

#[test]
fn test_export_const_with_annotation() {
    assert_eq!(
        js("export const names: Array<string> = [\"a\", \"b\"];"),
        "export const names = [\"a\", \"b\"];\n"
    );
}

#[test]
fn test_empty_source() {
    assert_eq!(js(""), "");
    assert_eq!(js("  \n\n"), "");
}

#[test]
fn test_unclosed_group_reports_deepest_failure() {
    let transpiler = Transpiler::new(&TranspileConfig::default()).unwrap();
    let output = transpiler.transform("let x = (1;");
    assert!(output.error);
    assert!(output.code.is_none());
    let diagnostic = output.diagnostic.unwrap();
    assert_eq!(diagnostic.kind, DiagnosticKind::Syntax);
    assert_eq!(diagnostic.message, "unexpected end of input");
    assert_eq!(diagnostic.position.unwrap().offset, 11);
    assert!(diagnostic.expected.contains(&"\")\"".to_string()));
}

#[test]
fn test_stray_brace_is_reported_at_its_position() {
    let transpiler = Transpiler::new(&TranspileConfig::default()).unwrap();
    let output = transpiler.transform("let a = 1;\n}\n");
    let diagnostic = output.diagnostic.unwrap();
    assert_eq!(diagnostic.message, "unexpected '}'");
    let position = diagnostic.position.unwrap();
    assert_eq!((position.line, position.column), (2, 1));
}

#[test]
fn test_memoization_does_not_change_output() {
    let source = "function f(a: number): number {\n  if (a) {\n    return a;\n  }\n  return 0;\n}\n";
    let with = Transpiler::new(&TranspileConfig::default()).unwrap();
    let without = Transpiler::new(&TranspileConfig::default().with_memoize(false)).unwrap();
    assert_eq!(with.transform(source), without.transform(source));
    assert_eq!(with.transform("let x = (1;"), without.transform("let x = (1;"));
}

#[test]
fn test_transform_is_deterministic() {
    let transpiler = Transpiler::new(&TranspileConfig::default()).unwrap();
    let source = "type T = string;\nconst t: T = 'x';";
    assert_eq!(transpiler.transform(source), transpiler.transform(source));
}

#[test]
fn test_operator_at_line_end_continues_expression() {
    assert_eq!(
        js("const total: number = a +\n  b;\n"),
        "const total = a +\n  b;\n"
    );
}

#[test]
fn test_member_access_on_next_line_continues_expression() {
    assert_eq!(
        js("const r = items\n  .map(f)\n  ?.filter(g);\n"),
        "const r = items\n  .map(f)\n  ?.filter(g);\n"
    );
}

#[test]
fn test_ternary_across_lines() {
    assert_eq!(
        js("result = cond\n  ? 1\n  : 2;\n"),
        "result = cond\n  ? 1\n  : 2;\n"
    );
}

#[test]
fn test_continuation_lines_are_indented_in_blocks() {
    assert_eq!(
        js("function f(a: number) {\n  return a &&\n    a > 1;\n}"),
        "function f(a) {\n  return a &&\n    a > 1;\n}\n"
    );
}

#[test]
fn test_newline_without_operator_ends_statement() {
    assert_eq!(js("a = 1\nb = 2\n"), "a = 1;\nb = 2;\n");
    assert_eq!(js("count++\nlet n: number = 1"), "count++;\nlet n = 1;\n");
}

#[test]
fn test_dangling_operator_is_an_error() {
    let transpiler = Transpiler::new(&TranspileConfig::default()).unwrap();
    for source in ["let a = 1 +;", "x = y ?\n", "total = a *"] {
        let output = transpiler.transform(source);
        assert!(output.error, "accepted {:?} as {:?}", source, output.code);
        assert!(output.code.is_none());
    }
}

#[test]
fn test_trailing_comment_without_semicolon_is_kept() {
    assert_eq!(js("let a = 1 // note\n"), "let a = 1;\n// note\n");
    assert_eq!(js("let a = 1; // note\n"), "let a = 1;\n// note\n");
    assert_eq!(js("call(x) // done"), "call(x);\n// done\n");
}

#[test]
fn test_operator_line_may_end_in_comment() {
    assert_eq!(
        js("const sum = a + // first\n  b;"),
        "const sum = a + // first\n  b;\n"
    );
}

#[test]
fn test_regex_and_division() {
    assert_eq!(js("const re = /ab+c/g;"), "const re = /ab+c/g;\n");
    assert_eq!(js("half = total / 2;"), "half = total / 2;\n");
}

#[test]
fn test_deep_nesting_is_reported_not_fatal() {
    let transpiler = Transpiler::new(&TranspileConfig::default()).unwrap();
    let source = format!("let x = {}1{};", "(".repeat(1000), ")".repeat(1000));
    let output = transpiler.transform(&source);
    assert!(output.error);
    let diagnostic = output.diagnostic.unwrap();
    assert_eq!(diagnostic.kind, DiagnosticKind::Syntax);
    assert!(diagnostic.message.starts_with("nesting too deep"));

    let shallow = format!("let x = {}1{};", "(".repeat(20), ")".repeat(20));
    assert!(!transpiler.transform(&shallow).error);
}
