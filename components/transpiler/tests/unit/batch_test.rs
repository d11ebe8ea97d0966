use core_types::DiagnosticKind;
use dispatch::DispatchError;
use transpiler::{compile_batch, BatchCompiler, CompileUnit, TranspileConfig, TranspileError};

fn units() -> Vec<CompileUnit> {
    (0..8)
        .map(|n| CompileUnit::new(format!("unit{}.ts", n), format!("let v{}: number = {};", n, n)))
        .collect()
}

#[test]
fn test_outputs_follow_submission_order() {
    let outputs = compile_batch(&units(), 3).unwrap();
    assert_eq!(outputs.len(), 8);
    for (n, output) in outputs.iter().enumerate() {
        assert!(!output.error);
        assert_eq!(output.code.as_deref(), Some(format!("let v{} = {};\n", n, n).as_str()));
    }
}

#[test]
fn test_failing_unit_does_not_affect_others() {
    let batch = vec![
        CompileUnit::new("ok.ts", "const a: string = 'a';"),
        CompileUnit::new("bad.ts", "let x = (1;"),
        CompileUnit::new("ok2.ts", "interface I {}"),
    ];
    let outputs = compile_batch(&batch, 2).unwrap();
    assert_eq!(outputs[0].code.as_deref(), Some("const a = 'a';\n"));
    assert!(outputs[1].error);
    assert_eq!(
        outputs[1].diagnostic.as_ref().unwrap().kind,
        DiagnosticKind::Syntax
    );
    assert_eq!(outputs[2].code.as_deref(), Some(""));
}

#[test]
fn test_zero_pool_size_is_rejected() {
    assert!(matches!(
        compile_batch(&units(), 0),
        Err(TranspileError::Dispatch(DispatchError::EmptyPool))
    ));
}

#[test]
fn test_compiler_is_reusable() {
    let config = TranspileConfig::default().with_pool_size(2);
    let compiler = BatchCompiler::new(&config).unwrap();
    assert_eq!(compiler.size(), 2);
    let first = compiler.compile(&units());
    let second = compiler.compile(&units());
    assert_eq!(first, second);
}

#[test]
fn test_terminated_compiler_reports_dispatch_failures() {
    let config = TranspileConfig::default().with_pool_size(1);
    let mut compiler = BatchCompiler::new(&config).unwrap();
    compiler.terminate();
    let outputs = compiler.compile(&[CompileUnit::new("late.ts", "let a = 1;")]);
    let diagnostic = outputs[0].diagnostic.as_ref().unwrap();
    assert_eq!(diagnostic.kind, DiagnosticKind::Dispatch);
    assert!(diagnostic.message.starts_with("late.ts:"));
}

#[test]
fn test_empty_batch() {
    assert!(compile_batch(&[], 2).unwrap().is_empty());
}

#[test]
fn test_deeply_nested_unit_fails_alone() {
    let deep = format!("let x = {}1{};", "(".repeat(1000), ")".repeat(1000));
    let batch = vec![
        CompileUnit::new("deep.ts", deep),
        CompileUnit::new("ok.ts", "let y: number = 1;"),
    ];
    let outputs = compile_batch(&batch, 2).unwrap();
    assert!(outputs[0].error);
    let diagnostic = outputs[0].diagnostic.as_ref().unwrap();
    assert_eq!(diagnostic.kind, DiagnosticKind::Syntax);
    assert!(diagnostic.message.starts_with("nesting too deep"));
    assert_eq!(outputs[1].code.as_deref(), Some("let y = 1;\n"));
}

#[test]
fn test_worker_stack_size_is_configurable() {
    let config = TranspileConfig::default()
        .with_pool_size(1)
        .with_stack_size(32 * 1024 * 1024)
        .with_max_depth(4096);
    let mut compiler = BatchCompiler::new(&config).unwrap();
    let nested = format!("let x = {}1{};", "(".repeat(1000), ")".repeat(1000));
    let outputs = compiler.compile(&[CompileUnit::new("nested.ts", nested.clone())]);
    compiler.terminate();
    assert_eq!(outputs[0].code.as_deref(), Some(format!("{}\n", nested).as_str()));
}
