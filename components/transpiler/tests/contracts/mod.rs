//! Contract tests for the transpiler public API

use transpiler::{
    compile_batch, transform, CompileUnit, TransformOutput, TranspileConfig, TranspileResult,
    Transpiler, TRANSFORM_COMMAND,
};

#[test]
fn contract_transform_signature() {
    let _: fn(&str) -> TranspileResult<TransformOutput> = transform;
    let _: fn(&Transpiler, &str) -> TransformOutput = Transpiler::transform;
}

#[test]
fn contract_batch_signature() {
    let _: fn(&[CompileUnit], usize) -> TranspileResult<Vec<TransformOutput>> = compile_batch;
}

#[test]
fn contract_output_shape() {
    let output = transform("let a: number = 1;").unwrap();
    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["error"], false);
    assert_eq!(json["code"], "let a = 1;\n");
}

#[test]
fn contract_config_defaults() {
    let config = TranspileConfig::default();
    assert!(config.memoize);
    assert!(config.pool_size >= 1);
}

#[test]
fn contract_command_name() {
    assert_eq!(TRANSFORM_COMMAND, "transform");
}
