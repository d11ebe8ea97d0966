//! Contract tests for the dispatch public API

use dispatch::{
    expose, port_pair, wrap, Call, DispatchError, DispatchResult, Envelope, ExecutionContext,
    Failure, Implementation, PendingCall, Port, RemoteHandle, WorkerPool, REQUEST_MARKER,
    RESPONSE_MARKER,
};
use serde_json::Value;

#[test]
fn contract_markers_are_distinct() {
    assert_eq!(REQUEST_MARKER, "rpc:request");
    assert_eq!(RESPONSE_MARKER, "rpc:response");
}

#[test]
fn contract_spawn_returns_context() {
    let context: DispatchResult<ExecutionContext> = ExecutionContext::spawn("noop", |_port: Port| {});
    assert!(context.is_ok());
}

#[test]
fn contract_expose_signature() {
    let _: fn(Port, Implementation) = expose;
}

#[test]
fn contract_wrap_signature() {
    let _: fn(ExecutionContext) -> DispatchResult<RemoteHandle> = wrap;
    let _: fn(Port) -> DispatchResult<RemoteHandle> = RemoteHandle::from_port;
}

#[test]
fn contract_exec_signature() {
    let _: fn(&RemoteHandle, &str, Vec<Value>) -> PendingCall = RemoteHandle::exec;
    let _: fn(PendingCall) -> DispatchResult<Value> = PendingCall::wait;
}

#[test]
fn contract_pool_rejects_zero() {
    let result = WorkerPool::new(0, |_| Implementation::new());
    assert!(matches!(result, Err(DispatchError::EmptyPool)));
}

#[test]
fn contract_port_pair_connects() {
    let (a, b): (Port, Port) = port_pair();
    assert!(a.post(Envelope::text("[]")));
    assert!(b.recv().is_some());
}

#[test]
fn contract_failure_is_serializable() {
    let failure = Failure::new("Panic", "boom");
    let json = serde_json::to_value(&failure).unwrap();
    assert_eq!(json["name"], "Panic");
    let _ = Call::default();
}
