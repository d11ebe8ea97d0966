//! Fixed-size pool of execution contexts with round-robin dispatch.

use crate::context::{ExecutionContext, DEFAULT_STACK_SIZE};
use crate::error::{DispatchError, DispatchResult};
use crate::expose::{expose, Implementation};
use crate::remote::{PendingCall, RemoteHandle};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// A fixed set of pre-initialized contexts, each serving its own implementation.
///
/// Work is assigned to slot `counter % size` with a strictly increasing
/// counter. The pool gets no feedback about how busy a context is.
pub struct WorkerPool {
    handles: Vec<RemoteHandle>,
    counter: AtomicUsize,
}

impl WorkerPool {
    /// Spawns `size` contexts. `factory(slot)` builds the implementation each one serves.
    pub fn new<F>(size: usize, factory: F) -> DispatchResult<Self>
    where
        F: Fn(usize) -> Implementation,
    {
        Self::with_stack_size(size, DEFAULT_STACK_SIZE, factory)
    }

    /// Like [`new`](Self::new), giving every context thread `stack_size` bytes of stack.
    pub fn with_stack_size<F>(size: usize, stack_size: usize, factory: F) -> DispatchResult<Self>
    where
        F: Fn(usize) -> Implementation,
    {
        if size == 0 {
            return Err(DispatchError::EmptyPool);
        }
        let mut handles = Vec::with_capacity(size);
        for slot in 0..size {
            let implementation = factory(slot);
            let context = ExecutionContext::spawn_with_stack_size(
                format!("dispatch-worker-{}", slot),
                stack_size,
                move |port| expose(port, implementation),
            )?;
            handles.push(RemoteHandle::wrap(context)?);
        }
        debug!(size, stack_size, "worker pool ready");

        Ok(Self {
            handles,
            counter: AtomicUsize::new(0),
        })
    }

    /// Number of contexts in the pool.
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Slot that the `counter`-th dispatch goes to.
    pub fn slot_for(&self, counter: usize) -> usize {
        counter % self.handles.len()
    }

    /// Number of requests dispatched so far.
    pub fn dispatched(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }

    /// Sends `command` to the next slot in round-robin order.
    pub fn dispatch(&self, command: &str, args: Vec<Value>) -> PendingCall {
        self.dispatch_with_transfer(command, args, Vec::new())
    }

    /// Like [`dispatch`](Self::dispatch), moving `transfer` buffers with the request.
    pub fn dispatch_with_transfer(
        &self,
        command: &str,
        args: Vec<Value>,
        transfer: Vec<Vec<u8>>,
    ) -> PendingCall {
        let counter = self.counter.fetch_add(1, Ordering::SeqCst);
        let slot = self.slot_for(counter);
        debug!(counter, slot, command, "dispatching");
        self.handles[slot].exec_with_transfer(command, args, transfer)
    }

    /// Handle of one slot.
    pub fn handle(&self, slot: usize) -> Option<&RemoteHandle> {
        self.handles.get(slot)
    }

    /// Releases every context. Later dispatches complete with `Disconnected`.
    pub fn terminate(&mut self) {
        for handle in &mut self.handles {
            handle.terminate();
        }
    }
}
