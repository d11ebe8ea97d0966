//! Isolated execution contexts.
//!
//! An execution context is a named OS thread that owns the far end of a
//! [`Port`]. Whatever it shares with the caller travels through that port.

use crate::error::DispatchResult;
use crate::port::{port_pair, Port};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Stack size of a context thread unless one is given.
pub const DEFAULT_STACK_SIZE: usize = 8 * 1024 * 1024;

/// A running execution context and the caller's end of its port.
#[derive(Debug)]
pub struct ExecutionContext {
    id: u64,
    name: String,
    port: Option<Port>,
    thread: Option<JoinHandle<()>>,
}

impl ExecutionContext {
    /// Starts a context thread running `init` with the far end of a new port.
    ///
    /// `init` usually calls [`expose`](crate::expose) and returns when the
    /// caller side closes. The thread gets [`DEFAULT_STACK_SIZE`] bytes of stack.
    pub fn spawn<F>(name: impl Into<String>, init: F) -> DispatchResult<Self>
    where
        F: FnOnce(Port) + Send + 'static,
    {
        Self::spawn_with_stack_size(name, DEFAULT_STACK_SIZE, init)
    }

    /// Like [`spawn`](Self::spawn) with an explicit thread stack size in bytes.
    ///
    /// A stack overflow aborts the process rather than unwinding, so handlers
    /// that recurse over their input need a stack sized for it.
    pub fn spawn_with_stack_size<F>(
        name: impl Into<String>,
        stack_size: usize,
        init: F,
    ) -> DispatchResult<Self>
    where
        F: FnOnce(Port) + Send + 'static,
    {
        let name = name.into();
        let (caller, far) = port_pair();
        let thread = thread::Builder::new()
            .name(name.clone())
            .stack_size(stack_size)
            .spawn(move || init(far))?;
        let id = NEXT_CONTEXT_ID.fetch_add(1, Ordering::SeqCst);
        debug!(context = id, name = %name, stack_size, "spawned execution context");

        Ok(Self {
            id,
            name,
            port: Some(caller),
            thread: Some(thread),
        })
    }

    /// Process-unique id of this context.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Thread name given at spawn time.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Takes the caller's end of the port. Returns `None` after the first call.
    pub fn take_port(&mut self) -> Option<Port> {
        self.port.take()
    }

    /// Whether the context thread is still joinable.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Closes the caller's end of the port and waits for the thread to exit.
    ///
    /// If the port was taken, whoever holds it must drop it first or this blocks.
    pub fn terminate(&mut self) {
        self.port.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!(context = self.id, name = %self.name, "execution context panicked");
            } else {
                debug!(context = self.id, "execution context terminated");
            }
        }
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        self.terminate();
    }
}
