//! Caller-side handles.
//!
//! A [`RemoteHandle`] sends requests over a port and correlates responses by
//! id. Each handle owns a pending table mapping outstanding ids to one-shot
//! completions, and a reader thread that resolves them as responses arrive,
//! in whatever order the far side answers.

use crate::context::ExecutionContext;
use crate::error::{DispatchError, DispatchResult};
use crate::message::{Envelope, Message, Request, Response};
use crate::port::Port;
use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

type Completion = Sender<DispatchResult<Value>>;

#[derive(Default)]
struct PendingState {
    entries: HashMap<u64, Completion>,
    closed: bool,
}

/// Outstanding request ids and their completions.
#[derive(Default)]
pub(crate) struct PendingTable {
    state: Mutex<PendingState>,
}

impl PendingTable {
    /// Records a completion. Fails once the table has been closed.
    fn insert(&self, id: u64, completion: Completion) -> Result<(), Completion> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(completion);
        }
        state.entries.insert(id, completion);
        Ok(())
    }

    /// Removes the entry for `id` and completes it. Returns `false` if no
    /// entry was outstanding.
    fn resolve(&self, id: u64, result: DispatchResult<Value>) -> bool {
        let completion = self.state.lock().entries.remove(&id);
        match completion {
            Some(completion) => {
                // The caller may have dropped its PendingCall.
                let _ = completion.send(result);
                true
            }
            None => false,
        }
    }

    /// Closes the table and fails every outstanding entry with `Disconnected`.
    fn close(&self) -> usize {
        let drained: Vec<Completion> = {
            let mut state = self.state.lock();
            state.closed = true;
            state.entries.drain().map(|(_, completion)| completion).collect()
        };
        let count = drained.len();
        for completion in drained {
            let _ = completion.send(Err(DispatchError::Disconnected));
        }
        count
    }

    fn len(&self) -> usize {
        self.state.lock().entries.len()
    }
}

/// The eventual result of one `exec`.
#[derive(Debug)]
pub struct PendingCall {
    id: u64,
    receiver: Receiver<DispatchResult<Value>>,
}

impl PendingCall {
    fn settled(id: u64, result: DispatchResult<Value>) -> Self {
        let (sender, receiver) = channel::bounded(1);
        let _ = sender.send(result);
        Self { id, receiver }
    }

    /// Request id this call is correlated by.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Blocks until the matching response arrives.
    pub fn wait(self) -> DispatchResult<Value> {
        self.receiver
            .recv()
            .unwrap_or(Err(DispatchError::Disconnected))
    }

    /// Returns the result if it has already arrived.
    pub fn try_result(&self) -> Option<DispatchResult<Value>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(DispatchError::Disconnected)),
        }
    }
}

/// Caller-side proxy for an exposed implementation.
pub struct RemoteHandle {
    next_id: AtomicU64,
    sender: Option<Sender<Envelope>>,
    pending: Arc<PendingTable>,
    reader: Option<JoinHandle<()>>,
    context: Option<ExecutionContext>,
}

/// Wraps an execution context into a caller-side handle.
pub fn wrap(context: ExecutionContext) -> DispatchResult<RemoteHandle> {
    RemoteHandle::wrap(context)
}

impl RemoteHandle {
    /// Takes the context's port and owns the context from now on.
    pub fn wrap(mut context: ExecutionContext) -> DispatchResult<Self> {
        let port = context.take_port().ok_or(DispatchError::Disconnected)?;
        let mut handle = Self::from_port(port)?;
        handle.context = Some(context);
        Ok(handle)
    }

    /// Builds a handle over a bare port whose far end runs [`expose`](crate::expose).
    pub fn from_port(port: Port) -> DispatchResult<Self> {
        let (sender, receiver) = port.into_parts();
        let pending = Arc::new(PendingTable::default());
        let table = Arc::clone(&pending);
        let reader = thread::Builder::new()
            .name("dispatch-reader".to_string())
            .spawn(move || read_responses(receiver, table))?;

        Ok(Self {
            next_id: AtomicU64::new(1),
            sender: Some(sender),
            pending,
            reader: Some(reader),
            context: None,
        })
    }

    /// Sends `command` with `args` and returns the pending result.
    pub fn exec(&self, command: &str, args: Vec<Value>) -> PendingCall {
        self.exec_with_transfer(command, args, Vec::new())
    }

    /// Like [`exec`](Self::exec), moving `transfer` buffers along with the request.
    pub fn exec_with_transfer(
        &self,
        command: &str,
        args: Vec<Value>,
        transfer: Vec<Vec<u8>>,
    ) -> PendingCall {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let Some(sender) = &self.sender else {
            return PendingCall::settled(id, Err(DispatchError::Disconnected));
        };

        let envelope = match (Request {
            id,
            command: command.to_string(),
            args,
            transfer,
        })
        .encode()
        {
            Ok(envelope) => envelope,
            Err(error) => return PendingCall::settled(id, Err(error)),
        };

        let (completion, receiver) = channel::bounded(1);
        if self.pending.insert(id, completion).is_err() {
            return PendingCall::settled(id, Err(DispatchError::Disconnected));
        }
        trace!(id, command, "sending request");
        if sender.send(envelope).is_err() {
            self.pending.resolve(id, Err(DispatchError::Disconnected));
        }
        PendingCall { id, receiver }
    }

    /// Number of requests still waiting for a response.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Closes the channel and releases the execution context, if this handle owns one.
    ///
    /// Calls still pending afterwards complete with [`DispatchError::Disconnected`].
    pub fn terminate(&mut self) {
        self.sender.take();
        if let Some(mut context) = self.context.take() {
            context.terminate();
            if let Some(reader) = self.reader.take() {
                let _ = reader.join();
            }
        }
    }
}

impl Drop for RemoteHandle {
    fn drop(&mut self) {
        self.terminate();
    }
}

fn read_responses(receiver: Receiver<Envelope>, pending: Arc<PendingTable>) {
    for envelope in receiver.iter() {
        match Message::decode(envelope) {
            Ok(Message::Response(Response { id, outcome })) => {
                let result = outcome.map_err(DispatchError::Remote);
                if !pending.resolve(id, result) {
                    warn!(id, "response for unknown request id");
                }
            }
            Ok(Message::Request(request)) => {
                debug!(id = request.id, "ignoring request on a caller port");
            }
            Err(error) => warn!(%error, "skipping malformed response"),
        }
    }
    let orphaned = pending.close();
    debug!(orphaned, "far side closed, reader exiting");
}
