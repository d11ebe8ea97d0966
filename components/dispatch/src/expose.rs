//! Context-side listener.
//!
//! [`expose`] serves an [`Implementation`] over a port: it decodes requests,
//! invokes the named handler, and answers with a response carrying the same
//! id. Handler errors and panics become error responses; the listener itself
//! never unwinds.

use crate::error::Failure;
use crate::message::{Envelope, Message, Request, Response};
use crate::port::Port;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Arguments and transferred buffers of one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Call {
    /// Positional arguments
    pub args: Vec<Value>,
    /// Buffers moved with the request
    pub transfer: Vec<Vec<u8>>,
}

impl Call {
    /// Positional argument `index`, if present.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// Positional argument `index` as a string.
    pub fn str_arg(&self, index: usize) -> Result<&str, Failure> {
        self.arg(index).and_then(Value::as_str).ok_or_else(|| {
            Failure::new("TypeError", format!("argument {} must be a string", index))
        })
    }
}

/// A named command handler.
pub type Handler = Box<dyn FnMut(Call) -> Result<Value, Failure> + Send>;

/// Table of command handlers served by one execution context.
#[derive(Default)]
pub struct Implementation {
    handlers: HashMap<String, Handler>,
}

impl Implementation {
    /// Creates an empty implementation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler for `command`, replacing any previous one.
    pub fn register<F>(mut self, command: impl Into<String>, handler: F) -> Self
    where
        F: FnMut(Call) -> Result<Value, Failure> + Send + 'static,
    {
        self.handlers.insert(command.into(), Box::new(handler));
        self
    }

    /// Whether a handler exists for `command`.
    pub fn handles(&self, command: &str) -> bool {
        self.handlers.contains_key(command)
    }

    /// Invokes `command`, turning unknown commands and panics into failures.
    pub fn invoke(&mut self, command: &str, call: Call) -> Result<Value, Failure> {
        let Some(handler) = self.handlers.get_mut(command) else {
            return Err(Failure::new(
                "UnknownCommand",
                format!("no handler for command '{}'", command),
            ));
        };
        match panic::catch_unwind(AssertUnwindSafe(|| handler(call))) {
            Ok(outcome) => outcome,
            Err(payload) => Err(Failure::new("Panic", panic_message(payload.as_ref()))),
        }
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut commands: Vec<&String> = self.handlers.keys().collect();
        commands.sort();
        f.debug_struct("Implementation")
            .field("commands", &commands)
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}

/// Serves `implementation` on `port` until the caller side closes.
pub fn expose(port: Port, mut implementation: Implementation) {
    debug!(?implementation, "listening");
    while let Some(envelope) = port.recv() {
        let request = match Message::decode(envelope) {
            Ok(Message::Request(request)) => request,
            Ok(Message::Response(response)) => {
                debug!(id = response.id, "ignoring response on a listening port");
                continue;
            }
            Err(error) => {
                warn!(%error, "skipping malformed message");
                continue;
            }
        };
        let Some(reply) = answer(&mut implementation, request) else {
            continue;
        };
        if !port.post(reply) {
            break;
        }
    }
    debug!("caller closed, listener exiting");
}

fn answer(implementation: &mut Implementation, request: Request) -> Option<Envelope> {
    let Request {
        id,
        command,
        args,
        transfer,
    } = request;
    let outcome = implementation.invoke(&command, Call { args, transfer });
    if let Err(failure) = &outcome {
        debug!(id, command = %command, %failure, "call failed");
    }
    match (Response { id, outcome }).encode() {
        Ok(envelope) => Some(envelope),
        Err(error) => {
            warn!(id, %error, "could not encode response");
            let fallback = Response {
                id,
                outcome: Err(Failure::new("EncodeError", error.to_string())),
            };
            fallback.encode().ok()
        }
    }
}
