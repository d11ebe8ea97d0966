//! Wire format for requests and responses.
//!
//! Messages are order-significant JSON arrays:
//!
//! - Request: `["rpc:request", id, command, ...args]`, where `command` is a
//!   string, or `[command, transferCount]` when buffers are transferred
//! - Response: `["rpc:response", id, isError, payload]`
//!
//! The JSON text travels inside an [`Envelope`] together with any transferred
//! byte buffers. Buffers move with the envelope and are never serialized.

use crate::error::{DispatchError, DispatchResult, Failure};
use serde_json::Value;

/// Discriminator of request messages.
pub const REQUEST_MARKER: &str = "rpc:request";

/// Discriminator of response messages.
pub const RESPONSE_MARKER: &str = "rpc:response";

/// A unit of transport between two ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// JSON-encoded message array
    pub body: String,
    /// Buffers moved alongside the message
    pub transfer: Vec<Vec<u8>>,
}

impl Envelope {
    /// Creates an envelope without transferred buffers.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            transfer: Vec::new(),
        }
    }
}

/// A call to a named command.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Correlation id, unique per caller handle
    pub id: u64,
    /// Command name
    pub command: String,
    /// Positional arguments
    pub args: Vec<Value>,
    /// Buffers transferred with the call
    pub transfer: Vec<Vec<u8>>,
}

/// The answer to a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Id of the request being answered
    pub id: u64,
    /// Result payload or failure description
    pub outcome: Result<Value, Failure>,
}

/// Either kind of message sharing a channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Caller to context
    Request(Request),
    /// Context to caller
    Response(Response),
}

impl Request {
    /// Encodes the request into an envelope, moving its buffers.
    pub fn encode(self) -> DispatchResult<Envelope> {
        let command = if self.transfer.is_empty() {
            Value::String(self.command)
        } else {
            Value::Array(vec![
                Value::String(self.command),
                Value::from(self.transfer.len()),
            ])
        };
        let mut items = Vec::with_capacity(3 + self.args.len());
        items.push(Value::String(REQUEST_MARKER.to_string()));
        items.push(Value::from(self.id));
        items.push(command);
        items.extend(self.args);
        Ok(Envelope {
            body: to_json(&Value::Array(items))?,
            transfer: self.transfer,
        })
    }
}

impl Response {
    /// Encodes the response into an envelope.
    pub fn encode(self) -> DispatchResult<Envelope> {
        let (is_error, payload) = match self.outcome {
            Ok(payload) => (false, payload),
            Err(failure) => (
                true,
                serde_json::to_value(&failure).map_err(|e| DispatchError::Encode(e.to_string()))?,
            ),
        };
        let items = vec![
            Value::String(RESPONSE_MARKER.to_string()),
            Value::from(self.id),
            Value::Bool(is_error),
            payload,
        ];
        Ok(Envelope::text(to_json(&Value::Array(items))?))
    }
}

impl Message {
    /// Decodes an envelope into a request or response.
    pub fn decode(envelope: Envelope) -> DispatchResult<Message> {
        let parsed: Value = serde_json::from_str(&envelope.body)
            .map_err(|e| DispatchError::Decode(e.to_string()))?;
        let Value::Array(items) = parsed else {
            return Err(malformed("message is not an array"));
        };
        let mut items = items.into_iter();

        let marker = items.next();
        let id = items
            .next()
            .as_ref()
            .and_then(Value::as_u64)
            .ok_or_else(|| malformed("missing numeric id"))?;

        match marker.as_ref().and_then(Value::as_str) {
            Some(REQUEST_MARKER) => {
                let (command, transfer_count) = match items.next() {
                    Some(Value::String(command)) => (command, 0),
                    Some(Value::Array(pair)) => decode_command_pair(pair)?,
                    _ => return Err(malformed("missing command")),
                };
                if transfer_count != envelope.transfer.len() {
                    return Err(malformed(&format!(
                        "expected {} transferred buffers, got {}",
                        transfer_count,
                        envelope.transfer.len()
                    )));
                }
                Ok(Message::Request(Request {
                    id,
                    command,
                    args: items.collect(),
                    transfer: envelope.transfer,
                }))
            }
            Some(RESPONSE_MARKER) => {
                let is_error = items
                    .next()
                    .as_ref()
                    .and_then(Value::as_bool)
                    .ok_or_else(|| malformed("missing error flag"))?;
                let payload = items.next().unwrap_or(Value::Null);
                let outcome = if is_error {
                    Err(serde_json::from_value::<Failure>(payload.clone())
                        .unwrap_or_else(|_| Failure::new("Error", payload.to_string())))
                } else {
                    Ok(payload)
                };
                Ok(Message::Response(Response { id, outcome }))
            }
            _ => Err(malformed("unknown marker")),
        }
    }
}

fn decode_command_pair(pair: Vec<Value>) -> DispatchResult<(String, usize)> {
    match pair.as_slice() {
        [Value::String(command), count] => {
            let count = count
                .as_u64()
                .ok_or_else(|| malformed("transfer count is not a number"))?;
            Ok((command.clone(), count as usize))
        }
        _ => Err(malformed("command pair must be [command, transferCount]")),
    }
}

fn malformed(reason: &str) -> DispatchError {
    DispatchError::Decode(reason.to_string())
}

fn to_json(value: &Value) -> DispatchResult<String> {
    serde_json::to_string(value).map_err(|e| DispatchError::Encode(e.to_string()))
}
