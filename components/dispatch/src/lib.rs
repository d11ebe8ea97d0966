//! Worker dispatch protocol
//!
//! Request/response messaging between a caller and isolated execution
//! contexts, correlated by id.
//!
//! # Overview
//!
//! - [`ExecutionContext`] - A named thread owning the far end of a [`Port`]
//! - [`expose`] - Serves an [`Implementation`] on a port
//! - [`wrap`] / [`RemoteHandle`] - Caller side: `exec` returns a [`PendingCall`]
//! - [`WorkerPool`] - Fixed set of contexts with round-robin assignment
//!
//! # Example
//!
//! ```
//! use dispatch::{expose, wrap, Call, ExecutionContext, Implementation};
//! use serde_json::json;
//!
//! let context = ExecutionContext::spawn("upper", |port| {
//!     let implementation = Implementation::new().register("upper", |call: Call| {
//!         Ok(json!(call.str_arg(0)?.to_uppercase()))
//!     });
//!     expose(port, implementation)
//! })
//! .unwrap();
//!
//! let mut handle = wrap(context).unwrap();
//! let result = handle.exec("upper", vec![json!("abc")]).wait().unwrap();
//! assert_eq!(result, json!("ABC"));
//! handle.terminate();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod error;
pub mod expose;
pub mod message;
pub mod pool;
pub mod port;
pub mod remote;

pub use context::{ExecutionContext, DEFAULT_STACK_SIZE};
pub use error::{DispatchError, DispatchResult, Failure};
pub use expose::{expose, Call, Handler, Implementation};
pub use message::{Envelope, Message, Request, Response, REQUEST_MARKER, RESPONSE_MARKER};
pub use pool::WorkerPool;
pub use port::{port_pair, Port};
pub use remote::{wrap, PendingCall, RemoteHandle};
