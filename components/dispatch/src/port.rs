//! Bidirectional message ports.
//!
//! A port is one end of a pair of unbounded channels. Whatever one end posts,
//! the other end receives, in order.

use crate::message::Envelope;
use crossbeam::channel::{self, Receiver, Sender};

/// One end of a message channel.
#[derive(Debug)]
pub struct Port {
    sender: Sender<Envelope>,
    receiver: Receiver<Envelope>,
}

/// Creates two connected ports.
pub fn port_pair() -> (Port, Port) {
    let (left_tx, right_rx) = channel::unbounded();
    let (right_tx, left_rx) = channel::unbounded();
    (
        Port {
            sender: left_tx,
            receiver: left_rx,
        },
        Port {
            sender: right_tx,
            receiver: right_rx,
        },
    )
}

impl Port {
    /// Posts an envelope to the other end.
    ///
    /// Returns `false` when the other end has been dropped.
    pub fn post(&self, envelope: Envelope) -> bool {
        self.sender.send(envelope).is_ok()
    }

    /// Blocks until the other end posts, or returns `None` once it is gone.
    pub fn recv(&self) -> Option<Envelope> {
        self.receiver.recv().ok()
    }

    /// Splits the port into its sending and receiving halves.
    pub fn into_parts(self) -> (Sender<Envelope>, Receiver<Envelope>) {
        (self.sender, self.receiver)
    }
}
