//! Wire protocol for the filebay remote file service.
//!
//! Every call between client and server is a JSON [`envelope::Message`]
//! carried as one WebSocket text frame. Replies reuse the request id, so
//! a chunked transfer is just a sequence of independent request/response
//! pairs; there is no streaming primitive on the wire.

pub mod constants;
pub mod envelope;
pub mod messages;

pub use constants::MessageType;
