//! Background tasks that pump the WebSocket connection.

pub(crate) mod ping;
pub(crate) mod read;
pub(crate) mod write;
