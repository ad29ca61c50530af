//! Handler trait for processing client messages.
//!
//! Implementors provide the filesystem logic while the server framework
//! handles connection management and routing.

use std::future::Future;
use std::pin::Pin;

use filebay_protocol::MessageType;
use filebay_protocol::constants::RPC_ERR_CODE_NOT_IMPLEMENTED;
use filebay_protocol::envelope::Message;

use crate::connection::Sender;

/// A boxed future returned by handler methods.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Trait for handling messages from a connected client.
///
/// The server dispatches parsed envelopes to the method matching their
/// type. Default implementations reply with "not implemented" so a
/// handler only overrides the operations it serves.
pub trait Handler: Send + Sync + 'static {
    /// Called for `ping` messages.
    fn on_ping(&self, sender: Sender, msg: Message) -> HandlerFuture<'_> {
        Box::pin(async move {
            if let Ok(reply) = msg.reply(MessageType::Pong, Option::<&()>::None) {
                let _ = sender.send_msg(reply);
            }
        })
    }

    /// Called for `list` messages.
    fn on_list(&self, sender: Sender, msg: Message) -> HandlerFuture<'_> {
        Box::pin(async move {
            let _ = sender.send_error(&msg, RPC_ERR_CODE_NOT_IMPLEMENTED, "not implemented");
        })
    }

    /// Called for `upload_chunk` messages.
    fn on_upload_chunk(&self, sender: Sender, msg: Message) -> HandlerFuture<'_> {
        Box::pin(async move {
            let _ = sender.send_error(&msg, RPC_ERR_CODE_NOT_IMPLEMENTED, "not implemented");
        })
    }

    /// Called for `download_chunk` messages.
    fn on_download_chunk(&self, sender: Sender, msg: Message) -> HandlerFuture<'_> {
        Box::pin(async move {
            let _ = sender.send_error(&msg, RPC_ERR_CODE_NOT_IMPLEMENTED, "not implemented");
        })
    }

    /// Called for `remove` messages.
    fn on_remove(&self, sender: Sender, msg: Message) -> HandlerFuture<'_> {
        Box::pin(async move {
            let _ = sender.send_error(&msg, RPC_ERR_CODE_NOT_IMPLEMENTED, "not implemented");
        })
    }

    /// Called after the client connection closes.
    fn on_client_disconnected(&self) -> HandlerFuture<'_> {
        Box::pin(async {})
    }
}
