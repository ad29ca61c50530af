//! Stock [`Handler`] serving a directory tree.
//!
//! Routes each request to the transfer engine or the file operations and
//! maps domain errors to wire error codes.

use std::sync::Arc;
use std::time::Duration;

use filebay_file_ops::FileOpsError;
use filebay_protocol::MessageType;
use filebay_protocol::constants::{
    RPC_ERR_CODE_ABORTED, RPC_ERR_CODE_BAD_REQUEST, RPC_ERR_CODE_CONFLICT,
    RPC_ERR_CODE_INTERNAL, RPC_ERR_CODE_NOT_FOUND,
};
use filebay_protocol::envelope::Message;
use filebay_protocol::messages::{
    DownloadChunkRequest, DownloadChunkResponse, ListRequest, ListResponse, RemoveRequest,
    RemoveResponse, UploadChunkRequest,
};
use filebay_transfer::{TransferEngine, TransferError};
use tokio_util::sync::CancellationToken;

use crate::connection::Sender;
use crate::handler::{Handler, HandlerFuture};

/// Handler backed by a [`TransferEngine`] rooted at the served directory.
pub struct FsHandler {
    engine: Arc<TransferEngine>,
}

impl FsHandler {
    pub fn new(engine: Arc<TransferEngine>) -> Self {
        Self { engine }
    }

    /// Spawns the periodic idle-transfer sweep.
    ///
    /// Runs until `cancel` fires; every `interval` it evicts transfer
    /// handles idle longer than `max_idle`.
    pub fn spawn_sweeper(
        engine: Arc<TransferEngine>,
        interval: Duration,
        max_idle: Duration,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick fires immediately; skip it.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let evicted = engine.sweep_idle(max_idle);
                        if evicted > 0 {
                            tracing::info!(evicted, "idle transfer sweep");
                        }
                    }
                }
            }
        })
    }
}

/// Maps a transfer failure to its wire error code.
fn transfer_error_code(err: &TransferError) -> i32 {
    match err {
        TransferError::AlreadyExists(_) | TransferError::Busy(_) => RPC_ERR_CODE_CONFLICT,
        TransferError::NotFound(_) => RPC_ERR_CODE_NOT_FOUND,
        TransferError::Aborted(_) => RPC_ERR_CODE_ABORTED,
        TransferError::InvalidPath(_) => RPC_ERR_CODE_BAD_REQUEST,
        TransferError::Io(_) => RPC_ERR_CODE_INTERNAL,
    }
}

fn file_ops_error_code(err: &FileOpsError) -> i32 {
    match err {
        FileOpsError::NotFound(_) => RPC_ERR_CODE_NOT_FOUND,
        FileOpsError::InvalidPath(_) => RPC_ERR_CODE_BAD_REQUEST,
        FileOpsError::Io(_) => RPC_ERR_CODE_INTERNAL,
    }
}

/// Parses the request payload, which must be present.
fn required_payload<T: for<'de> serde::Deserialize<'de>>(
    sender: &Sender,
    msg: &Message,
) -> Option<T> {
    match msg.parse_payload::<T>() {
        Ok(Some(payload)) => Some(payload),
        Ok(None) => {
            let _ = sender.send_error(msg, RPC_ERR_CODE_BAD_REQUEST, "missing payload");
            None
        }
        Err(e) => {
            let _ = sender.send_error(msg, RPC_ERR_CODE_BAD_REQUEST, &format!("bad payload: {e}"));
            None
        }
    }
}

impl Handler for FsHandler {
    fn on_list(&self, sender: Sender, msg: Message) -> HandlerFuture<'_> {
        Box::pin(async move {
            // A missing payload lists the base directory.
            let req = match msg.parse_payload::<ListRequest>() {
                Ok(payload) => payload.unwrap_or_default(),
                Err(e) => {
                    let _ = sender.send_error(
                        &msg,
                        RPC_ERR_CODE_BAD_REQUEST,
                        &format!("bad payload: {e}"),
                    );
                    return;
                }
            };

            match filebay_file_ops::list_entries(self.engine.root(), &req.path) {
                Ok(entries) => {
                    let resp = ListResponse { entries };
                    if let Ok(reply) = msg.reply(MessageType::ListResponse, Some(&resp)) {
                        let _ = sender.send_msg(reply);
                    }
                }
                Err(e) => {
                    let _ = sender.send_error(&msg, file_ops_error_code(&e), &e.to_string());
                }
            }
        })
    }

    fn on_upload_chunk(&self, sender: Sender, msg: Message) -> HandlerFuture<'_> {
        Box::pin(async move {
            let Some(req) = required_payload::<UploadChunkRequest>(&sender, &msg) else {
                return;
            };

            match self.engine.write_chunk(&req.path, &req.name, &req.data) {
                Ok(()) => {
                    if let Ok(reply) =
                        msg.reply(MessageType::UploadChunkResponse, Option::<&()>::None)
                    {
                        let _ = sender.send_msg(reply);
                    }
                }
                Err(e) => {
                    let _ = sender.send_error(&msg, transfer_error_code(&e), &e.to_string());
                }
            }
        })
    }

    fn on_download_chunk(&self, sender: Sender, msg: Message) -> HandlerFuture<'_> {
        Box::pin(async move {
            let Some(req) = required_payload::<DownloadChunkRequest>(&sender, &msg) else {
                return;
            };

            match self.engine.read_chunk(&req.path) {
                Ok(data) => {
                    let resp = DownloadChunkResponse { data };
                    if let Ok(reply) = msg.reply(MessageType::DownloadChunkResponse, Some(&resp)) {
                        let _ = sender.send_msg(reply);
                    }
                }
                Err(e) => {
                    let _ = sender.send_error(&msg, transfer_error_code(&e), &e.to_string());
                }
            }
        })
    }

    fn on_remove(&self, sender: Sender, msg: Message) -> HandlerFuture<'_> {
        Box::pin(async move {
            let Some(req) = required_payload::<RemoveRequest>(&sender, &msg) else {
                return;
            };

            let results = filebay_file_ops::remove_paths(self.engine.root(), &req.paths);
            let resp = RemoveResponse { results };
            if let Ok(reply) = msg.reply(MessageType::RemoveResponse, Some(&resp)) {
                let _ = sender.send_msg(reply);
            }
        })
    }
}
