//! Message transport for lectern
//!
//! Models the cross-frame message channel between a sandboxed content frame
//! and the host page:
//! - Fire-and-forget sends, no acknowledgement or retry
//! - Delivery in send order to the listeners registered at send time
//! - Messages sent with no listener registered are lost
//! - Dropping a listener deregisters it

mod bus;

pub use bus::*;

use thiserror::Error;

/// Transport errors
#[derive(Debug, Error)]
pub enum IpcError {
    #[error("Channel closed")]
    ChannelClosed,
}

pub type IpcResult<T> = Result<T, IpcError>;
