//! Payload segment of a WebSocket frame (RFC 6455).
//!
//! `PayloadData` takes bytes already delimited by the frame-header parser
//! and exposes the extension/application split, in-place masking, and the
//! close-frame checks the frame layer needs before handing bytes to the
//! application.

pub mod error;
pub mod ws;

pub use error::{PayloadError, Result};
pub use ws::close::{is_reserved, CloseStatusCode};
pub use ws::limits::{check_length, max_length, set_max_length};
pub use ws::mask::{apply_mask, MaskKey};
pub use ws::{PayloadBuilder, PayloadData};
