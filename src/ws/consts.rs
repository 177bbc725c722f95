pub const MASK_KEY_LENGTH: usize = 4;

/// Minimum fragment size used by the frame layer, lower bound for the max length.
pub const FRAGMENT_LENGTH: u64 = 1016;
pub const DEFAULT_MAX_LENGTH: u64 = i64::MAX as u64;

// a close frame body starts with a 2 byte status code
pub const CLOSE_STATUS_LENGTH: usize = 2;

pub const CLOSE_UNDEFINED: u16 = 1004;
pub const CLOSE_NO_STATUS: u16 = 1005;
pub const CLOSE_ABNORMAL: u16 = 1006;
pub const CLOSE_TLS_HANDSHAKE: u16 = 1015;

pub const MAX_LENGTH_ENV: &str = "WS_PAYLOAD_MAX_LENGTH";
