//! Payload segment of a single WebSocket frame.
//!
//! A `PayloadData` owns the bytes that follow a frame header. The leading
//! `extension_data_length` bytes belong to negotiated extensions and the rest
//! is application data. `length` is the logical size; the backing buffer may
//! be larger when a reader preallocated it.
//!
//! ```
//! use ws_payload::PayloadData;
//!
//! let mut payload = PayloadData::from_vec(vec![0x03, 0xE8, 0x48, 0x69]);
//! payload.mask(&[0x11, 0x22, 0x33, 0x44]).unwrap();
//! assert_eq!(payload.to_string(), "12-CA-7B-2D");
//! payload.mask(&[0x11, 0x22, 0x33, 0x44]).unwrap();
//! assert_eq!(payload.close_status_code(), Some(1000));
//! ```

use std::convert::TryFrom;
use std::fmt;
use std::iter::Copied;
use std::slice;
use std::str;

use bytes::Bytes;

use super::close;
use super::consts::{CLOSE_STATUS_LENGTH, DEFAULT_MAX_LENGTH};
use super::mask::{apply_mask, mask_key_from_slice, MaskKey};
use crate::error::{PayloadError, Result};

#[derive(Debug, Clone)]
pub struct PayloadData {
    data: Vec<u8>,
    length: usize,
    extension_data_length: usize,
}

impl PayloadData {
    /// A payload with no bytes, e.g. the body of a bare control frame.
    ///
    /// Every use is its own value, so nothing can mutate a shared instance.
    pub const EMPTY: PayloadData = PayloadData {
        data: Vec::new(),
        length: 0,
        extension_data_length: 0,
    };

    pub fn new() -> Self {
        Self::EMPTY
    }

    pub fn from_vec(data: Vec<u8>) -> Self {
        let length = data.len();
        PayloadData {
            data,
            length,
            extension_data_length: 0,
        }
    }

    /// Uses only the first `length` bytes of `data`.
    pub fn with_length(data: Vec<u8>, length: u64) -> Result<Self> {
        Self::with_extension_data(data, length, 0)
    }

    /// Marks the first `extension_data_length` bytes as extension data.
    ///
    /// Fails with `InvalidArgument` unless
    /// `extension_data_length <= length <= data.len()`.
    pub fn with_extension_data(
        data: Vec<u8>,
        length: u64,
        extension_data_length: u64,
    ) -> Result<Self> {
        let length = checked_length(length, data.len())?;
        if extension_data_length > length as u64 {
            tracing::trace!(
                "extension data length {} past payload length {}",
                extension_data_length,
                length
            );
            return Err(PayloadError::invalid(format!(
                "extension data length {} exceeds payload length {}",
                extension_data_length, length
            )));
        }
        Ok(PayloadData {
            data,
            length,
            extension_data_length: extension_data_length as usize,
        })
    }

    pub fn builder(data: Vec<u8>) -> PayloadBuilder {
        PayloadBuilder::new(data)
    }

    pub fn len(&self) -> u64 {
        self.length as u64
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn extension_data_length(&self) -> u64 {
        self.extension_data_length as u64
    }

    pub fn application_data(&self) -> &[u8] {
        &self.data[self.extension_data_length..self.length]
    }

    pub fn extension_data(&self) -> &[u8] {
        &self.data[..self.extension_data_length]
    }

    /// Masks or unmasks the payload in place.
    ///
    /// `key` must be exactly 4 bytes. Whether the bytes are currently masked
    /// is up to the caller to track.
    pub fn mask(&mut self, key: &[u8]) -> Result<()> {
        let key = mask_key_from_slice(key)?;
        self.mask_with(key);
        Ok(())
    }

    pub fn mask_with(&mut self, key: MaskKey) {
        tracing::trace!("applying mask to {} payload bytes", self.length);
        apply_mask(&mut self.data[..self.length], key);
    }

    /// Big-endian status code at the start of a close frame body.
    pub fn close_status_code(&self) -> Option<u16> {
        if self.length < CLOSE_STATUS_LENGTH {
            return None;
        }
        Some(u16::from_be_bytes([self.data[0], self.data[1]]))
    }

    /// Only meaningful for close frames: a peer must not send a reserved code.
    pub fn includes_reserved_close_status_code(&self) -> bool {
        self.includes_reserved_close_status_code_with(close::is_reserved)
    }

    pub fn includes_reserved_close_status_code_with<F>(&self, is_reserved: F) -> bool
    where
        F: Fn(u16) -> bool,
    {
        self.close_status_code().map_or(false, is_reserved)
    }

    /// UTF-8 reason that follows the status code in a close frame body.
    pub fn close_reason(&self) -> Result<Option<&str>> {
        if self.length <= CLOSE_STATUS_LENGTH {
            return Ok(None);
        }
        str::from_utf8(&self.data[CLOSE_STATUS_LENGTH..self.length])
            .map(Some)
            .map_err(|e| PayloadError::invalid(format!("close reason is not UTF-8: {}", e)))
    }

    pub fn iter(&self) -> Copied<slice::Iter<'_, u8>> {
        self.as_slice().iter().copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.length]
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }

    /// Hands back the whole backing buffer, including any bytes past `len()`.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

fn checked_length(length: u64, capacity: usize) -> Result<usize> {
    if length > DEFAULT_MAX_LENGTH {
        tracing::trace!("payload length {} does not fit in i64", length);
        return Err(PayloadError::invalid(format!(
            "payload length {} exceeds {}",
            length, DEFAULT_MAX_LENGTH
        )));
    }
    match usize::try_from(length) {
        Ok(length) if length <= capacity => Ok(length),
        _ => {
            tracing::trace!("payload length {} past buffer of {}", length, capacity);
            Err(PayloadError::invalid(format!(
                "payload length {} exceeds buffer size {}",
                length, capacity
            )))
        }
    }
}

impl Default for PayloadData {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl PartialEq for PayloadData {
    fn eq(&self, other: &Self) -> bool {
        self.extension_data_length == other.extension_data_length
            && self.as_slice() == other.as_slice()
    }
}
impl Eq for PayloadData {}

impl AsRef<[u8]> for PayloadData {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl From<Vec<u8>> for PayloadData {
    fn from(data: Vec<u8>) -> Self {
        Self::from_vec(data)
    }
}

impl From<&[u8]> for PayloadData {
    fn from(data: &[u8]) -> Self {
        Self::from_vec(data.to_vec())
    }
}

impl From<Bytes> for PayloadData {
    fn from(data: Bytes) -> Self {
        Self::from_vec(Vec::from(data))
    }
}

impl From<PayloadData> for Bytes {
    fn from(payload: PayloadData) -> Self {
        let mut data = payload.data;
        data.truncate(payload.length);
        Bytes::from(data)
    }
}

impl<'a> IntoIterator for &'a PayloadData {
    type Item = u8;
    type IntoIter = Copied<slice::Iter<'a, u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Formats as dash separated uppercase hex, e.g. `01-FF-A0`.
impl fmt::Display for PayloadData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// Collects the length and extension split before producing a `PayloadData`,
/// for readers that fill a preallocated buffer.
#[derive(Debug)]
pub struct PayloadBuilder {
    data: Vec<u8>,
    length: Option<u64>,
    extension_data_length: u64,
}

impl PayloadBuilder {
    pub fn new(data: Vec<u8>) -> Self {
        PayloadBuilder {
            data,
            length: None,
            extension_data_length: 0,
        }
    }

    pub fn length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn extension_data_length(mut self, extension_data_length: u64) -> Self {
        self.extension_data_length = extension_data_length;
        self
    }

    pub fn build(self) -> Result<PayloadData> {
        let length = self.length.unwrap_or(self.data.len() as u64);
        PayloadData::with_extension_data(self.data, length, self.extension_data_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 4] = [0x11, 0x22, 0x33, 0x44];

    #[test]
    fn test_empty() {
        let empty = PayloadData::EMPTY;
        assert_eq!(empty.len(), 0);
        assert!(empty.is_empty());
        assert!(empty.application_data().is_empty());
        assert!(empty.extension_data().is_empty());
        assert_eq!(empty.to_string(), "");
        assert_eq!(PayloadData::new(), empty);
        assert_eq!(PayloadData::default(), empty);
    }

    #[test]
    fn test_masking_a_copy_of_empty_leaves_constant_untouched() {
        let mut empty = PayloadData::EMPTY;
        empty.mask(&KEY).unwrap();
        assert!(empty.is_empty());
        assert!(PayloadData::EMPTY.is_empty());
    }

    #[test]
    fn test_from_vec_uses_full_size() {
        let payload = PayloadData::from_vec(vec![1, 2, 3]);
        assert_eq!(payload.len(), 3);
        assert_eq!(payload.extension_data_length(), 0);
        assert_eq!(payload.application_data(), &[1, 2, 3]);
        assert!(payload.extension_data().is_empty());
    }

    #[test]
    fn test_with_length_shorter_than_buffer() {
        let payload = PayloadData::with_length(vec![1, 2, 3, 0, 0, 0], 3).unwrap();
        assert_eq!(payload.len(), 3);
        assert_eq!(payload.application_data(), &[1, 2, 3]);
        assert_eq!(payload.as_slice(), &[1, 2, 3]);
        assert_eq!(payload.to_string(), "01-02-03");
        assert_eq!(payload.into_vec(), vec![1, 2, 3, 0, 0, 0]);
    }

    #[test]
    fn test_with_length_past_buffer_rejected() {
        let err = PayloadData::with_length(vec![1, 2], 3).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidArgument(_)));
        assert!(PayloadData::with_length(vec![], i64::MAX as u64 + 1).is_err());
    }

    #[test]
    fn test_extension_split() {
        let payload = PayloadData::with_extension_data(vec![9, 9, 1, 2, 3], 5, 2).unwrap();
        assert_eq!(payload.extension_data(), &[9, 9]);
        assert_eq!(payload.application_data(), &[1, 2, 3]);
        assert_eq!(payload.extension_data_length(), 2);
    }

    #[test]
    fn test_extension_split_uses_logical_length() {
        let payload = PayloadData::with_extension_data(vec![9, 1, 2, 7, 7], 3, 1).unwrap();
        assert_eq!(payload.extension_data(), &[9]);
        assert_eq!(payload.application_data(), &[1, 2]);
    }

    #[test]
    fn test_extension_covering_whole_payload() {
        let payload = PayloadData::with_extension_data(vec![1, 2], 2, 2).unwrap();
        assert_eq!(payload.extension_data(), &[1, 2]);
        assert!(payload.application_data().is_empty());
    }

    #[test]
    fn test_extension_past_length_rejected() {
        let err = PayloadData::with_extension_data(vec![1, 2, 3], 2, 3).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidArgument(_)));
    }

    #[test]
    fn test_mask_example_and_restore() {
        let mut payload = PayloadData::from_vec(vec![0x03, 0xE8, 0x48, 0x69]);
        payload.mask(&KEY).unwrap();
        assert_eq!(payload.as_slice(), &[0x12, 0xCA, 0x7B, 0x2D]);
        payload.mask(&KEY).unwrap();
        assert_eq!(payload.as_slice(), &[0x03, 0xE8, 0x48, 0x69]);
    }

    #[test]
    fn test_mask_stops_at_length() {
        let mut payload = PayloadData::with_length(vec![0, 0, 0, 0, 0, 0], 5).unwrap();
        payload.mask_with(KEY);
        assert_eq!(payload.into_vec(), vec![0x11, 0x22, 0x33, 0x44, 0x11, 0]);
    }

    #[test]
    fn test_mask_bad_key_leaves_data_alone() {
        let mut payload = PayloadData::from_vec(vec![1, 2, 3]);
        assert!(payload.mask(&[1, 2, 3]).is_err());
        assert!(payload.mask(&[]).is_err());
        assert_eq!(payload.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_reserved_close_status_code() {
        assert!(!PayloadData::from_vec(vec![0x03, 0xF0]).includes_reserved_close_status_code());
        assert!(!PayloadData::from_vec(vec![0x03, 0xE9]).includes_reserved_close_status_code());
        assert!(PayloadData::from_vec(vec![0x03, 0xED]).includes_reserved_close_status_code());
        assert!(PayloadData::from_vec(vec![0x03, 0xF7, b'x']).includes_reserved_close_status_code());
    }

    #[test]
    fn test_reserved_close_status_code_needs_two_bytes() {
        assert!(!PayloadData::EMPTY.includes_reserved_close_status_code());
        assert!(!PayloadData::from_vec(vec![0x03]).includes_reserved_close_status_code());
        // a reserved code hidden past the logical length does not count
        let payload = PayloadData::with_length(vec![0x03, 0xED], 1).unwrap();
        assert!(!payload.includes_reserved_close_status_code());
    }

    #[test]
    fn test_reserved_close_status_code_custom_predicate() {
        let payload = PayloadData::from_vec(vec![0x0F, 0xA0]);
        assert!(!payload.includes_reserved_close_status_code());
        assert!(payload.includes_reserved_close_status_code_with(|code| code >= 4000));
    }

    #[test]
    fn test_close_reason() {
        let payload = PayloadData::from_vec(vec![0x03, 0xE8, b'H', b'i']);
        assert_eq!(payload.close_status_code(), Some(1000));
        assert_eq!(payload.close_reason().unwrap(), Some("Hi"));

        let bare = PayloadData::from_vec(vec![0x03, 0xE8]);
        assert_eq!(bare.close_reason().unwrap(), None);

        let broken = PayloadData::from_vec(vec![0x03, 0xE8, 0xFF, 0xFE]);
        assert!(broken.close_reason().is_err());
    }

    #[test]
    fn test_iter_is_restartable() {
        let payload = PayloadData::from_vec(vec![5, 6, 7]);
        let first: Vec<u8> = payload.iter().collect();
        let second: Vec<u8> = (&payload).into_iter().collect();
        assert_eq!(first, vec![5, 6, 7]);
        assert_eq!(first, second);
        let mut partial = payload.iter();
        partial.next();
        assert_eq!(payload.iter().next(), Some(5));
    }

    #[test]
    fn test_display_hex() {
        let payload = PayloadData::from_vec(vec![0x01, 0xFF, 0xA0]);
        assert_eq!(payload.to_string(), "01-FF-A0");
        assert_eq!(PayloadData::from_vec(vec![0x0A]).to_string(), "0A");
    }

    #[test]
    fn test_bytes_conversion() {
        let payload = PayloadData::with_length(vec![1, 2, 3, 4], 2).unwrap();
        let bytes: Bytes = payload.into();
        assert_eq!(&bytes[..], &[1, 2]);

        let back = PayloadData::from(Bytes::from_static(b"ok"));
        assert_eq!(back.as_slice(), b"ok");
    }

    #[test]
    fn test_builder() {
        let payload = PayloadData::builder(vec![7, 1, 2, 0])
            .length(3)
            .extension_data_length(1)
            .build()
            .unwrap();
        assert_eq!(payload.extension_data(), &[7]);
        assert_eq!(payload.application_data(), &[1, 2]);

        let whole = PayloadBuilder::new(vec![1, 2]).build().unwrap();
        assert_eq!(whole.len(), 2);

        assert!(PayloadBuilder::new(vec![1])
            .extension_data_length(2)
            .build()
            .is_err());
    }
}
