//! Opaque identifier codec
//!
//! Builds and parses the round-trippable tokens that reference a video
//! entry (channel index + title) or an underlying stream locator (channel
//! index + URL) across stateless request/response boundaries. Clients
//! persist and replay these tokens, so encoding must be deterministic:
//! decode followed by re-encode yields the identical byte string.
//!
//! Token layout: a namespace tag (`data_` for video ids, `url_` for stream
//! ids) followed by url-safe unpadded base64 over a length-prefixed field
//! concatenation `"{index}:{payload_len}:{payload}"`. The length prefix
//! keeps payloads containing `:` unambiguous, and the base64 layer keeps
//! the token safe to embed in a URL path segment. The addon-level prefix
//! shared with the host handler layer is stripped by the caller before
//! these functions see the token.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::errors::{AddonError, AddonResult};

/// Namespace tag for tokens referencing a video entry within a channel
pub const VIDEO_TAG: &str = "data_";
/// Namespace tag for tokens referencing an underlying stream locator
pub const STREAM_TAG: &str = "url_";

/// Encode a (channel index, entry title) pair into an opaque video id
pub fn encode_video_id(channel: usize, title: &str) -> String {
    encode_tagged(VIDEO_TAG, channel, title)
}

/// Decode an opaque video id back into its (channel index, entry title) pair
pub fn decode_video_id(token: &str) -> AddonResult<(usize, String)> {
    decode_tagged(VIDEO_TAG, token)
}

/// Encode a (channel index, stream locator) pair into an opaque stream id
pub fn encode_stream_id(channel: usize, locator: &str) -> String {
    encode_tagged(STREAM_TAG, channel, locator)
}

/// Decode an opaque stream id back into its (channel index, locator) pair
pub fn decode_stream_id(token: &str) -> AddonResult<(usize, String)> {
    decode_tagged(STREAM_TAG, token)
}

fn encode_tagged(tag: &str, channel: usize, payload: &str) -> String {
    let plain = format!("{}:{}:{}", channel, payload.len(), payload);
    format!("{}{}", tag, URL_SAFE_NO_PAD.encode(plain.as_bytes()))
}

fn decode_tagged(tag: &str, token: &str) -> AddonResult<(usize, String)> {
    let encoded = token
        .strip_prefix(tag)
        .ok_or_else(|| AddonError::malformed_id(token, format!("missing '{tag}' tag")))?;

    let raw = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|e| AddonError::malformed_id(token, format!("invalid base64: {e}")))?;
    let plain = String::from_utf8(raw)
        .map_err(|_| AddonError::malformed_id(token, "payload is not valid UTF-8"))?;

    let (index_part, rest) = plain
        .split_once(':')
        .ok_or_else(|| AddonError::malformed_id(token, "missing channel index field"))?;
    let channel: usize = index_part
        .parse()
        .map_err(|_| AddonError::malformed_id(token, "channel index is not a number"))?;

    let (len_part, payload) = rest
        .split_once(':')
        .ok_or_else(|| AddonError::malformed_id(token, "missing length field"))?;
    let expected_len: usize = len_part
        .parse()
        .map_err(|_| AddonError::malformed_id(token, "length field is not a number"))?;
    if payload.len() != expected_len {
        return Err(AddonError::malformed_id(
            token,
            format!("payload length {} does not match declared {}", payload.len(), expected_len),
        ));
    }

    Ok((channel, payload.to_string()))
}
