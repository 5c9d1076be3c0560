//! Webhook request signing.
//!
//! Both platform families prove possession of the shared secret with
//! HMAC-SHA256 over a `"<timestamp>\n<secret>"` seed, but differ in key
//! material, timestamp unit, and injection point. The Lark family keys
//! the MAC with the seed itself over an empty message and embeds
//! `timestamp`/`sign` as top-level JSON fields (unix seconds); DingTalk
//! keys the MAC with the secret over the seed and carries the
//! percent-encoded signature in `timestamp`/`sign` query parameters
//! (unix milliseconds). Mixing up the units produces a signature the
//! remote silently rejects.

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Lark-family signature for one timestamp in unix seconds.
pub fn lark_sign(timestamp: i64, secret: &str) -> String {
    let seed = format!("{timestamp}\n{secret}");
    let mac = HmacSha256::new_from_slice(seed.as_bytes()).expect("HMAC can take key of any size");
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// DingTalk signature for one timestamp in unix milliseconds, already
/// percent-encoded for use as a query parameter.
pub fn ding_sign(timestamp_millis: i64, secret: &str) -> String {
    let seed = format!("{timestamp_millis}\n{secret}");
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(seed.as_bytes());
    let sign = base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());
    urlencoding::encode(&sign).into_owned()
}

/// Webhook URL with the DingTalk signature appended as query parameters.
pub fn ding_signed_url(webhook: &str, timestamp_millis: i64, secret: &str) -> String {
    format!(
        "{}&timestamp={}&sign={}",
        webhook,
        timestamp_millis,
        ding_sign(timestamp_millis, secret)
    )
}
