//! HTTP HEAD / metadata probing.
//!
//! Uses the curl crate (libcurl) to fetch response headers and read
//! `Content-Length` and `Accept-Ranges: bytes`, which decide whether an
//! existing local archive is complete or can be resumed.

mod parse;

pub(crate) use parse::{parse_headers, parse_status_line};

use crate::error::{FetchError, Result};
use std::str;
use std::time::Duration;

/// Response metadata consumed by the downloader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// Status code of the final response (after redirects).
    pub status: Option<u32>,
    /// Size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    /// True if server sent `Accept-Ranges: bytes`.
    pub accept_ranges: bool,
    /// First byte position from `Content-Range` on partial responses.
    pub content_range_start: Option<u64>,
}

/// Performs a HEAD request and returns parsed metadata.
///
/// Follows redirects. Any final status >= 400 is a [`FetchError::RemoteError`].
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
pub fn probe(url: &str) -> Result<ResponseHead> {
    let mut headers: Vec<String> = Vec::new();
    let network = |source: curl::Error| FetchError::Network {
        url: url.to_string(),
        source,
    };

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(network)?;
    easy.nobody(true).map_err(network)?; // HEAD request
    easy.follow_location(true).map_err(network)?;
    easy.connect_timeout(Duration::from_secs(15)).map_err(network)?;

    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })
            .map_err(network)?;
        transfer.perform().map_err(network)?;
    }

    let code = easy.response_code().map_err(network)?;
    tracing::debug!(url, code, "HEAD");
    if code >= 400 {
        return Err(FetchError::RemoteError {
            status: code,
            url: url.to_string(),
        });
    }

    let mut head = parse_headers(&headers);
    head.status = Some(code);
    Ok(head)
}
