//! Rewriting of upstream recordings documents.
//!
//! Media links in the search results point at the upstream host. Clients
//! resolve them against their own base, so the host part is removed before
//! the body is cached. The match is a literal substring, not a URL parse:
//! links that do not contain it pass through unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{ProxyError, ProxyResult};

/// Host fragment removed from every recording link.
pub const MEDIA_HOST_PREFIX: &str = "//www.xeno-canto.org/";

/// Top-level search result document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recordings {
    pub recordings: Vec<Recording>,
}

/// A single recording; only the media link is carried through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    pub file: String,
}

/// Strip the media host from one link.
///
/// A leading `http:` or `https:` directly in front of the host fragment is
/// dropped along with it.
pub fn strip_media_host(file: &str) -> String {
    let without_scheme = ["https:", "http:"]
        .iter()
        .find_map(|scheme| {
            file.strip_prefix(scheme)
                .filter(|rest| rest.starts_with(MEDIA_HOST_PREFIX))
        })
        .unwrap_or(file);

    without_scheme.replace(MEDIA_HOST_PREFIX, "")
}

/// Parse an upstream body, rewrite every link and serialize it again.
///
/// Recording order and count are preserved.
pub fn rewrite_recordings(body: &str) -> ProxyResult<String> {
    let parsed: Recordings =
        serde_json::from_str(body).map_err(|e| ProxyError::MalformedBody(e.to_string()))?;

    let trimmed = Recordings {
        recordings: parsed
            .recordings
            .into_iter()
            .map(|r| Recording {
                file: strip_media_host(&r.file),
            })
            .collect(),
    };

    serde_json::to_string(&trimmed).map_err(|e| ProxyError::MalformedBody(e.to_string()))
}
