//! Working out which root hash and which path a request is about.

use hashfs_types::{find_hash_token, ContentHash};
use percent_encoding::percent_decode_str;

use crate::listing::JSON_SUFFIX;
use crate::message::Request;

/// Where a root hash was discovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RootSource {
    Uri,
    Referer,
    Default,
}

/// The root hash and residual path of a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestTarget {
    pub root: ContentHash,
    pub source: RootSource,
    /// Residual path without leading slash, query, or fragment. Still
    /// percent-encoded.
    pub path: String,
    /// Decoded path segments with `.` and `..` folded away.
    pub segments: Vec<String>,
}

impl RequestTarget {
    /// The URI's hash token wins over the referer's, which wins over
    /// `default_root`. The residual path is whatever follows the token in
    /// the URI, or the whole URI when the token did not come from it.
    pub fn parse(request: &Request, default_root: ContentHash) -> Self {
        let (root, source, residual) = if let Some(token) = find_hash_token(&request.uri) {
            (token.hash, RootSource::Uri, &request.uri[token.end()..])
        } else if let Some(token) = request.referer().and_then(find_hash_token) {
            (token.hash, RootSource::Referer, request.uri.as_str())
        } else {
            (default_root, RootSource::Default, request.uri.as_str())
        };

        let path = pathname(residual).to_string();
        let segments = split_segments(&path);
        Self {
            root,
            source,
            path,
            segments,
        }
    }

    /// Whether a directory at the end of this path should be listed as JSON.
    pub fn wants_json(&self) -> bool {
        self.path.ends_with(JSON_SUFFIX)
    }
}

fn pathname(residual: &str) -> &str {
    let end = residual.find(['?', '#']).unwrap_or(residual.len());
    residual[..end].trim_start_matches('/')
}

fn split_segments(path: &str) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    for raw in path.split('/') {
        let segment = percent_decode_str(raw).decode_utf8_lossy();
        if segment.is_empty() || segment == "." {
            continue;
        }
        if segment == ".." {
            segments.pop();
            continue;
        }
        segments.push(segment.into_owned());
    }
    segments
}
