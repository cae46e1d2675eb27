use std::collections::{BTreeMap, HashMap};

use hashfs_types::ContentHash;
use serde::{Deserialize, Serialize};

pub const CONTENT_TYPE: &str = "content-type";
pub const LOCATION: &str = "location";
pub const REFERER: &str = "referer";

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

/// A request as delivered by the transport.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub uri: String,
    #[serde(default)]
    pub head: HashMap<String, String>,
}

impl Request {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            head: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.head.insert(name.into(), value.into());
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn referer(&self) -> Option<&str> {
        self.header(REFERER)
    }
}

/// A response for the transport to deliver.
///
/// When `hash` is set the transport streams that blob from the store as the
/// body and `body` is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub head: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<ContentHash>,
}

impl Response {
    /// Status to send; a missing status means success.
    pub fn status(&self) -> u16 {
        self.status_code.unwrap_or(200)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.head.get(CONTENT_TYPE).map(String::as_str)
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self {
            status_code: Some(302),
            head: BTreeMap::from([(LOCATION.to_string(), location.into())]),
            ..Self::default()
        }
    }

    pub fn blob(content_type: impl Into<String>, hash: ContentHash) -> Self {
        Self {
            status_code: Some(200),
            head: BTreeMap::from([(CONTENT_TYPE.to_string(), content_type.into())]),
            hash: Some(hash),
            ..Self::default()
        }
    }

    pub fn text(status: u16, content_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status_code: Some(status),
            head: BTreeMap::from([(CONTENT_TYPE.to_string(), content_type.into())]),
            body: Some(body.into()),
            hash: None,
        }
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self::text(200, HTML_CONTENT_TYPE, body)
    }

    pub fn json(body: impl Into<String>) -> Self {
        Self::text(200, JSON_CONTENT_TYPE, body)
    }

    /// Generic failure: 400 with the error text as a plain-text body.
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self::text(400, TEXT_CONTENT_TYPE, error.to_string())
    }
}
