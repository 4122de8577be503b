//! Caller identity and request payloads for the posts API.
//!
//! # Design
//! Responses are returned as `serde_json::Value` because the service has no
//! fixed schema. Payloads accept any `Serialize` value; the structs here are
//! the shapes the service understands, offered for convenience.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The current caller, forwarded as `current_user` on delete operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for Identity {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for Identity {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Identity {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Payload for creating a post. Owner fields are omitted when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postable_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postable_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<u64>,
}

impl NewPost {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            postable_id: None,
            postable_type: None,
            creator_id: None,
        }
    }

    /// Attach the post to a postable owner (`"User"` or `"Group"`).
    pub fn for_postable(mut self, postable_id: u64, postable_type: impl Into<String>) -> Self {
        self.postable_id = Some(postable_id);
        self.postable_type = Some(postable_type.into());
        self
    }

    pub fn by(mut self, creator_id: u64) -> Self {
        self.creator_id = Some(creator_id);
        self
    }
}

/// Payload for commenting on a post, wrapped in a `comment` envelope on the
/// wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub comment: CommentFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentFields {
    pub body: String,
    pub creator_id: u64,
}

impl NewComment {
    pub fn new(body: impl Into<String>, creator_id: u64) -> Self {
        Self {
            comment: CommentFields {
                body: body.into(),
                creator_id,
            },
        }
    }
}

/// Body of a toggle-like request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liker {
    pub liker_id: u64,
}
