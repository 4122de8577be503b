//! Endpoint descriptors and URL construction.
//!
//! # Design
//! Each remote operation is an `Endpoint` value carrying its identifiers.
//! `Endpoint::url` is a pure function of the base URL and the descriptor:
//! the base is cloned, never modified, so path segments and query pairs from
//! one call cannot leak into the next.

use url::Url;

use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::Identity;

/// One of the fixed operations exposed by the posts service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    UserPosts {
        user_id: u64,
    },
    CreatePost,
    DeletePost {
        post_id: u64,
        current_user: Option<&'a Identity>,
    },
    DeletePostsFor {
        postable_id: u64,
        postable_type: &'a str,
    },
    GroupPosts {
        group_id: u64,
    },
    PostComments {
        post_id: u64,
    },
    CreateComment {
        post_id: u64,
    },
    DeleteComment {
        post_id: u64,
        comment_id: &'a str,
        current_user: Option<&'a Identity>,
    },
    ToggleLike {
        post_id: u64,
    },
    Likers {
        post_id: u64,
    },
}

impl Endpoint<'_> {
    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::UserPosts { .. }
            | Endpoint::GroupPosts { .. }
            | Endpoint::PostComments { .. }
            | Endpoint::Likers { .. } => HttpMethod::Get,
            Endpoint::CreatePost | Endpoint::CreateComment { .. } | Endpoint::ToggleLike { .. } => {
                HttpMethod::Post
            }
            Endpoint::DeletePost { .. }
            | Endpoint::DeletePostsFor { .. }
            | Endpoint::DeleteComment { .. } => HttpMethod::Delete,
        }
    }

    /// Path segments relative to the root path, unencoded.
    pub fn path_segments(&self) -> Vec<String> {
        match *self {
            Endpoint::UserPosts { user_id } => segments(["users", &user_id.to_string(), "posts"]),
            Endpoint::CreatePost => segments(["posts"]),
            Endpoint::DeletePost { post_id, .. } => segments(["posts", &post_id.to_string()]),
            Endpoint::DeletePostsFor { postable_id, .. } => {
                segments(["postable", &postable_id.to_string(), "posts"])
            }
            Endpoint::GroupPosts { group_id } => segments(["groups", &group_id.to_string(), "posts"]),
            Endpoint::PostComments { post_id } | Endpoint::CreateComment { post_id } => {
                segments(["posts", &post_id.to_string(), "comments"])
            }
            Endpoint::DeleteComment {
                post_id,
                comment_id,
                ..
            } => segments(["posts", &post_id.to_string(), "comments", comment_id]),
            Endpoint::ToggleLike { post_id } => {
                segments(["posts", &post_id.to_string(), "toggle_like"])
            }
            Endpoint::Likers { post_id } => segments(["posts", &post_id.to_string(), "likers"]),
        }
    }

    /// Query pairs, unencoded. `current_user` is absent, not empty, when no
    /// identity is known.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match *self {
            Endpoint::DeletePost { current_user, .. }
            | Endpoint::DeleteComment { current_user, .. } => current_user
                .map(|identity| vec![("current_user", identity.to_string())])
                .unwrap_or_default(),
            Endpoint::DeletePostsFor { postable_type, .. } => {
                vec![("postable_type", postable_type.to_string())]
            }
            _ => Vec::new(),
        }
    }

    /// Build the absolute URL for this endpoint on top of `base`.
    pub fn url(&self, base: &Url) -> Result<Url, ApiError> {
        if let Endpoint::DeleteComment { comment_id, .. } = *self {
            let id = comment_id.trim();
            if id.is_empty() || id == "." || id == ".." {
                return Err(ApiError::InvalidArgument(format!(
                    "comment id {comment_id:?} does not name a comment"
                )));
            }
        }

        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);

        url.path_segments_mut()
            .map_err(|()| {
                ApiError::InvalidConfiguration(format!("{base} cannot carry path segments"))
            })?
            .pop_if_empty()
            .extend(self.path_segments());

        let query = self.query();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

fn segments<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}
