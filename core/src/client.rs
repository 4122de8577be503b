//! Request builder, dispatcher and response parser for the posts API.
//!
//! # Design
//! `PostsClient` holds a validated base URL, an optional caller identity and
//! a transport, none of which change after construction. Each operation is
//! split the same way: a `build_*` method produces an `HttpRequest` from a
//! fresh copy of the base URL, and the operation method sends it through the
//! transport and hands the response to `parse_response`. Because URLs are
//! built per call, one client can be shared between threads without locking.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Identity, Liker};

/// Client for the posts/comments/likes service.
#[derive(Debug, Clone)]
pub struct PostsClient<T> {
    base_url: Url,
    identity: Option<Identity>,
    transport: T,
}

#[cfg(feature = "ureq")]
impl PostsClient<crate::transport::UreqTransport> {
    /// A client that talks to the service over a default `UreqTransport`.
    pub fn with_ureq(config: &ClientConfig, identity: Option<Identity>) -> Result<Self, ApiError> {
        Self::new(config, identity, crate::transport::UreqTransport::new())
    }
}

impl<T> PostsClient<T> {
    /// Validate `config` and bind it to `transport`.
    pub fn new(
        config: &ClientConfig,
        identity: Option<Identity>,
        transport: T,
    ) -> Result<Self, ApiError> {
        let base_url = config.base_url()?;
        Ok(Self {
            base_url,
            identity,
            transport,
        })
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_get_user_posts(&self, user_id: u64) -> Result<HttpRequest, ApiError> {
        self.request(Endpoint::UserPosts { user_id })
    }

    pub fn build_create_post<B: Serialize + ?Sized>(
        &self,
        post: &B,
    ) -> Result<HttpRequest, ApiError> {
        self.request_with_body(Endpoint::CreatePost, post)
    }

    pub fn build_delete_post(&self, post_id: u64) -> Result<HttpRequest, ApiError> {
        self.request(Endpoint::DeletePost {
            post_id,
            current_user: self.identity.as_ref(),
        })
    }

    pub fn build_delete_posts_for(
        &self,
        postable_id: u64,
        postable_type: &str,
    ) -> Result<HttpRequest, ApiError> {
        self.request(Endpoint::DeletePostsFor {
            postable_id,
            postable_type,
        })
    }

    pub fn build_get_group_posts(&self, group_id: u64) -> Result<HttpRequest, ApiError> {
        self.request(Endpoint::GroupPosts { group_id })
    }

    pub fn build_get_post_comments(&self, post_id: u64) -> Result<HttpRequest, ApiError> {
        self.request(Endpoint::PostComments { post_id })
    }

    pub fn build_create_comment<B: Serialize + ?Sized>(
        &self,
        post_id: u64,
        comment: &B,
    ) -> Result<HttpRequest, ApiError> {
        self.request_with_body(Endpoint::CreateComment { post_id }, comment)
    }

    pub fn build_delete_comment(
        &self,
        post_id: u64,
        comment_id: &str,
    ) -> Result<HttpRequest, ApiError> {
        self.request(Endpoint::DeleteComment {
            post_id,
            comment_id,
            current_user: self.identity.as_ref(),
        })
    }

    pub fn build_toggle_like(&self, post_id: u64, liker_id: u64) -> Result<HttpRequest, ApiError> {
        self.request_with_body(Endpoint::ToggleLike { post_id }, &Liker { liker_id })
    }

    pub fn build_get_likers(&self, post_id: u64) -> Result<HttpRequest, ApiError> {
        self.request(Endpoint::Likers { post_id })
    }

    fn request(&self, endpoint: Endpoint<'_>) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: endpoint.method(),
            url: endpoint.url(&self.base_url)?.into(),
            headers: Vec::new(),
            body: None,
        })
    }

    fn request_with_body<B: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint<'_>,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(ApiError::InvalidPayload)?;
        let mut request = self.request(endpoint)?;
        request
            .headers
            .push(("content-type".to_string(), "application/json".to_string()));
        request.body = Some(body);
        Ok(request)
    }
}

impl<T: Transport> PostsClient<T> {
    /// `GET /users/{user_id}/posts`
    pub fn get_user_posts(&self, user_id: u64) -> Result<Value, ApiError> {
        self.execute(self.build_get_user_posts(user_id)?)
    }

    /// `POST /posts`
    pub fn create_post<B: Serialize + ?Sized>(&self, post: &B) -> Result<Value, ApiError> {
        self.execute(self.build_create_post(post)?)
    }

    /// `DELETE /posts/{post_id}`, scoped to the client's identity if any.
    pub fn delete_post(&self, post_id: u64) -> Result<Value, ApiError> {
        self.execute(self.build_delete_post(post_id)?)
    }

    /// `DELETE /postable/{postable_id}/posts?postable_type=...`
    pub fn delete_posts_for(&self, postable_id: u64, postable_type: &str) -> Result<Value, ApiError> {
        self.execute(self.build_delete_posts_for(postable_id, postable_type)?)
    }

    /// `GET /groups/{group_id}/posts`
    pub fn get_group_posts(&self, group_id: u64) -> Result<Value, ApiError> {
        self.execute(self.build_get_group_posts(group_id)?)
    }

    /// `GET /posts/{post_id}/comments`
    pub fn get_post_comments(&self, post_id: u64) -> Result<Value, ApiError> {
        self.execute(self.build_get_post_comments(post_id)?)
    }

    /// `POST /posts/{post_id}/comments`
    pub fn create_comment<B: Serialize + ?Sized>(
        &self,
        post_id: u64,
        comment: &B,
    ) -> Result<Value, ApiError> {
        self.execute(self.build_create_comment(post_id, comment)?)
    }

    /// `DELETE /posts/{post_id}/comments/{comment_id}`, scoped to the
    /// client's identity if any.
    pub fn delete_comment(&self, post_id: u64, comment_id: &str) -> Result<Value, ApiError> {
        self.execute(self.build_delete_comment(post_id, comment_id)?)
    }

    /// `POST /posts/{post_id}/toggle_like`. Likes the post if `liker_id`
    /// has not yet, unlikes it otherwise.
    pub fn toggle_like(&self, post_id: u64, liker_id: u64) -> Result<Value, ApiError> {
        self.execute(self.build_toggle_like(post_id, liker_id)?)
    }

    /// `GET /posts/{post_id}/likers`
    pub fn get_likers(&self, post_id: u64) -> Result<Value, ApiError> {
        self.execute(self.build_get_likers(post_id)?)
    }

    fn execute(&self, request: HttpRequest) -> Result<Value, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let response = match self.transport.send(&request) {
            Ok(response) => response,
            Err(err) => {
                warn!(method = %request.method, url = %request.url, error = %err, "transport failed");
                return Err(err.into());
            }
        };

        let status = response.status;
        let result = parse_response(response);
        match &result {
            Ok(_) => {
                debug!(method = %request.method, url = %request.url, status, "request succeeded");
            }
            Err(err) => {
                warn!(
                    method = %request.method,
                    url = %request.url,
                    status,
                    error = %err,
                    "request failed"
                );
            }
        }
        result
    }
}

/// Classify a response: 2xx bodies are decoded as JSON, anything else is a
/// `RequestFailed` carrying the status and raw body.
///
/// A `204 No Content` decodes to `Value::Null`.
pub fn parse_response(response: HttpResponse) -> Result<Value, ApiError> {
    if !response.is_success() {
        return Err(ApiError::RequestFailed {
            status: Some(response.status),
            body: response.body,
        });
    }
    if response.status == 204 && response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|source| ApiError::MalformedResponse {
        status: response.status,
        source,
    })
}
