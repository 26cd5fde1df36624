use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, de::IgnoredAny, Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{STATUS_FAILED, STATUS_SUCCESS},
    modules::post::model::CommentResponse,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Api(String),

    #[error("Unexpected response status: {0}")]
    Envelope(String),

    #[error("Response carried no data")]
    MissingData,
}

/// What a like toggles. Replies are addressed through their parent comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Like {
    Post(Uuid),
    Comment(Uuid),
    Reply { comment_id: Uuid, reply_id: Uuid },
}

impl Like {
    pub fn path(&self) -> String {
        match self {
            Like::Post(id) => format!("/posts/like/{id}"),
            Like::Comment(id) => format!("/posts/like-comment/{id}"),
            Like::Reply { comment_id, reply_id } => {
                format!("/posts/like-comment/{comment_id}/{reply_id}")
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    status: String,
    data: Option<T>,
    message: Option<String>,
}

impl<T> Envelope<T> {
    pub(crate) fn into_result(self) -> Result<Option<T>, ClientError> {
        match self.status.as_str() {
            STATUS_SUCCESS => Ok(self.data),
            STATUS_FAILED => {
                Err(ClientError::Api(self.message.unwrap_or_else(|| "Request failed".into())))
            }
            other => Err(ClientError::Envelope(other.to_string())),
        }
    }
}

#[async_trait::async_trait]
pub trait PostApi: Send + Sync {
    async fn get_comments(&self, post_id: Uuid) -> Result<Vec<CommentResponse>, ClientError>;

    async fn like(&self, target: Like) -> Result<(), ClientError>;

    async fn comment(&self, post_id: Uuid, comment: &str) -> Result<CommentResponse, ClientError>;

    async fn reply(
        &self,
        comment_id: Uuid,
        comment: &str,
        reply_at: Option<&str>,
    ) -> Result<CommentResponse, ClientError>;

    async fn edit_comment(&self, comment_id: Uuid, comment: &str) -> Result<(), ClientError>;

    async fn delete_comment(&self, comment_id: Uuid) -> Result<(), ClientError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CommentBody<'a> {
    comment: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_at: Option<&'a str>,
}

/// Talks to the `/api` routes with a bearer token.
#[derive(Clone)]
pub struct HttpPostApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPostApi {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        HttpPostApi {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn get_comments_request(&self, post_id: Uuid) -> RequestBuilder {
        self.request(Method::GET, &format!("/posts/comments/{post_id}"))
    }

    fn like_request(&self, target: Like) -> RequestBuilder {
        self.request(Method::POST, &target.path())
    }

    fn comment_request(&self, post_id: Uuid, comment: &str) -> RequestBuilder {
        self.request(Method::POST, &format!("/posts/comment/{post_id}"))
            .json(&CommentBody { comment, reply_at: None })
    }

    fn reply_request(
        &self,
        comment_id: Uuid,
        comment: &str,
        reply_at: Option<&str>,
    ) -> RequestBuilder {
        self.request(Method::POST, &format!("/posts/reply-comment/{comment_id}"))
            .json(&CommentBody { comment, reply_at })
    }

    fn edit_comment_request(&self, comment_id: Uuid, comment: &str) -> RequestBuilder {
        self.request(Method::PATCH, &format!("/posts/edit-comment/{comment_id}"))
            .json(&CommentBody { comment, reply_at: None })
    }

    fn delete_comment_request(&self, comment_id: Uuid) -> RequestBuilder {
        self.request(Method::DELETE, &format!("/posts/delete-comment/{comment_id}"))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Option<T>, ClientError> {
        let response = builder.send().await?;
        let envelope: Envelope<T> = response.json().await?;
        envelope.into_result()
    }
}

#[async_trait::async_trait]
impl PostApi for HttpPostApi {
    async fn get_comments(&self, post_id: Uuid) -> Result<Vec<CommentResponse>, ClientError> {
        let comments = self.send(self.get_comments_request(post_id)).await?;
        Ok(comments.unwrap_or_default())
    }

    async fn like(&self, target: Like) -> Result<(), ClientError> {
        self.send::<IgnoredAny>(self.like_request(target)).await?;
        Ok(())
    }

    async fn comment(&self, post_id: Uuid, comment: &str) -> Result<CommentResponse, ClientError> {
        self.send(self.comment_request(post_id, comment)).await?.ok_or(ClientError::MissingData)
    }

    async fn reply(
        &self,
        comment_id: Uuid,
        comment: &str,
        reply_at: Option<&str>,
    ) -> Result<CommentResponse, ClientError> {
        self.send(self.reply_request(comment_id, comment, reply_at))
            .await?
            .ok_or(ClientError::MissingData)
    }

    async fn edit_comment(&self, comment_id: Uuid, comment: &str) -> Result<(), ClientError> {
        self.send::<IgnoredAny>(self.edit_comment_request(comment_id, comment)).await?;
        Ok(())
    }

    async fn delete_comment(&self, comment_id: Uuid) -> Result<(), ClientError> {
        self.send::<IgnoredAny>(self.delete_comment_request(comment_id)).await?;
        Ok(())
    }
}
