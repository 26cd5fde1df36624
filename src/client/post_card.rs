use std::{borrow::Cow, sync::Arc};

use uuid::Uuid;

use crate::{
    client::api::{ClientError, Like, PostApi},
    constants::DESCRIPTION_PREVIEW_CHARS,
    modules::{
        post::model::{CommentResponse, PostResponse},
        user::model::UserSummary,
    },
};

const EMPTY_COMMENT: &str = "Comment can not be empty";

#[derive(Debug, Clone, PartialEq)]
pub struct Editing {
    pub comment_id: Uuid,
    pub draft: String,
}

#[derive(Debug, Default)]
pub struct PostCardState {
    pub show_all: bool,
    pub show_comments: bool,
    /// At most one comment has its replies expanded.
    pub show_replies: Option<Uuid>,
    pub reply_to: Option<Uuid>,
    pub editing: Option<Editing>,
    pub comments: Vec<CommentResponse>,
    pub loading: bool,
    pub error: Option<String>,
}

/// View state and interactions for one post and its comment thread.
pub struct PostCard<A: PostApi> {
    api: Arc<A>,
    post: PostResponse,
    viewer: UserSummary,
    pub state: PostCardState,
}

impl<A: PostApi> PostCard<A> {
    pub fn new(api: Arc<A>, post: PostResponse, viewer: UserSummary) -> Self {
        PostCard { api, post, viewer, state: PostCardState::default() }
    }

    pub fn post(&self) -> &PostResponse {
        &self.post
    }

    pub fn is_truncated(&self) -> bool {
        self.post.description.chars().count() > DESCRIPTION_PREVIEW_CHARS
    }

    pub fn description(&self) -> Cow<'_, str> {
        if self.state.show_all || !self.is_truncated() {
            return Cow::Borrowed(&self.post.description);
        }
        Cow::Owned(self.post.description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect())
    }

    pub fn toggle_show_all(&mut self) {
        self.state.show_all = !self.state.show_all;
    }

    /// Every toggle refetches the thread, opening or closing.
    pub async fn toggle_comments(&mut self) {
        self.state.show_comments = !self.state.show_comments;
        self.load_comments().await;
    }

    pub fn toggle_replies(&mut self, comment_id: Uuid) {
        self.state.show_replies =
            if self.state.show_replies == Some(comment_id) { None } else { Some(comment_id) };
    }

    pub fn open_reply(&mut self, comment_id: Uuid) {
        self.state.reply_to = Some(comment_id);
    }

    pub fn start_edit(&mut self, comment_id: Uuid) {
        let draft = self
            .state
            .comments
            .iter()
            .find(|c| c.id == comment_id)
            .map(|c| c.comment.clone())
            .unwrap_or_default();
        self.state.editing = Some(Editing { comment_id, draft });
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let Some(editing) = self.state.editing.as_mut() {
            editing.draft = text.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.state.editing = None;
    }

    pub async fn load_comments(&mut self) {
        self.state.loading = true;
        self.state.error = None;
        match self.api.get_comments(self.post.id).await {
            Ok(comments) => {
                self.state.comments = comments;
                self.state.reply_to = None;
            }
            Err(e) => self.fail(e),
        }
        self.state.loading = false;
    }

    pub async fn like_post(&mut self) {
        if self.like(Like::Post(self.post.id)).await {
            // the server toggled; mirror it on the card even if the refetch failed
            let viewer = self.viewer.id;
            if let Some(pos) = self.post.likes.iter().position(|id| *id == viewer) {
                self.post.likes.remove(pos);
            } else {
                self.post.likes.push(viewer);
            }
        }
    }

    pub async fn like_comment(&mut self, comment_id: Uuid, reply_id: Option<Uuid>) {
        let target = match reply_id {
            Some(reply_id) => Like::Reply { comment_id, reply_id },
            None => Like::Comment(comment_id),
        };
        self.like(target).await;
    }

    /// Returns whether the server accepted the like.
    async fn like(&mut self, target: Like) -> bool {
        self.state.error = None;
        match self.api.like(target).await {
            Ok(()) => {
                self.load_comments().await;
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    pub async fn add_comment(&mut self, text: &str) {
        self.state.error = None;
        if text.trim().is_empty() {
            self.state.error = Some(EMPTY_COMMENT.to_string());
            return;
        }

        match self.api.comment(self.post.id, text).await {
            Ok(_) => self.load_comments().await,
            Err(e) => self.fail(e),
        }
    }

    /// Replies address the author of the comment they answer.
    pub async fn add_reply(&mut self, comment_id: Uuid, text: &str) {
        self.state.error = None;
        if text.trim().is_empty() {
            self.state.error = Some(EMPTY_COMMENT.to_string());
            return;
        }

        let reply_at =
            self.state.comments.iter().find(|c| c.id == comment_id).map(|c| c.from.clone());
        match self.api.reply(comment_id, text, reply_at.as_deref()).await {
            Ok(_) => self.load_comments().await,
            Err(e) => self.fail(e),
        }
    }

    /// Saves the open draft and patches that one comment in place.
    pub async fn save_edit(&mut self) {
        self.state.error = None;
        let Some(Editing { comment_id, draft }) = self.state.editing.clone() else {
            return;
        };
        if draft.trim().is_empty() {
            self.state.error = Some(EMPTY_COMMENT.to_string());
            return;
        }

        match self.api.edit_comment(comment_id, &draft).await {
            Ok(()) => {
                if let Some(comment) = self.state.comments.iter_mut().find(|c| c.id == comment_id) {
                    comment.comment = draft;
                }
                self.state.editing = None;
            }
            Err(e) => self.fail(e),
        }
    }

    pub async fn delete_comment(&mut self, comment_id: Uuid) {
        self.state.error = None;
        match self.api.delete_comment(comment_id).await {
            Ok(()) => self.state.comments.retain(|c| c.id != comment_id),
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, err: ClientError) {
        log::error!("Post {}: {}", self.post.id, err);
        self.state.error = Some(err.to_string());
    }
}
