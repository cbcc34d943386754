use async_trait::async_trait;

use crate::api::{
    AuthToken, BookSearch, BookSearchPage, Comment, CommentId, CommentPatch, Error, LikeStatus,
    NewComment, NewPost, NewSession, NewUser, Post, PostId, PostPage, PostUpdate, UserId,
};

/// The backend surface as seen by the client. Implemented over HTTP by
/// [`crate::ApiClient`] and in memory by the mock server used in tests.
///
/// Reads are unauthenticated; every mutation takes the caller's token
/// explicitly. Each call is a single round trip: no retries, no backoff, a
/// failed call leaves whatever local state the caller holds untouched.
#[async_trait]
pub trait Server {
    /// Admin-only account provisioning.
    async fn create_user(&mut self, admin: &AuthToken, user: NewUser) -> Result<(), Error>;

    async fn auth(&mut self, session: NewSession) -> Result<AuthToken, Error>;
    async fn unauth(&mut self, token: &AuthToken) -> Result<(), Error>;
    async fn whoami(&mut self, token: &AuthToken) -> Result<UserId, Error>;

    async fn search_books(&mut self, search: &BookSearch) -> Result<BookSearchPage, Error>;

    async fn list_posts(&mut self, page: u32, limit: u32) -> Result<PostPage, Error>;
    async fn get_post(&mut self, post: PostId) -> Result<Post, Error>;
    async fn create_post(&mut self, token: &AuthToken, post: NewPost) -> Result<Post, Error>;
    async fn update_post(
        &mut self,
        token: &AuthToken,
        post: PostId,
        update: PostUpdate,
    ) -> Result<Post, Error>;
    async fn delete_post(&mut self, token: &AuthToken, post: PostId) -> Result<(), Error>;

    async fn list_comments(&mut self, post: PostId) -> Result<Vec<Comment>, Error>;
    async fn create_comment(
        &mut self,
        token: &AuthToken,
        post: PostId,
        comment: NewComment,
    ) -> Result<Comment, Error>;
    async fn update_comment(
        &mut self,
        token: &AuthToken,
        comment: CommentId,
        patch: CommentPatch,
    ) -> Result<Comment, Error>;
    async fn delete_comment(&mut self, token: &AuthToken, comment: CommentId)
        -> Result<(), Error>;

    async fn like_post(&mut self, token: &AuthToken, post: PostId) -> Result<LikeStatus, Error>;
    async fn unlike_post(&mut self, token: &AuthToken, post: PostId) -> Result<LikeStatus, Error>;

    /// Uploads an image and returns its public URL.
    async fn upload_image(
        &mut self,
        token: &AuthToken,
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    ) -> Result<String, Error>;
}
