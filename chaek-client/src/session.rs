use crate::{
    api::{
        AuthToken, Comment, CommentId, CommentPatch, Error, LikeStatus, NewComment, NewPost,
        NewSession, Post, PostId, PostUpdate, UserId,
    },
    Server,
};

/// An authenticated session, passed explicitly to whoever needs it: login
/// builds it, logout consumes it. There is no ambient current-user state
/// anywhere in this crate.
///
/// Mutating helpers validate their input before the round trip, so malformed
/// drafts are rejected without touching the network.
#[derive(Debug)]
pub struct Session<S> {
    server: S,
    token: AuthToken,
    user: UserId,
}

impl<S: Server + Send> Session<S> {
    pub async fn login(mut server: S, session: NewSession) -> Result<Session<S>, Error> {
        session.validate()?;
        let token = server.auth(session).await?;
        let user = server.whoami(&token).await?;
        Ok(Session {
            server,
            token,
            user,
        })
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn token(&self) -> AuthToken {
        self.token
    }

    /// Access to the underlying server, for unauthenticated reads.
    pub fn server(&mut self) -> &mut S {
        &mut self.server
    }

    pub async fn create_post(&mut self, post: NewPost) -> Result<Post, Error> {
        post.validate()?;
        self.server.create_post(&self.token, post).await
    }

    pub async fn update_post(&mut self, post: PostId, update: PostUpdate) -> Result<Post, Error> {
        update.validate()?;
        self.server.update_post(&self.token, post, update).await
    }

    pub async fn delete_post(&mut self, post: PostId) -> Result<(), Error> {
        self.server.delete_post(&self.token, post).await
    }

    pub async fn create_comment(
        &mut self,
        post: PostId,
        comment: NewComment,
    ) -> Result<Comment, Error> {
        comment.validate()?;
        self.server.create_comment(&self.token, post, comment).await
    }

    pub async fn update_comment(
        &mut self,
        comment: CommentId,
        patch: CommentPatch,
    ) -> Result<Comment, Error> {
        patch.validate()?;
        self.server.update_comment(&self.token, comment, patch).await
    }

    pub async fn delete_comment(&mut self, comment: CommentId) -> Result<(), Error> {
        self.server.delete_comment(&self.token, comment).await
    }

    pub async fn like_post(&mut self, post: PostId) -> Result<LikeStatus, Error> {
        self.server.like_post(&self.token, post).await
    }

    pub async fn unlike_post(&mut self, post: PostId) -> Result<LikeStatus, Error> {
        self.server.unlike_post(&self.token, post).await
    }

    pub async fn upload_image(
        &mut self,
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    ) -> Result<String, Error> {
        self.server
            .upload_image(&self.token, filename, content_type, bytes)
            .await
    }

    /// Tears the session down server-side and consumes it. The returned
    /// server can be used to log in again.
    pub async fn logout(mut self) -> Result<S, Error> {
        self.server.unauth(&self.token).await?;
        Ok(self.server)
    }
}
