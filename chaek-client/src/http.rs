use async_trait::async_trait;

use crate::{
    api::{
        AuthToken, BookSearch, BookSearchPage, Comment, CommentId, CommentPatch, Error, LikeStatus,
        NewComment, NewPost, NewSession, NewUser, Post, PostId, PostPage, PostUpdate, UserId,
    },
    Server,
};

/// [`Server`] implementation over the REST backend. Holds no session state;
/// tokens are passed per call by [`crate::Session`].
#[derive(Clone, Debug)]
pub struct ApiClient {
    host: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// `host` is the backend origin, e.g. `https://chaek.example`.
    pub fn new(host: String) -> ApiClient {
        ApiClient {
            host,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.host, path)
    }
}

fn transport(e: reqwest::Error) -> Error {
    Error::Unknown(format!("transport error: {e}"))
}

/// Decodes a response body, turning non-2xx statuses back into the typed
/// [`Error`] the backend encoded them as.
async fn expect_json<R>(resp: reqwest::Response) -> Result<R, Error>
where
    R: for<'de> serde::Deserialize<'de>,
{
    let status = resp.status();
    if status.is_success() {
        resp.json()
            .await
            .map_err(|e| Error::Unknown(format!("parsing server response: {e}")))
    } else {
        let body = resp.bytes().await.map_err(transport)?;
        Err(Error::parse(&body).unwrap_or_else(|_| {
            Error::Unknown(format!("server replied {status} with an unreadable error body"))
        }))
    }
}

async fn expect_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        let body = resp.bytes().await.map_err(transport)?;
        Err(Error::parse(&body).unwrap_or_else(|_| {
            Error::Unknown(format!("server replied {status} with an unreadable error body"))
        }))
    }
}

#[derive(serde::Deserialize)]
struct UploadResponse {
    url: String,
}

#[async_trait]
impl Server for ApiClient {
    async fn create_user(&mut self, admin: &AuthToken, user: NewUser) -> Result<(), Error> {
        let resp = self
            .http
            .post(self.url("admin/create-user"))
            .bearer_auth(admin.0)
            .json(&user)
            .send()
            .await
            .map_err(transport)?;
        expect_empty(resp).await
    }

    async fn auth(&mut self, session: NewSession) -> Result<AuthToken, Error> {
        let resp = self
            .http
            .post(self.url("auth"))
            .json(&session)
            .send()
            .await
            .map_err(transport)?;
        expect_json(resp).await
    }

    async fn unauth(&mut self, token: &AuthToken) -> Result<(), Error> {
        let resp = self
            .http
            .post(self.url("unauth"))
            .bearer_auth(token.0)
            .send()
            .await
            .map_err(transport)?;
        expect_empty(resp).await
    }

    async fn whoami(&mut self, token: &AuthToken) -> Result<UserId, Error> {
        let resp = self
            .http
            .get(self.url("whoami"))
            .bearer_auth(token.0)
            .send()
            .await
            .map_err(transport)?;
        expect_json(resp).await
    }

    async fn search_books(&mut self, search: &BookSearch) -> Result<BookSearchPage, Error> {
        let resp = self
            .http
            .get(self.url("books/search"))
            .query(&[
                ("q", search.query.as_str()),
                ("type", search.field.as_str()),
            ])
            .query(&[("page", search.page), ("limit", search.limit)])
            .send()
            .await
            .map_err(transport)?;
        expect_json(resp).await
    }

    async fn list_posts(&mut self, page: u32, limit: u32) -> Result<PostPage, Error> {
        let resp = self
            .http
            .get(self.url("posts"))
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await
            .map_err(transport)?;
        expect_json(resp).await
    }

    async fn get_post(&mut self, post: PostId) -> Result<Post, Error> {
        let resp = self
            .http
            .get(self.url(&format!("posts/{}", post.0)))
            .send()
            .await
            .map_err(transport)?;
        expect_json(resp).await
    }

    async fn create_post(&mut self, token: &AuthToken, post: NewPost) -> Result<Post, Error> {
        let resp = self
            .http
            .post(self.url("posts"))
            .bearer_auth(token.0)
            .json(&post)
            .send()
            .await
            .map_err(transport)?;
        expect_json(resp).await
    }

    async fn update_post(
        &mut self,
        token: &AuthToken,
        post: PostId,
        update: PostUpdate,
    ) -> Result<Post, Error> {
        let resp = self
            .http
            .patch(self.url(&format!("posts/{}", post.0)))
            .bearer_auth(token.0)
            .json(&update)
            .send()
            .await
            .map_err(transport)?;
        expect_json(resp).await
    }

    async fn delete_post(&mut self, token: &AuthToken, post: PostId) -> Result<(), Error> {
        let resp = self
            .http
            .delete(self.url(&format!("posts/{}", post.0)))
            .bearer_auth(token.0)
            .send()
            .await
            .map_err(transport)?;
        expect_empty(resp).await
    }

    async fn list_comments(&mut self, post: PostId) -> Result<Vec<Comment>, Error> {
        let resp = self
            .http
            .get(self.url(&format!("posts/{}/comments", post.0)))
            .send()
            .await
            .map_err(transport)?;
        expect_json(resp).await
    }

    async fn create_comment(
        &mut self,
        token: &AuthToken,
        post: PostId,
        comment: NewComment,
    ) -> Result<Comment, Error> {
        let resp = self
            .http
            .post(self.url(&format!("posts/{}/comments", post.0)))
            .bearer_auth(token.0)
            .json(&comment)
            .send()
            .await
            .map_err(transport)?;
        expect_json(resp).await
    }

    async fn update_comment(
        &mut self,
        token: &AuthToken,
        comment: CommentId,
        patch: CommentPatch,
    ) -> Result<Comment, Error> {
        let resp = self
            .http
            .patch(self.url(&format!("comments/{}", comment.0)))
            .bearer_auth(token.0)
            .json(&patch)
            .send()
            .await
            .map_err(transport)?;
        expect_json(resp).await
    }

    async fn delete_comment(
        &mut self,
        token: &AuthToken,
        comment: CommentId,
    ) -> Result<(), Error> {
        let resp = self
            .http
            .delete(self.url(&format!("comments/{}", comment.0)))
            .bearer_auth(token.0)
            .send()
            .await
            .map_err(transport)?;
        expect_empty(resp).await
    }

    async fn like_post(&mut self, token: &AuthToken, post: PostId) -> Result<LikeStatus, Error> {
        let resp = self
            .http
            .post(self.url(&format!("posts/{}/like", post.0)))
            .bearer_auth(token.0)
            .send()
            .await
            .map_err(transport)?;
        expect_json(resp).await
    }

    async fn unlike_post(&mut self, token: &AuthToken, post: PostId) -> Result<LikeStatus, Error> {
        let resp = self
            .http
            .delete(self.url(&format!("posts/{}/like", post.0)))
            .bearer_auth(token.0)
            .send()
            .await
            .map_err(transport)?;
        expect_json(resp).await
    }

    async fn upload_image(
        &mut self,
        token: &AuthToken,
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    ) -> Result<String, Error> {
        crate::api::validate_image_upload(&content_type, bytes.len())?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str(&content_type)
            .map_err(|e| Error::InvalidImage(format!("bad content type: {e}")))?;
        let form = reqwest::multipart::Form::new().part("image", part);
        let resp = self
            .http
            .post(self.url("upload/image"))
            .bearer_auth(token.0)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let upload: UploadResponse = expect_json(resp).await?;
        Ok(upload.url)
    }
}
