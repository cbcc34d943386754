//! In-memory stand-in for the REST backend, for tests. It enforces the same
//! validation and ownership rules the real backend would, so client flows can
//! be exercised end to end without a network.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chaek_client::{
    api::{
        AuthToken, Book, BookSearch, BookSearchPage, Comment, CommentId, CommentPatch, Error,
        LikeStatus, NewComment, NewPost, NewSession, NewUser, Post, PostId, PostPage, PostUpdate,
        SearchField, User, UserId, Uuid,
    },
    Server,
};
use chrono::Utc;

#[derive(Debug)]
struct MockUser {
    user: User,
    pass_hash: String,
    sessions: HashMap<AuthToken, Device>,
}

#[derive(Debug)]
struct Device(#[allow(dead_code)] String);

pub struct MockServer {
    admin_token: AuthToken,
    users: BTreeMap<UserId, MockUser>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    likes: HashMap<PostId, HashSet<UserId>>,
    catalog: Vec<Book>,
}

impl MockServer {
    pub fn new(admin_token: AuthToken) -> MockServer {
        MockServer {
            admin_token,
            users: BTreeMap::new(),
            posts: BTreeMap::new(),
            comments: BTreeMap::new(),
            likes: HashMap::new(),
            catalog: Vec::new(),
        }
    }

    /// Seeds the book catalog served by `search_books`.
    pub fn seed_catalog(&mut self, books: Vec<Book>) {
        self.catalog.extend(books);
    }

    /// Return name & password for user number `id`
    pub fn test_get_user_info(&self, id: usize) -> (&str, &str) {
        let u = self
            .users
            .values()
            .nth(id)
            .unwrap_or_else(|| panic!("getting user {id} among {}", self.users.len()));
        (&u.user.display_name, &u.pass_hash)
    }

    /// Return the current number of users
    pub fn test_num_users(&self) -> usize {
        self.users.len()
    }

    fn resolve(&self, token: &AuthToken) -> Result<UserId, Error> {
        for u in self.users.values() {
            if u.sessions.contains_key(token) {
                return Ok(u.user.id);
            }
        }
        tracing::warn!(?token, "rejecting request with unknown token");
        Err(Error::PermissionDenied)
    }

    /// The post as a viewer sees it: like counters are derived from the like
    /// set, and `liked_by_me` depends on who is asking. Anonymous reads
    /// always see `liked_by_me: false`.
    fn render_post(&self, post: &Post, viewer: Option<UserId>) -> Post {
        let likes = self.likes.get(&post.id);
        Post {
            like_count: likes.map(|l| l.len() as i64).unwrap_or(0),
            liked_by_me: match (likes, viewer) {
                (Some(likes), Some(viewer)) => likes.contains(&viewer),
                _ => false,
            },
            ..post.clone()
        }
    }

    fn like_status(&self, post: PostId, viewer: UserId) -> LikeStatus {
        let likes = self.likes.get(&post);
        LikeStatus {
            like_count: likes.map(|l| l.len() as i64).unwrap_or(0),
            liked: likes.map(|l| l.contains(&viewer)).unwrap_or(false),
        }
    }
}

#[async_trait]
impl Server for MockServer {
    async fn create_user(&mut self, admin: &AuthToken, user: NewUser) -> Result<(), Error> {
        if *admin != self.admin_token {
            return Err(Error::PermissionDenied);
        }
        user.validate()?;
        if self
            .users
            .values()
            .any(|u| u.user.display_name == user.display_name)
        {
            return Err(Error::NameAlreadyUsed(user.display_name));
        }
        if self.users.contains_key(&user.id) {
            return Err(Error::UuidAlreadyUsed(user.id.0));
        }
        self.users.insert(
            user.id,
            MockUser {
                user: User {
                    id: user.id,
                    display_name: user.display_name,
                    avatar_url: None,
                },
                pass_hash: user.initial_password_hash,
                sessions: HashMap::new(),
            },
        );
        Ok(())
    }

    async fn auth(&mut self, session: NewSession) -> Result<AuthToken, Error> {
        session.validate()?;
        for u in self.users.values_mut() {
            if u.user.display_name == session.user {
                // tests don't go through a real password hash
                if session.password != u.pass_hash {
                    return Err(Error::PermissionDenied);
                }
                let token = AuthToken(Uuid::new_v4());
                u.sessions.insert(token, Device(session.device));
                return Ok(token);
            }
        }
        Err(Error::PermissionDenied)
    }

    async fn unauth(&mut self, token: &AuthToken) -> Result<(), Error> {
        for u in self.users.values_mut() {
            if u.sessions.remove(token).is_some() {
                return Ok(());
            }
        }
        Err(Error::PermissionDenied)
    }

    async fn whoami(&mut self, token: &AuthToken) -> Result<UserId, Error> {
        self.resolve(token)
    }

    async fn search_books(&mut self, search: &BookSearch) -> Result<BookSearchPage, Error> {
        let matches = self
            .catalog
            .iter()
            .filter(|b| match search.field {
                SearchField::Title => b.title.contains(&search.query),
                SearchField::Author => b.author.contains(&search.query),
                SearchField::Isbn => b.isbn == search.query,
            })
            .cloned()
            .collect::<Vec<_>>();
        let total = matches.len() as u64;
        let limit = search.limit.max(1);
        let total_pages = (total as u32 + limit - 1) / limit;
        let skip = (search.page.saturating_sub(1) * limit) as usize;
        Ok(BookSearchPage {
            books: matches
                .into_iter()
                .skip(skip)
                .take(limit as usize)
                .collect(),
            total,
            page: search.page,
            total_pages,
        })
    }

    async fn list_posts(&mut self, page: u32, limit: u32) -> Result<PostPage, Error> {
        let mut posts = self
            .posts
            .values()
            .map(|p| self.render_post(p, None))
            .collect::<Vec<_>>();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let total = posts.len() as u64;
        let skip = (page.saturating_sub(1) * limit) as usize;
        Ok(PostPage {
            posts: posts.into_iter().skip(skip).take(limit as usize).collect(),
            total,
        })
    }

    async fn get_post(&mut self, post: PostId) -> Result<Post, Error> {
        self.posts
            .get(&post)
            .map(|p| self.render_post(p, None))
            .ok_or(Error::NotFound(post.0))
    }

    async fn create_post(&mut self, token: &AuthToken, post: NewPost) -> Result<Post, Error> {
        let author = self.resolve(token)?;
        post.validate()?;
        if self.posts.contains_key(&post.id) {
            return Err(Error::UuidAlreadyUsed(post.id.0));
        }
        let now = Utc::now();
        let stored = Post {
            id: post.id,
            author_id: author,
            book: post.book,
            rating: post.rating,
            content: post.content,
            images: post.images,
            hashtags: post.hashtags,
            like_count: 0,
            liked_by_me: false,
            created_at: now,
            updated_at: now,
        };
        self.posts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_post(
        &mut self,
        token: &AuthToken,
        post: PostId,
        update: PostUpdate,
    ) -> Result<Post, Error> {
        let user = self.resolve(token)?;
        update.validate()?;
        let stored = self.posts.get_mut(&post).ok_or(Error::NotFound(post.0))?;
        if stored.author_id != user {
            return Err(Error::PermissionDenied);
        }
        if let Some(rating) = update.rating {
            stored.rating = rating;
        }
        if let Some(content) = update.content {
            stored.content = content;
        }
        if let Some(images) = update.images {
            stored.images = images;
        }
        if let Some(hashtags) = update.hashtags {
            stored.hashtags = hashtags;
        }
        stored.updated_at = Utc::now();
        let rendered = stored.clone();
        Ok(self.render_post(&rendered, Some(user)))
    }

    async fn delete_post(&mut self, token: &AuthToken, post: PostId) -> Result<(), Error> {
        let user = self.resolve(token)?;
        let stored = self.posts.get(&post).ok_or(Error::NotFound(post.0))?;
        if stored.author_id != user {
            return Err(Error::PermissionDenied);
        }
        self.posts.remove(&post);
        self.likes.remove(&post);
        self.comments.retain(|_, c| c.post_id != post);
        Ok(())
    }

    async fn list_comments(&mut self, post: PostId) -> Result<Vec<Comment>, Error> {
        if !self.posts.contains_key(&post) {
            return Err(Error::NotFound(post.0));
        }
        Ok(self
            .comments
            .values()
            .filter(|c| c.post_id == post)
            .cloned()
            .collect())
    }

    async fn create_comment(
        &mut self,
        token: &AuthToken,
        post: PostId,
        comment: NewComment,
    ) -> Result<Comment, Error> {
        let user = self.resolve(token)?;
        comment.validate()?;
        if !self.posts.contains_key(&post) {
            return Err(Error::NotFound(post.0));
        }
        if self.comments.contains_key(&comment.id) {
            return Err(Error::UuidAlreadyUsed(comment.id.0));
        }
        if let Some(parent) = comment.parent_id {
            // a valid parent is a top-level comment of the same post; one
            // nesting level only
            match self.comments.get(&parent) {
                Some(p) if p.post_id == post && p.parent_id.is_none() => (),
                _ => return Err(Error::NotFound(parent.0)),
            }
        }
        let author = self.users[&user].user.clone();
        let stored = Comment {
            id: comment.id,
            post_id: post,
            author,
            content: comment.content,
            created_at: Utc::now(),
            edited: false,
            parent_id: comment.parent_id,
        };
        self.comments.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_comment(
        &mut self,
        token: &AuthToken,
        comment: CommentId,
        patch: CommentPatch,
    ) -> Result<Comment, Error> {
        let user = self.resolve(token)?;
        patch.validate()?;
        let stored = self
            .comments
            .get_mut(&comment)
            .ok_or(Error::NotFound(comment.0))?;
        if stored.author.id != user {
            return Err(Error::PermissionDenied);
        }
        stored.content = patch.content;
        stored.edited = true;
        Ok(stored.clone())
    }

    async fn delete_comment(
        &mut self,
        token: &AuthToken,
        comment: CommentId,
    ) -> Result<(), Error> {
        let user = self.resolve(token)?;
        let stored = self
            .comments
            .get(&comment)
            .ok_or(Error::NotFound(comment.0))?;
        if stored.author.id != user {
            return Err(Error::PermissionDenied);
        }
        // replies go with their parent
        self.comments
            .retain(|id, c| *id != comment && c.parent_id != Some(comment));
        Ok(())
    }

    async fn like_post(&mut self, token: &AuthToken, post: PostId) -> Result<LikeStatus, Error> {
        let user = self.resolve(token)?;
        if !self.posts.contains_key(&post) {
            return Err(Error::NotFound(post.0));
        }
        self.likes.entry(post).or_default().insert(user);
        Ok(self.like_status(post, user))
    }

    async fn unlike_post(&mut self, token: &AuthToken, post: PostId) -> Result<LikeStatus, Error> {
        let user = self.resolve(token)?;
        if !self.posts.contains_key(&post) {
            return Err(Error::NotFound(post.0));
        }
        if let Some(likes) = self.likes.get_mut(&post) {
            likes.remove(&user);
        }
        Ok(self.like_status(post, user))
    }

    async fn upload_image(
        &mut self,
        token: &AuthToken,
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    ) -> Result<String, Error> {
        self.resolve(token)?;
        chaek_client::api::validate_image_upload(&content_type, bytes.len())?;
        Ok(format!(
            "https://cdn.chaek.example/{}/{filename}",
            Uuid::new_v4()
        ))
    }
}
