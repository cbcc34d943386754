use std::{collections::HashMap, sync::Arc};

use crate::{
    api::{Comment, LikeStatus, Post, PostId, User, UserId},
    thread, CommentThread,
};

/// Client-side snapshot of everything fetched so far. It is rebuilt from
/// server responses, never mutated incrementally beyond the optimistic like
/// transition below: edits, deletes and new comments all go through a
/// refetch of the affected post.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedState {
    pub me: UserId,
    pub users: HashMap<UserId, User>,
    pub posts: HashMap<PostId, Arc<Post>>,
    pub threads: HashMap<PostId, Vec<CommentThread>>,
}

/// Pre-transition like state, captured by [`FeedState::apply_like`] and
/// restored wholesale by [`FeedState::rollback_like`] when the request fails.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LikeRollback {
    post_id: PostId,
    like_count: i64,
    liked: bool,
}

impl FeedState {
    pub fn new(me: UserId) -> FeedState {
        FeedState {
            me,
            users: HashMap::new(),
            posts: HashMap::new(),
            threads: HashMap::new(),
        }
    }

    pub fn stub() -> FeedState {
        FeedState::new(UserId::stub())
    }

    pub fn add_users(&mut self, users: Vec<User>) {
        self.users.extend(users.into_iter().map(|u| (u.id, u)));
    }

    pub fn add_posts(&mut self, posts: Vec<Post>) {
        self.posts
            .extend(posts.into_iter().map(|p| (p.id, Arc::new(p))));
    }

    pub fn upsert_post(&mut self, post: Post) {
        self.posts.insert(post.id, Arc::new(post));
    }

    pub fn remove_post(&mut self, post: PostId) {
        self.posts.remove(&post);
        self.threads.remove(&post);
    }

    pub fn post(&self, id: &PostId) -> Option<&Arc<Post>> {
        self.posts.get(id)
    }

    /// All cached posts, newest first.
    pub fn recent_posts(&self) -> Vec<Arc<Post>> {
        let mut posts = self.posts.values().cloned().collect::<Vec<_>>();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts
    }

    /// Replaces the comment tree of `post` with a fresh organization of the
    /// flat list just fetched.
    pub fn set_comments(&mut self, post: PostId, comments: Vec<Comment>) {
        self.threads.insert(post, thread::organize(comments));
    }

    pub fn comments(&self, post: &PostId) -> &[CommentThread] {
        self.threads.get(post).map(|t| t.as_slice()).unwrap_or(&[])
    }

    pub fn comment_count(&self, post: &PostId) -> usize {
        thread::thread_count(self.comments(post))
    }

    /// Applies a like/unlike locally before the request is sent, returning
    /// the snapshot to restore if the server rejects it. Returns None when
    /// the post is not cached or already in the requested state, in which
    /// case nothing changed and there is nothing to roll back.
    pub fn apply_like(&mut self, post_id: PostId, liked: bool) -> Option<LikeRollback> {
        let post = match self.posts.get_mut(&post_id) {
            Some(p) => p,
            None => {
                tracing::warn!(?post_id, "like applied to a post missing from the feed");
                return None;
            }
        };
        if post.liked_by_me == liked {
            return None;
        }
        let rollback = LikeRollback {
            post_id,
            like_count: post.like_count,
            liked: post.liked_by_me,
        };
        let post = Arc::make_mut(post);
        post.liked_by_me = liked;
        post.like_count += if liked { 1 } else { -1 };
        Some(rollback)
    }

    /// Reconciles with the server's authoritative counts after a successful
    /// like/unlike round trip.
    pub fn commit_like(&mut self, post_id: PostId, status: LikeStatus) {
        if let Some(post) = self.posts.get_mut(&post_id) {
            let post = Arc::make_mut(post);
            post.like_count = status.like_count;
            post.liked_by_me = status.liked;
        }
    }

    /// Restores the pre-transition state captured by [`Self::apply_like`].
    pub fn rollback_like(&mut self, rollback: LikeRollback) {
        if let Some(post) = self.posts.get_mut(&rollback.post_id) {
            let post = Arc::make_mut(post);
            post.like_count = rollback.like_count;
            post.liked_by_me = rollback.liked;
        }
    }
}
