use uuid::Uuid;

use crate::{Error, PostId, Time, User, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(STUB_UUID)
    }
}

/// One comment record as served by the backend, flat: nesting is expressed
/// through `parent_id` only. A comment with a parent is a reply; the model
/// supports a single nesting level, so a valid parent is always top-level.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author: User,
    pub content: String,
    pub created_at: Time,
    pub edited: bool,
    pub parent_id: Option<CommentId>,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Sent to create a comment (or, with `parent_id`, a reply). Like posts, the
/// id is generated client-side.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub id: CommentId,
    pub content: String,
    pub parent_id: Option<CommentId>,
}

impl NewComment {
    pub fn new(content: String, parent_id: Option<CommentId>) -> NewComment {
        NewComment {
            id: CommentId(Uuid::new_v4()),
            content,
            parent_id,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.content)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentPatch {
    pub content: String,
}

impl CommentPatch {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.content)
    }
}
