use chrono::Utc;

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

mod auth;
pub use auth::{AuthToken, NewSession};

mod book;
pub use book::{Book, BookSearch, BookSearchPage, SearchField};

mod comment;
pub use comment::{Comment, CommentId, CommentPatch, NewComment};

mod error;
pub use error::Error;

pub mod hashtag;
pub use hashtag::Segment;

mod post;
pub use post::{
    LikeStatus, NewPost, Post, PostId, PostPage, PostUpdate, MAX_CONTENT_CHARS, MAX_HASHTAGS,
    MAX_IMAGES,
};

mod upload;
pub use upload::{validate_image_upload, MAX_IMAGE_BYTES};

mod user;
pub use user::{NewUser, User, UserId};

/// Strings that cross the wire must not embed NUL bytes, as the backend
/// stores them in text columns that cannot represent them.
pub fn validate_string(s: &str) -> Result<(), Error> {
    match s.contains('\0') {
        true => Err(Error::NullByteInString(s.to_string())),
        false => Ok(()),
    }
}
