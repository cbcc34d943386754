use uuid::Uuid;

use crate::{hashtag, Book, Error, Time, UserId, STUB_UUID};

/// Review body length cap, counted in characters.
pub const MAX_CONTENT_CHARS: usize = 2000;
/// At most this many attached images per post.
pub const MAX_IMAGES: usize = 5;
/// At most this many hashtags persist per post.
pub const MAX_HASHTAGS: usize = 10;

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct PostId(pub Uuid);

impl PostId {
    pub fn stub() -> PostId {
        PostId(STUB_UUID)
    }
}

/// A rated review post as served by the backend.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub book: Book,

    /// Star rating, 1 to 5.
    pub rating: u16,
    pub content: String,
    pub images: Vec<String>,
    pub hashtags: Vec<String>,

    pub like_count: i64,
    pub liked_by_me: bool,

    pub created_at: Time,
    pub updated_at: Time,
}

fn validate_rating(rating: u16) -> Result<(), Error> {
    match (1..=5).contains(&rating) {
        true => Ok(()),
        false => Err(Error::InvalidRating(rating)),
    }
}

fn validate_content(content: &str) -> Result<(), Error> {
    crate::validate_string(content)?;
    let chars = content.chars().count();
    if chars > MAX_CONTENT_CHARS {
        return Err(Error::ContentTooLong(chars));
    }
    Ok(())
}

fn validate_images(images: &[String]) -> Result<(), Error> {
    if images.len() > MAX_IMAGES {
        return Err(Error::TooManyImages(images.len()));
    }
    for url in images {
        crate::validate_string(url)?;
    }
    Ok(())
}

fn validate_hashtags(hashtags: &[String]) -> Result<(), Error> {
    if hashtags.len() > MAX_HASHTAGS {
        return Err(Error::TooManyHashtags(hashtags.len()));
    }
    for tag in hashtags {
        if !hashtag::is_valid_tag(tag) {
            return Err(Error::InvalidHashtag(tag.clone()));
        }
    }
    Ok(())
}

/// Sent to create a post. The id is generated client-side so resubmitting a
/// timed-out request cannot create a duplicate.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewPost {
    pub id: PostId,
    pub book: Book,
    pub rating: u16,
    pub content: String,
    pub images: Vec<String>,
    pub hashtags: Vec<String>,
}

impl NewPost {
    /// Builds a post draft, extracting its hashtags from `content`. The
    /// extractor itself applies no cap, so the first [`MAX_HASHTAGS`] tags in
    /// extraction order are kept here.
    pub fn from_content(book: Book, rating: u16, content: String, images: Vec<String>) -> NewPost {
        let mut hashtags = hashtag::extract(&content);
        hashtags.truncate(MAX_HASHTAGS);
        NewPost {
            id: PostId(Uuid::new_v4()),
            book,
            rating,
            content,
            images,
            hashtags,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.book.validate()?;
        validate_rating(self.rating)?;
        validate_content(&self.content)?;
        validate_images(&self.images)?;
        validate_hashtags(&self.hashtags)
    }
}

/// Partial update; absent fields are left untouched by the backend.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PostUpdate {
    pub rating: Option<u16>,
    pub content: Option<String>,
    pub images: Option<Vec<String>>,
    pub hashtags: Option<Vec<String>>,
}

impl PostUpdate {
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        if let Some(content) = &self.content {
            validate_content(content)?;
        }
        if let Some(images) = &self.images {
            validate_images(images)?;
        }
        if let Some(hashtags) = &self.hashtags {
            validate_hashtags(hashtags)?;
        }
        Ok(())
    }
}

/// Like/unlike response; the authoritative count the client reconciles with.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LikeStatus {
    pub like_count: i64,
    pub liked: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: u64,
}
