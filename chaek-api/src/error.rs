use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("No such record {0}")]
    NotFound(Uuid),

    #[error("Uuid already used {0}")]
    UuidAlreadyUsed(Uuid),

    #[error("Name already used {0}")]
    NameAlreadyUsed(String),

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    #[error("Invalid character in name {0:?}")]
    InvalidName(String),

    #[error("Rating {0} is outside 1..=5")]
    InvalidRating(u16),

    #[error("Content is {0} characters, more than the allowed maximum")]
    ContentTooLong(usize),

    #[error("{0} images is more than the allowed maximum")]
    TooManyImages(usize),

    #[error("{0} hashtags is more than the allowed maximum")]
    TooManyHashtags(usize),

    #[error("Malformed hashtag {0:?}")]
    InvalidHashtag(String),

    #[error("Rejected image upload: {0}")]
    InvalidImage(String),
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::UuidAlreadyUsed(_) => StatusCode::CONFLICT,
            Error::NameAlreadyUsed(_) => StatusCode::CONFLICT,
            Error::NullByteInString(_) => StatusCode::BAD_REQUEST,
            Error::InvalidName(_) => StatusCode::BAD_REQUEST,
            Error::InvalidRating(_) => StatusCode::BAD_REQUEST,
            Error::ContentTooLong(_) => StatusCode::BAD_REQUEST,
            Error::TooManyImages(_) => StatusCode::BAD_REQUEST,
            Error::TooManyHashtags(_) => StatusCode::BAD_REQUEST,
            Error::InvalidHashtag(_) => StatusCode::BAD_REQUEST,
            Error::InvalidImage(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::PermissionDenied => json!({
                "message": "permission denied",
                "type": "permission-denied",
            }),
            Error::NotFound(u) => json!({
                "message": "no such record",
                "type": "not-found",
                "uuid": u,
            }),
            Error::UuidAlreadyUsed(u) => json!({
                "message": "uuid conflict",
                "type": "conflict-uuid",
                "uuid": u,
            }),
            Error::NameAlreadyUsed(n) => json!({
                "message": "name already used",
                "type": "conflict-name",
                "name": n,
            }),
            Error::NullByteInString(s) => json!({
                "message": "there was a null byte in argument string",
                "type": "null-byte",
                "string": s,
            }),
            Error::InvalidName(n) => json!({
                "message": "there was an invalid character in a user name",
                "type": "invalid-name",
                "name": n,
            }),
            Error::InvalidRating(r) => json!({
                "message": "rating must be between 1 and 5",
                "type": "invalid-rating",
                "rating": r,
            }),
            Error::ContentTooLong(chars) => json!({
                "message": "content exceeds the character limit",
                "type": "content-too-long",
                "chars": chars,
            }),
            Error::TooManyImages(n) => json!({
                "message": "too many images",
                "type": "too-many-images",
                "count": n,
            }),
            Error::TooManyHashtags(n) => json!({
                "message": "too many hashtags",
                "type": "too-many-hashtags",
                "count": n,
            }),
            Error::InvalidHashtag(t) => json!({
                "message": "hashtag contains characters outside the token grammar",
                "type": "invalid-hashtag",
                "hashtag": t,
            }),
            Error::InvalidImage(why) => json!({
                "message": "image upload rejected",
                "type": "invalid-image",
                "reason": why,
            }),
        })
        .expect("serializing error contents")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        let get_str = |field: &str| -> anyhow::Result<String> {
            Ok(String::from(
                data.get(field)
                    .and_then(|f| f.as_str())
                    .ok_or_else(|| anyhow!("error contents field {field:?} is not a string"))?,
            ))
        };
        let get_uuid = |field: &str| -> anyhow::Result<Uuid> {
            data.get(field)
                .and_then(|u| u.as_str())
                .and_then(|u| Uuid::from_str(u).ok())
                .ok_or_else(|| anyhow!("error contents field {field:?} is not a uuid"))
        };
        let get_count = |field: &str| -> anyhow::Result<usize> {
            data.get(field)
                .and_then(|n| n.as_u64())
                .map(|n| n as usize)
                .ok_or_else(|| anyhow!("error contents field {field:?} is not a count"))
        };
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(
                    data.get("message")
                        .and_then(|msg| msg.as_str())
                        .unwrap_or("")
                        .to_string(),
                ),
                "permission-denied" => Error::PermissionDenied,
                "not-found" => Error::NotFound(get_uuid("uuid")?),
                "conflict-uuid" => Error::UuidAlreadyUsed(get_uuid("uuid")?),
                "conflict-name" => Error::NameAlreadyUsed(get_str("name")?),
                "null-byte" => Error::NullByteInString(get_str("string")?),
                "invalid-name" => Error::InvalidName(get_str("name")?),
                "invalid-rating" => Error::InvalidRating(
                    data.get("rating")
                        .and_then(|r| r.as_u64())
                        .map(|r| r as u16)
                        .ok_or_else(|| anyhow!("invalid-rating error without a rating"))?,
                ),
                "content-too-long" => Error::ContentTooLong(get_count("chars")?),
                "too-many-images" => Error::TooManyImages(get_count("count")?),
                "too-many-hashtags" => Error::TooManyHashtags(get_count("count")?),
                "invalid-hashtag" => Error::InvalidHashtag(get_str("hashtag")?),
                "invalid-image" => Error::InvalidImage(get_str("reason")?),
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}
