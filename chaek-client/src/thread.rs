use std::collections::HashMap;

use crate::api::{Comment, CommentId};

/// A top-level comment with its replies attached, oldest first.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommentThread {
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

/// Groups a flat comment list into threads: one pass to partition top-level
/// comments from replies, then replies attach to their parent thread and
/// everything sorts ascending by creation time.
///
/// A reply whose parent is not among the top-level comments is dropped. That
/// covers both replies-to-replies (not modeled, the backend refuses them) and
/// replies racing a parent deletion.
///
/// Pure and total: no input list of well-formed records can make it fail, and
/// every call builds a fresh tree from scratch.
pub fn organize(comments: Vec<Comment>) -> Vec<CommentThread> {
    let mut top_level = Vec::new();
    let mut replies: HashMap<CommentId, Vec<Comment>> = HashMap::new();
    for c in comments {
        match c.parent_id {
            Some(parent) => replies.entry(parent).or_insert_with(Vec::new).push(c),
            None => top_level.push(c),
        }
    }

    top_level.sort_by_key(|c| c.created_at);
    let threads = top_level
        .into_iter()
        .map(|comment| {
            let mut attached = replies.remove(&comment.id).unwrap_or_default();
            attached.sort_by_key(|c| c.created_at);
            CommentThread {
                comment,
                replies: attached,
            }
        })
        .collect();

    for (parent, orphans) in replies {
        for o in orphans {
            tracing::debug!(comment = ?o.id, ?parent, "dropping reply to a missing parent");
        }
    }

    threads
}

/// Total number of comments shown: top-level plus attached replies.
pub fn thread_count(threads: &[CommentThread]) -> usize {
    threads.iter().map(|t| 1 + t.replies.len()).sum()
}
