mod feed;
pub use feed::{FeedState, LikeRollback};

mod http;
pub use http::ApiClient;

mod server;
pub use server::Server;

mod session;
pub use session::Session;

mod thread;
pub use thread::{organize, thread_count, CommentThread};

pub mod api {
    pub use chaek_api::*;
}
