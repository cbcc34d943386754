//! Emits a JSON fixture of users, posts and comments, for seeding a dev
//! backend or exercising the client by hand.

use chaek_api::{Book, Comment, CommentId, Post, PostId, Time, User, UserId, Uuid};
use chrono::{Duration, TimeZone, Utc};
use rand::{seq::SliceRandom, Rng};

const NUM_USERS: usize = 4;
const NUM_POSTS: usize = 25;
const NUM_COMMENTS: usize = 120;
const CONTENT_WORDS: usize = 40;

const TAG_POOL: &[&str] = &[
    "소설",
    "에세이",
    "독서기록",
    "스릴러",
    "classic",
    "scifi",
    "re_read",
    "추천",
];

fn time_in_2024(rng: &mut impl Rng) -> Time {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(rng.gen_range(0..525_600))
}

fn gen_content(rng: &mut impl Rng) -> String {
    let mut content = lipsum::lipsum_words(CONTENT_WORDS);
    for _ in 0..rng.gen_range(0..4usize) {
        content.push_str(" #");
        content.push_str(TAG_POOL.choose(rng).unwrap());
    }
    content
}

fn main() {
    let mut rng = rand::thread_rng();

    let users = (0..NUM_USERS)
        .map(|i| User {
            id: UserId(Uuid::new_v4()),
            display_name: format!("reader{i}"),
            avatar_url: None,
        })
        .collect::<Vec<_>>();

    let book = |rng: &mut rand::rngs::ThreadRng| Book {
        isbn: format!("978{:010}", rng.gen_range(0u64..10_000_000_000)),
        title: lipsum::lipsum_title(),
        author: format!("author {}", rng.gen_range(1..100)),
        publisher: "chaek books".into(),
        cover_image: format!("https://covers.example/{}.jpg", rng.gen_range(1..1000)),
        published_on: None,
        description: Some(lipsum::lipsum_words(12)),
    };

    let posts = (0..NUM_POSTS)
        .map(|_| {
            let content = gen_content(&mut rng);
            let mut hashtags = chaek_api::hashtag::extract(&content);
            hashtags.truncate(chaek_api::MAX_HASHTAGS);
            let created_at = time_in_2024(&mut rng);
            Post {
                id: PostId(Uuid::new_v4()),
                author_id: users.choose(&mut rng).unwrap().id,
                book: book(&mut rng),
                rating: rng.gen_range(1..=5),
                content,
                images: vec![],
                hashtags,
                like_count: rng.gen_range(0..500),
                liked_by_me: false,
                created_at,
                updated_at: created_at,
            }
        })
        .collect::<Vec<_>>();

    let mut comments: Vec<Comment> = Vec::with_capacity(NUM_COMMENTS);
    for _ in 0..NUM_COMMENTS {
        let post = posts.choose(&mut rng).unwrap();
        // a third of the comments reply to an existing top-level comment
        let parent_id = match rng.gen_range(0..3) {
            0 => {
                let tops = comments
                    .iter()
                    .filter(|c| c.post_id == post.id && c.parent_id.is_none())
                    .collect::<Vec<_>>();
                tops.choose(&mut rng).map(|c| c.id)
            }
            _ => None,
        };
        comments.push(Comment {
            id: CommentId(Uuid::new_v4()),
            post_id: post.id,
            author: users.choose(&mut rng).unwrap().clone(),
            content: lipsum::lipsum_words(rng.gen_range(3..20)),
            created_at: time_in_2024(&mut rng),
            edited: false,
            parent_id,
        });
    }

    let fixture = serde_json::json!({
        "users": users,
        "posts": posts,
        "comments": comments,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&fixture).expect("serializing fixture")
    );
}
