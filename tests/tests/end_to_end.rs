//! Full client flows against the in-memory backend: provisioning, login,
//! posting, commenting, likes with optimistic feed reconciliation, and the
//! permission checks in between.

use chaek_api::{
    AuthToken, Book, Error, NewComment, NewPost, NewSession, NewUser, PostUpdate, UserId, Uuid,
};
use chaek_client::{FeedState, Server, Session};
use chaek_mock_server::MockServer;

fn book() -> Book {
    Book {
        isbn: "9788936434120".into(),
        title: "채식주의자".into(),
        author: "한강".into(),
        publisher: "창비".into(),
        cover_image: "https://covers.example/vegetarian.jpg".into(),
        published_on: None,
        description: None,
    }
}

async fn server_with_users(names: &[&str]) -> (MockServer, AuthToken) {
    let admin = AuthToken(Uuid::new_v4());
    let mut server = MockServer::new(admin);
    for name in names {
        server
            .create_user(
                &admin,
                NewUser::new(
                    UserId(Uuid::new_v4()),
                    (*name).into(),
                    format!("{name}-pass"),
                ),
            )
            .await
            .unwrap();
    }
    (server, admin)
}

async fn login(server: MockServer, name: &str) -> Session<MockServer> {
    Session::login(
        server,
        NewSession::new(name.into(), format!("{name}-pass"), "tests".into()),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn provisioning_and_session_lifecycle() {
    let (server, _) = server_with_users(&["alice"]).await;
    assert_eq!(server.test_num_users(), 1);

    let mut session = login(server, "alice").await;
    let token = session.token();
    let me = session.user();
    assert_eq!(session.server().whoami(&token).await.unwrap(), me);

    // the token dies with the session
    let mut server = session.logout().await.unwrap();
    assert_eq!(server.whoami(&token).await, Err(Error::PermissionDenied));

    // wrong password, then a fresh login on the returned server
    assert!(matches!(
        Session::login(
            server,
            NewSession::new("alice".into(), "nope".into(), "tests".into()),
        )
        .await,
        Err(Error::PermissionDenied)
    ));
}

#[tokio::test]
async fn non_admin_cannot_provision_users() {
    let (mut server, _) = server_with_users(&["alice"]).await;
    let res = server
        .create_user(
            &AuthToken(Uuid::new_v4()),
            NewUser::new(UserId(Uuid::new_v4()), "mallory".into(), "pass".into()),
        )
        .await;
    assert_eq!(res, Err(Error::PermissionDenied));
    assert_eq!(server.test_num_users(), 1);
}

#[tokio::test]
async fn posting_extracts_capped_hashtags() {
    let (server, _) = server_with_users(&["alice"]).await;
    let mut session = login(server, "alice").await;

    let content = format!(
        "열두 개의 태그 {}",
        (0..12).map(|i| format!("#태그{i} ")).collect::<String>()
    );
    let post = session
        .create_post(NewPost::from_content(book(), 5, content, vec![]))
        .await
        .unwrap();
    assert_eq!(post.hashtags.len(), 10);
    assert_eq!(post.hashtags[0], "태그0");
    assert_eq!(post.author_id, session.user());

    let page = session.server().list_posts(1, 20).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.posts[0].id, post.id);
}

#[tokio::test]
async fn invalid_drafts_never_reach_the_server() {
    let (server, _) = server_with_users(&["alice"]).await;
    let mut session = login(server, "alice").await;

    let res = session
        .create_post(NewPost::from_content(book(), 0, "별로".into(), vec![]))
        .await;
    assert_eq!(res, Err(Error::InvalidRating(0)));

    let res = session
        .create_post(NewPost::from_content(book(), 3, "책".repeat(2001), vec![]))
        .await;
    assert_eq!(res, Err(Error::ContentTooLong(2001)));

    assert_eq!(session.server().list_posts(1, 20).await.unwrap().total, 0);
}

#[tokio::test]
async fn editing_is_owner_only() {
    let (server, _) = server_with_users(&["alice", "bob"]).await;
    let mut alice = login(server, "alice").await;
    let post = alice
        .create_post(NewPost::from_content(book(), 4, "좋다 #한강".into(), vec![]))
        .await
        .unwrap();
    let server = alice.logout().await.unwrap();

    let mut bob = login(server, "bob").await;
    let update = PostUpdate {
        content: Some("내 거임".into()),
        ..Default::default()
    };
    assert_eq!(
        bob.update_post(post.id, update).await,
        Err(Error::PermissionDenied)
    );
    assert_eq!(bob.delete_post(post.id).await, Err(Error::PermissionDenied));
    let server = bob.logout().await.unwrap();

    let mut alice = login(server, "alice").await;
    let updated = alice
        .update_post(
            post.id,
            PostUpdate {
                rating: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.rating, 2);
    assert_eq!(updated.content, post.content);
}

#[tokio::test]
async fn comment_threads_come_back_organized() {
    let (server, _) = server_with_users(&["alice", "bob"]).await;
    let mut alice = login(server, "alice").await;
    let post = alice
        .create_post(NewPost::from_content(book(), 5, "명작".into(), vec![]))
        .await
        .unwrap();

    let c1 = alice
        .create_comment(post.id, NewComment::new("first".into(), None))
        .await
        .unwrap();
    let c2 = alice
        .create_comment(post.id, NewComment::new("second".into(), None))
        .await
        .unwrap();
    let server = alice.logout().await.unwrap();

    let mut bob = login(server, "bob").await;
    let r1 = bob
        .create_comment(post.id, NewComment::new("reply to first".into(), Some(c1.id)))
        .await
        .unwrap();
    assert!(r1.is_reply());

    // only one nesting level: replying to a reply is rejected
    assert_eq!(
        bob.create_comment(post.id, NewComment::new("too deep".into(), Some(r1.id)))
            .await,
        Err(Error::NotFound(r1.id.0))
    );

    let flat = bob.server().list_comments(post.id).await.unwrap();
    let mut feed = FeedState::new(bob.user());
    feed.upsert_post(post.clone());
    feed.set_comments(post.id, flat);

    let threads = feed.comments(&post.id);
    assert_eq!(threads.len(), 2);
    assert_eq!(threads[0].comment.id, c1.id);
    assert_eq!(threads[0].replies.len(), 1);
    assert_eq!(threads[0].replies[0].id, r1.id);
    assert_eq!(threads[1].comment.id, c2.id);
    assert!(threads[1].replies.is_empty());
    assert_eq!(feed.comment_count(&post.id), 3);
}

#[tokio::test]
async fn deleting_a_comment_takes_its_replies() {
    let (server, _) = server_with_users(&["alice"]).await;
    let mut alice = login(server, "alice").await;
    let post = alice
        .create_post(NewPost::from_content(book(), 3, "그럭저럭".into(), vec![]))
        .await
        .unwrap();
    let parent = alice
        .create_comment(post.id, NewComment::new("parent".into(), None))
        .await
        .unwrap();
    alice
        .create_comment(post.id, NewComment::new("reply".into(), Some(parent.id)))
        .await
        .unwrap();

    alice.delete_comment(parent.id).await.unwrap();
    assert!(alice.server().list_comments(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn like_round_trip_reconciles_the_feed() {
    let (server, _) = server_with_users(&["alice", "bob"]).await;
    let mut alice = login(server, "alice").await;
    let post = alice
        .create_post(NewPost::from_content(book(), 5, "최고 #인생책".into(), vec![]))
        .await
        .unwrap();
    let server = alice.logout().await.unwrap();

    let mut bob = login(server, "bob").await;
    let mut feed = FeedState::new(bob.user());
    feed.upsert_post(post.clone());

    assert!(feed.apply_like(post.id, true).is_some());
    assert_eq!(feed.post(&post.id).unwrap().like_count, 1);

    let status = bob.like_post(post.id).await.unwrap();
    assert_eq!(status.like_count, 1);
    assert!(status.liked);
    feed.commit_like(post.id, status);
    assert_eq!(feed.post(&post.id).unwrap().like_count, 1);
    assert!(feed.post(&post.id).unwrap().liked_by_me);

    // liking twice is idempotent server-side
    assert_eq!(bob.like_post(post.id).await.unwrap().like_count, 1);

    assert!(feed.apply_like(post.id, false).is_some());
    let status = bob.unlike_post(post.id).await.unwrap();
    assert_eq!(status.like_count, 0);
    assert!(!status.liked);
    feed.commit_like(post.id, status);
    assert!(!feed.post(&post.id).unwrap().liked_by_me);
}

#[tokio::test]
async fn failed_like_rolls_the_feed_back() {
    let (server, _) = server_with_users(&["alice", "bob"]).await;
    let mut alice = login(server, "alice").await;
    let post = alice
        .create_post(NewPost::from_content(book(), 4, "좋음".into(), vec![]))
        .await
        .unwrap();
    let post_id = post.id;
    alice.delete_post(post_id).await.unwrap();
    let server = alice.logout().await.unwrap();

    // bob's feed still shows the post he fetched before the delete
    let mut bob = login(server, "bob").await;
    let mut feed = FeedState::new(bob.user());
    feed.upsert_post(post);

    let rollback = feed.apply_like(post_id, true).unwrap();
    assert!(feed.post(&post_id).unwrap().liked_by_me);

    assert_eq!(bob.like_post(post_id).await, Err(Error::NotFound(post_id.0)));
    feed.rollback_like(rollback);
    assert!(!feed.post(&post_id).unwrap().liked_by_me);
    assert_eq!(feed.post(&post_id).unwrap().like_count, 0);
}

#[tokio::test]
async fn anonymous_reads_never_see_liked_by_me() {
    let (server, _) = server_with_users(&["alice"]).await;
    let mut alice = login(server, "alice").await;
    let post = alice
        .create_post(NewPost::from_content(book(), 5, "공개 피드".into(), vec![]))
        .await
        .unwrap();
    alice.like_post(post.id).await.unwrap();
    let mut server = alice.logout().await.unwrap();

    let fetched = server.get_post(post.id).await.unwrap();
    assert_eq!(fetched.like_count, 1);
    assert!(!fetched.liked_by_me);
}

#[tokio::test]
async fn image_uploads_are_validated() {
    let (server, _) = server_with_users(&["alice"]).await;
    let mut alice = login(server, "alice").await;

    let url = alice
        .upload_image("cover.png".into(), "image/png".into(), vec![0u8; 1024])
        .await
        .unwrap();
    assert!(url.ends_with("/cover.png"));

    match alice
        .upload_image("notes.pdf".into(), "application/pdf".into(), vec![0u8; 10])
        .await
    {
        Err(Error::InvalidImage(why)) => assert!(why.starts_with("application/pdf")),
        other => panic!("expected a rejected upload, got {other:?}"),
    }
    assert!(matches!(
        alice
            .upload_image(
                "huge.png".into(),
                "image/png".into(),
                vec![0u8; 5 * 1024 * 1024 + 1],
            )
            .await,
        Err(Error::InvalidImage(_))
    ));
}

#[tokio::test]
async fn catalog_search_filters_and_paginates() {
    let (mut server, _) = server_with_users(&[]).await;
    let mut books = Vec::new();
    for i in 0..5 {
        books.push(Book {
            isbn: format!("97889364341{i:02}"),
            title: format!("소년이 온다 {i}"),
            author: "한강".into(),
            publisher: "창비".into(),
            cover_image: "https://covers.example/boy.jpg".into(),
            published_on: None,
            description: None,
        });
    }
    server.seed_catalog(books);

    let page = server
        .search_books(&chaek_api::BookSearch {
            query: "한강".into(),
            field: chaek_api::SearchField::Author,
            page: 2,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.books.len(), 2);

    let none = server
        .search_books(&chaek_api::BookSearch::titled("없는 책"))
        .await
        .unwrap();
    assert_eq!(none.total, 0);
}
