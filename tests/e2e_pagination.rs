//! E2E tests for cursor pagination on the post listing endpoint

mod common;

use common::TestServer;

fn post_ids(body: &serde_json::Value) -> Vec<i64> {
    body["posts"]
        .as_array()
        .expect("posts array")
        .iter()
        .map(|p| p["id"].as_i64().expect("post id"))
        .collect()
}

#[tokio::test]
async fn test_default_page_size_is_two() {
    let server = TestServer::new().await;
    let user = server.create_user("Alice", "alice@example.com").await;
    server.seed_posts(&user, 5).await;

    let body: serde_json::Value = server
        .client
        .get(server.url("/posts"))
        .send()
        .await
        .expect("request succeeds")
        .json()
        .await
        .expect("json body");

    assert_eq!(post_ids(&body).len(), 2);
}

#[tokio::test]
async fn test_listing_is_descending_by_id() {
    let server = TestServer::new().await;
    let user = server.create_user("Alice", "alice@example.com").await;
    let ids = server.seed_posts(&user, 5).await;

    let body: serde_json::Value = server
        .client
        .get(server.url("/posts?pageSize=5"))
        .send()
        .await
        .expect("request succeeds")
        .json()
        .await
        .expect("json body");

    let listed = post_ids(&body);
    assert_eq!(listed.len(), 5);
    assert!(listed.windows(2).all(|w| w[0] > w[1]));
    assert_eq!(listed[0], *ids.last().unwrap());
}

#[tokio::test]
async fn test_cursor_walk_returns_disjoint_pages() {
    let server = TestServer::new().await;
    let user = server.create_user("Alice", "alice@example.com").await;
    server.seed_posts(&user, 5).await;

    let first: serde_json::Value = server
        .client
        .get(server.url("/posts?pageSize=2"))
        .send()
        .await
        .expect("request succeeds")
        .json()
        .await
        .expect("json body");
    let first_ids = post_ids(&first);
    assert_eq!(first_ids.len(), 2);

    let cursor = *first_ids.last().unwrap();
    let second: serde_json::Value = server
        .client
        .get(server.url(&format!("/posts?pageSize=2&cursor={cursor}")))
        .send()
        .await
        .expect("request succeeds")
        .json()
        .await
        .expect("json body");
    let second_ids = post_ids(&second);

    // Next two posts: strictly smaller IDs, no overlap with page one
    assert_eq!(second_ids.len(), 2);
    assert!(second_ids.iter().all(|id| *id < cursor));
    assert!(second_ids.iter().all(|id| !first_ids.contains(id)));
    assert!(second_ids[0] > second_ids[1]);
}

#[tokio::test]
async fn test_cursor_below_all_ids_yields_empty_page() {
    let server = TestServer::new().await;
    let user = server.create_user("Alice", "alice@example.com").await;
    let ids = server.seed_posts(&user, 3).await;

    let body: serde_json::Value = server
        .client
        .get(server.url(&format!("/posts?pageSize=2&cursor={}", ids[0])))
        .send()
        .await
        .expect("request succeeds")
        .json()
        .await
        .expect("json body");

    assert!(post_ids(&body).is_empty());
}

#[tokio::test]
async fn test_malformed_cursor_is_ignored() {
    let server = TestServer::new().await;
    let user = server.create_user("Alice", "alice@example.com").await;
    let ids = server.seed_posts(&user, 3).await;

    let body: serde_json::Value = server
        .client
        .get(server.url("/posts?pageSize=2&cursor=not-a-number"))
        .send()
        .await
        .expect("request succeeds")
        .json()
        .await
        .expect("json body");

    // Behaves like the first page
    let listed = post_ids(&body);
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0], *ids.last().unwrap());
}

#[tokio::test]
async fn test_rows_carry_author_fields() {
    let server = TestServer::new().await;
    let user = server.create_user("Alice", "alice@example.com").await;
    server.seed_posts(&user, 1).await;

    let body: serde_json::Value = server
        .client
        .get(server.url("/posts?pageSize=1"))
        .send()
        .await
        .expect("request succeeds")
        .json()
        .await
        .expect("json body");

    let post = &body["posts"][0];
    assert_eq!(post["authorName"], "Alice");
    assert_eq!(post["authorPicture"], "https://example.com/Alice.png");
    assert_eq!(post["userId"], user.id);
}
