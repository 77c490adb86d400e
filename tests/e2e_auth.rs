//! E2E tests for the Google OAuth redirect and session endpoints

mod common;

use common::TestServer;

fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .expect("failed to build no-redirect client")
}

#[tokio::test]
async fn test_login_redirects_to_google() {
    let server = TestServer::new().await;
    let client = no_redirect_client();

    let response = client
        .get(server.url("/auth/login/google"))
        .send()
        .await
        .expect("request succeeds");

    assert!(response.status().is_redirection());
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("location header");
    assert!(location.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
    assert!(location.contains("client_id=test-client-id"));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("scope=openid%20email%20profile"));
}

#[tokio::test]
async fn test_me_requires_session() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/auth/me"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["msg"], "Unauthorized");
}

#[tokio::test]
async fn test_me_returns_user_name() {
    let server = TestServer::new().await;
    let user = server.create_user("Alice", "alice@example.com").await;
    let cookie = server.login(&user).await;

    let response = server
        .client
        .get(server.url("/auth/me"))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["userName"], "Alice");
}

#[tokio::test]
async fn test_unknown_session_token_is_rejected() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/auth/me"))
        .header("Cookie", "blogtree-auth=not-a-real-session")
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_logout_destroys_the_session() {
    let server = TestServer::new().await;
    let user = server.create_user("Alice", "alice@example.com").await;
    let cookie = server.login(&user).await;

    let response = server
        .client
        .get(server.url("/auth/logout"))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);

    // The cookie is cleared in the response
    let set_cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie header")
        .to_owned();
    assert!(set_cookie.contains("blogtree-auth="));

    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["msg"], "success");

    // The old token no longer authenticates
    let response = server
        .client
        .get(server.url("/auth/me"))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_logout_requires_session() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/auth/logout"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 401);
}
