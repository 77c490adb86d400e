//! Common test utilities for E2E tests

use blogtree::data::{User, UserId};
use blogtree::{config, AppState};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Create test configuration (in-memory session store)
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                protocol: "http".to_string(),
                frontend_url: "http://localhost:5173".to_string(),
            },
            database: config::DatabaseConfig {
                path: db_path.clone(),
            },
            session: config::SessionConfig {
                backend: config::SessionBackend::Memory,
                redis_url: None,
                ttl_seconds: 604_800,
                purge_interval_seconds: 300,
            },
            auth: config::AuthConfig {
                google: config::GoogleOAuthConfig {
                    client_id: "test-client-id".to_string(),
                    client_secret: "test-client-secret".to_string(),
                    redirect_uri: "http://localhost:3000/auth/google/callback".to_string(),
                },
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Create HTTP client
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // Build router
        let app = blogtree::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait a bit for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Create a user directly in the database
    pub async fn create_user(&self, name: &str, email: &str) -> User {
        let user = User {
            id: UserId::new().0,
            name: name.to_string(),
            email: email.to_string(),
            provider: "google".to_string(),
            provider_account_id: format!("sub-{name}"),
            picture: format!("https://example.com/{name}.png"),
            created_at: chrono::Utc::now(),
        };
        self.state.db.insert_user(&user).await.unwrap();
        user
    }

    /// Open a session for `user` and return the Cookie header value
    pub async fn login(&self, user: &User) -> String {
        let session_id = self.state.sessions.create(&user.id).await.unwrap();
        format!("blogtree-auth={session_id}")
    }

    /// Seed `count` valid posts owned by `user`, returning their IDs
    /// in insertion order
    pub async fn seed_posts(&self, user: &User, count: usize) -> Vec<i64> {
        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            let post = self
                .state
                .db
                .insert_post(
                    &format!("Seeded test post {i:03}"),
                    &format!("Seeded test post content {i:03} padded out to fifty characters."),
                    &user.id,
                )
                .await
                .unwrap();
            ids.push(post.id);
        }
        ids
    }
}
