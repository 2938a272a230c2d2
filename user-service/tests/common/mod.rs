use std::collections::HashMap;
use std::sync::Arc;

use argon2::Params;
use async_trait::async_trait;
use auth::AuthConfig;
use auth::AuthGuard;
use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenCodec;
use serde_json::json;
use tokio::sync::RwLock;
use user_service::domain::movie::errors::ScraperError;
use user_service::domain::movie::models::Movie;
use user_service::domain::movie::ports::MovieChartPort;
use user_service::domain::session::service::AuthService;
use user_service::domain::user::errors::UserError;
use user_service::domain::user::models::User;
use user_service::domain::user::models::UserId;
use user_service::domain::user::models::Username;
use user_service::domain::user::ports::UserRepository;
use user_service::domain::user::service::UserService;
use user_service::inbound::http::router::create_router;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over an in-memory store
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub auth_config: AuthConfig,
    pub codec: Arc<TokenCodec>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_chart(StaticMovieChart::default()).await
    }

    pub async fn spawn_with_chart(chart: StaticMovieChart) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let auth_config = AuthConfig::new(TEST_SECRET).expect("Invalid test auth config");
        let codec = Arc::new(TokenCodec::new(&auth_config));

        let user_repository = Arc::new(InMemoryUserRepository::default());
        let user_service = Arc::new(UserService::with_password_hasher(
            Arc::clone(&user_repository),
            fast_hasher(),
        ));

        let authenticator = Arc::new(Authenticator::with_components(
            fast_hasher(),
            Arc::clone(&codec),
        ));
        let guard = AuthGuard::new(Arc::clone(&codec));
        let auth_service = Arc::new(AuthService::new(user_repository, authenticator, guard));

        let router = create_router(user_service, auth_service, Arc::new(chart));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            auth_config,
            codec,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user and return the response body
    pub async fn create_user(
        &self,
        username: &str,
        email: Option<&str>,
        password: &str,
    ) -> serde_json::Value {
        let response = self
            .post("/api/users")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Log in and return the `data` object of the response
    pub async fn login(&self, username: &str, password: &str) -> serde_json::Value {
        let response = self
            .post("/api/auth/login")
            .json(&json!({
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }

    /// Register a user, log in, and return the access token and user id
    pub async fn create_and_login(&self, username: &str, password: &str) -> (String, String) {
        let created = self.create_user(username, None, password).await;
        let tokens = self.login(username, password).await;

        (
            tokens["access_token"].as_str().unwrap().to_string(),
            created["data"]["id"].as_str().unwrap().to_string(),
        )
    }
}

fn fast_hasher() -> PasswordHasher {
    PasswordHasher::with_params(Params::new(8 * 1024, 1, 1, None).expect("Invalid argon2 params"))
}

/// User store backed by a map, enforcing the same uniqueness rules as the
/// `users` table.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    fn check_unique(users: &HashMap<UserId, User>, candidate: &User) -> Result<(), UserError> {
        for existing in users.values().filter(|user| user.id != candidate.id) {
            if existing.username == candidate.username {
                return Err(UserError::UsernameAlreadyExists(
                    candidate.username.as_str().to_string(),
                ));
            }
            if let (Some(existing_email), Some(email)) = (&existing.email, &candidate.email) {
                if existing_email == email {
                    return Err(UserError::EmailAlreadyExists(email.as_str().to_string()));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        Self::check_unique(&users, &user)?;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| &user.username == username)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        Self::check_unique(&users, &user)?;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

/// Chart source returning a fixed result.
pub struct StaticMovieChart {
    result: Result<Vec<Movie>, ScraperError>,
}

impl StaticMovieChart {
    pub fn failing(err: ScraperError) -> Self {
        Self { result: Err(err) }
    }
}

impl Default for StaticMovieChart {
    fn default() -> Self {
        Self {
            result: Ok(vec![
                Movie {
                    rank: Some(1),
                    imdb_id: "tt0111161".to_string(),
                    title: Some("The Shawshank Redemption".to_string()),
                    year: Some(1994),
                    rating: Some(9.3),
                    rating_count: Some(3_000_000),
                    plot: None,
                    genres: vec!["Drama".to_string()],
                },
                Movie {
                    rank: Some(2),
                    imdb_id: "tt0068646".to_string(),
                    title: Some("The Godfather".to_string()),
                    year: Some(1972),
                    rating: Some(9.2),
                    rating_count: None,
                    plot: None,
                    genres: vec!["Crime".to_string(), "Drama".to_string()],
                },
            ]),
        }
    }
}

#[async_trait]
impl MovieChartPort for StaticMovieChart {
    async fn fetch_top_250(&self) -> Result<Vec<Movie>, ScraperError> {
        self.result.clone()
    }
}
