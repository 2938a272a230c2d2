//! Authentication core
//!
//! Password hashing, session tokens and request authentication for the
//! user service:
//! - Password hashing (Argon2id, PHC strings)
//! - Access / refresh token minting and verification (HS256 JWT)
//! - Bearer-header request guard
//! - Login and refresh coordination
//!
//! The service owns account storage; this crate only ever sees the stored
//! hash of the account being authenticated.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{AuthConfig, TokenCodec, TokenKind};
//!
//! let config = AuthConfig::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let codec = TokenCodec::new(&config);
//! let token = codec.issue_access_token("alice").unwrap();
//! let claims = codec.decode_and_verify(&token).unwrap();
//! assert_eq!(claims.sub, "alice");
//! assert_eq!(claims.kind, TokenKind::Access);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use std::sync::Arc;
//!
//! use auth::{AuthConfig, AuthGuard, Authenticator};
//!
//! let config = AuthConfig::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(&config);
//! let guard = AuthGuard::new(Arc::clone(auth.codec()));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and mint tokens
//! let tokens = auth.login("password123", Some(&hash), "alice").unwrap();
//!
//! // Authenticate a request
//! let header = format!("Bearer {}", tokens.access_token);
//! let subject = guard.authenticate(Some(&header)).unwrap();
//! assert_eq!(subject.as_str(), "alice");
//!
//! // Refresh
//! let refreshed = auth.refresh(&tokens.refresh_token).unwrap();
//! assert!(!refreshed.access_token.is_empty());
//! ```

pub mod authenticator;
pub mod clock;
pub mod config;
pub mod guard;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AccessToken;
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenPair;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use config::AuthConfig;
pub use config::AuthConfigError;
pub use guard::AuthGuard;
pub use guard::AuthenticatedSubject;
pub use guard::GuardError;
pub use jwt::Claims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use jwt::TokenKind;
pub use password::PasswordError;
pub use password::PasswordHasher;
