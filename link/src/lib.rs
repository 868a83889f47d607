//! # merx-link
//!
//! Client library for the Merx back-office REST API.
//!
//! Provides a schema-agnostic resource client (list, get, create, update,
//! delete over untyped [`Record`] rows), two-realm authentication with
//! refresh-token session restore, and normalization of server validation
//! errors into a uniform report.
//!
//! # Examples
//!
//! ```rust,no_run
//! use merx_link::{resolve_session, AuthState, MerxClient, SessionTokens};
//!
//! # async fn example() -> merx_link::Result<()> {
//! let client = MerxClient::builder()
//!     .base_url("http://localhost:3001")
//!     .session(SessionTokens::default())
//!     .build()?;
//!
//! match resolve_session(&client).await {
//!     AuthState::Authenticated { realm, .. } => println!("signed in as {}", realm),
//!     _ => println!("no active session"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod bootstrap;
pub mod client;
pub mod error;
pub mod models;
pub mod normalize;
pub mod realm;
pub mod session;

pub use auth::AuthProvider;
pub use bootstrap::{resolve_session, AuthState};
pub use client::{MerxClient, MerxClientBuilder, DEFAULT_BASE_URL};
pub use error::{MerxLinkError, Result};
pub use models::{json_id, record_id, LoginRequest, Profile, Record, RegisterRequest, TokenPair};
pub use normalize::{normalize_validation, ValidationReport};
pub use realm::Realm;
pub use session::{MemoryTokenStore, RealmTokens, SessionTokens, TokenStore};
