//! Data models for the Merx client library.
//!
//! Resource rows are schema-driven on the client side, so they travel as
//! untyped [`Record`] maps. The auth endpoints use small typed structures.

pub mod login_request;
pub mod profile;
pub mod record;
pub mod register_request;
pub mod token_pair;

pub use login_request::LoginRequest;
pub use profile::Profile;
pub use record::{json_id, record_id, Record};
pub use register_request::RegisterRequest;
pub use token_pair::TokenPair;
