pub mod error;
pub mod jwt;
pub mod oauth;
pub mod registry;
pub mod store;

pub use error::ServiceError;
pub use jwt::{JwtService, TokenClaims, TokenUse};
pub use oauth::{OAuthService, TokenResponse, GRANT_TYPE_PASSWORD};
pub use registry::ClientRegistry;
pub use store::{InMemoryMemberStore, MemberStore, MongoMemberStore};
