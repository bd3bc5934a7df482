//! Domain entities representing core business objects.

pub mod principal;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use principal::{Identity, Principal};
pub use token::{
    identity_prefix, ClaimValue, Claims, ExtraClaims, RevocationRecord, TokenClass, TokenPair,
    RESERVED_CLAIMS,
};
pub use user::{Role, User};
