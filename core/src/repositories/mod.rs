pub mod revocation;
pub mod user;

pub use revocation::{MemoryRevocationStore, RevocationStore, StoreResult};
pub use user::{MemoryUserDirectory, UserDirectory};
