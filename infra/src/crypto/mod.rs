//! Password hashing backed by bcrypt

mod bcrypt_verifier;

pub use bcrypt_verifier::BcryptPasswordVerifier;
