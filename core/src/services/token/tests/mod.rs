//! Tests for the token service

#[cfg(test)]
mod cleanup_tests;
