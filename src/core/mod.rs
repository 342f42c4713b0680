//! Core business logic - framework-agnostic coupon generation and bulk updates.
//!
//! Nothing in here knows about HTTP, nonces or admin accounts. Every function
//! takes a `ConnectionTrait` so it runs the same against a pool, a transaction or
//! an in-memory test database.

pub mod code;
pub mod csv_codes;
pub mod feed;
pub mod forms;
pub mod generate;
pub mod meta;
pub mod update;
