//! Test utilities.
//!
//! - In-memory implementations of the store traits
//! - Factories for users and listings
//! - `TestApp`, which drives the full router with in-memory state

mod factories;
mod store_mocks;
mod test_app;

pub use factories::*;
pub use store_mocks::*;
pub use test_app::*;
