//! Database connection management and seeding.

mod database;
pub mod seed;

pub use database::Database;
