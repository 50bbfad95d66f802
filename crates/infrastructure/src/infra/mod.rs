//! Infrastructure layer - database connection.

mod db;

pub use db::Database;
