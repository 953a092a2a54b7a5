pub mod bowlers;
pub mod connection;
pub mod games;
pub mod models;
pub mod predictions;
pub mod setup;
pub mod weeks;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::*;
