pub mod connection;
pub mod migrations;

pub use connection::DbConnection;
