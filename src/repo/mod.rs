pub mod application;

pub use application::{ApplicationRepo, SqliteSink, StoreError};
