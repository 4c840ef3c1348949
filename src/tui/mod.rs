pub mod app;

pub use app::run_board;
