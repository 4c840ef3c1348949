pub mod application;
pub mod stage;

pub use application::Application;
pub use stage::Stage;
