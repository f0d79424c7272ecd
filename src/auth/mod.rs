pub mod forms;
pub mod handlers;
pub mod repo;
pub mod views;

pub use handlers::router;
