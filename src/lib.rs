//! Recipe sharing web application: anyone can browse the paginated listing and
//! detail pages, registered users manage their own recipes.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod recipes;
pub mod session;
pub mod state;
