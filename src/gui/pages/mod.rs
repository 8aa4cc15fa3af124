//! Page views
//!
//! Pure presentational mapping from application state to widgets; pages
//! read projections and emit messages, never mutate state.

pub mod about;
pub mod landing;
pub mod navbar;
pub mod processing;
pub mod results;
pub mod upload;
