pub mod handler;
pub mod model;
mod view;

pub use handler::{SESSION_COOKIE, callback, home, login, logout};
