pub mod user;

pub use user::UserIdentity;
