pub mod classify;
pub mod username;
