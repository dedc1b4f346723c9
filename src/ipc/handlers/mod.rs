pub mod auth;
pub mod core;
pub mod students;
pub mod suggest;
pub mod sync;
