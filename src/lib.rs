pub mod api;
pub mod config;
pub mod error;
pub mod optimizer;
pub mod roster;
// cmd and reports belong to the binary crate (main.rs).
