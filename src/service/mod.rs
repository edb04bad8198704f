//! REST surface backing the board: axum handlers over a SQLite store.

pub mod api;
pub mod db;
pub mod server;

pub use db::{BoardDb, DbHandle};
pub use server::{ServerConfig, build_router, start_server};
