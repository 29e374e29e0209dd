pub mod arena;
pub mod backend;
pub mod bus;
pub mod config;
pub mod controller;
pub mod datetime;
pub mod error;
pub mod export;
pub mod logging;
pub mod modal;
pub mod model;
pub mod reconcile;
pub mod sessions;
pub mod tree_sync;

pub use error::*;
pub use model::*;
pub use tree_sync::*;
