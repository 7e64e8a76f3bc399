//! Database module for the proximities API
//!
//! This module turns the `[postgres]` configuration into a shared
//! [`Engine`] (a lazily connected pool) and hands out per-request
//! [`Session`]s through a [`SessionFactory`].

pub mod connection;
pub mod engine;
pub mod session;

pub use engine::{Engine, PoolStatus};
pub use session::{Session, SessionFactory};
