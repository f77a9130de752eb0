//! Core types and trait definitions for the semana planning board.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The storage backend implements [`store::PlanningStore`], the push
//! delivery transport implements [`push::PushTransport`], and the HTTP
//! layer depends only on those abstractions.

pub mod change;
pub mod error;
pub mod planning;
pub mod push;
pub mod store;
pub mod subscription;
pub mod weekday;

pub use error::{Error, Result};
