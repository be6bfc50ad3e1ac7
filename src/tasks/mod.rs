//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Eviction: Removes expired cache entries at configured intervals

mod eviction;

pub use eviction::{sweep, Evictor};
