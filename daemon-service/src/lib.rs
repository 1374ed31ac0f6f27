//! # Daemon Service
//!
//! **INTERNAL USE ONLY**: This crate exists solely to provide a gRPC server implementation
//! of the Encore daemon API for integration testing `encore-core`.
//! It is not intended for production use.

pub mod pb {
    tonic::include_proto!("encore.daemon");
}

pub use pb::daemon_server::{Daemon, DaemonServer};
