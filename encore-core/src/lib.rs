//! # Encore Core
//!
//! `encore-core` is the library behind the `encore db` and `encore gen` commands. It works out
//! which service of an Encore application the user is pointing at and routes the requested
//! operation to the long-running Encore daemon over gRPC.
//!
//! ## Key Components
//!
//! * **[`AppRoot`]:** Locates the enclosing application from the invocation directory.
//! * **[`resolve`]:** Picks the target service, either verbatim from the user or by walking up
//!   to the nearest directory owning a `migrations` folder.
//! * **[`DaemonClient`]:** A thin `tonic` client for the daemon API. It is generic over the
//!   underlying `GrpcService` so tests can plug an in-process server.
//! * **[`commands`]:** One function per user-facing operation (reset, shell, conn-uri, proxy,
//!   gen client).
//! * **[`shell`]:** Decides how an interactive `psql` session is started, locally or through
//!   a `docker` container.
//!
//! ## Re-exports
//!
//! This crate re-exports `prost` and `tonic` to ensure that consumers
//! use compatible versions of these underlying dependencies.
pub mod app_root;
pub mod commands;
pub mod daemon;
mod error;
pub mod resolve;
pub mod shell;

pub use app_root::AppRoot;
pub use daemon::DaemonClient;
pub use error::Error;
pub use resolve::ServiceName;

// Re-exports
pub use prost;
pub use tonic;

/// Type alias for the standard boxed error used in generic bounds.
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
