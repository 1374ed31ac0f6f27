//! # Daemon Client
//!
//! This module wraps the generated `tonic` client of the Encore daemon.
//!
//! The daemon owns the real work (database lifecycle, proxying, code generation). The CLI only
//! builds requests and consumes the responses. The messages and the raw client in [`pb`] are
//! generated at build time from `proto/daemon.proto`.
//!
//! ## Access patterns
//!
//! * **Unary**: `DbConnect`, `GenClient`.
//! * **Server streaming**: `DbReset`, `DbProxy`. Both stream [`pb::CommandMessage`]s.
//!
//! Connecting fails with [`Error::BackendUnavailable`]. Once connected, every call returns the
//! daemon's [`tonic::Status`] on failure and the caller decides how to report it.
pub mod pb {
    tonic::include_proto!("encore.daemon");
}

use crate::{BoxError, Error};
use http_body::Body as HttpBody;
use pb::daemon_client::DaemonClient as RawDaemonClient;
use std::time::Duration;
use tonic::{
    Streaming,
    client::GrpcService,
    transport::{Channel, Endpoint},
};

/// Default address of the local daemon.
pub const DEFAULT_DAEMON_ADDR: &str = "http://127.0.0.1:4061";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// A client for the Encore daemon API.
pub struct DaemonClient<S = Channel> {
    client: RawDaemonClient<S>,
}

impl DaemonClient<Channel> {
    /// Connects to the daemon listening at `addr` (e.g. `http://127.0.0.1:4061`).
    pub async fn connect(addr: &str) -> Result<Self, Error> {
        let unavailable = |source: tonic::transport::Error| Error::BackendUnavailable {
            addr: addr.to_string(),
            source: source.into(),
        };

        let endpoint = Endpoint::new(addr.to_string())
            .map_err(unavailable)?
            .connect_timeout(CONNECT_TIMEOUT);

        let channel = endpoint.connect().await.map_err(unavailable)?;

        tracing::debug!(addr, "connected to daemon");

        Ok(Self::new(channel))
    }
}

impl<S> DaemonClient<S>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    /// Creates a client from an existing Tonic service/channel.
    pub fn new(service: S) -> Self {
        Self {
            client: RawDaemonClient::new(service),
        }
    }

    /// Resets the databases of the requested services, streaming the daemon's progress output.
    pub async fn db_reset(
        &mut self,
        request: pb::DbResetRequest,
    ) -> Result<Streaming<pb::CommandMessage>, tonic::Status> {
        tracing::debug!("DbReset call");
        Ok(self.client.db_reset(request).await?.into_inner())
    }

    /// Asks the daemon for the connection string of a service database.
    pub async fn db_connect(
        &mut self,
        request: pb::DbConnectRequest,
    ) -> Result<pb::DbConnectResponse, tonic::Status> {
        tracing::debug!("DbConnect call");
        Ok(self.client.db_connect(request).await?.into_inner())
    }

    /// Starts a database proxy. The daemon keeps it running for as long as the stream is open.
    pub async fn db_proxy(
        &mut self,
        request: pb::DbProxyRequest,
    ) -> Result<Streaming<pb::CommandMessage>, tonic::Status> {
        tracing::debug!("DbProxy call");
        Ok(self.client.db_proxy(request).await?.into_inner())
    }

    /// Generates an API client. `request` may carry a deadline set by the caller.
    pub async fn gen_client(
        &mut self,
        request: tonic::Request<pb::GenClientRequest>,
    ) -> Result<pb::GenClientResponse, tonic::Status> {
        tracing::debug!("GenClient call");
        Ok(self.client.gen_client(request).await?.into_inner())
    }
}
