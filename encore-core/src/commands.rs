//! # Commands
//!
//! One function per user-facing operation. Each one takes its own options struct, resolves
//! the target service when it needs one, calls the daemon and renders the result.
//!
//! | command | daemon call | resolution |
//! |---|---|---|
//! | [`reset`] | `DbReset` (streaming) | explicit list, `--all`, or the nearest package |
//! | [`shell`] | `DbConnect` | explicit name or migrations walk |
//! | [`conn_uri`] | `DbConnect` | explicit name or migrations walk |
//! | [`proxy`] | `DbProxy` (streaming) | none |
//! | [`gen_client`] | `GenClient` | none |
mod codegen;
mod stream;

pub use codegen::{GEN_CLIENT_TIMEOUT, GenClientOptions, detect_lang, gen_client};
pub use stream::forward_output;

use crate::{
    AppRoot, BoxError, DaemonClient, Error,
    daemon::pb,
    resolve::{self, PackageResolver, ServiceName},
    shell::{HostOs, SessionPlan, SessionStrategy},
};
use http_body::Body as HttpBody;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tonic::client::GrpcService;

/// Options of `db reset`.
#[derive(Debug, Clone, Default)]
pub struct ResetOptions {
    pub services: Vec<String>,
    pub all: bool,
}

impl ResetOptions {
    /// Rejects `--all` combined with explicit service names.
    pub fn validate(&self) -> Result<(), Error> {
        if self.all && !self.services.is_empty() {
            return Err(Error::InvalidArguments(
                "cannot specify both --all and service names".to_string(),
            ));
        }
        Ok(())
    }

    /// The services to send to the daemon. An empty list means every service.
    async fn target_services(
        self,
        app_root: &AppRoot,
        resolver: &impl PackageResolver,
    ) -> Result<Vec<String>, Error> {
        self.validate()?;

        if self.all {
            return Ok(Vec::new());
        }
        if !self.services.is_empty() {
            return Ok(self.services);
        }

        let name = resolve::nearest_package(app_root, resolver).await?;
        Ok(vec![name.into_inner()])
    }
}

/// Options shared by `db shell` and `db conn-uri`.
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    /// Explicit service name, skips resolution.
    pub service: Option<String>,
    /// Empty targets the local environment.
    pub env: String,
}

/// Options of `db proxy`.
#[derive(Debug, Clone, Default)]
pub struct ProxyOptions {
    pub env: String,
    /// Zero lets the daemon pick a port.
    pub port: i32,
}

/// Resets the databases of the selected services, forwarding the daemon's progress output.
///
/// Returns the exit code reported by the daemon.
pub async fn reset<S, O, E>(
    client: &mut DaemonClient<S>,
    app_root: &AppRoot,
    resolver: &impl PackageResolver,
    options: ResetOptions,
    out: &mut O,
    err: &mut E,
) -> Result<i32, Error>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    let services = options.target_services(app_root, resolver).await?;
    tracing::info!(?services, "resetting databases");

    let stream = client
        .db_reset(pb::DbResetRequest {
            app_root: app_root.root_string(),
            services,
        })
        .await
        .map_err(Error::backend("reset databases"))?;

    forward_output(stream, out, err, "reset databases").await
}

/// Asks the daemon for the connection string of the targeted service database.
///
/// A new request is made on every call; connection strings are never cached.
pub async fn connection_string<S>(
    client: &mut DaemonClient<S>,
    app_root: &AppRoot,
    resolver: &impl PackageResolver,
    options: ConnectOptions,
    command: &'static str,
) -> Result<(ServiceName, String), Error>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    let service = resolve::resolve_service(app_root, options.service, resolver, command).await?;

    let response = client
        .db_connect(pb::DbConnectRequest {
            app_root: app_root.root_string(),
            svc_name: service.to_string(),
            env_name: options.env,
        })
        .await
        .map_err(Error::backend(format!(
            "could not connect to the database for service {service}"
        )))?;

    Ok((service, response.dsn))
}

/// Prints the connection string of the targeted service database.
pub async fn conn_uri<S, O>(
    client: &mut DaemonClient<S>,
    app_root: &AppRoot,
    resolver: &impl PackageResolver,
    options: ConnectOptions,
    out: &mut O,
) -> Result<(), Error>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
    O: AsyncWrite + Unpin,
{
    let (_, dsn) = connection_string(client, app_root, resolver, options, "conn-uri").await?;

    out.write_all(format!("{dsn}\n").as_bytes())
        .await
        .map_err(Error::io("failed to write connection string"))?;
    out.flush()
        .await
        .map_err(Error::io("failed to write connection string"))
}

/// Opens an interactive `psql` session to the targeted service database.
///
/// Blocks until the session ends and returns its exit code.
pub async fn shell<S>(
    client: &mut DaemonClient<S>,
    app_root: &AppRoot,
    resolver: &impl PackageResolver,
    options: ConnectOptions,
) -> Result<i32, Error>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    let (service, dsn) = connection_string(client, app_root, resolver, options, "shell").await?;
    tracing::info!(%service, "opening database shell");

    SessionPlan::new(SessionStrategy::probe_env(), &dsn, HostOs::current())
        .run()
        .await
}

/// Runs a database proxy for the whole application until `shutdown` completes.
///
/// Completing `shutdown` drops the response stream, which cancels the call on the daemon.
pub async fn proxy<S, O, E, F>(
    client: &mut DaemonClient<S>,
    app_root: &AppRoot,
    options: ProxyOptions,
    out: &mut O,
    err: &mut E,
    shutdown: F,
) -> Result<i32, Error>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    let request = pb::DbProxyRequest {
        app_root: app_root.root_string(),
        env_name: options.env,
        port: options.port,
    };

    let run = async {
        let stream = client
            .db_proxy(request)
            .await
            .map_err(Error::backend("could not setup db proxy"))?;

        let code = forward_output(stream, out, err, "db proxy").await?;
        Ok::<_, Error>(code)
    };

    tokio::select! {
        res = run => res,
        () = shutdown => {
            tracing::info!("interrupted, closing db proxy");
            Ok(0)
        }
    }
}
