use crate::{BoxError, DaemonClient, Error, daemon::pb};
use http_body::Body as HttpBody;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tonic::client::GrpcService;

/// Deadline of the `GenClient` call.
pub const GEN_CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Options of `gen client`.
#[derive(Debug, Clone)]
pub struct GenClientOptions {
    pub app_id: String,
    /// File to write the client to. Standard output when unset.
    pub output: Option<PathBuf>,
    pub lang: Option<String>,
    pub env: String,
}

impl GenClientOptions {
    /// The language to generate, either given explicitly or detected from the output file.
    pub fn language(&self) -> Result<String, Error> {
        match (&self.lang, &self.output) {
            (Some(lang), _) => Ok(lang.clone()),
            (None, None) => Err(Error::InvalidArguments(
                "specify at least one of --output or --lang.".to_string(),
            )),
            (None, Some(output)) => {
                detect_lang(output).map(String::from).ok_or_else(|| {
                    Error::LanguageDetectionFailed {
                        output: Some(output.clone()),
                    }
                })
            }
        }
    }
}

/// Maps an output file to the language of the client written into it.
///
/// The extension is whatever follows the last `.` of the file name, so a file named just `.ts`
/// counts as TypeScript too.
pub fn detect_lang(path: &Path) -> Option<&'static str> {
    let name = path.file_name()?.to_str()?;
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "ts" => Some("typescript"),
        _ => None,
    }
}

/// Generates an API client for an app and writes it to the output file or `out`.
pub async fn gen_client<S, O>(
    client: &mut DaemonClient<S>,
    options: GenClientOptions,
    out: &mut O,
) -> Result<(), Error>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
    O: AsyncWrite + Unpin,
{
    let lang = options.language()?;
    tracing::info!(app_id = %options.app_id, %lang, env = %options.env, "generating client");

    let mut request = tonic::Request::new(pb::GenClientRequest {
        app_id: options.app_id,
        env_name: options.env,
        lang,
    });
    request.set_timeout(GEN_CLIENT_TIMEOUT);

    let response = tokio::time::timeout(GEN_CLIENT_TIMEOUT, client.gen_client(request))
        .await
        .unwrap_or_else(|_| {
            Err(tonic::Status::deadline_exceeded(format!(
                "no response within {}s",
                GEN_CLIENT_TIMEOUT.as_secs()
            )))
        })
        .map_err(Error::backend("could not generate client"))?;

    match options.output {
        None => {
            out.write_all(&response.code)
                .await
                .map_err(Error::io("failed to write generated client"))?;
            out.flush()
                .await
                .map_err(Error::io("failed to write generated client"))
        }
        Some(path) => write_executable(&path, &response.code).await,
    }
}

async fn write_executable(path: &Path, code: &[u8]) -> Result<(), Error> {
    let context = format!("failed to write {}", path.display());

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o755);

    let mut file = options
        .open(path)
        .await
        .map_err(Error::io(context.clone()))?;
    file.write_all(code).await.map_err(Error::io(context.clone()))?;
    file.flush().await.map_err(Error::io(context))
}
