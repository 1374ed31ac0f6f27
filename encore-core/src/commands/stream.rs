use crate::{
    Error,
    daemon::pb::{CommandMessage, command_message::Msg},
};
use futures_util::{Stream, StreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Forwards the output of a streamed daemon command to `out` and `err`.
///
/// Messages are written in arrival order and flushed one at a time, so progress shows up as the
/// daemon produces it. A [`Msg::Exit`] ends forwarding with its code; a stream that simply ends
/// counts as success.
///
/// A failing stream aborts with [`Error::BackendError`]. Whatever was written before stays written.
pub async fn forward_output<St, O, E>(
    mut stream: St,
    out: &mut O,
    err: &mut E,
    context: &str,
) -> Result<i32, Error>
where
    St: Stream<Item = Result<CommandMessage, tonic::Status>> + Unpin,
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    while let Some(message) = stream.next().await {
        let message = message.map_err(Error::backend(context))?;

        match message.msg {
            Some(Msg::Output(output)) => {
                write_chunk(out, &output.stdout).await?;
                write_chunk(err, &output.stderr).await?;
            }
            Some(Msg::Exit(exit)) => {
                tracing::debug!(code = exit.code, "command exited");
                return Ok(exit.code);
            }
            None => {}
        }
    }

    Ok(0)
}

async fn write_chunk<W: AsyncWrite + Unpin>(w: &mut W, chunk: &[u8]) -> Result<(), Error> {
    if chunk.is_empty() {
        return Ok(());
    }
    w.write_all(chunk)
        .await
        .map_err(Error::io("failed to write command output"))?;
    w.flush()
        .await
        .map_err(Error::io("failed to write command output"))
}
