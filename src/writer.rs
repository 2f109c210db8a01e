//! Writer worker: operator input to serial link.

use futures::SinkExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;

use crate::error::LinkError;
use crate::link::LineWriter;
use crate::operator::OperatorInput;
use crate::status::StatusCell;

/// Runs the writer until cancellation, end of operator input, or a fatal
/// encode/write error. Marks `status` stopped on exit.
///
/// Each accepted line is terminated, encoded as ASCII, and flushed whole;
/// there is no partial-write recovery and no retry.
pub async fn run_writer<R, P, W>(
    mut input: OperatorInput<R, P>,
    mut sink: LineWriter<W>,
    token: CancellationToken,
    status: StatusCell,
) where
    R: AsyncRead + Unpin,
    P: AsyncWrite + Unpin,
    W: AsyncWrite + Unpin,
{
    match writer_loop(&mut input, &mut sink, &token).await {
        Ok(()) => tracing::debug!("writer stopped"),
        Err(e) => tracing::error!(error = %e, "writer stopping after fatal error"),
    }
    status.set_stopped();
}

async fn writer_loop<R, P, W>(
    input: &mut OperatorInput<R, P>,
    sink: &mut LineWriter<W>,
    token: &CancellationToken,
) -> Result<(), LinkError>
where
    R: AsyncRead + Unpin,
    P: AsyncWrite + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        tokio::select! {
            biased;

            _ = token.cancelled() => return Ok(()),

            line = input.prompt_and_read_line() => match line? {
                Some(text) => sink.send(text).await?,
                None => {
                    tracing::info!("operator input closed, writer stopping");
                    return Ok(());
                }
            },
        }
    }
}
