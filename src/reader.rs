//! Reader worker: serial link to operator output.

use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;

use crate::error::LinkError;
use crate::link::LineReader;
use crate::operator::OperatorOutput;
use crate::status::StatusCell;

/// Runs the reader until cancellation, link closure, or a fatal decode/read
/// error. Marks `status` stopped on exit.
///
/// The read primitive is event-driven: the task suspends until a complete
/// line arrives, so no availability polling is needed.
pub async fn run_reader<R, W>(
    mut source: LineReader<R>,
    mut output: OperatorOutput<W>,
    token: CancellationToken,
    status: StatusCell,
) where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match reader_loop(&mut source, &mut output, &token).await {
        Ok(()) => tracing::debug!("reader stopped"),
        Err(e) => tracing::error!(error = %e, "reader stopping after fatal error"),
    }
    status.set_stopped();
}

async fn reader_loop<R, W>(
    source: &mut LineReader<R>,
    output: &mut OperatorOutput<W>,
    token: &CancellationToken,
) -> Result<(), LinkError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        tokio::select! {
            biased;

            _ = token.cancelled() => return Ok(()),

            frame = source.next() => match frame {
                Some(Ok(line)) => output.print_line(&line).await?,
                Some(Err(e)) => return Err(e),
                None => {
                    tracing::info!("link closed, reader stopping");
                    return Ok(());
                }
            },
        }
    }
}
