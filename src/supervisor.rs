//! Supervisor: owns the link lifecycle and coordinates shutdown.
//!
//! Flow:
//! 1. Split the link into framed halves and spawn the writer and reader.
//! 2. Monitor worker liveness at the idle interval, also reacting to OS
//!    termination signals.
//! 3. Once either worker stops or a signal arrives, run the close sequence
//!    exactly once: cancel the shared token, wait up to the grace period
//!    for both workers to join, abort any worker still stuck.
//!
//! Worker errors never reach the supervisor as values; it only observes
//! status transitions. Cancellation is an explicit token checked at every
//! suspension point, so a worker blocked in a read unblocks without
//! relying on the platform's close interrupting it.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::link;
use crate::operator::{OperatorInput, OperatorOutput};
use crate::reader::run_reader;
use crate::signals;
use crate::status::{StatusProbe, status_pair};
use crate::writer::run_writer;

/// Admits exactly one close sequence no matter how many exit paths race.
#[derive(Debug, Default)]
struct CloseLatch(AtomicBool);

impl CloseLatch {
    fn acquire(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }
}

pub struct Supervisor {
    cfg: Config,
    latch: CloseLatch,
    token: CancellationToken,
}

impl Supervisor {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            latch: CloseLatch::default(),
            token: CancellationToken::new(),
        }
    }

    /// Returns the token that interrupts the console.
    ///
    /// Cancelling it is equivalent to a termination signal: both workers
    /// stop at their next suspension point and the close sequence runs.
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Runs the console over an open duplex link until either worker stops
    /// or a termination signal arrives, then closes the link.
    pub async fn run<L, R, P, W>(
        self,
        stream: L,
        input: OperatorInput<R, P>,
        output: OperatorOutput<W>,
    ) where
        L: AsyncRead + AsyncWrite + Send + 'static,
        R: AsyncRead + Unpin + Send + 'static,
        P: AsyncWrite + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (source, sink) = link::split(stream);
        let token = self.token.clone();
        let (writer_cell, writer_probe) = status_pair();
        let (reader_cell, reader_probe) = status_pair();

        let mut workers = JoinSet::new();
        workers.spawn(run_writer(input, sink, token.clone(), writer_cell));
        workers.spawn(run_reader(source, output, token.clone(), reader_cell));

        let signal_token = token.clone();
        tokio::spawn(async move {
            if signals::wait_for_shutdown_signal().await.is_ok() {
                tracing::info!("termination signal received");
                signal_token.cancel();
            }
        });

        self.monitor(&token, &writer_probe, &reader_probe).await;
        self.close(&token, &mut workers).await;
    }

    /// Polls worker liveness at the idle interval until one worker stops
    /// or the token is cancelled.
    async fn monitor(
        &self,
        token: &CancellationToken,
        writer: &StatusProbe,
        reader: &StatusProbe,
    ) {
        loop {
            if writer.is_stopped() || reader.is_stopped() {
                return;
            }
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(self.cfg.idle_interval) => {}
            }
        }
    }

    /// Close sequence: cancels the workers and drops the link halves.
    async fn close(&self, token: &CancellationToken, workers: &mut JoinSet<()>) {
        if !self.latch.acquire() {
            return;
        }
        tracing::info!("closing serial link");
        token.cancel();

        let drained = async {
            while workers.join_next().await.is_some() {}
        };
        if tokio::time::timeout(self.cfg.grace, drained).await.is_err() {
            tracing::warn!(grace = ?self.cfg.grace, "workers still running after grace, aborting");
            workers.abort_all();
        }
        // Dropping the join set drops the framed halves, which closes the
        // underlying device handle.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::time::timeout;

    fn test_config() -> Config {
        Config {
            idle_interval: Duration::from_millis(10),
            grace: Duration::from_millis(500),
            ..Config::default()
        }
    }

    /// Echoes every byte the console writes back over the link.
    fn spawn_echo_device(link: tokio::io::DuplexStream) {
        tokio::spawn(async move {
            let (mut read, mut write) = tokio::io::split(link);
            let mut buf = [0u8; 256];
            loop {
                match read.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if write.write_all(&buf[..n]).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });
    }

    #[test]
    fn close_latch_admits_exactly_one() {
        let latch = CloseLatch::default();
        assert!(latch.acquire());
        assert!(!latch.acquire());
        assert!(!latch.acquire());
    }

    #[tokio::test]
    async fn echo_session_then_clean_shutdown_on_input_end() {
        let (console_link, device_link) = tokio::io::duplex(256);
        spawn_echo_device(device_link);

        let (mut keys, typed) = tokio::io::duplex(64);
        let (printed, mut screen) = tokio::io::duplex(256);
        let input = OperatorInput::new(typed, tokio::io::sink());
        let output = OperatorOutput::new(printed);

        let run = tokio::spawn(Supervisor::new(test_config()).run(console_link, input, output));

        keys.write_all(b"hello\n").await.unwrap();
        let mut rendered = [0u8; 28];
        timeout(Duration::from_secs(2), screen.read_exact(&mut rendered))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&rendered[..], b"Received from ESP32:  hello\n");

        // Operator walks away: input ends, writer stops, supervisor closes.
        drop(keys);
        timeout(Duration::from_secs(2), run).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn interrupt_while_both_workers_idle_closes_and_exits() {
        let (console_link, _device_link) = tokio::io::duplex(256);
        let (_keys, typed) = tokio::io::duplex(64);
        let input = OperatorInput::new(typed, tokio::io::sink());
        let output = OperatorOutput::new(tokio::io::sink());

        let sup = Supervisor::new(test_config());
        let interrupt = sup.cancel_token();
        let run = tokio::spawn(sup.run(console_link, input, output));

        // Both workers are blocked awaiting input when the interrupt lands.
        tokio::time::sleep(Duration::from_millis(50)).await;
        interrupt.cancel();

        timeout(Duration::from_secs(2), run).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn poisoned_inbound_stream_shuts_the_console_down() {
        let (console_link, device_link) = tokio::io::duplex(256);
        let (_keys, typed) = tokio::io::duplex(64);
        let input = OperatorInput::new(typed, tokio::io::sink());
        let output = OperatorOutput::new(tokio::io::sink());

        let run = tokio::spawn(Supervisor::new(test_config()).run(console_link, input, output));

        // Device sends a byte outside ASCII: the reader stops, the monitor
        // notices, and the close sequence cancels the still-blocked writer.
        let (_dev_read, mut dev_write) = tokio::io::split(device_link);
        dev_write.write_all(&[0xFF, b'\n']).await.unwrap();

        timeout(Duration::from_secs(2), run).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn device_closing_the_link_shuts_the_console_down() {
        let (console_link, device_link) = tokio::io::duplex(256);
        let (_keys, typed) = tokio::io::duplex(64);
        let input = OperatorInput::new(typed, tokio::io::sink());
        let output = OperatorOutput::new(tokio::io::sink());

        let run = tokio::spawn(Supervisor::new(test_config()).run(console_link, input, output));

        drop(device_link);

        timeout(Duration::from_secs(2), run).await.unwrap().unwrap();
    }
}
