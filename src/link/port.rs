//! Serial device handling and framed ownership split.

use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tokio_util::codec::{FramedRead, FramedWrite};

use crate::config::Config;
use crate::error::LinkError;
use crate::link::codec::LineCodec;

/// Inbound side of the link, yielding decoded lines.
pub type LineReader<R> = FramedRead<R, LineCodec>;
/// Outbound side of the link, terminating and flushing whole lines.
pub type LineWriter<W> = FramedWrite<W, LineCodec>;

/// Opens the serial device named by the config.
pub fn open(cfg: &Config) -> Result<SerialStream, LinkError> {
    tracing::debug!(device = %cfg.device, baud = cfg.baud, "opening serial device");
    tokio_serial::new(&cfg.device, cfg.baud)
        .open_native_async()
        .map_err(|source| LinkError::Open {
            device: cfg.device.clone(),
            baud: cfg.baud,
            source,
        })
}

/// Splits a duplex link into independently owned framed halves.
///
/// Ownership splitting is what lets the writer and reader tasks use one
/// link concurrently without a lock.
pub fn split<L>(link: L) -> (LineReader<ReadHalf<L>>, LineWriter<WriteHalf<L>>)
where
    L: AsyncRead + AsyncWrite,
{
    let (read_half, write_half) = tokio::io::split(link);
    (
        FramedRead::new(read_half, LineCodec::new()),
        FramedWrite::new(write_half, LineCodec::new()),
    )
}
