//! Operator terminal boundary.
//!
//! Two halves, so the writer and reader tasks each own their side of the
//! terminal: [`OperatorInput`] prompts and reads typed lines,
//! [`OperatorOutput`] prints lines received from the device.

use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, Stdin, Stdout};
use tokio_util::codec::FramedRead;

use crate::error::LinkError;
use crate::link::LineCodec;

pub const PROMPT: &str = "Send to ESP32: ";
pub const RECEIVED_PREFIX: &str = "Received from ESP32: ";

/// Operator input: prompts on one stream, reads lines from another.
pub struct OperatorInput<R, P> {
    lines: FramedRead<R, LineCodec>,
    prompt: P,
}

impl OperatorInput<Stdin, Stdout> {
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, P> OperatorInput<R, P>
where
    R: AsyncRead + Unpin,
    P: AsyncWrite + Unpin,
{
    pub fn new(input: R, prompt: P) -> Self {
        // Verbatim decode: typed whitespace belongs to the message and is
        // transmitted as-is.
        Self {
            lines: FramedRead::new(input, LineCodec::verbatim()),
            prompt,
        }
    }

    /// Prompts the operator and awaits one line of input.
    ///
    /// Returns `Ok(None)` once the input stream is exhausted.
    pub async fn prompt_and_read_line(&mut self) -> Result<Option<String>, LinkError> {
        self.prompt.write_all(PROMPT.as_bytes()).await?;
        self.prompt.flush().await?;
        self.lines.next().await.transpose()
    }
}

/// Operator output: prints lines received from the device.
pub struct OperatorOutput<W> {
    out: W,
}

impl OperatorOutput<Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> OperatorOutput<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub async fn print_line(&mut self, line: &str) -> Result<(), LinkError> {
        self.out.write_all(format_received(line).as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await?;
        Ok(())
    }
}

/// Renders one received line for the operator.
pub fn format_received(line: &str) -> String {
    format!("{RECEIVED_PREFIX} {line}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[test]
    fn received_line_rendering() {
        insta::assert_snapshot!(format_received("hello"), @"Received from ESP32:  hello");
    }

    #[tokio::test]
    async fn prompt_precedes_each_line() {
        let (mut prompt_far, prompt_near) = tokio::io::duplex(64);
        let mut input = OperatorInput::new(&b"hello\n"[..], prompt_near);

        let line = input.prompt_and_read_line().await.unwrap();
        assert_eq!(line.as_deref(), Some("hello"));

        let mut buf = [0u8; 15];
        prompt_far.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, PROMPT.as_bytes());
    }

    #[tokio::test]
    async fn end_of_input_yields_none() {
        let mut input = OperatorInput::new(&b""[..], tokio::io::sink());
        assert!(input.prompt_and_read_line().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn print_line_writes_prefixed_line() {
        let (near, mut far) = tokio::io::duplex(64);
        let mut output = OperatorOutput::new(near);
        output.print_line("hello").await.unwrap();
        drop(output);

        let mut rendered = String::new();
        far.read_to_string(&mut rendered).await.unwrap();
        assert_eq!(rendered, "Received from ESP32:  hello\n");
    }
}
