//! Newline-delimited ASCII codec for the line protocol.
//!
//! Both directions of the console use this codec: outbound lines get the
//! `\n` terminator appended on encode, inbound bytes are buffered until a
//! terminator arrives. Device lines are stripped of surrounding whitespace
//! after decode; operator keystrokes are decoded verbatim so typed padding
//! reaches the wire. Works over any AsyncRead/AsyncWrite.

use tokio_util::bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::LinkError;

/// Codec for newline-terminated ASCII lines.
///
/// Any byte outside the ASCII range, in either direction, is a
/// [`LinkError::NotAscii`].
#[derive(Debug)]
pub struct LineCodec {
    trim: bool,
}

impl LineCodec {
    /// Codec for device lines: surrounding whitespace is stripped after
    /// decode.
    pub fn new() -> Self {
        Self { trim: true }
    }

    /// Codec for operator keystrokes: only the line terminator (and a
    /// preceding `\r`) is stripped, typed whitespace is kept.
    pub fn verbatim() -> Self {
        Self { trim: false }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = LinkError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, LinkError> {
        let Some(pos) = src.iter().position(|&b| b == b'\n') else {
            return Ok(None);
        };
        let line = src.split_to(pos + 1);
        self.decode_line(&line).map(Some)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, LinkError> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None if src.is_empty() => Ok(None),
            None => {
                // Unterminated tail at stream end: emit what arrived.
                let rest = src.split();
                self.decode_line(&rest).map(Some)
            }
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = LinkError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), LinkError> {
        if !line.is_ascii() {
            return Err(LinkError::NotAscii);
        }
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

impl LineCodec {
    fn decode_line(&self, bytes: &[u8]) -> Result<String, LinkError> {
        if !bytes.is_ascii() {
            return Err(LinkError::NotAscii);
        }
        // ASCII is a UTF-8 subset, so the conversion is lossless here.
        let text = String::from_utf8_lossy(bytes);
        let line = if self.trim {
            text.trim()
        } else {
            let line = text.strip_suffix('\n').unwrap_or(&text);
            line.strip_suffix('\r').unwrap_or(line)
        };
        Ok(line.to_string())
    }
}
