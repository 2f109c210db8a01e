//! Serial link: device open and line framing.

mod codec;
mod port;

pub use codec::LineCodec;
pub use port::{LineReader, LineWriter, open, split};
