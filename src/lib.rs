//! sercon: a bidirectional line-oriented serial console.
//!
//! Two workers share one serial link: the writer relays operator-typed
//! lines to the device, the reader prints lines the device sends back.
//! A supervisor owns the link lifecycle and closes it exactly once when
//! either worker stops or a termination signal arrives.
//!
//! ```text
//! operator input ──► writer ──► link ──► device
//! operator output ◄── reader ◄── link ◄── device
//!                      ▲
//!              supervisor: liveness monitor + close sequence
//! ```
//!
//! The two flows are causally independent; no ordering is guaranteed
//! between outbound and inbound lines. The link is made safe for
//! concurrent use by splitting it into separately owned halves, not by
//! locking.

pub mod config;
pub mod error;
pub mod link;
pub mod operator;
pub mod reader;
pub mod signals;
pub mod status;
pub mod supervisor;
pub mod writer;

pub use config::Config;
pub use error::{ConfigError, LinkError};
pub use operator::{OperatorInput, OperatorOutput};
pub use status::{StatusProbe, WorkerStatus};
pub use supervisor::Supervisor;
