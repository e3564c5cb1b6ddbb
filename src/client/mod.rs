//! Chat widget logic: conversation state, highlight selection and the
//! transport to the relay.

pub mod session;
pub mod transport;

pub use session::{ChatSession, Highlight, MediaKind, Message, PendingSend, SendOutcome, Sender};
pub use transport::{HttpRelayClient, RelayTransport};
