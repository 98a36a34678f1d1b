//! Pipeline Module
//!
//! Queues messages from many submitters and drives them through one
//! connection, matching every reply to its request.
//!
//! ## Architecture
//! ```text
//!  submitters (any thread)
//!      │ submit(message, priority)
//!      ▼
//! ┌──────────────────────────────┐
//! │ PipelineQueue                │  not yet transmitted
//! │  [priority lane][normal lane]│
//! └──────────────┬───────────────┘
//!                │ writer thread (single)
//!                ▼
//!        MessageSink::send ──────────► server
//!                │
//! ┌──────────────▼───────────────┐
//! │ awaiting (transmission order)│
//! └──────────────┬───────────────┘
//!                │ reader thread: ReplySource::next_reply
//!                ▼
//!         coerce → Completer::complete
//! ```
//!
//! ## Invariants
//! - Reply order equals transmission order; priority only decides what is
//!   transmitted next.
//! - Queue and awaiting record share one `Mutex`.
//! - Every pending result settles exactly once.

mod pending;
mod queue;
mod transport;
mod dispatcher;

pub use pending::{pending_pair, Completer, OperationId, Pending};
pub use queue::{PendingOperation, PipelineQueue};
pub use transport::{MessageSink, ReplySource};
pub use dispatcher::Dispatcher;
