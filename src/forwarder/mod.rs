//! Event forwarding to the remote ingestion endpoint
//!
//! - `payload`: NDJSON bulk body with bounded size
//! - `transport`: blocking HTTP POST behind the `Transport` trait
//! - `forward`: the `EventForwarder` hook with its reentrancy guard

mod forward;
mod payload;
mod transport;

pub use forward::{EventForwarder, ForwardOutcome};
pub use payload::{build_payload, payload_overhead, Payload, INDEX_NAME, PAYLOAD_BUFFER_SIZE};
pub use transport::{HttpTransport, Transport, TransportError};
