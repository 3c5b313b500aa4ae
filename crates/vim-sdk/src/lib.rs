//! Asynchronous client for the vim managed-object API.
//!
//! The crate has two layers: a small runtime (`Client` over a
//! [`RoundTripper`]) that encodes requests and maps remote faults, and thin
//! object handles in [`object`] that turn method arguments into request
//! bodies and wrap returned references in new handles.

mod client;
mod error;
pub mod http;
pub mod object;
pub mod transport;

pub use client::Client;
pub use error::{VimError, VimResult};
pub use http::{HttpTransport, HttpTransportOptions};
pub use object::{
    Common, Folder, HostSystem, HttpNfcLease, Reference, ResourcePool, Task, VirtualApp,
};
pub use transport::{InMemoryTransport, RecordedCall, RoundTripper};
pub use vim_proto as proto;
