//! Wire definitions for the vim managed-object API.
//! Kept free of any I/O so the data model can be shared by the SDK, the CLI
//! and test stubs without pulling in the HTTP stack.

pub mod methods;
pub mod mo;
pub mod reference;
pub mod types;

pub use methods::Method;
pub use reference::ManagedObjectReference;
