//! Core contracts shared by the modelfaker crates.
//!
//! Defines the record and value types the fakers operate on, the selection
//! language used by deletion/update filters, and the `DataStore` seam the
//! orchestration engine persists through.

pub mod error;
pub mod memory;
pub mod record;
pub mod selection;
pub mod store;
pub mod value;

pub use error::{Result, StoreError};
pub use memory::{Dataset, MemoryStore, ModelSnapshot, RecordSnapshot};
pub use record::{Record, RecordId};
pub use selection::{Predicate, Selection};
pub use store::{DataStore, Uniqueness};
pub use value::Value;
