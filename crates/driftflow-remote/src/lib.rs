//! driftflow live-state retrieval
//!
//! ```text
//! Scanner ──join_all──▶ Supplier (one per resource type)
//!                          │
//!                          ├─ Enumerator      list ids
//!                          ├─ ResourceReader  read each id  ┐ ParallelResourceReader
//!                          └─ Deserializer    raw → Resource┘ (bounded, fail-fast)
//! ```
//!
//! A failure inside one type stops that type's remaining reads. Other
//! types keep going, and the scan reports which ones failed.

pub mod error;
pub mod parallel;
pub mod reader;
pub mod scanner;
pub mod snapshot;
pub mod supplier;

// Re-exports
pub use error::{RemoteError, Result};
pub use parallel::{DEFAULT_PARALLELISM, ParallelResourceReader};
pub use reader::{Deserializer, Enumerator, JsonDeserializer, ReadResourceArgs, ResourceReader};
pub use scanner::{ScanFailure, ScanResult, Scanner};
pub use snapshot::{Snapshot, SnapshotEnumerator, SnapshotReader, snapshot_suppliers};
pub use supplier::{ResourceSupplier, Supplier};
