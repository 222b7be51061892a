//! Command output rendering.
//!
//! - `OutputWriter`: renders reports, inventories and split plans as text, JSON or NDJSON
//! - `InventoryEntry`, `RuleInfo`: serializable rows for `list` and `rules`

mod writer;

pub use writer::{InventoryEntry, OutputWriter, ReportSummary, RuleInfo};
