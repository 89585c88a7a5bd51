//! Report rendering and output.
//!
//! A [`DatasetReport`](crate::types::DatasetReport) is rendered to a fixed
//! text layout:
//!
//! ```text
//! ==== OVERALL ====
//! <column>:
//!   <stat_key>: <value>
//!
//! ==== GROUP: [<k1>, <k2>] = [<v1>, <v2>] ====
//! <column>:
//!   <stat_key>: <value>
//! ```
//!
//! Columns follow schema order and floats use their shortest round-trip
//! representation, so reports are byte-stable across runs and backends.
//! The same report serializes to JSON for `--json` output.

mod writer;

pub use writer::{ReportWriter, render_report};
