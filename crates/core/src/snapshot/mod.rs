//! Normalized in-memory snapshot of the workbook and its published state.

mod snapshot_model;
mod snapshot_store;

pub use snapshot_model::*;
pub use snapshot_store::*;
