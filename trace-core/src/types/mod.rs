//! Domain types for the provenance ledger

mod actor;
mod common;
mod record;

pub use actor::*;
pub use common::*;
pub use record::*;
