//! Core data models for parsed proxy configurations
//!
//! This module contains the record type every protocol parser produces and
//! the import/batch wrappers the subscription pipeline builds on top of it,
//! separated from the logic that operates on them.

mod config_record;
mod imported;

pub use config_record::*;
pub use imported::*;
