//! Sync pipeline: normalize, filter, reconcile and orchestrate.

pub mod config;
pub mod filter;
pub mod log;
pub mod normalize;
pub mod reconcile;
pub mod status;
pub mod sync;
