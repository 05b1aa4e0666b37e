//! Event loop, sampling and state reconciliation

pub mod app;
pub mod events;
pub mod reconcile;
pub mod scheduler;
pub mod state;
