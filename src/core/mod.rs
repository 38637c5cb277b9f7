//! Core business logic - framework-agnostic allocation, reconciliation, and
//! ingestion operations.

/// Allocation engine: percentage and priority distribution of expected generation
pub mod allocation;
/// Non-compensated-consumption reconciler and per-month cache
pub mod consumo;
/// Discount policy table and contract auto-fill
pub mod discount;
/// Generator registry
pub mod generator;
/// Invoice ingestion coordinator and validation queue
pub mod ingestion;
/// Rateio persistence and retrieval
pub mod rateio;
/// Subscriber registry and plan contracts
pub mod subscriber;
