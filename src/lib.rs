//! Governed metric reconciliation over three procurement source systems.
//!
//! Three independently maintained systems (VGS governance, VPC pricing,
//! SI+ implementation tracking) each compute "the same" business metric
//! their own way; the governed calculators reconcile them into one
//! certified value per metric. All computation is pure and synchronous
//! over a read-only, explicitly constructed [`store::RecordStore`].

pub mod compute;
pub mod data;
pub mod definitions;
pub mod dispatch;
pub mod governed;
pub mod lineage;
pub mod logging;
pub mod store;
