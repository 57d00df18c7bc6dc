//! Pure computation over roster + expense snapshots. No I/O, no storage
//! access; callers pass explicit snapshots and get fresh values back.

pub mod aggregator;
pub mod amount;
pub mod monthly;
pub mod settlement;
