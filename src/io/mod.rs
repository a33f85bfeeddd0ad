/// CSV export of per-unit histories.
pub mod export;
