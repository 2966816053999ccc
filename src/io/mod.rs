/// CSV export of per-hour simulation records.
pub mod export;
