//! Bounded guards for background work deduplication

mod ttl;

pub use ttl::TtlGuard;
