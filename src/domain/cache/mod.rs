//! Cache domain - entries, tiers and the durable store abstraction

mod entry;
mod store;

pub use entry::{CacheEntry, Tier};
pub use store::CacheStore;

#[cfg(test)]
pub use store::mock::MockCacheStore;
