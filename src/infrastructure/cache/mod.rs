//! Cache infrastructure - L1 tier and durable store implementations

mod factory;
mod in_memory;
mod l1;
mod postgres;
mod sqlite;

pub use factory::{StoreConfig, StoreFactory, StoreType};
pub use in_memory::InMemoryStore;
pub use l1::{EvictionPolicy, L1Cache};
pub use postgres::{PostgresConfig, PostgresStore};
pub use sqlite::{SqliteConfig, SqliteStore};
