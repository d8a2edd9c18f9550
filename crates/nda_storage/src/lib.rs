pub mod backends;

pub use backends::{MemoryStore, PgStore};

pub mod prelude {
    pub use super::backends::{MemoryStore, PgStore};
    pub use nda_core::storage::Store;
}
