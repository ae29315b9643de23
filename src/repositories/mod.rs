pub mod orders;

pub use orders::{InMemoryOrderRepository, OrderRepository, RepositoryError};
