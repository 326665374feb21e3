mod repository;

pub use repository::MemoryTransactionStore;
