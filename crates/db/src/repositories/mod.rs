mod transaction_repo;

pub use transaction_repo::TransactionRepo;
