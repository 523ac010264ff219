pub mod entities;
pub mod transactions;
