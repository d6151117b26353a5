pub mod product_repository;

pub use product_repository::{
    ProductRepository, RepositoryError, RepositoryResult, SellOutcome, COUNTER_KEY,
};
