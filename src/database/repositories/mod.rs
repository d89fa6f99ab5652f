pub mod account_repository;
pub mod customer_repository;
pub mod operation_repository;

pub use account_repository::AccountRepository;
pub use customer_repository::CustomerRepository;
pub use operation_repository::OperationRepository;
