pub mod account_service;
pub mod customer_service;

pub use account_service::{AccountError, AccountService};
pub use customer_service::{CustomerError, CustomerService};
