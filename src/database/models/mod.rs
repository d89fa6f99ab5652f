pub mod account;
pub mod customer;
pub mod operation;

pub use account::{AccountKind, AccountStatus, BankAccount};
pub use customer::Customer;
pub use operation::{AccountOperation, OperationType};
