//! # Repository Pattern
//!
//! Each store gets its own repository struct cloning the shared pool:
//!
//! - [`ProductRepository`] - catalog rows plus the guarded quantity column
//! - [`CustomerRepository`] - customer directory CRUD
//! - [`SaleRepository`] - append-only sale log, transactional with stock

pub mod customer;
pub mod product;
pub mod sale;

pub use customer::CustomerRepository;
pub use product::ProductRepository;
pub use sale::SaleRepository;
