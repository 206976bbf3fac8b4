//! # Repository Module
//!
//! Database repository implementations.
//!
//! Repositories keep all SQL in one place behind a plain-Rust API:
//!
//! - [`product::ProductRepository`] - inventory CRUD and the name-ordered
//!   listing
//! - [`sale::SaleRepository`] - the atomic checkout plus sale history
//!   reads

pub mod product;
pub mod sale;
