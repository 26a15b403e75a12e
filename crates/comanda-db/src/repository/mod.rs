//! # Repository Module
//!
//! Data access layer organized by aggregate:
//!
//! - [`establishment`] - Tenant lookups (read-only to the pipeline)
//! - [`product`] - The Catalog Reader (batched price/availability lookup)
//! - [`order`] - The Order Writer and Friendly-ID Allocator

pub mod establishment;
pub mod order;
pub mod product;
