//! # comanda-db: Database Layer for Comanda
//!
//! SQLite persistence for the order pipeline.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   apps/api (HTTP handlers)                                              │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   comanda-db (THIS CRATE)                                               │
//! │   ├── pool         Connection pool + WAL configuration                  │
//! │   ├── migrations   Embedded schema migrations                           │
//! │   └── repository                                                        │
//! │       ├── establishment   Tenant records (read-only to the pipeline)    │
//! │       ├── product         Catalog Reader (batched resolve)              │
//! │       └── order           Order Writer + Friendly-ID Allocator          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   SQLite (WAL mode, foreign keys on)                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The One Place Mutual Exclusion Matters
//! Order creation for a single establishment must serialize friendly-id
//! allocation. This crate implements it as MAX+1 inside the insert
//! transaction, backstopped by a unique `(establishment_id, friendly_id)`
//! constraint with bounded retry. See [`repository::order`].

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::establishment::EstablishmentRepository;
pub use repository::order::{CreatedOrder, OrderRepository, OrderWithLines};
pub use repository::product::ProductRepository;
