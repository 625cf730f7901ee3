//! Generic persistence over one SQLite file per tenant.

pub mod access;
pub mod error;
pub mod executor;
pub mod mapper;
pub mod naming;
pub mod page;
pub mod schema;
pub mod tenant;
pub mod upsert;

pub use access::DatabaseAccess;
pub use error::{StoreError, StoreResult};
pub use executor::{Executor, RawRow};
pub use page::Page;
pub use tenant::{TenantStore, DEFAULT_TENANT};
