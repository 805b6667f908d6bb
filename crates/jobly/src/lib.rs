//! # jobly
//!
//! The jobs resource of a job-board backend, over PostgreSQL.
//!
//! ## Pieces
//!
//! - **SQL builders** ([`sql`]): turn a client-supplied field map into a
//!   parameterized `SET` list ([`sql::partial_update`]) or `WHERE` predicates
//!   ([`job::job_filter`]). Values are always bound; only column names from a
//!   [`sql::ColumnMap`] are written into SQL text.
//! - **Job model** ([`job`]): create, list, filter, get, update and remove.
//! - **Handlers** ([`api::jobs`]): route semantics without an HTTP server:
//!   authorization, JSON Schema validation, error rendering.
//! - **Plumbing**: the [`GenericClient`] executor trait, a `deadpool` pool
//!   and embedded `refinery` migrations.
//!
//! ## Example
//!
//! ```ignore
//! use jobly::{api, auth::Actor};
//! use serde_json::json;
//!
//! let pool = jobly::create_pool(&database_url)?;
//! let client = pool.get().await?;
//! jobly::migrate::run_pool(&pool).await?;
//!
//! let admin = Actor::admin("root");
//! let res = api::jobs::update(&client, &admin, "7", &json!({"salary": 120000})).await;
//! assert_eq!(res.status, 200);
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod ident;
pub mod job;
pub mod row;
pub mod sql;
pub mod validate;

pub use auth::{Actor, Capability};
pub use client::GenericClient;
pub use error::{JoblyError, JoblyResult};
pub use ident::{Ident, IntoIdent};
pub use job::{Job, JobDetail, JobListing, NewJob};
pub use row::{FromRow, RowExt};
pub use sql::{BindValue, ColumnMap, Query, SqlFragment, query};
pub use validate::{Schema, ValidationReport};

#[cfg(feature = "pool")]
pub mod pool;
#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};

#[cfg(feature = "migrate")]
pub mod migrate;
