//! SQL fragment builders and the pre-numbered query executor.
//!
//! Client-supplied mappings (request bodies, query strings) are turned into
//! [`SqlFragment`]s: SQL text with `$1, $2, ...` placeholders plus the
//! aligned list of [`BindValue`]s. Values always travel out-of-band; only
//! column names resolved through a [`ColumnMap`] are written into SQL text.
//!
//! # Example
//!
//! ```ignore
//! use jobly::sql::{ColumnMap, Query, partial_update};
//!
//! let set = partial_update(&payload, &ColumnMap::new())?;
//! let id_idx = set.next_placeholder();
//! let job: Job = Query::from_fragment(set, |set| {
//!     format!("UPDATE jobs SET {set} WHERE id = ${id_idx} RETURNING *")
//! })
//! .bind(id)
//! .fetch_one_as(&conn)
//! .await?;
//! ```

mod columns;
mod fragment;
mod query;
mod update;
mod value;

#[cfg(test)]
mod tests;

pub use columns::ColumnMap;
pub use fragment::SqlFragment;
pub(crate) use fragment::FragmentBuilder;
pub use query::Query;
pub use update::partial_update;
pub use value::BindValue;

/// Build a SQL query from a pre-numbered SQL string (`$1, $2, ...`).
pub fn query(initial_sql: impl Into<String>) -> Query {
    Query::new(initial_sql)
}
