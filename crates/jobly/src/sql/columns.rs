use crate::error::{JoblyError, JoblyResult};
use crate::ident::{Ident, IntoIdent};
use std::collections::BTreeMap;

/// Translation table from application field names to storage column names.
///
/// Resolution is a total function: a mapped field resolves to its column, an
/// unmapped field resolves to itself. A *closed* map instead rejects unmapped
/// fields, which is what resources exposed to clients should use so that
/// client-supplied keys never become identifiers on their own.
///
/// # Example
/// ```ignore
/// let cols = ColumnMap::closed()
///     .column("title")?
///     .rename("companyHandle", "company_handle")?;
///
/// assert_eq!(cols.resolve("companyHandle")?.as_str(), "company_handle");
/// assert!(cols.resolve("id").is_err());
/// # Ok::<(), jobly::JoblyError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: BTreeMap<String, Ident>,
    closed: bool,
}

impl ColumnMap {
    /// An open map: unmapped fields resolve to themselves.
    pub fn new() -> Self {
        Self::default()
    }

    /// A closed map: only registered fields resolve.
    pub fn closed() -> Self {
        Self {
            columns: BTreeMap::new(),
            closed: true,
        }
    }

    /// Map `field` to a differently named `column`.
    pub fn rename(mut self, field: impl Into<String>, column: impl IntoIdent) -> JoblyResult<Self> {
        self.columns.insert(field.into(), column.into_ident()?);
        Ok(self)
    }

    /// Register a field whose column has the same name.
    pub fn column(self, name: &str) -> JoblyResult<Self> {
        self.rename(name, name)
    }

    /// Build an open map from `(field, column)` pairs.
    ///
    /// Fails on the first column that is not a valid identifier.
    pub fn from_pairs<I, K, V>(pairs: I) -> JoblyResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIdent,
    {
        pairs
            .into_iter()
            .try_fold(Self::new(), |cols, (field, column)| cols.rename(field, column))
    }

    /// Whether unmapped fields are rejected.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Resolve a field name to the column it is stored in.
    pub fn resolve(&self, field: &str) -> JoblyResult<Ident> {
        match self.columns.get(field) {
            Some(column) => Ok(column.clone()),
            None if self.closed => Err(JoblyError::validation(format!(
                "Unknown field: {field}"
            ))),
            None => Ident::parse(field),
        }
    }
}
