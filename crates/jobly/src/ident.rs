//! Safe SQL column identifier handling.
//!
//! Postgres cannot bind identifiers as parameters, so every column name that
//! ends up in generated SQL text goes through [`Ident`] first.
//!
//! - Names are validated against: `[A-Za-z_][A-Za-z0-9_$]*`
//! - Rendering always double-quotes the name (`"company_handle"`)
//!
//! # Example
//! ```ignore
//! use jobly::Ident;
//!
//! let c = Ident::parse("company_handle")?;
//! assert_eq!(c.to_sql(), r#""company_handle""#);
//! # Ok::<(), jobly::JoblyError>(())
//! ```

use crate::error::{JoblyError, JoblyResult};
use std::fmt;

/// A validated, single-part SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ident(String);

impl Ident {
    /// Parse and validate an identifier.
    pub fn parse(s: &str) -> JoblyResult<Self> {
        if s.is_empty() {
            return Err(JoblyError::validation("Identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(JoblyError::validation(
                "Identifier cannot contain NUL character",
            ));
        }

        for (i, c) in s.chars().enumerate() {
            let ok = if i == 0 {
                c == '_' || c.is_ascii_alphabetic()
            } else {
                c == '_' || c == '$' || c.is_ascii_alphanumeric()
            };
            if !ok {
                return Err(JoblyError::validation(if i == 0 {
                    format!("Invalid identifier start character: '{c}'")
                } else {
                    format!("Invalid character in identifier: '{c}'")
                }));
            }
        }

        Ok(Self(s.to_string()))
    }

    /// The bare identifier name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the identifier as quoted SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::with_capacity(self.0.len() + 2);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        // Validation rules out `"`, so no escaping is needed.
        out.push('"');
        out.push_str(&self.0);
        out.push('"');
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Convert an input into an [`Ident`].
///
/// This is mainly for ergonomics in builder APIs.
pub trait IntoIdent {
    fn into_ident(self) -> JoblyResult<Ident>;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> JoblyResult<Ident> {
        Ok(self)
    }
}

impl IntoIdent for &Ident {
    fn into_ident(self) -> JoblyResult<Ident> {
        Ok(self.clone())
    }
}

impl IntoIdent for &str {
    fn into_ident(self) -> JoblyResult<Ident> {
        Ident::parse(self)
    }
}

impl IntoIdent for String {
    fn into_ident(self) -> JoblyResult<Ident> {
        Ident::parse(&self)
    }
}
