use super::value::BindValue;

/// A piece of SQL text with 1-based `$N` placeholders and the values bound to them.
///
/// `values[k - 1]` is the value for `$k`. Fragments are meant to be spliced
/// into a larger statement; when the statement adds its own parameters after
/// the fragment, they continue at `$(values.len() + 1)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    pub fragment: String,
    pub values: Vec<BindValue>,
}

impl SqlFragment {
    /// Whether the fragment contains no SQL at all.
    pub fn is_empty(&self) -> bool {
        self.fragment.is_empty()
    }

    /// Index the next parameter appended after this fragment must use.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// Count the distinct `$N` placeholders referenced by the fragment text.
    ///
    /// Text inside double-quoted identifiers is skipped.
    #[cfg(test)]
    pub(crate) fn placeholder_count(&self) -> usize {
        let mut seen = std::collections::BTreeSet::new();
        let bytes = self.fragment.as_bytes();
        let mut in_ident = false;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'"' => {
                    in_ident = !in_ident;
                    i += 1;
                }
                b'$' if !in_ident => {
                    let start = i + 1;
                    let mut end = start;
                    while end < bytes.len() && bytes[end].is_ascii_digit() {
                        end += 1;
                    }
                    if let Ok(n) = self.fragment[start..end].parse::<usize>() {
                        seen.insert(n);
                    }
                    i = end.max(start);
                }
                _ => i += 1,
            }
        }
        seen.len()
    }
}

/// Accumulates clauses and their bind values, numbering placeholders as it goes.
///
/// The placeholder index is derived from the number of values already
/// collected, so a clause that is never pushed never consumes an index.
#[derive(Debug, Default)]
pub(crate) struct FragmentBuilder {
    clauses: Vec<String>,
    values: Vec<BindValue>,
}

impl FragmentBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Push a clause rendered with the next placeholder, binding `value` to it.
    pub(crate) fn push_bound(
        &mut self,
        render: impl FnOnce(&str) -> String,
        value: BindValue,
    ) -> &mut Self {
        let placeholder = format!("${}", self.values.len() + 1);
        self.clauses.push(render(&placeholder));
        self.values.push(value);
        self
    }

    /// Join the clauses with `separator`.
    pub(crate) fn finish(self, separator: &str) -> SqlFragment {
        SqlFragment {
            fragment: self.clauses.join(separator),
            values: self.values,
        }
    }
}
