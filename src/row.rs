//! Synthetic rows.

use std::fmt;

/// A generated `(name, email)` pair.
///
/// Rows are derived from a strategy tag and an index so that strategies
/// sharing one table never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticRow {
    pub name: String,
    pub email: String,
}

impl SyntheticRow {
    /// Build the row for `tag` at `index`.
    ///
    /// ```
    /// use poolbench::row::SyntheticRow;
    ///
    /// let row = SyntheticRow::new("Pool", 7);
    /// assert_eq!(row.name, "UserPool7");
    /// assert_eq!(row.email, "pool7@example.com");
    /// ```
    pub fn new(tag: &str, index: u64) -> Self {
        Self {
            name: format!("User{}{}", tag, index),
            email: format!("{}{}@example.com", tag.to_lowercase(), index),
        }
    }

    /// Name prefix shared by every row of `tag`.
    pub fn name_prefix(tag: &str) -> String {
        format!("User{}", tag)
    }
}

impl fmt::Display for SyntheticRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}
