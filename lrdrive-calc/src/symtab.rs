//! # symtab
//!
//! Variable storage for the calculator, built on [`indexmap::IndexMap`] so
//! that variables are listed in the order they were first assigned.
//!
//! ## Example
//! ```rust
//! # use lrdrive_calc::SymTab;
//! let mut st = SymTab::new();
//! st.assign("foo", 42);
//! assert_eq!(st.lookup("foo"), Some(42));
//! assert_eq!(st.lookup("bar"), None);
//! ```

use indexmap::IndexMap;
use smartstring::alias::String;

/// Maps variable names to integer values, in first-assignment order.
#[derive(Debug, Default)]
pub struct SymTab {
    tab: IndexMap<String, i64>,
}

impl SymTab {
    pub fn new() -> Self {
        Self {
            tab: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tab.is_empty()
    }

    /// Stores `value` under `name`. A reassigned name keeps its position.
    pub fn assign(&mut self, name: &str, value: i64) {
        self.tab.insert(String::from(name), value);
    }

    /// The value of `name`, or `None` if it was never assigned.
    pub fn lookup(&self, name: &str) -> Option<i64> {
        self.tab.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.tab.iter().map(|(name, value)| (name.as_str(), *value))
    }
}
