//! Name-based selection from provider listings
//!
//! Zone and record lookups both scan the full listing and keep the **last**
//! entry whose name matches exactly. Later duplicates overwrite earlier ones.

use crate::types::{Record, Zone};

/// Entities that can be selected by exact name
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Zone {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Record {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Select the last item whose name equals `target`
///
/// Returns `None` when nothing matches; absence is left to the caller.
pub fn select_last_named<T: Named>(items: Vec<T>, target: &str) -> Option<T> {
    items.into_iter().filter(|item| item.name() == target).last()
}
