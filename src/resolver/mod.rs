//! Content resolution for the public site.
//!
//! Every public section is produced by overlaying whatever the record store
//! returned onto literal defaults. Resolution never fails: a pending or
//! failed lookup yields the defaults for singleton sections and an empty
//! list for collections.

pub mod icons;
pub mod messaging;
pub mod sections;
pub mod views;

pub use sections::{resolve_section, SectionKey};

/// State of an asynchronous content lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    /// No data yet (the lookup has not answered in time).
    Pending,
    Resolved(T),
    Failed(String),
}

impl<T> Fetch<T> {
    pub fn resolved(self) -> Option<T> {
        match self {
            Fetch::Resolved(value) => Some(value),
            Fetch::Pending | Fetch::Failed(_) => None,
        }
    }
}

/// Rows exactly as delivered when resolved, otherwise nothing. Lists never
/// get placeholder items.
pub fn resolve_collection<T, V, F>(fetch: Fetch<Vec<T>>, to_view: F) -> Vec<V>
where
    F: FnMut(T) -> V,
{
    fetch
        .resolved()
        .map(|rows| rows.into_iter().map(to_view).collect())
        .unwrap_or_default()
}
