//! Verb + exact-path route table
//!
//! Two-level map: verb first, then the literal path. No normalization is
//! applied to paths; `/about` and `/about/` are different routes.

use super::verb::HttpVerb;
use crate::config::NOT_FOUND_BODY;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Zero-argument handler producing a response body
pub type Action = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Default)]
pub struct RouteTable {
    routes: HashMap<HttpVerb, HashMap<String, Action>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the action for `(verb, path)`
    pub fn register<F>(&mut self, verb: HttpVerb, path: impl Into<String>, action: F)
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        let path = path.into();
        let by_path = self.routes.entry(verb).or_default();
        if by_path.insert(path.clone(), Arc::new(action)).is_some() {
            debug!(%verb, %path, "Route replaced");
        } else {
            debug!(%verb, %path, "Route registered");
        }
    }

    /// Handle to the action registered for `(verb, path)`
    pub fn action(&self, verb: HttpVerb, path: &str) -> Option<Action> {
        self.routes.get(&verb)?.get(path).cloned()
    }

    /// Run the matching action, or `None` when nothing is registered
    pub fn try_dispatch_verb(&self, verb: HttpVerb, path: &str) -> Option<String> {
        let action = self.routes.get(&verb)?.get(path)?;
        Some(action())
    }

    /// Like [`try_dispatch_verb`](Self::try_dispatch_verb) with a textual verb
    pub fn try_dispatch(&self, verb: &str, path: &str) -> Option<String> {
        let Some(verb) = HttpVerb::parse(verb) else {
            trace!(verb, "Unknown verb");
            return None;
        };
        self.try_dispatch_verb(verb, path)
    }

    pub fn dispatch_verb(&self, verb: HttpVerb, path: &str) -> String {
        self.try_dispatch_verb(verb, path)
            .unwrap_or_else(|| not_found(verb.as_str(), path))
    }

    /// Dispatch a request; unknown verbs and paths both yield `404 Not Found`
    pub fn dispatch(&self, verb: &str, path: &str) -> String {
        self.try_dispatch(verb, path)
            .unwrap_or_else(|| not_found(verb, path))
    }

    /// Registered `(verb, path)` pairs, ordered by verb then path
    pub fn routes(&self) -> Vec<(HttpVerb, String)> {
        let mut ordered: BTreeMap<HttpVerb, Vec<&String>> = BTreeMap::new();
        for (verb, by_path) in &self.routes {
            let paths = ordered.entry(*verb).or_default();
            paths.extend(by_path.keys());
        }

        ordered
            .into_iter()
            .flat_map(|(verb, mut paths)| {
                paths.sort();
                paths.into_iter().map(move |path| (verb, path.clone()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn not_found(verb: &str, path: &str) -> String {
    debug!(verb, path, "No route matched");
    NOT_FOUND_BODY.to_string()
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes())
            .finish()
    }
}

/// Route table behind a reader/writer lock
///
/// Registration takes the write lock. Dispatch holds the read lock only
/// long enough to look the action up, so actions may register routes on
/// the same table.
#[derive(Debug, Clone, Default)]
pub struct SharedRouteTable {
    inner: Arc<RwLock<RouteTable>>,
}

impl SharedRouteTable {
    pub fn new(table: RouteTable) -> Self {
        Self {
            inner: Arc::new(RwLock::new(table)),
        }
    }

    pub fn register<F>(&self, verb: HttpVerb, path: impl Into<String>, action: F)
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.inner.write().register(verb, path, action);
    }

    pub fn dispatch(&self, verb: &str, path: &str) -> String {
        let action = HttpVerb::parse(verb).and_then(|verb| self.inner.read().action(verb, path));
        match action {
            Some(action) => action(),
            None => not_found(verb, path),
        }
    }

    pub fn dispatch_verb(&self, verb: HttpVerb, path: &str) -> String {
        let action = self.inner.read().action(verb, path);
        match action {
            Some(action) => action(),
            None => not_found(verb.as_str(), path),
        }
    }

    pub fn routes(&self) -> Vec<(HttpVerb, String)> {
        self.inner.read().routes()
    }
}

impl From<RouteTable> for SharedRouteTable {
    fn from(table: RouteTable) -> Self {
        Self::new(table)
    }
}

/// Demonstration table used by the CLI
///
/// PUT is intentionally left unregistered so PUT requests show the
/// not-found fallback.
pub fn demo_routes() -> RouteTable {
    let mut table = RouteTable::new();
    table.register(HttpVerb::Get, "/", || "Welcome to the home page!".to_string());
    table.register(HttpVerb::Get, "/about", || "This is the about page.".to_string());
    table.register(HttpVerb::Post, "/submit", || "Form submitted successfully!".to_string());
    table.register(HttpVerb::Delete, "/resource", || "Resource deleted.".to_string());
    table
}
