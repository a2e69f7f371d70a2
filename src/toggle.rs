//! Core binding between a boolean open/closed flag and one URL query
//! parameter.
//!
//! The host router stays external: reads come in through [`QueryParamSource`]
//! and writes go out through [`NavigationUpdater`]. Open/close are expressed
//! as a single [`ToggleIntent`] dispatched through one path, and the URL is
//! the source of truth — whatever the flag holds optimistically, the next
//! re-sync from the source overwrites it.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, trace};

use crate::query::QuerySet;

/// Query parameter used when the caller does not supply one.
pub const DEFAULT_QUERY_PARAM: &str = "create-workspace";

/// The only value that counts as "open". Anything else, including absence,
/// is closed.
pub const OPEN_VALUE: &str = "true";

/// History policy for a shallow navigation update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavigateMode {
    /// Add a history entry (back button reopens/recloses the modal).
    #[default]
    Push,
    /// Replace the current history entry.
    Replace,
}

/// A requested flag transition, dispatched as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleIntent {
    pub desired_open: bool,
}

/// Shallow navigation request handed to the host: the full recomputed query
/// string (no leading `?`) plus the history policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub query: String,
    pub mode: NavigateMode,
}

/// Failure reported by the host's navigation updater. This crate performs no
/// I/O of its own, so nothing here originates locally.
#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("host router rejected navigation: {0}")]
    Rejected(String),
    #[error("malformed navigation target: {0}")]
    MalformedTarget(String),
}

/// Callback invoked with the new query parameter set whenever the ambient
/// navigation state changes.
pub type QueryListener = Box<dyn Fn(&QuerySet)>;

/// Handle identifying one subscription on a [`QueryParamSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Read side of the host router: a snapshot of the current query parameters
/// plus change notifications.
pub trait QueryParamSource {
    /// Current query parameters, or `None` if the host has not produced a
    /// navigation state yet. Absence is treated as an empty set, not an
    /// error.
    fn current(&self) -> Option<QuerySet>;

    /// Register `listener` to be called after every query change.
    fn subscribe(&self, listener: QueryListener) -> SubscriptionId;

    /// Drop a previously registered listener. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Write side of the host router: applies a query-only URL update without a
/// page reload.
pub trait NavigationUpdater {
    fn navigate(&self, request: &NavigationRequest) -> Result<(), NavigationError>;
}

/// True iff `params` maps `query_param` to the literal [`OPEN_VALUE`].
pub fn is_open_in(params: &QuerySet, query_param: &str) -> bool {
    params.get(query_param) == Some(OPEN_VALUE)
}

/// Compute the query set that realizes `intent` on top of `params`.
pub fn apply_intent(params: &QuerySet, query_param: &str, intent: ToggleIntent) -> QuerySet {
    let mut next = params.clone();
    if intent.desired_open {
        next.set(query_param, OPEN_VALUE);
    } else {
        next.remove(query_param);
    }
    next
}

/// Boolean modal state mirrored onto one URL query parameter.
///
/// Construction subscribes to the query source and performs an initial
/// re-sync; dropping the toggle unsubscribes, so the listener's lifetime is
/// scoped to the component's own.
pub struct QueryBoundToggle {
    is_open: Rc<RefCell<bool>>,
    query_param: String,
    mode: NavigateMode,
    source: Rc<dyn QueryParamSource>,
    updater: Rc<dyn NavigationUpdater>,
    subscription: SubscriptionId,
}

impl QueryBoundToggle {
    /// Bind the default query parameter (`create-workspace`).
    pub fn new(source: Rc<dyn QueryParamSource>, updater: Rc<dyn NavigationUpdater>) -> Self {
        Self::with_param(DEFAULT_QUERY_PARAM, source, updater)
    }

    /// Bind a caller-chosen query parameter. The key must be non-empty;
    /// detecting collisions with other URL state is the caller's problem.
    pub fn with_param(
        query_param: impl Into<String>,
        source: Rc<dyn QueryParamSource>,
        updater: Rc<dyn NavigationUpdater>,
    ) -> Self {
        let query_param = query_param.into();
        debug_assert!(!query_param.is_empty(), "query parameter key must be non-empty");

        let is_open = Rc::new(RefCell::new(false));

        let subscription = source.subscribe({
            let is_open = Rc::clone(&is_open);
            let query_param = query_param.clone();
            Box::new(move |params| {
                let open = is_open_in(params, &query_param);
                trace!("re-sync: {}={:?} -> open={}", query_param, params.get(&query_param), open);
                *is_open.borrow_mut() = open;
            })
        });

        // Initial re-sync so the flag agrees with the URL from the start.
        // A source that is not initialized yet reads as an empty set.
        let initial = source.current().unwrap_or_default();
        *is_open.borrow_mut() = is_open_in(&initial, &query_param);

        Self {
            is_open,
            query_param,
            mode: NavigateMode::default(),
            source,
            updater,
            subscription,
        }
    }

    /// Select the history policy used for subsequent navigations.
    pub fn with_navigate_mode(mut self, mode: NavigateMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn query_param(&self) -> &str {
        &self.query_param
    }

    pub fn is_open(&self) -> bool {
        *self.is_open.borrow()
    }

    /// Open the modal and mirror it to the URL.
    pub fn open(&self) -> Result<(), NavigationError> {
        self.dispatch(ToggleIntent { desired_open: true })
    }

    /// Close the modal and drop the parameter from the URL. Safe to call
    /// when the key is already absent.
    pub fn close(&self) -> Result<(), NavigationError> {
        self.dispatch(ToggleIntent { desired_open: false })
    }

    /// Set the flag without touching the URL. The divergence lasts until
    /// the next re-sync overwrites it.
    pub fn set_open(&self, open: bool) {
        *self.is_open.borrow_mut() = open;
    }

    fn dispatch(&self, intent: ToggleIntent) -> Result<(), NavigationError> {
        let current = self.source.current().unwrap_or_default();
        let next = apply_intent(&current, &self.query_param, intent);

        // Optimistic: the re-sync triggered by the navigation owns the
        // final value.
        *self.is_open.borrow_mut() = intent.desired_open;

        let request = NavigationRequest {
            query: next.to_query_string(),
            mode: self.mode,
        };
        debug!("dispatch {}={} -> ?{}", self.query_param, intent.desired_open, request.query);
        self.updater.navigate(&request)
    }
}

impl Drop for QueryBoundToggle {
    fn drop(&mut self) {
        self.source.unsubscribe(self.subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryRouter;

    #[test]
    fn test_is_open_in_accepts_only_literal_true() {
        let param = "create-workspace";
        for (raw, expected) in [
            ("create-workspace=true", true),
            ("create-workspace=false", false),
            ("create-workspace=TRUE", false),
            ("create-workspace=1", false),
            ("create-workspace=", false),
            ("", false),
            ("other=true", false),
        ] {
            let params = QuerySet::parse(raw);
            assert_eq!(is_open_in(&params, param), expected, "query: {:?}", raw);
        }
    }

    #[test]
    fn test_apply_intent_is_idempotent() {
        let params = QuerySet::parse("tab=billing");
        let intent = ToggleIntent { desired_open: true };

        let once = apply_intent(&params, "m", intent);
        let twice = apply_intent(&once, "m", intent);
        assert_eq!(once, twice);
        assert_eq!(once.to_query_string(), "tab=billing&m=true");

        let intent = ToggleIntent { desired_open: false };
        let closed_once = apply_intent(&once, "m", intent);
        let closed_twice = apply_intent(&closed_once, "m", intent);
        assert_eq!(closed_once, closed_twice);
        assert_eq!(closed_once, params);
    }

    #[test]
    fn test_toggle_starts_in_sync_with_the_url() {
        let router = Rc::new(MemoryRouter::with_query("create-workspace=true"));
        let toggle = QueryBoundToggle::new(router.clone(), router.clone());
        assert!(toggle.is_open());

        let router = Rc::new(MemoryRouter::new());
        let toggle = QueryBoundToggle::new(router.clone(), router.clone());
        assert!(!toggle.is_open());
    }

    #[test]
    fn test_uninitialized_source_reads_as_empty() {
        let router = Rc::new(MemoryRouter::uninitialized());
        let toggle = QueryBoundToggle::new(router.clone(), router.clone());
        assert!(!toggle.is_open());

        toggle.open().unwrap();
        assert_eq!(router.current_query(), "create-workspace=true");
    }

    #[test]
    fn test_drop_unsubscribes() {
        let router = Rc::new(MemoryRouter::new());
        let toggle = QueryBoundToggle::new(router.clone(), router.clone());
        assert_eq!(router.listener_count(), 1);

        drop(toggle);
        assert_eq!(router.listener_count(), 0);
    }
}
