//! Dioxus hook mirroring modal visibility onto a URL query parameter.
//!
//! The host app stays in charge of its router: it feeds the current query
//! string in as a reactive signal and receives [`NavigationRequest`]s back
//! through a callback, which it applies as a shallow (query-only) update.

use dioxus::prelude::*;
use tracing::{debug, trace};

use crate::query::QuerySet;
use crate::toggle::{
    apply_intent, is_open_in, NavigateMode, NavigationRequest, ToggleIntent, DEFAULT_QUERY_PARAM,
};

/// Construction options for [`use_query_modal_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryModalOptions {
    /// Query parameter carrying the flag. Must be non-empty.
    pub query_param: String,
    /// History policy for the shallow updates.
    pub mode: NavigateMode,
}

impl Default for QueryModalOptions {
    fn default() -> Self {
        Self {
            query_param: DEFAULT_QUERY_PARAM.to_string(),
            mode: NavigateMode::default(),
        }
    }
}

/// Handle returned by [`use_query_modal`].
///
/// `Copy`, so it can be moved into event handlers freely, the same way the
/// underlying signals are.
#[derive(Clone, Copy, PartialEq)]
pub struct QueryModal {
    is_open: Signal<bool>,
    query_param: Signal<String>,
    mode: NavigateMode,
    query: ReadOnlySignal<String>,
    on_navigate: Callback<NavigationRequest>,
}

impl QueryModal {
    /// Whether the modal is currently open. Reactive when read inside a
    /// component body.
    pub fn is_open(&self) -> bool {
        (self.is_open)()
    }

    pub fn query_param(&self) -> String {
        (self.query_param)()
    }

    /// Open the modal and push `<param>=true` onto the URL.
    pub fn open(&self) {
        self.dispatch(ToggleIntent { desired_open: true });
    }

    /// Close the modal and drop the parameter from the URL. Safe to call
    /// when the key is already absent.
    pub fn close(&self) {
        self.dispatch(ToggleIntent { desired_open: false });
    }

    /// Set the flag without touching the URL, for transitions that should
    /// not be bookmarkable. The next re-sync overwrites it.
    pub fn set_open(&self, open: bool) {
        let mut is_open = self.is_open;
        is_open.set(open);
    }

    fn dispatch(&self, intent: ToggleIntent) {
        let current = QuerySet::parse(&self.query.read());
        let query_param = self.query_param.read();
        let next = apply_intent(&current, &query_param, intent);
        let query = next.to_query_string();
        debug!("dispatch {}={} -> ?{}", query_param.as_str(), intent.desired_open, query);
        drop(query_param);

        // Optimistic: the re-sync driven by the query signal owns the
        // final value.
        let mut is_open = self.is_open;
        is_open.set(intent.desired_open);

        self.on_navigate.call(NavigationRequest {
            query,
            mode: self.mode,
        });
    }
}

/// Bind modal visibility to the default `create-workspace` query parameter.
///
/// `query` is the current query string as the host app's route exposes it;
/// `on_navigate` receives the recomputed query string to apply as a shallow
/// navigation.
pub fn use_query_modal(
    query: impl Into<ReadOnlySignal<String>>,
    on_navigate: impl FnMut(NavigationRequest) + 'static,
) -> QueryModal {
    use_query_modal_with(QueryModalOptions::default(), query, on_navigate)
}

/// [`use_query_modal`] with a caller-chosen parameter and history policy.
pub fn use_query_modal_with(
    options: QueryModalOptions,
    query: impl Into<ReadOnlySignal<String>>,
    on_navigate: impl FnMut(NavigationRequest) + 'static,
) -> QueryModal {
    debug_assert!(
        !options.query_param.is_empty(),
        "query parameter key must be non-empty"
    );

    let query = query.into();
    let on_navigate = use_callback(on_navigate);
    let param_value = options.query_param;
    let query_param = use_signal(move || param_value.clone());
    let mut is_open = use_signal(|| false);

    // Re-sync whenever the ambient query string changes: browser
    // back/forward, a manual URL edit, or another component's navigation.
    use_effect(move || {
        let params = QuerySet::parse(&query.read());
        let param = query_param.read();
        let open = is_open_in(&params, &param);
        trace!("re-sync {}={:?} -> open={}", param.as_str(), params.get(&param), open);
        drop(param);
        is_open.set(open);
    });

    QueryModal {
        is_open,
        query_param,
        mode: options.mode,
        query,
        on_navigate,
    }
}
