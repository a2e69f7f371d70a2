// Test support utilities for both unit and integration tests

use std::cell::{Cell, RefCell};

use crate::query::QuerySet;
use crate::toggle::{
    NavigateMode, NavigationError, NavigationRequest, NavigationUpdater, QueryListener,
    QueryParamSource, SubscriptionId,
};

/// In-memory stand-in for the host router.
///
/// Implements both collaborator traits: it holds the current query set,
/// records every navigation request, and notifies subscribers after each
/// change — including externally driven ones via [`MemoryRouter::set_query`],
/// which plays the role of back/forward or a manual URL edit.
pub struct MemoryRouter {
    params: RefCell<Option<QuerySet>>,
    listeners: RefCell<Vec<(SubscriptionId, QueryListener)>>,
    next_id: Cell<u64>,
    history: RefCell<Vec<NavigationRequest>>,
    fail_next: Cell<bool>,
}

impl Default for MemoryRouter {
    fn default() -> Self {
        MemoryRouter {
            params: RefCell::new(Some(QuerySet::new())),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            history: RefCell::new(Vec::new()),
            fail_next: Cell::new(false),
        }
    }
}

impl MemoryRouter {
    /// Router with an empty query string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Router whose initial URL carries `raw` as its query string.
    pub fn with_query(raw: &str) -> Self {
        let router = Self::new();
        *router.params.borrow_mut() = Some(QuerySet::parse(raw));
        router
    }

    /// Router that has not produced a navigation state yet.
    pub fn uninitialized() -> Self {
        let router = Self::new();
        *router.params.borrow_mut() = None;
        router
    }

    /// Simulate an external URL change (back/forward, manual edit) and
    /// notify subscribers.
    pub fn set_query(&self, raw: &str) {
        *self.params.borrow_mut() = Some(QuerySet::parse(raw));
        self.notify();
    }

    /// Make the next `navigate` call fail without changing the URL.
    pub fn fail_next_navigation(&self) {
        self.fail_next.set(true);
    }

    /// Current query string, empty if uninitialized.
    pub fn current_query(&self) -> String {
        self.params
            .borrow()
            .as_ref()
            .map(QuerySet::to_query_string)
            .unwrap_or_default()
    }

    /// Every navigation request applied so far, oldest first. Replace-mode
    /// requests overwrite the top entry instead of appending.
    pub fn history(&self) -> Vec<NavigationRequest> {
        self.history.borrow().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn notify(&self) {
        let Some(params) = self.params.borrow().clone() else {
            return;
        };
        for (_, listener) in self.listeners.borrow().iter() {
            listener(&params);
        }
    }
}

impl QueryParamSource for MemoryRouter {
    fn current(&self) -> Option<QuerySet> {
        self.params.borrow().clone()
    }

    fn subscribe(&self, listener: QueryListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.borrow_mut().retain(|(sub, _)| *sub != id);
    }
}

impl NavigationUpdater for MemoryRouter {
    fn navigate(&self, request: &NavigationRequest) -> Result<(), NavigationError> {
        if self.fail_next.take() {
            return Err(NavigationError::Rejected("forced failure".to_string()));
        }

        *self.params.borrow_mut() = Some(QuerySet::parse(&request.query));

        {
            let mut history = self.history.borrow_mut();
            if request.mode == NavigateMode::Replace {
                history.pop();
            }
            history.push(request.clone());
        }

        self.notify();
        Ok(())
    }
}
