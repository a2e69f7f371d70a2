// Library exports for the query-bound modal utilities

pub mod query;
pub mod toggle;
pub mod ui;

// Re-export the common surface at the crate root for easier access
pub use query::QuerySet;
pub use toggle::{
    NavigateMode, NavigationError, NavigationRequest, NavigationUpdater, QueryBoundToggle,
    QueryParamSource, SubscriptionId, ToggleIntent, DEFAULT_QUERY_PARAM, OPEN_VALUE,
};
pub use ui::{use_query_modal, use_query_modal_with, QueryModal, QueryModalOptions, QueryModalOverlay};

// Test support (only available with test-utils feature, or inside unit tests)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;
