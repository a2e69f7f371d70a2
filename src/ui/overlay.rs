use dioxus::prelude::*;

use super::hooks::QueryModal;

/// Dismissable overlay that renders its children while the bound modal is
/// open. Clicking the backdrop closes through the query-bound handle, so
/// dismissal updates the URL like any other close.
#[component]
pub fn QueryModalOverlay(modal: QueryModal, children: Element) -> Element {
    rsx! {
        if modal.is_open() {
            div {
                class: "fixed inset-0 bg-black/50 flex items-center justify-center z-[3000]",
                onclick: move |_| modal.close(),
                div {
                    class: "bg-gray-800 rounded-lg p-6 max-w-md w-full mx-4",
                    onclick: move |evt| evt.stop_propagation(),
                    {children}
                }
            }
        }
    }
}
