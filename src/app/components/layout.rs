//! Layout component wrapping all pages with Pico CSS and common elements.

use dioxus::prelude::*;

use super::nav::Nav;
use super::notifications::NotificationBanner;

/// CSS styles for the application (extends Pico CSS).
const CUSTOM_STYLES: &str = r#"
:root { --pico-font-size: 15px; }
small { color: var(--pico-muted-color); }
.notice { display: flex; justify-content: space-between; align-items: center; padding: 0.5rem 1rem; margin-bottom: 1rem; border-radius: var(--pico-border-radius); }
.notice button { margin: 0; padding: 0.25rem 0.75rem; }
.notice-success { background: var(--pico-ins-color); color: #fff; }
.notice-error { background: var(--pico-del-color); color: #fff; }
.toolbar { display: flex; justify-content: space-between; align-items: center; gap: 0.5rem; padding: 0.5rem 0.75rem; }
.toolbar.highlighted { background: var(--pico-primary-focus); }
.toolbar .actions { display: flex; gap: 0.5rem; }
.toolbar button { margin: 0; padding: 0.25rem 0.75rem; }
.booking-table tr.selected { background: var(--pico-primary-focus); }
.booking-table tr.blank td { color: var(--pico-muted-color); height: 2.5rem; }
.booking-table td.seat { width: 3rem; color: var(--pico-muted-color); }
.field-error { color: var(--pico-del-color); font-size: 0.8rem; }
.guide-chip { display: inline-flex; gap: 0.25rem; align-items: center; margin: 0 0.25rem 0.25rem 0; }
.guide-chip button { margin: 0; padding: 0 0.4rem; }
.search-options { list-style: none; padding: 0; margin: 0; }
.search-options li { cursor: pointer; padding: 0.25rem 0.5rem; }
.search-options li:hover { background: var(--pico-primary-focus); }
"#;

#[derive(Props, Clone, PartialEq)]
pub struct LayoutProps {
    /// Page title (shown in browser tab)
    pub title: String,
    /// Active navigation item ID
    pub nav_active: String,
    /// Page content
    pub children: Element,
}

/// Main layout component wrapping all pages.
#[component]
pub fn Layout(props: LayoutProps) -> Element {
    let version = env!("CARGO_PKG_VERSION");
    let full_title = format!("{} - Dive Schedule", props.title);

    rsx! {
        // Head elements - Dioxus hoists these to the real <head>
        document::Title { "{full_title}" }
        document::Link { rel: "stylesheet", href: "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css" }
        document::Style { {CUSTOM_STYLES} }

        // Body content
        header { class: "container",
            Nav { active: props.nav_active.clone() }
        }
        main { class: "container",
            NotificationBanner {}
            {props.children}
        }
        footer { class: "container",
            small { "Dive Schedule v{version}" }
        }
    }
}
