//! Global notification area.
//!
//! Every remote failure ends up here as one message. Successes use the same
//! banner with a different style.

use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Handle for posting to the banner. Copy it into event handlers.
#[derive(Clone, Copy)]
pub struct Notifier(Signal<Option<Notice>>);

impl Notifier {
    pub fn success(mut self, message: impl Into<String>) {
        self.0.set(Some(Notice {
            kind: NoticeKind::Success,
            message: message.into(),
        }));
    }

    pub fn error(mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "Showing error");
        self.0.set(Some(Notice {
            kind: NoticeKind::Error,
            message,
        }));
    }

    pub fn dismiss(mut self) {
        self.0.set(None);
    }

    pub fn current(&self) -> Option<Notice> {
        self.0.read().clone()
    }
}

pub fn use_notifier_provider() -> Notifier {
    use_context_provider(|| Notifier(Signal::new(None)))
}

pub fn use_notifier() -> Notifier {
    use_context::<Notifier>()
}

#[component]
pub fn NotificationBanner() -> Element {
    let notifier = use_notifier();

    let Some(notice) = notifier.current() else {
        return rsx! {};
    };
    let class = match notice.kind {
        NoticeKind::Success => "notice notice-success",
        NoticeKind::Error => "notice notice-error",
    };

    rsx! {
        div { class: "{class}", role: "alert",
            span { "{notice.message}" }
            button {
                class: "outline",
                "aria-label": "Dismiss",
                onclick: move |_| notifier.dismiss(),
                "×"
            }
        }
    }
}
