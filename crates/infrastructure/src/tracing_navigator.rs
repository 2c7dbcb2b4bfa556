use parking_lot::Mutex;
use salesdesk_application::Navigator;
use salesdesk_domain::NavigationTarget;
use tracing::info;

/// Side effect requested through the navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigatorEvent {
    /// Screen change.
    Navigated(NavigationTarget),
    /// Blocking alert.
    Alerted {
        /// Alert title.
        title: String,
        /// Alert body.
        text: String,
    },
}

/// Navigator that logs every request and keeps them for inspection.
#[derive(Debug, Default)]
pub struct TracingNavigator {
    events: Mutex<Vec<NavigatorEvent>>,
}

impl TracingNavigator {
    /// Creates a navigator with no recorded events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns recorded events in request order.
    #[must_use]
    pub fn events(&self) -> Vec<NavigatorEvent> {
        self.events.lock().clone()
    }

    /// Returns the most recent navigation target.
    #[must_use]
    pub fn current(&self) -> Option<NavigationTarget> {
        self.events.lock().iter().rev().find_map(|event| match event {
            NavigatorEvent::Navigated(target) => Some(*target),
            NavigatorEvent::Alerted { .. } => None,
        })
    }
}

impl Navigator for TracingNavigator {
    fn navigate(&self, target: NavigationTarget) {
        info!(path = target.path(), "navigating");
        self.events.lock().push(NavigatorEvent::Navigated(target));
    }

    fn alert(&self, title: &str, text: &str) {
        info!(title, text, "alert shown");
        self.events.lock().push(NavigatorEvent::Alerted {
            title: title.to_owned(),
            text: text.to_owned(),
        });
    }
}
