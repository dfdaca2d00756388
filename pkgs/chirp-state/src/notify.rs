//! Notification seam between the store and the host platform

/// Display surface for new-message notifications.
///
/// The store decides *when* to notify (incoming message while the window is
/// unfocused); the embedder decides *how* to display it. Inject an
/// implementation only when the platform notification capability is present
/// and permitted — absence of a notifier suppresses notifications entirely.
pub trait Notifier {
    fn notify(&self, title: &str, body: &str, icon: Option<&str>);
}

impl<F> Notifier for F
where
    F: Fn(&str, &str, Option<&str>),
{
    fn notify(&self, title: &str, body: &str, icon: Option<&str>) {
        self(title, body, icon)
    }
}
