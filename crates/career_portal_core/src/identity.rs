//! crates/career_portal_core/src/identity.rs

use tokio::sync::watch;
use tracing::info;

use crate::domain::Identity;
use crate::ports::IdentityObserver;

/// Holds the current identity and notifies subscribers on every change.
///
/// The entry point owns the cell and calls `sign_in` / `sign_out` as the
/// identity provider reports transitions.
pub struct IdentityCell {
    tx: watch::Sender<Option<Identity>>,
}

impl IdentityCell {
    pub fn new(initial: Option<Identity>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn signed_out() -> Self {
        Self::new(None)
    }

    pub fn sign_in(&self, identity: Identity) {
        info!(user_id = %identity.user_id, "identity signed in");
        self.tx.send_replace(Some(identity));
    }

    pub fn sign_out(&self) {
        if let Some(previous) = self.tx.send_replace(None) {
            info!(user_id = %previous.user_id, "identity signed out");
        }
    }
}

impl IdentityObserver for IdentityCell {
    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn someone() -> Identity {
        Identity {
            user_id: "u-1".into(),
            email: "a@x.com".into(),
            display_name: Some("Ada".into()),
        }
    }

    #[test]
    fn subscriber_sees_current_value_immediately() {
        let cell = IdentityCell::new(Some(someone()));
        let rx = cell.subscribe();
        assert_eq!(rx.borrow().as_ref(), Some(&someone()));
    }

    #[tokio::test]
    async fn subscriber_is_notified_of_transitions() {
        let cell = IdentityCell::signed_out();
        let mut rx = cell.subscribe();
        assert!(rx.borrow().is_none());

        cell.sign_in(someone());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref(), Some(&someone()));

        cell.sign_out();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
        assert!(cell.subscribe().borrow().is_none());
    }
}
