//! Session credentials and sign-out notification.
//!
//! The gatekeeper reads the bearer token from here; the normalizer tears the
//! session down when the backend answers 401. Consumers subscribe to
//! [`SessionEvent`]s to learn they must send the user back to sign-in.

use arc_swap::ArcSwapOption;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Session lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    /// Credentials were rejected and cleared; navigate to `redirect_to`.
    Expired { redirect_to: String },
}

pub struct Session {
    token: ArcSwapOption<String>,
    sign_in_path: String,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new(sign_in_path: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            token: ArcSwapOption::empty(),
            sign_in_path: sign_in_path.into(),
            events,
        }
    }

    /// Store a bearer token for subsequent requests.
    pub fn sign_in(&self, token: impl Into<String>) {
        self.token.store(Some(Arc::new(token.into())));
        let _ = self.events.send(SessionEvent::SignedIn);
    }

    pub fn token(&self) -> Option<Arc<String>> {
        self.token.load_full()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.load().is_some()
    }

    pub fn sign_in_path(&self) -> &str {
        &self.sign_in_path
    }

    /// Clear all credentials and announce the redirect to sign-in.
    pub fn expire(&self) {
        self.token.store(None);
        tracing::warn!(redirect_to = %self.sign_in_path, "Session expired, credentials cleared");
        let _ = self.events.send(SessionEvent::Expired {
            redirect_to: self.sign_in_path.clone(),
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new("/signin")
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("signed_in", &self.is_signed_in())
            .field("sign_in_path", &self.sign_in_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_and_expire() {
        let session = Session::new("/login");
        let mut events = session.subscribe();

        assert!(session.token().is_none());
        session.sign_in("abc123");
        assert_eq!(session.token().as_deref().map(String::as_str), Some("abc123"));
        assert_eq!(events.try_recv().unwrap(), SessionEvent::SignedIn);

        session.expire();
        assert!(!session.is_signed_in());
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::Expired { redirect_to: "/login".into() }
        );
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let session = Session::default();
        session.sign_in("secret-token");
        assert!(!format!("{session:?}").contains("secret-token"));
    }
}
