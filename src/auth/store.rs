use std::sync::RwLock;

use crate::auth::token::TokenPair;

/// Client credentials issued by the platform.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub client_id: String,
    pub client_secret: String,
}

impl Identity {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Holds the current token pair for one API instance.
///
/// Readers get a snapshot; writers swap the whole pair. Concurrent refreshes
/// are last-writer-wins: a stale token only costs another 401/refresh cycle.
#[derive(Debug)]
pub struct CredentialStore {
    token: RwLock<TokenPair>,
}

impl CredentialStore {
    pub fn new(token: TokenPair) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }

    pub fn current(&self) -> TokenPair {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn replace(&self, token: TokenPair) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn pair(access: &str) -> TokenPair {
        TokenPair {
            access_token: access.into(),
            token_type: "bearer".into(),
            expires_in: 300,
            refresh_token: format!("{access}-refresh"),
            refresh_expires_in: 1800,
            session_state: String::new(),
        }
    }

    #[test]
    fn replace_swaps_whole_pair() {
        let store = CredentialStore::new(pair("a"));
        store.replace(pair("b"));
        let current = store.current();
        assert_eq!(current.access_token, "b");
        assert_eq!(current.refresh_token, "b-refresh");
    }

    #[test]
    fn identity_debug_redacts_secret() {
        let dbg = format!("{:?}", Identity::new("cid", "hunter2"));
        assert!(dbg.contains("cid"));
        assert!(!dbg.contains("hunter2"));
    }

    #[test]
    fn concurrent_writers_leave_a_whole_pair() {
        let store = Arc::new(CredentialStore::new(pair("init")));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.replace(pair(&format!("t{i}"))))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let current = store.current();
        assert_eq!(
            current.refresh_token,
            format!("{}-refresh", current.access_token)
        );
    }
}
