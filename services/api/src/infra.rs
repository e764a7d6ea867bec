use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use skillhub::marketplace::{ActorId, AuthenticatedActor, IdentityError, IdentityProvider};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Identity adapter backed by a static token map.
///
/// Stands in for the hosted authentication provider: tokens are issued
/// out of band (demo seeding, tests) and resolved to a fixed actor
/// identity. No credential checking happens here.
#[derive(Default)]
pub(crate) struct StaticTokenIdentity {
    tokens: Mutex<HashMap<String, AuthenticatedActor>>,
}

impl StaticTokenIdentity {
    pub(crate) fn issue(&self, token: &str, actor_id: &str, email: &str) {
        self.tokens.lock().expect("identity mutex poisoned").insert(
            token.to_string(),
            AuthenticatedActor {
                actor_id: ActorId(actor_id.to_string()),
                email: email.to_string(),
            },
        );
    }
}

impl IdentityProvider for StaticTokenIdentity {
    fn authenticate(&self, credential: &str) -> Result<AuthenticatedActor, IdentityError> {
        self.tokens
            .lock()
            .expect("identity mutex poisoned")
            .get(credential)
            .cloned()
            .ok_or(IdentityError::InvalidCredential)
    }
}
