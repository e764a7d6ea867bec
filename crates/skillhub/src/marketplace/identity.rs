use serde::{Deserialize, Serialize};

use super::domain::ActorId;

/// Identity resolved by the external authentication provider.
///
/// The marketplace treats the actor id as opaque and trusted; roles are
/// not part of the credential and come from the user-record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedActor {
    pub actor_id: ActorId,
    pub email: String,
}

/// Port onto the external authentication provider. Implementations map an
/// opaque credential (a bearer token here) to a stable actor identity.
pub trait IdentityProvider: Send + Sync {
    fn authenticate(&self, credential: &str) -> Result<AuthenticatedActor, IdentityError>;
}

/// Error enumeration for identity resolution failures.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("missing bearer credential")]
    MissingCredential,
    #[error("credential rejected by the identity provider")]
    InvalidCredential,
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}
