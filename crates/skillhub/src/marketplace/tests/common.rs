use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::marketplace::domain::{
    Actor, ActorId, Job, JobDraft, JobId, JobStatus, ProfilePatch, Proposal, ProposalId,
    ProposalStatus, ProposalSubmission, ProposalWithJob, Registration, Role, UserRecord,
};
use crate::marketplace::identity::{AuthenticatedActor, IdentityError, IdentityProvider};
use crate::marketplace::memory::InMemoryMarketplaceStore;
use crate::marketplace::service::MarketplaceService;
use crate::marketplace::store::{MarketplaceStore, NewJob, NewProposal, StoreError};

pub(super) const CLIENT_TOKEN: &str = "token-client-1";
pub(super) const FREELANCER_TOKEN: &str = "token-freelancer-1";
pub(super) const SECOND_FREELANCER_TOKEN: &str = "token-freelancer-2";

/// Token-to-identity map standing in for the external auth provider.
#[derive(Default)]
pub(super) struct MemoryIdentity {
    tokens: Mutex<HashMap<String, AuthenticatedActor>>,
}

impl MemoryIdentity {
    pub(super) fn issue(&self, token: &str, actor_id: &str, email: &str) {
        self.tokens.lock().expect("identity mutex poisoned").insert(
            token.to_string(),
            AuthenticatedActor {
                actor_id: ActorId(actor_id.to_string()),
                email: email.to_string(),
            },
        );
    }
}

impl IdentityProvider for MemoryIdentity {
    fn authenticate(&self, credential: &str) -> Result<AuthenticatedActor, IdentityError> {
        self.tokens
            .lock()
            .expect("identity mutex poisoned")
            .get(credential)
            .cloned()
            .ok_or(IdentityError::InvalidCredential)
    }
}

pub(super) fn build_service() -> (
    Arc<MarketplaceService<InMemoryMarketplaceStore, MemoryIdentity>>,
    Arc<InMemoryMarketplaceStore>,
    Arc<MemoryIdentity>,
) {
    let store = Arc::new(InMemoryMarketplaceStore::default());
    let identity = Arc::new(MemoryIdentity::default());
    let service = Arc::new(MarketplaceService::new(store.clone(), identity.clone()));
    (service, store, identity)
}

pub(super) fn register_client(
    service: &MarketplaceService<InMemoryMarketplaceStore, MemoryIdentity>,
    identity: &MemoryIdentity,
) -> Actor {
    identity.issue(CLIENT_TOKEN, "client-1", "dana@example.com");
    let auth = service.identify(CLIENT_TOKEN).expect("client identity");
    service
        .register(
            &auth,
            Registration {
                name: "Dana Whitfield".to_string(),
                role: Role::Client,
            },
        )
        .expect("client registers");
    service.authenticate(CLIENT_TOKEN).expect("client actor")
}

pub(super) fn register_freelancer(
    service: &MarketplaceService<InMemoryMarketplaceStore, MemoryIdentity>,
    identity: &MemoryIdentity,
) -> Actor {
    identity.issue(FREELANCER_TOKEN, "freelancer-1", "riley@example.com");
    let auth = service.identify(FREELANCER_TOKEN).expect("freelancer identity");
    service
        .register(
            &auth,
            Registration {
                name: "Riley Okafor".to_string(),
                role: Role::Freelancer,
            },
        )
        .expect("freelancer registers");
    service
        .authenticate(FREELANCER_TOKEN)
        .expect("freelancer actor")
}

pub(super) fn register_second_freelancer(
    service: &MarketplaceService<InMemoryMarketplaceStore, MemoryIdentity>,
    identity: &MemoryIdentity,
) -> Actor {
    identity.issue(SECOND_FREELANCER_TOKEN, "freelancer-2", "sam@example.com");
    let auth = service
        .identify(SECOND_FREELANCER_TOKEN)
        .expect("second freelancer identity");
    service
        .register(
            &auth,
            Registration {
                name: "Sam Ibarra".to_string(),
                role: Role::Freelancer,
            },
        )
        .expect("second freelancer registers");
    service
        .authenticate(SECOND_FREELANCER_TOKEN)
        .expect("second freelancer actor")
}

pub(super) fn job_draft() -> JobDraft {
    JobDraft {
        title: "React storefront build".to_string(),
        description: "Implement the checkout flow for an e-commerce storefront.".to_string(),
        category: "Development".to_string(),
        deadline: NaiveDate::from_ymd_opt(2026, 9, 30).expect("valid date"),
        budget: 500,
    }
}

pub(super) fn proposal_submission() -> ProposalSubmission {
    ProposalSubmission {
        bid_amount: 400,
        delivery_days: 14,
        cover_letter: "I shipped two similar storefronts this year.".to_string(),
    }
}

/// Bare job value for exercising the policy module without a store.
pub(super) fn job_owned_by(client_id: &str, status: JobStatus) -> Job {
    Job {
        id: JobId("job-000001".to_string()),
        client_id: ActorId(client_id.to_string()),
        client_name: "Dana Whitfield".to_string(),
        title: "React storefront build".to_string(),
        description: "Implement the checkout flow.".to_string(),
        category: "Development".to_string(),
        deadline: NaiveDate::from_ymd_opt(2026, 9, 30).expect("valid date"),
        budget: 500,
        status,
        posted_at: Utc::now(),
    }
}

/// Bare proposal value for exercising the policy module without a store.
pub(super) fn proposal_from(freelancer_id: &str, status: ProposalStatus) -> Proposal {
    Proposal {
        id: ProposalId("prop-000001".to_string()),
        job_id: JobId("job-000001".to_string()),
        freelancer_id: ActorId(freelancer_id.to_string()),
        freelancer_name: "Riley Okafor".to_string(),
        freelancer_email: "riley@example.com".to_string(),
        bid_amount: 400,
        delivery_days: 14,
        cover_letter: "I shipped two similar storefronts this year.".to_string(),
        status,
        submitted_at: Utc::now(),
    }
}

pub(super) fn actor(id: &str, role: Role) -> Actor {
    Actor {
        id: ActorId(id.to_string()),
        role,
    }
}

/// Store double whose every call fails, for exercising 500 paths.
pub(super) struct UnavailableStore;

impl UnavailableStore {
    fn err<T>() -> Result<T, StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }
}

impl MarketplaceStore for UnavailableStore {
    fn put_user(&self, _user: UserRecord) -> Result<(), StoreError> {
        Self::err()
    }

    fn fetch_user(&self, _id: &ActorId) -> Result<Option<UserRecord>, StoreError> {
        Self::err()
    }

    fn update_user_profile(
        &self,
        _id: &ActorId,
        _patch: ProfilePatch,
    ) -> Result<UserRecord, StoreError> {
        Self::err()
    }

    fn insert_job(&self, _job: NewJob) -> Result<Job, StoreError> {
        Self::err()
    }

    fn fetch_job(&self, _id: &JobId) -> Result<Option<Job>, StoreError> {
        Self::err()
    }

    fn update_job_status(&self, _id: &JobId, _status: JobStatus) -> Result<(), StoreError> {
        Self::err()
    }

    fn delete_job(&self, _id: &JobId) -> Result<(), StoreError> {
        Self::err()
    }

    fn open_jobs(&self) -> Result<Vec<Job>, StoreError> {
        Self::err()
    }

    fn jobs_by_client(&self, _client_id: &ActorId) -> Result<Vec<Job>, StoreError> {
        Self::err()
    }

    fn insert_proposal(
        &self,
        _job_id: &JobId,
        _proposal: NewProposal,
    ) -> Result<Proposal, StoreError> {
        Self::err()
    }

    fn fetch_proposal(
        &self,
        _job_id: &JobId,
        _id: &ProposalId,
    ) -> Result<Option<Proposal>, StoreError> {
        Self::err()
    }

    fn update_proposal_status(
        &self,
        _job_id: &JobId,
        _id: &ProposalId,
        _status: ProposalStatus,
    ) -> Result<(), StoreError> {
        Self::err()
    }

    fn proposals_for_job(&self, _job_id: &JobId) -> Result<Vec<Proposal>, StoreError> {
        Self::err()
    }

    fn proposal_by_freelancer(
        &self,
        _job_id: &JobId,
        _freelancer_id: &ActorId,
    ) -> Result<Option<Proposal>, StoreError> {
        Self::err()
    }

    fn accepted_proposal(&self, _job_id: &JobId) -> Result<Option<Proposal>, StoreError> {
        Self::err()
    }

    fn proposals_by_freelancer(
        &self,
        _freelancer_id: &ActorId,
    ) -> Result<Vec<ProposalWithJob>, StoreError> {
        Self::err()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
