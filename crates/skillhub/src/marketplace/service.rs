use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    Actor, ActorId, Job, JobDraft, JobFilter, JobId, JobStatus, ProfilePatch, Proposal,
    ProposalId, ProposalStatus, ProposalSubmission, ProposalWithJob, Registration, UserRecord,
};
use super::identity::{AuthenticatedActor, IdentityError, IdentityProvider};
use super::policy;
use super::store::{MarketplaceStore, NewJob, NewProposal, StoreError};

/// The job/proposal lifecycle engine, composed over the document-store
/// and identity-provider ports.
///
/// Every operation takes the acting identity as an explicit parameter and
/// runs as a sequence of independent single-document store calls; there is
/// no cross-call transaction, lock, or retry anywhere in the engine.
pub struct MarketplaceService<S, I> {
    store: Arc<S>,
    identity: Arc<I>,
}

impl<S, I> MarketplaceService<S, I>
where
    S: MarketplaceStore + 'static,
    I: IdentityProvider + 'static,
{
    pub fn new(store: Arc<S>, identity: Arc<I>) -> Self {
        Self { store, identity }
    }

    /// Resolve a credential to the raw provider identity, without
    /// requiring a user record. Used by registration.
    pub fn identify(&self, credential: &str) -> Result<AuthenticatedActor, MarketplaceError> {
        Ok(self.identity.authenticate(credential)?)
    }

    /// Resolve a credential to an [`Actor`], reading the role from the
    /// user record.
    pub fn authenticate(&self, credential: &str) -> Result<Actor, MarketplaceError> {
        let auth = self.identity.authenticate(credential)?;
        let user = self
            .store
            .fetch_user(&auth.actor_id)?
            .ok_or(MarketplaceError::NotFound("user record"))?;
        Ok(Actor {
            id: user.id,
            role: user.role,
        })
    }

    /// Create the actor's user record (explicit-id insert, keyed by the
    /// identity provider's actor id). The role is written here and never
    /// again.
    pub fn register(
        &self,
        auth: &AuthenticatedActor,
        registration: Registration,
    ) -> Result<UserRecord, MarketplaceError> {
        if registration.name.trim().is_empty() {
            return Err(MarketplaceError::Validation("name must not be empty"));
        }

        let record = UserRecord {
            id: auth.actor_id.clone(),
            role: registration.role,
            name: registration.name,
            email: auth.email.clone(),
            bio: String::new(),
            skills: Vec::new(),
        };

        match self.store.put_user(record.clone()) {
            Ok(()) => {
                info!(actor = %record.id, role = record.role.label(), "user registered");
                Ok(record)
            }
            Err(StoreError::Conflict) => {
                Err(MarketplaceError::Duplicate("user record already exists"))
            }
            Err(other) => Err(other.into()),
        }
    }

    pub fn profile(&self, id: &ActorId) -> Result<UserRecord, MarketplaceError> {
        self.store
            .fetch_user(id)?
            .ok_or(MarketplaceError::NotFound("user record"))
    }

    /// Update the actor's own profile fields. The patch cannot carry a
    /// role, so the role written at registration is immutable here.
    pub fn update_profile(
        &self,
        actor: &Actor,
        patch: ProfilePatch,
    ) -> Result<UserRecord, MarketplaceError> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(MarketplaceError::Validation("name must not be empty"));
            }
        }
        match self.store.update_user_profile(&actor.id, patch) {
            Ok(record) => Ok(record),
            Err(StoreError::NotFound) => Err(MarketplaceError::NotFound("user record")),
            Err(other) => Err(other.into()),
        }
    }

    /// Post a new job in `open` status. Client role only.
    pub fn post_job(&self, actor: &Actor, draft: JobDraft) -> Result<Job, MarketplaceError> {
        policy::ensure_can_post_job(actor)?;
        if draft.title.trim().is_empty() {
            return Err(MarketplaceError::Validation("job title must not be empty"));
        }

        let user = self
            .store
            .fetch_user(&actor.id)?
            .ok_or(MarketplaceError::NotFound("user record"))?;

        let job = self.store.insert_job(NewJob {
            client_id: actor.id.clone(),
            client_name: user.name,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            deadline: draft.deadline,
            budget: draft.budget,
            status: JobStatus::Open,
            posted_at: Utc::now(),
        })?;

        info!(job = %job.id, client = %job.client_id, "job posted");
        Ok(job)
    }

    /// Open jobs, newest first, refined by the filter.
    pub fn browse_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, MarketplaceError> {
        let jobs = self.store.open_jobs()?;
        Ok(jobs.into_iter().filter(|job| filter.matches(job)).collect())
    }

    pub fn job(&self, id: &JobId) -> Result<Job, MarketplaceError> {
        self.store
            .fetch_job(id)?
            .ok_or(MarketplaceError::NotFound("job"))
    }

    /// The acting client's own postings, newest first.
    pub fn jobs_for_client(&self, actor: &Actor) -> Result<Vec<Job>, MarketplaceError> {
        Ok(self.store.jobs_by_client(&actor.id)?)
    }

    /// Delete a job. Owner only; permitted at any status, including
    /// `in_progress`. The delete touches the job document alone.
    pub fn delete_job(&self, actor: &Actor, job_id: &JobId) -> Result<(), MarketplaceError> {
        let job = self.job(job_id)?;
        policy::ensure_can_delete_job(actor, &job)?;
        self.store.delete_job(job_id)?;
        info!(job = %job_id, client = %actor.id, "job deleted");
        Ok(())
    }

    /// Submit a proposal against an open job.
    ///
    /// The one-proposal-per-freelancer rule is a best-effort existence
    /// check before the insert; two concurrent submissions can both pass
    /// it.
    pub fn submit_proposal(
        &self,
        actor: &Actor,
        job_id: &JobId,
        submission: ProposalSubmission,
    ) -> Result<Proposal, MarketplaceError> {
        if submission.delivery_days == 0 {
            return Err(MarketplaceError::Validation(
                "delivery time must be at least one day",
            ));
        }

        let job = self.job(job_id)?;
        policy::ensure_can_submit_proposal(actor, &job)?;

        if self
            .store
            .proposal_by_freelancer(job_id, &actor.id)?
            .is_some()
        {
            return Err(MarketplaceError::Duplicate(
                "a proposal for this job already exists",
            ));
        }

        let user = self
            .store
            .fetch_user(&actor.id)?
            .ok_or(MarketplaceError::NotFound("user record"))?;

        let proposal = self.store.insert_proposal(
            job_id,
            NewProposal {
                freelancer_id: actor.id.clone(),
                freelancer_name: user.name,
                freelancer_email: user.email,
                bid_amount: submission.bid_amount,
                delivery_days: submission.delivery_days,
                cover_letter: submission.cover_letter,
                status: ProposalStatus::Pending,
                submitted_at: Utc::now(),
            },
        )?;

        info!(job = %job_id, proposal = %proposal.id, freelancer = %actor.id, "proposal submitted");
        Ok(proposal)
    }

    /// The job's proposal set, most recently submitted first. Owner only.
    pub fn proposals_for_owner(
        &self,
        actor: &Actor,
        job_id: &JobId,
    ) -> Result<Vec<Proposal>, MarketplaceError> {
        let job = self.job(job_id)?;
        policy::ensure_can_view_proposals(actor, &job)?;
        Ok(self.store.proposals_for_job(job_id)?)
    }

    /// Every proposal by the acting freelancer, joined with each parent
    /// job's current title and status in a single batched store call.
    pub fn my_proposals(&self, actor: &Actor) -> Result<Vec<ProposalWithJob>, MarketplaceError> {
        Ok(self.store.proposals_by_freelancer(&actor.id)?)
    }

    /// Accept a pending proposal on an open job, moving the proposal to
    /// `accepted` and the job to `in_progress`.
    ///
    /// The two writes are independent single-document operations with no
    /// atomicity between them; a concurrent accept for a sibling proposal
    /// can interleave, leaving two accepted proposals on one job. Other
    /// pending proposals are left untouched.
    pub fn accept_proposal(
        &self,
        actor: &Actor,
        job_id: &JobId,
        proposal_id: &ProposalId,
    ) -> Result<Proposal, MarketplaceError> {
        let job = self.job(job_id)?;
        let proposal = self
            .store
            .fetch_proposal(job_id, proposal_id)?
            .ok_or(MarketplaceError::NotFound("proposal"))?;
        policy::ensure_can_accept(actor, &job, &proposal)?;

        self.store
            .update_proposal_status(job_id, proposal_id, ProposalStatus::Accepted)?;
        self.store.update_job_status(job_id, JobStatus::InProgress)?;

        info!(job = %job_id, proposal = %proposal_id, "proposal accepted");
        Ok(Proposal {
            status: ProposalStatus::Accepted,
            ..proposal
        })
    }

    /// Move an `in_progress` job to `completed`. Only the freelancer
    /// holding the accepted proposal may do this; `completed` is terminal.
    pub fn mark_completed(&self, actor: &Actor, job_id: &JobId) -> Result<Job, MarketplaceError> {
        let job = self.job(job_id)?;
        let accepted = self.store.accepted_proposal(job_id)?;
        policy::ensure_can_mark_complete(actor, &job, accepted.as_ref())?;

        self.store.update_job_status(job_id, JobStatus::Completed)?;

        info!(job = %job_id, freelancer = %actor.id, "job completed");
        Ok(Job {
            status: JobStatus::Completed,
            ..job
        })
    }
}

/// Error taxonomy surfaced by the lifecycle engine. Every failed
/// operation leaves prior state unchanged; none is retried locally.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    /// The actor lacks permission for the requested transition.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
    /// The entity is not in a state that permits the requested transition.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    /// Best-effort uniqueness violation.
    #[error("duplicate: {0}")]
    Duplicate(&'static str),
    /// The referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Malformed request payload.
    #[error("invalid request: {0}")]
    Validation(&'static str),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
