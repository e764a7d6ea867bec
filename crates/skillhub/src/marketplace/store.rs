use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    ActorId, Job, JobId, JobStatus, ProfilePatch, Proposal, ProposalId, ProposalStatus,
    ProposalWithJob, UserRecord,
};

/// Store-bound fields of a job document, prior to id assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJob {
    pub client_id: ActorId,
    pub client_name: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub deadline: NaiveDate,
    pub budget: u32,
    pub status: JobStatus,
    pub posted_at: DateTime<Utc>,
}

/// Store-bound fields of a proposal document, prior to id assignment.
/// The parent job is supplied separately since proposals nest under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProposal {
    pub freelancer_id: ActorId,
    pub freelancer_name: String,
    pub freelancer_email: String,
    pub bid_amount: u32,
    pub delivery_days: u32,
    pub cover_letter: String,
    pub status: ProposalStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Port onto the external document store.
///
/// The backing store is schemaless and exposes six primitive shapes:
/// insert with a generated id, insert with an explicit id, get by id,
/// update fields by id, delete by id, and query by equality filter with a
/// sort. Every method below is one of those shapes applied to the `users`,
/// `jobs`, or `proposals` collection; no transactions, triggers, or
/// server-side constraints are assumed beyond single-document writes.
///
/// Proposals nest one level under their job and are additionally queryable
/// as a flattened cross-job collection, which is what
/// [`proposals_by_freelancer`](MarketplaceStore::proposals_by_freelancer)
/// relies on. That method is also the read-time join: it resolves each
/// proposal's parent job in one batched contract so callers never perform
/// per-proposal lookups.
pub trait MarketplaceStore: Send + Sync {
    /// Insert a user record keyed by the actor id. `Conflict` if present.
    fn put_user(&self, user: UserRecord) -> Result<(), StoreError>;
    fn fetch_user(&self, id: &ActorId) -> Result<Option<UserRecord>, StoreError>;
    /// Apply the patch's populated fields to the stored record.
    fn update_user_profile(&self, id: &ActorId, patch: ProfilePatch)
        -> Result<UserRecord, StoreError>;

    /// Insert a job, assigning its id.
    fn insert_job(&self, job: NewJob) -> Result<Job, StoreError>;
    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
    fn update_job_status(&self, id: &JobId, status: JobStatus) -> Result<(), StoreError>;
    /// Delete the job document only; nested proposal documents survive.
    fn delete_job(&self, id: &JobId) -> Result<(), StoreError>;
    /// Jobs with `status == open`, newest first.
    fn open_jobs(&self) -> Result<Vec<Job>, StoreError>;
    /// Jobs owned by the given client, newest first.
    fn jobs_by_client(&self, client_id: &ActorId) -> Result<Vec<Job>, StoreError>;

    /// Insert a proposal under the given job, assigning its id.
    fn insert_proposal(&self, job_id: &JobId, proposal: NewProposal)
        -> Result<Proposal, StoreError>;
    fn fetch_proposal(
        &self,
        job_id: &JobId,
        id: &ProposalId,
    ) -> Result<Option<Proposal>, StoreError>;
    fn update_proposal_status(
        &self,
        job_id: &JobId,
        id: &ProposalId,
        status: ProposalStatus,
    ) -> Result<(), StoreError>;
    /// All proposals for the job, most recently submitted first.
    fn proposals_for_job(&self, job_id: &JobId) -> Result<Vec<Proposal>, StoreError>;
    /// The given freelancer's proposal on the job, if any.
    fn proposal_by_freelancer(
        &self,
        job_id: &JobId,
        freelancer_id: &ActorId,
    ) -> Result<Option<Proposal>, StoreError>;
    /// The job's accepted proposal, if one exists.
    fn accepted_proposal(&self, job_id: &JobId) -> Result<Option<Proposal>, StoreError>;
    /// Every proposal by the freelancer across all jobs, most recently
    /// submitted first, each joined with its parent job's current title
    /// and status. Proposals whose parent job has been deleted are
    /// omitted.
    fn proposals_by_freelancer(
        &self,
        freelancer_id: &ActorId,
    ) -> Result<Vec<ProposalWithJob>, StoreError>;
}

/// Error enumeration for document store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document already exists")]
    Conflict,
    #[error("document not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
