//! In-memory document store adapter. Backs the default server wiring, the
//! CLI demo, and the test suites; the real deployment points the same
//! port at the hosted document database.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use super::domain::{
    ActorId, Job, JobId, JobStatus, ProfilePatch, Proposal, ProposalId, ProposalStatus,
    ProposalWithJob, UserRecord,
};
use super::store::{MarketplaceStore, NewJob, NewProposal, StoreError};

/// Mutex-guarded maps over the three collections. Proposals live in a
/// flattened `(job_id, proposal_id)` keyed map so they stay queryable
/// across jobs and survive deletion of their parent job document.
pub struct InMemoryMarketplaceStore {
    users: Mutex<HashMap<ActorId, UserRecord>>,
    jobs: Mutex<BTreeMap<JobId, Job>>,
    proposals: Mutex<BTreeMap<(JobId, ProposalId), Proposal>>,
    job_sequence: AtomicU64,
    proposal_sequence: AtomicU64,
}

impl Default for InMemoryMarketplaceStore {
    fn default() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            jobs: Mutex::new(BTreeMap::new()),
            proposals: Mutex::new(BTreeMap::new()),
            job_sequence: AtomicU64::new(1),
            proposal_sequence: AtomicU64::new(1),
        }
    }
}

impl InMemoryMarketplaceStore {
    fn next_job_id(&self) -> JobId {
        let id = self.job_sequence.fetch_add(1, Ordering::Relaxed);
        JobId(format!("job-{id:06}"))
    }

    fn next_proposal_id(&self) -> ProposalId {
        let id = self.proposal_sequence.fetch_add(1, Ordering::Relaxed);
        ProposalId(format!("prop-{id:06}"))
    }
}

fn newest_jobs_first(jobs: &mut [Job]) {
    jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then(b.id.cmp(&a.id)));
}

fn newest_proposals_first(proposals: &mut [Proposal]) {
    proposals.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));
}

impl MarketplaceStore for InMemoryMarketplaceStore {
    fn put_user(&self, user: UserRecord) -> Result<(), StoreError> {
        let mut guard = self.users.lock().expect("store mutex poisoned");
        if guard.contains_key(&user.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(user.id.clone(), user);
        Ok(())
    }

    fn fetch_user(&self, id: &ActorId) -> Result<Option<UserRecord>, StoreError> {
        let guard = self.users.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update_user_profile(
        &self,
        id: &ActorId,
        patch: ProfilePatch,
    ) -> Result<UserRecord, StoreError> {
        let mut guard = self.users.lock().expect("store mutex poisoned");
        let record = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(bio) = patch.bio {
            record.bio = bio;
        }
        if let Some(skills) = patch.skills {
            record.skills = skills;
        }
        Ok(record.clone())
    }

    fn insert_job(&self, job: NewJob) -> Result<Job, StoreError> {
        let id = self.next_job_id();
        let job = Job {
            id: id.clone(),
            client_id: job.client_id,
            client_name: job.client_name,
            title: job.title,
            description: job.description,
            category: job.category,
            deadline: job.deadline,
            budget: job.budget,
            status: job.status,
            posted_at: job.posted_at,
        };
        let mut guard = self.jobs.lock().expect("store mutex poisoned");
        guard.insert(id, job.clone());
        Ok(job)
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        let guard = self.jobs.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update_job_status(&self, id: &JobId, status: JobStatus) -> Result<(), StoreError> {
        let mut guard = self.jobs.lock().expect("store mutex poisoned");
        let job = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        job.status = status;
        Ok(())
    }

    fn delete_job(&self, id: &JobId) -> Result<(), StoreError> {
        let mut guard = self.jobs.lock().expect("store mutex poisoned");
        guard.remove(id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    fn open_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let guard = self.jobs.lock().expect("store mutex poisoned");
        let mut jobs: Vec<Job> = guard
            .values()
            .filter(|job| job.status == JobStatus::Open)
            .cloned()
            .collect();
        drop(guard);
        newest_jobs_first(&mut jobs);
        Ok(jobs)
    }

    fn jobs_by_client(&self, client_id: &ActorId) -> Result<Vec<Job>, StoreError> {
        let guard = self.jobs.lock().expect("store mutex poisoned");
        let mut jobs: Vec<Job> = guard
            .values()
            .filter(|job| &job.client_id == client_id)
            .cloned()
            .collect();
        drop(guard);
        newest_jobs_first(&mut jobs);
        Ok(jobs)
    }

    fn insert_proposal(
        &self,
        job_id: &JobId,
        proposal: NewProposal,
    ) -> Result<Proposal, StoreError> {
        let id = self.next_proposal_id();
        let proposal = Proposal {
            id: id.clone(),
            job_id: job_id.clone(),
            freelancer_id: proposal.freelancer_id,
            freelancer_name: proposal.freelancer_name,
            freelancer_email: proposal.freelancer_email,
            bid_amount: proposal.bid_amount,
            delivery_days: proposal.delivery_days,
            cover_letter: proposal.cover_letter,
            status: proposal.status,
            submitted_at: proposal.submitted_at,
        };
        let mut guard = self.proposals.lock().expect("store mutex poisoned");
        guard.insert((job_id.clone(), id), proposal.clone());
        Ok(proposal)
    }

    fn fetch_proposal(
        &self,
        job_id: &JobId,
        id: &ProposalId,
    ) -> Result<Option<Proposal>, StoreError> {
        let guard = self.proposals.lock().expect("store mutex poisoned");
        Ok(guard.get(&(job_id.clone(), id.clone())).cloned())
    }

    fn update_proposal_status(
        &self,
        job_id: &JobId,
        id: &ProposalId,
        status: ProposalStatus,
    ) -> Result<(), StoreError> {
        let mut guard = self.proposals.lock().expect("store mutex poisoned");
        let proposal = guard
            .get_mut(&(job_id.clone(), id.clone()))
            .ok_or(StoreError::NotFound)?;
        proposal.status = status;
        Ok(())
    }

    fn proposals_for_job(&self, job_id: &JobId) -> Result<Vec<Proposal>, StoreError> {
        let guard = self.proposals.lock().expect("store mutex poisoned");
        let mut proposals: Vec<Proposal> = guard
            .iter()
            .filter(|((parent, _), _)| parent == job_id)
            .map(|(_, proposal)| proposal.clone())
            .collect();
        drop(guard);
        newest_proposals_first(&mut proposals);
        Ok(proposals)
    }

    fn proposal_by_freelancer(
        &self,
        job_id: &JobId,
        freelancer_id: &ActorId,
    ) -> Result<Option<Proposal>, StoreError> {
        let guard = self.proposals.lock().expect("store mutex poisoned");
        Ok(guard
            .iter()
            .find(|((parent, _), proposal)| {
                parent == job_id && &proposal.freelancer_id == freelancer_id
            })
            .map(|(_, proposal)| proposal.clone()))
    }

    fn accepted_proposal(&self, job_id: &JobId) -> Result<Option<Proposal>, StoreError> {
        let guard = self.proposals.lock().expect("store mutex poisoned");
        Ok(guard
            .iter()
            .find(|((parent, _), proposal)| {
                parent == job_id && proposal.status == ProposalStatus::Accepted
            })
            .map(|(_, proposal)| proposal.clone()))
    }

    fn proposals_by_freelancer(
        &self,
        freelancer_id: &ActorId,
    ) -> Result<Vec<ProposalWithJob>, StoreError> {
        let mut proposals: Vec<Proposal> = {
            let guard = self.proposals.lock().expect("store mutex poisoned");
            guard
                .values()
                .filter(|proposal| &proposal.freelancer_id == freelancer_id)
                .cloned()
                .collect()
        };
        newest_proposals_first(&mut proposals);

        let jobs = self.jobs.lock().expect("store mutex poisoned");
        Ok(proposals
            .into_iter()
            .filter_map(|proposal| {
                jobs.get(&proposal.job_id).map(|job| ProposalWithJob {
                    job_title: job.title.clone(),
                    job_status: job.status,
                    proposal,
                })
            })
            .collect())
    }
}
