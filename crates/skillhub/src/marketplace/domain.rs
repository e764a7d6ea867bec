use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for authenticated actors (clients and freelancers).
///
/// Assigned by the external identity provider and treated as opaque and
/// trusted; it doubles as the key of the actor's user record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub String);

/// Identifier wrapper for job documents, assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for proposals, unique within the parent job's set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProposalId(pub String);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Marketplace role recorded on the user record at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Freelancer,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Freelancer => "freelancer",
        }
    }
}

/// Job lifecycle status. The status only ever moves forward along
/// `open -> in_progress -> completed`; `completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    InProgress,
    Completed,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
        }
    }

    /// Position along the forward-only lifecycle order.
    pub const fn rank(self) -> u8 {
        match self {
            JobStatus::Open => 0,
            JobStatus::InProgress => 1,
            JobStatus::Completed => 2,
        }
    }
}

/// Proposal status. Non-accepted proposals stay `pending` indefinitely;
/// there is no rejected terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Accepted,
}

impl ProposalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Accepted => "accepted",
        }
    }
}

/// A unit of work posted by a client.
///
/// `client_id` and the descriptive fields are immutable after posting;
/// `client_name` is a denormalized copy taken from the user record at
/// posting time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
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

/// A freelancer's bid against a specific job.
///
/// The freelancer identity fields are captured at submission time and are
/// not live-updated if the profile changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub job_id: JobId,
    pub freelancer_id: ActorId,
    pub freelancer_name: String,
    pub freelancer_email: String,
    pub bid_amount: u32,
    pub delivery_days: u32,
    pub cover_letter: String,
    pub status: ProposalStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Stored user record, keyed by the identity provider's actor id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: ActorId,
    pub role: Role,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Authenticated identity with its role resolved from the user record,
/// passed explicitly into every lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: ActorId,
    pub role: Role,
}

/// Client-supplied fields for a new job posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub deadline: NaiveDate,
    pub budget: u32,
}

/// Freelancer-supplied fields for a new proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalSubmission {
    pub bid_amount: u32,
    pub delivery_days: u32,
    pub cover_letter: String,
}

/// Registration payload persisted as the actor's user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub role: Role,
}

/// Mutable profile fields. The role is deliberately absent: it is written
/// once at registration and never updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
}

/// Browse filter over open jobs. The status equality runs in the store
/// query; the refinements below run over the fetched page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_budget: Option<u32>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(category) = &self.category {
            if !job.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_title = job.title.to_lowercase().contains(&needle);
            let in_description = job.description.to_lowercase().contains(&needle);
            if !in_title && !in_description {
                return false;
            }
        }

        if let Some(min_budget) = self.min_budget {
            if job.budget < min_budget {
                return false;
            }
        }

        true
    }
}

/// Proposal annotated with its parent job's current title and status,
/// produced by the store-side batched join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalWithJob {
    pub proposal: Proposal,
    pub job_title: String,
    pub job_status: JobStatus,
}
