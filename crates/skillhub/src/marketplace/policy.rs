//! The authorization predicate consulted by every mutating and most
//! reading operations.
//!
//! Each check returns `Result<(), MarketplaceError>` so callers surface
//! the right taxonomy member: identity/ownership failures become
//! [`MarketplaceError::Forbidden`], lifecycle-position failures become
//! [`MarketplaceError::InvalidState`]. Ownership is always checked before
//! state, so an actor without permission learns nothing about the
//! entity's current status.

use super::domain::{Actor, Job, JobStatus, Proposal, ProposalStatus, Role};
use super::service::MarketplaceError;

/// `actor.role == client`
pub fn ensure_can_post_job(actor: &Actor) -> Result<(), MarketplaceError> {
    if actor.role != Role::Client {
        return Err(MarketplaceError::Forbidden("only clients may post jobs"));
    }
    Ok(())
}

/// `actor.id == job.client_id`
pub fn ensure_can_view_proposals(actor: &Actor, job: &Job) -> Result<(), MarketplaceError> {
    if actor.id != job.client_id {
        return Err(MarketplaceError::Forbidden(
            "only the job owner may view its proposals",
        ));
    }
    Ok(())
}

/// `actor.role == freelancer && job.status == open`
pub fn ensure_can_submit_proposal(actor: &Actor, job: &Job) -> Result<(), MarketplaceError> {
    if actor.role != Role::Freelancer {
        return Err(MarketplaceError::Forbidden(
            "only freelancers may submit proposals",
        ));
    }
    if job.status != JobStatus::Open {
        return Err(MarketplaceError::InvalidState(
            "job is no longer open for proposals",
        ));
    }
    Ok(())
}

/// `actor.id == job.client_id && job.status == open && proposal.status == pending`
pub fn ensure_can_accept(
    actor: &Actor,
    job: &Job,
    proposal: &Proposal,
) -> Result<(), MarketplaceError> {
    if actor.id != job.client_id {
        return Err(MarketplaceError::Forbidden(
            "only the job owner may accept a proposal",
        ));
    }
    if job.status != JobStatus::Open {
        return Err(MarketplaceError::InvalidState("job is not open"));
    }
    if proposal.status != ProposalStatus::Pending {
        return Err(MarketplaceError::InvalidState("proposal is not pending"));
    }
    Ok(())
}

/// `proposal.status == accepted && actor.id == proposal.freelancer_id && job.status == in_progress`
///
/// The accepted proposal is passed as an `Option` because the store lookup
/// may come back empty; a job that is genuinely `in_progress` always has
/// one.
pub fn ensure_can_mark_complete(
    actor: &Actor,
    job: &Job,
    accepted: Option<&Proposal>,
) -> Result<(), MarketplaceError> {
    if job.status != JobStatus::InProgress {
        return Err(MarketplaceError::InvalidState("job is not in progress"));
    }
    let proposal = accepted.ok_or(MarketplaceError::InvalidState(
        "job has no accepted proposal",
    ))?;
    if proposal.status != ProposalStatus::Accepted {
        return Err(MarketplaceError::InvalidState("proposal is not accepted"));
    }
    if actor.id != proposal.freelancer_id {
        return Err(MarketplaceError::Forbidden(
            "only the accepted freelancer may complete the job",
        ));
    }
    Ok(())
}

/// `actor.id == job.client_id`; deletion is permitted at any status.
pub fn ensure_can_delete_job(actor: &Actor, job: &Job) -> Result<(), MarketplaceError> {
    if actor.id != job.client_id {
        return Err(MarketplaceError::Forbidden(
            "only the job owner may delete it",
        ));
    }
    Ok(())
}
