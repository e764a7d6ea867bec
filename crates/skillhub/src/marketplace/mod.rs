//! Job/proposal lifecycle for the freelance marketplace.
//!
//! Clients post jobs, freelancers bid on them, and both sides track
//! status as a job moves `open -> in_progress -> completed`. The engine
//! itself is a thin layer: typed state machines plus the authorization
//! policy gating who may see or act on what, composed over two external
//! collaborators expressed as port traits, a schemaless document store
//! and an identity provider.

pub mod domain;
pub mod identity;
pub mod memory;
pub mod policy;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    Actor, ActorId, Job, JobDraft, JobFilter, JobId, JobStatus, ProfilePatch, Proposal,
    ProposalId, ProposalStatus, ProposalSubmission, ProposalWithJob, Registration, Role,
    UserRecord,
};
pub use identity::{AuthenticatedActor, IdentityError, IdentityProvider};
pub use memory::InMemoryMarketplaceStore;
pub use router::marketplace_router;
pub use service::{MarketplaceError, MarketplaceService};
pub use store::{MarketplaceStore, NewJob, NewProposal, StoreError};
