use crate::infra::StaticTokenIdentity;
use chrono::{Duration, Local};
use std::sync::Arc;

use skillhub::error::AppError;
use skillhub::marketplace::{
    InMemoryMarketplaceStore, JobDraft, JobFilter, MarketplaceService, ProposalSubmission,
    Registration, Role,
};

const CLIENT_TOKEN: &str = "demo-client-token";
const FREELANCER_TOKEN: &str = "demo-freelancer-token";
const RIVAL_TOKEN: &str = "demo-rival-token";

/// Walk the lifecycle end to end: register both sides, post a job,
/// collect proposals, accept one, and complete the work. Guard failures
/// are driven on purpose so the output shows the rules, not just the
/// happy path.
pub(crate) fn run_demo() -> Result<(), AppError> {
    let store = Arc::new(InMemoryMarketplaceStore::default());
    let identity = Arc::new(StaticTokenIdentity::default());
    identity.issue(CLIENT_TOKEN, "demo-client", "avery@skillhub.dev");
    identity.issue(FREELANCER_TOKEN, "demo-freelancer", "riley@skillhub.dev");
    identity.issue(RIVAL_TOKEN, "demo-rival", "sam@skillhub.dev");
    let service = MarketplaceService::new(store, identity);

    println!("SkillHub marketplace demo");

    let client_auth = service.identify(CLIENT_TOKEN)?;
    service.register(
        &client_auth,
        Registration {
            name: "Avery Chen".to_string(),
            role: Role::Client,
        },
    )?;
    let freelancer_auth = service.identify(FREELANCER_TOKEN)?;
    service.register(
        &freelancer_auth,
        Registration {
            name: "Riley Okafor".to_string(),
            role: Role::Freelancer,
        },
    )?;
    let rival_auth = service.identify(RIVAL_TOKEN)?;
    service.register(
        &rival_auth,
        Registration {
            name: "Sam Ibarra".to_string(),
            role: Role::Freelancer,
        },
    )?;
    let client = service.authenticate(CLIENT_TOKEN)?;
    let freelancer = service.authenticate(FREELANCER_TOKEN)?;
    let rival = service.authenticate(RIVAL_TOKEN)?;
    println!("- registered 1 client and 2 freelancers");

    let job = service.post_job(
        &client,
        JobDraft {
            title: "React storefront build".to_string(),
            description: "Implement the checkout flow for an e-commerce storefront.".to_string(),
            category: "Development".to_string(),
            deadline: Local::now().date_naive() + Duration::days(30),
            budget: 500,
        },
    )?;
    println!(
        "- {} posted '{}' (budget ${}, status {})",
        job.client_name,
        job.title,
        job.budget,
        job.status.label()
    );

    let open = service.browse_jobs(&JobFilter::default())?;
    println!("- job board lists {} open job(s)", open.len());

    let first_bid = service.submit_proposal(
        &freelancer,
        &job.id,
        ProposalSubmission {
            bid_amount: 400,
            delivery_days: 14,
            cover_letter: "I shipped two similar storefronts this year.".to_string(),
        },
    )?;
    service.submit_proposal(
        &rival,
        &job.id,
        ProposalSubmission {
            bid_amount: 450,
            delivery_days: 10,
            cover_letter: "Available to start immediately.".to_string(),
        },
    )?;

    let proposals = service.proposals_for_owner(&client, &job.id)?;
    println!("- {} proposal(s) received:", proposals.len());
    for proposal in &proposals {
        println!(
            "  - {} bid ${} with delivery in {} day(s) [{}]",
            proposal.freelancer_name,
            proposal.bid_amount,
            proposal.delivery_days,
            proposal.status.label()
        );
    }

    let accepted = service.accept_proposal(&client, &job.id, &first_bid.id)?;
    let job = service.job(&job.id)?;
    println!(
        "- accepted {}'s proposal; job is now {}",
        accepted.freelancer_name,
        job.status.label()
    );

    match service.submit_proposal(
        &rival,
        &job.id,
        ProposalSubmission {
            bid_amount: 300,
            delivery_days: 7,
            cover_letter: "One more try.".to_string(),
        },
    ) {
        Err(err) => println!("- late proposal rejected: {err}"),
        Ok(_) => println!("- late proposal unexpectedly accepted"),
    }

    let job = service.mark_completed(&freelancer, &job.id)?;
    println!("- work delivered; job is now {}", job.status.label());

    match service.mark_completed(&freelancer, &job.id) {
        Err(err) => println!("- repeat completion rejected: {err}"),
        Ok(_) => println!("- repeat completion unexpectedly accepted"),
    }

    let mine = service.my_proposals(&freelancer)?;
    for entry in &mine {
        println!(
            "- {} sees '{}' ({}) with a bid of ${}",
            entry.proposal.freelancer_name,
            entry.job_title,
            entry.job_status.label(),
            entry.proposal.bid_amount
        );
    }

    Ok(())
}
