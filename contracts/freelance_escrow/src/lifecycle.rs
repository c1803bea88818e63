//! # Lifecycle
//!
//! Guard-and-mutate functions for every job transition. Nothing here touches
//! storage, tokens or events: each function validates its preconditions
//! against an in-memory [`Job`], mutates it only once every guard has passed,
//! and reports what changed. The contract entry points persist the result,
//! move funds and publish events.
//!
//! Every state change goes through [`advance`], which rejects any edge not
//! in [`is_valid_transition`] with [`Error::InvalidState`].

use soroban_sdk::{Address, Bytes, Env, String, Vec};

use crate::auth;
use crate::escrow;
use crate::types::{Job, JobStatus, Milestone};
use crate::Error;

/// Edges of the job state machine. Terminal states have none.
pub fn is_valid_transition(from: JobStatus, to: JobStatus) -> bool {
    matches!(
        (from, to),
        (JobStatus::Open, JobStatus::Assigned)
            | (JobStatus::Open, JobStatus::Cancelled)
            | (JobStatus::Assigned, JobStatus::InProgress)
            | (JobStatus::Assigned, JobStatus::Cancelled)
            | (JobStatus::InProgress, JobStatus::Submitted)
            | (JobStatus::Submitted, JobStatus::InProgress)
            | (JobStatus::Submitted, JobStatus::Completed)
    )
}

/// Move `job` to `to`, returning the state it left.
pub fn advance(job: &mut Job, to: JobStatus) -> Result<JobStatus, Error> {
    let from = job.state;
    if !is_valid_transition(from, to) {
        return Err(Error::InvalidState);
    }
    job.state = to;
    Ok(from)
}

/// Build a new open job holding `budget` in escrow.
#[allow(clippy::too_many_arguments)]
pub fn open(
    env: &Env,
    id: u64,
    client: Address,
    title: Bytes,
    description_ref: Bytes,
    budget: i128,
    deadline: u64,
    now: u64,
) -> Result<Job, Error> {
    if budget <= 0 {
        return Err(Error::InsufficientFunds);
    }
    if deadline <= now {
        return Err(Error::DeadlinePassed);
    }
    if title.is_empty() {
        return Err(Error::EmptyTitle);
    }
    Ok(Job {
        id,
        client,
        freelancer: None,
        title,
        description_ref,
        budget,
        escrow_balance: budget,
        state: JobStatus::Open,
        milestones: Vec::new(env),
        applicant_count: 0,
        created_at: now,
        deadline,
        deliverable_refs: Vec::new(env),
    })
}

/// Count `caller` as an applicant, returning the slot it takes.
/// `already_applied` comes from the applicant registry.
pub fn apply(
    job: &mut Job,
    caller: &Address,
    already_applied: bool,
    now: u64,
) -> Result<u32, Error> {
    if *caller == job.client {
        return Err(Error::NotAuthorized);
    }
    if job.state != JobStatus::Open {
        return Err(Error::JobNotOpen);
    }
    if now >= job.deadline {
        return Err(Error::DeadlinePassed);
    }
    if already_applied {
        return Err(Error::AlreadyApplied);
    }
    let slot = job.applicant_count;
    job.applicant_count = slot.checked_add(1).ok_or(Error::InvalidState)?;
    Ok(slot)
}

/// Pick `freelancer` from the applicants.
pub fn assign(job: &mut Job, freelancer: &Address, applied: bool) -> Result<JobStatus, Error> {
    if job.state != JobStatus::Open {
        return Err(Error::InvalidState);
    }
    if !applied {
        return Err(Error::NotApplicant);
    }
    let from = advance(job, JobStatus::Assigned)?;
    job.freelancer = Some(freelancer.clone());
    Ok(from)
}

/// The assigned freelancer begins work.
pub fn start(job: &mut Job, caller: &Address, now: u64) -> Result<JobStatus, Error> {
    auth::require_freelancer(job, caller)?;
    if job.state != JobStatus::Assigned {
        return Err(Error::InvalidState);
    }
    if now >= job.deadline {
        return Err(Error::DeadlinePassed);
    }
    if job.milestones.is_empty() {
        return Err(Error::InvalidMilestone);
    }
    advance(job, JobStatus::InProgress)
}

/// Append a milestone, returning its index.
pub fn add_milestone(job: &mut Job, description: String, amount: i128) -> Result<u32, Error> {
    if job.state != JobStatus::Open {
        return Err(Error::JobNotOpen);
    }
    if amount <= 0 {
        return Err(Error::InvalidMilestone);
    }
    let total = job
        .allocated()
        .checked_add(amount)
        .ok_or(Error::InvalidMilestone)?;
    if total > job.budget {
        return Err(Error::InvalidMilestone);
    }
    let index = job.milestones.len();
    job.milestones.push_back(Milestone {
        index,
        description,
        amount,
        completed: false,
        approved: false,
        submission_ref: None,
        submitted_at: None,
        approved_at: None,
    });
    Ok(index)
}

/// Mark milestone `index` as delivered.
pub fn submit_milestone(
    job: &mut Job,
    caller: &Address,
    index: u32,
    submission_ref: Bytes,
    now: u64,
) -> Result<JobStatus, Error> {
    auth::require_freelancer(job, caller)?;
    if job.state != JobStatus::InProgress {
        return Err(Error::InvalidState);
    }
    let mut milestone = job.milestones.get(index).ok_or(Error::InvalidMilestone)?;
    if milestone.completed {
        return Err(Error::InvalidState);
    }
    let from = advance(job, JobStatus::Submitted)?;
    milestone.completed = true;
    milestone.submission_ref = Some(submission_ref.clone());
    milestone.submitted_at = Some(now);
    job.milestones.set(index, milestone);
    job.deliverable_refs.push_back(submission_ref);
    Ok(from)
}

/// Result of a successful milestone approval.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Approval {
    /// Paid to the freelancer.
    pub amount: i128,
    pub previous: JobStatus,
    pub current: JobStatus,
    /// Unallocated budget returned to the client when the approval
    /// completed the job; zero otherwise.
    pub surplus: i128,
}

/// Approve milestone `index`, debiting its amount from escrow. Approving
/// the last outstanding milestone completes the job.
pub fn approve_milestone(job: &mut Job, index: u32, now: u64) -> Result<Approval, Error> {
    let mut milestone = job.milestones.get(index).ok_or(Error::InvalidMilestone)?;
    if job.state != JobStatus::Submitted || !milestone.completed || milestone.approved {
        return Err(Error::InvalidState);
    }
    escrow::debit(job, milestone.amount)?;
    milestone.approved = true;
    milestone.approved_at = Some(now);
    let amount = milestone.amount;
    job.milestones.set(index, milestone);

    let all_approved = job.milestones.iter().all(|m| m.approved);
    let target = if all_approved {
        JobStatus::Completed
    } else {
        JobStatus::InProgress
    };
    let previous = advance(job, target)?;
    let surplus = if all_approved { escrow::drain(job) } else { 0 };
    Ok(Approval {
        amount,
        previous,
        current: target,
        surplus,
    })
}

/// Cancel a job that has not started, draining its escrow.
pub fn cancel(job: &mut Job) -> Result<(JobStatus, i128), Error> {
    if !matches!(job.state, JobStatus::Open | JobStatus::Assigned) {
        return Err(Error::InvalidState);
    }
    let from = advance(job, JobStatus::Cancelled)?;
    Ok((from, escrow::drain(job)))
}
