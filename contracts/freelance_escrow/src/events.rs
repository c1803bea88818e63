//! # Events
//!
//! One event is published per successful transition, plus a
//! [`JobStateChanged`] event for every state edge. Events are the only way
//! off-chain indexers learn about jobs; the contract never calls out to them.
//!
//! | Topic                       | Data                   |
//! |-----------------------------|------------------------|
//! | `("created", job_id)`       | [`JobCreated`]         |
//! | `("applied", job_id)`       | [`FreelancerApplied`]  |
//! | `("assigned", job_id)`      | [`FreelancerAssigned`] |
//! | `("started", job_id)`       | [`JobStarted`]         |
//! | `("ms_added", job_id)`      | [`MilestoneAdded`]     |
//! | `("submitted", job_id)`     | [`MilestoneSubmitted`] |
//! | `("approved", job_id)`      | [`MilestoneApproved`]  |
//! | `("completed", job_id)`     | [`JobCompleted`]       |
//! | `("cancelled", job_id)`     | [`JobCancelled`]       |
//! | `("state", job_id)`         | [`JobStateChanged`]    |

use soroban_sdk::{contracttype, symbol_short, Address, Bytes, Env, Symbol};

use crate::types::JobStatus;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JobCreated {
    pub job_id: u64,
    pub client: Address,
    pub budget: i128,
    pub deadline: u64,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FreelancerApplied {
    pub job_id: u64,
    pub applicant: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FreelancerAssigned {
    pub job_id: u64,
    pub freelancer: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JobStarted {
    pub job_id: u64,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestoneAdded {
    pub job_id: u64,
    pub index: u32,
    pub amount: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestoneSubmitted {
    pub job_id: u64,
    pub index: u32,
    pub submission_ref: Bytes,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestoneApproved {
    pub job_id: u64,
    pub index: u32,
    pub amount: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JobCompleted {
    pub job_id: u64,
    /// Total released to the freelancer over the job's life.
    pub total_paid: i128,
    /// Unallocated budget returned to the client.
    pub surplus_refunded: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JobCancelled {
    pub job_id: u64,
    pub refund_amount: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JobStateChanged {
    pub job_id: u64,
    pub old_state: JobStatus,
    pub new_state: JobStatus,
    pub freelancer: Option<Address>,
    pub timestamp: u64,
}

pub const CREATED: Symbol = symbol_short!("created");
pub const APPLIED: Symbol = symbol_short!("applied");
pub const ASSIGNED: Symbol = symbol_short!("assigned");
pub const STARTED: Symbol = symbol_short!("started");
pub const MILESTONE_ADDED: Symbol = symbol_short!("ms_added");
pub const SUBMITTED: Symbol = symbol_short!("submitted");
pub const APPROVED: Symbol = symbol_short!("approved");
pub const COMPLETED: Symbol = symbol_short!("completed");
pub const CANCELLED: Symbol = symbol_short!("cancelled");
pub const STATE_CHANGED: Symbol = symbol_short!("state");

fn now(env: &Env) -> u64 {
    env.ledger().timestamp()
}

pub fn job_created(env: &Env, job_id: u64, client: &Address, budget: i128, deadline: u64) {
    env.events().publish(
        (CREATED, job_id),
        JobCreated {
            job_id,
            client: client.clone(),
            budget,
            deadline,
            timestamp: now(env),
        },
    );
}

pub fn freelancer_applied(env: &Env, job_id: u64, applicant: &Address) {
    env.events().publish(
        (APPLIED, job_id),
        FreelancerApplied {
            job_id,
            applicant: applicant.clone(),
            timestamp: now(env),
        },
    );
}

pub fn freelancer_assigned(env: &Env, job_id: u64, freelancer: &Address) {
    env.events().publish(
        (ASSIGNED, job_id),
        FreelancerAssigned {
            job_id,
            freelancer: freelancer.clone(),
            timestamp: now(env),
        },
    );
}

pub fn job_started(env: &Env, job_id: u64) {
    env.events().publish(
        (STARTED, job_id),
        JobStarted {
            job_id,
            timestamp: now(env),
        },
    );
}

pub fn milestone_added(env: &Env, job_id: u64, index: u32, amount: i128) {
    env.events().publish(
        (MILESTONE_ADDED, job_id),
        MilestoneAdded {
            job_id,
            index,
            amount,
            timestamp: now(env),
        },
    );
}

pub fn milestone_submitted(env: &Env, job_id: u64, index: u32, submission_ref: &Bytes) {
    env.events().publish(
        (SUBMITTED, job_id),
        MilestoneSubmitted {
            job_id,
            index,
            submission_ref: submission_ref.clone(),
            timestamp: now(env),
        },
    );
}

pub fn milestone_approved(env: &Env, job_id: u64, index: u32, amount: i128) {
    env.events().publish(
        (APPROVED, job_id),
        MilestoneApproved {
            job_id,
            index,
            amount,
            timestamp: now(env),
        },
    );
}

pub fn job_completed(env: &Env, job_id: u64, total_paid: i128, surplus_refunded: i128) {
    env.events().publish(
        (COMPLETED, job_id),
        JobCompleted {
            job_id,
            total_paid,
            surplus_refunded,
            timestamp: now(env),
        },
    );
}

pub fn job_cancelled(env: &Env, job_id: u64, refund_amount: i128) {
    env.events().publish(
        (CANCELLED, job_id),
        JobCancelled {
            job_id,
            refund_amount,
            timestamp: now(env),
        },
    );
}

pub fn state_changed(
    env: &Env,
    job_id: u64,
    old_state: JobStatus,
    new_state: JobStatus,
    freelancer: &Option<Address>,
) {
    env.events().publish(
        (STATE_CHANGED, job_id),
        JobStateChanged {
            job_id,
            old_state,
            new_state,
            freelancer: freelancer.clone(),
            timestamp: now(env),
        },
    );
}
