//! # Freelance Escrow Contract
//!
//! Milestone-based escrow for freelance engagements. A client posts a job
//! and deposits its full budget, a freelancer is picked from the applicants,
//! and the budget is released milestone by milestone as the client approves
//! delivered work.
//!
//! | Phase        | Entry Point(s)                                   |
//! |--------------|--------------------------------------------------|
//! | Bootstrap    | [`FreelanceEscrow::init`]                        |
//! | Posting      | [`FreelanceEscrow::create`], `add_milestone`     |
//! | Matching     | `apply`, `assign`                                |
//! | Work         | `start`, `submit_milestone`                      |
//! | Settlement   | `approve_milestone`, `cancel`                    |
//! | Queries      | `get_job`, `get_milestone`, `escrow_balance`, …  |
//!
//! ## Architecture
//!
//! Guards and state mutation live in [`lifecycle`]; authorization in
//! [`auth`]; token custody in [`escrow`]; storage access in [`storage`].
//! This file only sequences them: authorize, load, transition, save,
//! move funds, publish events. Returning an `Err` rolls back the whole
//! invocation, so a failed call never leaves a job half-updated.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, log, Address, Bytes, Env, String, Vec,
};

mod auth;
mod escrow;
pub mod events;
pub mod lifecycle;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_properties;

pub use types::{EscrowConfig, Job, JobCap, JobStatus, Milestone};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotAuthorized         = 1,
    FreelancerNotAssigned = 2,
    InvalidState          = 3,
    JobNotOpen            = 4,
    AlreadyApplied        = 5,
    InvalidMilestone      = 6,
    InsufficientFunds     = 7,
    DeadlinePassed        = 8,
    JobNotFound           = 9,
    NotApplicant          = 10,
    EmptyTitle            = 11,
    AlreadyInitialized    = 12,
    NotInitialized        = 13,
}

#[contract]
pub struct FreelanceEscrow;

#[contractimpl]
impl FreelanceEscrow {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Configure the contract with its settlement token.
    ///
    /// Must be called exactly once immediately after deployment.
    pub fn init(env: Env, token: Address) -> Result<(), Error> {
        if storage::has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        storage::save_config(&env, &EscrowConfig { token });
        Ok(())
    }

    pub fn config(env: Env) -> Result<EscrowConfig, Error> {
        storage::load_config(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Client-side transitions
    // ─────────────────────────────────────────────────────────

    /// Post a job, locking `deposit` of the settlement token in escrow.
    ///
    /// Returns the job and the capability that authorizes every later
    /// client action on it.
    pub fn create(
        env: Env,
        client: Address,
        title: Bytes,
        description_ref: Bytes,
        deposit: i128,
        deadline: u64,
    ) -> Result<(Job, JobCap), Error> {
        client.require_auth();
        let config = storage::load_config(&env)?;
        let now = env.ledger().timestamp();

        let id = storage::get_and_increment_job_id(&env);
        let job = lifecycle::open(
            &env,
            id,
            client.clone(),
            title,
            description_ref,
            deposit,
            deadline,
            now,
        )?;

        escrow::lock(&env, &config.token, &client, deposit)?;
        storage::save_job(&env, &job);
        let cap = auth::issue_cap(&env, id, &client);

        events::job_created(&env, id, &client, job.budget, job.deadline);
        Ok((job, cap))
    }

    /// Append a milestone to an open job. Returns the milestone index.
    pub fn add_milestone(
        env: Env,
        job_id: u64,
        cap: JobCap,
        description: String,
        amount: i128,
    ) -> Result<u32, Error> {
        auth::require_cap(&env, &cap, job_id)?;
        let mut job = storage::load_job(&env, job_id)?;

        let index = lifecycle::add_milestone(&mut job, description, amount)?;
        storage::save_job_progress(&env, job_id, &job.progress());

        events::milestone_added(&env, job_id, index, amount);
        Ok(index)
    }

    /// Choose `freelancer` from the job's applicants.
    pub fn assign(env: Env, job_id: u64, cap: JobCap, freelancer: Address) -> Result<(), Error> {
        auth::require_cap(&env, &cap, job_id)?;
        let mut job = storage::load_job(&env, job_id)?;

        let applied = storage::is_applicant(&env, job_id, &freelancer);
        let from = lifecycle::assign(&mut job, &freelancer, applied)?;
        storage::save_job_progress(&env, job_id, &job.progress());

        events::freelancer_assigned(&env, job_id, &freelancer);
        events::state_changed(&env, job_id, from, job.state, &job.freelancer);
        Ok(())
    }

    /// Approve a submitted milestone and pay its amount to the freelancer.
    ///
    /// Approving the last outstanding milestone completes the job and
    /// returns any unallocated budget to the client. Returns the amount
    /// released to the freelancer.
    pub fn approve_milestone(
        env: Env,
        job_id: u64,
        cap: JobCap,
        index: u32,
    ) -> Result<i128, Error> {
        auth::require_cap(&env, &cap, job_id)?;
        let config = storage::load_config(&env)?;
        let mut job = storage::load_job(&env, job_id)?;

        let now = env.ledger().timestamp();
        let approval = lifecycle::approve_milestone(&mut job, index, now)?;
        let freelancer = job.freelancer.clone().ok_or(Error::InvalidState)?;
        storage::save_job_progress(&env, job_id, &job.progress());

        escrow::release(&env, &config.token, &freelancer, approval.amount);
        escrow::refund_all(&env, &config.token, &job.client, approval.surplus);

        events::milestone_approved(&env, job_id, index, approval.amount);
        events::state_changed(&env, job_id, approval.previous, approval.current, &job.freelancer);
        if approval.current == JobStatus::Completed {
            let total_paid = job.released();
            log!(&env, "job {} completed, paid {}", job_id, total_paid);
            events::job_completed(&env, job_id, total_paid, approval.surplus);
        }
        Ok(approval.amount)
    }

    /// Cancel a job that has not started and refund its escrow to the
    /// client. Returns the refunded amount.
    pub fn cancel(env: Env, job_id: u64, cap: JobCap) -> Result<i128, Error> {
        auth::require_cap(&env, &cap, job_id)?;
        let config = storage::load_config(&env)?;
        let mut job = storage::load_job(&env, job_id)?;

        let (from, refund) = lifecycle::cancel(&mut job)?;
        storage::save_job_progress(&env, job_id, &job.progress());

        escrow::refund_all(&env, &config.token, &job.client, refund);

        log!(&env, "job {} cancelled, refunded {}", job_id, refund);
        events::job_cancelled(&env, job_id, refund);
        events::state_changed(&env, job_id, from, job.state, &job.freelancer);
        Ok(refund)
    }

    // ─────────────────────────────────────────────────────────
    // Freelancer-side transitions
    // ─────────────────────────────────────────────────────────

    /// Express interest in an open job.
    pub fn apply(env: Env, job_id: u64, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        let mut job = storage::load_job(&env, job_id)?;

        let applied = storage::is_applicant(&env, job_id, &caller);
        let slot = lifecycle::apply(&mut job, &caller, applied, env.ledger().timestamp())?;
        storage::save_applicant(&env, job_id, slot, &caller);
        storage::save_job_progress(&env, job_id, &job.progress());

        events::freelancer_applied(&env, job_id, &caller);
        Ok(())
    }

    /// Begin work on an assigned job.
    pub fn start(env: Env, job_id: u64, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        let mut job = storage::load_job(&env, job_id)?;

        let from = lifecycle::start(&mut job, &caller, env.ledger().timestamp())?;
        storage::save_job_progress(&env, job_id, &job.progress());

        events::job_started(&env, job_id);
        events::state_changed(&env, job_id, from, job.state, &job.freelancer);
        Ok(())
    }

    /// Deliver milestone `index`. The deadline is not checked here: work
    /// that has started may finish after it.
    pub fn submit_milestone(
        env: Env,
        job_id: u64,
        caller: Address,
        index: u32,
        submission_ref: Bytes,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut job = storage::load_job(&env, job_id)?;

        let now = env.ledger().timestamp();
        let from =
            lifecycle::submit_milestone(&mut job, &caller, index, submission_ref.clone(), now)?;
        storage::save_job_progress(&env, job_id, &job.progress());

        events::milestone_submitted(&env, job_id, index, &submission_ref);
        events::state_changed(&env, job_id, from, job.state, &job.freelancer);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_job(env: Env, job_id: u64) -> Result<Job, Error> {
        storage::load_job(&env, job_id)
    }

    pub fn get_milestone(env: Env, job_id: u64, index: u32) -> Result<Milestone, Error> {
        let progress = storage::load_job_progress(&env, job_id)?;
        progress.milestones.get(index).ok_or(Error::InvalidMilestone)
    }

    pub fn milestone_count(env: Env, job_id: u64) -> Result<u32, Error> {
        Ok(storage::load_job_progress(&env, job_id)?.milestones.len())
    }

    /// Applicants in application order, `limit` at a time starting at slot
    /// `start`.
    pub fn get_applicants(
        env: Env,
        job_id: u64,
        start: u32,
        limit: u32,
    ) -> Result<Vec<Address>, Error> {
        let count = storage::load_job_progress(&env, job_id)?.applicant_count;
        Ok(storage::load_applicants(&env, job_id, start, limit, count))
    }

    pub fn applicant_count(env: Env, job_id: u64) -> Result<u32, Error> {
        Ok(storage::load_job_progress(&env, job_id)?.applicant_count)
    }

    pub fn is_applicant(env: Env, job_id: u64, who: Address) -> Result<bool, Error> {
        storage::load_job_terms(&env, job_id)?;
        Ok(storage::is_applicant(&env, job_id, &who))
    }

    pub fn escrow_balance(env: Env, job_id: u64) -> Result<i128, Error> {
        Ok(storage::load_job_progress(&env, job_id)?.escrow_balance)
    }

    pub fn job_state(env: Env, job_id: u64) -> Result<JobStatus, Error> {
        Ok(storage::load_job_progress(&env, job_id)?.state)
    }

    /// Number of jobs ever created. Ids run from 0 to `job_count() - 1`.
    pub fn job_count(env: Env) -> u64 {
        storage::job_count(&env)
    }

    /// Address recorded as holding the capability for `job_id`.
    pub fn cap_holder(env: Env, job_id: u64) -> Option<Address> {
        storage::load_cap_holder(&env, job_id)
    }
}
