//! # Authorization
//!
//! Two kinds of authority exist over a job:
//!
//! - **Client authority** is carried by a [`JobCap`]. The capability is
//!   issued once at creation and its holder recorded in storage. Presenting
//!   it requires the recorded holder's signature, and the cap must be bound
//!   to the job being acted on. Any mismatch is [`Error::NotAuthorized`].
//! - **Freelancer authority** is the caller's own address compared against
//!   the job's assigned freelancer. A mismatch is
//!   [`Error::FreelancerNotAssigned`], so callers can tell "wrong job" from
//!   "wrong role".

use soroban_sdk::{Address, Env};

use crate::storage;
use crate::types::{Job, JobCap};
use crate::Error;

/// Issue the capability for a freshly created job and record its holder.
pub fn issue_cap(env: &Env, job_id: u64, holder: &Address) -> JobCap {
    storage::save_cap_holder(env, job_id, holder);
    JobCap {
        bound_job_id: job_id,
    }
}

/// Check that `cap` was issued, that its holder signed this invocation,
/// and that it is bound to `job_id`.
pub fn require_cap(env: &Env, cap: &JobCap, job_id: u64) -> Result<(), Error> {
    let holder = storage::load_cap_holder(env, cap.bound_job_id).ok_or(Error::NotAuthorized)?;
    holder.require_auth();
    if cap.bound_job_id != job_id {
        return Err(Error::NotAuthorized);
    }
    Ok(())
}

/// Check that `caller` is the freelancer assigned to `job`.
pub fn require_freelancer(job: &Job, caller: &Address) -> Result<(), Error> {
    match &job.freelancer {
        Some(freelancer) if freelancer == caller => Ok(()),
        _ => Err(Error::FreelancerNotAssigned),
    }
}
