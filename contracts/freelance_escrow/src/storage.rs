//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the escrow:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key         | Type           | Description                        |
//! |-------------|----------------|------------------------------------|
//! | `Config`    | `EscrowConfig` | Settlement token                   |
//! | `JobCount`  | `u64`          | Auto-increment job ID counter      |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key              | Type          | Description                       |
//! |------------------|---------------|-----------------------------------|
//! | `Terms(id)`      | `JobTerms`    | Immutable job configuration       |
//! | `Progress(id)`   | `JobProgress` | Mutable job state                 |
//! | `CapHolder(id)`  | `Address`     | Holder of the job's capability    |
//! | `Applicant(id, a)` | `u32`       | Slot of applicant `a`             |
//! | `ApplicantAt(id, n)` | `Address` | Applicant in slot `n`             |
//!
//! Applicants get one entry each so that `Progress(id)`, which every
//! transition rewrites, stays the same size however many apply.
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{EscrowConfig, Job, JobProgress, JobTerms};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Settlement token (Instance).
    Config,
    /// Global auto-increment counter for job IDs (Instance).
    JobCount,
    /// Immutable job terms keyed by ID (Persistent).
    Terms(u64),
    /// Mutable job progress keyed by ID (Persistent).
    Progress(u64),
    /// Capability holder keyed by job ID (Persistent).
    CapHolder(u64),
    /// Application slot keyed by job ID and applicant (Persistent).
    Applicant(u64, Address),
    /// Applicant keyed by job ID and slot (Persistent).
    ApplicantAt(u64, u32),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn save_config(env: &Env, config: &EscrowConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn load_config(env: &Env) -> Result<EscrowConfig, Error> {
    let config = env
        .storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)?;
    bump_instance(env);
    Ok(config)
}

/// Atomically reads, increments, and stores the job counter.
/// Returns the ID to use for the *current* job (pre-increment value).
pub fn get_and_increment_job_id(env: &Env) -> u64 {
    bump_instance(env);
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::JobCount)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::JobCount, &(current + 1));
    current
}

pub fn job_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::JobCount)
        .unwrap_or(0)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Save both the immutable terms and initial progress for a new job.
pub fn save_job(env: &Env, job: &Job) {
    let terms_key = DataKey::Terms(job.id);
    env.storage().persistent().set(&terms_key, &job.terms());
    bump_persistent(env, &terms_key);
    save_job_progress(env, job.id, &job.progress());
}

/// Load the full `Job` by combining terms and progress.
pub fn load_job(env: &Env, id: u64) -> Result<Job, Error> {
    let terms = load_job_terms(env, id)?;
    let progress = load_job_progress(env, id)?;
    Ok(Job::from_parts(terms, progress))
}

pub fn load_job_terms(env: &Env, id: u64) -> Result<JobTerms, Error> {
    let key = DataKey::Terms(id);
    let terms: JobTerms = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::JobNotFound)?;
    bump_persistent(env, &key);
    Ok(terms)
}

pub fn load_job_progress(env: &Env, id: u64) -> Result<JobProgress, Error> {
    let key = DataKey::Progress(id);
    let progress: JobProgress = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::JobNotFound)?;
    bump_persistent(env, &key);
    Ok(progress)
}

/// Save only the mutable progress entry. Every transition after `create`
/// goes through here.
pub fn save_job_progress(env: &Env, id: u64, progress: &JobProgress) {
    let key = DataKey::Progress(id);
    env.storage().persistent().set(&key, progress);
    bump_persistent(env, &key);
}

pub fn save_cap_holder(env: &Env, job_id: u64, holder: &Address) {
    let key = DataKey::CapHolder(job_id);
    env.storage().persistent().set(&key, holder);
    bump_persistent(env, &key);
}

pub fn load_cap_holder(env: &Env, job_id: u64) -> Option<Address> {
    let key = DataKey::CapHolder(job_id);
    let holder = env.storage().persistent().get(&key);
    if holder.is_some() {
        bump_persistent(env, &key);
    }
    holder
}

pub fn is_applicant(env: &Env, job_id: u64, who: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Applicant(job_id, who.clone()))
}

/// Record `who` as the applicant in `slot`.
pub fn save_applicant(env: &Env, job_id: u64, slot: u32, who: &Address) {
    let key = DataKey::Applicant(job_id, who.clone());
    env.storage().persistent().set(&key, &slot);
    bump_persistent(env, &key);

    let key = DataKey::ApplicantAt(job_id, slot);
    env.storage().persistent().set(&key, who);
    bump_persistent(env, &key);
}

/// Applicants in application order, reading at most `limit` slots from `start`.
pub fn load_applicants(
    env: &Env,
    job_id: u64,
    start: u32,
    limit: u32,
    count: u32,
) -> Vec<Address> {
    let end = start.saturating_add(limit).min(count);
    let mut out = Vec::new(env);
    for slot in start..end {
        if let Some(who) = env
            .storage()
            .persistent()
            .get(&DataKey::ApplicantAt(job_id, slot))
        {
            out.push_back(who);
        }
    }
    out
}
