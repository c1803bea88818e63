//! # Types
//!
//! Shared data structures used across all modules of the escrow contract.
//!
//! ## Design decisions
//!
//! ### Terms / Progress split
//!
//! A `Job` is internally stored as two separate ledger entries:
//!
//! - [`JobTerms`]: written once at creation, never mutated.
//! - [`JobProgress`]: written on every transition after creation.
//!
//! The public API exposes the reconstructed [`Job`] struct for convenience.
//!
//! ### Status as a Finite-State Machine
//!
//! [`JobStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Open ──► Assigned ──► InProgress ──► Submitted ──► Completed
//!  │          │              ▲              │
//!  │          │              └──────────────┘
//!  └──────────┴──► Cancelled
//! ```
//!
//! `Completed` and `Cancelled` are terminal. `Disputed` is reserved and no
//! transition reaches it.

use soroban_sdk::{contracttype, Address, Bytes, String, Vec};

/// Lifecycle status of a job.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobStatus {
    /// Posted and funded; accepting applications and milestones.
    Open,
    /// A freelancer has been chosen but has not started.
    Assigned,
    /// Work underway; no submission awaiting review.
    InProgress,
    /// A milestone submission is awaiting client approval.
    Submitted,
    /// Every milestone approved; escrow drained.
    Completed,
    /// Client cancelled before work started; escrow refunded.
    Cancelled,
    /// Reserved for arbitration.
    Disputed,
}

impl JobStatus {
    /// `true` once no further mutation is permitted.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }
}

/// One payment tranche of a job.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Milestone {
    /// Position within the parent job's milestone list.
    pub index: u32,
    pub description: String,
    /// Amount released to the freelancer on approval.
    pub amount: i128,
    /// Set once by the freelancer's submission.
    pub completed: bool,
    /// Set once by the client's approval.
    pub approved: bool,
    /// Opaque reference to the delivered work.
    pub submission_ref: Option<Bytes>,
    pub submitted_at: Option<u64>,
    pub approved_at: Option<u64>,
}

/// Immutable job configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JobTerms {
    pub id: u64,
    pub client: Address,
    pub title: Bytes,
    pub description_ref: Bytes,
    pub budget: i128,
    pub created_at: u64,
    pub deadline: u64,
}

/// Mutable job state, updated by every transition after creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JobProgress {
    pub freelancer: Option<Address>,
    pub state: JobStatus,
    pub escrow_balance: i128,
    pub milestones: Vec<Milestone>,
    /// Applicants live under their own keys; only the count is kept here.
    pub applicant_count: u32,
    pub deliverable_refs: Vec<Bytes>,
}

/// Full representation of a job.
///
/// Used as the public API return type; reconstructed internally from
/// the split `JobTerms` + `JobProgress` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Job {
    /// Unique identifier (auto-incremented).
    pub id: u64,
    /// Address that posted the job and funded the escrow.
    pub client: Address,
    /// Assigned freelancer; `None` while the job is open.
    pub freelancer: Option<Address>,
    /// Opaque title payload.
    pub title: Bytes,
    /// Opaque reference to the externally stored job description.
    pub description_ref: Bytes,
    /// Amount deposited at creation.
    pub budget: i128,
    /// Amount still held in escrow.
    pub escrow_balance: i128,
    /// Current lifecycle status.
    pub state: JobStatus,
    pub milestones: Vec<Milestone>,
    /// Number of identities that applied while the job was open.
    pub applicant_count: u32,
    pub created_at: u64,
    /// Ledger timestamp after which applying and starting are refused.
    pub deadline: u64,
    /// Submission references, in submission order.
    pub deliverable_refs: Vec<Bytes>,
}

impl Job {
    pub fn from_parts(terms: JobTerms, progress: JobProgress) -> Self {
        Job {
            id: terms.id,
            client: terms.client,
            freelancer: progress.freelancer,
            title: terms.title,
            description_ref: terms.description_ref,
            budget: terms.budget,
            escrow_balance: progress.escrow_balance,
            state: progress.state,
            milestones: progress.milestones,
            applicant_count: progress.applicant_count,
            created_at: terms.created_at,
            deadline: terms.deadline,
            deliverable_refs: progress.deliverable_refs,
        }
    }

    pub fn terms(&self) -> JobTerms {
        JobTerms {
            id: self.id,
            client: self.client.clone(),
            title: self.title.clone(),
            description_ref: self.description_ref.clone(),
            budget: self.budget,
            created_at: self.created_at,
            deadline: self.deadline,
        }
    }

    pub fn progress(&self) -> JobProgress {
        JobProgress {
            freelancer: self.freelancer.clone(),
            state: self.state,
            escrow_balance: self.escrow_balance,
            milestones: self.milestones.clone(),
            applicant_count: self.applicant_count,
            deliverable_refs: self.deliverable_refs.clone(),
        }
    }

    /// Sum of all milestone amounts.
    pub fn allocated(&self) -> i128 {
        self.milestones.iter().map(|m| m.amount).sum()
    }

    /// Sum of approved milestone amounts, i.e. everything paid out so far.
    pub fn released(&self) -> i128 {
        self.milestones
            .iter()
            .filter(|m| m.approved)
            .map(|m| m.amount)
            .sum()
    }
}

/// Proof of client authority over exactly one job.
///
/// Issued once by `create`. The contract keeps a registry of who holds the
/// capability for each job, so a hand-built value is useless without the
/// holder's signature.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JobCap {
    pub bound_job_id: u64,
}

/// Contract-wide configuration written by `init`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EscrowConfig {
    /// Settlement token every job is funded in.
    pub token: Address,
}
