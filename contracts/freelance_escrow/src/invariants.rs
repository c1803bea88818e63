#![allow(dead_code)]

extern crate std;

use crate::lifecycle::is_valid_transition;
use crate::types::{Job, JobStatus};

/// INV-1: `0 <= escrow_balance <= budget`.
pub fn assert_escrow_bounded(job: &Job) {
    assert!(
        job.escrow_balance >= 0 && job.escrow_balance <= job.budget,
        "INV-1 violated: job {} escrow {} outside [0, {}]",
        job.id,
        job.escrow_balance,
        job.budget
    );
}

/// INV-2: Milestone amounts never sum past the budget.
pub fn assert_milestones_within_budget(job: &Job) {
    assert!(
        job.allocated() <= job.budget,
        "INV-2 violated: job {} allocates {} of budget {}",
        job.id,
        job.allocated(),
        job.budget
    );
}

/// INV-3: While the job is live, escrow holds exactly the budget minus
/// approved milestones. Terminal jobs hold nothing.
pub fn assert_escrow_matches_releases(job: &Job) {
    if job.state.is_terminal() {
        assert_eq!(
            job.escrow_balance, 0,
            "INV-3 violated: terminal job {} still holds {}",
            job.id, job.escrow_balance
        );
    } else {
        assert_eq!(
            job.escrow_balance,
            job.budget - job.released(),
            "INV-3 violated: job {} escrow {} != budget {} - released {}",
            job.id,
            job.escrow_balance,
            job.budget,
            job.released()
        );
    }
}

/// INV-4: A freelancer is set exactly when the job has left `Open`
/// (a job cancelled while open never gets one).
pub fn assert_freelancer_matches_state(job: &Job) {
    match job.state {
        JobStatus::Open => assert!(
            job.freelancer.is_none(),
            "INV-4 violated: open job {} has a freelancer",
            job.id
        ),
        JobStatus::Cancelled => {}
        _ => assert!(
            job.freelancer.is_some(),
            "INV-4 violated: job {} in {:?} has no freelancer",
            job.id,
            job.state
        ),
    }
}

/// INV-5: The client never appears among the applicants. `client_applied`
/// is the applicant registry's answer for the job's client.
pub fn assert_client_not_applicant(job: &Job, client_applied: bool) {
    assert!(
        !client_applied,
        "INV-5 violated: client of job {} is an applicant",
        job.id
    );
}

/// INV-6: Milestone sub-state is consistent: approval implies completion,
/// timestamps and references track the flags, and indices are positional.
pub fn assert_milestone_flags(job: &Job) {
    for (pos, m) in job.milestones.iter().enumerate() {
        assert_eq!(m.index as usize, pos, "INV-6 violated: index mismatch");
        assert!(m.amount > 0, "INV-6 violated: non-positive amount");
        assert!(!m.approved || m.completed, "INV-6 violated: approved before completed");
        assert_eq!(m.completed, m.submitted_at.is_some());
        assert_eq!(m.completed, m.submission_ref.is_some());
        assert_eq!(m.approved, m.approved_at.is_some());
    }
    let completed = job.milestones.iter().filter(|m| m.completed).count() as u32;
    assert_eq!(
        job.deliverable_refs.len(),
        completed,
        "INV-6 violated: deliverables out of step with submissions"
    );
}

/// INV-7: No value is created or destroyed.
pub fn assert_conservation(budget: i128, escrow: i128, released: i128, refunded: i128) {
    assert_eq!(
        budget,
        escrow + released + refunded,
        "INV-7 violated: {} != {} + {} + {}",
        budget,
        escrow,
        released,
        refunded
    );
}

/// INV-8: Only edges of the state machine are ever taken.
pub fn assert_valid_status_transition(from: JobStatus, to: JobStatus) {
    if from != to {
        assert!(
            is_valid_transition(from, to),
            "INV-8 violated: invalid status transition from {:?} to {:?}",
            from,
            to
        );
    }
}

/// INV-9: Terms written at creation never change.
pub fn assert_terms_immutable(original: &Job, current: &Job) {
    assert_eq!(original.terms(), current.terms(), "INV-9 violated: terms changed");
}

/// Run every invariant that needs only the job itself.
pub fn assert_all_job_invariants(job: &Job) {
    assert_escrow_bounded(job);
    assert_milestones_within_budget(job);
    assert_escrow_matches_releases(job);
    assert_freelancer_matches_state(job);
    assert_milestone_flags(job);
}
