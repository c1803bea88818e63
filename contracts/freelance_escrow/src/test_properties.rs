//! Randomised operation sequences against a deployed contract. Every step
//! is followed by a full invariant sweep and a conservation check against
//! real token balances.

extern crate std;

use proptest::prelude::*;
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Bytes, Env, String,
};

use crate::invariants::{
    assert_all_job_invariants, assert_client_not_applicant, assert_conservation,
    assert_terms_immutable, assert_valid_status_transition,
};
use crate::{FreelanceEscrow, FreelanceEscrowClient, JobStatus};

const DAY: u64 = 86_400;
const ACTORS: usize = 4;
const FUNDING: i128 = 1_000_000_000;

/// One call against the contract. Actor 0 is the client; the rest are
/// would-be freelancers.
#[derive(Clone, Copy, Debug)]
enum Op {
    /// Milestone worth this many thousandths of the budget.
    AddMilestone(u32),
    Apply(usize),
    Assign(usize),
    Start(usize),
    Submit(usize, u32),
    Approve(u32),
    Cancel,
    Wait(u64),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (1u32..=600).prop_map(Op::AddMilestone),
        2 => (0..ACTORS).prop_map(Op::Apply),
        2 => (0..ACTORS).prop_map(Op::Assign),
        2 => (0..ACTORS).prop_map(Op::Start),
        2 => (0..ACTORS, 0u32..5).prop_map(|(actor, index)| Op::Submit(actor, index)),
        3 => (0u32..5).prop_map(Op::Approve),
        1 => Just(Op::Cancel),
        2 => (0..DAY / 3).prop_map(Op::Wait),
    ]
}

fn run_sequence(budget: i128, ops: &[Op]) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = 10_000);
    let contract_id = env.register(FreelanceEscrow, ());
    let escrow = FreelanceEscrowClient::new(&env, &contract_id);

    let issuer = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(issuer);
    let token = token::Client::new(&env, &sac.address());
    escrow.init(&sac.address());

    let poster = Address::generate(&env);
    token::StellarAssetClient::new(&env, &sac.address()).mint(&poster, &FUNDING);
    let actors: std::vec::Vec<Address> = (0..ACTORS)
        .map(|i| if i == 0 { poster.clone() } else { Address::generate(&env) })
        .collect();

    let (original, cap) = escrow.create(
        &poster,
        &Bytes::from_slice(&env, b"fuzzed job"),
        &Bytes::new(&env),
        &budget,
        &(env.ledger().timestamp() + DAY),
    );
    let id = original.id;
    let mut previous = original.clone();
    let mut total_released: i128 = 0;

    for op in ops {
        match *op {
            Op::AddMilestone(permille) => {
                let amount = (budget * permille as i128 / 1_000).max(1);
                let desc = String::from_str(&env, "m");
                let _ = escrow.try_add_milestone(&id, &cap, &desc, &amount);
            }
            Op::Apply(actor) => {
                let _ = escrow.try_apply(&id, &actors[actor]);
            }
            Op::Assign(actor) => {
                let _ = escrow.try_assign(&id, &cap, &actors[actor]);
            }
            Op::Start(actor) => {
                let _ = escrow.try_start(&id, &actors[actor]);
            }
            Op::Submit(actor, index) => {
                let reference = Bytes::new(&env);
                let _ = escrow.try_submit_milestone(&id, &actors[actor], &index, &reference);
            }
            Op::Approve(index) => {
                if let Ok(Ok(amount)) = escrow.try_approve_milestone(&id, &cap, &index) {
                    total_released += amount;
                }
            }
            Op::Cancel => {
                let _ = escrow.try_cancel(&id, &cap);
            }
            Op::Wait(secs) => {
                let t = env.ledger().timestamp() + secs;
                env.ledger().with_mut(|li| li.timestamp = t);
            }
        }

        let job = escrow.get_job(&id);
        assert_all_job_invariants(&job);
        assert_client_not_applicant(&job, escrow.is_applicant(&id, &poster));
        assert_terms_immutable(&original, &job);
        assert_valid_status_transition(previous.state, job.state);
        if previous.state.is_terminal() {
            assert_eq!(job, previous, "terminal job mutated after {:?}", op);
        }

        let released: i128 = actors[1..].iter().map(|a| token.balance(a)).sum();
        let refunded = token.balance(&poster) - (FUNDING - budget);
        assert_eq!(released, total_released);
        assert_eq!(released, job.released());
        assert!(released <= budget, "overpaid after {:?}", op);
        assert_eq!(token.balance(&escrow.address), job.escrow_balance);
        assert_conservation(budget, job.escrow_balance, released, refunded);

        previous = job;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_random_sequences_conserve_funds(
        budget in 1_000i128..10_000,
        ops in prop::collection::vec(arb_op(), 1..60),
    ) {
        run_sequence(budget, &ops);
    }

    #[test]
    fn test_random_milestone_splits_complete_and_drain(
        budget in 100i128..1_000,
        parts in 1i128..=4,
    ) {
        let env = Env::default();
        env.mock_all_auths();
        let contract_id = env.register(FreelanceEscrow, ());
        let escrow = FreelanceEscrowClient::new(&env, &contract_id);
        let issuer = Address::generate(&env);
        let sac = env.register_stellar_asset_contract_v2(issuer);
        escrow.init(&sac.address());
        let poster = Address::generate(&env);
        let freelancer = Address::generate(&env);
        let token = token::Client::new(&env, &sac.address());
        token::StellarAssetClient::new(&env, &sac.address()).mint(&poster, &FUNDING);

        let (job, cap) = escrow.create(
            &poster,
            &Bytes::from_slice(&env, b"job"),
            &Bytes::new(&env),
            &budget,
            &DAY,
        );
        let desc = String::from_str(&env, "m");
        for _ in 0..parts {
            escrow.add_milestone(&job.id, &cap, &desc, &(budget / parts));
        }
        escrow.apply(&job.id, &freelancer);
        escrow.assign(&job.id, &cap, &freelancer);
        escrow.start(&job.id, &freelancer);
        for i in (0..parts as u32).rev() {
            escrow.submit_milestone(&job.id, &freelancer, &i, &Bytes::new(&env));
            escrow.approve_milestone(&job.id, &cap, &i);
        }

        assert_eq!(escrow.job_state(&job.id), JobStatus::Completed);
        assert_eq!(escrow.escrow_balance(&job.id), 0);
        assert_eq!(token.balance(&freelancer), (budget / parts) * parts);
        assert_eq!(token.balance(&poster), FUNDING - (budget / parts) * parts);
    }
}
