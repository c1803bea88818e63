//! # Escrow Ledger
//!
//! Each job owns exactly one balance of the settlement token. Only three
//! movements exist:
//!
//! | Operation      | When                       | Direction               |
//! |----------------|----------------------------|-------------------------|
//! | [`lock`]       | `create`                   | client → contract       |
//! | [`release`]    | milestone approval         | contract → freelancer   |
//! | [`refund_all`] | cancellation / completion  | contract → client       |
//!
//! Bookkeeping on `Job::escrow_balance` is done by [`debit`] and [`drain`]
//! inside the pure lifecycle functions; the token transfers here run last
//! in each entry point, after the new state has been written.
//!
//! Conservation: `budget == escrow_balance + released + refunded`.

use soroban_sdk::{token, Address, Env};

use crate::types::Job;
use crate::Error;

/// Pull `amount` of `token` from `from` into the contract.
pub fn lock(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<(), Error> {
    if amount <= 0 {
        return Err(Error::InsufficientFunds);
    }
    token::Client::new(env, token).transfer(from, &env.current_contract_address(), &amount);
    Ok(())
}

/// Pay `amount` out of the contract to `recipient`.
pub fn release(env: &Env, token: &Address, recipient: &Address, amount: i128) {
    if amount > 0 {
        token::Client::new(env, token).transfer(
            &env.current_contract_address(),
            recipient,
            &amount,
        );
    }
}

/// Return a drained balance to `recipient`.
pub fn refund_all(env: &Env, token: &Address, recipient: &Address, amount: i128) {
    release(env, token, recipient, amount);
}

/// Subtract `amount` from the job's escrow balance.
pub fn debit(job: &mut Job, amount: i128) -> Result<(), Error> {
    if amount <= 0 || amount > job.escrow_balance {
        return Err(Error::InsufficientFunds);
    }
    job.escrow_balance -= amount;
    Ok(())
}

/// Zero the job's escrow balance, returning what it held.
pub fn drain(job: &mut Job) -> i128 {
    let amount = job.escrow_balance;
    job.escrow_balance = 0;
    amount
}
