//! Queue, cancel and execute. Callers have already been authorized; `now`
//! is the ledger timestamp read once by the entry point.

use soroban_sdk::{log, BytesN, Env, Val};

use crate::invoker::{Call, Invoker};
use crate::{admin, events, registry, DataKey, QueuedAction, TimelockError, GRACE_PERIOD};

pub(crate) fn queue(
    env: &Env,
    action: &QueuedAction,
    now: u64,
) -> Result<BytesN<32>, TimelockError> {
    let delay = admin::delay(env)?;
    if action.eta < now.saturating_add(delay) {
        return Err(TimelockError::InvalidSchedule);
    }
    validate_value(env, action)?;

    let fingerprint = registry::fingerprint(env, action);
    registry::insert(env, &fingerprint, action, now);
    events::queued(env, &fingerprint, action);
    Ok(fingerprint)
}

pub(crate) fn cancel(env: &Env, action: &QueuedAction) -> BytesN<32> {
    let fingerprint = registry::fingerprint(env, action);
    registry::remove(env, &fingerprint);
    events::cancelled(env, &fingerprint, action);
    fingerprint
}

/// Executable from `eta` through `eta + GRACE_PERIOD`, both inclusive.
pub(crate) fn check_window(now: u64, eta: u64) -> Result<(), TimelockError> {
    if now < eta {
        return Err(TimelockError::TransactionLocked);
    }
    if now > eta.saturating_add(GRACE_PERIOD) {
        return Err(TimelockError::TransactionStale);
    }
    Ok(())
}

pub(crate) fn execute<I: Invoker>(
    env: &Env,
    invoker: &I,
    action: &QueuedAction,
    now: u64,
) -> Result<Val, TimelockError> {
    let fingerprint = registry::fingerprint(env, action);
    if !registry::contains(env, &fingerprint) {
        return Err(TimelockError::NotQueued);
    }
    check_window(now, action.eta)?;

    // Cleared before delegating: a call that re-enters with the same action
    // finds it unqueued.
    registry::remove(env, &fingerprint);

    let returned = Call::derive(env, &action.signature, &action.payload)
        .and_then(|call| {
            if action.target == env.current_contract_address() {
                admin::dispatch(env, &call)
            } else {
                invoker.call(&action.target, action.value, &call)
            }
        })
        .map_err(|_| {
            log!(env, "timelock: execution reverted", fingerprint);
            TimelockError::ExecutionReverted
        })?;

    events::executed(env, &fingerprint, action, &returned);
    Ok(returned)
}

fn validate_value(env: &Env, action: &QueuedAction) -> Result<(), TimelockError> {
    if action.value < 0 {
        return Err(TimelockError::InvalidValue);
    }
    if action.value > 0
        && action.target != env.current_contract_address()
        && !env.storage().instance().has(&DataKey::ValueToken)
    {
        return Err(TimelockError::InvalidValue);
    }
    Ok(())
}
