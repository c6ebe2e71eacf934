//! Authorization predicates and the gate's self-administered settings.

use soroban_sdk::{log, Address, Env, IntoVal, Symbol, TryFromVal, Val, Vec};
use urdex_common_admin::SuccessionError;

use crate::invoker::Call;
use crate::{events, DataKey, TimelockError, MAXIMUM_DELAY, MINIMUM_DELAY};

const SET_PENDING_ADMIN: &str = "set_pending_admin";
const SET_DELAY: &str = "set_delay";

impl From<SuccessionError> for TimelockError {
    fn from(err: SuccessionError) -> Self {
        match err {
            SuccessionError::NotInitialized => TimelockError::NotInitialized,
            SuccessionError::NotAdmin
            | SuccessionError::NoPendingAdmin
            | SuccessionError::NotPendingAdmin => TimelockError::Unauthorized,
        }
    }
}

pub(crate) fn current_admin(env: &Env) -> Result<Address, TimelockError> {
    Ok(urdex_common_admin::admin(env, &DataKey::Admin)?)
}

pub(crate) fn require_admin(env: &Env, caller: &Address) -> Result<(), TimelockError> {
    Ok(urdex_common_admin::require_admin(env, &DataKey::Admin, caller)?)
}

/// Passes only when `caller` is the gate's own address.
pub(crate) fn require_self(env: &Env, caller: &Address) -> Result<(), TimelockError> {
    if *caller != env.current_contract_address() {
        return Err(TimelockError::Unauthorized);
    }
    Ok(())
}

pub(crate) fn validate_delay(delay: u64) -> Result<(), TimelockError> {
    if !(MINIMUM_DELAY..=MAXIMUM_DELAY).contains(&delay) {
        return Err(TimelockError::InvalidDelay);
    }
    Ok(())
}

pub(crate) fn delay(env: &Env) -> Result<u64, TimelockError> {
    env.storage()
        .instance()
        .get(&DataKey::Delay)
        .ok_or(TimelockError::NotInitialized)
}

pub(crate) fn request_admin_change(
    env: &Env,
    caller: &Address,
    pending_admin: &Address,
) -> Result<(), TimelockError> {
    require_self(env, caller)?;
    urdex_common_admin::nominate(env, &DataKey::PendingAdmin, pending_admin);
    events::pending_admin_set(env, pending_admin);
    Ok(())
}

pub(crate) fn set_delay(env: &Env, caller: &Address, new_delay: u64) -> Result<(), TimelockError> {
    require_self(env, caller)?;
    validate_delay(new_delay)?;
    env.storage().instance().set(&DataKey::Delay, &new_delay);
    events::delay_set(env, new_delay);
    Ok(())
}

pub(crate) fn accept_admin(env: &Env, caller: &Address) -> Result<(), TimelockError> {
    let previous =
        urdex_common_admin::accept(env, &DataKey::Admin, &DataKey::PendingAdmin, caller)?;
    events::admin_accepted(env, &previous, caller);
    Ok(())
}

/// Runs an executed action whose target is the gate itself. The host does
/// not allow a contract to re-enter itself, so the call is routed here
/// in-process with the gate's own address as the caller.
pub(crate) fn dispatch(env: &Env, call: &Call) -> Result<Val, TimelockError> {
    let gate = env.current_contract_address();
    if call.function == Symbol::new(env, SET_PENDING_ADMIN) {
        let pending_admin: Address = single_arg(env, &call.args)?;
        request_admin_change(env, &gate, &pending_admin)?;
    } else if call.function == Symbol::new(env, SET_DELAY) {
        let new_delay: u64 = single_arg(env, &call.args)?;
        set_delay(env, &gate, new_delay)?;
    } else {
        log!(env, "timelock: unknown self call", call.function);
        return Err(TimelockError::ExecutionReverted);
    }
    Ok(().into_val(env))
}

fn single_arg<T>(env: &Env, args: &Vec<Val>) -> Result<T, TimelockError>
where
    T: TryFromVal<Env, Val>,
{
    if args.len() != 1 {
        return Err(TimelockError::ExecutionReverted);
    }
    let raw = args.get(0).ok_or(TimelockError::ExecutionReverted)?;
    T::try_from_val(env, &raw).map_err(|_| TimelockError::ExecutionReverted)
}
