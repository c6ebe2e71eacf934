//! Urdex - Common Admin
//! Two-step administrator succession shared by the Urdex contracts.
//!
//! The storage keys are supplied by the calling contract so every contract
//! keeps its own `DataKey` layout. All state lives in instance storage.

#![no_std]
use soroban_sdk::{Address, Env, IntoVal, TryFromVal, Val};

/// Why a succession step was refused.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SuccessionError {
    /// No administrator has been stored yet.
    NotInitialized,
    /// The caller is not the stored administrator.
    NotAdmin,
    /// `accept` was called while no nomination is outstanding.
    NoPendingAdmin,
    /// The caller is not the nominated administrator.
    NotPendingAdmin,
}

pub fn admin<K>(env: &Env, admin_key: &K) -> Result<Address, SuccessionError>
where
    K: IntoVal<Env, Val> + TryFromVal<Env, Val> + Clone,
{
    env.storage()
        .instance()
        .get(admin_key)
        .ok_or(SuccessionError::NotInitialized)
}

pub fn pending_admin<K>(env: &Env, pending_key: &K) -> Option<Address>
where
    K: IntoVal<Env, Val> + TryFromVal<Env, Val> + Clone,
{
    env.storage().instance().get(pending_key)
}

/// Requires `caller`'s signature and checks it against the stored administrator.
pub fn require_admin<K>(env: &Env, admin_key: &K, caller: &Address) -> Result<(), SuccessionError>
where
    K: IntoVal<Env, Val> + TryFromVal<Env, Val> + Clone,
{
    caller.require_auth();
    let stored = admin(env, admin_key)?;
    if *caller != stored {
        return Err(SuccessionError::NotAdmin);
    }
    Ok(())
}

/// Records `nominee` as the next administrator, replacing any earlier
/// nomination. Callers are responsible for authorizing the nomination.
pub fn nominate<K>(env: &Env, pending_key: &K, nominee: &Address)
where
    K: IntoVal<Env, Val> + TryFromVal<Env, Val> + Clone,
{
    env.storage().instance().set(pending_key, nominee);
}

/// Completes a succession. Returns the administrator that was replaced.
pub fn accept<K>(
    env: &Env,
    admin_key: &K,
    pending_key: &K,
    caller: &Address,
) -> Result<Address, SuccessionError>
where
    K: IntoVal<Env, Val> + TryFromVal<Env, Val> + Clone,
{
    caller.require_auth();
    let pending = pending_admin(env, pending_key).ok_or(SuccessionError::NoPendingAdmin)?;
    if *caller != pending {
        return Err(SuccessionError::NotPendingAdmin);
    }
    let previous = admin(env, admin_key)?;
    env.storage().instance().set(admin_key, caller);
    env.storage().instance().remove(pending_key);
    Ok(previous)
}
