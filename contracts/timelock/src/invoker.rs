//! Opaque calls to arbitrary targets.

use soroban_sdk::{token, Address, Env, Symbol, TryFromVal, Val, Vec};

use crate::{DataKey, TimelockError};

/// A resolved contract call: function name plus argument vector.
#[derive(Clone, Debug)]
pub(crate) struct Call {
    pub function: Symbol,
    pub args: Vec<Val>,
}

impl Call {
    /// With a signature the payload is the argument vector. Without one, or
    /// with an empty one, the payload's first element must name the function.
    pub(crate) fn derive(
        env: &Env,
        signature: &Option<Symbol>,
        payload: &Vec<Val>,
    ) -> Result<Self, TimelockError> {
        let empty = Symbol::new(env, "");
        if let Some(function) = signature.as_ref().filter(|function| **function != empty) {
            return Ok(Call {
                function: function.clone(),
                args: payload.clone(),
            });
        }
        let head = payload.first().ok_or(TimelockError::ExecutionReverted)?;
        let function =
            Symbol::try_from_val(env, &head).map_err(|_| TimelockError::ExecutionReverted)?;
        Ok(Call {
            function,
            args: payload.slice(1..),
        })
    }
}

pub(crate) trait Invoker {
    fn call(&self, target: &Address, value: i128, call: &Call) -> Result<Val, TimelockError>;
}

/// Invokes targets through the Soroban host. A positive `value` is paid in
/// the configured value token just before the call.
pub(crate) struct HostInvoker<'a> {
    env: &'a Env,
    value_token: Option<Address>,
}

impl<'a> HostInvoker<'a> {
    pub(crate) fn new(env: &'a Env) -> Self {
        HostInvoker {
            env,
            value_token: env.storage().instance().get(&DataKey::ValueToken),
        }
    }

    fn pay(&self, target: &Address, value: i128) -> Result<(), TimelockError> {
        let token_addr = self
            .value_token
            .as_ref()
            .ok_or(TimelockError::InvalidValue)?;
        let token_client = token::Client::new(self.env, token_addr);
        match token_client.try_transfer(&self.env.current_contract_address(), target, &value) {
            Ok(Ok(())) => Ok(()),
            _ => Err(TimelockError::ExecutionReverted),
        }
    }
}

impl Invoker for HostInvoker<'_> {
    fn call(&self, target: &Address, value: i128, call: &Call) -> Result<Val, TimelockError> {
        if value > 0 {
            self.pay(target, value)?;
        }
        match self
            .env
            .try_invoke_contract::<Val, TimelockError>(target, &call.function, call.args.clone())
        {
            Ok(Ok(returned)) => Ok(returned),
            _ => Err(TimelockError::ExecutionReverted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::{symbol_short, testutils::Address as _, vec, IntoVal};

    #[test]
    fn test_derive_with_signature_keeps_payload() {
        let env = Env::default();
        let to = Address::generate(&env);
        let payload = vec![&env, to.into_val(&env), 100i128.into_val(&env)];

        let call = Call::derive(&env, &Some(symbol_short!("mint")), &payload).unwrap();
        assert_eq!(call.function, symbol_short!("mint"));
        assert_eq!(call.args.len(), 2);
    }

    #[test]
    fn test_derive_without_signature_reads_function_from_payload() {
        let env = Env::default();
        let to = Address::generate(&env);
        let payload = vec![
            &env,
            symbol_short!("transfer").into_val(&env),
            to.into_val(&env),
            100i128.into_val(&env),
        ];

        let call = Call::derive(&env, &None, &payload).unwrap();
        assert_eq!(call.function, symbol_short!("transfer"));
        assert_eq!(call.args.len(), 2);
        let first: Address = Address::try_from_val(&env, &call.args.get(0).unwrap()).unwrap();
        assert_eq!(first, to);
    }

    #[test]
    fn test_derive_empty_signature_reads_function_from_payload() {
        let env = Env::default();
        let payload = vec![
            &env,
            symbol_short!("echo").into_val(&env),
            7u32.into_val(&env),
        ];

        let call = Call::derive(&env, &Some(Symbol::new(&env, "")), &payload).unwrap();
        assert_eq!(call.function, symbol_short!("echo"));
        assert_eq!(call.args.len(), 1);
    }

    #[test]
    fn test_derive_without_signature_or_payload() {
        let env = Env::default();
        let payload: Vec<Val> = Vec::new(&env);

        assert_eq!(
            Call::derive(&env, &None, &payload).unwrap_err(),
            TimelockError::ExecutionReverted
        );
    }

    #[test]
    fn test_derive_rejects_non_symbol_head() {
        let env = Env::default();
        let payload = vec![&env, 7u32.into_val(&env)];

        assert_eq!(
            Call::derive(&env, &None, &payload).unwrap_err(),
            TimelockError::ExecutionReverted
        );
    }
}
