use alloy::primitives::Address;
use alloy::providers::Provider;
use tracing::{debug, warn};

use crate::bindings::ISiloFactory;

/// Asks the factory whether `silo` is one of its deployments. A failed call
/// is logged and reported as not registered.
#[tracing::instrument(skip(provider), level = tracing::Level::DEBUG)]
pub async fn is_silo_registered<P: Provider>(provider: P, factory: Address, silo: Address) -> bool {
    let factory_contract = ISiloFactory::new(factory, provider);

    match factory_contract.isSilo(silo).call().await {
        Ok(registered) => {
            debug!(registered, "Factory membership read");
            registered
        }
        Err(error) => {
            warn!(%error, "isSilo call failed, treating silo as unregistered");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Bytes, address};
    use alloy::providers::{ProviderBuilder, mock::Asserter};
    use alloy::sol_types::SolCall;
    use tracing_test::traced_test;

    use super::*;
    use crate::bindings::ISiloFactory::isSiloCall;

    const FACTORY: Address = address!("0x22a3cf6149bfa611bafc89fd721918ec3cf7b581");
    const SILO: Address = address!("0x1111111111111111111111111111111111111111");

    fn is_silo_response(registered: bool) -> Bytes {
        Bytes::from(<isSiloCall as SolCall>::abi_encode_returns(&registered))
    }

    #[tokio::test]
    async fn registered_silo_is_confirmed() {
        let asserter = Asserter::new();
        asserter.push_success(&is_silo_response(true));
        let provider = ProviderBuilder::new().connect_mocked_client(asserter);

        assert!(is_silo_registered(&provider, FACTORY, SILO).await);
    }

    #[tokio::test]
    async fn unknown_silo_is_rejected() {
        let asserter = Asserter::new();
        asserter.push_success(&is_silo_response(false));
        let provider = ProviderBuilder::new().connect_mocked_client(asserter);

        assert!(!is_silo_registered(&provider, FACTORY, SILO).await);
    }

    #[traced_test]
    #[tokio::test]
    async fn rpc_failure_fails_closed() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("execution reverted");
        let provider = ProviderBuilder::new().connect_mocked_client(asserter);

        assert!(!is_silo_registered(&provider, FACTORY, SILO).await);
        assert!(logs_contain("isSilo call failed"));
    }
}
