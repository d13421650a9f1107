use alloy::{
    primitives::{keccak256, Address, B256},
    providers::Provider,
};
use av_common::ens::{IEnsRegistry, IEnsResolver, ENS_REGISTRY};

use crate::{av_log, network::NetworkStore, search::SearchQuery};

/// EIP-137 namehash. Expects an already normalized name.
pub fn namehash(name: &str) -> B256 {
    if name.is_empty() {
        return B256::ZERO;
    }

    name.rsplit('.').fold(B256::ZERO, |node, label| {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(keccak256(label.as_bytes()).as_slice());
        keccak256(buf)
    })
}

pub async fn resolve_ens<P: Provider>(provider: &P, name: &str) -> crate::Result<Address> {
    let node = namehash(name);
    let failed = |error: alloy::contract::Error| {
        av_log!("ENS lookup of {name} failed: {error}");
        crate::Error::EnsResolutionFailed {
            name: name.to_string(),
            error: Box::new(error),
        }
    };

    let resolver = IEnsRegistry::new(ENS_REGISTRY, provider)
        .resolver(node)
        .call()
        .await
        .map_err(failed)?;
    if resolver.is_zero() {
        return Err(crate::Error::EnsNameNotFound(name.to_string()));
    }

    let address = IEnsResolver::new(resolver, provider)
        .addr(node)
        .call()
        .await
        .map_err(failed)?;
    if address.is_zero() {
        return Err(crate::Error::EnsNameNotFound(name.to_string()));
    }

    Ok(address)
}

/// Resolves a query to an address. ENS names go through mainnet, using the
/// Alchemy endpoint when a key is given.
pub async fn resolve(
    query: &SearchQuery,
    networks: &NetworkStore,
    alchemy_api_key: Option<&str>,
) -> crate::Result<Address> {
    match query {
        SearchQuery::Address(address) => Ok(*address),
        SearchQuery::Ens(name) => {
            let mainnet = networks
                .get_by_chain_id(1)
                .ok_or_else(|| crate::Error::NetworkNotFound("chain id 1".to_string()))?;
            let provider = mainnet.get_provider(alchemy_api_key)?;
            resolve_ens(&provider, name).await
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::b256;

    use super::*;

    #[test]
    fn test_namehash_vectors() {
        assert_eq!(namehash(""), B256::ZERO);
        assert_eq!(
            namehash("eth"),
            b256!("93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae")
        );
        assert_eq!(
            namehash("foo.eth"),
            b256!("de9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f")
        );
    }

    #[tokio::test]
    async fn test_resolve_address_query_needs_no_rpc() {
        let address = Address::repeat_byte(0xab);
        let store = NetworkStore::default();
        assert_eq!(
            resolve(&SearchQuery::Address(address), &store, None)
                .await
                .unwrap(),
            address
        );
    }

    #[tokio::test]
    async fn test_resolve_ens_without_mainnet() {
        let store = NetworkStore::default();
        assert!(matches!(
            resolve(&SearchQuery::Ens("vitalik.eth".to_string()), &store, None).await,
            Err(crate::Error::NetworkNotFound(_))
        ));
    }
}
