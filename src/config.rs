use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use contract_bindings::ContractAddress;
use deployments::{
    DappKind,
    DeploymentStore,
    NetworkEnv,
};
use std::path::Path;

/// Where a dapp talks to: endpoint, network identity and contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkProfile {
    pub env: NetworkEnv,
    pub dapp: DappKind,
    pub rpc_url: String,
    pub network_passphrase: String,
    pub contract_id: ContractAddress,
}

#[derive(Clone, Debug, Default)]
pub struct ProfileOverrides {
    pub rpc_url: Option<String>,
    pub contract_id: Option<String>,
}

/// CLI overrides win over the recorded deployment, which wins over the
/// built-in testnet contracts.
pub fn resolve_profile(
    deployments_root: impl AsRef<Path>,
    env: NetworkEnv,
    dapp: DappKind,
    overrides: &ProfileOverrides,
) -> Result<NetworkProfile> {
    let store = DeploymentStore::open(deployments_root, env, dapp)
        .map_err(|e| eyre!(e))
        .wrap_err("opening deployment store failed")?;
    let record = store
        .resolve(env, dapp)
        .map_err(|e| eyre!(e))
        .wrap_err_with(|| format!("reading {} deployment for {} failed", dapp, env))?;

    let contract_raw = match (&overrides.contract_id, &record) {
        (Some(id), _) => id.clone(),
        (None, Some(record)) => record.contract_id.clone(),
        (None, None) => {
            return Err(eyre!(
                "No {dapp} contract known for {env}; pass --contract-id or run `network set`"
            ));
        }
    };
    let contract_id: ContractAddress = contract_raw
        .parse()
        .wrap_err_with(|| format!("invalid contract id '{contract_raw}'"))?;

    let rpc_url = overrides
        .rpc_url
        .clone()
        .or_else(|| record.as_ref().map(|r| r.network_url.clone()))
        .unwrap_or_else(|| env.default_rpc_url().to_string());
    let network_passphrase = record
        .map(|r| r.network_passphrase)
        .unwrap_or_else(|| env.passphrase().to_string());

    Ok(NetworkProfile {
        env,
        dapp,
        rpc_url,
        network_passphrase,
        contract_id,
    })
}
