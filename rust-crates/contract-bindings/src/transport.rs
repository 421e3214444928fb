use crate::{
    address::{
        AccountAddress,
        ContractAddress,
    },
    error::Result,
    signer::TransactionSigner,
};
use std::future::Future;
use stellar_xdr::curr::ScVal;

/// One contract function call, before it becomes a transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct InvocationRequest {
    pub source: AccountAddress,
    pub contract: ContractAddress,
    pub function: String,
    pub args: Vec<ScVal>,
    pub network_passphrase: String,
}

/// What the network said the call would do.
#[derive(Clone, Debug, Default)]
pub struct Simulation {
    pub result: Option<ScVal>,
    /// Base64 `SorobanTransactionData` to attach before signing.
    pub transaction_data: Option<String>,
    /// Base64 `SorobanAuthorizationEntry` values.
    pub auth: Vec<String>,
    pub min_resource_fee: u64,
    pub latest_ledger: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmitOutcome {
    /// Hex transaction hash.
    pub hash: String,
    pub ledger: Option<u32>,
    /// What the contract function returned in the confirmed transaction.
    pub return_value: Option<ScVal>,
}

/// Where invocations get simulated and submitted. Implemented by the
/// Soroban JSON-RPC client and, for tests, by an in-memory network.
pub trait ContractTransport: Clone + Send + Sync + 'static {
    fn simulate(
        &self,
        request: &InvocationRequest,
    ) -> impl Future<Output = Result<Simulation>> + Send;

    /// Assemble, sign through `signer` and submit; resolves once the
    /// transaction is confirmed.
    fn submit(
        &self,
        request: &InvocationRequest,
        simulation: &Simulation,
        signer: &dyn TransactionSigner,
    ) -> impl Future<Output = Result<SubmitOutcome>> + Send;
}
