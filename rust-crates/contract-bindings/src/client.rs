use crate::{
    address::{
        AccountAddress,
        ContractAddress,
    },
    codec::FromScVal,
    error::{
        ClientError,
        Result,
    },
    signer::TransactionSigner,
    transport::{
        ContractTransport,
        InvocationRequest,
        Simulation,
    },
};
use std::{
    fmt,
    sync::Arc,
};
use stellar_xdr::curr::ScVal;

/// Everything a client is bound to. Never mutated after construction:
/// switching accounts means building a new client.
#[derive(Clone)]
pub struct ClientOptions<T> {
    pub transport: T,
    pub network_passphrase: String,
    pub contract_id: ContractAddress,
    pub public_key: AccountAddress,
    pub signer: Option<Arc<dyn TransactionSigner>>,
}

impl<T> fmt::Debug for ClientOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("network_passphrase", &self.network_passphrase)
            .field("contract_id", &self.contract_id)
            .field("public_key", &self.public_key)
            .field("has_signer", &self.signer.is_some())
            .finish()
    }
}

#[derive(Clone)]
pub struct ContractClient<T> {
    options: ClientOptions<T>,
}

impl<T> fmt::Debug for ContractClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.options, f)
    }
}

impl<T: ContractTransport> ContractClient<T> {
    pub fn new(options: ClientOptions<T>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ClientOptions<T> {
        &self.options
    }

    pub fn public_key(&self) -> AccountAddress {
        self.options.public_key
    }

    /// Build and simulate a call to `function`.
    pub async fn invoke<R: FromScVal>(
        &self,
        function: &str,
        args: Vec<ScVal>,
    ) -> Result<AssembledTransaction<R, T>> {
        let request = InvocationRequest {
            source: self.options.public_key,
            contract: self.options.contract_id,
            function: function.to_string(),
            args,
            network_passphrase: self.options.network_passphrase.clone(),
        };
        tracing::debug!(function, contract = %request.contract, "simulating");
        let simulation = self.options.transport.simulate(&request).await?;
        let raw = simulation.result.clone().unwrap_or(ScVal::Void);
        let result = R::from_sc_val(&raw)?;
        Ok(AssembledTransaction {
            options: self.options.clone(),
            request,
            simulation,
            result,
        })
    }
}

/// A simulated call ready to be signed and sent.
pub struct AssembledTransaction<R, T> {
    options: ClientOptions<T>,
    request: InvocationRequest,
    simulation: Simulation,
    result: R,
}

impl<R: fmt::Debug, T> fmt::Debug for AssembledTransaction<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssembledTransaction")
            .field("function", &self.request.function)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentTransaction<R> {
    pub hash: String,
    pub result: R,
}

impl<R: FromScVal, T: ContractTransport> AssembledTransaction<R, T> {
    /// The value the simulation returned.
    pub fn result(&self) -> &R {
        &self.result
    }

    pub fn into_result(self) -> R {
        self.result
    }

    /// Sign with the client's signer and submit. The returned result is
    /// decoded from the confirmed transaction, not from the simulation.
    ///
    /// The signer must belong to the account this client was built for;
    /// anything else is refused before the transport is touched.
    pub async fn sign_and_send(self) -> Result<SentTransaction<R>> {
        let signer = self.options.signer.clone().ok_or_else(|| {
            ClientError::Signing("no signer configured for this client".into())
        })?;
        let signer_key = signer.public_key();
        if signer_key != self.request.source {
            return Err(ClientError::Signing(format!(
                "signer {signer_key} does not match client account {}",
                self.request.source
            )));
        }
        tracing::info!(
            function = %self.request.function,
            source = %self.request.source,
            "submitting transaction"
        );
        let outcome = self
            .options
            .transport
            .submit(&self.request, &self.simulation, signer.as_ref())
            .await?;
        let raw = outcome.return_value.unwrap_or(ScVal::Void);
        Ok(SentTransaction {
            hash: outcome.hash,
            result: R::from_sc_val(&raw)?,
        })
    }
}
