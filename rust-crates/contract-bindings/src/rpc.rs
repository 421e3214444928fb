//! Soroban JSON-RPC transport.

use crate::{
    address::AccountAddress,
    error::{
        ClientError,
        Result,
    },
    signer::TransactionSigner,
    transport::{
        ContractTransport,
        InvocationRequest,
        Simulation,
        SubmitOutcome,
    },
};
use reqwest::StatusCode;
use serde::{
    Deserialize,
    Serialize,
    de::DeserializeOwned,
};
use serde_json::json;
use sha2::{
    Digest,
    Sha256,
};
use std::{
    future::Future,
    time::Duration,
};
use stellar_xdr::curr::{
    DecoratedSignature,
    Hash,
    HostFunction,
    InvokeContractArgs,
    InvokeHostFunctionOp,
    LedgerEntryData,
    LedgerKey,
    LedgerKeyAccount,
    Limits,
    Memo,
    Operation,
    OperationBody,
    Preconditions,
    ReadXdr,
    ScSymbol,
    ScVal,
    SequenceNumber,
    Signature,
    SignatureHint,
    SorobanAuthorizationEntry,
    SorobanTransactionData,
    TimeBounds,
    TimePoint,
    Transaction,
    TransactionEnvelope,
    TransactionExt,
    TransactionMeta,
    TransactionSignaturePayload,
    TransactionSignaturePayloadTaggedTransaction,
    TransactionV1Envelope,
    VecM,
    WriteXdr,
};
use tracing::warn;

/// Inclusion fee in stroops, before the simulated resource fee.
pub const BASE_FEE: u32 = 100;
pub const TX_TIMEOUT_SECS: u64 = 300;
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(250);
const CONFIRM_POLL_INTERVAL: Duration = Duration::from_secs(1);
const CONFIRM_POLL_ATTEMPTS: u32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Retry {
    /// Safe to repeat: reads, simulations, status polls.
    Idempotent,
    Never,
}

#[derive(Clone, Debug)]
pub struct SorobanRpcTransport {
    url: String,
    http: reqwest::Client,
}

impl SorobanRpcTransport {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| {
                ClientError::permanent_transport(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self { url, http })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
        retry: Retry,
    ) -> Result<R> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let body = &body;
        with_retry(method, retry, move || self.call_once(method, body)).await
    }

    async fn call_once<R: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<R> {
        let res = self
            .http
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| classify_reqwest(method, e))?;
        let status = res.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(ClientError::transient(format!(
                "{method}: RPC endpoint responded with {status}"
            )));
        }
        if !status.is_success() {
            return Err(ClientError::permanent_transport(format!(
                "{method}: RPC endpoint responded with {status}"
            )));
        }
        let envelope: RpcEnvelope<R> = res.json().await.map_err(|e| {
            ClientError::permanent_transport(format!("{method}: invalid response: {e}"))
        })?;
        envelope.into_result(method)
    }

    async fn account_sequence(&self, account: AccountAddress) -> Result<i64> {
        let key = LedgerKey::Account(LedgerKeyAccount {
            account_id: account.to_account_id(),
        });
        let params = json!({ "keys": [key.to_xdr_base64(Limits::none())?] });
        let res: GetLedgerEntriesResponse = self
            .call("getLedgerEntries", params, Retry::Idempotent)
            .await?;
        let entry = res
            .entries
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| {
                ClientError::Simulation(format!(
                    "account {account} not found; fund it before transacting"
                ))
            })?;
        match LedgerEntryData::from_xdr_base64(&entry.xdr, Limits::none())? {
            LedgerEntryData::Account(account_entry) => Ok(account_entry.seq_num.0),
            other => Err(ClientError::decode(format!(
                "expected an account entry, got {:?}",
                other.name()
            ))),
        }
    }

    async fn wait_for_confirmation(&self, hash: &str) -> Result<SubmitOutcome> {
        for _ in 0..CONFIRM_POLL_ATTEMPTS {
            let res: GetTransactionResponse = self
                .call("getTransaction", json!({ "hash": hash }), Retry::Idempotent)
                .await?;
            match res.into_outcome(hash)? {
                Some(outcome) => return Ok(outcome),
                None => tokio::time::sleep(CONFIRM_POLL_INTERVAL).await,
            }
        }
        Err(ClientError::Submission(format!(
            "transaction {hash} was not confirmed within {} s",
            CONFIRM_POLL_ATTEMPTS as u64 * CONFIRM_POLL_INTERVAL.as_secs()
        )))
    }
}

impl ContractTransport for SorobanRpcTransport {
    async fn simulate(&self, request: &InvocationRequest) -> Result<Simulation> {
        let sequence = self.account_sequence(request.source).await?;
        let tx = build_transaction(
            request,
            sequence + 1,
            BASE_FEE,
            Vec::new(),
            None,
            deadline(),
        )?;
        let envelope = TransactionEnvelope::Tx(TransactionV1Envelope {
            tx,
            signatures: VecM::default(),
        });
        let params = json!({ "transaction": envelope.to_xdr_base64(Limits::none())? });
        let res: SimulateResponse = self
            .call("simulateTransaction", params, Retry::Idempotent)
            .await?;
        res.into_simulation()
    }

    async fn submit(
        &self,
        request: &InvocationRequest,
        simulation: &Simulation,
        signer: &dyn TransactionSigner,
    ) -> Result<SubmitOutcome> {
        let sequence = self.account_sequence(request.source).await?;
        let auth = simulation
            .auth
            .iter()
            .map(|entry| SorobanAuthorizationEntry::from_xdr_base64(entry, Limits::none()))
            .collect::<std::result::Result<Vec<_>, stellar_xdr::curr::Error>>()?;
        let soroban_data = simulation
            .transaction_data
            .as_deref()
            .map(|data| SorobanTransactionData::from_xdr_base64(data, Limits::none()))
            .transpose()?;
        let resource_fee = u32::try_from(simulation.min_resource_fee).unwrap_or(u32::MAX);
        let tx = build_transaction(
            request,
            sequence + 1,
            BASE_FEE.saturating_add(resource_fee),
            auth,
            soroban_data,
            deadline(),
        )?;
        let hash = transaction_hash(&tx, &request.network_passphrase)?;
        let signature = signer.sign(&hash)?;
        let envelope = signed_envelope(tx, &signer.public_key(), signature)?;
        let params = json!({ "transaction": envelope.to_xdr_base64(Limits::none())? });
        let sent: SendTransactionResponse =
            self.call("sendTransaction", params, Retry::Never).await?;
        match sent.status.as_str() {
            "PENDING" | "DUPLICATE" => {}
            "TRY_AGAIN_LATER" => {
                return Err(ClientError::transient(
                    "network is congested; try again later",
                ));
            }
            status => {
                let detail = sent
                    .error_result_xdr
                    .map(|xdr| format!(": {xdr}"))
                    .unwrap_or_default();
                return Err(ClientError::Submission(format!(
                    "transaction rejected with status {status}{detail}"
                )));
            }
        }
        self.wait_for_confirmation(&sent.hash).await
    }
}

/// Run `attempt` until it succeeds, fails permanently, or runs out of
/// attempts. Only `Retry::Idempotent` calls are repeated, with the delay
/// doubling from `RETRY_BACKOFF`.
async fn with_retry<R, F, Fut>(method: &str, retry: Retry, mut attempt: F) -> Result<R>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let mut tries = 1;
    loop {
        match attempt().await {
            Err(err)
                if err.is_transient() && retry == Retry::Idempotent && tries < MAX_ATTEMPTS =>
            {
                let delay = RETRY_BACKOFF * 2u32.pow(tries - 1);
                warn!(
                    method,
                    attempt = tries,
                    ?delay,
                    error = %err,
                    "transient RPC failure; retrying"
                );
                tokio::time::sleep(delay).await;
                tries += 1;
            }
            other => return other,
        }
    }
}

fn classify_reqwest(method: &str, err: reqwest::Error) -> ClientError {
    let message = format!("{method}: {err}");
    if err.is_timeout() || err.is_connect() || err.is_request() {
        ClientError::transient(message)
    } else {
        ClientError::permanent_transport(message)
    }
}

fn deadline() -> u64 {
    let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
    now + TX_TIMEOUT_SECS
}

/// Single-operation contract invocation.
pub fn build_transaction(
    request: &InvocationRequest,
    sequence: i64,
    fee: u32,
    auth: Vec<SorobanAuthorizationEntry>,
    soroban_data: Option<SorobanTransactionData>,
    max_time: u64,
) -> Result<Transaction> {
    let invoke = InvokeContractArgs {
        contract_address: request.contract.to_sc_address(),
        function_name: ScSymbol(request.function.as_str().try_into()?),
        args: request.args.clone().try_into()?,
    };
    let operation = Operation {
        source_account: None,
        body: OperationBody::InvokeHostFunction(InvokeHostFunctionOp {
            host_function: HostFunction::InvokeContract(invoke),
            auth: auth.try_into()?,
        }),
    };
    let ext = match soroban_data {
        Some(data) => TransactionExt::V1(data),
        None => TransactionExt::V0,
    };
    Ok(Transaction {
        source_account: request.source.to_muxed(),
        fee,
        seq_num: SequenceNumber(sequence),
        cond: Preconditions::Time(TimeBounds {
            min_time: TimePoint(0),
            max_time: TimePoint(max_time),
        }),
        memo: Memo::None,
        operations: vec![operation].try_into()?,
        ext,
    })
}

/// The hash a signer commits to: `sha256(network_id || tagged tx)`.
pub fn transaction_hash(tx: &Transaction, network_passphrase: &str) -> Result<[u8; 32]> {
    let network_id = Hash(Sha256::digest(network_passphrase.as_bytes()).into());
    let payload = TransactionSignaturePayload {
        network_id,
        tagged_transaction: TransactionSignaturePayloadTaggedTransaction::Tx(tx.clone()),
    };
    let bytes = payload.to_xdr(Limits::none())?;
    Ok(Sha256::digest(&bytes).into())
}

pub fn signed_envelope(
    tx: Transaction,
    signer: &AccountAddress,
    signature: [u8; 64],
) -> Result<TransactionEnvelope> {
    let mut hint = [0u8; 4];
    hint.copy_from_slice(&signer.as_bytes()[28..]);
    let decorated = DecoratedSignature {
        hint: SignatureHint(hint),
        signature: Signature(signature.to_vec().try_into()?),
    };
    Ok(TransactionEnvelope::Tx(TransactionV1Envelope {
        tx,
        signatures: vec![decorated].try_into()?,
    }))
}

#[derive(Deserialize)]
struct RpcEnvelope<R> {
    result: Option<R>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl<R> RpcEnvelope<R> {
    /// JSON-RPC error objects are answers, not outages: never transient.
    fn into_result(self, method: &str) -> Result<R> {
        match (self.result, self.error) {
            (_, Some(err)) => Err(ClientError::permanent_transport(format!(
                "{method}: {} (code {})",
                err.message, err.code
            ))),
            (Some(result), None) => Ok(result),
            (None, None) => Err(ClientError::permanent_transport(format!(
                "{method}: response carried neither result nor error"
            ))),
        }
    }
}

#[derive(Deserialize)]
struct GetLedgerEntriesResponse {
    entries: Option<Vec<LedgerEntryResult>>,
}

#[derive(Deserialize)]
struct LedgerEntryResult {
    xdr: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    error: Option<String>,
    transaction_data: Option<String>,
    min_resource_fee: Option<String>,
    results: Option<Vec<SimulateHostFunctionResult>>,
    #[serde(default)]
    latest_ledger: u32,
}

#[derive(Debug, Deserialize)]
struct SimulateHostFunctionResult {
    auth: Option<Vec<String>>,
    xdr: String,
}

impl SimulateResponse {
    fn into_simulation(self) -> Result<Simulation> {
        if let Some(error) = self.error {
            return Err(ClientError::Simulation(error));
        }
        let first = self.results.unwrap_or_default().into_iter().next();
        let (result, auth) = match first {
            Some(host_fn) => (
                Some(ScVal::from_xdr_base64(&host_fn.xdr, Limits::none())?),
                host_fn.auth.unwrap_or_default(),
            ),
            None => (None, Vec::new()),
        };
        let min_resource_fee = match self.min_resource_fee.as_deref() {
            Some(raw) => raw.parse().map_err(|_| {
                ClientError::decode(format!("minResourceFee '{raw}' is not a number"))
            })?,
            None => 0,
        };
        Ok(Simulation {
            result,
            transaction_data: self.transaction_data,
            auth,
            min_resource_fee,
            latest_ledger: self.latest_ledger,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendTransactionResponse {
    status: String,
    hash: String,
    error_result_xdr: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetTransactionResponse {
    status: String,
    ledger: Option<u32>,
    result_xdr: Option<String>,
    result_meta_xdr: Option<String>,
}

impl GetTransactionResponse {
    /// `None` while the transaction is still unknown to the network.
    fn into_outcome(self, hash: &str) -> Result<Option<SubmitOutcome>> {
        match self.status.as_str() {
            "SUCCESS" => {
                let return_value = match self.result_meta_xdr.as_deref() {
                    Some(meta) => meta_return_value(meta)?,
                    None => None,
                };
                Ok(Some(SubmitOutcome {
                    hash: hash.to_string(),
                    ledger: self.ledger,
                    return_value,
                }))
            }
            "FAILED" => {
                let detail = self
                    .result_xdr
                    .map(|xdr| format!(": {xdr}"))
                    .unwrap_or_default();
                Err(ClientError::Submission(format!(
                    "transaction {hash} failed on-chain{detail}"
                )))
            }
            _ => Ok(None),
        }
    }
}

fn meta_return_value(meta_xdr: &str) -> Result<Option<ScVal>> {
    match TransactionMeta::from_xdr_base64(meta_xdr, Limits::none())? {
        TransactionMeta::V3(meta) => Ok(meta.soroban_meta.map(|soroban| soroban.return_value)),
        _ => Ok(None),
    }
}
