use crate::wallets::WalletBridge;
use color_eyre::eyre::Result;
use contract_bindings::{
    AccountAddress,
    ClientOptions,
    ContractAddress,
    ContractTransport,
    GameClient,
    PoapClient,
    TransactionSigner,
};
use std::sync::Arc;

/// The fixed part of every client: endpoint, network and contract.
#[derive(Clone, Debug)]
pub struct ClientTemplate<T> {
    pub transport: T,
    pub network_passphrase: String,
    pub contract_id: ContractAddress,
}

impl<T: ContractTransport> ClientTemplate<T> {
    pub fn new(
        transport: T,
        network_passphrase: impl Into<String>,
        contract_id: ContractAddress,
    ) -> Self {
        Self {
            transport,
            network_passphrase: network_passphrase.into(),
            contract_id,
        }
    }

    pub fn bind(
        &self,
        public_key: AccountAddress,
        signer: Option<Arc<dyn TransactionSigner>>,
    ) -> ClientOptions<T> {
        ClientOptions {
            transport: self.transport.clone(),
            network_passphrase: self.network_passphrase.clone(),
            contract_id: self.contract_id,
            public_key,
            signer,
        }
    }
}

/// The connected account and the client options bound to it. Lives for
/// one run of the app; nothing is persisted.
pub struct Session<T> {
    account: Option<AccountAddress>,
    bound: Option<ClientOptions<T>>,
}

impl<T> Default for Session<T> {
    fn default() -> Self {
        Self {
            account: None,
            bound: None,
        }
    }
}

impl<T: ContractTransport> Session<T> {
    pub fn account(&self) -> Option<AccountAddress> {
        self.account
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    /// Select `wallet_id` on the bridge and adopt its account. Nothing on
    /// the session changes unless every step succeeds. A different account
    /// gets freshly bound options; the same account keeps the current ones.
    pub fn connect<B: WalletBridge>(
        &mut self,
        bridge: &mut B,
        template: &ClientTemplate<T>,
        wallet_id: &str,
        password: Option<&str>,
    ) -> Result<AccountAddress> {
        bridge.set_wallet(wallet_id, password)?;
        let address = bridge.get_address()?;
        let signer = bridge.signer()?;

        if self.account == Some(address) && self.bound.is_some() {
            return Ok(address);
        }
        tracing::info!(%address, "binding contract client to account");
        self.bound = Some(template.bind(address, Some(signer)));
        self.account = Some(address);
        Ok(address)
    }

    pub fn options(&self) -> Option<&ClientOptions<T>> {
        self.bound.as_ref()
    }

    pub fn poap_client(&self) -> Option<PoapClient<T>> {
        self.bound.clone().map(PoapClient::new)
    }

    pub fn game_client(&self) -> Option<GameClient<T>> {
        self.bound.clone().map(GameClient::new)
    }
}
