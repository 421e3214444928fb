use color_eyre::eyre::{
    Result,
    eyre,
};
use contract_bindings::{
    AccountAddress,
    ContractAddress,
    GameClient,
    KeypairSigner,
    PoapClient,
    TransactionSigner,
    test_helpers::{
        InMemoryNetwork,
        TEST_PASSPHRASE,
        test_signer,
    },
};
use deployments::{
    DappKind,
    NetworkEnv,
};
use soroban_dapps::{
    client::AppController,
    config::NetworkProfile,
    wallets::{
        WalletBridge,
        WalletOption,
    },
};
use std::sync::Arc;

pub const ALICE_PASSWORD: &str = "alice-pw";

#[derive(Clone)]
struct FakeWallet {
    id: String,
    password: Option<String>,
    signer: KeypairSigner,
}

/// Wallets held in memory; `alice` is password protected.
#[derive(Clone, Default)]
pub struct FakeBridge {
    wallets: Vec<FakeWallet>,
    active: Option<usize>,
}

impl FakeBridge {
    pub fn with_wallet(
        mut self,
        id: &str,
        password: Option<&str>,
        signer: KeypairSigner,
    ) -> Self {
        self.wallets.push(FakeWallet {
            id: id.to_string(),
            password: password.map(str::to_string),
            signer,
        });
        self
    }
}

impl WalletBridge for FakeBridge {
    fn open_modal(&self) -> Result<Vec<WalletOption>> {
        Ok(self
            .wallets
            .iter()
            .map(|w| WalletOption {
                id: w.id.clone(),
                name: w.id.clone(),
                needs_password: w.password.is_some(),
            })
            .collect())
    }

    fn set_wallet(&mut self, id: &str, password: Option<&str>) -> Result<()> {
        let idx = self
            .wallets
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| eyre!("Wallet '{id}' not found"))?;
        if let Some(expected) = &self.wallets[idx].password
            && password != Some(expected.as_str())
        {
            return Err(eyre!("Incorrect password for wallet '{id}'"));
        }
        self.active = Some(idx);
        Ok(())
    }

    fn get_address(&self) -> Result<AccountAddress> {
        self.active
            .map(|idx| self.wallets[idx].signer.public_key())
            .ok_or_else(|| eyre!("No wallet selected"))
    }

    fn signer(&self) -> Result<Arc<dyn TransactionSigner>> {
        let idx = self.active.ok_or_else(|| eyre!("No wallet selected"))?;
        Ok(Arc::new(self.wallets[idx].signer.clone()))
    }
}

pub struct TestContext {
    network: InMemoryNetwork,
    poap: ContractAddress,
    game: ContractAddress,
}

impl TestContext {
    pub fn new() -> Self {
        let network = InMemoryNetwork::new();
        let poap = network.deploy_poap();
        let game = network.deploy_game();
        Self {
            network,
            poap,
            game,
        }
    }

    pub fn network(&self) -> &InMemoryNetwork {
        &self.network
    }

    pub fn poap_contract(&self) -> ContractAddress {
        self.poap
    }

    pub fn alice(&self) -> KeypairSigner {
        test_signer(1)
    }

    pub fn bob(&self) -> KeypairSigner {
        test_signer(2)
    }

    pub fn owner(&self) -> KeypairSigner {
        test_signer(3)
    }

    pub fn poap_client(&self, signer: &KeypairSigner) -> PoapClient<InMemoryNetwork> {
        PoapClient::new(self.network.client_options(self.poap, signer))
    }

    pub fn game_client(&self, signer: &KeypairSigner) -> GameClient<InMemoryNetwork> {
        GameClient::new(self.network.client_options(self.game, signer))
    }

    pub fn bridge(&self) -> FakeBridge {
        FakeBridge::default()
            .with_wallet("alice", Some(ALICE_PASSWORD), self.alice())
            .with_wallet("bob", None, self.bob())
            .with_wallet("owner", None, self.owner())
    }

    pub fn profile(&self, dapp: DappKind) -> NetworkProfile {
        NetworkProfile {
            env: NetworkEnv::Local,
            dapp,
            rpc_url: "memory://local".to_string(),
            network_passphrase: TEST_PASSPHRASE.to_string(),
            contract_id: match dapp {
                DappKind::Poap => self.poap,
                DappKind::Game => self.game,
            },
        }
    }

    pub fn controller(&self, dapp: DappKind) -> AppController<InMemoryNetwork, FakeBridge> {
        AppController::new(self.profile(dapp), self.network.clone(), self.bridge())
    }

    /// Create an event as `creator`, returning its id.
    pub async fn create_event(
        &self,
        creator: &KeypairSigner,
        name: &str,
        max_supply: u32,
        secret: &str,
    ) -> u32 {
        let client = self.poap_client(creator);
        client
            .create_event(
                creator.public_key(),
                name,
                "a test event",
                "https://example.com/badge.png",
                max_supply,
                secret,
            )
            .await
            .unwrap()
            .sign_and_send()
            .await
            .unwrap()
            .result
    }
}
