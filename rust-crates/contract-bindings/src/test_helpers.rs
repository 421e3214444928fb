//! An in-process stand-in for a Soroban network hosting the POAP and game
//! contracts. Signatures are checked for real; contract state lives in
//! memory and every simulate/submit is recorded.

use crate::{
    address::{
        AccountAddress,
        Address,
        ContractAddress,
    },
    client::ClientOptions,
    codec::{
        FromScVal,
        IntoScVal,
    },
    error::{
        ClientError,
        Result,
    },
    game_types::GameId,
    poap_types::{
        Event,
        EventPublicDetails,
    },
    rpc::{
        BASE_FEE,
        build_transaction,
        transaction_hash,
    },
    signer::{
        KeypairSigner,
        TransactionSigner,
        verify_signature,
    },
    transport::{
        ContractTransport,
        InvocationRequest,
        Simulation,
        SubmitOutcome,
    },
};
use std::{
    collections::{
        BTreeMap,
        HashMap,
        HashSet,
    },
    sync::{
        Arc,
        Mutex,
    },
};
use stellar_xdr::curr::ScVal;

pub const TEST_PASSPHRASE: &str = "Standalone Network ; February 2017";

/// Deterministic keypair for tests; different seeds give different accounts.
pub fn test_signer(seed: u8) -> KeypairSigner {
    KeypairSigner::from_seed(&[seed; 32])
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
    Simulate,
    Submit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub contract: ContractAddress,
    pub function: String,
    pub source: AccountAddress,
    pub args: Vec<ScVal>,
}

struct Fault {
    function: String,
    args: Option<Vec<ScVal>>,
    error: ClientError,
}

#[derive(Default)]
struct NetworkState {
    contracts: HashMap<ContractAddress, StandIn>,
    calls: Vec<RecordedCall>,
    faults: Vec<Fault>,
    fail_next_submit: Option<ClientError>,
    next_contract: u8,
    ledger: u32,
}

#[derive(Clone)]
enum StandIn {
    Poap(PoapState),
    Game(GameState),
}

#[derive(Clone)]
pub struct InMemoryNetwork {
    state: Arc<Mutex<NetworkState>>,
}

impl Default for InMemoryNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNetwork {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(NetworkState {
                next_contract: 1,
                ledger: 1,
                ..NetworkState::default()
            })),
        }
    }

    pub fn deploy_poap(&self) -> ContractAddress {
        self.deploy(StandIn::Poap(PoapState::default()))
    }

    pub fn deploy_game(&self) -> ContractAddress {
        self.deploy(StandIn::Game(GameState::default()))
    }

    fn deploy(&self, contract: StandIn) -> ContractAddress {
        let mut state = self.state.lock().unwrap();
        let address = ContractAddress([state.next_contract; 32]);
        state.next_contract += 1;
        state.contracts.insert(address, contract);
        address
    }

    /// Client options bound to `signer`'s account on `contract`.
    pub fn client_options(
        &self,
        contract: ContractAddress,
        signer: &KeypairSigner,
    ) -> ClientOptions<Self> {
        ClientOptions {
            transport: self.clone(),
            network_passphrase: TEST_PASSPHRASE.to_string(),
            contract_id: contract,
            public_key: signer.public_key(),
            signer: Some(Arc::new(signer.clone())),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// `(kind, function)` pairs in call order.
    pub fn call_names(&self) -> Vec<(CallKind, String)> {
        self.calls()
            .into_iter()
            .map(|call| (call.kind, call.function))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Every simulate of `function` fails with `error` until cleared.
    pub fn fail_function(&self, function: &str, error: ClientError) {
        self.state.lock().unwrap().faults.push(Fault {
            function: function.to_string(),
            args: None,
            error,
        });
    }

    /// Like [`fail_function`](Self::fail_function), restricted to calls
    /// with exactly these arguments.
    pub fn fail_call(&self, function: &str, args: Vec<ScVal>, error: ClientError) {
        self.state.lock().unwrap().faults.push(Fault {
            function: function.to_string(),
            args: Some(args),
            error,
        });
    }

    pub fn clear_faults(&self) {
        self.state.lock().unwrap().faults.clear();
    }

    pub fn fail_next_submit(&self, error: ClientError) {
        self.state.lock().unwrap().fail_next_submit = Some(error);
    }

    /// Event as stored on-chain, secret included.
    pub fn stored_event(&self, contract: ContractAddress, id: u32) -> Option<Event> {
        let state = self.state.lock().unwrap();
        match state.contracts.get(&contract) {
            Some(StandIn::Poap(poap)) => poap.events.get(&id).cloned(),
            _ => None,
        }
    }
}

impl NetworkState {
    fn record(&mut self, kind: CallKind, request: &InvocationRequest) {
        self.calls.push(RecordedCall {
            kind,
            contract: request.contract,
            function: request.function.clone(),
            source: request.source,
            args: request.args.clone(),
        });
    }

    fn fault_for(&self, request: &InvocationRequest) -> Option<ClientError> {
        self.faults
            .iter()
            .find(|fault| {
                fault.function == request.function
                    && fault.args.as_ref().is_none_or(|args| *args == request.args)
            })
            .map(|fault| fault.error.clone())
    }
}

impl ContractTransport for InMemoryNetwork {
    async fn simulate(&self, request: &InvocationRequest) -> Result<Simulation> {
        let mut state = self.state.lock().unwrap();
        state.record(CallKind::Simulate, request);
        if let Some(error) = state.fault_for(request) {
            return Err(error);
        }
        let mut scratch = state
            .contracts
            .get(&request.contract)
            .cloned()
            .ok_or_else(|| {
                ClientError::Simulation(format!("contract {} not found", request.contract))
            })?;
        let result = scratch
            .execute(request)
            .map_err(|msg| ClientError::Simulation(host_error(&msg)))?;
        Ok(Simulation {
            result: Some(result),
            transaction_data: None,
            auth: Vec::new(),
            min_resource_fee: 0,
            latest_ledger: state.ledger,
        })
    }

    async fn submit(
        &self,
        request: &InvocationRequest,
        _simulation: &Simulation,
        signer: &dyn TransactionSigner,
    ) -> Result<SubmitOutcome> {
        let tx = build_transaction(request, 1, BASE_FEE, Vec::new(), None, 0)?;
        let hash = transaction_hash(&tx, &request.network_passphrase)?;
        let signature = signer.sign(&hash)?;

        let mut state = self.state.lock().unwrap();
        state.record(CallKind::Submit, request);
        if let Some(error) = state.fail_next_submit.take() {
            return Err(error);
        }
        if !verify_signature(&request.source, &hash, &signature) {
            return Err(ClientError::Submission(
                "transaction rejected with status ERROR: txBAD_AUTH".into(),
            ));
        }
        let ledger = state.ledger;
        let contract = state.contracts.get_mut(&request.contract).ok_or_else(|| {
            ClientError::Submission(format!("contract {} not found", request.contract))
        })?;
        let return_value = contract
            .execute(request)
            .map_err(|msg| ClientError::Submission(host_error(&msg)))?;
        state.ledger += 1;
        Ok(SubmitOutcome {
            hash: hex::encode(hash),
            ledger: Some(ledger),
            return_value: Some(return_value),
        })
    }
}

fn host_error(msg: &str) -> String {
    format!("HostError: Error(WasmVm, InvalidAction): {msg}")
}

type Exec<T> = std::result::Result<T, String>;

fn arg<T: FromScVal>(request: &InvocationRequest, index: usize) -> Exec<T> {
    let val = request
        .args
        .get(index)
        .ok_or_else(|| format!("missing argument {index} to {}", request.function))?;
    T::from_sc_val(val).map_err(|e| format!("bad argument {index}: {e}"))
}

fn require_auth(request: &InvocationRequest, addr: AccountAddress) -> Exec<()> {
    if addr == request.source {
        Ok(())
    } else {
        Err(format!("Error(Auth, InvalidAction): {addr} did not authorize"))
    }
}

fn encode<V: IntoScVal>(value: V) -> Exec<ScVal> {
    value.into_sc_val().map_err(|e| e.to_string())
}

impl StandIn {
    fn execute(&mut self, request: &InvocationRequest) -> Exec<ScVal> {
        match self {
            Self::Poap(poap) => poap.execute(request),
            Self::Game(game) => game.execute(request),
        }
    }
}

#[derive(Clone, Default)]
struct PoapState {
    initialized: bool,
    events: BTreeMap<u32, Event>,
    next_id: u32,
    claims: HashSet<(u32, AccountAddress)>,
}

impl PoapState {
    fn execute(&mut self, request: &InvocationRequest) -> Exec<ScVal> {
        match request.function.as_str() {
            "init" => {
                if !self.initialized {
                    self.initialized = true;
                    self.next_id = 1;
                }
                Ok(ScVal::Void)
            }
            "create_event" => {
                let creator: AccountAddress = arg(request, 0)?;
                require_auth(request, creator)?;
                let id = self.next_id.max(1);
                self.next_id = id + 1;
                self.events.insert(
                    id,
                    Event {
                        id,
                        name: arg(request, 1)?,
                        description: arg(request, 2)?,
                        image_url: arg(request, 3)?,
                        creator,
                        max_supply: arg(request, 4)?,
                        minted_count: 0,
                        secret: arg(request, 5)?,
                    },
                );
                encode(id)
            }
            "claim_poap" => {
                let to: AccountAddress = arg(request, 0)?;
                let event_id: u32 = arg(request, 1)?;
                let provided: String = arg(request, 2)?;
                require_auth(request, to)?;
                let event = self
                    .events
                    .get_mut(&event_id)
                    .ok_or_else(|| "event not found".to_string())?;
                if event.secret != provided {
                    return Err("invalid secret".into());
                }
                if event.minted_count >= event.max_supply {
                    return Err("max supply reached".into());
                }
                if !self.claims.insert((event_id, to)) {
                    return Err("already claimed".into());
                }
                event.minted_count += 1;
                Ok(ScVal::Void)
            }
            "get_event" => {
                let event_id: u32 = arg(request, 0)?;
                let event = self
                    .events
                    .get(&event_id)
                    .cloned()
                    .ok_or_else(|| "event not found".to_string())?;
                encode(EventPublicDetails::from(event))
            }
            "has_claimed" => {
                let event_id: u32 = arg(request, 0)?;
                let addr: AccountAddress = arg(request, 1)?;
                encode(self.claims.contains(&(event_id, addr)))
            }
            other => Err(format!("no function named {other}")),
        }
    }
}

#[derive(Clone)]
struct Game {
    creator: AccountAddress,
    min_bet: i128,
    max_players: u32,
    bets: Vec<(AccountAddress, u32, i128)>,
    resolved: Option<u32>,
}

#[derive(Clone, Default)]
struct GameState {
    token: Option<Address>,
    games: HashMap<GameId, Game>,
}

const MAX_CHOICE: u32 = 2;

impl GameState {
    fn execute(&mut self, request: &InvocationRequest) -> Exec<ScVal> {
        let function = request.function.as_str();
        if function != "init" && self.token.is_none() {
            return Err("contract not initialized".into());
        }
        match function {
            "init" => {
                if self.token.is_some() {
                    return Err("already initialized".into());
                }
                self.token = Some(arg(request, 0)?);
                Ok(ScVal::Void)
            }
            "create_game" => {
                let game_id: GameId = arg(request, 0)?;
                let min_bet: i128 = arg(request, 1)?;
                let max_players: u32 = arg(request, 2)?;
                if self.games.contains_key(&game_id) {
                    return Err("game already exists".into());
                }
                if min_bet <= 0 || max_players == 0 {
                    return Err("invalid game parameters".into());
                }
                self.games.insert(
                    game_id,
                    Game {
                        creator: request.source,
                        min_bet,
                        max_players,
                        bets: Vec::new(),
                        resolved: None,
                    },
                );
                Ok(ScVal::Void)
            }
            "join_game" => {
                let game_id: GameId = arg(request, 0)?;
                let player: AccountAddress = arg(request, 1)?;
                let choice: u32 = arg(request, 2)?;
                let amount: i128 = arg(request, 3)?;
                require_auth(request, player)?;
                let game = self
                    .games
                    .get_mut(&game_id)
                    .ok_or_else(|| "game not found".to_string())?;
                if game.resolved.is_some() {
                    return Err("game already resolved".into());
                }
                if choice > MAX_CHOICE {
                    return Err("invalid choice".into());
                }
                if amount < game.min_bet {
                    return Err("bet below minimum".into());
                }
                if game.bets.len() as u32 >= game.max_players {
                    return Err("game is full".into());
                }
                if game.bets.iter().any(|(p, _, _)| *p == player) {
                    return Err("player already joined".into());
                }
                game.bets.push((player, choice, amount));
                Ok(ScVal::Void)
            }
            "resolve_game" => {
                let game_id: GameId = arg(request, 0)?;
                let result: u32 = arg(request, 1)?;
                let game = self
                    .games
                    .get_mut(&game_id)
                    .ok_or_else(|| "game not found".to_string())?;
                require_auth(request, game.creator)?;
                if game.resolved.is_some() {
                    return Err("game already resolved".into());
                }
                if result > MAX_CHOICE {
                    return Err("invalid result".into());
                }
                game.resolved = Some(result);
                Ok(ScVal::Void)
            }
            "get_pot" => {
                let game_id: GameId = arg(request, 0)?;
                let game = self
                    .games
                    .get(&game_id)
                    .ok_or_else(|| "game not found".to_string())?;
                let pot: i128 = game.bets.iter().map(|(_, _, amount)| *amount).sum();
                encode(pot)
            }
            other => Err(format!("no function named {other}")),
        }
    }
}
