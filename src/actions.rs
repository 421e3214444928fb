//! Form-backed contract calls. Every action validates its form before the
//! client is touched, then simulates and (for writes) signs and submits.

use contract_bindings::{
    Address,
    ClientError,
    ContractTransport,
    EventPublicDetails,
    GameClient,
    GameId,
    PoapClient,
};
use std::{
    fmt,
    str::FromStr,
};
use tracing::{
    error,
    info,
};

pub const NOT_CONNECTED: &str = "Please connect your wallet first.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionError {
    NotConnected,
    Validation(String),
    Client(ClientError),
}

impl ActionError {
    fn validation(message: impl Into<String>) -> Self {
        ActionError::Validation(message.into())
    }

    /// True when nothing reached the network.
    pub fn is_local(&self) -> bool {
        match self {
            ActionError::NotConnected | ActionError::Validation(_) => true,
            ActionError::Client(err) => matches!(err, ClientError::Validation(_)),
        }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::NotConnected => f.write_str(NOT_CONNECTED),
            ActionError::Validation(message) => f.write_str(message),
            ActionError::Client(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ActionError {}

impl From<ClientError> for ActionError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Validation(message) => ActionError::Validation(message),
            other => ActionError::Client(other),
        }
    }
}

pub type ActionResult<T> = Result<T, ActionError>;

fn connected<C>(client: Option<&C>) -> ActionResult<&C> {
    client.ok_or(ActionError::NotConnected)
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn parse_number<N: FromStr>(value: &str, field: &str) -> ActionResult<N> {
    value
        .trim()
        .parse()
        .map_err(|_| ActionError::validation(format!("{field} must be a whole number.")))
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateEventForm {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub max_supply: String,
    pub secret: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub max_supply: u32,
    pub secret: String,
}

impl CreateEventForm {
    pub fn validate(&self) -> ActionResult<NewEvent> {
        const REQUIRED: &str = "All fields are required!";
        if [
            &self.name,
            &self.description,
            &self.image_url,
            &self.max_supply,
            &self.secret,
        ]
        .into_iter()
        .any(|field| blank(field))
        {
            return Err(ActionError::validation(REQUIRED));
        }
        let max_supply: u32 = parse_number(&self.max_supply, "Max supply")?;
        if max_supply == 0 {
            return Err(ActionError::validation(REQUIRED));
        }
        Ok(NewEvent {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
            max_supply,
            secret: self.secret.clone(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClaimPoapForm {
    pub event_id: String,
    pub secret: String,
}

impl ClaimPoapForm {
    pub fn validate(&self) -> ActionResult<(u32, String)> {
        const REQUIRED: &str = "Event ID and Secret are required!";
        if blank(&self.event_id) || blank(&self.secret) {
            return Err(ActionError::validation(REQUIRED));
        }
        let event_id: u32 = parse_number(&self.event_id, "Event ID")?;
        if event_id == 0 {
            return Err(ActionError::validation(REQUIRED));
        }
        Ok((event_id, self.secret.clone()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetEventForm {
    pub event_id: String,
}

impl GetEventForm {
    pub fn validate(&self) -> ActionResult<u32> {
        if blank(&self.event_id) {
            return Err(ActionError::validation("Event ID is required."));
        }
        parse_number(&self.event_id, "Event ID")
    }
}

/// `init` on the POAP factory takes no arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoapInitForm;

impl PoapInitForm {
    pub fn validate(&self) -> ActionResult<()> {
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameInitForm {
    pub token: String,
}

impl GameInitForm {
    pub fn validate(&self) -> ActionResult<Address> {
        if blank(&self.token) {
            return Err(ActionError::validation("Token Address is required."));
        }
        Ok(self.token.trim().parse::<Address>()?)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateGameForm {
    pub game_id: String,
    pub min_bet: String,
    pub max_players: String,
}

impl CreateGameForm {
    pub fn validate(&self) -> ActionResult<(GameId, i128, u32)> {
        const REQUIRED: &str = "All fields are required to create a game.";
        if blank(&self.game_id) || blank(&self.min_bet) || blank(&self.max_players) {
            return Err(ActionError::validation(REQUIRED));
        }
        let min_bet: i128 = parse_number(&self.min_bet, "Min bet")?;
        let max_players: u32 = parse_number(&self.max_players, "Max players")?;
        if min_bet == 0 || max_players == 0 {
            return Err(ActionError::validation(REQUIRED));
        }
        let game_id = GameId::from_label(&self.game_id)?;
        Ok((game_id, min_bet, max_players))
    }
}

pub const CHOICES: [u32; 3] = [0, 1, 2];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JoinGameForm {
    pub game_id: String,
    pub choice: String,
    pub amount: String,
}

impl JoinGameForm {
    pub fn validate(&self) -> ActionResult<(GameId, u32, i128)> {
        const REQUIRED: &str = "All fields are required to join a game.";
        if blank(&self.game_id) || blank(&self.amount) {
            return Err(ActionError::validation(REQUIRED));
        }
        let amount: i128 = parse_number(&self.amount, "Amount")?;
        if amount == 0 {
            return Err(ActionError::validation(REQUIRED));
        }
        // an untouched choice selector means the first option
        let choice: u32 = if blank(&self.choice) {
            CHOICES[0]
        } else {
            parse_number(&self.choice, "Choice")?
        };
        if !CHOICES.contains(&choice) {
            return Err(ActionError::validation("Choice must be 0, 1 or 2."));
        }
        let game_id = GameId::from_label(&self.game_id)?;
        Ok((game_id, choice, amount))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolveGameForm {
    pub game_id: String,
    pub result: String,
}

impl ResolveGameForm {
    pub fn validate(&self) -> ActionResult<(GameId, u32)> {
        if blank(&self.game_id) || blank(&self.result) {
            return Err(ActionError::validation("Game ID and Result are required."));
        }
        let result: u32 = parse_number(&self.result, "Result")?;
        let game_id = GameId::from_label(&self.game_id)?;
        Ok((game_id, result))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PotQueryForm {
    pub game_id: String,
}

impl PotQueryForm {
    pub fn validate(&self) -> ActionResult<GameId> {
        if blank(&self.game_id) {
            return Err(ActionError::validation("Game ID is required."));
        }
        Ok(GameId::from_label(&self.game_id)?)
    }
}

fn log_outcome<T>(action: &'static str, result: &ActionResult<T>) {
    match result {
        Ok(_) => info!(action, "action succeeded"),
        Err(err) if err.is_local() => info!(action, error = %err, "action rejected locally"),
        Err(err) => error!(action, error = %err, "action failed"),
    }
}

pub async fn create_event<T: ContractTransport>(
    client: Option<&PoapClient<T>>,
    form: &CreateEventForm,
) -> ActionResult<String> {
    let result = async {
        let client = connected(client)?;
        let event = form.validate()?;
        let tx = client
            .create_event(
                client.public_key(),
                &event.name,
                &event.description,
                &event.image_url,
                event.max_supply,
                &event.secret,
            )
            .await?;
        let sent = tx.sign_and_send().await?;
        Ok::<_, ActionError>(format!(
            "Event created successfully! Event ID: {}",
            sent.result
        ))
    }
    .await;
    log_outcome("create_event", &result);
    result
}

pub async fn claim_poap<T: ContractTransport>(
    client: Option<&PoapClient<T>>,
    form: &ClaimPoapForm,
) -> ActionResult<String> {
    let result = async {
        let client = connected(client)?;
        let (event_id, secret) = form.validate()?;
        let tx = client
            .claim_poap(client.public_key(), event_id, &secret)
            .await?;
        tx.sign_and_send().await?;
        Ok::<_, ActionError>(format!("Successfully claimed POAP for event {event_id}!"))
    }
    .await;
    log_outcome("claim_poap", &result);
    result
}

pub async fn init_poap<T: ContractTransport>(
    client: Option<&PoapClient<T>>,
    form: &PoapInitForm,
) -> ActionResult<String> {
    let result = async {
        let client = connected(client)?;
        form.validate()?;
        client.init().await?.sign_and_send().await?;
        Ok::<_, ActionError>("Contract initialized successfully!".to_string())
    }
    .await;
    log_outcome("init_poap", &result);
    result
}

/// Simulated read; never submitted.
pub async fn lookup_event<T: ContractTransport>(
    client: Option<&PoapClient<T>>,
    form: &GetEventForm,
) -> ActionResult<EventPublicDetails> {
    let client = connected(client)?;
    let event_id = form.validate()?;
    let tx = client.get_event(event_id).await?;
    Ok(tx.into_result())
}

pub async fn init_game<T: ContractTransport>(
    client: Option<&GameClient<T>>,
    form: &GameInitForm,
) -> ActionResult<String> {
    let result = async {
        let client = connected(client)?;
        let token = form.validate()?;
        client.init(token).await?.sign_and_send().await?;
        Ok::<_, ActionError>("Contract initialized successfully!".to_string())
    }
    .await;
    log_outcome("init_game", &result);
    result
}

pub async fn create_game<T: ContractTransport>(
    client: Option<&GameClient<T>>,
    form: &CreateGameForm,
) -> ActionResult<String> {
    let result = async {
        let client = connected(client)?;
        let (game_id, min_bet, max_players) = form.validate()?;
        client
            .create_game(game_id, min_bet, max_players)
            .await?
            .sign_and_send()
            .await?;
        Ok::<_, ActionError>(format!("Game \"{}\" created successfully!", form.game_id))
    }
    .await;
    log_outcome("create_game", &result);
    result
}

pub async fn join_game<T: ContractTransport>(
    client: Option<&GameClient<T>>,
    form: &JoinGameForm,
) -> ActionResult<String> {
    let result = async {
        let client = connected(client)?;
        let (game_id, choice, amount) = form.validate()?;
        client
            .join_game(game_id, client.public_key(), choice, amount)
            .await?
            .sign_and_send()
            .await?;
        Ok::<_, ActionError>(format!("Successfully joined game \"{}\"!", form.game_id))
    }
    .await;
    log_outcome("join_game", &result);
    result
}

pub async fn resolve_game<T: ContractTransport>(
    client: Option<&GameClient<T>>,
    form: &ResolveGameForm,
) -> ActionResult<String> {
    let result = async {
        let client = connected(client)?;
        let (game_id, outcome) = form.validate()?;
        client
            .resolve_game(game_id, outcome)
            .await?
            .sign_and_send()
            .await?;
        Ok::<_, ActionError>(format!("Game \"{}\" resolved!", form.game_id))
    }
    .await;
    log_outcome("resolve_game", &result);
    result
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PotReading {
    pub label: String,
    pub amount: i128,
}

impl PotReading {
    pub fn message(&self) -> String {
        format!("Pot for \"{}\": {}", self.label, self.amount)
    }
}

/// Simulated read; never submitted.
pub async fn lookup_pot<T: ContractTransport>(
    client: Option<&GameClient<T>>,
    form: &PotQueryForm,
) -> ActionResult<PotReading> {
    let client = connected(client)?;
    let game_id = form.validate()?;
    let amount = client.get_pot(game_id).await?.into_result();
    Ok(PotReading {
        label: form.game_id.clone(),
        amount,
    })
}
