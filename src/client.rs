use crate::{
    actions::{
        self,
        ActionResult,
        ClaimPoapForm,
        CreateEventForm,
        CreateGameForm,
        GameInitForm,
        GetEventForm,
        JoinGameForm,
        PoapInitForm,
        PotQueryForm,
        PotReading,
        ResolveGameForm,
    },
    config::NetworkProfile,
    notify::{
        Notice,
        NoticeId,
        Notifications,
    },
    session::{
        ClientTemplate,
        Session,
    },
    ui,
    views::{
        ViewKind,
        ViewTasks,
        ViewUpdate,
    },
    wallets::{
        WalletBridge,
        WalletOption,
    },
};
use color_eyre::eyre::{
    Result,
    WrapErr,
};
use contract_bindings::{
    AccountAddress,
    ContractTransport,
    EventPublicDetails,
};
use deployments::DappKind;
use std::time::{
    Duration,
    Instant,
};
use tokio::{
    sync::mpsc,
    time,
};
use tracing::{
    error,
    info,
    warn,
};

const NOTICE_TICK: Duration = Duration::from_millis(500);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ViewData<T> {
    #[default]
    NotLoaded,
    Loading,
    Ready(T),
}

/// What the UI renders. Rebuilt after every change.
#[derive(Clone, Debug)]
pub struct AppSnapshot {
    pub dapp: DappKind,
    pub network: String,
    pub rpc_url: String,
    pub contract_id: String,
    pub account: Option<AccountAddress>,
    pub wallet_options: Vec<WalletOption>,
    pub events: ViewData<Vec<EventPublicDetails>>,
    pub my_poaps: ViewData<Vec<EventPublicDetails>>,
    pub looked_up_event: Option<EventPublicDetails>,
    pub pot: Option<PotReading>,
    pub notices: Vec<Notice>,
    pub busy: bool,
}

/// A form the user submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    CreateEvent(CreateEventForm),
    ClaimPoap(ClaimPoapForm),
    InitPoap,
    GetEvent(GetEventForm),
    InitGame(GameInitForm),
    CreateGame(CreateGameForm),
    JoinGame(JoinGameForm),
    ResolveGame(ResolveGameForm),
    QueryPot(PotQueryForm),
}

impl Submission {
    /// Writes change contract state and are signed and submitted.
    pub fn is_write(&self) -> bool {
        !matches!(self, Submission::GetEvent(_) | Submission::QueryPot(_))
    }

    fn pending_message(&self) -> &'static str {
        match self {
            Submission::GetEvent(_) => "Fetching event...",
            Submission::QueryPot(_) => "Fetching pot...",
            _ => "Processing transaction...",
        }
    }
}

pub struct AppController<T, B> {
    profile: NetworkProfile,
    template: ClientTemplate<T>,
    bridge: B,
    session: Session<T>,
    notifications: Notifications,
    views: ViewTasks,
    view_updates: Option<mpsc::UnboundedReceiver<ViewUpdate>>,
    events: ViewData<Vec<EventPublicDetails>>,
    my_poaps: ViewData<Vec<EventPublicDetails>>,
    looked_up_event: Option<EventPublicDetails>,
    pot: Option<PotReading>,
    wallet_options: Vec<WalletOption>,
    busy: bool,
}

impl<T: ContractTransport, B: WalletBridge> AppController<T, B> {
    pub fn new(profile: NetworkProfile, transport: T, bridge: B) -> Self {
        let template = ClientTemplate::new(
            transport,
            profile.network_passphrase.clone(),
            profile.contract_id,
        );
        let (views, view_updates) = ViewTasks::new();
        Self {
            profile,
            template,
            bridge,
            session: Session::default(),
            notifications: Notifications::default(),
            views,
            view_updates: Some(view_updates),
            events: ViewData::NotLoaded,
            my_poaps: ViewData::NotLoaded,
            looked_up_event: None,
            pot: None,
            wallet_options: Vec::new(),
            busy: false,
        }
    }

    pub fn dapp(&self) -> DappKind {
        self.profile.dapp
    }

    pub fn account(&self) -> Option<AccountAddress> {
        self.session.account()
    }

    /// The channel background view refreshes report on. Taken once by
    /// whoever drives the controller.
    pub fn take_view_updates(&mut self) -> Option<mpsc::UnboundedReceiver<ViewUpdate>> {
        self.view_updates.take()
    }

    pub fn open_wallet_modal(&mut self) {
        match self.bridge.open_modal() {
            Ok(options) => {
                if options.is_empty() {
                    self.notifications.push_failure("No wallets found.");
                }
                self.wallet_options = options;
            }
            Err(e) => {
                error!(error = %e, "listing wallets failed");
                self.notifications
                    .push_failure(format!("Could not list wallets: {e}"));
            }
        }
    }

    /// Returns whether the session now holds the selected wallet's account.
    pub fn connect(&mut self, wallet_id: &str, password: Option<&str>) -> bool {
        let previous = self.session.account();
        match self
            .session
            .connect(&mut self.bridge, &self.template, wallet_id, password)
        {
            Ok(address) => {
                info!(%address, "wallet connected");
                self.notifications.push_success("Wallet connected!");
                if previous != Some(address) {
                    self.events = ViewData::NotLoaded;
                    self.my_poaps = ViewData::NotLoaded;
                    self.looked_up_event = None;
                    self.pot = None;
                    self.refresh_views();
                }
                true
            }
            Err(e) => {
                warn!(wallet = wallet_id, error = %e, "wallet connection failed");
                self.notifications.push_failure(e.to_string());
                false
            }
        }
    }

    pub fn refresh_views(&mut self) {
        self.refresh_view(ViewKind::Events);
        self.refresh_view(ViewKind::MyPoaps);
    }

    pub fn refresh_view(&mut self, kind: ViewKind) {
        if self.profile.dapp != DappKind::Poap {
            return;
        }
        let (Some(client), Some(owner)) = (self.session.poap_client(), self.session.account())
        else {
            return;
        };
        self.views.spawn_refresh(kind, client, owner);
        match kind {
            ViewKind::Events => self.events = ViewData::Loading,
            ViewKind::MyPoaps => self.my_poaps = ViewData::Loading,
        }
    }

    /// Stale updates from superseded refreshes are dropped.
    pub fn apply_view_update(&mut self, update: ViewUpdate) -> bool {
        if !self.views.is_current(&update) {
            return false;
        }
        match update.kind {
            ViewKind::Events => self.events = ViewData::Ready(update.events),
            ViewKind::MyPoaps => self.my_poaps = ViewData::Ready(update.events),
        }
        true
    }

    /// Post the pending notice for `submission`; the UI draws it before
    /// the action runs.
    pub fn begin_action(&mut self, submission: &Submission) -> NoticeId {
        self.busy = true;
        self.notifications.pending(submission.pending_message())
    }

    pub async fn run_action(
        &mut self,
        notice: NoticeId,
        submission: Submission,
    ) -> ActionResult<String> {
        let is_write = submission.is_write();
        let result = self.dispatch(submission).await;
        self.busy = false;
        match &result {
            Ok(message) => self.notifications.resolve(notice, Ok(message.clone())),
            Err(err) => self.notifications.resolve(notice, Err(err.to_string())),
        }
        if is_write && result.is_ok() {
            self.refresh_views();
        }
        result
    }

    pub async fn submit(&mut self, submission: Submission) -> ActionResult<String> {
        let notice = self.begin_action(&submission);
        self.run_action(notice, submission).await
    }

    async fn dispatch(&mut self, submission: Submission) -> ActionResult<String> {
        let poap = self.session.poap_client();
        let game = self.session.game_client();
        match submission {
            Submission::CreateEvent(form) => actions::create_event(poap.as_ref(), &form).await,
            Submission::ClaimPoap(form) => actions::claim_poap(poap.as_ref(), &form).await,
            Submission::InitPoap => actions::init_poap(poap.as_ref(), &PoapInitForm).await,
            Submission::GetEvent(form) => {
                self.looked_up_event = None;
                let event = actions::lookup_event(poap.as_ref(), &form).await?;
                let message = format!("Loaded event {}: {}", event.id, event.name);
                self.looked_up_event = Some(event);
                Ok(message)
            }
            Submission::InitGame(form) => actions::init_game(game.as_ref(), &form).await,
            Submission::CreateGame(form) => actions::create_game(game.as_ref(), &form).await,
            Submission::JoinGame(form) => actions::join_game(game.as_ref(), &form).await,
            Submission::ResolveGame(form) => actions::resolve_game(game.as_ref(), &form).await,
            Submission::QueryPot(form) => {
                self.pot = None;
                let reading = actions::lookup_pot(game.as_ref(), &form).await?;
                let message = reading.message();
                self.pot = Some(reading);
                Ok(message)
            }
        }
    }

    pub fn prune_notifications(&mut self) {
        self.notifications.prune(Instant::now());
    }

    pub fn shutdown(&mut self) {
        self.views.abort_all();
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            dapp: self.profile.dapp,
            network: self.profile.env.to_string(),
            rpc_url: self.profile.rpc_url.clone(),
            contract_id: self.profile.contract_id.to_string(),
            account: self.session.account(),
            wallet_options: self.wallet_options.clone(),
            events: self.events.clone(),
            my_poaps: self.my_poaps.clone(),
            looked_up_event: self.looked_up_event.clone(),
            pot: self.pot.clone(),
            notices: self.notifications.visible(Instant::now()),
            busy: self.busy,
        }
    }
}

pub async fn run_app<T: ContractTransport, B: WalletBridge>(
    mut controller: AppController<T, B>,
) -> Result<()> {
    let mut ui_state = ui::UiState::new(controller.dapp());
    let mut input_events = ui::input_event_stream();

    info!(dapp = %controller.dapp(), "Starting UI");
    ui::terminal_enter(&mut ui_state)?;
    let res = run_loop(&mut controller, &mut ui_state, &mut input_events).await;
    controller.shutdown();
    ui::terminal_exit()?;
    res
}

fn redraw<T: ContractTransport, B: WalletBridge>(
    controller: &AppController<T, B>,
    ui_state: &mut ui::UiState,
    context: &'static str,
) -> Result<()> {
    ui::draw(ui_state, &controller.snapshot()).wrap_err(context)
}

async fn run_loop<T: ContractTransport, B: WalletBridge>(
    controller: &mut AppController<T, B>,
    ui_state: &mut ui::UiState,
    input_events: &mut ui::InputEventReceiver,
) -> Result<()> {
    let mut view_updates = controller
        .take_view_updates()
        .ok_or_else(|| color_eyre::eyre::eyre!("view update channel already taken"))?;
    let mut ticker = time::interval(NOTICE_TICK);
    redraw(controller, ui_state, "initial draw failed")?;

    loop {
        tokio::select! {
            Some(update) = view_updates.recv() => {
                if controller.apply_view_update(update) {
                    redraw(controller, ui_state, "draw after view refresh failed")?;
                }
            }
            _ = ticker.tick() => {
                controller.prune_notifications();
                redraw(controller, ui_state, "draw on tick failed")?;
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
            raw_ev = ui::next_raw_event(input_events) => {
                let event = raw_ev?;
                let Some(ev) = ui::interpret_event(ui_state, event) else {
                    continue;
                };
                match ev {
                    ui::UserEvent::Quit => break,
                    ui::UserEvent::Redraw => {}
                    ui::UserEvent::OpenWalletModal => controller.open_wallet_modal(),
                    ui::UserEvent::Connect { wallet_id, password } => {
                        controller.connect(&wallet_id, password.as_deref());
                    }
                    ui::UserEvent::TabChanged(tab) => {
                        if let Some(kind) = tab.view() {
                            controller.refresh_view(kind);
                        }
                    }
                    ui::UserEvent::RefreshViews => controller.refresh_views(),
                    ui::UserEvent::Submit(submission) => {
                        let notice = controller.begin_action(&submission);
                        redraw(controller, ui_state, "draw while submitting failed")?;
                        if controller.run_action(notice, submission).await.is_ok() {
                            ui_state.clear_submitted_form();
                        }
                    }
                }
                redraw(controller, ui_state, "draw after input failed")?;
            }
        }
    }
    Ok(())
}
