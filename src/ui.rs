use crate::{
    actions::{
        CHOICES,
        ClaimPoapForm,
        CreateEventForm,
        CreateGameForm,
        GameInitForm,
        GetEventForm,
        JoinGameForm,
        PotQueryForm,
        ResolveGameForm,
    },
    client::{
        AppSnapshot,
        Submission,
        ViewData,
    },
    notify::NoticeKind,
    views::ViewKind,
    wallets::WalletOption,
};
use color_eyre::eyre::{
    Result,
    eyre,
};
use contract_bindings::EventPublicDetails;
use crossterm::{
    event::{
        self,
        Event,
        KeyCode,
        KeyEvent,
        KeyEventKind,
        KeyModifiers,
    },
    terminal::{
        disable_raw_mode,
        enable_raw_mode,
    },
};
use deployments::DappKind;
use ratatui::{
    prelude::*,
    widgets::*,
};
use std::io::stdout;
use tokio::sync::mpsc;

pub enum UserEvent {
    Quit,
    Redraw,
    OpenWalletModal,
    Connect {
        wallet_id: String,
        password: Option<String>,
    },
    TabChanged(Tab),
    RefreshViews,
    Submit(Submission),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Events,
    MyPoaps,
    Actions,
    Admin,
    Player,
    Pot,
}

impl Tab {
    fn for_dapp(dapp: DappKind) -> &'static [Tab] {
        match dapp {
            DappKind::Poap => &[Tab::Events, Tab::MyPoaps, Tab::Actions],
            DappKind::Game => &[Tab::Admin, Tab::Player, Tab::Pot],
        }
    }

    fn title(self) -> &'static str {
        match self {
            Tab::Events => "Events",
            Tab::MyPoaps => "My POAPs",
            Tab::Actions => "Actions",
            Tab::Admin => "Admin",
            Tab::Player => "Player",
            Tab::Pot => "Game Pot",
        }
    }

    fn forms(self) -> &'static [FormKind] {
        match self {
            Tab::Events | Tab::MyPoaps => &[],
            Tab::Actions => &[
                FormKind::CreateEvent,
                FormKind::ClaimPoap,
                FormKind::GetEvent,
                FormKind::InitPoap,
            ],
            Tab::Admin => &[
                FormKind::InitGame,
                FormKind::CreateGame,
                FormKind::ResolveGame,
            ],
            Tab::Player => &[FormKind::JoinGame],
            Tab::Pot => &[FormKind::QueryPot],
        }
    }

    /// The read view this tab shows, if any.
    pub fn view(self) -> Option<ViewKind> {
        match self {
            Tab::Events => Some(ViewKind::Events),
            Tab::MyPoaps => Some(ViewKind::MyPoaps),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldKind {
    Text,
    Masked,
    Choice,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FormKind {
    CreateEvent,
    ClaimPoap,
    GetEvent,
    InitPoap,
    InitGame,
    CreateGame,
    ResolveGame,
    JoinGame,
    QueryPot,
}

impl FormKind {
    fn title(self) -> &'static str {
        match self {
            FormKind::CreateEvent => "Create Event",
            FormKind::ClaimPoap => "Claim POAP",
            FormKind::GetEvent => "Get Event",
            FormKind::InitPoap => "Initialize Contract",
            FormKind::InitGame => "Initialize Contract",
            FormKind::CreateGame => "Create Game",
            FormKind::ResolveGame => "Resolve Game",
            FormKind::JoinGame => "Join Game",
            FormKind::QueryPot => "View Game Pot",
        }
    }

    fn fields(self) -> &'static [(&'static str, FieldKind)] {
        match self {
            FormKind::CreateEvent => &[
                ("Name", FieldKind::Text),
                ("Description", FieldKind::Text),
                ("Image URL", FieldKind::Text),
                ("Max Supply", FieldKind::Text),
                ("Secret", FieldKind::Masked),
            ],
            FormKind::ClaimPoap => &[
                ("Event ID", FieldKind::Text),
                ("Secret", FieldKind::Masked),
            ],
            FormKind::GetEvent => &[("Event ID", FieldKind::Text)],
            FormKind::InitPoap => &[],
            FormKind::InitGame => &[("Token Address", FieldKind::Text)],
            FormKind::CreateGame => &[
                ("Game ID", FieldKind::Text),
                ("Min Bet", FieldKind::Text),
                ("Max Players", FieldKind::Text),
            ],
            FormKind::ResolveGame => &[
                ("Game ID", FieldKind::Text),
                ("Result", FieldKind::Text),
            ],
            FormKind::JoinGame => &[
                ("Game ID", FieldKind::Text),
                ("Choice", FieldKind::Choice),
                ("Amount", FieldKind::Text),
            ],
            FormKind::QueryPot => &[("Game ID", FieldKind::Text)],
        }
    }
}

#[derive(Clone, Debug)]
struct FormState {
    kind: FormKind,
    values: Vec<String>,
}

impl FormState {
    fn new(kind: FormKind) -> Self {
        let values = kind
            .fields()
            .iter()
            .map(|(_, field)| match field {
                FieldKind::Choice => CHOICES[0].to_string(),
                _ => String::new(),
            })
            .collect();
        FormState { kind, values }
    }

    /// A form with no fields still takes one row for its submit line.
    fn rows(&self) -> usize {
        self.values.len().max(1)
    }

    fn value(&self, idx: usize) -> String {
        self.values.get(idx).cloned().unwrap_or_default()
    }

    fn submission(&self) -> Submission {
        match self.kind {
            FormKind::CreateEvent => Submission::CreateEvent(CreateEventForm {
                name: self.value(0),
                description: self.value(1),
                image_url: self.value(2),
                max_supply: self.value(3),
                secret: self.value(4),
            }),
            FormKind::ClaimPoap => Submission::ClaimPoap(ClaimPoapForm {
                event_id: self.value(0),
                secret: self.value(1),
            }),
            FormKind::GetEvent => Submission::GetEvent(GetEventForm {
                event_id: self.value(0),
            }),
            FormKind::InitPoap => Submission::InitPoap,
            FormKind::InitGame => Submission::InitGame(GameInitForm {
                token: self.value(0),
            }),
            FormKind::CreateGame => Submission::CreateGame(CreateGameForm {
                game_id: self.value(0),
                min_bet: self.value(1),
                max_players: self.value(2),
            }),
            FormKind::ResolveGame => Submission::ResolveGame(ResolveGameForm {
                game_id: self.value(0),
                result: self.value(1),
            }),
            FormKind::JoinGame => Submission::JoinGame(JoinGameForm {
                game_id: self.value(0),
                choice: self.value(1),
                amount: self.value(2),
            }),
            FormKind::QueryPot => Submission::QueryPot(PotQueryForm {
                game_id: self.value(0),
            }),
        }
    }
}

#[derive(Clone, Debug)]
struct TabState {
    tab: Tab,
    forms: Vec<FormState>,
    focus: usize,
}

impl TabState {
    fn new(tab: Tab) -> Self {
        TabState {
            tab,
            forms: tab.forms().iter().copied().map(FormState::new).collect(),
            focus: 0,
        }
    }

    fn rows(&self) -> usize {
        self.forms.iter().map(FormState::rows).sum()
    }

    /// (form index, field index) of the focused row.
    fn focused(&self) -> Option<(usize, usize)> {
        let mut remaining = self.focus;
        for (form_idx, form) in self.forms.iter().enumerate() {
            if remaining < form.rows() {
                return Some((form_idx, remaining));
            }
            remaining -= form.rows();
        }
        None
    }

    fn focused_field(&self) -> Option<(usize, usize, FieldKind)> {
        let (form_idx, field_idx) = self.focused()?;
        let (_, kind) = self.forms[form_idx].kind.fields().get(field_idx)?;
        Some((form_idx, field_idx, *kind))
    }
}

#[derive(Clone, Debug, Default)]
enum Mode {
    #[default]
    Normal,
    Editing,
    WalletList {
        idx: usize,
    },
    WalletPassword {
        wallet: WalletOption,
        password: String,
    },
}

#[derive(Debug)]
pub struct UiState {
    mode: Mode,
    tabs: Vec<TabState>,
    current: usize,
    wallet_options: Vec<WalletOption>,
    submitted: Option<(usize, usize)>,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
}

impl UiState {
    pub fn new(dapp: DappKind) -> Self {
        UiState {
            mode: Mode::Normal,
            tabs: Tab::for_dapp(dapp).iter().copied().map(TabState::new).collect(),
            current: 0,
            wallet_options: Vec::new(),
            submitted: None,
            terminal: None,
        }
    }

    pub fn current_tab(&self) -> Tab {
        self.tabs[self.current].tab
    }

    /// Reset the last submitted form after it went through.
    pub fn clear_submitted_form(&mut self) {
        if let Some((tab_idx, form_idx)) = self.submitted.take()
            && let Some(form) = self
                .tabs
                .get_mut(tab_idx)
                .and_then(|t| t.forms.get_mut(form_idx))
        {
            *form = FormState::new(form.kind);
        }
    }

    fn tab_state(&mut self) -> &mut TabState {
        &mut self.tabs[self.current]
    }
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
    Ok(())
}

pub fn draw(state: &mut UiState, snap: &AppSnapshot) -> Result<()> {
    // keep wallet choices around for the modal's key handling
    state.wallet_options = snap.wallet_options.clone();
    if let Mode::WalletList { idx } = &mut state.mode {
        *idx = (*idx).min(state.wallet_options.len().saturating_sub(1));
    }
    if let Some(mut term) = state.terminal.take() {
        term.draw(|f| ui(f, state, snap))?;
        state.terminal = Some(term);
    }
    Ok(())
}

pub type InputEventReceiver = mpsc::UnboundedReceiver<std::io::Result<Event>>;

/// Terminal input read on a dedicated thread so the run loop can select
/// over it alongside async work.
pub fn input_event_stream() -> InputEventReceiver {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            let ev = event::read();
            let failed = ev.is_err();
            if tx.send(ev).is_err() || failed {
                break;
            }
        }
    });
    rx
}

pub async fn next_raw_event(input_events: &mut InputEventReceiver) -> Result<Event> {
    match input_events.recv().await {
        Some(ev) => Ok(ev?),
        None => Err(eyre!("terminal input closed")),
    }
}

pub fn interpret_event(state: &mut UiState, event: Event) -> Option<UserEvent> {
    let k = match event {
        Event::Key(k) if k.kind == KeyEventKind::Press => k,
        Event::Resize(_, _) => return Some(UserEvent::Redraw),
        _ => return None,
    };
    if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
        return Some(UserEvent::Quit);
    }
    match &mut state.mode {
        Mode::Normal => interpret_normal(state, k),
        Mode::Editing => {
            let Some((form_idx, field_idx, _)) = state.tabs[state.current].focused_field()
            else {
                state.mode = Mode::Normal;
                return Some(UserEvent::Redraw);
            };
            let value = &mut state.tab_state().forms[form_idx].values[field_idx];
            match k.code {
                KeyCode::Enter | KeyCode::Esc => state.mode = Mode::Normal,
                KeyCode::Backspace => {
                    value.pop();
                }
                KeyCode::Char(c) => value.push(c),
                _ => return None,
            }
            Some(UserEvent::Redraw)
        }
        Mode::WalletList { idx } => match k.code {
            KeyCode::Esc => {
                state.mode = Mode::Normal;
                Some(UserEvent::Redraw)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                *idx = idx.saturating_sub(1);
                Some(UserEvent::Redraw)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = state.wallet_options.len().saturating_sub(1);
                *idx = (*idx + 1).min(max);
                Some(UserEvent::Redraw)
            }
            KeyCode::Enter => {
                let wallet = state.wallet_options.get(*idx).cloned()?;
                if wallet.needs_password {
                    state.mode = Mode::WalletPassword {
                        wallet,
                        password: String::new(),
                    };
                    Some(UserEvent::Redraw)
                } else {
                    state.mode = Mode::Normal;
                    Some(UserEvent::Connect {
                        wallet_id: wallet.id,
                        password: None,
                    })
                }
            }
            _ => None,
        },
        Mode::WalletPassword { wallet, password } => match k.code {
            KeyCode::Esc => {
                state.mode = Mode::Normal;
                Some(UserEvent::Redraw)
            }
            KeyCode::Backspace => {
                password.pop();
                Some(UserEvent::Redraw)
            }
            KeyCode::Char(c) => {
                password.push(c);
                Some(UserEvent::Redraw)
            }
            KeyCode::Enter => {
                let ev = UserEvent::Connect {
                    wallet_id: wallet.id.clone(),
                    password: Some(std::mem::take(password)),
                };
                state.mode = Mode::Normal;
                Some(ev)
            }
            _ => None,
        },
    }
}

fn interpret_normal(state: &mut UiState, k: KeyEvent) -> Option<UserEvent> {
    match k.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(UserEvent::Quit),
        KeyCode::Tab => {
            state.current = (state.current + 1) % state.tabs.len();
            Some(UserEvent::TabChanged(state.current_tab()))
        }
        KeyCode::BackTab => {
            state.current = (state.current + state.tabs.len() - 1) % state.tabs.len();
            Some(UserEvent::TabChanged(state.current_tab()))
        }
        KeyCode::Char('c') => {
            state.mode = Mode::WalletList { idx: 0 };
            Some(UserEvent::OpenWalletModal)
        }
        KeyCode::Char('r') => Some(UserEvent::RefreshViews),
        KeyCode::Up | KeyCode::Char('k') => {
            let tab = state.tab_state();
            tab.focus = tab.focus.saturating_sub(1);
            Some(UserEvent::Redraw)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let tab = state.tab_state();
            tab.focus = (tab.focus + 1).min(tab.rows().saturating_sub(1));
            Some(UserEvent::Redraw)
        }
        KeyCode::Left | KeyCode::Right => {
            let forward = k.code == KeyCode::Right;
            let tab = state.tab_state();
            let (form_idx, field_idx, FieldKind::Choice) = tab.focused_field()? else {
                return None;
            };
            let value = &mut tab.forms[form_idx].values[field_idx];
            let pos = CHOICES
                .iter()
                .position(|c| c.to_string() == *value)
                .unwrap_or(0);
            let next = if forward {
                (pos + 1) % CHOICES.len()
            } else {
                (pos + CHOICES.len() - 1) % CHOICES.len()
            };
            *value = CHOICES[next].to_string();
            Some(UserEvent::Redraw)
        }
        KeyCode::Char('e') => {
            let (_, _, kind) = state.tabs[state.current].focused_field()?;
            if kind == FieldKind::Choice {
                return None;
            }
            state.mode = Mode::Editing;
            Some(UserEvent::Redraw)
        }
        KeyCode::Enter => {
            let (form_idx, _) = state.tabs[state.current].focused()?;
            state.submitted = Some((state.current, form_idx));
            Some(UserEvent::Submit(
                state.tabs[state.current].forms[form_idx].submission(),
            ))
        }
        _ => None,
    }
}

fn ui(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    f.render_widget(Clear, f.area());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // network + account
            Constraint::Length(3), // tabs
            Constraint::Min(8),    // body
            Constraint::Length(7), // notices
            Constraint::Length(3), // help
        ])
        .split(f.area());

    draw_top(f, chunks[0], snap);
    draw_tabs(f, state, chunks[1]);
    let tab = &state.tabs[state.current];
    match tab.tab {
        Tab::Events => draw_event_list(
            f,
            chunks[2],
            "Events",
            &snap.events,
            "Loading events...",
            "No events found.",
        ),
        Tab::MyPoaps => draw_event_list(
            f,
            chunks[2],
            "My POAPs",
            &snap.my_poaps,
            "Loading your POAPs...",
            "You have not claimed any POAPs yet.",
        ),
        _ => draw_forms(f, state, tab, chunks[2], snap),
    }
    draw_bottom(f, chunks[3], snap);
    draw_help(f, state, chunks[4]);
    draw_modals(f, state);
}

fn draw_top(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let account = match snap.account {
        Some(address) => address.to_string(),
        None => String::from("Not connected (press c to connect)"),
    };
    let busy = if snap.busy { " | working..." } else { "" };
    let text = format!(
        "Network: {} | RPC: {}{}\nContract: {} | Account: {}",
        snap.network, snap.rpc_url, busy, snap.contract_id, account
    );
    let widget = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} dapp", snap.dapp)),
    );
    f.render_widget(widget, area);
}

fn draw_tabs(f: &mut Frame, state: &UiState, area: Rect) {
    let titles: Vec<&str> = state.tabs.iter().map(|t| t.tab.title()).collect();
    let tabs = Tabs::new(titles)
        .select(state.current)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(tabs, area);
}

fn event_lines(event: &EventPublicDetails) -> Vec<Line<'static>> {
    vec![
        Line::styled(
            format!("#{} {}", event.id, event.name),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(format!("  {}", event.description)),
        Line::from(format!("  Image: {}", event.image_url)),
        Line::from(format!("  Creator: {}", event.creator)),
        Line::from(format!(
            "  Claimed: {}/{} ({} left)",
            event.minted_count,
            event.max_supply,
            event.remaining()
        )),
    ]
}

fn draw_event_list(
    f: &mut Frame,
    area: Rect,
    title: &str,
    data: &ViewData<Vec<EventPublicDetails>>,
    loading: &str,
    empty: &str,
) {
    let lines: Vec<Line> = match data {
        ViewData::NotLoaded => vec![Line::styled(
            "Connect a wallet to load this view.",
            Style::default().fg(Color::DarkGray),
        )],
        ViewData::Loading => vec![Line::from(loading.to_string())],
        ViewData::Ready(events) if events.is_empty() => vec![Line::from(empty.to_string())],
        ViewData::Ready(events) => events.iter().flat_map(event_lines).collect(),
    };
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(widget, area);
}

fn draw_forms(f: &mut Frame, state: &UiState, tab: &TabState, area: Rect, snap: &AppSnapshot) {
    let focused = tab.focused();
    let editing = matches!(state.mode, Mode::Editing);
    let mut lines: Vec<Line> = Vec::new();
    for (form_idx, form) in tab.forms.iter().enumerate() {
        lines.push(Line::styled(
            form.kind.title(),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ));
        let fields = form.kind.fields();
        if fields.is_empty() {
            let cur = focused == Some((form_idx, 0));
            lines.push(row_line(cur, String::from("[ Enter to submit ]")));
        }
        for (field_idx, (label, kind)) in fields.iter().enumerate() {
            let cur = focused == Some((form_idx, field_idx));
            let raw = &form.values[field_idx];
            let mut shown = match kind {
                FieldKind::Masked => "*".repeat(raw.chars().count()),
                FieldKind::Choice => format!("< {raw} >"),
                FieldKind::Text => raw.clone(),
            };
            if cur && editing {
                shown.push('_');
            }
            lines.push(row_line(cur, format!("{label}: {shown}")));
        }
        lines.push(Line::from(""));
    }
    if tab.tab == Tab::Actions
        && let Some(event) = &snap.looked_up_event
    {
        lines.push(Line::styled(
            "Event details",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        lines.extend(event_lines(event));
    }
    if tab.tab == Tab::Pot
        && let Some(pot) = &snap.pot
    {
        lines.push(Line::from(pot.message()));
    }
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(tab.tab.title()),
        );
    f.render_widget(widget, area);
}

fn row_line(focused: bool, text: String) -> Line<'static> {
    if focused {
        Line::styled(format!("> {text}"), Style::default().fg(Color::Yellow))
    } else {
        Line::from(format!("  {text}"))
    }
}

fn draw_bottom(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let has_failure = snap.notices.iter().any(|n| n.kind == NoticeKind::Failure);
    let mut lines: Vec<Line> = Vec::new();
    if snap.notices.is_empty() {
        lines.push(Line::from("Ready"));
    }
    for notice in &snap.notices {
        let color = match notice.kind {
            NoticeKind::Pending => Color::Yellow,
            NoticeKind::Success => Color::Green,
            NoticeKind::Failure => Color::Red,
        };
        lines.push(Line::styled(
            format!("[{}] {}", notice.at.format("%H:%M:%S"), notice.message),
            Style::default().fg(color),
        ));
    }
    let (title, border) = if has_failure {
        ("Errors", Color::Red)
    } else {
        ("Status", Color::Green)
    };
    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(widget, area);
}

fn draw_help(f: &mut Frame, state: &UiState, area: Rect) {
    let text = match state.mode {
        Mode::Normal => {
            "Tab switch | ↑/↓ field | e edit | ←/→ choice | Enter submit | r refresh | c connect | q/Esc quit"
        }
        Mode::Editing => "type to edit | Backspace delete | Enter/Esc done",
        Mode::WalletList { .. } => "↑/↓ select | Enter connect | Esc cancel",
        Mode::WalletPassword { .. } => "type password | Enter unlock | Esc cancel",
    };
    let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, area);
}

fn draw_modals(f: &mut Frame, state: &UiState) {
    match &state.mode {
        Mode::WalletList { idx } => {
            let area = centered_rect(60, 50, f.area());
            let block = Block::default()
                .borders(Borders::ALL)
                .title("Connect Wallet");
            let mut lines = Vec::new();
            if state.wallet_options.is_empty() {
                lines.push(Line::from("No wallets found"));
            }
            for (i, option) in state.wallet_options.iter().enumerate() {
                let cur = if i == *idx { ">" } else { " " };
                let lock = if option.needs_password { " (password)" } else { "" };
                lines.push(Line::from(format!("{cur} {}{lock}", option.name)));
            }
            f.render_widget(Clear, area);
            f.render_widget(block.clone(), area);
            f.render_widget(Paragraph::new(lines), block.inner(area));
        }
        Mode::WalletPassword { wallet, password } => {
            let area = centered_rect(50, 25, f.area());
            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!("Unlock {}", wallet.name));
            let p = Paragraph::new(format!(
                "Password: {}_\nEnter=unlock Esc=cancel",
                "*".repeat(password.chars().count())
            ));
            f.render_widget(Clear, area);
            f.render_widget(block.clone(), area);
            f.render_widget(p, block.inner(area));
        }
        Mode::Normal | Mode::Editing => {}
    }
}

fn centered_rect(w_percent: u16, h_percent: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h_percent) / 2),
            Constraint::Percentage(h_percent),
            Constraint::Percentage((100 - h_percent) / 2),
        ])
        .split(r);

    let vertical = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w_percent) / 2),
            Constraint::Percentage(w_percent),
            Constraint::Percentage((100 - w_percent) / 2),
        ])
        .split(popup_layout[1]);

    vertical[1]
}
