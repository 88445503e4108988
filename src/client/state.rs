//! Client state management.

use std::time::Instant;

use tracing::{debug, info};

use crate::game::celebration::{BONUS_DURATION, CELEBRATION_DURATION};
use crate::game::room::{self, Effect, Role, RoomView};
use crate::game::{Flash, Palette, Theme};
use crate::protocol::{Ack, Bonus, ClientRequest, PackInfo, ServerEvent};
use crate::route::Route;
use crate::sound::{Cue, SoundPlayer};

pub const AVATARS: [&str; 16] = [
    "😀", "🤩", "😎", "🥳", "🤓", "🦸", "🦄", "🐱", "🐶", "🐼", "🦊", "🐯", "🦁", "🐸", "🐵", "🦉",
];
pub const AVATAR_COLUMNS: usize = 8;

pub const MIN_SECONDS: u32 = 5;
pub const MAX_SECONDS: u32 = 120;
const DEFAULT_SECONDS: u32 = 30;
const DEFAULT_QUESTIONS: u32 = 10;
const CODE_MAX_LENGTH: usize = 12;
const NAME_MAX_LENGTH: usize = 24;

/// Focusable fields of the room setup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Pack,
    Seconds,
    Questions,
    Create,
}

impl SetupField {
    fn next(self) -> Self {
        match self {
            SetupField::Pack => SetupField::Seconds,
            SetupField::Seconds => SetupField::Questions,
            SetupField::Questions => SetupField::Create,
            SetupField::Create => SetupField::Pack,
        }
    }

    fn previous(self) -> Self {
        match self {
            SetupField::Pack => SetupField::Create,
            SetupField::Seconds => SetupField::Pack,
            SetupField::Questions => SetupField::Seconds,
            SetupField::Create => SetupField::Questions,
        }
    }
}

/// Form the game master fills in before a room exists.
#[derive(Debug, Clone)]
pub struct SetupForm {
    pub packs: Vec<PackInfo>,
    pub selected: Option<usize>,
    pub duration_sec: u32,
    pub total_questions: u32,
    pub focus: SetupField,
    pub load_error: Option<String>,
}

impl Default for SetupForm {
    fn default() -> Self {
        Self {
            packs: Vec::new(),
            selected: None,
            duration_sec: DEFAULT_SECONDS,
            total_questions: DEFAULT_QUESTIONS,
            focus: SetupField::Pack,
            load_error: None,
        }
    }
}

impl SetupForm {
    pub fn selected_pack(&self) -> Option<&PackInfo> {
        self.selected.and_then(|i| self.packs.get(i))
    }

    /// Upper bound for the number of questions.
    pub fn max_questions(&self) -> u32 {
        self.selected_pack().map_or(1, |p| p.count.max(1))
    }

    pub fn set_packs(&mut self, packs: Vec<PackInfo>) {
        self.packs = packs;
        self.selected = None;
        self.load_error = None;
    }

    /// Move the pack selection; `None` is the "Select pack" placeholder.
    pub fn cycle_pack(&mut self, forward: bool) {
        let n = self.packs.len();
        if n == 0 {
            return;
        }
        self.selected = match (self.selected, forward) {
            (None, true) => Some(0),
            (None, false) => Some(n - 1),
            (Some(i), true) if i + 1 < n => Some(i + 1),
            (Some(_), true) => None,
            (Some(0), false) => None,
            (Some(i), false) => Some(i - 1),
        };
    }

    pub fn adjust_seconds(&mut self, delta: i64) {
        let value = i64::from(self.duration_sec) + delta;
        self.duration_sec = value.clamp(i64::from(MIN_SECONDS), i64::from(MAX_SECONDS)) as u32;
    }

    pub fn adjust_questions(&mut self, delta: i64) {
        let value = i64::from(self.total_questions) + delta;
        self.total_questions = value.clamp(1, i64::from(self.max_questions())) as u32;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Build the create request, or the alert to show instead.
    pub fn create_request(&self) -> Result<ClientRequest, &'static str> {
        let pack = self.selected_pack().ok_or("Choose a pack")?;
        Ok(ClientRequest::CreateRoom {
            pack_file: pack.file.clone(),
            duration_sec: self.duration_sec.clamp(MIN_SECONDS, MAX_SECONDS),
            total_questions: self.total_questions.clamp(1, self.max_questions()),
        })
    }
}

/// Focusable fields of the join form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinField {
    Code,
    Name,
    Avatar,
    Join,
}

impl JoinField {
    fn next(self) -> Self {
        match self {
            JoinField::Code => JoinField::Name,
            JoinField::Name => JoinField::Avatar,
            JoinField::Avatar => JoinField::Join,
            JoinField::Join => JoinField::Code,
        }
    }

    fn previous(self) -> Self {
        match self {
            JoinField::Code => JoinField::Join,
            JoinField::Name => JoinField::Code,
            JoinField::Avatar => JoinField::Name,
            JoinField::Join => JoinField::Avatar,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JoinForm {
    pub code: String,
    pub name: String,
    pub avatar: usize,
    pub focus: JoinField,
}

impl Default for JoinForm {
    fn default() -> Self {
        Self {
            code: String::new(),
            name: String::new(),
            avatar: 0,
            focus: JoinField::Code,
        }
    }
}

impl JoinForm {
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Whether typed characters go into a text field.
    pub fn is_typing(&self) -> bool {
        matches!(self.focus, JoinField::Code | JoinField::Name)
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            JoinField::Code if self.code.chars().count() < CODE_MAX_LENGTH => {
                self.code.extend(c.to_uppercase());
            }
            JoinField::Name if self.name.chars().count() < NAME_MAX_LENGTH => self.name.push(c),
            _ => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            JoinField::Code => {
                self.code.pop();
            }
            JoinField::Name => {
                self.name.pop();
            }
            _ => {}
        }
    }

    /// Move the avatar selection by columns and rows of the grid.
    pub fn move_avatar(&mut self, dx: i64, dy: i64) {
        let n = AVATARS.len() as i64;
        let next = self.avatar as i64 + dx + dy * AVATAR_COLUMNS as i64;
        self.avatar = next.rem_euclid(n) as usize;
    }

    pub fn avatar(&self) -> &'static str {
        AVATARS[self.avatar % AVATARS.len()]
    }

    pub fn route(&self) -> Route {
        Route::game(&self.code, &self.name, Some(self.avatar()))
    }
}

/// The game master's page: setup form until a room exists, then the room.
pub struct MasterScreen {
    pub setup: SetupForm,
    pub view: RoomView,
}

/// A player's page for one room.
pub struct GameScreen {
    pub code: String,
    pub name: String,
    pub avatar: Option<String>,
    pub view: RoomView,
    pub cursor: usize,
}

pub enum Screen {
    Master(MasterScreen),
    Join(JoinForm),
    Game(GameScreen),
}

impl Screen {
    fn view_mut(&mut self) -> Option<&mut RoomView> {
        match self {
            Screen::Master(master) => Some(&mut master.view),
            Screen::Game(game) => Some(&mut game.view),
            Screen::Join(_) => None,
        }
    }
}

/// Client application state.
pub struct ClientApp {
    pub screen: Screen,
    /// Server base URL.
    pub server: String,
    /// Packs fetched from the server, kept across navigation.
    pub packs: Vec<PackInfo>,
    pub connected: bool,
    /// Modal message; blocks input until dismissed.
    pub alert: Option<String>,
    pub sound: SoundPlayer,
    pub celebration: Flash<String>,
    pub bonus: Flash<Bonus>,
    pub should_quit: bool,
    started: Instant,
}

impl ClientApp {
    pub fn new(server: String, sound: SoundPlayer) -> Self {
        Self {
            screen: Screen::Master(MasterScreen {
                setup: SetupForm::default(),
                view: RoomView::new(Role::GameMaster),
            }),
            server,
            packs: Vec::new(),
            connected: false,
            alert: None,
            sound,
            celebration: Flash::new(CELEBRATION_DURATION),
            bonus: Flash::new(BONUS_DURATION),
            should_quit: false,
            started: Instant::now(),
        }
    }

    /// Room theme; only players see one.
    pub fn theme(&self) -> Option<&Theme> {
        match &self.screen {
            Screen::Game(game) => game.view.theme(),
            _ => None,
        }
    }

    pub fn palette(&self) -> Palette {
        self.theme().map(|t| t.palette).unwrap_or_default()
    }

    /// Seconds since start, drives ambient animation.
    pub fn elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// Switch screens. Entering a game returns the join request to send.
    pub fn navigate(&mut self, route: Route) -> Option<ClientRequest> {
        info!(%route, "navigate");
        self.celebration.clear();
        self.bonus.clear();

        match route {
            Route::GameMaster => {
                let mut setup = SetupForm::default();
                setup.set_packs(self.packs.clone());
                self.screen = Screen::Master(MasterScreen {
                    setup,
                    view: RoomView::new(Role::GameMaster),
                });
                None
            }
            Route::Join => {
                self.screen = Screen::Join(JoinForm::default());
                None
            }
            Route::Game { code, name, avatar } => {
                let request = ClientRequest::JoinRoom {
                    code: code.clone(),
                    name: name.clone(),
                    avatar: avatar.clone(),
                };
                self.screen = Screen::Game(GameScreen {
                    view: RoomView::new(Role::Player {
                        code: code.clone(),
                        name: name.clone(),
                    }),
                    code,
                    name,
                    avatar,
                    cursor: 0,
                });
                Some(request)
            }
        }
    }

    pub fn set_packs(&mut self, packs: Vec<PackInfo>) {
        info!(count = packs.len(), "packs loaded");
        self.packs = packs.clone();
        if let Screen::Master(master) = &mut self.screen {
            master.setup.set_packs(packs);
        }
    }

    pub fn set_pack_error(&mut self, error: String) {
        if let Screen::Master(master) = &mut self.screen {
            master.setup.load_error = Some(error);
        }
    }

    /// Deliver a server event to the mounted screen.
    pub fn handle_event(&mut self, event: ServerEvent) -> Option<ClientRequest> {
        match &event {
            ServerEvent::Connected => self.connected = true,
            ServerEvent::Disconnected(_) => self.connected = false,
            ServerEvent::QuestionNew(_) => {
                if let Screen::Game(game) = &mut self.screen {
                    game.cursor = 0;
                }
                self.bonus.clear();
            }
            _ => {}
        }

        let effects = match self.screen.view_mut() {
            Some(view) => view.apply(event),
            None => match event {
                ServerEvent::Disconnected(reason) => {
                    vec![Effect::Alert(format!("Disconnected: {reason}"))]
                }
                other => {
                    debug!(?other, "no listener on this screen");
                    Vec::new()
                }
            },
        };
        self.apply_effects(effects)
    }

    /// Deliver the acknowledgement of a request sent earlier.
    pub fn handle_ack(&mut self, request: &ClientRequest, ack: Ack) -> Option<ClientRequest> {
        debug!(event = request.event_name(), ok = ack.ok, "ack");
        let effects = match (request, &mut self.screen) {
            (ClientRequest::CreateRoom { .. }, Screen::Master(_)) => room::on_create_ack(&ack),
            (ClientRequest::JoinRoom { code, .. }, Screen::Game(game)) if *code == game.code => {
                game.view.on_join_ack(&ack)
            }
            (
                ClientRequest::Answer {
                    code,
                    choice_index,
                },
                Screen::Game(game),
            ) if *code == game.code => game.view.on_answer_ack(*choice_index, &ack),
            _ => Vec::new(),
        };
        self.apply_effects(effects)
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) -> Option<ClientRequest> {
        let now = Instant::now();
        let mut request = None;

        for effect in effects {
            match effect {
                Effect::Alert(message) => self.alert = Some(message),
                Effect::Navigate(route) => request = self.navigate(route),
                Effect::Sound(cue) => self.sound.play(cue),
                Effect::Celebrate(winner) => self.celebration.show(winner, now),
                Effect::ShowBonus(bonus) => self.bonus.show(bonus, now),
                Effect::ThemeChanged => debug!("theme changed"),
            }
        }
        request
    }

    /// Drop overlays whose time is up.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if let Some(winner) = self.celebration.expire(now) {
            debug!(%winner, "celebration finished");
        }
        self.bonus.expire(now);
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Move the answer cursor on the player's card.
    pub fn move_cursor(&mut self, forward: bool) {
        if let Screen::Game(game) = &mut self.screen {
            let n = game.view.question().map_or(0, |q| q.len());
            if n == 0 {
                return;
            }
            game.cursor = if forward {
                (game.cursor + 1) % n
            } else {
                (game.cursor + n - 1) % n
            };
        }
    }

    /// Answer with the choice at `position`, or at the cursor.
    pub fn answer(&mut self, position: Option<usize>) -> Option<ClientRequest> {
        let Screen::Game(game) = &mut self.screen else {
            return None;
        };
        let position = position.unwrap_or(game.cursor);
        let request = game.view.choose(position)?;
        game.cursor = position;
        self.sound.play(Cue::Click);
        Some(request)
    }

    /// Start or advance the game, depending on the room status.
    pub fn host_action(&self) -> Option<ClientRequest> {
        match &self.screen {
            Screen::Master(master) => master.view.host_action(),
            _ => None,
        }
    }

    /// Create a room from the setup form; alerts when the form is incomplete.
    pub fn create_room(&mut self) -> Option<ClientRequest> {
        let Screen::Master(master) = &self.screen else {
            return None;
        };
        match master.setup.create_request() {
            Ok(request) => Some(request),
            Err(message) => {
                self.alert = Some(message.to_string());
                None
            }
        }
    }

    pub fn toggle_mute(&mut self) {
        self.sound.toggle_muted();
    }
}
