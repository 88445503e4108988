//! Client-side view of a room, driven by server events.
//!
//! [`RoomView::apply`] folds one event into the view and returns the side
//! effects the shell should perform (alerts, navigation, sounds, overlays).

use tracing::{debug, info};

use crate::protocol::{
    Ack, Bonus, ClientRequest, Question, Reveal, Room, RoomStatus, ServerEvent, ThemeSpec,
};
use crate::route::Route;
use crate::sound::Cue;

use super::countdown;
use super::shuffle::{ChoiceMark, ShuffledQuestion};
use super::theme::{self, Theme};

pub const GAME_FINISHED: &str = "Game finished!";
pub const JOIN_FAILED: &str = "Could not join (bad code?)";
pub const CREATE_FAILED: &str = "Create failed";

/// Who is looking at the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    GameMaster,
    Player { code: String, name: String },
}

/// Something the shell has to do after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Alert(String),
    Navigate(Route),
    Sound(Cue),
    Celebrate(String),
    ShowBonus(Bonus),
    ThemeChanged,
}

/// Line shown under the question card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    TimeLeft(u64),
    Winner(String),
    NoCorrectAnswer,
}

pub struct RoomView {
    role: Role,
    room: Option<Room>,
    question: Option<ShuffledQuestion>,
    reveal: Option<Reveal>,
    locked: bool,
    picked: Option<usize>,
    wrong: Option<usize>,
    theme_spec: Option<ThemeSpec>,
    theme: Option<Theme>,
    rng: fastrand::Rng,
}

impl RoomView {
    pub fn new(role: Role) -> Self {
        Self::with_rng(role, fastrand::Rng::new())
    }

    pub fn with_rng(role: Role, rng: fastrand::Rng) -> Self {
        Self {
            role,
            room: None,
            question: None,
            reveal: None,
            locked: false,
            picked: None,
            wrong: None,
            theme_spec: None,
            theme: None,
            rng,
        }
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    pub fn question(&self) -> Option<&ShuffledQuestion> {
        self.question.as_ref()
    }

    pub fn reveal(&self) -> Option<&Reveal> {
        self.reveal.as_ref()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    fn is_player(&self) -> bool {
        matches!(self.role, Role::Player { .. })
    }

    /// Fold one server event into the view.
    pub fn apply(&mut self, event: ServerEvent) -> Vec<Effect> {
        match event {
            ServerEvent::Connected => Vec::new(),
            ServerEvent::RoomUpdate(room) => self.on_room_update(*room),
            ServerEvent::QuestionNew(question) => {
                self.on_question(question);
                Vec::new()
            }
            ServerEvent::QuestionReveal(reveal) => self.on_reveal(reveal),
            ServerEvent::GameEnded => self.on_game_ended(),
            ServerEvent::Disconnected(reason) => {
                vec![Effect::Alert(format!("Disconnected: {reason}"))]
            }
        }
    }

    fn on_room_update(&mut self, room: Room) -> Vec<Effect> {
        let mut effects = Vec::new();

        if self.is_player() {
            if let Some(spec) = room.theme.as_ref().filter(|s| self.theme_spec.as_ref() != Some(*s)) {
                info!(theme = ?spec.name, "applying room theme");
                self.theme = Some(Theme::from_spec(spec, &mut self.rng));
                self.theme_spec = Some(spec.clone());
                effects.push(Effect::ThemeChanged);
                if let Some(cue) = theme::ambient_cue(spec) {
                    effects.push(Effect::Sound(cue));
                }
            }
        }

        self.room = Some(room);
        effects
    }

    fn on_question(&mut self, question: Question) {
        debug!(choices = question.choices.len(), "new question");
        self.question = Some(ShuffledQuestion::with_rng(question, &mut self.rng));
        self.reveal = None;
        if self.is_player() {
            self.locked = false;
            self.picked = None;
            self.wrong = None;
        }
    }

    fn on_reveal(&mut self, reveal: Reveal) -> Vec<Effect> {
        let mut effects = Vec::new();

        if let Role::Player { name, .. } = &self.role {
            self.locked = true;

            if let (Some(picked), Some(correct)) = (self.picked, reveal.correct_index) {
                effects.push(Effect::Sound(if picked == correct {
                    Cue::Correct
                } else {
                    Cue::Wrong
                }));
            }
            if reveal.winner.as_deref() == Some(name.as_str()) {
                effects.push(Effect::ShowBonus(reveal.bonus.clone().unwrap_or_default()));
            }
        }

        if let Some(winner) = &reveal.winner {
            effects.push(Effect::Celebrate(winner.clone()));
            effects.push(Effect::Sound(Cue::Celebration));
        }

        self.reveal = Some(reveal);
        effects
    }

    fn on_game_ended(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::Alert(GAME_FINISHED.to_string())];
        match self.role {
            Role::GameMaster => {
                self.question = None;
                self.reveal = None;
            }
            Role::Player { .. } => effects.push(Effect::Navigate(Route::Join)),
        }
        effects
    }

    /// Pick the choice at a displayed position.
    ///
    /// Returns the request to send, or `None` when answering is not allowed.
    pub fn choose(&mut self, position: usize) -> Option<ClientRequest> {
        let Role::Player { code, .. } = &self.role else {
            return None;
        };
        if self.locked || self.reveal.is_some() {
            return None;
        }
        let original = self.question.as_ref()?.original_index(position)?;

        self.locked = true;
        self.picked = Some(original);
        Some(ClientRequest::Answer {
            code: code.clone(),
            choice_index: original,
        })
    }

    /// Handle the server's reply to the answer `choice_index`.
    ///
    /// Replies that no longer match the current pick are ignored.
    pub fn on_answer_ack(&mut self, choice_index: usize, ack: &Ack) -> Vec<Effect> {
        if !ack.ok {
            debug!(error = ?ack.error, "answer not accepted");
            return Vec::new();
        }
        if self.picked != Some(choice_index) {
            debug!(choice_index, "stale answer ack");
            return Vec::new();
        }
        if ack.correct == Some(false) && self.reveal.is_none() {
            self.wrong = self.picked;
            return vec![Effect::Sound(Cue::Wrong)];
        }
        Vec::new()
    }

    /// Handle the server's reply to `player:join`.
    pub fn on_join_ack(&self, ack: &Ack) -> Vec<Effect> {
        if ack.ok {
            Vec::new()
        } else {
            vec![
                Effect::Alert(JOIN_FAILED.to_string()),
                Effect::Navigate(Route::Join),
            ]
        }
    }

    /// Request the game master sends to start or advance, for the current status.
    pub fn host_action(&self) -> Option<ClientRequest> {
        let room = self.room.as_ref()?;
        let code = room.code.clone();
        match room.status {
            RoomStatus::Lobby => Some(ClientRequest::StartGame { code }),
            RoomStatus::Question | RoomStatus::Reveal => Some(ClientRequest::NextQuestion { code }),
            _ => None,
        }
    }

    pub fn time_left(&self, now: i64) -> u64 {
        self.room
            .as_ref()
            .map_or(0, |room| countdown::time_left(room, now))
    }

    pub fn question_number(&self) -> u32 {
        self.room.as_ref().map_or(0, Room::question_number)
    }

    /// Highlights for the displayed choices.
    pub fn marks(&self) -> Vec<ChoiceMark> {
        let Some(question) = &self.question else {
            return Vec::new();
        };
        let reveal = self.reveal.as_ref().and_then(|r| r.correct_index);
        question.marks(reveal, self.wrong)
    }

    pub fn status(&self, now: i64) -> Status {
        let in_question = self
            .room
            .as_ref()
            .is_some_and(|r| r.status == RoomStatus::Question);
        if in_question {
            return Status::TimeLeft(self.time_left(now));
        }
        match self.reveal.as_ref().and_then(|r| r.winner.clone()) {
            Some(winner) => Status::Winner(winner),
            None => Status::NoCorrectAnswer,
        }
    }
}

/// Handle the server's reply to `gm:create`.
pub fn on_create_ack(ack: &Ack) -> Vec<Effect> {
    if ack.ok {
        Vec::new()
    } else {
        vec![Effect::Alert(CREATE_FAILED.to_string())]
    }
}
