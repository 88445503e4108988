//! Typed events exchanged with the quiz server.
//!
//! All payloads are JSON; field names follow the server's camelCase.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::packet::PacketError;

pub const ROOM_UPDATE: &str = "room:update";
pub const QUESTION_NEW: &str = "question:new";
pub const QUESTION_REVEAL: &str = "question:reveal";
pub const GAME_ENDED: &str = "game:ended";

/// Lifecycle of a room as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[default]
    Lobby,
    Question,
    Reveal,
    Ended,
    #[serde(untagged)]
    Other(String),
}

/// A player as listed in a room update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Ambient effects toggled by a theme.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThemeEffects {
    #[serde(default)]
    pub bats: bool,
    #[serde(default)]
    pub snow: bool,
}

/// Styling variables and effects attached to a room.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThemeSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
    #[serde(default)]
    pub effects: Option<ThemeEffects>,
}

/// Full room snapshot, pushed on every change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub code: String,
    #[serde(default)]
    pub pack_title: Option<String>,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub total: u32,
    #[serde(default = "no_question")]
    pub ix: i64,
    #[serde(default)]
    pub status: RoomStatus,
    /// Epoch milliseconds at which the current question closes.
    #[serde(default)]
    pub ends_at: Option<i64>,
    #[serde(default)]
    pub theme: Option<ThemeSpec>,
}

fn no_question() -> i64 {
    -1
}

impl Room {
    /// One-based number of the current question, or 0 before the first.
    pub fn question_number(&self) -> u32 {
        if self.ix < 0 {
            return 0;
        }
        u32::try_from(self.ix).map_or(u32::MAX, |ix| ix.saturating_add(1))
    }
}

/// A question as broadcast to the room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub front: String,
    #[serde(default)]
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionPayload {
    pub q: Question,
}

/// Points breakdown for the winner of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bonus {
    pub points_earned: i64,
    pub speed_bonus: i64,
    pub streak_multiplier: i64,
    pub lightning_multiplier: i64,
}

impl Default for Bonus {
    fn default() -> Self {
        Self {
            points_earned: 10,
            speed_bonus: 0,
            streak_multiplier: 1,
            lightning_multiplier: 1,
        }
    }
}

/// Outcome of a question once its timer expires.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reveal {
    /// Negative, fractional or non-numeric indices mean "no correct answer".
    #[serde(default, deserialize_with = "lenient_index")]
    pub correct_index: Option<usize>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub bonus: Option<Bonus>,
}

fn lenient_index<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        v.as_u64()
            .or_else(|| v.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
            .and_then(|i| usize::try_from(i).ok())
    }))
}

/// Everything the connection can deliver to the application.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    Connected,
    RoomUpdate(Box<Room>),
    QuestionNew(Question),
    QuestionReveal(Reveal),
    GameEnded,
    Disconnected(String),
}

impl ServerEvent {
    /// Map a named event and its arguments to a typed event.
    ///
    /// Returns `Ok(None)` for events this client does not listen to.
    pub fn from_named(name: &str, args: &[Value]) -> Result<Option<Self>, PacketError> {
        let first = || args.first().cloned().unwrap_or(Value::Null);

        let event = match name {
            ROOM_UPDATE => ServerEvent::RoomUpdate(Box::new(serde_json::from_value(first())?)),
            QUESTION_NEW => {
                let payload: QuestionPayload = serde_json::from_value(first())?;
                ServerEvent::QuestionNew(payload.q)
            }
            QUESTION_REVEAL => {
                let value = first();
                if value.is_null() {
                    ServerEvent::QuestionReveal(Reveal::default())
                } else {
                    ServerEvent::QuestionReveal(serde_json::from_value(value)?)
                }
            }
            GAME_ENDED => ServerEvent::GameEnded,
            _ => return Ok(None),
        };

        Ok(Some(event))
    }
}

/// Requests the client sends; every one expects an acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClientRequest {
    #[serde(rename_all = "camelCase")]
    CreateRoom {
        pack_file: String,
        duration_sec: u32,
        total_questions: u32,
    },
    StartGame {
        code: String,
    },
    NextQuestion {
        code: String,
    },
    JoinRoom {
        code: String,
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        avatar: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Answer {
        code: String,
        choice_index: usize,
    },
}

impl ClientRequest {
    /// Event name this request is emitted under.
    pub fn event_name(&self) -> &'static str {
        match self {
            ClientRequest::CreateRoom { .. } => "gm:create",
            ClientRequest::StartGame { .. } => "gm:start",
            ClientRequest::NextQuestion { .. } => "gm:next",
            ClientRequest::JoinRoom { .. } => "player:join",
            ClientRequest::Answer { .. } => "player:answer",
        }
    }
}

/// Server response to a request.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub correct: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Ack {
    /// Interpret raw ack arguments; anything unexpected counts as a failure.
    pub fn from_args(args: &[Value]) -> Self {
        args.first()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            correct: None,
            error: Some(reason.into()),
        }
    }
}

/// Pack entry from the catalogue endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackInfo {
    pub file: String,
    pub title: String,
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct PackList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub packs: Vec<PackInfo>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_room_update_parses_server_snapshot() {
        let args = vec![json!({
            "code": "7H6GQ2",
            "packTitle": "Capitals",
            "players": [{"name": "Ana", "score": 20, "avatar": "🦊"}, {"name": "Bo", "score": 5}],
            "total": 10,
            "ix": 2,
            "status": "question",
            "endsAt": 1_700_000_030_000i64,
            "theme": {"vars": {"--accent": "#ff8800"}, "effects": {"bats": true}}
        })];

        let Some(ServerEvent::RoomUpdate(room)) = ServerEvent::from_named(ROOM_UPDATE, &args).unwrap()
        else {
            panic!("expected room update");
        };
        assert_eq!(room.code, "7H6GQ2");
        assert_eq!(room.pack_title.as_deref(), Some("Capitals"));
        assert_eq!(room.players.len(), 2);
        assert_eq!(room.players[1].avatar, None);
        assert_eq!(room.status, RoomStatus::Question);
        assert_eq!(room.question_number(), 3);
        assert_eq!(room.ends_at, Some(1_700_000_030_000));
        let theme = room.theme.as_ref().unwrap();
        assert!(theme.effects.as_ref().unwrap().bats);
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let room: Room = serde_json::from_value(json!({"code": "X", "status": "paused"})).unwrap();
        assert_eq!(room.status, RoomStatus::Other("paused".to_string()));
        assert_eq!(room.question_number(), 0);
    }

    #[test]
    fn test_reveal_without_payload() {
        let event = ServerEvent::from_named(QUESTION_REVEAL, &[]).unwrap();
        assert_eq!(event, Some(ServerEvent::QuestionReveal(Reveal::default())));
    }

    #[test]
    fn test_bonus_defaults_fill_missing_fields() {
        let reveal: Reveal = serde_json::from_value(json!({
            "correctIndex": 1, "winner": "Ana", "bonus": {"speedBonus": 4}
        }))
        .unwrap();
        let bonus = reveal.bonus.unwrap();
        assert_eq!(bonus.points_earned, 10);
        assert_eq!(bonus.speed_bonus, 4);
        assert_eq!(bonus.streak_multiplier, 1);
    }

    #[test]
    fn test_reveal_index_outside_range_means_none() {
        for index in [json!(-1), json!(1.5), json!("2"), json!(null)] {
            let event =
                ServerEvent::from_named(QUESTION_REVEAL, &[json!({"correctIndex": index.clone(), "winner": "Bo"})])
                    .unwrap();
            let Some(ServerEvent::QuestionReveal(reveal)) = event else {
                panic!("expected reveal for {index}");
            };
            assert_eq!(reveal.correct_index, None);
            assert_eq!(reveal.winner.as_deref(), Some("Bo"));
        }

        let reveal: Reveal = serde_json::from_value(json!({"correctIndex": 2.0})).unwrap();
        assert_eq!(reveal.correct_index, Some(2));
    }

    #[test]
    fn test_question_number_saturates() {
        let room = Room {
            ix: i64::MAX,
            ..Room::default()
        };
        assert_eq!(room.question_number(), u32::MAX);
        let room = Room {
            ix: i64::from(u32::MAX),
            ..Room::default()
        };
        assert_eq!(room.question_number(), u32::MAX);
    }

    #[test]
    fn test_unlistened_events_are_skipped() {
        assert_eq!(ServerEvent::from_named("chat:message", &[json!("hi")]).unwrap(), None);
    }

    #[test]
    fn test_request_payload_shapes() {
        let create = ClientRequest::CreateRoom {
            pack_file: "capitals.json".to_string(),
            duration_sec: 30,
            total_questions: 10,
        };
        assert_eq!(create.event_name(), "gm:create");
        assert_eq!(
            serde_json::to_value(&create).unwrap(),
            json!({"packFile": "capitals.json", "durationSec": 30, "totalQuestions": 10})
        );

        let answer = ClientRequest::Answer {
            code: "ABC".to_string(),
            choice_index: 2,
        };
        assert_eq!(
            serde_json::to_value(&answer).unwrap(),
            json!({"code": "ABC", "choiceIndex": 2})
        );

        let join = ClientRequest::JoinRoom {
            code: "ABC".to_string(),
            name: "Ana".to_string(),
            avatar: None,
        };
        assert_eq!(serde_json::to_value(&join).unwrap(), json!({"code": "ABC", "name": "Ana"}));
    }

    #[test]
    fn test_ack_from_args() {
        assert!(Ack::from_args(&[json!({"ok": true})]).ok);
        assert!(!Ack::from_args(&[]).ok);
        assert!(!Ack::from_args(&[json!("nope")]).ok);
        assert_eq!(
            Ack::from_args(&[json!({"ok": true, "correct": false})]).correct,
            Some(false)
        );
    }
}
