//! Navigation between the client's screens.
//!
//! Paths mirror the links players share: `/gm`, `/play` and
//! `/play/<code>/<name>?avatar=<emoji>`.

use std::fmt;

pub const DEFAULT_PLAYER_NAME: &str = "Player";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    GameMaster,
    Join,
    Game {
        code: String,
        name: String,
        avatar: Option<String>,
    },
}

impl Route {
    /// Resolve a path; anything unknown lands on the game master screen.
    pub fn parse(path: &str) -> Self {
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["gm"] => Route::GameMaster,
            ["play"] => Route::Join,
            ["play", code, name] => Route::Game {
                code: decode(code),
                name: decode(name),
                avatar: query.and_then(avatar_param),
            },
            _ => Route::GameMaster,
        }
    }

    /// Route entered from the join form.
    pub fn game(code: &str, name: &str, avatar: Option<&str>) -> Self {
        let name = name.trim();
        Route::Game {
            code: code.trim().to_uppercase(),
            name: if name.is_empty() {
                DEFAULT_PLAYER_NAME.to_string()
            } else {
                name.to_string()
            },
            avatar: avatar.map(String::from),
        }
    }
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

fn avatar_param(query: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "avatar")
        .map(|(_, value)| decode(value))
        .filter(|value| !value.is_empty())
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::GameMaster => write!(f, "/gm"),
            Route::Join => write!(f, "/play"),
            Route::Game { code, name, avatar } => {
                write!(
                    f,
                    "/play/{}/{}",
                    urlencoding::encode(code),
                    urlencoding::encode(name)
                )?;
                if let Some(avatar) = avatar {
                    write!(f, "?avatar={}", urlencoding::encode(avatar))?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/gm"), Route::GameMaster);
        assert_eq!(Route::parse("/play"), Route::Join);
        assert_eq!(Route::parse("/play/"), Route::Join);
        assert_eq!(
            Route::parse("/play/7H6GQ2/Ana%20Lu?avatar=%F0%9F%A6%8A"),
            Route::Game {
                code: "7H6GQ2".to_string(),
                name: "Ana Lu".to_string(),
                avatar: Some("🦊".to_string()),
            }
        );
    }

    #[test]
    fn test_unknown_paths_fall_back_to_game_master() {
        assert_eq!(Route::parse("/"), Route::GameMaster);
        assert_eq!(Route::parse(""), Route::GameMaster);
        assert_eq!(Route::parse("/admin/secret"), Route::GameMaster);
        assert_eq!(Route::parse("/play/onlycode"), Route::GameMaster);
    }

    #[test]
    fn test_join_form_defaults() {
        assert_eq!(
            Route::game(" abc12 ", "  ", None),
            Route::Game {
                code: "ABC12".to_string(),
                name: DEFAULT_PLAYER_NAME.to_string(),
                avatar: None,
            }
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let route = Route::game("ROOM", "Zoë K", Some("🐱"));
        let path = route.to_string();
        assert!(path.starts_with("/play/ROOM/Zo%C3%AB%20K?avatar="));
        assert_eq!(Route::parse(&path), route);
    }
}
