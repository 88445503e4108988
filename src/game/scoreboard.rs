//! Standings shown under every view.

use crate::protocol::Player;

pub const DEFAULT_AVATAR: &str = "😀";

/// One row of the scoreboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing<'a> {
    pub name: &'a str,
    pub avatar: &'a str,
    pub score: i64,
    /// Crowned row; only set when more than one player is present.
    pub leader: bool,
}

/// Players ordered by score, highest first. Ties keep server order.
pub fn standings(players: &[Player]) -> Vec<Standing<'_>> {
    let mut sorted: Vec<&Player> = players.iter().collect();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));

    let crowned = sorted.len() > 1;
    sorted
        .into_iter()
        .enumerate()
        .map(|(idx, p)| Standing {
            name: &p.name,
            avatar: p.avatar.as_deref().unwrap_or(DEFAULT_AVATAR),
            score: p.score,
            leader: crowned && idx == 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, score: i64, avatar: Option<&str>) -> Player {
        Player {
            name: name.to_string(),
            score,
            avatar: avatar.map(String::from),
        }
    }

    #[test]
    fn test_sorted_descending_with_leader() {
        let players = vec![
            player("Ana", 10, Some("🦊")),
            player("Bo", 30, None),
            player("Cy", 20, None),
        ];
        let rows = standings(&players);
        let names: Vec<_> = rows.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Bo", "Cy", "Ana"]);
        assert!(rows[0].leader);
        assert!(!rows[1].leader);
        assert_eq!(rows[0].avatar, DEFAULT_AVATAR);
        assert_eq!(rows[2].avatar, "🦊");
    }

    #[test]
    fn test_single_player_is_not_crowned() {
        let players = vec![player("Solo", 50, None)];
        let rows = standings(&players);
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].leader);
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let players = vec![player("A", 5, None), player("B", 5, None)];
        let rows = standings(&players);
        assert_eq!(rows[0].name, "A");
        assert_eq!(rows[1].name, "B");
    }

    #[test]
    fn test_empty() {
        assert!(standings(&[]).is_empty());
    }
}
