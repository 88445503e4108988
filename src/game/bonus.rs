//! Point breakdown shown to the winner of a question.

use crate::protocol::Bonus;

pub const BASE_SCORE: i64 = 10;

/// A labelled line of the breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownRow {
    pub label: String,
    pub value: String,
}

/// Whether anything beyond the base score was earned.
pub fn has_bonus(bonus: &Bonus) -> bool {
    bonus.speed_bonus > 0 || bonus.streak_multiplier > 1 || bonus.lightning_multiplier > 1
}

/// Headline shown in large type, e.g. `+25`.
pub fn headline(bonus: &Bonus) -> String {
    format!("+{}", bonus.points_earned)
}

/// Rows of the breakdown; empty when there is no bonus.
pub fn breakdown(bonus: &Bonus) -> Vec<BreakdownRow> {
    if !has_bonus(bonus) {
        return Vec::new();
    }

    let mut rows = vec![BreakdownRow {
        label: "Base Score:".to_string(),
        value: format!("{BASE_SCORE} pts"),
    }];

    if bonus.streak_multiplier > 1 {
        let icon = if bonus.streak_multiplier >= 5 { "🔥" } else { "⚡" };
        rows.push(BreakdownRow {
            label: format!("{icon} Streak {}x:", bonus.streak_multiplier),
            value: format!("{} pts", BASE_SCORE * bonus.streak_multiplier),
        });
    }
    if bonus.speed_bonus > 0 {
        rows.push(BreakdownRow {
            label: "⚡ Speed Bonus:".to_string(),
            value: format!("+{} pts", bonus.speed_bonus),
        });
    }
    if bonus.lightning_multiplier > 1 {
        rows.push(BreakdownRow {
            label: "⚡ Lightning Round 2x:".to_string(),
            value: format!("×{}", bonus.lightning_multiplier),
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_answer_has_no_breakdown() {
        let bonus = Bonus::default();
        assert!(!has_bonus(&bonus));
        assert!(breakdown(&bonus).is_empty());
        assert_eq!(headline(&bonus), "+10");
    }

    #[test]
    fn test_full_breakdown_order() {
        let bonus = Bonus {
            points_earned: 130,
            speed_bonus: 5,
            streak_multiplier: 3,
            lightning_multiplier: 2,
        };
        let rows = breakdown(&bonus);
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Base Score:", "⚡ Streak 3x:", "⚡ Speed Bonus:", "⚡ Lightning Round 2x:"]
        );
        assert_eq!(rows[1].value, "30 pts");
        assert_eq!(rows[2].value, "+5 pts");
        assert_eq!(rows[3].value, "×2");
    }

    #[test]
    fn test_long_streak_gets_fire() {
        let bonus = Bonus {
            streak_multiplier: 5,
            ..Bonus::default()
        };
        assert_eq!(breakdown(&bonus)[1].label, "🔥 Streak 5x:");
    }
}
