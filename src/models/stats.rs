//! Derived group statistics.

use serde::{Deserialize, Serialize};

use super::TeamId;

/// Head-to-head record among a tied subset of teams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub points: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_diff: i32,
}

/// A team's stat line within its group. Recomputed on every evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    pub team_id: TeamId,

    /// Final rank in the group (1 = winner); 0 until standings are ordered
    pub position: u8,

    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,

    /// Populated only while resolving a tie among a subset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h2h: Option<HeadToHead>,
}

impl TeamStats {
    pub fn new(team_id: TeamId) -> Self {
        Self {
            team_id,
            position: 0,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
            h2h: None,
        }
    }

    /// Record one match from this team's point of view.
    pub fn record(&mut self, scored: u32, conceded: u32, win_points: u32, draw_points: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        self.goal_difference = self.goals_for as i32 - self.goals_against as i32;

        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => {
                self.won += 1;
                self.points += win_points;
            }
            std::cmp::Ordering::Equal => {
                self.drawn += 1;
                self.points += draw_points;
            }
            std::cmp::Ordering::Less => self.lost += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_win_draw_loss() {
        let mut stats = TeamStats::new(TeamId(1));
        stats.record(3, 1, 3, 1);
        stats.record(0, 0, 3, 1);
        stats.record(1, 2, 3, 1);

        assert_eq!(stats.played, 3);
        assert_eq!((stats.won, stats.drawn, stats.lost), (1, 1, 1));
        assert_eq!(stats.points, 4);
        assert_eq!(stats.goals_for, 4);
        assert_eq!(stats.goals_against, 3);
        assert_eq!(stats.goal_difference, 1);
    }

    #[test]
    fn test_negative_goal_difference() {
        let mut stats = TeamStats::new(TeamId(2));
        stats.record(0, 4, 3, 1);
        assert_eq!(stats.goal_difference, -4);
        assert_eq!(stats.points, 0);
    }

    #[test]
    fn test_h2h_omitted_when_absent() {
        let json = serde_json::to_string(&TeamStats::new(TeamId(1))).unwrap();
        assert!(!json.contains("h2h"));
    }
}
