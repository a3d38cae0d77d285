use cosmwasm_schema::cw_serde;

use crate::state::TeamOrder;

#[cw_serde]
#[derive(Copy, Eq)]
pub enum MatchStatus {
    NotStarted,
    InProgress,
    Concluded,
}

/// Stage wins per slot.
#[cw_serde]
#[derive(Copy, Default, Eq)]
pub struct Score {
    pub upper: u32,
    pub lower: u32,
}

impl Score {
    pub fn wins(&self, order: TeamOrder) -> u32 {
        match order {
            TeamOrder::Upper => self.upper,
            TeamOrder::Lower => self.lower,
        }
    }

    pub fn record(&mut self, winner: TeamOrder) {
        match winner {
            TeamOrder::Upper => self.upper += 1,
            TeamOrder::Lower => self.lower += 1,
        }
    }

    pub fn played(&self) -> u32 {
        self.upper + self.lower
    }
}

impl From<Score> for [u32; 2] {
    fn from(score: Score) -> Self {
        [score.upper, score.lower]
    }
}

impl FromIterator<TeamOrder> for Score {
    fn from_iter<I: IntoIterator<Item = TeamOrder>>(iter: I) -> Self {
        let mut score = Score::default();
        for winner in iter {
            score.record(winner);
        }
        score
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub score: Score,
    pub winner: Option<TeamOrder>,
}

impl Completion {
    pub fn is_concluded(&self) -> bool {
        self.winner.is_some()
    }

    pub fn status(&self) -> MatchStatus {
        if self.is_concluded() {
            MatchStatus::Concluded
        } else if self.score.played() == 0 {
            MatchStatus::NotStarted
        } else {
            MatchStatus::InProgress
        }
    }
}

/// Stage wins needed to take a best-of-`stage_count` match.
pub fn required_wins(stage_count: u32) -> u32 {
    (stage_count + 1) / 2
}

/// Scores a match from its stage winners, in play order.
pub fn evaluate(results: impl IntoIterator<Item = TeamOrder>, stage_count: u32) -> Completion {
    let score: Score = results.into_iter().collect();
    let required = required_wins(stage_count);

    let winner = [TeamOrder::Upper, TeamOrder::Lower]
        .into_iter()
        .find(|order| score.wins(*order) >= required);

    Completion { score, winner }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TeamOrder::{Lower, Upper};

    #[test]
    fn best_of_five_needs_three() {
        let completion = evaluate([Upper, Upper, Lower, Lower], 5);
        assert!(!completion.is_concluded());
        assert_eq!(completion.status(), MatchStatus::InProgress);
        assert_eq!(<[u32; 2]>::from(completion.score), [2, 2]);

        let completion = evaluate([Upper, Upper, Lower, Lower, Lower], 5);
        assert_eq!(completion.winner, Some(Lower));
        assert_eq!(completion.status(), MatchStatus::Concluded);
    }

    #[test]
    fn concludes_before_all_stages_are_played() {
        let completion = evaluate([Lower, Lower], 3);
        assert_eq!(completion.winner, Some(Lower));
        assert_eq!(completion.score, Score { upper: 0, lower: 2 });
    }

    #[test]
    fn single_stage_concludes_after_one_result() {
        assert_eq!(evaluate([], 1).status(), MatchStatus::NotStarted);
        assert_eq!(evaluate([Upper], 1).winner, Some(Upper));
    }

    #[test]
    fn required_wins_rounds_up() {
        assert_eq!(required_wins(1), 1);
        assert_eq!(required_wins(3), 2);
        assert_eq!(required_wins(4), 2);
        assert_eq!(required_wins(7), 4);
    }
}
