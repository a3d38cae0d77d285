use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Index, IndexList, IndexedMap, Item, Map, MultiIndex};

/// Which half of a double elimination bracket a round belongs to.
///
/// Winners sorts before Losers.
#[cw_serde]
#[derive(Copy, Eq, PartialOrd, Ord)]
pub enum Side {
    Winners,
    Losers,
}

impl Side {
    /// Positive round positions are the winners side, negative ones the losers side.
    pub fn from_position(position: i32) -> Self {
        if position > 0 {
            Side::Winners
        } else {
            Side::Losers
        }
    }
}

/// The slot a participant occupies in a match.
#[cw_serde]
#[derive(Copy, Eq, Hash, PartialOrd, Ord)]
pub enum TeamOrder {
    Upper,
    Lower,
}

impl TeamOrder {
    pub fn key(&self) -> u8 {
        match self {
            TeamOrder::Upper => 0,
            TeamOrder::Lower => 1,
        }
    }
}

#[cw_serde]
pub struct Stage {
    /// 1-based
    pub position: u32,
    pub name: String,
}

#[cw_serde]
pub struct Round {
    pub position: i32,
    pub side: Side,
    pub stages: Vec<Stage>,
}

#[cw_serde]
pub struct Bracket {
    pub id: Uint128,
    pub name: String,
    pub rounds: Vec<Round>,
}

impl Bracket {
    pub fn round(&self, position: i32) -> Option<&Round> {
        self.rounds.iter().find(|round| round.position == position)
    }
}

#[cw_serde]
pub struct Team {
    pub id: Uint128,
    pub name: String,
    pub members: Vec<Addr>,
}

#[cw_serde]
pub struct Match {
    pub id: Uint128,
    pub bracket_id: Uint128,
    pub round_position: i32,
    pub side: Side,
    /// Display position within the round
    pub number: u32,
    /// Placeholder that is never played and only forwards its single occupant
    pub is_bye: bool,
    pub winner_destination: Option<Uint128>, // Next match for the winner
    pub loser_destination: Option<Uint128>,  // Next match for the loser (double elimination)
}

#[cw_serde]
pub struct Participant {
    pub team_id: Uint128,
    pub order: TeamOrder,
}

#[cw_serde]
pub struct StageResult {
    pub position: u32,
    pub winner: TeamOrder,
    /// Name of the stage this result was played on
    pub stage: String,
    pub reported_by: Addr,
    pub player_ids: Vec<String>,
}

pub struct MatchIndexes<'a> {
    pub bracket: MultiIndex<'a, u128, Match, u128>,
}

impl<'a> IndexList<Match> for MatchIndexes<'a> {
    fn get_indexes(&'_ self) -> Box<dyn Iterator<Item = &'_ dyn Index<Match>> + '_> {
        let v: Vec<&dyn Index<Match>> = vec![&self.bracket];
        Box::new(v.into_iter())
    }
}

/// Matches are stored by their global id and indexed by bracket
pub fn matches<'a>() -> IndexedMap<'a, u128, Match, MatchIndexes<'a>> {
    let indexes = MatchIndexes {
        bracket: MultiIndex::new(
            |_x, d: &Match| d.bracket_id.u128(),
            "matches",
            "matches__bracket",
        ),
    };

    IndexedMap::new("matches", indexes)
}

pub const BRACKET_COUNT: Item<Uint128> = Item::new("bracket_count");
pub const MATCH_COUNT: Item<Uint128> = Item::new("match_count");
pub const TEAM_COUNT: Item<Uint128> = Item::new("team_count");

pub const BRACKETS: Map<u128, Bracket> = Map::new("brackets");
pub const TEAMS: Map<u128, Team> = Map::new("teams");
/// (Match Id, TeamOrder key)
pub const PARTICIPANTS: Map<(u128, u8), Participant> = Map::new("participants");
/// (Match Id, Stage Position)
pub const RESULTS: Map<(u128, u32), StageResult> = Map::new("results");
