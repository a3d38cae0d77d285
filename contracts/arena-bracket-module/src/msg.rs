use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;
use cw_ownable::{cw_ownable_execute, cw_ownable_query};

use crate::{
    completion::MatchStatus,
    state::{Side, Stage, TeamOrder},
};

#[cw_serde]
pub struct InstantiateMsg {
    /// Bracket organizer, defaults to the instantiator
    pub owner: Option<String>,
}

#[cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    CreateBracket {
        bracket: BracketMsg,
    },
    ReportStageResult {
        match_id: Uint128,
        winner_team_id: Uint128,
        /// 1-based
        stage_position: u32,
        player_ids: Vec<String>,
    },
    UndoLastStageResult {
        match_id: Uint128,
        /// Only undo if this is still the latest recorded stage
        stage_position: Option<u32>,
    },
}

#[cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(BracketResponse)]
    Bracket { bracket_id: Uint128 },
    #[returns(MatchResponse)]
    Match { match_id: Uint128 },
    #[returns(Vec<crate::state::StageResult>)]
    Results { match_id: Uint128 },
    #[returns(crate::state::Team)]
    Team { team_id: Uint128 },
}

#[cw_serde]
pub enum MigrateMsg {
    FromCompatible {},
}

/// A fully wired bracket. Matches reference each other and teams by their
/// position-independent keys and indices within this message.
#[cw_serde]
pub struct BracketMsg {
    pub name: String,
    pub teams: Vec<TeamMsg>,
    pub rounds: Vec<RoundMsg>,
    pub matches: Vec<MatchMsg>,
}

#[cw_serde]
pub struct TeamMsg {
    pub name: String,
    pub members: Vec<String>,
}

#[cw_serde]
pub struct RoundMsg {
    /// Positive for the winners side, negative for the losers side
    pub position: i32,
    /// Stage names in play order
    pub stages: Vec<String>,
}

#[cw_serde]
pub struct MatchMsg {
    pub key: u32,
    pub round_position: i32,
    pub number: u32,
    pub is_bye: bool,
    pub winner_destination: Option<u32>,
    pub loser_destination: Option<u32>,
    pub participants: Vec<ParticipantMsg>,
}

#[cw_serde]
pub struct ParticipantMsg {
    /// Index into `BracketMsg::teams`
    pub team: u32,
    pub order: TeamOrder,
}

/// Ids assigned on import, in message order.
#[cw_serde]
pub struct CreateBracketResponse {
    pub bracket_id: Uint128,
    pub team_ids: Vec<Uint128>,
    pub match_ids: Vec<Uint128>,
}

#[cw_serde]
pub struct DeltaEvent {
    pub match_id: Uint128,
    pub match_number: u32,
    /// `[upper, lower]`
    pub participants: Option<[Option<String>; 2]>,
    pub score: Option<[u32; 2]>,
}

/// Changes to forward to everyone watching the bracket.
#[cw_serde]
pub struct BracketDelta {
    pub bracket_id: Uint128,
    pub events: Vec<DeltaEvent>,
}

#[cw_serde]
pub struct BracketResponse {
    pub id: Uint128,
    pub name: String,
    pub rounds: Vec<RoundResponse>,
}

#[cw_serde]
pub struct RoundResponse {
    pub position: i32,
    pub side: Side,
    pub name: String,
    pub stages: Vec<Stage>,
    pub matches: Vec<MatchResponse>,
}

#[cw_serde]
pub struct MatchResponse {
    pub id: Uint128,
    pub bracket_id: Uint128,
    pub round_position: i32,
    pub number: u32,
    pub is_bye: bool,
    pub status: MatchStatus,
    /// Present once both participants are seated
    pub score: Option<[u32; 2]>,
    pub participants: Option<[Option<String>; 2]>,
    pub team_ids: [Option<Uint128>; 2],
    pub winner_destination: Option<Uint128>,
    pub loser_destination: Option<Uint128>,
    /// Winners side match numbers whose losers drop into this match
    pub participant_source_matches: Option<Vec<u32>>,
}
