use std::collections::BTreeMap;

use cosmwasm_std::Uint128;

use crate::{
    state::{Bracket, Match, Participant, TeamOrder},
    ContractError,
};

#[derive(Clone, Debug, PartialEq)]
pub struct MatchNode {
    pub record: Match,
    pub participants: Vec<Participant>,
}

impl MatchNode {
    pub fn participant(&self, order: TeamOrder) -> Option<&Participant> {
        self.participants.iter().find(|p| p.order == order)
    }
}

/// Snapshot of one bracket taken at the start of an operation.
///
/// Destination edges hold match ids, every lookup goes through `matches`.
#[derive(Clone, Debug, PartialEq)]
pub struct BracketTopology {
    pub bracket: Bracket,
    pub matches: BTreeMap<u128, MatchNode>,
}

impl BracketTopology {
    pub fn new(bracket: Bracket, nodes: impl IntoIterator<Item = MatchNode>) -> Self {
        let matches = nodes
            .into_iter()
            .map(|node| (node.record.id.u128(), node))
            .collect();

        Self { bracket, matches }
    }

    pub fn node(&self, match_id: u128) -> Result<&MatchNode, ContractError> {
        self.matches.get(&match_id).ok_or_else(|| {
            ContractError::consistency(format!(
                "match {} is not part of bracket {}",
                match_id, self.bracket.id
            ))
        })
    }

    /// Matches whose winner or loser edge points at `match_id`.
    pub fn sources(&self, match_id: u128) -> Vec<&Match> {
        let target = Some(Uint128::new(match_id));

        self.matches
            .values()
            .map(|node| &node.record)
            .filter(|m| m.winner_destination == target || m.loser_destination == target)
            .collect()
    }

    pub fn stage_count(&self, round_position: i32) -> Result<u32, ContractError> {
        self.bracket
            .round(round_position)
            .map(|round| round.stages.len() as u32)
            .ok_or_else(|| {
                ContractError::consistency(format!(
                    "bracket {} has no round {}",
                    self.bracket.id, round_position
                ))
            })
    }
}
