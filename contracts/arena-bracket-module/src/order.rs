use itertools::Itertools;

use crate::{state::TeamOrder, topology::BracketTopology, ContractError};

/// Slot taken in `new_match_id` by the participant coming out of `old_match_id`.
///
/// The two feeding matches are ranked winners side first, then by match number.
/// A losers side bye is numbered 0 and would otherwise outrank the winners
/// side match dropping into the same losers match.
pub fn resolve_order(
    topology: &BracketTopology,
    old_match_id: u128,
    new_match_id: u128,
) -> Result<TeamOrder, ContractError> {
    topology.node(new_match_id)?;

    let sources = topology
        .sources(new_match_id)
        .into_iter()
        .sorted_by_key(|m| (m.side, m.number, m.id))
        .collect_vec();

    if sources.len() != 2 {
        return Err(ContractError::consistency(format!(
            "match {} is fed by {} matches instead of 2",
            new_match_id,
            sources.len()
        )));
    }

    match sources.iter().position(|m| m.id.u128() == old_match_id) {
        Some(0) => Ok(TeamOrder::Upper),
        Some(_) => Ok(TeamOrder::Lower),
        None => Err(ContractError::consistency(format!(
            "match {} does not lead to match {}",
            old_match_id, new_match_id
        ))),
    }
}
