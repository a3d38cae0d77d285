use std::collections::BTreeSet;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

use crate::{
    bye::forwarding_path, order::resolve_order, state::TeamOrder, topology::BracketTopology,
    ContractError,
};

#[cw_serde]
pub struct PlannedParticipant {
    pub match_id: Uint128,
    pub team_id: Uint128,
    pub order: TeamOrder,
}

/// Every participant insertion caused by `concluded_id` finishing.
///
/// Winner path first, then loser path. A destination that is a bye is never
/// played, so its occupant is forwarded right away along the bye chain.
pub fn plan_advancement(
    topology: &BracketTopology,
    concluded_id: u128,
    winner_team: Uint128,
    loser_team: Uint128,
) -> Result<Vec<PlannedParticipant>, ContractError> {
    let concluded = &topology.node(concluded_id)?.record;
    let mut planned = vec![];

    if let Some(destination) = concluded.winner_destination {
        plan_path(
            topology,
            concluded_id,
            destination.u128(),
            winner_team,
            &mut planned,
        )?;
    }

    if let Some(destination) = concluded.loser_destination {
        plan_path(
            topology,
            concluded_id,
            destination.u128(),
            loser_team,
            &mut planned,
        )?;
    }

    ensure_slots_free(topology, &planned)?;

    Ok(planned)
}

fn plan_path(
    topology: &BracketTopology,
    source: u128,
    destination: u128,
    team_id: Uint128,
    planned: &mut Vec<PlannedParticipant>,
) -> Result<(), ContractError> {
    planned.push(PlannedParticipant {
        match_id: Uint128::new(destination),
        team_id,
        order: resolve_order(topology, source, destination)?,
    });

    let mut previous = destination;
    for hop in forwarding_path(topology, destination) {
        planned.push(PlannedParticipant {
            match_id: Uint128::new(hop),
            team_id,
            order: resolve_order(topology, previous, hop)?,
        });
        previous = hop;
    }

    Ok(())
}

fn ensure_slots_free(
    topology: &BracketTopology,
    planned: &[PlannedParticipant],
) -> Result<(), ContractError> {
    let mut claimed = BTreeSet::new();

    for participant in planned {
        let node = topology.node(participant.match_id.u128())?;

        if node.participant(participant.order).is_some()
            || !claimed.insert((participant.match_id, participant.order))
        {
            return Err(ContractError::consistency(format!(
                "{:?} slot of match {} is already taken",
                participant.order, participant.match_id
            )));
        }
    }

    Ok(())
}
