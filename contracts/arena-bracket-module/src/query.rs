use std::{cmp::Reverse, collections::BTreeMap};

use cosmwasm_std::{Deps, StdError, StdResult, Storage, Uint128};
use itertools::Itertools;

use crate::{
    bye::resolve_bye,
    completion::evaluate,
    msg::{BracketResponse, MatchResponse, RoundResponse},
    repository::{pairing, read_match, read_results, read_team, read_topology},
    state::{Round, Side, StageResult, Team, TeamOrder},
    topology::{BracketTopology, MatchNode},
    ContractError,
};

fn into_std(err: ContractError) -> StdError {
    match err {
        ContractError::StdError(err) => err,
        err => StdError::generic_err(err.to_string()),
    }
}

pub fn winners_round_names(count: usize, single_elimination: bool) -> Vec<String> {
    let end = count + usize::from(single_elimination);

    (0..count)
        .map(|i| {
            if i + 4 == end {
                "Winners' Semifinals".to_string()
            } else if i + 3 == end {
                "Winners' Finals".to_string()
            } else if i + 2 == end {
                "Grand Finals".to_string()
            } else if !single_elimination && i + 1 == count {
                "Bracket Reset".to_string()
            } else {
                format!("Winners' Round {}", i + 1)
            }
        })
        .collect()
}

pub fn losers_round_names(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            if i + 1 == count {
                "Losers' Finals".to_string()
            } else {
                format!("Losers' Round {}", i + 1)
            }
        })
        .collect()
}

/// Winners side match numbers feeding each losers side match through their
/// loser edge. A losers side bye is looked through to the match it forwards to.
fn loser_source_matches(topology: &BracketTopology) -> BTreeMap<u128, Vec<u32>> {
    topology
        .matches
        .values()
        .map(|node| &node.record)
        .filter(|m| m.side == Side::Winners && !m.is_bye)
        .filter_map(|m| {
            let destination = m.loser_destination?.u128();
            let target = match topology.matches.get(&destination) {
                Some(node) if node.record.is_bye => {
                    resolve_bye(topology, destination).unwrap_or(destination)
                }
                _ => destination,
            };
            Some((target, m.number))
        })
        .into_group_map()
        .into_iter()
        .map(|(target, numbers)| (target, numbers.into_iter().sorted().collect()))
        .collect()
}

fn match_view(
    storage: &dyn Storage,
    topology: &BracketTopology,
    node: &MatchNode,
    sources: &BTreeMap<u128, Vec<u32>>,
) -> Result<MatchResponse, ContractError> {
    let record = &node.record;
    let results = read_results(storage, record.id.u128())?;
    let completion = evaluate(
        results.iter().map(|result| result.winner),
        topology.stage_count(record.round_position)?,
    );

    let team_ids = [TeamOrder::Upper, TeamOrder::Lower]
        .map(|order| node.participant(order).map(|participant| participant.team_id));
    let mut names = [None, None];
    for (name, team_id) in names.iter_mut().zip(team_ids) {
        if let Some(team_id) = team_id {
            *name = Some(read_team(storage, team_id.u128())?.name);
        }
    }
    let [upper, lower] = names;

    Ok(MatchResponse {
        id: record.id,
        bracket_id: record.bracket_id,
        round_position: record.round_position,
        number: record.number,
        is_bye: record.is_bye,
        status: completion.status(),
        score: (node.participants.len() == 2).then(|| completion.score.into()),
        participants: pairing(|order| match order {
            TeamOrder::Upper => upper.clone(),
            TeamOrder::Lower => lower.clone(),
        }),
        team_ids,
        winner_destination: record.winner_destination,
        loser_destination: record.loser_destination,
        participant_source_matches: match record.side {
            Side::Losers => sources.get(&record.id.u128()).cloned(),
            Side::Winners => None,
        },
    })
}

fn round_view(
    storage: &dyn Storage,
    topology: &BracketTopology,
    round: &Round,
    name: String,
    sources: &BTreeMap<u128, Vec<u32>>,
) -> Result<RoundResponse, ContractError> {
    let matches = topology
        .matches
        .values()
        .filter(|node| node.record.round_position == round.position)
        .sorted_by_key(|node| (node.record.number, node.record.id))
        .map(|node| match_view(storage, topology, node, sources))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RoundResponse {
        position: round.position,
        side: round.side,
        name,
        stages: round.stages.clone(),
        matches,
    })
}

fn bracket_view(
    storage: &dyn Storage,
    topology: &BracketTopology,
) -> Result<BracketResponse, ContractError> {
    let sources = loser_source_matches(topology);

    let (winners, losers): (Vec<&Round>, Vec<&Round>) = topology
        .bracket
        .rounds
        .iter()
        .partition(|round| round.side == Side::Winners);
    let winners = winners
        .into_iter()
        .sorted_by_key(|round| round.position)
        .collect_vec();
    let losers = losers
        .into_iter()
        .sorted_by_key(|round| Reverse(round.position))
        .collect_vec();

    let names = winners_round_names(winners.len(), losers.is_empty())
        .into_iter()
        .chain(losers_round_names(losers.len()));

    let rounds = winners
        .into_iter()
        .chain(losers)
        .zip(names)
        .map(|(round, name)| round_view(storage, topology, round, name, &sources))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BracketResponse {
        id: topology.bracket.id,
        name: topology.bracket.name.clone(),
        rounds,
    })
}

pub fn query_bracket(deps: Deps, bracket_id: Uint128) -> StdResult<BracketResponse> {
    let topology = read_topology(deps.storage, bracket_id.u128()).map_err(into_std)?;

    bracket_view(deps.storage, &topology).map_err(into_std)
}

pub fn query_match(deps: Deps, match_id: Uint128) -> StdResult<MatchResponse> {
    let state = read_match(deps.storage, match_id.u128()).map_err(into_std)?;
    let topology =
        read_topology(deps.storage, state.record.bracket_id.u128()).map_err(into_std)?;
    let node = topology.node(match_id.u128()).map_err(into_std)?;

    match_view(
        deps.storage,
        &topology,
        node,
        &loser_source_matches(&topology),
    )
    .map_err(into_std)
}

pub fn query_results(deps: Deps, match_id: Uint128) -> StdResult<Vec<StageResult>> {
    Ok(read_match(deps.storage, match_id.u128())
        .map_err(into_std)?
        .results)
}

pub fn query_team(deps: Deps, team_id: Uint128) -> StdResult<Team> {
    read_team(deps.storage, team_id.u128()).map_err(into_std)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::fixtures;

    #[test]
    fn double_elimination_round_names() {
        assert_eq!(
            winners_round_names(5, false),
            vec![
                "Winners' Round 1",
                "Winners' Semifinals",
                "Winners' Finals",
                "Grand Finals",
                "Bracket Reset",
            ]
        );
        assert_eq!(
            losers_round_names(3),
            vec!["Losers' Round 1", "Losers' Round 2", "Losers' Finals"]
        );
    }

    #[test]
    fn single_elimination_round_names() {
        assert_eq!(
            winners_round_names(4, true),
            vec![
                "Winners' Round 1",
                "Winners' Semifinals",
                "Winners' Finals",
                "Grand Finals",
            ]
        );
        assert_eq!(winners_round_names(1, true), vec!["Grand Finals"]);
    }

    #[test]
    fn losers_sources_look_through_byes() {
        let topology = fixtures::double_elimination();

        let sources = loser_source_matches(&topology);

        // W2 drops into the L1 bye, which forwards to L2 alongside W3's loser
        assert_eq!(sources.get(&fixtures::L2), Some(&vec![1, 2]));
        assert_eq!(sources.get(&fixtures::L1), None);
    }
}
