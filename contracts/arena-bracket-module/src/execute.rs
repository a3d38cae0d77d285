use std::collections::BTreeMap;

use cosmwasm_std::{
    to_json_binary, to_json_string, DepsMut, Event, MessageInfo, Response, StdResult, Uint128,
};
use itertools::Itertools;

use crate::{
    msg::{BracketDelta, BracketMsg, CreateBracketResponse},
    permissions::OrganizerOrTeamMember,
    repository::transactional,
    service::{self, ReportOutcome, StageReport, UndoOutcome},
    state::{
        matches, Bracket, Match, Participant, Round, Side, Stage, Team, BRACKETS, BRACKET_COUNT,
        MATCH_COUNT, PARTICIPANTS, TEAMS, TEAM_COUNT,
    },
    ContractError,
};

pub fn create_bracket(
    deps: DepsMut,
    info: MessageInfo,
    msg: BracketMsg,
) -> Result<Response, ContractError> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;
    validate_bracket(&msg)?;

    let bracket_id = BRACKET_COUNT.load(deps.storage)?.u128() + 1;
    let team_offset = TEAM_COUNT.load(deps.storage)?.u128();
    let match_offset = MATCH_COUNT.load(deps.storage)?.u128();

    // Teams
    let mut team_ids = vec![];
    for (i, team) in msg.teams.iter().enumerate() {
        let id = Uint128::new(team_offset + i as u128 + 1);
        let members = team
            .members
            .iter()
            .map(|member| deps.api.addr_validate(member))
            .collect::<StdResult<Vec<_>>>()?;

        TEAMS.save(
            deps.storage,
            id.u128(),
            &Team {
                id,
                name: team.name.clone(),
                members,
            },
        )?;
        team_ids.push(id);
    }

    // Rounds
    let rounds = msg
        .rounds
        .iter()
        .map(|round| Round {
            position: round.position,
            side: Side::from_position(round.position),
            stages: round
                .stages
                .iter()
                .enumerate()
                .map(|(i, name)| Stage {
                    position: i as u32 + 1,
                    name: name.clone(),
                })
                .collect(),
        })
        .collect();
    BRACKETS.save(
        deps.storage,
        bracket_id,
        &Bracket {
            id: Uint128::new(bracket_id),
            name: msg.name.clone(),
            rounds,
        },
    )?;

    // Matches
    let ids: BTreeMap<u32, Uint128> = msg
        .matches
        .iter()
        .enumerate()
        .map(|(i, m)| (m.key, Uint128::new(match_offset + i as u128 + 1)))
        .collect();
    let lookup = |key: u32| {
        ids.get(&key)
            .copied()
            .ok_or_else(|| ContractError::invalid_bracket(format!("unknown match key {}", key)))
    };

    let mut match_ids = vec![];
    for m in &msg.matches {
        let id = lookup(m.key)?;

        matches().save(
            deps.storage,
            id.u128(),
            &Match {
                id,
                bracket_id: Uint128::new(bracket_id),
                round_position: m.round_position,
                side: Side::from_position(m.round_position),
                number: m.number,
                is_bye: m.is_bye,
                winner_destination: m.winner_destination.map(lookup).transpose()?,
                loser_destination: m.loser_destination.map(lookup).transpose()?,
            },
        )?;

        for participant in &m.participants {
            let team_id = team_ids
                .get(participant.team as usize)
                .copied()
                .ok_or_else(|| {
                    ContractError::invalid_bracket(format!("unknown team {}", participant.team))
                })?;

            PARTICIPANTS.save(
                deps.storage,
                (id.u128(), participant.order.key()),
                &Participant {
                    team_id,
                    order: participant.order,
                },
            )?;
        }
        match_ids.push(id);
    }

    BRACKET_COUNT.save(deps.storage, &Uint128::new(bracket_id))?;
    TEAM_COUNT.save(
        deps.storage,
        &Uint128::new(team_offset + msg.teams.len() as u128),
    )?;
    MATCH_COUNT.save(
        deps.storage,
        &Uint128::new(match_offset + msg.matches.len() as u128),
    )?;

    Ok(Response::new()
        .add_attribute("action", "create_bracket")
        .add_attribute("bracket_id", bracket_id.to_string())
        .add_attribute("teams", team_ids.len().to_string())
        .add_attribute("matches", match_ids.len().to_string())
        .set_data(to_json_binary(&CreateBracketResponse {
            bracket_id: Uint128::new(bracket_id),
            team_ids,
            match_ids,
        })?))
}

fn validate_bracket(msg: &BracketMsg) -> Result<(), ContractError> {
    if msg.rounds.is_empty() {
        return Err(ContractError::invalid_bracket("a bracket needs at least one round"));
    }
    if let Some(round) = msg.rounds.iter().find(|round| round.position == 0) {
        return Err(ContractError::invalid_bracket(format!(
            "round position {} is neither winners nor losers side",
            round.position
        )));
    }
    if let Some(position) = msg.rounds.iter().map(|round| round.position).duplicates().next() {
        return Err(ContractError::invalid_bracket(format!(
            "round position {} is used twice",
            position
        )));
    }
    if let Some(round) = msg.rounds.iter().find(|round| round.stages.is_empty()) {
        return Err(ContractError::invalid_bracket(format!(
            "round {} has no stages",
            round.position
        )));
    }

    if msg.teams.iter().any(|team| team.name.trim().is_empty()) {
        return Err(ContractError::invalid_bracket("team names cannot be empty"));
    }
    if let Some(name) = msg.teams.iter().map(|team| &team.name).duplicates().next() {
        return Err(ContractError::invalid_bracket(format!(
            "team {} is listed twice",
            name
        )));
    }

    if let Some(key) = msg.matches.iter().map(|m| m.key).duplicates().next() {
        return Err(ContractError::invalid_bracket(format!(
            "match key {} is used twice",
            key
        )));
    }
    if let Some((round_position, number)) = msg
        .matches
        .iter()
        .filter(|m| !m.is_bye)
        .map(|m| (m.round_position, m.number))
        .duplicates()
        .next()
    {
        return Err(ContractError::invalid_bracket(format!(
            "round {} has two matches numbered {}",
            round_position, number
        )));
    }

    for m in &msg.matches {
        if !msg.rounds.iter().any(|round| round.position == m.round_position) {
            return Err(ContractError::invalid_bracket(format!(
                "match {} belongs to unknown round {}",
                m.key, m.round_position
            )));
        }
        if !m.is_bye && m.number == 0 {
            return Err(ContractError::invalid_bracket(format!(
                "match {} is numbered 0 but is not a bye",
                m.key
            )));
        }

        for destination in [m.winner_destination, m.loser_destination]
            .into_iter()
            .flatten()
        {
            if destination == m.key || !msg.matches.iter().any(|other| other.key == destination)
            {
                return Err(ContractError::invalid_bracket(format!(
                    "match {} leads to invalid match {}",
                    m.key, destination
                )));
            }
        }

        // Byes only ever hold a participant forwarded into them
        let limit = if m.is_bye { 0 } else { 2 };
        if m.participants.len() > limit {
            return Err(ContractError::invalid_bracket(format!(
                "match {} seats {} participants",
                m.key,
                m.participants.len()
            )));
        }
        if !m.participants.iter().map(|p| p.order).all_unique()
            || !m.participants.iter().map(|p| p.team).all_unique()
        {
            return Err(ContractError::invalid_bracket(format!(
                "match {} seats the same slot or team twice",
                m.key
            )));
        }
        if let Some(p) = m
            .participants
            .iter()
            .find(|p| p.team as usize >= msg.teams.len())
        {
            return Err(ContractError::invalid_bracket(format!(
                "match {} seats unknown team {}",
                m.key, p.team
            )));
        }
    }

    Ok(())
}

/// Attaches the delta as response data and as one event per affected match.
fn with_delta(response: Response, delta: BracketDelta) -> StdResult<Response> {
    let events = delta
        .events
        .iter()
        .map(|event| {
            let mut wasm_event = Event::new("bracket_delta")
                .add_attribute("bracket_id", delta.bracket_id.to_string())
                .add_attribute("match_id", event.match_id.to_string())
                .add_attribute("match_number", event.match_number.to_string());

            if let Some([upper, lower]) = event.score {
                wasm_event = wasm_event.add_attribute("score", format!("{}-{}", upper, lower));
            }
            if let Some(participants) = &event.participants {
                wasm_event =
                    wasm_event.add_attribute("participants", to_json_string(participants)?);
            }

            Ok(wasm_event)
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(response
        .add_attribute("bracket_id", delta.bracket_id.to_string())
        .add_events(events)
        .set_data(to_json_binary(&delta)?))
}

pub fn report_stage_result(
    deps: DepsMut,
    info: MessageInfo,
    match_id: Uint128,
    winner_team_id: Uint128,
    stage_position: u32,
    player_ids: Vec<String>,
) -> Result<Response, ContractError> {
    let permission = OrganizerOrTeamMember::load(deps.storage)?;

    let outcome = transactional(deps.storage, |repo| {
        service::report_stage_result(
            repo,
            &permission,
            StageReport {
                match_id: match_id.u128(),
                reporter: info.sender.clone(),
                winner_team_id,
                stage_position,
                player_ids,
            },
        )
    })?;

    let (outcome, delta) = match outcome {
        ReportOutcome::Duplicate { bracket_id } => (
            "duplicate",
            BracketDelta {
                bracket_id,
                events: vec![],
            },
        ),
        ReportOutcome::Recorded(delta) => ("recorded", delta),
        ReportOutcome::Concluded(delta) => ("concluded", delta),
    };

    Ok(with_delta(
        Response::new()
            .add_attribute("action", "report_stage_result")
            .add_attribute("match_id", match_id.to_string())
            .add_attribute("stage_position", stage_position.to_string())
            .add_attribute("outcome", outcome),
        delta,
    )?)
}

pub fn undo_last_stage_result(
    deps: DepsMut,
    info: MessageInfo,
    match_id: Uint128,
    stage_position: Option<u32>,
) -> Result<Response, ContractError> {
    let permission = OrganizerOrTeamMember::load(deps.storage)?;

    let outcome = transactional(deps.storage, |repo| {
        service::undo_last_stage_result(
            repo,
            &permission,
            match_id.u128(),
            &info.sender,
            stage_position,
        )
    })?;

    let (outcome, delta) = match outcome {
        UndoOutcome::AlreadyUndone { bracket_id } => (
            "already_undone",
            BracketDelta {
                bracket_id,
                events: vec![],
            },
        ),
        UndoOutcome::Removed(delta) => ("removed", delta),
    };

    Ok(with_delta(
        Response::new()
            .add_attribute("action", "undo_last_stage_result")
            .add_attribute("match_id", match_id.to_string())
            .add_attribute("outcome", outcome),
        delta,
    )?)
}
