use cosmwasm_std::{ensure, Addr, Uint128};

use crate::{
    advancement::{plan_advancement, PlannedParticipant},
    completion::evaluate,
    msg::{BracketDelta, DeltaEvent},
    permissions::ScorePermission,
    repository::{pairing, BracketRepository, MatchState},
    state::{StageResult, TeamOrder},
    topology::BracketTopology,
    ContractError,
};

pub struct StageReport {
    pub match_id: u128,
    pub reporter: Addr,
    pub winner_team_id: Uint128,
    pub stage_position: u32,
    pub player_ids: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub enum ReportOutcome {
    /// The stage was already recorded, nothing changed
    Duplicate { bracket_id: Uint128 },
    Recorded(BracketDelta),
    /// The result decided the match and its participants advanced
    Concluded(BracketDelta),
}

#[derive(Debug, PartialEq)]
pub enum UndoOutcome {
    AlreadyUndone { bracket_id: Uint128 },
    Removed(BracketDelta),
}

pub fn report_stage_result(
    repo: &mut impl BracketRepository,
    permission: &impl ScorePermission,
    report: StageReport,
) -> Result<ReportOutcome, ContractError> {
    let state = repo.load_match(report.match_id)?;
    let match_id = state.record.id;
    let bracket_id = state.record.bracket_id;
    let position = report.stage_position;

    ensure!(
        permission.can_report_score(&report.reporter, &state.members()),
        ContractError::Forbidden {}
    );
    ensure!(position > 0, ContractError::InvalidStagePosition { position });

    let recorded = state.results.len() as u32;
    if position <= recorded {
        return Ok(ReportOutcome::Duplicate { bracket_id });
    }

    ensure!(
        !state.completion().is_concluded(),
        ContractError::MatchAlreadyConcluded { match_id }
    );
    ensure!(
        position == recorded + 1 && position <= state.stage_count(),
        ContractError::InvalidStagePosition { position }
    );
    ensure!(!state.record.is_bye, ContractError::ByeMatch { match_id });

    let (upper, lower) = match (
        state.participant(TeamOrder::Upper),
        state.participant(TeamOrder::Lower),
    ) {
        (Some(upper), Some(lower)) => (upper.id, lower.id),
        _ => return Err(ContractError::MatchNotReady { match_id }),
    };
    let winner = if report.winner_team_id == upper {
        TeamOrder::Upper
    } else if report.winner_team_id == lower {
        TeamOrder::Lower
    } else {
        return Err(ContractError::InvalidWinner {
            team_id: report.winner_team_id,
        });
    };

    let stage = state.stage(position).ok_or_else(|| {
        ContractError::consistency(format!(
            "round {} has no stage {}",
            state.record.round_position, position
        ))
    })?;

    let completion = evaluate(
        state
            .results
            .iter()
            .map(|result| result.winner)
            .chain([winner]),
        state.stage_count(),
    );

    repo.append_result(
        match_id.u128(),
        StageResult {
            position,
            winner,
            stage: stage.name.clone(),
            reported_by: report.reporter,
            player_ids: report.player_ids,
        },
    )?;

    let mut events = vec![DeltaEvent {
        match_id,
        match_number: state.record.number,
        participants: state.participant_names(),
        score: Some(completion.score.into()),
    }];

    let Some(winner) = completion.winner else {
        return Ok(ReportOutcome::Recorded(BracketDelta { bracket_id, events }));
    };

    let (winner_team, loser_team) = match winner {
        TeamOrder::Upper => (upper, lower),
        TeamOrder::Lower => (lower, upper),
    };

    let topology = repo.load_topology(bracket_id.u128())?;
    let planned = plan_advancement(&topology, match_id.u128(), winner_team, loser_team)?;
    repo.insert_participants(&planned)?;

    events.extend(insertion_events(&*repo, &topology, &planned)?);

    Ok(ReportOutcome::Concluded(BracketDelta { bracket_id, events }))
}

/// Pairing of every match that gained a participant, as it stands once the
/// whole plan is applied.
fn insertion_events(
    repo: &impl BracketRepository,
    topology: &BracketTopology,
    planned: &[PlannedParticipant],
) -> Result<Vec<DeltaEvent>, ContractError> {
    let mut events: Vec<DeltaEvent> = vec![];

    for insertion in planned {
        if events.iter().any(|event| event.match_id == insertion.match_id) {
            continue;
        }

        let node = topology.node(insertion.match_id.u128())?;
        let seated = |order: TeamOrder| {
            planned
                .iter()
                .find(|p| p.match_id == insertion.match_id && p.order == order)
                .map(|p| p.team_id)
                .or_else(|| node.participant(order).map(|p| p.team_id))
        };
        let team_ids = [seated(TeamOrder::Upper), seated(TeamOrder::Lower)];

        let mut names = [None, None];
        for (name, team_id) in names.iter_mut().zip(team_ids) {
            if let Some(team_id) = team_id {
                *name = Some(repo.load_team(team_id.u128())?.name);
            }
        }
        let [upper, lower] = names;

        events.push(DeltaEvent {
            match_id: insertion.match_id,
            match_number: node.record.number,
            participants: pairing(|order| match order {
                TeamOrder::Upper => upper.clone(),
                TeamOrder::Lower => lower.clone(),
            }),
            score: team_ids.iter().all(Option::is_some).then_some([0, 0]),
        });
    }

    Ok(events)
}

pub fn undo_last_stage_result(
    repo: &mut impl BracketRepository,
    permission: &impl ScorePermission,
    match_id: u128,
    requester: &Addr,
    stage_position: Option<u32>,
) -> Result<UndoOutcome, ContractError> {
    let state = repo.load_match(match_id)?;
    let bracket_id = state.record.bracket_id;

    ensure!(
        permission.can_report_score(requester, &state.members()),
        ContractError::Forbidden {}
    );
    ensure!(
        !state.completion().is_concluded(),
        ContractError::MatchAlreadyConcluded {
            match_id: state.record.id
        }
    );

    let Some(last) = state.results.last() else {
        return Ok(UndoOutcome::AlreadyUndone { bracket_id });
    };
    if stage_position.map_or(false, |position| position != last.position) {
        return Ok(UndoOutcome::AlreadyUndone { bracket_id });
    }

    repo.delete_result(match_id, last.position)?;

    Ok(UndoOutcome::Removed(BracketDelta {
        bracket_id,
        events: vec![remaining_score(&state)],
    }))
}

fn remaining_score(state: &MatchState) -> DeltaEvent {
    let kept = state.results.len().saturating_sub(1);
    let completion = evaluate(
        state.results[..kept].iter().map(|result| result.winner),
        state.stage_count(),
    );

    DeltaEvent {
        match_id: state.record.id,
        match_number: state.record.number,
        participants: state.participant_names(),
        score: Some(completion.score.into()),
    }
}
