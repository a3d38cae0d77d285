use std::collections::BTreeSet;

use cosmwasm_std::{Addr, Order, StdResult, Storage, Uint128};

use crate::{
    advancement::PlannedParticipant,
    completion::{evaluate, Completion},
    state::{
        matches, Bracket, Match, Participant, Stage, StageResult, Team, TeamOrder, BRACKETS,
        PARTICIPANTS, RESULTS, TEAMS,
    },
    topology::{BracketTopology, MatchNode},
    transaction::StorageTransaction,
    ContractError,
};

/// One match with everything needed to validate a report against it.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchState {
    pub record: Match,
    pub stages: Vec<Stage>,
    pub participants: Vec<(Participant, Team)>,
    /// Ordered by stage position
    pub results: Vec<StageResult>,
}

impl MatchState {
    pub fn stage_count(&self) -> u32 {
        self.stages.len() as u32
    }

    pub fn stage(&self, position: u32) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.position == position)
    }

    pub fn completion(&self) -> Completion {
        evaluate(
            self.results.iter().map(|result| result.winner),
            self.stage_count(),
        )
    }

    pub fn participant(&self, order: TeamOrder) -> Option<&Team> {
        self.participants
            .iter()
            .find(|(participant, _)| participant.order == order)
            .map(|(_, team)| team)
    }

    /// Members of every team currently seated in the match.
    pub fn members(&self) -> Vec<Addr> {
        self.participants
            .iter()
            .flat_map(|(_, team)| team.members.iter().cloned())
            .collect()
    }

    pub fn participant_names(&self) -> Option<[Option<String>; 2]> {
        pairing(|order| self.participant(order).map(|team| team.name.clone()))
    }
}

/// `[upper, lower]` names, or nothing when both slots are empty.
pub fn pairing(
    name_of: impl Fn(TeamOrder) -> Option<String>,
) -> Option<[Option<String>; 2]> {
    let names = [name_of(TeamOrder::Upper), name_of(TeamOrder::Lower)];

    if names.iter().all(Option::is_none) {
        None
    } else {
        Some(names)
    }
}

/// Persistence surface of the progression engine.
pub trait BracketRepository {
    fn load_match(&self, match_id: u128) -> Result<MatchState, ContractError>;

    fn load_topology(&self, bracket_id: u128) -> Result<BracketTopology, ContractError>;

    fn load_team(&self, team_id: u128) -> Result<Team, ContractError>;

    fn append_result(&mut self, match_id: u128, result: StageResult) -> Result<(), ContractError>;

    /// All or nothing: a single taken slot rejects the whole batch.
    fn insert_participants(
        &mut self,
        participants: &[PlannedParticipant],
    ) -> Result<(), ContractError>;

    fn delete_result(&mut self, match_id: u128, position: u32) -> Result<(), ContractError>;
}

pub struct StorageRepository<'a> {
    storage: &'a mut dyn Storage,
}

impl<'a> StorageRepository<'a> {
    pub fn new(storage: &'a mut dyn Storage) -> Self {
        Self { storage }
    }

    fn store(&self) -> &dyn Storage {
        &*self.storage
    }
}

impl BracketRepository for StorageRepository<'_> {
    fn load_match(&self, match_id: u128) -> Result<MatchState, ContractError> {
        read_match(self.store(), match_id)
    }

    fn load_topology(&self, bracket_id: u128) -> Result<BracketTopology, ContractError> {
        read_topology(self.store(), bracket_id)
    }

    fn load_team(&self, team_id: u128) -> Result<Team, ContractError> {
        read_team(self.store(), team_id)
    }

    fn append_result(&mut self, match_id: u128, result: StageResult) -> Result<(), ContractError> {
        RESULTS.save(self.storage, (match_id, result.position), &result)?;

        Ok(())
    }

    fn insert_participants(
        &mut self,
        participants: &[PlannedParticipant],
    ) -> Result<(), ContractError> {
        let mut claimed = BTreeSet::new();

        for participant in participants {
            let key = (participant.match_id.u128(), participant.order.key());

            if PARTICIPANTS.has(self.store(), key) || !claimed.insert(key) {
                return Err(ContractError::consistency(format!(
                    "{:?} slot of match {} is already taken",
                    participant.order, participant.match_id
                )));
            }
        }

        for participant in participants {
            PARTICIPANTS.save(
                self.storage,
                (participant.match_id.u128(), participant.order.key()),
                &Participant {
                    team_id: participant.team_id,
                    order: participant.order,
                },
            )?;
        }

        Ok(())
    }

    fn delete_result(&mut self, match_id: u128, position: u32) -> Result<(), ContractError> {
        RESULTS.remove(self.storage, (match_id, position));

        Ok(())
    }
}

/// Runs `action` against a buffered view of `storage`.
///
/// The buffered writes are flushed only if `action` succeeds.
pub fn transactional<T>(
    storage: &mut dyn Storage,
    action: impl FnOnce(&mut StorageRepository<'_>) -> Result<T, ContractError>,
) -> Result<T, ContractError> {
    let mut transaction = StorageTransaction::new(&*storage);
    let value = action(&mut StorageRepository::new(&mut transaction))?;

    transaction.prepare().commit(storage);

    Ok(value)
}

pub fn read_bracket(storage: &dyn Storage, bracket_id: u128) -> Result<Bracket, ContractError> {
    BRACKETS
        .may_load(storage, bracket_id)?
        .ok_or(ContractError::UnknownBracket {
            bracket_id: Uint128::new(bracket_id),
        })
}

pub fn read_team(storage: &dyn Storage, team_id: u128) -> Result<Team, ContractError> {
    TEAMS
        .may_load(storage, team_id)?
        .ok_or(ContractError::UnknownTeam {
            team_id: Uint128::new(team_id),
        })
}

pub fn read_results(storage: &dyn Storage, match_id: u128) -> StdResult<Vec<StageResult>> {
    RESULTS
        .prefix(match_id)
        .range(storage, None, None, Order::Ascending)
        .map(|x| x.map(|y| y.1))
        .collect()
}

fn read_participants(storage: &dyn Storage, match_id: u128) -> StdResult<Vec<Participant>> {
    PARTICIPANTS
        .prefix(match_id)
        .range(storage, None, None, Order::Ascending)
        .map(|x| x.map(|y| y.1))
        .collect()
}

pub fn read_match(storage: &dyn Storage, match_id: u128) -> Result<MatchState, ContractError> {
    let record = matches()
        .may_load(storage, match_id)?
        .ok_or(ContractError::UnknownMatch {
            match_id: Uint128::new(match_id),
        })?;
    let bracket = read_bracket(storage, record.bracket_id.u128())?;
    let stages = bracket
        .round(record.round_position)
        .map(|round| round.stages.clone())
        .ok_or_else(|| {
            ContractError::consistency(format!(
                "match {} belongs to missing round {}",
                match_id, record.round_position
            ))
        })?;

    let participants = read_participants(storage, match_id)?
        .into_iter()
        .map(|participant| {
            let team = read_team(storage, participant.team_id.u128())?;
            Ok((participant, team))
        })
        .collect::<Result<Vec<_>, ContractError>>()?;

    Ok(MatchState {
        record,
        stages,
        participants,
        results: read_results(storage, match_id)?,
    })
}

pub fn read_topology(
    storage: &dyn Storage,
    bracket_id: u128,
) -> Result<BracketTopology, ContractError> {
    let bracket = read_bracket(storage, bracket_id)?;

    let nodes = matches()
        .idx
        .bracket
        .prefix(bracket_id)
        .range(storage, None, None, Order::Ascending)
        .map(|x| {
            let (_, record) = x?;
            let participants = read_participants(storage, record.id.u128())?;
            Ok(MatchNode {
                record,
                participants,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(BracketTopology::new(bracket, nodes))
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::testing::MockStorage;

    use super::*;
    use crate::state::{Round, Side};

    fn seed(storage: &mut dyn Storage) {
        BRACKETS
            .save(
                storage,
                1,
                &Bracket {
                    id: Uint128::one(),
                    name: "Cup".to_string(),
                    rounds: vec![Round {
                        position: 1,
                        side: Side::Winners,
                        stages: vec![Stage {
                            position: 1,
                            name: "Dust".to_string(),
                        }],
                    }],
                },
            )
            .unwrap();
        matches()
            .save(
                storage,
                1,
                &Match {
                    id: Uint128::one(),
                    bracket_id: Uint128::one(),
                    round_position: 1,
                    side: Side::Winners,
                    number: 1,
                    is_bye: false,
                    winner_destination: None,
                    loser_destination: None,
                },
            )
            .unwrap();
    }

    fn planned(order: TeamOrder) -> PlannedParticipant {
        PlannedParticipant {
            match_id: Uint128::one(),
            team_id: Uint128::one(),
            order,
        }
    }

    #[test]
    fn failed_action_discards_every_write() {
        let mut storage = MockStorage::new();
        seed(&mut storage);
        let before: Vec<_> = storage.range(None, None, Order::Ascending).collect();

        let err = transactional(&mut storage, |repo| {
            repo.insert_participants(&[planned(TeamOrder::Upper)])?;
            repo.insert_participants(&[planned(TeamOrder::Upper)])
        })
        .unwrap_err();

        assert!(matches!(err, ContractError::BracketConsistency { .. }));
        let after: Vec<_> = storage.range(None, None, Order::Ascending).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn successful_action_is_committed() {
        let mut storage = MockStorage::new();
        seed(&mut storage);

        transactional(&mut storage, |repo| {
            repo.insert_participants(&[planned(TeamOrder::Upper), planned(TeamOrder::Lower)])
        })
        .unwrap();

        let topology = read_topology(&storage, 1).unwrap();
        assert_eq!(topology.matches[&1].participants.len(), 2);
    }

    #[test]
    fn batch_with_repeated_slot_writes_nothing() {
        let mut storage = MockStorage::new();
        seed(&mut storage);

        let mut repo = StorageRepository::new(&mut storage);
        let err = repo
            .insert_participants(&[planned(TeamOrder::Lower), planned(TeamOrder::Lower)])
            .unwrap_err();

        assert!(matches!(err, ContractError::BracketConsistency { .. }));
        assert!(read_participants(&storage, 1).unwrap().is_empty());
    }

    #[test]
    fn missing_records_have_named_errors() {
        let storage = MockStorage::new();

        assert_eq!(
            read_match(&storage, 9).unwrap_err(),
            ContractError::UnknownMatch {
                match_id: Uint128::new(9)
            }
        );
        assert_eq!(
            read_topology(&storage, 2).unwrap_err(),
            ContractError::UnknownBracket {
                bracket_id: Uint128::new(2)
            }
        );
    }
}
