use cosmwasm_std::{from_json, Addr, Uint128};
use cw_multi_test::{error::AnyResult, App, AppResponse, BankKeeper, Executor, MockApiBech32};

use crate::{
    msg::{
        BracketDelta, BracketMsg, BracketResponse, CreateBracketResponse, ExecuteMsg,
        InstantiateMsg, MatchMsg, MatchResponse, ParticipantMsg, QueryMsg, RoundMsg, TeamMsg,
    },
    state::{StageResult, TeamOrder},
    tests::app::get_app,
};

pub const ADMIN: &str = "organizer";

pub const TEAM_A: u128 = 1;
pub const TEAM_B: u128 = 2;
pub const TEAM_C: u128 = 3;

pub const W1: u128 = 1;
pub const W2: u128 = 2;
pub const W3: u128 = 3;
pub const GRAND_FINAL: u128 = 4;
pub const L1: u128 = 5;
pub const L2: u128 = 6;
pub const RESET: u128 = 7;

pub struct Context {
    pub app: App<BankKeeper, MockApiBech32>,
    pub bracket_module_addr: Addr,
    pub admin: Addr,
    pub alice: Addr,
    pub bob: Addr,
    pub carol: Addr,
}

pub fn get_attr_value(response: &AppResponse, key: &str) -> Option<String> {
    for event in &response.events {
        for attribute in &event.attributes {
            if attribute.key == key {
                return Some(attribute.value.clone());
            }
        }
    }
    None
}

pub fn get_delta(response: &AppResponse) -> BracketDelta {
    from_json(response.data.as_ref().unwrap()).unwrap()
}

pub fn match_msg(
    key: u32,
    round_position: i32,
    number: u32,
    is_bye: bool,
    winner_destination: Option<u32>,
    loser_destination: Option<u32>,
    participants: &[(u32, TeamOrder)],
) -> MatchMsg {
    MatchMsg {
        key,
        round_position,
        number,
        is_bye,
        winner_destination,
        loser_destination,
        participants: participants
            .iter()
            .map(|(team, order)| ParticipantMsg {
                team: *team,
                order: *order,
            })
            .collect(),
    }
}

pub fn round_msg(position: i32, stages: &[&str]) -> RoundMsg {
    RoundMsg {
        position,
        stages: stages.iter().map(|stage| stage.to_string()).collect(),
    }
}

/// Three teams in a four slot double elimination bracket.
///
/// C drew the bye in winners round 1 and waits in the winners final. Whoever
/// loses the other round 1 match drops into the losers round 1 bye and is
/// forwarded straight to the losers final.
pub fn three_team_bracket(members: [&Addr; 3]) -> BracketMsg {
    let [alice, bob, carol] = members;

    BracketMsg {
        name: "Weekly Cup".to_string(),
        teams: vec![
            TeamMsg {
                name: "Team A".to_string(),
                members: vec![alice.to_string()],
            },
            TeamMsg {
                name: "Team B".to_string(),
                members: vec![bob.to_string()],
            },
            TeamMsg {
                name: "Team C".to_string(),
                members: vec![carol.to_string()],
            },
        ],
        rounds: vec![
            round_msg(1, &["Reef", "Dome", "Port"]),
            round_msg(2, &["Dome", "Reef", "Port"]),
            round_msg(3, &["Port", "Reef", "Dome", "Mill", "Tower"]),
            round_msg(4, &["Mill", "Reef", "Dome", "Port", "Tower"]),
            round_msg(-1, &["Reef", "Dome", "Port"]),
            round_msg(-2, &["Tower", "Mill", "Port"]),
        ],
        matches: vec![
            match_msg(1, 1, 1, true, Some(3), Some(5), &[]),
            match_msg(
                2,
                1,
                2,
                false,
                Some(3),
                Some(5),
                &[(0, TeamOrder::Upper), (1, TeamOrder::Lower)],
            ),
            match_msg(3, 2, 1, false, Some(4), Some(6), &[(2, TeamOrder::Upper)]),
            match_msg(4, 3, 1, false, None, None, &[]),
            match_msg(5, -1, 0, true, Some(6), None, &[]),
            match_msg(6, -2, 1, false, Some(4), None, &[]),
            match_msg(7, 4, 1, false, None, None, &[]),
        ],
    }
}

pub fn setup_context() -> Context {
    let mut app = get_app();
    let code_id = app.store_code(arena_testing::contracts::arena_bracket_module_contract());
    let admin = app.api().addr_make(ADMIN);
    let alice = app.api().addr_make("alice");
    let bob = app.api().addr_make("bob");
    let carol = app.api().addr_make("carol");

    let bracket_module_addr = app
        .instantiate_contract(
            code_id,
            admin.clone(),
            &InstantiateMsg { owner: None },
            &[],
            "Arena Bracket Module",
            None,
        )
        .unwrap();

    let mut context = Context {
        app,
        bracket_module_addr,
        admin,
        alice,
        bob,
        carol,
    };

    let bracket = three_team_bracket([&context.alice, &context.bob, &context.carol]);
    let response = context.create_bracket(bracket).unwrap();
    let created: CreateBracketResponse = from_json(response.data.unwrap()).unwrap();
    assert_eq!(created.bracket_id, Uint128::one());
    assert_eq!(
        created.match_ids,
        (1..=7u128).map(Uint128::new).collect::<Vec<_>>()
    );

    context
}

impl Context {
    pub fn create_bracket(&mut self, bracket: BracketMsg) -> AnyResult<AppResponse> {
        self.app.execute_contract(
            self.admin.clone(),
            self.bracket_module_addr.clone(),
            &ExecuteMsg::CreateBracket { bracket },
            &[],
        )
    }

    pub fn report(
        &mut self,
        sender: &Addr,
        match_id: u128,
        winner_team_id: u128,
        stage_position: u32,
    ) -> AnyResult<AppResponse> {
        self.app.execute_contract(
            sender.clone(),
            self.bracket_module_addr.clone(),
            &ExecuteMsg::ReportStageResult {
                match_id: Uint128::new(match_id),
                winner_team_id: Uint128::new(winner_team_id),
                stage_position,
                player_ids: vec![],
            },
            &[],
        )
    }

    /// Reports `winners` as consecutive stages starting at the next open one.
    pub fn play(&mut self, match_id: u128, winners: &[u128]) -> AppResponse {
        let admin = self.admin.clone();
        let start = self.query_results(match_id).len() as u32;
        let mut last = None;

        for (i, winner) in winners.iter().enumerate() {
            last = Some(
                self.report(&admin, match_id, *winner, start + i as u32 + 1)
                    .unwrap(),
            );
        }

        last.unwrap()
    }

    pub fn undo(
        &mut self,
        sender: &Addr,
        match_id: u128,
        stage_position: Option<u32>,
    ) -> AnyResult<AppResponse> {
        self.app.execute_contract(
            sender.clone(),
            self.bracket_module_addr.clone(),
            &ExecuteMsg::UndoLastStageResult {
                match_id: Uint128::new(match_id),
                stage_position,
            },
            &[],
        )
    }

    pub fn query_match(&self, match_id: u128) -> MatchResponse {
        self.app
            .wrap()
            .query_wasm_smart(
                self.bracket_module_addr.clone(),
                &QueryMsg::Match {
                    match_id: Uint128::new(match_id),
                },
            )
            .unwrap()
    }

    pub fn query_results(&self, match_id: u128) -> Vec<StageResult> {
        self.app
            .wrap()
            .query_wasm_smart(
                self.bracket_module_addr.clone(),
                &QueryMsg::Results {
                    match_id: Uint128::new(match_id),
                },
            )
            .unwrap()
    }

    pub fn query_bracket(&self, bracket_id: u128) -> BracketResponse {
        self.app
            .wrap()
            .query_wasm_smart(
                self.bracket_module_addr.clone(),
                &QueryMsg::Bracket {
                    bracket_id: Uint128::new(bracket_id),
                },
            )
            .unwrap()
    }

    pub fn team_ids(&self, match_id: u128) -> [Option<u128>; 2] {
        self.query_match(match_id)
            .team_ids
            .map(|team_id| team_id.map(|id| id.u128()))
    }
}
