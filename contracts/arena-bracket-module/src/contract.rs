#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult, Uint128,
};
use cw2::{ensure_from_older_version, set_contract_version};

use crate::{
    execute,
    msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg},
    query,
    state::{BRACKET_COUNT, MATCH_COUNT, TEAM_COUNT},
    ContractError,
};

pub(crate) const CONTRACT_NAME: &str = "crates.io:arena-bracket-module";
pub(crate) const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let owner = msg.owner.unwrap_or_else(|| info.sender.to_string());
    let ownership = cw_ownable::initialize_owner(deps.storage, deps.api, Some(owner.as_str()))?;

    BRACKET_COUNT.save(deps.storage, &Uint128::zero())?;
    MATCH_COUNT.save(deps.storage, &Uint128::zero())?;
    TEAM_COUNT.save(deps.storage, &Uint128::zero())?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attributes(ownership.into_attributes()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    if !matches!(msg, ExecuteMsg::UpdateOwnership(_)) {
        cw_utils::nonpayable(&info)?;
    }

    match msg {
        ExecuteMsg::CreateBracket { bracket } => execute::create_bracket(deps, info, bracket),
        ExecuteMsg::ReportStageResult {
            match_id,
            winner_team_id,
            stage_position,
            player_ids,
        } => execute::report_stage_result(
            deps,
            info,
            match_id,
            winner_team_id,
            stage_position,
            player_ids,
        ),
        ExecuteMsg::UndoLastStageResult {
            match_id,
            stage_position,
        } => execute::undo_last_stage_result(deps, info, match_id, stage_position),
        ExecuteMsg::UpdateOwnership(action) => {
            let ownership = cw_ownable::update_ownership(deps, &env.block, &info.sender, action)?;

            Ok(Response::default().add_attributes(ownership.into_attributes()))
        }
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Bracket { bracket_id } => to_json_binary(&query::query_bracket(deps, bracket_id)?),
        QueryMsg::Match { match_id } => to_json_binary(&query::query_match(deps, match_id)?),
        QueryMsg::Results { match_id } => to_json_binary(&query::query_results(deps, match_id)?),
        QueryMsg::Team { team_id } => to_json_binary(&query::query_team(deps, team_id)?),
        QueryMsg::Ownership {} => to_json_binary(&cw_ownable::get_ownership(deps.storage)?),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, msg: MigrateMsg) -> Result<Response, ContractError> {
    match msg {
        MigrateMsg::FromCompatible {} => {
            let version = ensure_from_older_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

            Ok(Response::new()
                .add_attribute("action", "migrate")
                .add_attribute("from_version", version.to_string()))
        }
    }
}
