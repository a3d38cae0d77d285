use cosmwasm_std::Empty;
use cw_multi_test::{Contract, ContractWrapper};

pub fn arena_bracket_module_contract() -> Box<dyn Contract<Empty>> {
    Box::new(
        ContractWrapper::new(
            arena_bracket_module::contract::execute,
            arena_bracket_module::contract::instantiate,
            arena_bracket_module::contract::query,
        )
        .with_migrate(arena_bracket_module::contract::migrate),
    )
}
