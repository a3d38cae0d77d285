use cosmwasm_std::{StdError, Uint128};
use cw_ownable::OwnershipError;
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    StdError(#[from] StdError),

    #[error("{0}")]
    OwnershipError(#[from] OwnershipError),

    #[error("{0}")]
    PaymentError(#[from] PaymentError),

    #[error("UnknownMatch {match_id}")]
    UnknownMatch { match_id: Uint128 },

    #[error("UnknownBracket {bracket_id}")]
    UnknownBracket { bracket_id: Uint128 },

    #[error("UnknownTeam {team_id}")]
    UnknownTeam { team_id: Uint128 },

    #[error("Forbidden")]
    Forbidden {},

    #[error("MatchAlreadyConcluded {match_id}")]
    MatchAlreadyConcluded { match_id: Uint128 },

    #[error("InvalidWinner {team_id}")]
    InvalidWinner { team_id: Uint128 },

    #[error("InvalidStagePosition {position}")]
    InvalidStagePosition { position: u32 },

    #[error("ByeMatch {match_id}")]
    ByeMatch { match_id: Uint128 },

    #[error("MatchNotReady {match_id}")]
    MatchNotReady { match_id: Uint128 },

    #[error("InvalidBracket: {reason}")]
    InvalidBracket { reason: String },

    #[error("BracketConsistency: {reason}")]
    BracketConsistency { reason: String },
}

impl ContractError {
    pub(crate) fn consistency(reason: impl Into<String>) -> Self {
        ContractError::BracketConsistency {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_bracket(reason: impl Into<String>) -> Self {
        ContractError::InvalidBracket {
            reason: reason.into(),
        }
    }
}
