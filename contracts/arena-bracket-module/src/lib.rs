pub mod advancement;
pub mod bye;
pub mod completion;
pub mod contract;
mod error;
pub mod execute;
pub mod msg;
pub mod order;
pub mod permissions;
pub mod query;
pub mod repository;
pub mod service;
pub mod state;
pub mod topology;
pub mod transaction;

#[cfg(test)]
mod tests;

pub use crate::error::ContractError;
