//! Host process integration: the stdio tool bridge and its wire contract.

pub mod contract;
pub mod stdio;
