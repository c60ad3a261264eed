// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod auth;
pub mod compare;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod lineup;
pub mod player;
pub mod query;
pub mod remote;
pub mod selection;
pub mod storage;
pub mod teams;
