// Library root: league storage, persistence, config and import on top of
// the scheduling and standings core.

pub mod config;
pub mod db;
pub mod import;
pub mod sample;
pub mod search;
pub mod store;
