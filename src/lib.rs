// src/lib.rs — Library root for Oramind

pub mod api;
pub mod cli;
pub mod engine;
pub mod infra;
pub mod provider;
pub mod retrieval;
pub mod tasks;
