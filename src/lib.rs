//! Heuristic handle availability checks.
//!
//! A candidate name is normalized to a URL-safe handle, each selected
//! platform's public profile URL is fetched, and the response is classified
//! as available or taken. Anything inconclusive reads as taken.
//!
//! The [`core::engine::Engine`] does the probing; [`server`] exposes it as
//! `POST /check` and [`cli`] as the `handle-check` binary.

pub mod cli;
pub mod config;
pub mod core;
pub mod modules;
pub mod pipeline;
pub mod server;
