//! Statistics for a golf club: scoring distributions, environmental
//! breakdowns, leaderboards, team projections, digests, handicaps and
//! admin reports, plus the JSON service that exposes them.

#[macro_use]
extern crate rocket;

pub mod access;
pub mod api;
pub mod config;
pub mod dto;
pub mod goals;
pub mod model;
pub mod report;
pub mod stats;
mod util;
pub mod weather;
