//! accrue: return and capital trajectories for positions and portfolios.
//!
//! Hexagonal architecture: the alignment and compounding engine in
//! [`domain`], collaborator traits in [`ports`], file-backed
//! implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
