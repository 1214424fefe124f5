//! Windlass Core
//!
//! Core types for running deploy jobs against a remote orchestrator.
//!
//! This crate contains:
//! - Domain types: the job state machine and the aggregated job report
//! - DTOs: wire-shaped command bodies and response-body accessors

pub mod domain;
pub mod dto;
