//! Core domain types
//!
//! This module contains the job lifecycle vocabulary shared by the client
//! and CLI: job states, terminal-state detection, and the per-node report
//! assembled once a job completes.

pub mod job;
pub mod report;
