//! Data transfer objects for the orchestrator wire protocol
//!
//! This module contains the command bodies sent to the orchestrator and
//! the accessors used to pick job data out of its loosely-shaped JSON
//! responses. Accessors return structured errors naming the missing or
//! mistyped field instead of panicking on unexpected shapes.

pub mod code_deploy;
pub mod deploy;
pub mod report;
pub mod response;
