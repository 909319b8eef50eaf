//! Domain models for the EMS.
//!
//! These are the core types shared across all crates.

pub mod attendance;
pub mod employee;
pub mod payroll;
pub mod session;
pub mod user;
