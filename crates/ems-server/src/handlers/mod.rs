//! HTTP handlers, grouped by resource.

pub mod attendance;
pub mod auth;
pub mod employee;
pub mod payroll;
