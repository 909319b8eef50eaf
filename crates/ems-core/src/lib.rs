//! EMS Core — domain models, repository traits, error types, and the
//! payroll calculator.
//!
//! This crate has no I/O: persistence lives in `ems-db`, the web layer
//! in `ems-server`.

pub mod error;
pub mod models;
pub mod payroll;
pub mod repository;

pub use error::{EmsError, EmsResult};
