//! SurrealDB repository implementations for the `ems-core` traits.

mod attendance;
mod employee;
mod payroll;
mod session;
mod user;

pub use attendance::SurrealAttendanceRepository;
pub use employee::SurrealEmployeeRepository;
pub use payroll::SurrealPayrollRepository;
pub use session::SurrealSessionRepository;
pub use user::SurrealUserRepository;
