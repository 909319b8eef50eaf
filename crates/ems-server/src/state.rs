//! Shared application state.

use ems_auth::config::AuthConfig;
use ems_auth::service::SessionManager;
use ems_db::repository::{
    SurrealAttendanceRepository, SurrealEmployeeRepository, SurrealPayrollRepository,
    SurrealSessionRepository, SurrealUserRepository,
};
use surrealdb::{Connection, Surreal};

/// Everything the handlers need, cloned per request.
///
/// Generic over the SurrealDB engine so integration tests can run the
/// whole API against the in-memory engine.
pub struct AppState<C: Connection> {
    pub sessions: SessionManager<SurrealUserRepository<C>, SurrealSessionRepository<C>>,
    pub employees: SurrealEmployeeRepository<C>,
    pub attendance: SurrealAttendanceRepository<C>,
    pub payroll: SurrealPayrollRepository<C>,
}

impl<C: Connection + Clone> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            employees: self.employees.clone(),
            attendance: self.attendance.clone(),
            payroll: self.payroll.clone(),
        }
    }
}

impl<C: Connection> AppState<C> {
    /// Wire up all repositories and the session manager over one
    /// database handle.
    ///
    /// The hashing pepper and the verification pepper must be the same
    /// value, so the user repository takes it from the auth config.
    pub fn new(db: Surreal<C>, auth_config: AuthConfig) -> Self {
        let user_repo = match auth_config.pepper.clone() {
            Some(pepper) => SurrealUserRepository::with_pepper(db.clone(), pepper),
            None => SurrealUserRepository::new(db.clone()),
        };
        let session_repo = SurrealSessionRepository::new(db.clone());
        Self {
            sessions: SessionManager::new(user_repo, session_repo, auth_config),
            employees: SurrealEmployeeRepository::new(db.clone()),
            attendance: SurrealAttendanceRepository::new(db.clone()),
            payroll: SurrealPayrollRepository::new(db),
        }
    }
}
