//! SurrealDB implementation of [`EmployeeRepository`].

use chrono::{DateTime, Utc};
use ems_core::error::EmsResult;
use ems_core::models::employee::{CreateEmployee, Employee, UpdateEmployee};
use ems_core::repository::EmployeeRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct EmployeeRow {
    name: String,
    email: String,
    position: String,
    department: String,
    salary: f64,
    user_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct EmployeeRowWithId {
    record_id: String,
    name: String,
    email: String,
    position: String,
    department: String,
    salary: f64,
    user_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_user_id(user_id: Option<String>) -> Result<Option<Uuid>, DbError> {
    user_id
        .map(|s| {
            Uuid::parse_str(&s)
                .map_err(|e| DbError::decode("employee", format!("invalid user UUID: {e}")))
        })
        .transpose()
}

impl EmployeeRow {
    fn into_employee(self, id: Uuid) -> Result<Employee, DbError> {
        Ok(Employee {
            id,
            name: self.name,
            email: self.email,
            position: self.position,
            department: self.department,
            salary: self.salary,
            user_id: parse_user_id(self.user_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl EmployeeRowWithId {
    fn try_into_employee(self) -> Result<Employee, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::decode("employee", format!("invalid record UUID: {e}")))?;
        Ok(Employee {
            id,
            name: self.name,
            email: self.email,
            position: self.position,
            department: self.department,
            salary: self.salary,
            user_id: parse_user_id(self.user_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Employee repository.
#[derive(Clone)]
pub struct SurrealEmployeeRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealEmployeeRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> EmployeeRepository for SurrealEmployeeRepository<C> {
    async fn create(&self, input: CreateEmployee) -> EmsResult<Employee> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('employee', $id) SET \
                 name = $name, email = $email, \
                 position = $position, department = $department, \
                 salary = $salary, user_id = $user_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("position", input.position))
            .bind(("department", input.department))
            .bind(("salary", input.salary))
            .bind(("user_id", input.user_id.map(|u| u.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::write("employee", e))?;

        let rows: Vec<EmployeeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "employee".into(),
            id: id_str,
        })?;

        Ok(row.into_employee(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> EmsResult<Employee> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('employee', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EmployeeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "employee".into(),
            id: id_str,
        })?;

        Ok(row.into_employee(id)?)
    }

    async fn list_by_user(&self, user_id: Uuid) -> EmsResult<Vec<Employee>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM employee \
                 WHERE user_id = $user_id \
                 ORDER BY created_at ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EmployeeRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_employee())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn list(&self) -> EmsResult<Vec<Employee>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM employee \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EmployeeRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_employee())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn update(&self, id: Uuid, input: UpdateEmployee) -> EmsResult<Employee> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.position.is_some() {
            sets.push("position = $position");
        }
        if input.department.is_some() {
            sets.push("department = $department");
        }
        if input.salary.is_some() {
            sets.push("salary = $salary");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('employee', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(position) = input.position {
            builder = builder.bind(("position", position));
        }
        if let Some(department) = input.department {
            builder = builder.bind(("department", department));
        }
        if let Some(salary) = input.salary {
            builder = builder.bind(("salary", salary));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::write("employee", e))?;

        let rows: Vec<EmployeeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "employee".into(),
            id: id_str,
        })?;

        Ok(row.into_employee(id)?)
    }

    async fn delete(&self, id: Uuid) -> EmsResult<()> {
        let id_str = id.to_string();

        // Existence check first so a missing employee surfaces as 404
        // rather than a silent no-op.
        self.get_by_id(id).await?;

        self.db
            .query("DELETE type::record('employee', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
