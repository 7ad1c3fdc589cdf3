use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::database::models::{Employee, EmployeeRow, NewEmployee, PhoneRow};
use crate::database::repository::{EmployeeRepository, RepositoryError};
use crate::types::EmployeeDraft;

const SELECT_EMPLOYEE: &str = r#"
    SELECT
        e.id, e.first_name, e.last_name, e.email, e.doc_number, e.date_of_birth,
        e.role, e.manager_id,
        m.first_name AS manager_first_name, m.last_name AS manager_last_name,
        e.password_hash, e.password_salt, e.version, e.created_at, e.updated_at
    FROM employees e
    LEFT JOIN employees m ON m.id = e.manager_id
"#;

const DOC_NUMBER_INDEX: &str = "ux_employees_doc_number";
const MANAGER_FK: &str = "fk_employees_manager";

pub struct PgEmployeeRepository {
    pool: PgPool,
}

impl PgEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load phones for `rows` in one round trip and assemble employees.
    async fn hydrate(&self, rows: Vec<EmployeeRow>) -> Result<Vec<Employee>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let phones = sqlx::query_as::<_, PhoneRow>(
            "SELECT employee_id, number FROM phones WHERE employee_id = ANY($1) ORDER BY employee_id, position",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let numbers = phones
                    .iter()
                    .filter(|p| p.employee_id == row.id)
                    .map(|p| p.number.clone())
                    .collect();
                row.into_employee(numbers).map_err(RepositoryError::Storage)
            })
            .collect()
    }

    async fn fetch_one(&self, id: Uuid) -> Result<Option<Employee>, RepositoryError> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!("{} WHERE e.id = $1", SELECT_EMPLOYEE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

/// Delete-then-insert inside the caller's transaction.
async fn write_phones(conn: &mut PgConnection, employee_id: Uuid, numbers: &[String]) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM phones WHERE employee_id = $1")
        .bind(employee_id)
        .execute(&mut *conn)
        .await?;

    for (position, number) in numbers.iter().enumerate() {
        sqlx::query("INSERT INTO phones (id, employee_id, number, position) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::new_v4())
            .bind(employee_id)
            .bind(number)
            .bind(position as i32)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Map constraint violations raised by inserts and updates.
fn classify_write(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() && db_err.constraint() == Some(DOC_NUMBER_INDEX) {
            return RepositoryError::DuplicateDocument;
        }
        if db_err.is_foreign_key_violation() && db_err.constraint() == Some(MANAGER_FK) {
            return RepositoryError::UnknownManager;
        }
    }
    RepositoryError::Sqlx(err)
}

/// Restrict-on-delete surfaces as a foreign key violation on the manager reference.
fn classify_delete(err: sqlx::Error, id: Uuid) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() && db_err.constraint() == Some(MANAGER_FK) {
            return RepositoryError::ManagerInUse(id);
        }
    }
    RepositoryError::Sqlx(err)
}

/// `%` and `_` in user input match literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl EmployeeRepository for PgEmployeeRepository {
    async fn list(&self, query: Option<&str>) -> Result<Vec<Employee>, RepositoryError> {
        let pattern = query.map(str::trim).filter(|q| !q.is_empty()).map(like_pattern);

        let sql = format!(
            "{} WHERE $1::text IS NULL
                OR e.first_name ILIKE $1 OR e.last_name ILIKE $1
                OR e.email ILIKE $1 OR e.doc_number ILIKE $1
             ORDER BY e.first_name, e.last_name, e.id",
            SELECT_EMPLOYEE
        );
        let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        self.hydrate(rows).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, RepositoryError> {
        self.fetch_one(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, RepositoryError> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "{} WHERE e.email = $1 ORDER BY e.created_at, e.id LIMIT 1",
            SELECT_EMPLOYEE
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn exists_by_document(
        &self,
        doc_number: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, RepositoryError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM employees WHERE doc_number = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(doc_number)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists.0)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    async fn create(&self, new: NewEmployee) -> Result<Employee, RepositoryError> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO employees (
                id, first_name, last_name, email, doc_number, date_of_birth,
                role, manager_id, password_hash, password_salt, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 1)
            "#,
        )
        .bind(id)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.doc_number)
        .bind(new.date_of_birth)
        .bind(new.role.rank())
        .bind(new.manager_id)
        .bind(&new.credentials.hash)
        .bind(&new.credentials.salt)
        .execute(&mut *tx)
        .await
        .map_err(classify_write)?;

        write_phones(&mut *tx, id, &new.phones).await?;
        tx.commit().await?;

        tracing::debug!("Inserted employee {}", id);
        self.fetch_one(id).await?.ok_or(RepositoryError::NotFound(id))
    }

    async fn update(
        &self,
        id: Uuid,
        expected_version: i32,
        draft: &EmployeeDraft,
    ) -> Result<Employee, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE employees SET
                first_name = $3, last_name = $4, email = $5, doc_number = $6,
                date_of_birth = $7, role = $8, manager_id = $9,
                version = version + 1, updated_at = now()
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(id)
        .bind(expected_version)
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.email)
        .bind(&draft.doc_number)
        .bind(draft.date_of_birth)
        .bind(draft.role.rank())
        .bind(draft.manager_id)
        .execute(&mut *tx)
        .await
        .map_err(classify_write)?;

        // Dropping `tx` rolls back.
        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict(id));
        }

        write_phones(&mut *tx, id, &draft.normalized_phones()).await?;
        tx.commit().await?;

        self.fetch_one(id).await?.ok_or(RepositoryError::Conflict(id))
    }

    async fn replace_phones(&self, id: Uuid, numbers: &[String]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Row lock on the owner serializes concurrent phone-set writers.
        let result = sqlx::query(
            "UPDATE employees SET version = version + 1, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        write_phones(&mut *tx, id, numbers).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid, expected_version: i32) -> Result<(), RepositoryError> {
        // Phones go with the row (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM employees WHERE id = $1 AND version = $2")
            .bind(id)
            .bind(expected_version)
            .execute(&self.pool)
            .await
            .map_err(|e| classify_delete(e, id))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict(id));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
