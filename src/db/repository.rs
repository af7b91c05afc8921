//! User repository for bhub.

use sqlx::QueryBuilder;

use super::user::{NewUser, Role, User, UserUpdate};
use super::{DbPool, SQL_NOW};
use crate::{BhubError, Result};

/// Row type for users from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password: String,
    display_name: String,
    role: String,
    created_at: String,
    last_login: Option<String>,
    is_active: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password: row.password,
            display_name: row.display_name,
            role: row.role.parse().unwrap_or_default(),
            created_at: row.created_at,
            last_login: row.last_login,
            is_active: row.is_active,
        }
    }
}

const USER_COLUMNS: &str =
    "id, username, password, display_name, role, created_at, last_login, is_active";

/// Repository for user CRUD operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    ///
    /// Returns the created user with the assigned ID.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, password, display_name, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&new_user.username)
        .bind(&new_user.password)
        .bind(&new_user.display_name)
        .bind(new_user.role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| BhubError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| BhubError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(row.map(User::from))
    }

    /// Get a user by username.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(row.map(User::from))
    }

    /// List all users (ordered by id).
    pub async fn list_all(&self) -> Result<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;
        Ok(count)
    }

    /// Update a user by ID.
    ///
    /// Only fields set in the update are modified.
    /// Returns the updated user, or None if not found.
    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<crate::db::DbBackend> = QueryBuilder::new("UPDATE users SET ");
        let mut separated = query.separated(", ");

        if let Some(ref password) = update.password {
            separated.push("password = ");
            separated.push_bind_unseparated(password.clone());
        }
        if let Some(ref display_name) = update.display_name {
            separated.push("display_name = ");
            separated.push_bind_unseparated(display_name.clone());
        }
        if let Some(role) = update.role {
            separated.push("role = ");
            separated.push_bind_unseparated(role.as_str().to_string());
        }
        if let Some(is_active) = update.is_active {
            separated.push("is_active = ");
            separated.push_bind_unseparated(is_active);
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Update the last login timestamp for a user.
    pub async fn update_last_login(&self, id: i64) -> Result<()> {
        let sql = format!("UPDATE users SET last_login = {SQL_NOW} WHERE id = $1");
        sqlx::query(&sql)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a user by ID.
    ///
    /// Returns true if a user was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = repo
            .create(&NewUser::new("alice", "hash", "Alice"))
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Member);
        assert!(user.is_active);

        let found = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_create_duplicate_username_fails() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("alice", "hash", "Alice"))
            .await
            .unwrap();
        let result = repo.create(&NewUser::new("alice", "hash2", "Alice 2")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_update_role() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = repo
            .create(&NewUser::new("alice", "hash", "Alice"))
            .await
            .unwrap();

        let updated = repo
            .update(user.id, &UserUpdate::new().role(Role::Admin))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let result = repo
            .update(999, &UserUpdate::new().is_active(false))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_empty_update_returns_current() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = repo
            .create(&NewUser::new("alice", "hash", "Alice"))
            .await
            .unwrap();
        let unchanged = repo
            .update(user.id, &UserUpdate::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.display_name, "Alice");
    }

    #[tokio::test]
    async fn test_count_and_delete() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        assert_eq!(repo.count().await.unwrap(), 0);
        let user = repo
            .create(&NewUser::new("alice", "hash", "Alice"))
            .await
            .unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        assert!(repo.delete(user.id).await.unwrap());
        assert!(!repo.delete(user.id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_last_login() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = repo
            .create(&NewUser::new("alice", "hash", "Alice"))
            .await
            .unwrap();
        assert!(user.last_login.is_none());

        repo.update_last_login(user.id).await.unwrap();
        let user = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert!(user.last_login.is_some());
    }
}
