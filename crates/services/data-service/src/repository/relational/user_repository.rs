//! User repository over the `Users` table.

use async_trait::async_trait;
use tiberius::{Row, ToSql};
use uuid::Uuid;

use common::{AppError, AppResult, ResultExt};
use domain::{NewUser, User, UserUpdate};

use super::rows::{opt_text, opt_timestamp, required, text, timestamp};
use crate::infra::SqlServer;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const USER_COLUMNS: &str = "UserId, Email, PasswordHash, FullName, Phone, AvatarUrl, \
     SubscriptionType, CreatedAt, UpdatedAt, LastLoginAt, \
     IsActive, EmailVerified, TwoFactorEnabled";

/// User repository trait for dependency injection.
///
/// Lookups only return active users.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create through `sp_CreateUser` and return the stored row
    async fn create_user(&self, user: NewUser) -> AppResult<User>;

    async fn get_user_by_id(&self, user_id: Uuid) -> Option<User>;

    async fn get_user_by_email(&self, email: &str) -> Option<User>;

    /// Apply the allow-listed fields; an empty update is a no-op returning false
    async fn update_user(&self, user_id: Uuid, update: UserUpdate) -> bool;

    async fn update_last_login(&self, user_id: Uuid) -> bool;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: SqlServer,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: SqlServer) -> Self {
        Self { db }
    }

    async fn find_one(&self, filter: &str, param: &dyn ToSql) -> AppResult<Option<User>> {
        let sql = format!(
            "SELECT {} FROM Users WHERE {} = @P1 AND IsActive = 1",
            USER_COLUMNS, filter
        );

        let mut conn = self.db.connection().await?;
        let row = conn.query(sql, &[param]).await?.into_row().await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let user_id = {
            let mut conn = self.db.connection().await?;
            let row = conn
                .query(
                    "EXEC sp_CreateUser @Email = @P1, @PasswordHash = @P2, \
                     @FullName = @P3, @Phone = @P4",
                    &[&user.email, &user.password_hash, &user.full_name, &user.phone],
                )
                .await?
                .into_row()
                .await?
                .ok_or_else(|| AppError::internal("sp_CreateUser returned no id"))?;

            row.try_get::<Uuid, _>(0)?
                .ok_or_else(|| AppError::internal("sp_CreateUser returned a NULL id"))?
        };

        self.find_one("UserId", &user_id)
            .await?
            .ok_or_else(|| AppError::internal(format!("created user {} not readable", user_id)))
    }

    async fn apply_update(&self, user_id: Uuid, update: &UserUpdate) -> AppResult<bool> {
        let Some((sql, values)) = update_statement(update) else {
            return Ok(false);
        };

        let mut params: Vec<&dyn ToSql> = Vec::with_capacity(values.len() + 1);
        params.push(&user_id);
        params.extend(values.iter().map(|v| v as &dyn ToSql));

        let mut conn = self.db.connection().await?;
        let result = conn.execute(sql, &params).await?;

        Ok(result.total() > 0)
    }

    async fn touch_login(&self, user_id: Uuid) -> AppResult<bool> {
        let mut conn = self.db.connection().await?;
        let result = conn
            .execute(
                "UPDATE Users SET LastLoginAt = SYSUTCDATETIME() WHERE UserId = @P1",
                &[&user_id],
            )
            .await?;

        Ok(result.total() > 0)
    }
}

/// `UPDATE` for the allow-listed columns present in `update`.
///
/// `@P1` is reserved for the user id; values bind from `@P2` in order.
fn update_statement(update: &UserUpdate) -> Option<(String, Vec<String>)> {
    let candidates = [
        ("FullName", update.full_name.clone()),
        ("Phone", update.phone.clone()),
        ("AvatarUrl", update.avatar_url.clone()),
        (
            "SubscriptionType",
            update.subscription_type.map(|s| s.as_str().to_string()),
        ),
    ];

    let mut assignments = Vec::new();
    let mut values = Vec::new();
    for (column, value) in candidates {
        if let Some(value) = value {
            values.push(value);
            assignments.push(format!("{} = @P{}", column, values.len() + 1));
        }
    }

    if assignments.is_empty() {
        return None;
    }
    assignments.push("UpdatedAt = SYSUTCDATETIME()".to_string());

    let sql = format!("UPDATE Users SET {} WHERE UserId = @P1", assignments.join(", "));
    Some((sql, values))
}

fn user_from_row(row: &Row) -> AppResult<User> {
    Ok(User {
        user_id: required(row, "UserId")?,
        email: text(row, "Email")?,
        password_hash: text(row, "PasswordHash")?,
        full_name: text(row, "FullName")?,
        phone: opt_text(row, "Phone")?,
        avatar_url: opt_text(row, "AvatarUrl")?,
        subscription_type: text(row, "SubscriptionType")?.parse()?,
        created_at: timestamp(row, "CreatedAt")?,
        updated_at: timestamp(row, "UpdatedAt")?,
        last_login_at: opt_timestamp(row, "LastLoginAt")?,
        is_active: required(row, "IsActive")?,
        email_verified: required(row, "EmailVerified")?,
        two_factor_enabled: required(row, "TwoFactorEnabled")?,
    })
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        self.insert(user).await.log_failure("create_user")
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Option<User> {
        self.find_one("UserId", &user_id)
            .await
            .or_default_logged("get_user_by_id")
    }

    async fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.find_one("Email", &email)
            .await
            .or_default_logged("get_user_by_email")
    }

    async fn update_user(&self, user_id: Uuid, update: UserUpdate) -> bool {
        self.apply_update(user_id, &update)
            .await
            .or_default_logged("update_user")
    }

    async fn update_last_login(&self, user_id: Uuid) -> bool {
        self.touch_login(user_id)
            .await
            .or_default_logged("update_last_login")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::SubscriptionType;

    #[test]
    fn test_empty_update_has_no_statement() {
        assert!(update_statement(&UserUpdate::default()).is_none());
    }

    #[test]
    fn test_update_statement_numbers_placeholders_in_order() {
        let update = UserUpdate {
            full_name: Some("Ana Lima".to_string()),
            avatar_url: Some("https://cdn/a.png".to_string()),
            subscription_type: Some(SubscriptionType::Pro),
            ..Default::default()
        };

        let (sql, values) = update_statement(&update).unwrap();

        assert_eq!(
            sql,
            "UPDATE Users SET FullName = @P2, AvatarUrl = @P3, SubscriptionType = @P4, \
             UpdatedAt = SYSUTCDATETIME() WHERE UserId = @P1"
        );
        assert_eq!(values, vec!["Ana Lima", "https://cdn/a.png", "pro"]);
    }

    #[test]
    fn test_update_statement_single_field() {
        let update = UserUpdate {
            phone: Some("+1 555 0100".to_string()),
            ..Default::default()
        };

        let (sql, values) = update_statement(&update).unwrap();
        assert!(sql.starts_with("UPDATE Users SET Phone = @P2, UpdatedAt"));
        assert_eq!(values.len(), 1);
    }
}
