use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{
        model::{InsertUser, UpdateUser, UserSummary},
        repository::UserRepository,
        schema::UserEntity,
    },
};

#[derive(Clone)]
pub struct UserRepositoryPg {
    pool: sqlx::PgPool,
}

impl UserRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn like_pattern(query: &str) -> String {
    format!("%{}%", query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_"))
}

#[async_trait::async_trait]
impl UserRepository for UserRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError> {
        let user =
            sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE lower(email) = lower($1)")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (id, first_name, last_name, email, hash_password)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.hash_password)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: &Uuid, user: &UpdateUser) -> Result<UserEntity, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
        UPDATE users
        SET
            first_name  = COALESCE($2, first_name),
            last_name   = COALESCE($3, last_name),
            location    = CASE WHEN $4::boolean THEN $5 ELSE location END,
            profile_url = CASE WHEN $6::boolean THEN $7 ELSE profile_url END,
            profession  = CASE WHEN $8::boolean THEN $9 ELSE profession END,
            instagram   = COALESCE($10, instagram),
            facebook    = COALESCE($11, facebook),
            linked_in   = COALESCE($12, linked_in),
            updated_at  = NOW()
        WHERE id = $1
        RETURNING *
        "#,
        )
        .bind(id)
        .bind(&user.first_name) // $2: Option<String>
        .bind(&user.last_name) // $3: Option<String>
        .bind(user.location.is_some()) // $4: bool - was location provided?
        .bind(user.location.as_ref().and_then(|v| v.as_ref())) // $5
        .bind(user.profile_url.is_some()) // $6
        .bind(user.profile_url.as_ref().and_then(|v| v.as_ref())) // $7
        .bind(user.profession.is_some()) // $8
        .bind(user.profession.as_ref().and_then(|v| v.as_ref())) // $9
        .bind(&user.instagram)
        .bind(&user.facebook)
        .bind(&user.linked_in)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        Ok(user)
    }

    async fn set_verified(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("UPDATE users SET verified = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    async fn increment_views(&self, id: &Uuid) -> Result<(), error::SystemError> {
        sqlx::query("UPDATE users SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn search_users(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<UserSummary>, error::SystemError> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, first_name, last_name, profile_url, profession, location
            FROM users
            WHERE first_name ILIKE $1
               OR last_name ILIKE $1
               OR (first_name || ' ' || last_name) ILIKE $1
            ORDER BY first_name, last_name
            LIMIT $2
            "#,
        )
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn find_friends(&self, user_id: &Uuid) -> Result<Vec<UserSummary>, error::SystemError> {
        let friends = sqlx::query_as::<_, UserSummary>(
            r#"
        SELECT
            u.id,
            u.first_name,
            u.last_name,
            u.profile_url,
            u.profession,
            u.location
        FROM friends f
        JOIN users u
            ON u.id = CASE
                WHEN f.user_a = $1 THEN f.user_b
                ELSE f.user_a
            END
        WHERE f.user_a = $1
           OR f.user_b = $1
        ORDER BY f.created_at DESC
        "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friends)
    }

    async fn find_suggestions(
        &self,
        user_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<UserSummary>, error::SystemError> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.first_name, u.last_name, u.profile_url, u.profession, u.location
            FROM users u
            WHERE u.id <> $1
              AND NOT EXISTS (
                  SELECT 1 FROM friends f
                  WHERE (f.user_a = $1 AND f.user_b = u.id)
                     OR (f.user_b = $1 AND f.user_a = u.id)
              )
            ORDER BY u.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}
