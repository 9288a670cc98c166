use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::sea_query::{Condition, Expr, extension::postgres::PgExpr};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, SqlErr};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{Role, User},
    repository::UserRepository,
};

pub struct PgUserRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

fn store_err(e: sea_orm::DbErr) -> UserError {
    UserError::Store(format!("Database error: {}", e))
}

/// Map a save-time error onto the same duplicate outcome the service
/// pre-check produces, so a lost check-then-act race is indistinguishable
/// from an ordinary duplicate.
fn save_err(e: sea_orm::DbErr, user: &User) -> UserError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(constraint)) => {
            if str::contains(&constraint, "email") {
                UserError::DuplicateEmail(user.email.clone())
            } else {
                UserError::DuplicateUsername(user.username.clone())
            }
        }
        _ => store_err(e),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_all(&self) -> UserResult<Vec<User>> {
        let models = self.base.find_all().await.map_err(store_err)?;
        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let model = self.base.find_by_id(id).await.map_err(store_err)?;
        Ok(model.map(|m| m.into()))
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(self.base.db())
            .await
            .map_err(store_err)?;

        Ok(model.map(|m| m.into()))
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Username.eq(username))
            .one(self.base.db())
            .await
            .map_err(store_err)?;

        Ok(model.map(|m| m.into()))
    }

    async fn exists_by_email(&self, email: &str) -> UserResult<bool> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(self.base.db())
            .await
            .map_err(store_err)?;

        Ok(model.is_some())
    }

    async fn exists_by_username(&self, username: &str) -> UserResult<bool> {
        let model = entity::Entity::find()
            .filter(entity::Column::Username.eq(username))
            .one(self.base.db())
            .await
            .map_err(store_err)?;

        Ok(model.is_some())
    }

    async fn save(&self, user: User) -> UserResult<User> {
        let is_new = user.id == 0;
        let active_model: entity::ActiveModel = user.clone().into();

        let model = if is_new {
            self.base
                .insert(active_model)
                .await
                .map_err(|e| save_err(e, &user))?
        } else {
            self.base
                .update(active_model)
                .await
                .map_err(|e| save_err(e, &user))?
        };

        if is_new {
            tracing::info!(user_id = %model.id, "Created user");
        } else {
            tracing::info!(user_id = %model.id, "Updated user");
        }
        Ok(model.into())
    }

    async fn find_active(&self) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .filter(entity::Column::IsActive.eq(true))
            .all(self.base.db())
            .await
            .map_err(store_err)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_role(&self, role: Role) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .filter(entity::Column::Role.eq(role))
            .all(self.base.db())
            .await
            .map_err(store_err)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_name_containing(&self, term: &str) -> UserResult<Vec<User>> {
        let pattern = format!("%{}%", term);

        let models = entity::Entity::find()
            .filter(
                Condition::any()
                    .add(Expr::col(entity::Column::FirstName).ilike(pattern.clone()))
                    .add(Expr::col(entity::Column::LastName).ilike(pattern)),
            )
            .all(self.base.db())
            .await
            .map_err(store_err)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }
}
