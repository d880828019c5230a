//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};

use crate::domain::{DomainError, DomainResult, ExternalProfile, User, UserRepository};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        google_id: model.google_id,
        name: model.name,
        email: model.email,
        created_at: model.created_at,
    }
}

fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_google_id(&self, google_id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::GoogleId.eq(google_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(user_model_to_domain))
    }

    async fn create(&self, profile: &ExternalProfile) -> DomainResult<User> {
        let new_user = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            google_id: Set(profile.provider_id.clone()),
            name: Set(profile.name.clone()),
            email: Set(profile.email.clone()),
            created_at: Set(Utc::now()),
        };

        let model = new_user.insert(&self.db).await.map_err(db_err)?;
        Ok(user_model_to_domain(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_database;

    #[tokio::test]
    async fn users_are_found_by_google_id() {
        let repo = SeaOrmUserRepository::new(test_database().await);
        let profile = ExternalProfile {
            provider_id: "google-123".into(),
            name: "Aki".into(),
            email: Some("aki@example.com".into()),
        };

        let created = repo.create(&profile).await.unwrap();
        let found = repo.find_by_google_id("google-123").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.email.as_deref(), Some("aki@example.com"));

        let by_id = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.google_id, "google-123");
        assert!(repo.find_by_google_id("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn google_id_is_unique() {
        let repo = SeaOrmUserRepository::new(test_database().await);
        let profile = ExternalProfile {
            provider_id: "google-123".into(),
            name: "Aki".into(),
            email: None,
        };
        repo.create(&profile).await.unwrap();
        assert!(matches!(repo.create(&profile).await, Err(DomainError::Storage(_))));
    }
}
