use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::entities::{user, User, UserModel};
use crate::errors::{self, ServiceError};
use crate::events::{Event, EventSender};

/// Service for the accounts that own purchase orders.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Create a new user
    #[instrument(skip(self))]
    pub async fn create_user(&self, input: CreateUserInput) -> Result<UserModel, ServiceError> {
        input.validate()?;

        let existing = User::find()
            .filter(user::Column::Email.eq(&input.email))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "User with email {} already exists",
                input.email
            )));
        }

        let user_id = Uuid::new_v4();
        let user = user::ActiveModel {
            id: Set(user_id),
            name: Set(input.name.clone()),
            email: Set(input.email.clone()),
            created_at: Set(Utc::now()),
        };

        let user = match user.insert(&*self.db).await {
            Ok(user) => user,
            Err(err) if errors::is_unique_violation(&err, "email") => {
                return Err(ServiceError::Conflict(format!(
                    "User with email {} already exists",
                    input.email
                )));
            }
            Err(err) => return Err(err.into()),
        };

        self.event_sender
            .send_or_log(Event::UserCreated(user_id))
            .await;

        info!("Created user: {}", user_id);
        Ok(user)
    }

    /// Get a user by ID
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Uuid) -> Result<UserModel, ServiceError> {
        User::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))
    }

    /// Delete a user. Their purchase orders (and those orders' items and
    /// payment allocations) cascade away.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), ServiceError> {
        let user = self.get_user(user_id).await?;

        let active: user::ActiveModel = user.into();
        active.delete(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::UserDeleted(user_id))
            .await;

        info!("Deleted user: {}", user_id);
        Ok(())
    }
}

/// Input for creating a user
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_must_be_valid() {
        let input = CreateUserInput {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
        };
        assert!(input.validate().is_err());

        let input = CreateUserInput {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        };
        assert!(input.validate().is_ok());
    }
}
