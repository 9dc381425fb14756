//! User accounts, avatars and author subscriptions.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::entities::{NewUser, Recipe, User};
use crate::domain::repositories::{RecipeRepository, SubscriptionRepository, UserRepository};
use crate::error::{AppError, conflict_constraint};
use crate::infrastructure::media::MediaStorage;
use crate::utils::image::decode_data_uri;
use crate::utils::password::{hash_password, validate_password_policy, verify_password};

/// Folder for avatar images inside media storage.
pub const AVATAR_FOLDER: &str = "users";

/// Registration input. Field formats are validated at the API boundary.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// An author together with a preview of their recipes.
#[derive(Debug, Clone)]
pub struct AuthorWithRecipes {
    pub author: User,
    pub recipes: Vec<Recipe>,
    pub recipes_count: i64,
}

/// Service for user accounts and subscriptions.
pub struct UserService<U, S, R>
where
    U: UserRepository,
    S: SubscriptionRepository,
    R: RecipeRepository,
{
    users: Arc<U>,
    subscriptions: Arc<S>,
    recipes: Arc<R>,
    media: Arc<dyn MediaStorage>,
}

impl<U, S, R> UserService<U, S, R>
where
    U: UserRepository,
    S: SubscriptionRepository,
    R: RecipeRepository,
{
    /// Creates a new user service.
    pub fn new(
        users: Arc<U>,
        subscriptions: Arc<S>,
        recipes: Arc<R>,
        media: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            users,
            subscriptions,
            recipes,
            media,
        }
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the password violates the policy
    /// or the email or username is already taken.
    pub async fn register(
        &self,
        registration: Registration,
        is_staff: bool,
    ) -> Result<User, AppError> {
        validate_password_policy("password", &registration.password)?;

        if self
            .users
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(taken("email"));
        }
        if self
            .users
            .find_by_username(&registration.username)
            .await?
            .is_some()
        {
            return Err(taken("username"));
        }

        let new_user = NewUser {
            email: registration.email,
            username: registration.username,
            first_name: registration.first_name,
            last_name: registration.last_name,
            password_hash: hash_password(&registration.password)?,
            is_staff,
        };

        let user = self.users.create(new_user).await.map_err(|err| {
            let field = conflict_constraint(&err).and_then(|c| {
                ["email", "username"].into_iter().find(|f| c.contains(f))
            });
            match field {
                Some(field) => taken(field),
                None => err,
            }
        })?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Loads a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    pub async fn get(&self, id: i64) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))
    }

    /// Returns one page of users and the total count.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<User>, i64), AppError> {
        let count = self.users.count().await?;
        let users = self.users.list(offset, limit).await?;
        Ok((users, count))
    }

    /// Returns which of `author_ids` the viewer follows. Anonymous viewers
    /// follow nobody.
    pub async fn subscribed_among(
        &self,
        viewer: Option<&User>,
        author_ids: &[i64],
    ) -> Result<HashSet<i64>, AppError> {
        let Some(viewer) = viewer else {
            return Ok(HashSet::new());
        };

        Ok(self
            .subscriptions
            .subscribed_author_ids(viewer.id, author_ids)
            .await?
            .into_iter()
            .collect())
    }

    /// Changes the password after checking the current one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the current password is wrong or
    /// the new password violates the policy.
    pub async fn set_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if !verify_password(current_password, &user.password_hash)? {
            return Err(AppError::bad_request(
                "Invalid password",
                json!({ "current_password": ["Invalid password"] }),
            ));
        }

        validate_password_policy("new_password", new_password)?;

        self.users
            .update_password(user.id, &hash_password(new_password)?)
            .await?;

        info!(user_id = user.id, "Password changed");
        Ok(())
    }

    /// Stores a new avatar from a base64 data URI and returns its media path.
    ///
    /// The previous avatar file, if any, is removed.
    pub async fn set_avatar(&self, user: &User, data_uri: &str) -> Result<String, AppError> {
        let image = decode_data_uri("avatar", data_uri)?;
        let path = self.media.save(AVATAR_FOLDER, image).await?;

        self.users.set_avatar(user.id, Some(path.clone())).await?;

        if let Some(old) = &user.avatar {
            self.media.delete(old).await?;
        }

        Ok(path)
    }

    /// Clears the avatar and removes its file.
    pub async fn remove_avatar(&self, user: &User) -> Result<(), AppError> {
        self.users.set_avatar(user.id, None).await?;

        if let Some(old) = &user.avatar {
            self.media.delete(old).await?;
        }

        Ok(())
    }

    /// Subscribes `user` to `author_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the author does not exist.
    /// Returns [`AppError::Validation`] on self-subscription or if already
    /// subscribed.
    pub async fn subscribe(
        &self,
        user: &User,
        author_id: i64,
        recipes_limit: Option<i64>,
    ) -> Result<AuthorWithRecipes, AppError> {
        let author = self.get(author_id).await?;

        if author.id == user.id {
            return Err(AppError::bad_request(
                "You cannot subscribe to yourself",
                json!({ "author": ["You cannot subscribe to yourself"] }),
            ));
        }

        if !self.subscriptions.subscribe(user.id, author.id).await? {
            return Err(AppError::bad_request(
                "Already subscribed",
                json!({ "author": ["Already subscribed to this author"] }),
            ));
        }

        info!(user_id = user.id, author_id = author.id, "Subscribed");

        let mut authors = self.with_recipes(vec![author], recipes_limit).await?;
        authors
            .pop()
            .ok_or_else(|| AppError::internal("Subscription author vanished", json!({})))
    }

    /// Removes a subscription.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the author does not exist.
    /// Returns [`AppError::Validation`] if there was no subscription.
    pub async fn unsubscribe(&self, user: &User, author_id: i64) -> Result<(), AppError> {
        let author = self.get(author_id).await?;

        if !self.subscriptions.unsubscribe(user.id, author.id).await? {
            return Err(AppError::bad_request(
                "Not subscribed",
                json!({ "author": ["You are not subscribed to this author"] }),
            ));
        }

        info!(user_id = user.id, author_id = author.id, "Unsubscribed");
        Ok(())
    }

    /// Returns one page of followed authors with their recipe previews.
    pub async fn subscriptions(
        &self,
        user: &User,
        offset: i64,
        limit: i64,
        recipes_limit: Option<i64>,
    ) -> Result<(Vec<AuthorWithRecipes>, i64), AppError> {
        let count = self.subscriptions.count_authors(user.id).await?;
        let authors = self
            .subscriptions
            .list_authors(user.id, offset, limit)
            .await?;

        Ok((self.with_recipes(authors, recipes_limit).await?, count))
    }

    async fn with_recipes(
        &self,
        authors: Vec<User>,
        recipes_limit: Option<i64>,
    ) -> Result<Vec<AuthorWithRecipes>, AppError> {
        let ids: Vec<i64> = authors.iter().map(|a| a.id).collect();
        let counts: std::collections::HashMap<i64, i64> =
            self.recipes.count_by_authors(&ids).await?.into_iter().collect();

        let mut result = Vec::with_capacity(authors.len());
        for author in authors {
            let recipes = self.recipes.list_by_author(author.id, recipes_limit).await?;
            result.push(AuthorWithRecipes {
                recipes_count: counts.get(&author.id).copied().unwrap_or(0),
                recipes,
                author,
            });
        }

        Ok(result)
    }
}

fn taken(field: &str) -> AppError {
    AppError::bad_request(
        format!("A user with that {} already exists", field),
        json!({ field: [format!("A user with that {} already exists", field)] }),
    )
}
