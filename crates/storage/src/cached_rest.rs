//! Cached REST
//!
//! The `REST` backend is the authoritative data source. The authentication session is mirrored
//! into the local storage, so that a reload of the app keeps the user signed in. Settings and
//! the workout draft only exist on the device.

use log::error;
use vibefit_domain as domain;

use super::config::Config;
use super::local_storage::LocalStorage;
use super::rest::{GlooNetSendRequest, REST, SendRequest};

/// Forget the stored session if the backend rejected it.
macro_rules! authorized {
    ($self: ident, $error: ident, $call: expr) => {{
        let result = $call.await;
        if let Err(domain::$error::Storage(domain::StorageError::NoSession)) = result {
            $self.local.remove_session();
        }
        result
    }};
}

#[derive(Clone)]
pub struct CachedREST<S: SendRequest> {
    pub rest: REST<S>,
    pub local: LocalStorage,
}

impl CachedREST<GlooNetSendRequest> {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_rest(REST::new(config))
    }
}

impl Default for CachedREST<GlooNetSendRequest> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<S: SendRequest> CachedREST<S> {
    /// Resume the stored session, if any.
    pub fn with_rest(rest: REST<S>) -> Self {
        let cached_rest = Self {
            rest,
            local: LocalStorage,
        };
        cached_rest.restore_session();
        cached_rest
    }

    fn restore_session(&self) {
        if self.rest.session().is_some() {
            return;
        }
        match self.local.read_session() {
            Ok(Some(session)) => self.rest.set_session(Some(session)),
            Ok(None) => {}
            Err(err) => {
                error!("failed to read session from local storage: {err}");
                self.local.remove_session();
            }
        }
    }

    fn store_session(&self) {
        if let Some(session) = self.rest.session() {
            if let Err(err) = self.local.write_session(&session) {
                error!("failed to write session into local storage: {err}");
            }
        }
    }
}

impl<S: SendRequest> domain::SessionRepository for CachedREST<S> {
    async fn sign_up(
        &self,
        email: &str,
        password: &domain::Password,
        username: &domain::Username,
    ) -> Result<domain::User, domain::CreateError> {
        let user = self.rest.sign_up(email, password, username).await?;
        self.store_session();
        Ok(user)
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &domain::Password,
    ) -> Result<domain::User, domain::ReadError> {
        let user = self.rest.sign_in(email, password).await?;
        self.store_session();
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), domain::DeleteError> {
        self.restore_session();
        let result = self.rest.sign_out().await;
        self.local.remove_session();
        result
    }

    async fn read_session(&self) -> Result<domain::User, domain::ReadError> {
        self.restore_session();
        self.rest.read_session().await
    }
}

impl<S: SendRequest> domain::ProfileRepository for CachedREST<S> {
    async fn read_profile(
        &self,
        id: domain::UserID,
    ) -> Result<domain::UserProfile, domain::ReadError> {
        authorized!(self, ReadError, self.rest.read_profile(id))
    }

    async fn read_profile_by_username(
        &self,
        username: &domain::Username,
    ) -> Result<Option<domain::UserProfile>, domain::ReadError> {
        authorized!(self, ReadError, self.rest.read_profile_by_username(username))
    }

    async fn replace_profile(
        &self,
        profile: domain::UserProfile,
    ) -> Result<domain::UserProfile, domain::UpdateError> {
        authorized!(self, UpdateError, self.rest.replace_profile(profile))
    }

    async fn upload_profile_picture(
        &self,
        id: domain::UserID,
        image: Vec<u8>,
        content_type: &str,
    ) -> Result<String, domain::UpdateError> {
        authorized!(
            self,
            UpdateError,
            self.rest.upload_profile_picture(id, image, content_type)
        )
    }

    async fn delete_profile_picture(&self, id: domain::UserID) -> Result<(), domain::DeleteError> {
        authorized!(self, DeleteError, self.rest.delete_profile_picture(id))
    }
}

impl<S: SendRequest> domain::WorkoutHistoryRepository for CachedREST<S> {
    async fn read_workouts(
        &self,
        user: domain::UserID,
    ) -> Result<Vec<domain::WorkoutHistory>, domain::ReadError> {
        authorized!(self, ReadError, self.rest.read_workouts(user))
    }

    async fn create_workout(
        &self,
        user: domain::UserID,
        params: domain::WorkoutParams,
        workout: domain::WorkoutPlan,
    ) -> Result<domain::WorkoutHistory, domain::CreateError> {
        authorized!(
            self,
            CreateError,
            self.rest.create_workout(user, params, workout)
        )
    }

    async fn complete_workout(
        &self,
        id: domain::WorkoutID,
        user: domain::UserID,
        rating: Option<domain::Rating>,
    ) -> Result<domain::WorkoutHistory, domain::UpdateError> {
        authorized!(
            self,
            UpdateError,
            self.rest.complete_workout(id, user, rating)
        )
    }

    async fn delete_workout(
        &self,
        id: domain::WorkoutID,
        user: domain::UserID,
    ) -> Result<domain::WorkoutID, domain::DeleteError> {
        authorized!(self, DeleteError, self.rest.delete_workout(id, user))
    }

    async fn read_completed_workouts(
        &self,
        user: domain::UserID,
        limit: usize,
    ) -> Result<Vec<domain::WorkoutHistory>, domain::ReadError> {
        authorized!(
            self,
            ReadError,
            self.rest.read_completed_workouts(user, limit)
        )
    }
}

impl<S: SendRequest> domain::FriendRepository for CachedREST<S> {
    async fn search_profiles(
        &self,
        query: &str,
        exclude: domain::UserID,
        limit: usize,
    ) -> Result<Vec<domain::FriendProfile>, domain::ReadError> {
        authorized!(
            self,
            ReadError,
            self.rest.search_profiles(query, exclude, limit)
        )
    }

    async fn read_friend_requests(
        &self,
        user: domain::UserID,
    ) -> Result<Vec<domain::FriendRequest>, domain::ReadError> {
        authorized!(self, ReadError, self.rest.read_friend_requests(user))
    }

    async fn create_friend_request(
        &self,
        sender: domain::UserID,
        receiver: domain::UserID,
    ) -> Result<domain::FriendRequest, domain::CreateError> {
        authorized!(
            self,
            CreateError,
            self.rest.create_friend_request(sender, receiver)
        )
    }

    async fn accept_friend_request(
        &self,
        id: domain::FriendRequestID,
    ) -> Result<domain::FriendRequestID, domain::UpdateError> {
        authorized!(self, UpdateError, self.rest.accept_friend_request(id))
    }

    async fn decline_friend_request(
        &self,
        id: domain::FriendRequestID,
    ) -> Result<domain::FriendRequestID, domain::UpdateError> {
        authorized!(self, UpdateError, self.rest.decline_friend_request(id))
    }

    async fn read_friendships(
        &self,
        user: domain::UserID,
    ) -> Result<Vec<domain::Friendship>, domain::ReadError> {
        authorized!(self, ReadError, self.rest.read_friendships(user))
    }

    async fn delete_friendship(
        &self,
        friend: domain::UserID,
    ) -> Result<domain::UserID, domain::DeleteError> {
        authorized!(self, DeleteError, self.rest.delete_friendship(friend))
    }
}

impl<S: SendRequest> domain::CompletionRepository for CachedREST<S> {
    async fn complete(
        &self,
        request: domain::CompletionRequest,
    ) -> Result<String, domain::ReadError> {
        self.rest.complete(request).await
    }
}

impl<S: SendRequest> domain::SettingsRepository for CachedREST<S> {
    async fn read_settings(&self) -> Result<domain::Settings, domain::ReadError> {
        self.local.read_settings().await
    }

    async fn write_settings(&self, settings: domain::Settings) -> Result<(), domain::UpdateError> {
        self.local.write_settings(settings).await
    }
}

impl<S: SendRequest> domain::WorkoutDraftRepository for CachedREST<S> {
    async fn read_workout_draft(
        &self,
    ) -> Result<Option<domain::WorkoutBuilder>, domain::ReadError> {
        self.local.read_workout_draft().await
    }

    async fn write_workout_draft(
        &self,
        draft: &domain::WorkoutBuilder,
    ) -> Result<(), domain::UpdateError> {
        self.local.write_workout_draft(draft).await
    }

    async fn delete_workout_draft(&self) -> Result<(), domain::DeleteError> {
        self.local.delete_workout_draft().await
    }
}
