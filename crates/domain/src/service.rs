use chrono::Utc;
use log::{debug, error, warn};

use crate::{
    CompletionRepository, CompletionRequest, CreateError, DeleteError, FRIEND_HISTORY_LIMIT,
    FriendProfile, FriendRepository, FriendRequest, FriendRequestID, FriendRequestStatus,
    FriendService, Friendship, GenerateError, Password, ProfileRepository, ProfileService,
    Rating, ReadError, SYSTEM_PROMPT, SessionRepository, SessionService, Settings,
    SettingsRepository, SettingsService, StorageError, UpdateError, User, UserID, UserProfile,
    Username, ValidationError, WorkoutBuilder, WorkoutDraftRepository, WorkoutDraftService,
    WorkoutHistory, WorkoutHistoryRepository, WorkoutHistoryService, WorkoutID, WorkoutParams,
    WorkoutPlan, WorkoutService, build_workout_prompt, sort_by_recency,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: SessionRepository> Service<R> {
    async fn current_user(&self) -> Result<User, ReadError> {
        self.repository.read_session().await
    }
}

impl<R: SettingsRepository> Service<R> {
    async fn settings_or_default(&self) -> Settings {
        self.repository.read_settings().await.unwrap_or_else(|err| {
            warn!("failed to read settings, using defaults: {err}");
            Settings::default()
        })
    }
}

impl<R: SessionRepository + ProfileRepository> SessionService for Service<R> {
    async fn sign_up(
        &self,
        email: &str,
        password: &Password,
        username: &Username,
    ) -> Result<User, CreateError> {
        log_on_error!(
            self.sign_up_with_unique_username(email, password, username),
            CreateError,
            "sign up",
            "user"
        )
    }

    async fn sign_in(&self, email: &str, password: &Password) -> Result<User, ReadError> {
        log_on_error!(
            self.repository.sign_in(email, password),
            ReadError,
            "sign in",
            "user"
        )
    }

    async fn sign_out(&self) -> Result<(), DeleteError> {
        log_on_error!(
            self.repository.sign_out(),
            DeleteError,
            "delete",
            "session"
        )
    }

    async fn get_session(&self) -> Result<User, ReadError> {
        let result = self.repository.read_session().await;
        match result {
            Ok(_) | Err(ReadError::Storage(StorageError::NoSession)) => {}
            Err(ref err) => match err {
                ReadError::Storage(StorageError::NoConnection) => {
                    debug!("failed to get session: {err}");
                }
                _ => {
                    error!("failed to get session: {err}");
                }
            },
        }
        result
    }
}

impl<R: SessionRepository + ProfileRepository> Service<R> {
    async fn sign_up_with_unique_username(
        &self,
        email: &str,
        password: &Password,
        username: &Username,
    ) -> Result<User, CreateError> {
        if self
            .repository
            .read_profile_by_username(username)
            .await?
            .is_some()
        {
            return Err(CreateError::Conflict);
        }
        self.repository.sign_up(email, password, username).await
    }

    async fn read_own_profile(&self) -> Result<UserProfile, ReadError> {
        let user = self.current_user().await?;
        self.repository.read_profile(user.id).await
    }

    async fn upload_and_link_profile_picture(
        &self,
        image: Vec<u8>,
        content_type: &str,
    ) -> Result<UserProfile, UpdateError> {
        let mut profile = self.read_own_profile().await?;
        let url = self
            .repository
            .upload_profile_picture(profile.id, image, content_type)
            .await?;
        profile.profile_picture_url = Some(url);
        self.repository.replace_profile(profile).await
    }

    async fn delete_and_unlink_profile_picture(&self) -> Result<UserProfile, UpdateError> {
        let mut profile = self.read_own_profile().await?;
        self.repository.delete_profile_picture(profile.id).await?;
        profile.profile_picture_url = None;
        self.repository.replace_profile(profile).await
    }
}

impl<R: SessionRepository + ProfileRepository> ProfileService for Service<R> {
    async fn get_profile(&self) -> Result<UserProfile, ReadError> {
        log_on_error!(self.read_own_profile(), ReadError, "get", "profile")
    }

    async fn get_profile_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserProfile>, ReadError> {
        log_on_error!(
            self.repository.read_profile_by_username(username),
            ReadError,
            "get",
            "profile"
        )
    }

    async fn replace_profile(&self, profile: UserProfile) -> Result<UserProfile, UpdateError> {
        log_on_error!(
            self.repository.replace_profile(profile),
            UpdateError,
            "replace",
            "profile"
        )
    }

    async fn set_profile_picture(
        &self,
        image: Vec<u8>,
        content_type: &str,
    ) -> Result<UserProfile, UpdateError> {
        log_on_error!(
            self.upload_and_link_profile_picture(image, content_type),
            UpdateError,
            "set",
            "profile picture"
        )
    }

    async fn remove_profile_picture(&self) -> Result<UserProfile, UpdateError> {
        log_on_error!(
            self.delete_and_unlink_profile_picture(),
            UpdateError,
            "remove",
            "profile picture"
        )
    }
}

impl<R> Service<R>
where
    R: SessionRepository + ProfileRepository + SettingsRepository + CompletionRepository,
{
    async fn profile_for_prompt(&self) -> Option<UserProfile> {
        let user = match self.current_user().await {
            Ok(user) => user,
            Err(ReadError::Storage(StorageError::NoSession)) => return None,
            Err(err) => {
                warn!("failed to get session, generating workout without profile: {err}");
                return None;
            }
        };
        match self.repository.read_profile(user.id).await {
            Ok(profile) => Some(profile),
            Err(err) => {
                warn!("failed to get profile, generating workout without it: {err}");
                None
            }
        }
    }

    async fn request_workout(&self, params: &WorkoutParams) -> Result<WorkoutPlan, GenerateError> {
        let settings = self.settings_or_default().await;
        let profile = self.profile_for_prompt().await;
        let request = CompletionRequest {
            model: settings.completion_model,
            system_prompt: SYSTEM_PROMPT.to_string(),
            prompt: build_workout_prompt(params, profile.as_ref(), Utc::now().date_naive()),
            json_response: true,
        };
        let content = self.repository.complete(request).await?;
        let plan = WorkoutPlan::from_completion(&content)?;
        debug!(
            "generated workout \"{}\" with {} exercises",
            plan.title,
            plan.exercises.len()
        );
        if settings.suggest_resources {
            Ok(plan.with_resources())
        } else {
            Ok(plan)
        }
    }
}

impl<R> WorkoutService for Service<R>
where
    R: SessionRepository + ProfileRepository + SettingsRepository + CompletionRepository,
{
    async fn generate_workout(
        &self,
        params: &WorkoutParams,
    ) -> Result<WorkoutPlan, GenerateError> {
        let result = self.request_workout(params).await;
        if let Err(ref err) = result {
            match err {
                GenerateError::Completion(ReadError::Storage(StorageError::NoConnection)) => {
                    debug!("failed to generate workout: {err}");
                }
                _ => {
                    error!("failed to generate workout: {err}");
                }
            }
        }
        result
    }
}

impl<R: SessionRepository + WorkoutHistoryRepository> Service<R> {
    async fn read_own_workouts(&self) -> Result<Vec<WorkoutHistory>, ReadError> {
        let user = self.current_user().await?;
        let mut workouts = self.repository.read_workouts(user.id).await?;
        sort_by_recency(&mut workouts);
        Ok(workouts)
    }

    async fn create_own_workout(
        &self,
        params: WorkoutParams,
        workout: WorkoutPlan,
    ) -> Result<WorkoutHistory, CreateError> {
        let user = self.current_user().await?;
        self.repository
            .create_workout(user.id, params, workout)
            .await
    }

    async fn complete_own_workout(
        &self,
        id: WorkoutID,
        rating: Option<Rating>,
    ) -> Result<WorkoutHistory, UpdateError> {
        let user = self.current_user().await?;
        self.repository.complete_workout(id, user.id, rating).await
    }

    async fn delete_own_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError> {
        let user = self.current_user().await?;
        self.repository.delete_workout(id, user.id).await
    }

    async fn read_friend_workouts(&self, friend: UserID) -> Result<Vec<WorkoutHistory>, ReadError> {
        let mut workouts = self
            .repository
            .read_completed_workouts(friend, FRIEND_HISTORY_LIMIT)
            .await?;
        sort_by_recency(&mut workouts);
        workouts.truncate(FRIEND_HISTORY_LIMIT);
        Ok(workouts)
    }
}

impl<R: SessionRepository + WorkoutHistoryRepository> WorkoutHistoryService for Service<R> {
    async fn get_workouts(&self) -> Result<Vec<WorkoutHistory>, ReadError> {
        log_on_error!(self.read_own_workouts(), ReadError, "get", "workouts")
    }

    async fn save_workout(
        &self,
        params: WorkoutParams,
        workout: WorkoutPlan,
    ) -> Result<WorkoutHistory, CreateError> {
        log_on_error!(
            self.create_own_workout(params, workout),
            CreateError,
            "save",
            "workout"
        )
    }

    async fn complete_workout(
        &self,
        id: WorkoutID,
        rating: Option<Rating>,
    ) -> Result<WorkoutHistory, UpdateError> {
        log_on_error!(
            self.complete_own_workout(id, rating),
            UpdateError,
            "complete",
            "workout"
        )
    }

    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError> {
        log_on_error!(
            self.delete_own_workout(id),
            DeleteError,
            "delete",
            "workout"
        )
    }

    async fn get_friend_workouts(
        &self,
        friend: UserID,
    ) -> Result<Vec<WorkoutHistory>, ReadError> {
        log_on_error!(
            self.read_friend_workouts(friend),
            ReadError,
            "get",
            "friend workouts"
        )
    }
}

impl<R: SessionRepository + FriendRepository + SettingsRepository> Service<R> {
    async fn search_other_users(&self, query: &str) -> Result<Vec<FriendProfile>, ReadError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(vec![]);
        }
        let user = self.current_user().await?;
        let limit = self.settings_or_default().await.user_search_limit;
        self.repository.search_profiles(query, user.id, limit).await
    }

    async fn create_checked_friend_request(
        &self,
        receiver: UserID,
    ) -> Result<FriendRequest, CreateError> {
        let user = self.current_user().await?;
        if receiver == user.id {
            return Err(ValidationError::Other(
                "Cannot send a friend request to yourself".into(),
            )
            .into());
        }
        if self
            .repository
            .read_friendships(user.id)
            .await?
            .iter()
            .any(|f| f.friend_id == receiver || f.user_id == receiver)
        {
            return Err(CreateError::Conflict);
        }
        if self
            .repository
            .read_friend_requests(user.id)
            .await?
            .iter()
            .any(|r| r.connects(user.id, receiver))
        {
            return Err(CreateError::Conflict);
        }
        self.repository
            .create_friend_request(user.id, receiver)
            .await
    }

    async fn read_received_friend_requests(&self) -> Result<Vec<FriendRequest>, ReadError> {
        let user = self.current_user().await?;
        let mut requests = self
            .repository
            .read_friend_requests(user.id)
            .await?
            .into_iter()
            .filter(|r| r.receiver_id == user.id && r.status == FriendRequestStatus::Pending)
            .collect::<Vec<_>>();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn read_own_friendships(&self) -> Result<Vec<Friendship>, ReadError> {
        let user = self.current_user().await?;
        self.repository.read_friendships(user.id).await
    }
}

impl<R: SessionRepository + FriendRepository + SettingsRepository> FriendService for Service<R> {
    async fn search_users(&self, query: &str) -> Result<Vec<FriendProfile>, ReadError> {
        log_on_error!(self.search_other_users(query), ReadError, "search", "users")
    }

    async fn send_friend_request(&self, receiver: UserID) -> Result<FriendRequest, CreateError> {
        log_on_error!(
            self.create_checked_friend_request(receiver),
            CreateError,
            "send",
            "friend request"
        )
    }

    async fn get_pending_friend_requests(&self) -> Result<Vec<FriendRequest>, ReadError> {
        log_on_error!(
            self.read_received_friend_requests(),
            ReadError,
            "get",
            "friend requests"
        )
    }

    async fn accept_friend_request(
        &self,
        id: FriendRequestID,
    ) -> Result<FriendRequestID, UpdateError> {
        log_on_error!(
            self.repository.accept_friend_request(id),
            UpdateError,
            "accept",
            "friend request"
        )
    }

    async fn decline_friend_request(
        &self,
        id: FriendRequestID,
    ) -> Result<FriendRequestID, UpdateError> {
        log_on_error!(
            self.repository.decline_friend_request(id),
            UpdateError,
            "decline",
            "friend request"
        )
    }

    async fn get_friends(&self) -> Result<Vec<Friendship>, ReadError> {
        log_on_error!(self.read_own_friendships(), ReadError, "get", "friends")
    }

    async fn remove_friend(&self, friend: UserID) -> Result<UserID, DeleteError> {
        log_on_error!(
            self.repository.delete_friendship(friend),
            DeleteError,
            "remove",
            "friend"
        )
    }
}

impl<R: SettingsRepository> SettingsService for Service<R> {
    async fn get_settings(&self) -> Result<Settings, ReadError> {
        log_on_error!(
            self.repository.read_settings(),
            ReadError,
            "get",
            "settings"
        )
    }

    async fn set_settings(&self, settings: Settings) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.write_settings(settings),
            UpdateError,
            "set",
            "settings"
        )
    }
}

impl<R: WorkoutDraftRepository> WorkoutDraftService for Service<R> {
    async fn get_workout_draft(&self) -> Result<WorkoutBuilder, ReadError> {
        log_on_error!(
            self.repository.read_workout_draft(),
            ReadError,
            "get",
            "workout draft"
        )
        .map(Option::unwrap_or_default)
    }

    async fn set_workout_draft(&self, draft: WorkoutBuilder) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.write_workout_draft(&draft),
            UpdateError,
            "set",
            "workout draft"
        )
    }

    async fn discard_workout_draft(&self) -> Result<(), DeleteError> {
        log_on_error!(
            self.repository.delete_workout_draft(),
            DeleteError,
            "discard",
            "workout draft"
        )
    }
}
