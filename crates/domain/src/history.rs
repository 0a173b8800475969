use chrono::{DateTime, Utc};
use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};

use crate::{
    CreateError, DeleteError, ReadError, UpdateError, UserID, WorkoutParams, WorkoutPlan,
};

uuid_id!(WorkoutID);

/// Maximum number of completed workouts shown on a friend's profile.
pub const FRIEND_HISTORY_LIMIT: usize = 20;

#[allow(async_fn_in_trait)]
pub trait WorkoutHistoryService {
    async fn get_workouts(&self) -> Result<Vec<WorkoutHistory>, ReadError>;
    async fn save_workout(
        &self,
        params: WorkoutParams,
        workout: WorkoutPlan,
    ) -> Result<WorkoutHistory, CreateError>;
    async fn complete_workout(
        &self,
        id: WorkoutID,
        rating: Option<Rating>,
    ) -> Result<WorkoutHistory, UpdateError>;
    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError>;
    async fn get_friend_workouts(&self, friend: UserID)
    -> Result<Vec<WorkoutHistory>, ReadError>;
}

#[allow(async_fn_in_trait)]
pub trait WorkoutHistoryRepository {
    async fn read_workouts(&self, user: UserID) -> Result<Vec<WorkoutHistory>, ReadError>;
    async fn create_workout(
        &self,
        user: UserID,
        params: WorkoutParams,
        workout: WorkoutPlan,
    ) -> Result<WorkoutHistory, CreateError>;
    /// Only workouts owned by `user` are modified.
    async fn complete_workout(
        &self,
        id: WorkoutID,
        user: UserID,
        rating: Option<Rating>,
    ) -> Result<WorkoutHistory, UpdateError>;
    /// Only workouts owned by `user` are deleted.
    async fn delete_workout(&self, id: WorkoutID, user: UserID) -> Result<WorkoutID, DeleteError>;
    async fn read_completed_workouts(
        &self,
        user: UserID,
        limit: usize,
    ) -> Result<Vec<WorkoutHistory>, ReadError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutHistory {
    pub id: WorkoutID,
    pub user_id: UserID,
    #[serde(flatten)]
    pub params: WorkoutParams,
    #[serde(rename = "workout_data")]
    pub workout: WorkoutPlan,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub rating: Option<Rating>,
    pub created_at: DateTime<Utc>,
}

/// Sort newest first.
pub fn sort_by_recency(workouts: &mut [WorkoutHistory]) {
    workouts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[derive(Deref, Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self, RatingError> {
        if !(1..=5).contains(&value) {
            return Err(RatingError::OutOfRange(value));
        }
        Ok(Self(value))
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RatingError {
    #[error("Rating must be between 1 and 5 ({0})")]
    OutOfRange(u8),
}
