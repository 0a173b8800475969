use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
    CreateError, DeleteError, HeightUnit, ReadError, Sex, UpdateError, UserID, Username,
    WeightUnit,
};

uuid_id!(FriendRequestID);
uuid_id!(FriendshipID);

#[allow(async_fn_in_trait)]
pub trait FriendService {
    async fn search_users(&self, query: &str) -> Result<Vec<FriendProfile>, ReadError>;
    async fn send_friend_request(&self, receiver: UserID) -> Result<FriendRequest, CreateError>;
    async fn get_pending_friend_requests(&self) -> Result<Vec<FriendRequest>, ReadError>;
    async fn accept_friend_request(
        &self,
        id: FriendRequestID,
    ) -> Result<FriendRequestID, UpdateError>;
    async fn decline_friend_request(
        &self,
        id: FriendRequestID,
    ) -> Result<FriendRequestID, UpdateError>;
    async fn get_friends(&self) -> Result<Vec<Friendship>, ReadError>;
    async fn remove_friend(&self, friend: UserID) -> Result<UserID, DeleteError>;
}

/// Relationship integrity is enforced by the backend. Accepting, declining and removing are
/// executed as server-side procedures.
#[allow(async_fn_in_trait)]
pub trait FriendRepository {
    async fn search_profiles(
        &self,
        query: &str,
        exclude: UserID,
        limit: usize,
    ) -> Result<Vec<FriendProfile>, ReadError>;
    /// Requests sent or received by the given user.
    async fn read_friend_requests(&self, user: UserID) -> Result<Vec<FriendRequest>, ReadError>;
    async fn create_friend_request(
        &self,
        sender: UserID,
        receiver: UserID,
    ) -> Result<FriendRequest, CreateError>;
    async fn accept_friend_request(
        &self,
        id: FriendRequestID,
    ) -> Result<FriendRequestID, UpdateError>;
    async fn decline_friend_request(
        &self,
        id: FriendRequestID,
    ) -> Result<FriendRequestID, UpdateError>;
    async fn read_friendships(&self, user: UserID) -> Result<Vec<Friendship>, ReadError>;
    async fn delete_friendship(&self, friend: UserID) -> Result<UserID, DeleteError>;
}

/// Publicly visible part of a user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendProfile {
    pub id: UserID,
    pub username: Username,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub date_of_birth: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub weight: Option<f32>,
    #[serde(default)]
    pub weight_unit: WeightUnit,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub height_unit: HeightUnit,
    #[serde(default)]
    pub fitness_goals: Option<String>,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    Pending,
    Accepted,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendRequest {
    pub id: FriendRequestID,
    pub sender_id: UserID,
    pub receiver_id: UserID,
    pub status: FriendRequestStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub sender_profile: Option<FriendProfile>,
}

impl FriendRequest {
    /// Whether the request was sent from one of the users to the other, in either direction.
    #[must_use]
    pub fn connects(&self, a: UserID, b: UserID) -> bool {
        (self.sender_id == a && self.receiver_id == b)
            || (self.sender_id == b && self.receiver_id == a)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friendship {
    pub id: FriendshipID,
    pub user_id: UserID,
    pub friend_id: UserID,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub friend_profile: Option<FriendProfile>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn request(sender: u128, receiver: u128, status: FriendRequestStatus) -> FriendRequest {
        FriendRequest {
            id: 1.into(),
            sender_id: sender.into(),
            receiver_id: receiver.into(),
            status,
            created_at: DateTime::<Utc>::default(),
            sender_profile: None,
        }
    }

    #[rstest]
    #[case(1, 2, true)]
    #[case(2, 1, true)]
    #[case(1, 3, false)]
    #[case(3, 2, false)]
    fn test_friend_request_connects(#[case] a: u128, #[case] b: u128, #[case] expected: bool) {
        assert_eq!(
            request(1, 2, FriendRequestStatus::Pending).connects(a.into(), b.into()),
            expected
        );
    }

    #[test]
    fn test_deserialize_friend_request_row() {
        let request: FriendRequest = serde_json::from_value(json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "sender_id": "00000000-0000-0000-0000-000000000002",
            "receiver_id": "00000000-0000-0000-0000-000000000003",
            "status": "pending",
            "created_at": "2024-05-01T10:00:00.123456+00:00",
            "updated_at": "2024-05-01T10:00:00.123456+00:00",
            "sender_profile": {
                "id": "00000000-0000-0000-0000-000000000002",
                "username": "bob",
                "weight": 80.5,
                "weight_unit": "kg"
            }
        }))
        .unwrap();
        assert_eq!(request.status, FriendRequestStatus::Pending);
        assert_eq!(request.sender_id, UserID::from(2));
        assert_eq!(
            request.sender_profile.map(|p| p.username),
            Some(Username::new("bob").unwrap())
        );
    }
}
