#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

macro_rules! uuid_id {
    ($name: ident) => {
        #[derive(
            derive_more::Deref,
            derive_more::Display,
            Debug,
            Default,
            Clone,
            Copy,
            Hash,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            #[must_use]
            pub fn nil() -> Self {
                Self(uuid::Uuid::nil())
            }

            #[must_use]
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(value: uuid::Uuid) -> Self {
                Self(value)
            }
        }

        impl From<u128> for $name {
            fn from(value: u128) -> Self {
                Self(uuid::Uuid::from_bytes(value.to_be_bytes()))
            }
        }
    };
}

mod error;
mod friend;
mod generator;
mod history;
mod name;
mod params;
mod profile;
mod prompt;
pub mod resource;
mod service;
mod session;
mod settings;
mod workout;

pub use error::*;
pub use friend::*;
pub use generator::*;
pub use history::*;
pub use name::*;
pub use params::*;
pub use profile::*;
pub use prompt::*;
pub use resource::{
    EXERCISE_RESOURCES, ExerciseResource, MatchTier, Resolution, ResourceTable,
    find_exercise_resource, find_exercise_video,
};
pub use service::*;
pub use session::*;
pub use settings::*;
pub use workout::*;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_uuid_id_nil() {
        assert!(UserID::nil().is_nil());
        assert_eq!(UserID::nil(), UserID::default());
        assert!(!UserID::from(1).is_nil());
    }

    #[test]
    fn test_uuid_id_serialization() {
        assert_eq!(
            serde_json::to_value(WorkoutID::from(1)).unwrap(),
            serde_json::json!("00000000-0000-0000-0000-000000000001")
        );
        assert_eq!(
            serde_json::from_str::<FriendRequestID>("\"00000000-0000-0000-0000-000000000002\"")
                .unwrap(),
            FriendRequestID::from(2)
        );
    }
}
