#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

use chrono::{DateTime, NaiveDate};
use serde_json::json;
use vibefit_domain as domain;

use crate::rest::{AuthSession, AuthUser};

pub static USER: std::sync::LazyLock<domain::User> = std::sync::LazyLock::new(|| domain::User {
    id: 1.into(),
    email: "alice@example.com".to_string(),
});

pub static SESSION: std::sync::LazyLock<AuthSession> =
    std::sync::LazyLock::new(|| AuthSession {
        access_token: "access-token".to_string(),
        refresh_token: "refresh-token".to_string(),
        user: AuthUser {
            id: *USER.id,
            email: Some(USER.email.clone()),
        },
    });

pub static PROFILE: std::sync::LazyLock<domain::UserProfile> =
    std::sync::LazyLock::new(|| domain::UserProfile {
        sex: Some(domain::Sex::Woman),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17),
        weight: Some(62.5),
        weight_unit: domain::WeightUnit::Kg,
        height: Some(168.0),
        height_unit: domain::HeightUnit::Cm,
        fitness_level: Some(domain::FitnessLevel::Intermediate),
        fitness_goals: Some("Run a half marathon".to_string()),
        ..domain::UserProfile::new(USER.id, domain::Username::new("alice").unwrap())
    });

pub fn profile_row() -> serde_json::Value {
    json!({
        "id": "00000000-0000-0000-0000-000000000001",
        "username": "alice",
        "sex": "woman",
        "date_of_birth": "1990-05-17",
        "weight": 62.5,
        "weight_unit": "kg",
        "height": 168.0,
        "height_unit": "cm",
        "fitness_level": "intermediate",
        "fitness_goals": "Run a half marathon",
        "injuries": "",
        "profile_picture_url": null,
        "created_at": "2024-01-01T12:00:00+00:00",
    })
}

pub static FRIEND_PROFILE: std::sync::LazyLock<domain::FriendProfile> =
    std::sync::LazyLock::new(|| domain::FriendProfile {
        id: 2.into(),
        username: domain::Username::new("bob").unwrap(),
        sex: Some(domain::Sex::Male),
        date_of_birth: None,
        weight: Some(180.0),
        weight_unit: domain::WeightUnit::Lb,
        height: None,
        height_unit: domain::HeightUnit::Cm,
        fitness_goals: None,
    });

pub static FRIEND_REQUEST: std::sync::LazyLock<domain::FriendRequest> =
    std::sync::LazyLock::new(|| domain::FriendRequest {
        id: 1.into(),
        sender_id: FRIEND_PROFILE.id,
        receiver_id: USER.id,
        status: domain::FriendRequestStatus::Pending,
        created_at: DateTime::parse_from_rfc3339("2024-03-02T10:30:00Z")
            .unwrap()
            .to_utc(),
        sender_profile: Some(FRIEND_PROFILE.clone()),
    });

pub fn friend_request_row() -> serde_json::Value {
    json!({
        "id": "00000000-0000-0000-0000-000000000001",
        "sender_id": "00000000-0000-0000-0000-000000000002",
        "receiver_id": "00000000-0000-0000-0000-000000000001",
        "status": "pending",
        "created_at": "2024-03-02T10:30:00+00:00",
        "updated_at": "2024-03-02T10:30:00+00:00",
        "sender_profile": {
            "id": "00000000-0000-0000-0000-000000000002",
            "username": "bob",
            "sex": "male",
            "date_of_birth": null,
            "weight": 180.0,
            "weight_unit": "lb",
            "height": null,
            "height_unit": "cm",
            "fitness_goals": null,
        },
    })
}

pub static WORKOUT: std::sync::LazyLock<domain::WorkoutHistory> =
    std::sync::LazyLock::new(|| domain::WorkoutHistory {
        id: 1.into(),
        user_id: USER.id,
        params: domain::WorkoutParams {
            workout_type: domain::WorkoutType::Strength,
            time_available: domain::TimeAvailable::Minutes25To40,
            mood: domain::Mood::Energetic,
            muscle_focus: domain::MuscleFocus::UpperBody,
            equipment: [domain::Equipment::Dumbbells, domain::Equipment::Bands].into(),
        },
        workout: domain::WorkoutPlan {
            title: "Upper Body Burner".to_string(),
            description: "Push and pull supersets".to_string(),
            exercises: vec![domain::WorkoutExercise {
                name: "Push-Ups".to_string(),
                sets: Some(3),
                reps: Some("10-12".to_string()),
                rest_between_sets: Some("60 seconds".to_string()),
                instructions: "Keep your body straight.".to_string(),
                ..domain::WorkoutExercise::default()
            }],
            warmup: Some("Arm circles".to_string()),
            cooldown: None,
            total_time: Some("30 minutes".to_string()),
            difficulty: "intermediate".to_string(),
        },
        completed: true,
        rating: Some(domain::Rating::new(4).unwrap()),
        created_at: DateTime::parse_from_rfc3339("2024-03-01T08:00:00Z")
            .unwrap()
            .to_utc(),
    });

pub fn workout_row() -> serde_json::Value {
    json!({
        "id": "00000000-0000-0000-0000-000000000001",
        "user_id": "00000000-0000-0000-0000-000000000001",
        "workout_type": "strength",
        "time_available": "25-40",
        "mood": "energetic",
        "muscle_focus": "upper-body",
        "equipment": "dumbbells,bands",
        "workout_data": {
            "title": "Upper Body Burner",
            "description": "Push and pull supersets",
            "exercises": [{
                "name": "Push-Ups",
                "sets": 3,
                "reps": "10-12",
                "restBetweenSets": "60 seconds",
                "instructions": "Keep your body straight.",
            }],
            "warmup": "Arm circles",
            "totalTime": "30 minutes",
            "difficulty": "intermediate",
        },
        "completed": true,
        "rating": 4,
        "created_at": "2024-03-01T08:00:00+00:00",
    })
}
