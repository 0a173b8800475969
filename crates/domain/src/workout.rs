use std::fmt;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::{ResourceTable, resource::EXERCISE_RESOURCES};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub exercises: Vec<WorkoutExercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmup: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub total_time: Option<String>,
    #[serde(default)]
    pub difficulty: String,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub sets: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub reps: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub rest_between_sets: Option<String>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum PlanError {
    #[error("empty workout plan")]
    Empty,
    #[error("invalid workout plan: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkoutPlan {
    /// Parse the JSON document returned by the completion API.
    pub fn from_completion(content: &str) -> Result<Self, PlanError> {
        if content.trim().is_empty() {
            return Err(PlanError::Empty);
        }
        Ok(serde_json::from_str(content)?)
    }

    /// Fill in missing demonstration resources from the built-in table.
    #[must_use]
    pub fn with_resources(self) -> Self {
        enhance_workout(self, &EXERCISE_RESOURCES)
    }

    #[must_use]
    pub fn num_sets(&self) -> u32 {
        self.exercises.iter().filter_map(|e| e.sets).sum()
    }
}

/// Add a demonstration resource to an exercise that has none.
///
/// A URL supplied by the generator always takes precedence over the table.
#[must_use]
pub fn enhance_exercise(mut exercise: WorkoutExercise, table: &ResourceTable) -> WorkoutExercise {
    let missing_video = is_missing(exercise.video_url.as_deref());
    let missing_image = is_missing(exercise.image_url.as_deref());

    if !missing_video && !missing_image {
        return exercise;
    }

    if let Some(resolution) = table.resolve(&exercise.name) {
        if missing_video {
            exercise.video_url = Some(resolution.resource.video_url.to_string());
        }
        if missing_image {
            exercise.image_url = resolution.resource.image_url.map(str::to_string);
        }
    } else {
        debug!("keeping \"{}\" without demonstration", exercise.name);
        if missing_video {
            exercise.video_url = None;
        }
        if missing_image {
            exercise.image_url = None;
        }
    }

    exercise
}

#[must_use]
pub fn enhance_workout(mut plan: WorkoutPlan, table: &ResourceTable) -> WorkoutPlan {
    plan.exercises = plan
        .exercises
        .into_iter()
        .map(|e| enhance_exercise(e, table))
        .collect();
    plan
}

fn is_missing(url: Option<&str>) -> bool {
    url.is_none_or(|u| u.trim().is_empty())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;

    impl de::Visitor<'_> for Visitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(Visitor)
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.and_then(|s| {
        s.split(|c: char| !c.is_ascii_digit())
            .find(|p| !p.is_empty())
            .and_then(|p| p.parse().ok())
    }))
}
