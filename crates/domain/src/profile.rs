use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{DeleteError, ReadError, UpdateError, UserID, Username, ValidationError};

#[allow(async_fn_in_trait)]
pub trait ProfileService {
    async fn get_profile(&self) -> Result<UserProfile, ReadError>;
    async fn get_profile_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserProfile>, ReadError>;
    async fn replace_profile(&self, profile: UserProfile) -> Result<UserProfile, UpdateError>;
    async fn set_profile_picture(
        &self,
        image: Vec<u8>,
        content_type: &str,
    ) -> Result<UserProfile, UpdateError>;
    async fn remove_profile_picture(&self) -> Result<UserProfile, UpdateError>;

    async fn validate_username(
        &self,
        username: &str,
        id: UserID,
    ) -> Result<Username, ValidationError> {
        match Username::new(username) {
            Ok(username) => match self.get_profile_by_username(&username).await {
                Ok(Some(profile)) if profile.id != id => {
                    Err(ValidationError::Conflict("username".to_string()))
                }
                Ok(_) => Ok(username),
                Err(err) => Err(ValidationError::Other(err.into())),
            },
            Err(err) => Err(ValidationError::Other(err.into())),
        }
    }

    fn validate_weight(&self, weight: &str) -> Result<f32, ValidationError> {
        validate_positive(weight, "Weight")
    }

    fn validate_height(&self, height: &str) -> Result<f32, ValidationError> {
        validate_positive(height, "Height")
    }
}

#[allow(async_fn_in_trait)]
pub trait ProfileRepository {
    async fn read_profile(&self, id: UserID) -> Result<UserProfile, ReadError>;
    async fn read_profile_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserProfile>, ReadError>;
    async fn replace_profile(&self, profile: UserProfile) -> Result<UserProfile, UpdateError>;
    /// Store the image and return its public URL.
    async fn upload_profile_picture(
        &self,
        id: UserID,
        image: Vec<u8>,
        content_type: &str,
    ) -> Result<String, UpdateError>;
    async fn delete_profile_picture(&self, id: UserID) -> Result<(), DeleteError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserID,
    pub username: Username,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub weight: Option<f32>,
    #[serde(default)]
    pub weight_unit: WeightUnit,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub height_unit: HeightUnit,
    #[serde(default)]
    pub fitness_level: Option<FitnessLevel>,
    #[serde(default, deserialize_with = "non_empty")]
    pub fitness_goals: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub injuries: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub profile_picture_url: Option<String>,
}

impl UserProfile {
    /// Profile as created at sign-up, carrying only the username.
    #[must_use]
    pub fn new(id: UserID, username: Username) -> Self {
        Self {
            id,
            username,
            sex: None,
            date_of_birth: None,
            weight: None,
            weight_unit: WeightUnit::default(),
            height: None,
            height_unit: HeightUnit::default(),
            fitness_level: None,
            fitness_goals: None,
            injuries: None,
            profile_picture_url: None,
        }
    }

    /// Full years since the date of birth.
    #[must_use]
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        today.years_since(self.date_of_birth?)
    }

    /// A profile counts as set up once the data used for workout generation is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.sex.is_some()
            && self.date_of_birth.is_some()
            && self.weight.is_some()
            && self.height.is_some()
            && self.fitness_level.is_some()
    }

    pub fn set_weight_unit(&mut self, unit: WeightUnit) {
        if unit != self.weight_unit {
            self.weight = self.weight.map(|w| self.weight_unit.convert(w, unit));
            self.weight_unit = unit;
        }
    }

    pub fn set_height_unit(&mut self, unit: HeightUnit) {
        if unit != self.height_unit {
            self.height = self.height.map(|h| self.height_unit.convert(h, unit));
            self.height_unit = unit;
        }
    }
}

#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Woman,
    Other,
}

#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
    Athletic,
    Professional,
}

const LB_PER_KG: f32 = 2.204_62;
const CM_PER_IN: f32 = 2.54;

#[derive(
    Debug, Default, Display, EnumString, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    #[must_use]
    pub fn convert(self, value: f32, to: WeightUnit) -> f32 {
        match (self, to) {
            (WeightUnit::Kg, WeightUnit::Lb) => round_to_tenth(value * LB_PER_KG),
            (WeightUnit::Lb, WeightUnit::Kg) => round_to_tenth(value / LB_PER_KG),
            _ => value,
        }
    }
}

#[derive(
    Debug, Default, Display, EnumString, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    #[default]
    Cm,
    In,
}

impl HeightUnit {
    #[must_use]
    pub fn convert(self, value: f32, to: HeightUnit) -> f32 {
        match (self, to) {
            (HeightUnit::Cm, HeightUnit::In) => round_to_tenth(value / CM_PER_IN),
            (HeightUnit::In, HeightUnit::Cm) => round_to_tenth(value * CM_PER_IN),
            _ => value,
        }
    }
}

fn round_to_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

fn validate_positive(value: &str, what: &str) -> Result<f32, ValidationError> {
    match value.replace(',', ".").trim().parse::<f32>() {
        Ok(parsed) if parsed > 0.0 && parsed.is_finite() => Ok(parsed),
        Ok(_) => Err(ValidationError::Other(
            format!("{what} must be a positive decimal number").into(),
        )),
        Err(_) => Err(ValidationError::Other(
            format!("{what} must be a decimal number").into(),
        )),
    }
}

/// The backend stores cleared text fields as empty strings.
fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}
