use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{DeleteError, ReadError, UpdateError};

#[derive(
    Debug,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum WorkoutType {
    Strength,
    Cardio,
    Both,
    Flexibility,
    Hiit,
}

impl WorkoutType {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            WorkoutType::Strength => "Strength",
            WorkoutType::Cardio => "Cardio",
            WorkoutType::Both => "Both",
            WorkoutType::Flexibility => "Flexibility",
            WorkoutType::Hiit => "HIIT",
        }
    }
}

#[derive(
    Debug,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
pub enum TimeAvailable {
    #[strum(serialize = "10-15")]
    #[serde(rename = "10-15")]
    Minutes10To15,
    #[strum(serialize = "15-25")]
    #[serde(rename = "15-25")]
    Minutes15To25,
    #[strum(serialize = "25-40")]
    #[serde(rename = "25-40")]
    Minutes25To40,
    #[strum(serialize = "40-60")]
    #[serde(rename = "40-60")]
    Minutes40To60,
    #[strum(serialize = "60-90")]
    #[serde(rename = "60-90")]
    Minutes60To90,
    #[strum(serialize = "120")]
    #[serde(rename = "120")]
    Minutes120,
}

impl TimeAvailable {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TimeAvailable::Minutes120 => "2 hours",
            _ => self.description(),
        }
    }

    /// Time range as phrased in the generator prompt.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            TimeAvailable::Minutes10To15 => "10-15 minutes",
            TimeAvailable::Minutes15To25 => "15-25 minutes",
            TimeAvailable::Minutes25To40 => "25-40 minutes",
            TimeAvailable::Minutes40To60 => "40-60 minutes",
            TimeAvailable::Minutes60To90 => "60-90 minutes",
            TimeAvailable::Minutes120 => "120 minutes (2 hours)",
        }
    }
}

#[derive(
    Debug,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Mood {
    Happy,
    Energetic,
    Normal,
    Tired,
    Stressed,
    Sad,
}

impl Mood {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Energetic => "Energetic",
            Mood::Normal => "Normal",
            Mood::Tired => "Tired",
            Mood::Stressed => "Stressed",
            Mood::Sad => "Sad",
        }
    }
}

#[derive(
    Debug,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum MuscleFocus {
    FullBody,
    UpperBody,
    LowerBody,
    Core,
    Back,
    Chest,
    Arms,
    Legs,
}

impl MuscleFocus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MuscleFocus::FullBody => "Full Body",
            MuscleFocus::UpperBody => "Upper Body",
            MuscleFocus::LowerBody => "Lower Body",
            MuscleFocus::Core => "Core",
            MuscleFocus::Back => "Back",
            MuscleFocus::Chest => "Chest",
            MuscleFocus::Arms => "Arms",
            MuscleFocus::Legs => "Legs",
        }
    }
}

#[derive(
    Debug,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Equipment {
    #[strum(serialize = "none")]
    #[serde(rename = "none")]
    NoEquipment,
    Dumbbells,
    Kettlebells,
    Bands,
    FullGym,
    Treadmill,
    YogaMat,
    ExerciseBall,
}

impl Equipment {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Equipment::NoEquipment => "No Equipment",
            Equipment::Dumbbells => "Dumbbells",
            Equipment::Kettlebells => "Kettlebells",
            Equipment::Bands => "Resistance Bands",
            Equipment::FullGym => "Full Gym",
            Equipment::Treadmill => "Treadmill",
            Equipment::YogaMat => "Yoga Mat",
            Equipment::ExerciseBall => "Exercise Ball",
        }
    }
}

/// Selected equipment in selection order.
///
/// "No equipment" excludes every other item.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EquipmentSelection(Vec<Equipment>);

impl EquipmentSelection {
    pub fn toggle(&mut self, equipment: Equipment) {
        if equipment == Equipment::NoEquipment {
            if self.0.contains(&Equipment::NoEquipment) {
                self.0.clear();
            } else {
                self.0 = vec![Equipment::NoEquipment];
            }
            return;
        }

        if self.0.contains(&Equipment::NoEquipment) {
            self.0 = vec![equipment];
            return;
        }

        if let Some(i) = self.0.iter().position(|e| *e == equipment) {
            self.0.remove(i);
        } else {
            self.0.push(equipment);
        }
    }

    #[must_use]
    pub fn contains(&self, equipment: Equipment) -> bool {
        self.0.contains(&equipment)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Equipment] {
        &self.0
    }

    /// Human readable enumeration, e.g. "dumbbells, bands, and yoga-mat".
    #[must_use]
    pub fn phrase(&self) -> String {
        match self.0.as_slice() {
            [] => String::new(),
            [single] => single.to_string(),
            [init @ .., last] => init
                .iter()
                .map(ToString::to_string)
                .chain([format!("and {last}")])
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl fmt::Display for EquipmentSelection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        )
    }
}

impl FromStr for EquipmentSelection {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut selection = EquipmentSelection::default();
        for item in s.split(',').map(str::trim).filter(|i| !i.is_empty()) {
            let equipment = Equipment::from_str(item)?;
            if !selection.contains(equipment) {
                selection.toggle(equipment);
            }
        }
        Ok(selection)
    }
}

impl TryFrom<String> for EquipmentSelection {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EquipmentSelection> for String {
    fn from(value: EquipmentSelection) -> Self {
        value.to_string()
    }
}

impl<const N: usize> From<[Equipment; N]> for EquipmentSelection {
    fn from(value: [Equipment; N]) -> Self {
        let mut selection = EquipmentSelection::default();
        for equipment in value {
            if !selection.contains(equipment) {
                selection.toggle(equipment);
            }
        }
        selection
    }
}

#[allow(async_fn_in_trait)]
pub trait WorkoutDraftService {
    async fn get_workout_draft(&self) -> Result<WorkoutBuilder, ReadError>;
    async fn set_workout_draft(&self, draft: WorkoutBuilder) -> Result<(), UpdateError>;
    async fn discard_workout_draft(&self) -> Result<(), DeleteError>;
}

/// Keeps an unfinished wizard across page reloads.
#[allow(async_fn_in_trait)]
pub trait WorkoutDraftRepository {
    async fn read_workout_draft(&self) -> Result<Option<WorkoutBuilder>, ReadError>;
    async fn write_workout_draft(&self, draft: &WorkoutBuilder) -> Result<(), UpdateError>;
    async fn delete_workout_draft(&self) -> Result<(), DeleteError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutParams {
    pub workout_type: WorkoutType,
    pub time_available: TimeAvailable,
    pub mood: Mood,
    pub muscle_focus: MuscleFocus,
    pub equipment: EquipmentSelection,
}

#[derive(
    Debug, Default, Display, EnumIter, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    #[default]
    WorkoutType,
    TimeAvailable,
    Mood,
    MuscleFocus,
    Equipment,
    Generate,
}

impl Step {
    #[must_use]
    pub fn previous(self) -> Option<Step> {
        match self {
            Step::WorkoutType => None,
            Step::TimeAvailable => Some(Step::WorkoutType),
            Step::Mood => Some(Step::TimeAvailable),
            Step::MuscleFocus => Some(Step::Mood),
            Step::Equipment => Some(Step::MuscleFocus),
            Step::Generate => Some(Step::Equipment),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum BuilderError {
    #[error("{0} has not been selected")]
    Incomplete(Step),
    #[error("Please select at least one equipment option")]
    NoEquipment,
}

/// Linear workout wizard
///
/// Each selection is recorded and moves the wizard one step forward. Going back keeps all
/// selections, so that moving forward again starts from the previous choice.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutBuilder {
    step: Step,
    workout_type: Option<WorkoutType>,
    time_available: Option<TimeAvailable>,
    mood: Option<Mood>,
    muscle_focus: Option<MuscleFocus>,
    equipment: EquipmentSelection,
}

impl WorkoutBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    pub fn select_workout_type(&mut self, workout_type: WorkoutType) {
        self.workout_type = Some(workout_type);
        self.step = Step::TimeAvailable;
    }

    pub fn select_time_available(&mut self, time_available: TimeAvailable) {
        self.time_available = Some(time_available);
        self.step = Step::Mood;
    }

    pub fn select_mood(&mut self, mood: Mood) {
        self.mood = Some(mood);
        self.step = Step::MuscleFocus;
    }

    pub fn select_muscle_focus(&mut self, muscle_focus: MuscleFocus) {
        self.muscle_focus = Some(muscle_focus);
        self.step = Step::Equipment;
    }

    pub fn toggle_equipment(&mut self, equipment: Equipment) {
        self.equipment.toggle(equipment);
    }

    #[must_use]
    pub fn equipment(&self) -> &EquipmentSelection {
        &self.equipment
    }

    pub fn confirm_equipment(&mut self) -> Result<(), BuilderError> {
        if self.equipment.is_empty() {
            return Err(BuilderError::NoEquipment);
        }
        self.step = Step::Generate;
        Ok(())
    }

    /// Returns `false` if the wizard is already at the first step.
    pub fn back(&mut self) -> bool {
        match self.step.previous() {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    pub fn params(&self) -> Result<WorkoutParams, BuilderError> {
        let params = WorkoutParams {
            workout_type: self
                .workout_type
                .ok_or(BuilderError::Incomplete(Step::WorkoutType))?,
            time_available: self
                .time_available
                .ok_or(BuilderError::Incomplete(Step::TimeAvailable))?,
            mood: self.mood.ok_or(BuilderError::Incomplete(Step::Mood))?,
            muscle_focus: self
                .muscle_focus
                .ok_or(BuilderError::Incomplete(Step::MuscleFocus))?,
            equipment: self.equipment.clone(),
        };
        if params.equipment.is_empty() {
            return Err(BuilderError::NoEquipment);
        }
        Ok(params)
    }
}
