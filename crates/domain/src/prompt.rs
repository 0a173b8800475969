use std::fmt::Write;

use chrono::NaiveDate;

use crate::{UserProfile, WorkoutParams};

pub const SYSTEM_PROMPT: &str = "You are a professional fitness coach specialized in creating \
personalized workout routines. Provide detailed, safe, and effective workout plans based on the \
user's preferences and profile information. Format your response as structured JSON.";

const RESPONSE_FORMAT: &str = r#"

Please provide a complete workout plan in JSON format with the following structure:
{
  "title": "Catchy title for the workout",
  "description": "Brief description of the workout and its benefits",
  "exercises": [
    {
      "name": "Exercise name",
      "sets": number of sets (if applicable),
      "reps": "number or range of repetitions" (if applicable),
      "duration": "time duration" (if applicable for timed exercises),
      "restBetweenSets": "rest time between sets",
      "instructions": "detailed instructions on how to perform the exercise correctly",
      "videoUrl": "a relevant YouTube video URL demonstrating proper form for this exercise (must be a valid YouTube URL)",
      "imageUrl": "a relevant image URL showing the correct form for this exercise"
    }
  ],
  "warmup": "brief warmup routine description",
  "cooldown": "brief cooldown routine description",
  "totalTime": "estimated total time",
  "difficulty": "beginner/intermediate/advanced"
}

IMPORTANT: For each exercise, please include both a videoUrl (YouTube video) and imageUrl that demonstrate proper form and technique. Use well-known fitness YouTube channels and reputable fitness image sources. The visual elements are crucial for user safety and proper exercise execution."#;

/// Build the user message for workout generation.
///
/// Profile details are only included if present. `today` is used to derive the age.
#[must_use]
pub fn build_workout_prompt(
    params: &WorkoutParams,
    profile: Option<&UserProfile>,
    today: NaiveDate,
) -> String {
    let mut prompt = format!(
        "Create a detailed {} workout plan that:\n\
         - Takes approximately {} to complete\n\
         - Focuses on the {} muscle group(s)\n\
         - Uses the following equipment: {}\n\
         - Is suitable for someone who is feeling {}\n",
        params.workout_type,
        params.time_available.description(),
        params.muscle_focus,
        params.equipment.phrase(),
        params.mood,
    );

    if let Some(profile) = profile {
        prompt.push_str("\nAdditional information about the user:");
        // writing into a String cannot fail
        let mut line = |label: &str, value: &dyn std::fmt::Display| {
            let _ = write!(prompt, "\n- {label}: {value}");
        };
        if let Some(fitness_level) = profile.fitness_level {
            line("Fitness level", &fitness_level);
        }
        if let Some(age) = profile.age_on(today) {
            line("Age", &age);
        }
        if let Some(weight) = profile.weight {
            line("Weight", &format!("{weight} {}", profile.weight_unit));
        }
        if let Some(height) = profile.height {
            line("Height", &format!("{height} {}", profile.height_unit));
        }
        if let Some(ref goals) = profile.fitness_goals {
            line("Fitness goals", goals);
        }
        if let Some(ref injuries) = profile.injuries {
            line("Injuries or limitations to consider", injuries);
        }
    }

    prompt.push_str(RESPONSE_FORMAT);
    prompt
}
