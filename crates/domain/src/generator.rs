use serde::{Deserialize, Serialize};

use crate::{PlanError, ReadError, WorkoutParams, WorkoutPlan};

#[allow(async_fn_in_trait)]
pub trait WorkoutService {
    async fn generate_workout(&self, params: &WorkoutParams)
    -> Result<WorkoutPlan, GenerateError>;
}

#[allow(async_fn_in_trait)]
pub trait CompletionRepository {
    /// Return the content of the first choice.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ReadError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub prompt: String,
    /// Ask for a JSON object instead of free text.
    pub json_response: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Completion(#[from] ReadError),
    #[error(transparent)]
    Plan(#[from] PlanError),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::StorageError;

    #[test]
    fn test_generate_error_display() {
        assert_eq!(
            GenerateError::from(ReadError::Storage(StorageError::NoConnection)).to_string(),
            "no connection"
        );
        assert_eq!(
            GenerateError::from(PlanError::Empty).to_string(),
            "empty workout plan"
        );
    }
}
