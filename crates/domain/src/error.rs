#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum CreateError {
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<UpdateError> for CreateError {
    fn from(value: UpdateError) -> Self {
        match value {
            UpdateError::Conflict => CreateError::Conflict,
            UpdateError::Storage(storage) => CreateError::Storage(storage),
            UpdateError::Other(other) => CreateError::Other(other),
        }
    }
}

impl From<ReadError> for CreateError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::Storage(storage) => CreateError::Storage(storage),
            ReadError::Other(other) => CreateError::Other(other),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<ReadError> for UpdateError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::Storage(storage) => UpdateError::Storage(storage),
            ReadError::Other(other) => UpdateError::Other(other),
        }
    }
}

impl From<DeleteError> for UpdateError {
    fn from(value: DeleteError) -> Self {
        match value {
            DeleteError::Storage(storage) => UpdateError::Storage(storage),
            DeleteError::Other(other) => UpdateError::Other(other),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DeleteError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<ReadError> for DeleteError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::Storage(storage) => DeleteError::Storage(storage),
            ReadError::Other(other) => DeleteError::Other(other),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no connection")]
    NoConnection,
    #[error("no session")]
    NoSession,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("{0} already exists")]
    Conflict(String),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_error_from_update_error() {
        assert!(matches!(
            CreateError::from(UpdateError::Conflict),
            CreateError::Conflict
        ));
        assert!(matches!(
            CreateError::from(UpdateError::Storage(StorageError::NoSession)),
            CreateError::Storage(StorageError::NoSession)
        ));
        assert!(matches!(
            CreateError::from(UpdateError::Other("foo".into())),
            CreateError::Other(error) if error.to_string() == "foo"
        ));
    }

    #[test]
    fn test_create_error_from_read_error() {
        assert!(matches!(
            CreateError::from(ReadError::Storage(StorageError::NoConnection)),
            CreateError::Storage(StorageError::NoConnection)
        ));
        assert!(matches!(
            CreateError::from(ReadError::Other("bar".into())),
            CreateError::Other(error) if error.to_string() == "bar"
        ));
    }

    #[test]
    fn test_update_error_from_read_and_delete_error() {
        assert!(matches!(
            UpdateError::from(ReadError::Storage(StorageError::NoSession)),
            UpdateError::Storage(StorageError::NoSession)
        ));
        assert!(matches!(
            UpdateError::from(DeleteError::Other("baz".into())),
            UpdateError::Other(error) if error.to_string() == "baz"
        ));
        assert!(matches!(
            DeleteError::from(ReadError::Storage(StorageError::NoConnection)),
            DeleteError::Storage(StorageError::NoConnection)
        ));
    }

    #[test]
    fn test_create_error_from_validation_error() {
        assert!(matches!(
            CreateError::from(ValidationError::Conflict("username".to_string())),
            CreateError::Validation(ValidationError::Conflict(field)) if field == "username"
        ));
    }

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::Conflict("username".to_string()).to_string(),
            "username already exists"
        );
    }
}
