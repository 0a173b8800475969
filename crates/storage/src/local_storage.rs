use std::collections::VecDeque;

use gloo_storage::{Storage, errors::StorageError};
use serde::{Serialize, de::DeserializeOwned};
use vibefit_domain as domain;

use crate::{log, rest::AuthSession};

const KEY_SETTINGS: &str = "settings";
const KEY_WORKOUT_DRAFT: &str = "workout draft";
const KEY_SESSION: &str = "session";
const KEY_LOG: &str = "log";

const LOG_ENTRIES: usize = 100;

/// Device-local data, kept in the browser's local storage.
#[derive(Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn read_session(self) -> Result<Option<AuthSession>, StorageError> {
        read(KEY_SESSION)
    }

    pub fn write_session(self, session: &AuthSession) -> Result<(), StorageError> {
        gloo_storage::LocalStorage::set(KEY_SESSION, session)
    }

    pub fn remove_session(self) {
        gloo_storage::LocalStorage::delete(KEY_SESSION);
    }
}

impl domain::SettingsRepository for LocalStorage {
    async fn read_settings(&self) -> Result<domain::Settings, domain::ReadError> {
        Ok(read(KEY_SETTINGS)
            .map_err(into_storage_error)?
            .unwrap_or_default())
    }

    async fn write_settings(&self, settings: domain::Settings) -> Result<(), domain::UpdateError> {
        write(KEY_SETTINGS, &settings)
    }
}

impl domain::WorkoutDraftRepository for LocalStorage {
    async fn read_workout_draft(
        &self,
    ) -> Result<Option<domain::WorkoutBuilder>, domain::ReadError> {
        Ok(read(KEY_WORKOUT_DRAFT).map_err(into_storage_error)?)
    }

    async fn write_workout_draft(
        &self,
        draft: &domain::WorkoutBuilder,
    ) -> Result<(), domain::UpdateError> {
        write(KEY_WORKOUT_DRAFT, draft)
    }

    async fn delete_workout_draft(&self) -> Result<(), domain::DeleteError> {
        gloo_storage::LocalStorage::delete(KEY_WORKOUT_DRAFT);
        Ok(())
    }
}

pub struct Log;

impl log::Repository for Log {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        read(KEY_LOG)
            .map(Option::unwrap_or_default)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        entries.push_front(entry);
        entries.truncate(LOG_ENTRIES);
        gloo_storage::LocalStorage::set(KEY_LOG, entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}

fn read<T: DeserializeOwned>(key: &str) -> Result<Option<T>, StorageError> {
    match gloo_storage::LocalStorage::get(key) {
        Ok(value) => Ok(Some(value)),
        Err(StorageError::KeyNotFound(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

fn write<T: Serialize>(key: &str, value: &T) -> Result<(), domain::UpdateError> {
    gloo_storage::LocalStorage::set(key, value).map_err(|err| into_storage_error(err).into())
}

fn into_storage_error(err: StorageError) -> domain::StorageError {
    domain::StorageError::Other(Box::new(err))
}
