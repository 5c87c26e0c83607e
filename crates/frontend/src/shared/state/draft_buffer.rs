use chrono::{Local, NaiveDate};
use contracts::domain::common::Entity;
use contracts::shared::errors::{StoreError, ValidationError};
use serde_json::Value;
use thiserror::Error;

use crate::shared::controller::Controller;
use crate::shared::patch;

/// What a commit of the open draft will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftMode<Id> {
    Create,
    Edit(Id),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error("no draft is open")]
    NotOpen,
    #[error(transparent)]
    Validation(ValidationError),
    #[error(transparent)]
    Store(StoreError),
}

impl From<ValidationError> for DraftError {
    fn from(e: ValidationError) -> Self {
        DraftError::Validation(e)
    }
}

impl From<StoreError> for DraftError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(v) => DraftError::Validation(v),
            other => DraftError::Store(other),
        }
    }
}

#[derive(Debug, Clone)]
struct OpenDraft<E: Entity> {
    mode: DraftMode<E::Id>,
    original: E,
    current: E,
}

/// Edit form state of one entity kind.
///
/// The draft is a detached copy: nothing reaches the collection until
/// [`commit`](DraftBuffer::commit) succeeds.
#[derive(Debug, Clone)]
pub struct DraftBuffer<E: Entity> {
    open: Option<OpenDraft<E>>,
}

impl<E: Entity> DraftBuffer<E> {
    pub fn new() -> Self {
        Self { open: None }
    }

    /// Opens a new entity with the kind's defaults as of today.
    pub fn open_for_create(&mut self) {
        self.open_for_create_on(Local::now().date_naive());
    }

    pub fn open_for_create_on(&mut self, today: NaiveDate) {
        self.open_for_create_with(E::template(today));
    }

    pub fn open_for_create_with(&mut self, mut template: E) {
        template.set_id(None);
        self.open = Some(OpenDraft {
            mode: DraftMode::Create,
            original: template.clone(),
            current: template,
        });
    }

    /// Opens a copy of `entity`. An entity without an id is treated as new.
    pub fn open_for_edit(&mut self, entity: &E) {
        let mode = match entity.id() {
            Some(id) => DraftMode::Edit(id.clone()),
            None => DraftMode::Create,
        };
        self.open = Some(OpenDraft {
            mode,
            original: entity.clone(),
            current: entity.clone(),
        });
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn mode(&self) -> Option<&DraftMode<E::Id>> {
        self.open.as_ref().map(|o| &o.mode)
    }

    pub fn current(&self) -> Option<&E> {
        self.open.as_ref().map(|o| &o.current)
    }

    /// True when the draft differs from what it was opened with.
    pub fn is_dirty(&self) -> bool {
        self.open
            .as_ref()
            .map_or(false, |o| o.original != o.current)
    }

    /// Sets one field by dot path (`title`, `options.0.label`).
    ///
    /// A value that does not fit is rejected and the draft stays as it was.
    pub fn mutate_field(&mut self, path: &str, value: Value) -> Result<(), DraftError> {
        let open = self.open.as_mut().ok_or(DraftError::NotOpen)?;
        if path == "id" || path.starts_with("id.") {
            return Err(ValidationError::field(path).into());
        }

        let mut json =
            serde_json::to_value(&open.current).map_err(|_| ValidationError::field(path))?;
        patch::set_path(&mut json, path, value)?;
        let next: E = serde_json::from_value(json).map_err(|e| {
            log::debug!("draft field {} rejected: {}", path, e);
            ValidationError::field(path)
        })?;

        open.current = next;
        Ok(())
    }

    /// Validates the draft and saves it through `controller`.
    ///
    /// Edits send only the changed top-level fields. The draft is closed on
    /// success and kept open on any failure.
    pub async fn commit(&mut self, controller: &Controller<E>) -> Result<E, DraftError> {
        let open = self.open.as_ref().ok_or(DraftError::NotOpen)?;
        open.current.validate()?;

        let saved = match &open.mode {
            DraftMode::Edit(id) if controller.contains(id) => {
                let changes = patch::diff(&open.original, &open.current)?;
                if changes.is_empty() {
                    log::debug!("draft of {} {} has no changes", E::element_name(), id);
                    controller
                        .get(id)
                        .unwrap_or_else(|| open.current.clone())
                } else {
                    controller.update(id, changes).await?
                }
            }
            _ => {
                let mut draft = open.current.clone();
                draft.set_id(None);
                controller.create(draft).await?
            }
        };

        self.open = None;
        Ok(saved)
    }

    /// Closes the draft without touching the collection.
    pub fn discard(&mut self) {
        self.open = None;
    }
}

impl<E: Entity> Default for DraftBuffer<E> {
    fn default() -> Self {
        Self::new()
    }
}
