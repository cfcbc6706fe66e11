//! Active document slot and UI visibility flags.
//!
//! Flags never depend on document state. The active slot is written only by
//! the coordinator, which owns the cross-entity invariants.

use std::collections::BTreeMap;

use doco_model::{DocumentId, UiFlag};
use serde::Serialize;

use crate::config::UiDefaults;
use crate::error::StateError;

/// Visibility of every UI flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UiState {
    flags: BTreeMap<UiFlag, bool>,
}

impl UiState {
    pub fn from_defaults(defaults: &UiDefaults) -> Self {
        Self {
            flags: UiFlag::all()
                .iter()
                .map(|&flag| (flag, defaults.value(flag)))
                .collect(),
        }
    }

    pub fn get(&self, flag: UiFlag) -> bool {
        self.flags.get(&flag).copied().unwrap_or(false)
    }

    pub fn show_file_manager(&self) -> bool {
        self.get(UiFlag::ShowFileManager)
    }

    pub fn iter(&self) -> impl Iterator<Item = (UiFlag, bool)> + '_ {
        self.flags.iter().map(|(&flag, &value)| (flag, value))
    }

    fn set(&mut self, flag: UiFlag, value: bool) {
        self.flags.insert(flag, value);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    active: Option<DocumentId>,
    ui: UiState,
}

impl ViewState {
    pub fn new(defaults: &UiDefaults) -> Self {
        Self {
            active: None,
            ui: UiState::from_defaults(defaults),
        }
    }

    pub fn active_document(&self) -> Option<&DocumentId> {
        self.active.as_ref()
    }

    pub(crate) fn set_active(&mut self, id: Option<DocumentId>) {
        self.active = id;
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn flag(&self, flag: UiFlag) -> bool {
        self.ui.get(flag)
    }

    /// Flip a flag by name. Returns the new value.
    pub fn toggle(&mut self, name: &str) -> Result<bool, StateError> {
        let flag = parse_flag(name)?;
        Ok(self.toggle_flag(flag))
    }

    pub fn set_flag(&mut self, name: &str, value: bool) -> Result<(), StateError> {
        let flag = parse_flag(name)?;
        self.ui.set(flag, value);
        Ok(())
    }

    pub fn toggle_flag(&mut self, flag: UiFlag) -> bool {
        let value = !self.ui.get(flag);
        self.ui.set(flag, value);
        value
    }
}

fn parse_flag(name: &str) -> Result<UiFlag, StateError> {
    name.parse()
        .map_err(|_| StateError::UnknownFlag(name.to_string()))
}
