use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{Budget, SearchCriteria, Vibe},
};

/// Origin shown in a fresh form
pub const DEFAULT_ORIGIN: &str = "New York City";

/// Partial update of the form fields
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FormEdits {
    pub origin: Option<String>,
    pub budget: Option<u32>,
    pub vibe: Option<Vibe>,
}

/// Editable search criteria plus the in-flight flag
///
/// Submitting snapshots the current fields into a [`SearchCriteria`] and
/// marks the form busy until [`SearchForm::settle`] is called. Fields are
/// never reset by a submission.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchForm {
    origin: String,
    budget: Budget,
    vibe: Vibe,
    busy: bool,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchForm {
    pub fn new() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            budget: Budget::default(),
            vibe: Vibe::default(),
            busy: false,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn vibe(&self) -> Vibe {
        self.vibe
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn set_origin(&mut self, origin: impl Into<String>) {
        self.origin = origin.into();
    }

    pub fn set_budget(&mut self, budget: Budget) {
        self.budget = budget;
    }

    pub fn set_vibe(&mut self, vibe: Vibe) {
        self.vibe = vibe;
    }

    /// Applies all edits, or none if the budget is out of range
    pub fn apply(&mut self, edits: FormEdits) -> AppResult<()> {
        let budget = edits.budget.map(Budget::new).transpose()?;

        if let Some(origin) = edits.origin {
            self.set_origin(origin);
        }
        if let Some(budget) = budget {
            self.set_budget(budget);
        }
        if let Some(vibe) = edits.vibe {
            self.set_vibe(vibe);
        }
        Ok(())
    }

    /// Packages the current fields and marks the form busy
    pub fn submit(&mut self) -> AppResult<SearchCriteria> {
        if self.busy {
            return Err(AppError::Busy(
                "A search is already in progress".to_string(),
            ));
        }

        self.busy = true;
        Ok(SearchCriteria {
            origin: self.origin.clone(),
            budget: self.budget,
            vibe: self.vibe,
        })
    }

    /// Re-enables submission once the triggered retrieval has resolved
    pub fn settle(&mut self) {
        self.busy = false;
    }
}
