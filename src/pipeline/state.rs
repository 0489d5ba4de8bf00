//! Pipeline state and stage machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PipelineError;

/// How far a state has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Only `raw_email` is set.
    Start,
    /// `expanded_email` is set.
    Expanded,
    /// `polished_email` is set. Terminal.
    Polished,
}

impl Stage {
    /// Check if this stage allows transitioning to another.
    pub fn can_transition_to(&self, target: Stage) -> bool {
        matches!(
            (self, target),
            (Stage::Start, Stage::Expanded) | (Stage::Expanded, Stage::Polished)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Polished)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::Expanded => "expanded",
            Self::Polished => "polished",
        };
        write!(f, "{s}")
    }
}

/// A recorded stage change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTransition {
    pub from: Stage,
    pub to: Stage,
    pub timestamp: DateTime<Utc>,
}

/// State threaded through the graph for one invocation.
///
/// Fields are written strictly in pipeline order and only through the
/// `record_*` methods; once [`Stage::Polished`] is reached the state is
/// read-only.
#[derive(Debug, Clone, Serialize)]
pub struct EmailState {
    run_id: Uuid,
    stage: Stage,
    raw_email: Option<String>,
    expanded_email: Option<String>,
    polished_email: Option<String>,
    transitions: Vec<StageTransition>,
}

impl EmailState {
    /// State holding `raw_email` as-is. No validation.
    pub fn new(raw_email: impl Into<String>) -> Self {
        Self {
            raw_email: Some(raw_email.into()),
            ..Self::empty()
        }
    }

    /// State with nothing set. The graph rejects it at the first node.
    pub fn empty() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            stage: Stage::Start,
            raw_email: None,
            expanded_email: None,
            polished_email: None,
            transitions: Vec::new(),
        }
    }

    /// Entry-point constructor: rejects blank input and trims surrounding
    /// whitespace.
    pub fn from_input(raw_email: &str) -> Result<Self, PipelineError> {
        Ok(Self::new(validate_input(raw_email)?))
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn raw_email(&self) -> Option<&str> {
        self.raw_email.as_deref()
    }

    pub fn expanded_email(&self) -> Option<&str> {
        self.expanded_email.as_deref()
    }

    pub fn polished_email(&self) -> Option<&str> {
        self.polished_email.as_deref()
    }

    pub fn transitions(&self) -> &[StageTransition] {
        &self.transitions
    }

    /// Consume the state, returning the polished email if the run finished.
    pub fn into_polished(self) -> Option<String> {
        self.polished_email
    }

    pub(crate) fn record_expansion(&mut self, expanded: String) -> Result<(), PipelineError> {
        self.transition_to(Stage::Expanded)?;
        self.expanded_email = Some(expanded);
        Ok(())
    }

    pub(crate) fn record_polish(&mut self, polished: String) -> Result<(), PipelineError> {
        self.transition_to(Stage::Polished)?;
        self.polished_email = Some(polished);
        Ok(())
    }

    fn transition_to(&mut self, target: Stage) -> Result<(), PipelineError> {
        if !self.stage.can_transition_to(target) {
            return Err(PipelineError::InvalidTransition {
                from: self.stage.to_string(),
                to: target.to_string(),
            });
        }
        self.transitions.push(StageTransition {
            from: self.stage,
            to: target,
            timestamp: Utc::now(),
        });
        self.stage = target;
        Ok(())
    }
}

/// Reject blank input before any work is done. Returns the trimmed text.
pub fn validate_input(raw_email: &str) -> Result<&str, PipelineError> {
    let trimmed = raw_email.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::InvalidInput(
            "Missing email input. Please provide an email to rewrite.".to_string(),
        ));
    }
    Ok(trimmed)
}
