//! Marker selection and follow-up actions.
//!
//! ```text
//! Idle --tap--> Selected --open_menu--> ActionMenuOpen
//! ActionMenuOpen --LeaveReview--> ReviewFormOpen --submit ok--> Idle
//! ActionMenuOpen --ReportOutbreak--> OutbreakFormOpen --submit ok--> Idle
//! ActionMenuOpen --SeeReviews | Navigate--> Idle (+ Handoff)
//! any --cancel--> Idle
//! ```
//!
//! Rejected events return [`EngineError::InvalidTransition`] and leave the
//! state untouched. Form drafts survive failed submissions.

use crate::annotation::{AnnotationSink, AuthSession, OutbreakRecord, ReviewRecord};
use crate::error::{EngineError, Result};
use crate::session::Marker;
use serde::Serialize;
use streamlyne_core::validation::Validator;
use streamlyne_geo::Coordinate;
use streamlyne_telemetry::metrics;
use tracing::{debug, info, warn};

/// Message shown when a review is submitted without a signed-in user.
pub const SESSION_REQUIRED: &str = "You need to be logged in to submit a review";

/// Text typed into the review form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewDraft {
    /// Review text
    pub text: String,
}

/// Fields typed into the outbreak form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutbreakDraft {
    /// Disease name
    pub disease: String,
    /// Description of the outbreak
    pub description: String,
}

/// Where the controller is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SelectionState {
    /// Nothing selected
    #[default]
    Idle,
    /// A marker is selected
    Selected {
        /// Selected marker
        marker: Marker,
    },
    /// The action menu for the selected marker is open
    ActionMenuOpen {
        /// Selected marker
        marker: Marker,
    },
    /// The review form is open
    ReviewFormOpen {
        /// Selected marker
        marker: Marker,
        /// Form contents
        draft: ReviewDraft,
    },
    /// The outbreak form is open
    OutbreakFormOpen {
        /// Selected marker
        marker: Marker,
        /// Form contents
        draft: OutbreakDraft,
    },
}

impl SelectionState {
    /// Short name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            SelectionState::Idle => "idle",
            SelectionState::Selected { .. } => "a marker is selected",
            SelectionState::ActionMenuOpen { .. } => "the action menu is open",
            SelectionState::ReviewFormOpen { .. } => "the review form is open",
            SelectionState::OutbreakFormOpen { .. } => "the outbreak form is open",
        }
    }

    /// The selected marker, if any.
    pub fn marker(&self) -> Option<&Marker> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Selected { marker }
            | SelectionState::ActionMenuOpen { marker }
            | SelectionState::ReviewFormOpen { marker, .. }
            | SelectionState::OutbreakFormOpen { marker, .. } => Some(marker),
        }
    }
}

/// Entries of the action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Open the review form
    LeaveReview,
    /// Open the outbreak form
    ReportOutbreak,
    /// Hand the marker to the review list
    SeeReviews,
    /// Hand the coordinate to the directions provider
    Navigate,
}

/// Control passed to a collaborator outside the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "handoff", rename_all = "snake_case")]
pub enum Handoff {
    /// Show reviews stored for this marker's exact coordinate
    ListReviews(Marker),
    /// Route to this coordinate
    Navigate {
        /// Destination, exactly as loaded
        destination: Coordinate,
    },
}

/// Marker selection state machine.
#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    /// Start idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Selected marker, if any.
    pub fn selected(&self) -> Option<&Marker> {
        self.state.marker()
    }

    fn reject(&self, event: &'static str) -> EngineError {
        debug!(state = self.state.name(), event, "Selection event rejected");
        EngineError::InvalidTransition {
            state: self.state.name(),
            event,
        }
    }

    fn transition(&mut self, next: SelectionState) {
        debug!(from = self.state.name(), to = next.name(), "Selection changed");
        self.state = next;
    }

    /// Select `marker`, replacing any previous selection.
    ///
    /// # Errors
    /// Rejected while a form is open so its draft is not lost.
    pub fn tap(&mut self, marker: Marker) -> Result<()> {
        match self.state {
            SelectionState::ReviewFormOpen { .. } | SelectionState::OutbreakFormOpen { .. } => {
                Err(self.reject("select a marker"))
            }
            _ => {
                self.transition(SelectionState::Selected { marker });
                Ok(())
            }
        }
    }

    /// Open the action menu for the selected marker.
    pub fn open_menu(&mut self) -> Result<()> {
        let SelectionState::Selected { marker } = &self.state else {
            return Err(self.reject("open the action menu"));
        };
        let marker = marker.clone();
        self.transition(SelectionState::ActionMenuOpen { marker });
        Ok(())
    }

    /// Pick an entry of the open action menu.
    ///
    /// Returns the hand-off for choices that leave the map.
    pub fn choose(&mut self, choice: MenuChoice) -> Result<Option<Handoff>> {
        let SelectionState::ActionMenuOpen { marker } = &self.state else {
            return Err(self.reject("choose a menu action"));
        };
        let marker = marker.clone();

        let (next, handoff) = match choice {
            MenuChoice::LeaveReview => (
                SelectionState::ReviewFormOpen {
                    marker,
                    draft: ReviewDraft::default(),
                },
                None,
            ),
            MenuChoice::ReportOutbreak => (
                SelectionState::OutbreakFormOpen {
                    marker,
                    draft: OutbreakDraft::default(),
                },
                None,
            ),
            MenuChoice::SeeReviews => (SelectionState::Idle, Some(Handoff::ListReviews(marker))),
            MenuChoice::Navigate => (
                SelectionState::Idle,
                Some(Handoff::Navigate {
                    destination: marker.coordinate,
                }),
            ),
        };
        self.transition(next);
        Ok(handoff)
    }

    /// Close whatever is open and forget the selection and any draft.
    pub fn cancel(&mut self) {
        if self.state != SelectionState::Idle {
            self.transition(SelectionState::Idle);
        }
    }

    /// Replace the review text.
    pub fn edit_review(&mut self, text: impl Into<String>) -> Result<()> {
        if let SelectionState::ReviewFormOpen { draft, .. } = &mut self.state {
            draft.text = text.into();
            return Ok(());
        }
        Err(self.reject("edit the review"))
    }

    /// Replace both outbreak fields.
    pub fn edit_outbreak(
        &mut self,
        disease: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        if let SelectionState::OutbreakFormOpen { draft, .. } = &mut self.state {
            draft.disease = disease.into();
            draft.description = description.into();
            return Ok(());
        }
        Err(self.reject("edit the outbreak report"))
    }

    /// Submit the open review form.
    ///
    /// Empty text or a missing session fail locally without contacting
    /// `sink`. A backend failure keeps the form and its draft open.
    pub async fn submit_review<S: AnnotationSink>(
        &mut self,
        sink: &S,
        session: Option<&AuthSession>,
    ) -> Result<ReviewRecord> {
        let SelectionState::ReviewFormOpen { marker, draft } = &self.state else {
            return Err(self.reject("submit a review"));
        };

        let validation = Validator::new()
            .required("review", &draft.text)
            .present("session", session, SESSION_REQUIRED)
            .validate();
        let Some(session) = session.filter(|_| validation.is_valid()) else {
            warn!(errors = %validation, "Review rejected locally");
            return Err(EngineError::Validation(validation));
        };

        let record = ReviewRecord::new(draft.text.clone(), marker.coordinate, session);
        metrics().increment("review_submissions");
        if let Err(err) = sink.submit_review(session, &record).await {
            metrics().increment("submission_failures");
            warn!(error = %err, "Review submission failed");
            return Err(err.into());
        }

        info!(latitude = record.latitude, longitude = record.longitude, "Review submitted");
        self.transition(SelectionState::Idle);
        Ok(record)
    }

    /// Submit the open outbreak form.
    ///
    /// Both fields are required. A backend failure keeps the form and its
    /// draft open.
    pub async fn submit_outbreak<S: AnnotationSink>(&mut self, sink: &S) -> Result<OutbreakRecord> {
        let SelectionState::OutbreakFormOpen { marker, draft } = &self.state else {
            return Err(self.reject("submit an outbreak report"));
        };

        let validation = Validator::new()
            .required("disease", &draft.disease)
            .required("description", &draft.description)
            .validate();
        if !validation.is_valid() {
            warn!(errors = %validation, "Outbreak report rejected locally");
            return Err(EngineError::Validation(validation));
        }

        let record = OutbreakRecord {
            disease: draft.disease.clone(),
            description: draft.description.clone(),
            latitude: marker.coordinate.latitude,
            longitude: marker.coordinate.longitude,
        };
        metrics().increment("outbreak_submissions");
        if let Err(err) = sink.report_outbreak(&record).await {
            metrics().increment("submission_failures");
            warn!(error = %err, "Outbreak report failed");
            return Err(err.into());
        }

        info!(disease = %record.disease, "Outbreak reported");
        self.transition(SelectionState::Idle);
        Ok(record)
    }
}
