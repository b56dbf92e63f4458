use super::listener::AutocompleteEvent;
use super::state::{InputState, Phase};
use crate::core::candidate::Candidate;
use crate::core::search::matcher::{Suggestion, filter};
use std::borrow::Cow;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// What the controller asks its host to do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEffect<C> {
    /// (Re)start the debounce timer; when it runs out call
    /// [`InputController::on_debounce_fire`] with `generation`.
    ScheduleDebounce { generation: u64, delay: Duration },
    CancelDebounce,
    FetchCandidates,
    Notify(AutocompleteEvent<C>),
}

pub type Effects<C> = Vec<ControllerEffect<C>>;

/// Debounced query state machine.
///
/// Every keystroke bumps `pending_generation`; a debounce that fires with an
/// older generation is dropped, so results always come from the latest
/// settled query.
pub struct InputController<C> {
    state: InputState<C>,
    debounce: Duration,
}

impl<C: Candidate> InputController<C> {
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: InputState::default(),
            debounce,
        }
    }

    pub fn state(&self) -> &InputState<C> {
        &self.state
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn on_input_change(&mut self, text: impl Into<String>) -> Effects<C> {
        self.state.query = text.into();
        self.state.pending_generation += 1;
        self.state.phase = Phase::Debouncing;
        debug!(
            generation = self.state.pending_generation,
            query = %self.state.query,
            "query changed; debounce restarted"
        );
        vec![ControllerEffect::ScheduleDebounce {
            generation: self.state.pending_generation,
            delay: self.debounce,
        }]
    }

    /// Returns `true` when results were recomputed.
    pub fn on_debounce_fire(&mut self, generation: u64) -> bool {
        if generation != self.state.pending_generation || self.state.phase != Phase::Debouncing {
            debug!(
                generation,
                current = self.state.pending_generation,
                "dropping stale debounce"
            );
            return false;
        }
        self.refilter();
        self.state.phase = Phase::Settled;
        true
    }

    pub fn on_candidates_replaced(&mut self, candidates: Vec<C>) {
        self.state.candidates = candidates;
        match self.state.phase {
            // The pending debounce filters against the new list when it fires.
            Phase::Debouncing => {}
            Phase::Selected => {}
            Phase::Idle | Phase::Focused | Phase::Settled | Phase::Cleared => self.refilter(),
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.state.loading = loading;
    }

    pub fn on_focus(&mut self) -> Effects<C> {
        self.state.focused = true;
        if self.state.phase == Phase::Idle {
            self.state.phase = Phase::Focused;
        }
        vec![ControllerEffect::Notify(AutocompleteEvent::Focused)]
    }

    pub fn on_blur(&mut self) {
        self.state.focused = false;
        if self.state.phase == Phase::Focused && self.state.query.is_empty() {
            self.state.phase = Phase::Idle;
        }
    }

    /// Picks `suggestion`. The "no results" row is rejected without any change.
    pub fn on_select(&mut self, suggestion: &Suggestion<C>) -> Effects<C> {
        let Some(candidate) = suggestion.candidate() else {
            debug!("ignoring selection of the no-results row");
            return Vec::new();
        };
        let candidate = candidate.clone();
        self.state.query = candidate.name().to_string();
        self.state.results.clear();
        self.state.pending_generation += 1;
        self.state.phase = Phase::Selected;
        debug!(id = candidate.id(), "candidate selected");
        vec![
            ControllerEffect::CancelDebounce,
            ControllerEffect::Notify(AutocompleteEvent::Selected(candidate)),
        ]
    }

    pub fn on_clear(&mut self) -> Effects<C> {
        self.state.query.clear();
        self.state.pending_generation += 1;
        self.state.results = filter(&self.state.candidates, "");
        self.state.phase = Phase::Cleared;
        vec![ControllerEffect::CancelDebounce]
    }

    /// Only the first call asks for a fetch.
    pub fn on_activate(&mut self) -> Effects<C> {
        if self.state.activated {
            return vec![ControllerEffect::Notify(AutocompleteEvent::Activated(false))];
        }
        self.state.activated = true;
        vec![
            ControllerEffect::FetchCandidates,
            ControllerEffect::Notify(AutocompleteEvent::Activated(true)),
        ]
    }

    pub fn on_hover(&self, suggestion: &Suggestion<C>) -> Effects<C> {
        suggestion
            .candidate()
            .map(|candidate| {
                vec![ControllerEffect::Notify(AutocompleteEvent::Hovered(
                    candidate.clone(),
                ))]
            })
            .unwrap_or_default()
    }

    /// Rows the list should show, or `None` while it is hidden.
    ///
    /// The list hides while loading and after a query that left nothing to
    /// show. With an empty query and no computed results it falls back to
    /// every candidate.
    pub fn visible_rows(&self) -> Option<Cow<'_, [Suggestion<C>]>> {
        if self.state.loading {
            return None;
        }
        if !self.state.results.is_empty() {
            return Some(Cow::Borrowed(self.state.results.as_slice()));
        }
        if self.state.query.is_empty() {
            return Some(Cow::Owned(filter(&self.state.candidates, "")));
        }
        None
    }

    pub fn show_loading(&self) -> bool {
        self.state.focused && self.state.loading
    }

    fn refilter(&mut self) {
        self.state.results = filter(&self.state.candidates, &self.state.query);
        debug!(
            query = %self.state.query,
            rows = self.state.results.len(),
            "results recomputed"
        );
    }
}
