use crate::core::search::matcher::FilterResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Unfocused with an empty query.
    Idle,
    Focused,
    /// A keystroke is waiting for its debounce to run out.
    Debouncing,
    Settled,
    Cleared,
    /// A candidate was picked; results stay empty until the next keystroke.
    Selected,
}

/// Everything the input controller owns. Only the controller mutates it.
#[derive(Debug, Clone)]
pub struct InputState<C> {
    pub(super) query: String,
    pub(super) candidates: Vec<C>,
    pub(super) results: FilterResult<C>,
    pub(super) focused: bool,
    pub(super) loading: bool,
    pub(super) activated: bool,
    pub(super) pending_generation: u64,
    pub(super) phase: Phase,
}

impl<C> Default for InputState<C> {
    fn default() -> Self {
        Self {
            query: String::new(),
            candidates: Vec::new(),
            results: Vec::new(),
            focused: false,
            loading: false,
            activated: false,
            pending_generation: 0,
            phase: Phase::Idle,
        }
    }
}

impl<C> InputState<C> {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn candidates(&self) -> &[C] {
        &self.candidates
    }

    pub fn results(&self) -> &FilterResult<C> {
        &self.results
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn activated(&self) -> bool {
        self.activated
    }

    pub fn pending_generation(&self) -> u64 {
        self.pending_generation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}
