use crate::terminal::TerminalEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Terminal(TerminalEvent),
    /// A debounce scheduled by the widget `target` ran out.
    DebounceElapsed { target: String, generation: u64 },
}
