use std::sync::{Arc, Mutex};

/// Events the widget reports to whoever embeds it. The "no results" row never
/// produces any of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocompleteEvent<C> {
    /// `true` when this activation started the candidate fetch.
    Activated(bool),
    Hovered(C),
    Selected(C),
    Focused,
}

pub trait AutocompleteListener<C>: Send {
    fn on_activate(&mut self, _was_activated: bool) {}
    fn on_hover(&mut self, _candidate: &C) {}
    fn on_select(&mut self, _candidate: &C) {}
    fn on_focus(&mut self) {}
}

pub struct NoopListener;

impl<C> AutocompleteListener<C> for NoopListener {}

pub fn dispatch<C>(listener: &mut dyn AutocompleteListener<C>, event: &AutocompleteEvent<C>) {
    match event {
        AutocompleteEvent::Activated(was_activated) => listener.on_activate(*was_activated),
        AutocompleteEvent::Hovered(candidate) => listener.on_hover(candidate),
        AutocompleteEvent::Selected(candidate) => listener.on_select(candidate),
        AutocompleteEvent::Focused => listener.on_focus(),
    }
}

/// Listener that records every event into a shared log. Clones share the log.
pub struct EventLog<C> {
    events: Arc<Mutex<Vec<AutocompleteEvent<C>>>>,
}

impl<C> Clone for EventLog<C> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<C> Default for EventLog<C> {
    fn default() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<C: Clone> EventLog<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AutocompleteEvent<C>> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn last_selected(&self) -> Option<C> {
        self.events().into_iter().rev().find_map(|event| match event {
            AutocompleteEvent::Selected(candidate) => Some(candidate),
            _ => None,
        })
    }

    fn push(&self, event: AutocompleteEvent<C>) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl<C: Clone + Send> AutocompleteListener<C> for EventLog<C> {
    fn on_activate(&mut self, was_activated: bool) {
        self.push(AutocompleteEvent::Activated(was_activated));
    }

    fn on_hover(&mut self, candidate: &C) {
        self.push(AutocompleteEvent::Hovered(candidate.clone()));
    }

    fn on_select(&mut self, candidate: &C) {
        self.push(AutocompleteEvent::Selected(candidate.clone()));
    }

    fn on_focus(&mut self) {
        self.push(AutocompleteEvent::Focused);
    }
}
