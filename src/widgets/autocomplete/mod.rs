pub mod controller;
pub mod list;
pub mod listener;
pub mod state;

pub use controller::{ControllerEffect, DEFAULT_DEBOUNCE, InputController};
pub use list::{ListEvent, SuggestionListView};
pub use listener::{AutocompleteEvent, AutocompleteListener, EventLog, NoopListener};
pub use state::{InputState, Phase};

use crate::core::candidate::Candidate;
use crate::core::search::matcher::{MatchSpan, Suggestion};
use crate::runtime::event::AppEvent;
use crate::runtime::scheduler::SchedulerCommand;
use crate::store::{CandidateStore, FetchError};
use crate::terminal::{CursorPos, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseKind};
use crate::ui::glyph::{CLOSE_GLYPH, close_span};
use crate::ui::highlight::render_name_spans;
use crate::ui::span::{Span, SpanLine};
use crate::ui::spinner::Spinner;
use crate::ui::style::{Color, Style};
use crate::widgets::inputs::text_edit;
use crate::widgets::traits::{DrawOutput, Drawable, InteractionResult, Interactive, RenderContext};
use std::time::Duration;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "> ";
const DEFAULT_PLACEHOLDER: &str = "Search type here...";

/// Typeahead input wired to a candidate store.
///
/// Layout, relative to the widget's first row: the input line, an optional
/// status line (loading or fetch error), then the suggestion rows.
pub struct Autocomplete<C: Candidate> {
    id: String,
    placeholder: String,
    controller: InputController<C>,
    list: SuggestionListView,
    store: CandidateStore<C>,
    listener: Box<dyn AutocompleteListener<C>>,
    cursor: usize,
    spinner: Spinner,
}

impl<C: Candidate> Autocomplete<C> {
    pub fn new(id: impl Into<String>, store: CandidateStore<C>) -> Self {
        Self {
            id: id.into(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            controller: InputController::new(DEFAULT_DEBOUNCE),
            list: SuggestionListView::default(),
            store,
            listener: Box::new(NoopListener),
            cursor: 0,
            spinner: Spinner::new(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.controller = InputController::new(debounce);
        self
    }

    pub fn with_max_visible(mut self, max_visible: Option<usize>) -> Self {
        self.list = SuggestionListView::new(max_visible);
        self
    }

    pub fn with_listener(mut self, listener: impl AutocompleteListener<C> + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    pub fn state(&self) -> &InputState<C> {
        self.controller.state()
    }

    pub fn query(&self) -> &str {
        self.controller.state().query()
    }

    pub fn hover_id(&self) -> Option<i64> {
        self.list.hover_id()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.store.snapshot().error.as_ref()
    }

    fn activate(&mut self) -> InteractionResult {
        let effects = self.controller.on_activate();
        self.apply(effects)
    }

    fn edit(&mut self, op: impl FnOnce(&mut String, &mut usize) -> bool) -> InteractionResult {
        let mut value = self.controller.state().query().to_string();
        if !op(&mut value, &mut self.cursor) {
            return InteractionResult::consumed();
        }
        let effects = self.controller.on_input_change(value);
        self.apply(effects)
    }

    fn move_cursor(&mut self, op: impl FnOnce(&mut usize, &str) -> bool) -> InteractionResult {
        let query = self.controller.state().query().to_string();
        if op(&mut self.cursor, &query) {
            InteractionResult::handled()
        } else {
            InteractionResult::consumed()
        }
    }

    fn clear(&mut self) -> InteractionResult {
        self.cursor = 0;
        self.list.pointer_leave();
        let effects = self.controller.on_clear();
        self.apply(effects)
    }

    fn hover_step(&mut self, delta: isize) -> InteractionResult {
        let Some(rows) = self.controller.visible_rows().map(|rows| rows.into_owned()) else {
            return InteractionResult::consumed();
        };
        let event = self.list.move_hover(&rows, delta);
        let mut result = InteractionResult::handled();
        if let Some(event) = event {
            result.merge(self.handle_list_event(event));
        }
        result
    }

    fn select_hovered(&mut self) -> InteractionResult {
        let event = self
            .controller
            .visible_rows()
            .and_then(|rows| self.list.activate_hovered(&rows));
        match event {
            Some(event) => self.handle_list_event(event),
            None => InteractionResult::consumed(),
        }
    }

    fn handle_list_event(&mut self, event: ListEvent<C>) -> InteractionResult {
        match event {
            ListEvent::Hovered(candidate) => {
                let effects = self.controller.on_hover(&Suggestion::plain(candidate));
                self.apply(effects)
            }
            ListEvent::SelectRequested(row) => {
                let effects = self.controller.on_select(&row);
                if effects.is_empty() {
                    return InteractionResult::consumed();
                }
                self.cursor = text_edit::char_count(self.controller.state().query());
                self.list.pointer_leave();
                self.apply(effects)
            }
        }
    }

    fn apply(&mut self, effects: Vec<ControllerEffect<C>>) -> InteractionResult {
        let mut result = InteractionResult::handled();
        for effect in effects {
            match effect {
                ControllerEffect::ScheduleDebounce { generation, delay } => {
                    result = result.with_command(SchedulerCommand::Debounce {
                        key: self.id.clone(),
                        delay,
                        event: AppEvent::DebounceElapsed {
                            target: self.id.clone(),
                            generation,
                        },
                    });
                }
                ControllerEffect::CancelDebounce => {
                    result = result.with_command(SchedulerCommand::Cancel {
                        key: self.id.clone(),
                    });
                }
                ControllerEffect::FetchCandidates => {
                    if self.store.activate() {
                        self.controller.set_loading(true);
                        self.spinner.reset();
                    }
                }
                ControllerEffect::Notify(event) => {
                    listener::dispatch(self.listener.as_mut(), &event);
                }
            }
        }
        result
    }

    fn sync_store(&mut self) -> bool {
        let Some(snapshot) = self.store.poll() else {
            return false;
        };
        let candidates = snapshot.candidates.clone();
        let loading = snapshot.loading;
        debug!(widget = %self.id, count = candidates.len(), "applying candidate snapshot");
        self.controller.set_loading(loading);
        self.controller.on_candidates_replaced(candidates);
        self.sync_list();
        true
    }

    fn sync_list(&mut self) {
        match self.controller.visible_rows() {
            Some(rows) => self.list.sync(&rows),
            None => self.list.pointer_leave(),
        }
    }

    fn shown_text(&self) -> &str {
        let query = self.controller.state().query();
        if query.is_empty() {
            &self.placeholder
        } else {
            query
        }
    }

    /// Column of the close glyph on the input line.
    fn glyph_col(&self) -> usize {
        PROMPT.width() + self.shown_text().width() + 1
    }

    fn status_line(&self) -> Option<SpanLine> {
        if self.controller.show_loading() {
            return Some(vec![
                self.spinner.span(),
                Span::styled(" Loading...", Style::new().color(Color::DarkGrey)),
            ]);
        }
        if self.controller.state().loading() {
            return None;
        }
        self.error().map(|err| {
            vec![Span::styled(
                format!("Could not load suggestions: {err}"),
                Style::new().color(Color::Red),
            )]
        })
    }

    fn list_top(&self) -> usize {
        1 + usize::from(self.status_line().is_some())
    }

    fn input_line(&self, focused: bool) -> SpanLine {
        let prompt_style = if focused {
            Style::new().color(Color::Cyan).bold()
        } else {
            Style::new().color(Color::DarkGrey)
        };
        let query = self.controller.state().query();
        let text = if query.is_empty() {
            Span::styled(self.placeholder.as_str(), Style::new().color(Color::DarkGrey))
        } else {
            Span::new(query)
        };
        vec![Span::styled(PROMPT, prompt_style), text, Span::new(" "), close_span()]
    }

    fn hits_glyph(&self, col: usize) -> bool {
        let glyph_col = self.glyph_col();
        (glyph_col..glyph_col + CLOSE_GLYPH.width()).contains(&col)
    }

    fn on_input_row_click(&mut self, col: usize) -> InteractionResult {
        if self.hits_glyph(col) {
            return self.clear();
        }
        self.activate()
    }

    fn route_mouse(&mut self, event: MouseEvent) -> InteractionResult {
        let row = event.row as usize;
        if row == 0 {
            return match event.kind {
                MouseKind::LeftDown => self.on_input_row_click(event.col as usize),
                MouseKind::Moved if self.list.hover_id().is_some() => {
                    self.list.pointer_leave();
                    InteractionResult::handled()
                }
                MouseKind::Moved => InteractionResult::ignored(),
            };
        }
        let top = self.list_top();
        if row < top {
            return InteractionResult::ignored();
        }
        self.on_list_mouse(event, row - top)
    }

    fn on_list_mouse(&mut self, event: MouseEvent, line: usize) -> InteractionResult {
        let row = self
            .controller
            .visible_rows()
            .and_then(|rows| self.list.row_at(&rows, line).cloned());
        let Some(row) = row else {
            if self.list.hover_id().is_some() {
                self.list.pointer_leave();
                return InteractionResult::handled();
            }
            return InteractionResult::ignored();
        };

        match event.kind {
            MouseKind::Moved => match self.list.pointer_enter(&row) {
                Some(event) => self.handle_list_event(event),
                None => InteractionResult::handled(),
            },
            MouseKind::LeftDown => {
                let event = self.list.click(&row);
                self.handle_list_event(event)
            }
        }
    }
}

fn emphasize_match(name: &str, span: Option<MatchSpan>, base: Style) -> SpanLine {
    render_name_spans(name, span, base, Style::new().color(Color::Yellow).bold())
}

impl<C: Candidate> Drawable for Autocomplete<C> {
    fn id(&self) -> &str {
        &self.id
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let focused = ctx.is_focused(&self.id) && self.controller.state().focused();
        let mut lines = vec![self.input_line(focused)];
        if let Some(status) = self.status_line() {
            lines.push(status);
        }
        if let Some(rows) = self.controller.visible_rows() {
            lines.extend(self.list.draw(&rows, emphasize_match));
        }
        DrawOutput { lines }
    }
}

impl<C: Candidate> Interactive for Autocomplete<C> {
    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        if !self.controller.state().focused() {
            return InteractionResult::ignored();
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('w') | KeyCode::Backspace => self.edit(text_edit::delete_word_left),
                _ => InteractionResult::ignored(),
            };
        }

        match key.code {
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::ALT) => {
                self.edit(|value, cursor| {
                    text_edit::insert_char(value, cursor, ch);
                    true
                })
            }
            KeyCode::Backspace => self.edit(text_edit::backspace_char),
            KeyCode::Delete => self.edit(text_edit::delete_char),
            KeyCode::Left => self.move_cursor(text_edit::move_left),
            KeyCode::Right => self.move_cursor(text_edit::move_right),
            KeyCode::Home => self.move_cursor(|cursor, _| text_edit::move_home(cursor)),
            KeyCode::End => self.move_cursor(text_edit::move_end),
            KeyCode::Up => self.hover_step(-1),
            KeyCode::Down => self.hover_step(1),
            KeyCode::Enter => self.select_hovered(),
            KeyCode::Esc => self.clear(),
            _ => InteractionResult::ignored(),
        }
    }

    /// A click on an unfocused widget focuses it first. That focus is the
    /// click's activation, so a plain input click is not activated twice.
    fn on_mouse(&mut self, event: MouseEvent) -> InteractionResult {
        if event.kind != MouseKind::LeftDown || self.controller.state().focused() {
            return self.route_mouse(event);
        }
        let mut result = self.on_focus();
        if event.row != 0 || self.hits_glyph(event.col as usize) {
            result.merge(self.route_mouse(event));
        }
        result
    }

    /// Focusing is also the activation signal.
    fn on_focus(&mut self) -> InteractionResult {
        let mut result = self.activate();
        let effects = self.controller.on_focus();
        result.merge(self.apply(effects));
        result
    }

    fn on_blur(&mut self) -> InteractionResult {
        self.controller.on_blur();
        self.list.pointer_leave();
        InteractionResult::handled()
    }

    fn on_app_event(&mut self, event: &AppEvent) -> InteractionResult {
        match event {
            AppEvent::DebounceElapsed { target, generation } if *target == self.id => {
                if !self.controller.on_debounce_fire(*generation) {
                    return InteractionResult::consumed();
                }
                self.sync_list();
                InteractionResult::handled()
            }
            _ => InteractionResult::ignored(),
        }
    }

    fn on_tick(&mut self) -> InteractionResult {
        let mut changed = self.sync_store();
        if self.controller.show_loading() {
            self.spinner.tick();
            changed = true;
        }
        if changed {
            InteractionResult::handled()
        } else {
            InteractionResult::ignored()
        }
    }

    fn cursor_pos(&self) -> Option<CursorPos> {
        if !self.controller.state().focused() {
            return None;
        }
        let query = self.controller.state().query();
        let col = PROMPT.width() + text_edit::display_width_before(query, self.cursor);
        Some(CursorPos {
            col: col.min(u16::MAX as usize) as u16,
            row: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Autocomplete, AutocompleteEvent, EventLog};
    use crate::core::candidate::Record;
    use crate::runtime::event::AppEvent;
    use crate::runtime::scheduler::SchedulerCommand;
    use crate::store::{CandidateStore, DataSource, FetchError, StaticDataSource};
    use crate::terminal::{KeyCode, KeyEvent, MouseEvent, MouseKind};
    use crate::ui::span::line_text;
    use crate::widgets::traits::{Drawable, Interactive, RenderContext};
    use std::time::{Duration, Instant};

    const ID: &str = "users";

    fn people() -> Vec<Record> {
        vec![
            Record::new(1, "Alice"),
            Record::new(2, "Bob"),
            Record::new(3, "Alicia"),
        ]
    }

    fn widget_with(
        source: impl DataSource<Record> + 'static,
    ) -> (Autocomplete<Record>, EventLog<Record>) {
        let log = EventLog::new();
        let widget = Autocomplete::new(ID, CandidateStore::new(source))
            .with_debounce(Duration::from_millis(500))
            .with_listener(log.clone());
        (widget, log)
    }

    fn ready_widget() -> (Autocomplete<Record>, EventLog<Record>) {
        let (mut widget, log) = widget_with(StaticDataSource::new(people()));
        widget.on_focus();
        wait_loaded(&mut widget);
        (widget, log)
    }

    fn wait_loaded(widget: &mut Autocomplete<Record>) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while widget.state().loading() {
            assert!(Instant::now() < deadline, "candidates never arrived");
            widget.on_tick();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn ctx() -> RenderContext {
        RenderContext {
            focused_id: Some(ID.to_string()),
        }
    }

    fn screen(widget: &Autocomplete<Record>) -> Vec<String> {
        widget
            .draw(&ctx())
            .lines
            .iter()
            .map(|line| line_text(line))
            .collect()
    }

    fn type_text(widget: &mut Autocomplete<Record>, text: &str) -> u64 {
        let mut generation = 0;
        for ch in text.chars() {
            let result = widget.on_key(KeyEvent::plain(KeyCode::Char(ch)));
            for command in result.commands {
                if let SchedulerCommand::Debounce {
                    event: AppEvent::DebounceElapsed { generation: g, .. },
                    ..
                } = command
                {
                    generation = g;
                }
            }
        }
        generation
    }

    fn fire(widget: &mut Autocomplete<Record>, generation: u64) {
        widget.on_app_event(&AppEvent::DebounceElapsed {
            target: ID.to_string(),
            generation,
        });
    }

    fn click(widget: &mut Autocomplete<Record>, col: u16, row: u16) {
        widget.on_mouse(MouseEvent {
            kind: MouseKind::LeftDown,
            col,
            row,
        });
    }

    #[test]
    fn focus_activates_fetch_once_and_shows_loading() {
        let source = StaticDataSource::new(people()).with_delay(Duration::from_millis(50));
        let (mut widget, log) = widget_with(source);
        assert_eq!(screen(&widget), vec!["> Search type here... ✕"]);

        widget.on_focus();
        assert_eq!(screen(&widget)[1].trim_start_matches(|c: char| !c.is_whitespace()), " Loading...");

        wait_loaded(&mut widget);
        assert_eq!(
            screen(&widget),
            vec!["> Search type here... ✕", "  Alice", "  Bob", "  Alicia"]
        );

        widget.on_blur();
        widget.on_focus();
        assert_eq!(
            log.events(),
            vec![
                AutocompleteEvent::Activated(true),
                AutocompleteEvent::Focused,
                AutocompleteEvent::Activated(false),
                AutocompleteEvent::Focused,
            ]
        );
    }

    #[test]
    fn typing_debounces_through_the_scheduler() {
        let (mut widget, _) = ready_widget();
        let result = widget.on_key(KeyEvent::plain(KeyCode::Char('a')));
        assert_eq!(
            result.commands,
            vec![SchedulerCommand::Debounce {
                key: ID.to_string(),
                delay: Duration::from_millis(500),
                event: AppEvent::DebounceElapsed {
                    target: ID.to_string(),
                    generation: 1,
                },
            }]
        );
        let generation = type_text(&mut widget, "li");
        assert_eq!(generation, 3);
        assert_eq!(screen(&widget).len(), 4);

        fire(&mut widget, generation);
        assert_eq!(screen(&widget), vec!["> ali ✕", "  Alice", "  Alicia"]);
    }

    #[test]
    fn stale_debounce_event_is_dropped() {
        let (mut widget, _) = ready_widget();
        let stale = type_text(&mut widget, "b");
        let fresh = type_text(&mut widget, "o");

        fire(&mut widget, fresh);
        fire(&mut widget, stale);
        assert_eq!(screen(&widget), vec!["> bo ✕", "  Bob"]);
    }

    #[test]
    fn events_for_other_widgets_are_ignored() {
        let (mut widget, _) = ready_widget();
        let generation = type_text(&mut widget, "bob");
        let result = widget.on_app_event(&AppEvent::DebounceElapsed {
            target: "other".to_string(),
            generation,
        });
        assert!(!result.handled);
        assert_eq!(screen(&widget).len(), 4);
    }

    #[test]
    fn clicking_a_row_selects_it() {
        let (mut widget, log) = ready_widget();
        let generation = type_text(&mut widget, "ali");
        fire(&mut widget, generation);

        widget.on_mouse(MouseEvent {
            kind: MouseKind::Moved,
            col: 4,
            row: 2,
        });
        assert_eq!(widget.hover_id(), Some(3));
        click(&mut widget, 4, 2);

        assert_eq!(widget.query(), "Alicia");
        assert_eq!(screen(&widget), vec!["> Alicia ✕"]);
        assert_eq!(log.last_selected(), Some(Record::new(3, "Alicia")));
        assert!(log.events().contains(&AutocompleteEvent::Hovered(Record::new(3, "Alicia"))));
    }

    #[test]
    fn clicking_no_results_row_does_nothing() {
        let (mut widget, log) = ready_widget();
        let generation = type_text(&mut widget, "zz");
        fire(&mut widget, generation);
        assert_eq!(screen(&widget), vec!["> zz ✕", "  No results found"]);
        let before = log.events();

        widget.on_mouse(MouseEvent {
            kind: MouseKind::Moved,
            col: 4,
            row: 1,
        });
        click(&mut widget, 4, 1);

        assert_eq!(log.events(), before);
        assert_eq!(widget.query(), "zz");
        assert_eq!(screen(&widget), vec!["> zz ✕", "  No results found"]);
    }

    #[test]
    fn close_glyph_clears_the_query() {
        let (mut widget, log) = ready_widget();
        let generation = type_text(&mut widget, "bob");
        fire(&mut widget, generation);

        // "> bob ✕": the glyph sits after the prompt, the query and a space.
        let result = widget.on_mouse(MouseEvent {
            kind: MouseKind::LeftDown,
            col: 6,
            row: 0,
        });
        assert!(result.commands.contains(&SchedulerCommand::Cancel {
            key: ID.to_string()
        }));
        assert_eq!(widget.query(), "");
        assert_eq!(screen(&widget).len(), 4);
        assert_eq!(log.last_selected(), None);
    }

    #[test]
    fn keyboard_hover_and_enter_select() {
        let (mut widget, log) = ready_widget();
        widget.on_key(KeyEvent::plain(KeyCode::Down));
        widget.on_key(KeyEvent::plain(KeyCode::Down));
        assert_eq!(screen(&widget)[2], "› Bob");

        widget.on_key(KeyEvent::plain(KeyCode::Enter));
        assert_eq!(widget.query(), "Bob");
        assert_eq!(log.last_selected(), Some(Record::new(2, "Bob")));

        let cursor = widget.cursor_pos().expect("focused input has a cursor");
        assert_eq!((cursor.col, cursor.row), (5, 0));
    }

    #[test]
    fn escape_resets_to_full_list() {
        let (mut widget, _) = ready_widget();
        let generation = type_text(&mut widget, "zz");
        fire(&mut widget, generation);
        widget.on_key(KeyEvent::plain(KeyCode::Esc));
        assert_eq!(
            screen(&widget),
            vec!["> Search type here... ✕", "  Alice", "  Bob", "  Alicia"]
        );
        assert_eq!(widget.cursor_pos().map(|pos| pos.col), Some(2));
    }

    #[test]
    fn first_click_focuses_and_activates_once() {
        let (mut widget, log) = widget_with(StaticDataSource::new(people()));
        let result = widget.on_mouse(MouseEvent {
            kind: MouseKind::LeftDown,
            col: 4,
            row: 0,
        });
        assert!(result.handled);
        assert!(widget.state().focused());
        assert_eq!(
            log.events(),
            vec![AutocompleteEvent::Activated(true), AutocompleteEvent::Focused]
        );

        click(&mut widget, 4, 0);
        assert_eq!(
            log.events(),
            vec![
                AutocompleteEvent::Activated(true),
                AutocompleteEvent::Focused,
                AutocompleteEvent::Activated(false),
            ]
        );
    }

    #[test]
    fn first_click_on_glyph_focuses_and_clears() {
        let (mut widget, log) = widget_with(StaticDataSource::new(people()));
        // "> Search type here... ✕": prompt, placeholder and a space.
        let result = widget.on_mouse(MouseEvent {
            kind: MouseKind::LeftDown,
            col: 22,
            row: 0,
        });
        assert!(widget.state().focused());
        assert!(result.commands.contains(&SchedulerCommand::Cancel {
            key: ID.to_string()
        }));
        assert_eq!(
            log.events(),
            vec![AutocompleteEvent::Activated(true), AutocompleteEvent::Focused]
        );
    }

    #[test]
    fn keys_are_ignored_without_focus() {
        let (mut widget, _) = widget_with(StaticDataSource::new(people()));
        let result = widget.on_key(KeyEvent::plain(KeyCode::Char('a')));
        assert!(!result.handled);
        assert_eq!(widget.query(), "");
        assert!(widget.cursor_pos().is_none());
    }

    struct Offline;

    impl DataSource<Record> for Offline {
        fn fetch(&self) -> Result<Vec<Record>, FetchError> {
            Err(FetchError::Transport("connection refused".to_string()))
        }
    }

    #[test]
    fn fetch_failure_shows_error_and_keeps_input_usable() {
        let (mut widget, _) = widget_with(Offline);
        widget.on_focus();
        wait_loaded(&mut widget);

        assert!(matches!(widget.error(), Some(FetchError::Transport(_))));
        let lines = screen(&widget);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("Could not load suggestions"));

        let generation = type_text(&mut widget, "al");
        fire(&mut widget, generation);
        assert_eq!(screen(&widget)[2], "  No results found");
    }
}
