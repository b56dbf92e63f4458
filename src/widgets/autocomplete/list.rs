use crate::core::candidate::Candidate;
use crate::core::search::matcher::{MatchSpan, Suggestion};
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use crate::widgets::components::scroll::ScrollState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent<C> {
    Hovered(C),
    /// The controller decides whether this row can actually be selected.
    SelectRequested(Suggestion<C>),
}

/// Presents the current rows. The only state it keeps is which row the
/// pointer (or keyboard) is over, by candidate id, plus the scroll window.
#[derive(Debug, Clone, Default)]
pub struct SuggestionListView {
    hover_id: Option<i64>,
    scroll: ScrollState,
}

impl SuggestionListView {
    pub fn new(max_visible: Option<usize>) -> Self {
        Self {
            hover_id: None,
            scroll: ScrollState::new(max_visible),
        }
    }

    pub fn hover_id(&self) -> Option<i64> {
        self.hover_id
    }

    pub fn pointer_enter<C: Candidate>(&mut self, row: &Suggestion<C>) -> Option<ListEvent<C>> {
        let id = row.id();
        if self.hover_id == Some(id) {
            return None;
        }
        self.hover_id = Some(id);
        row.candidate()
            .map(|candidate| ListEvent::Hovered(candidate.clone()))
    }

    pub fn pointer_leave(&mut self) {
        self.hover_id = None;
    }

    pub fn click<C: Candidate>(&self, row: &Suggestion<C>) -> ListEvent<C> {
        ListEvent::SelectRequested(row.clone())
    }

    /// Moves the hover by `delta` rows, wrapping past either end. With nothing
    /// hovered, Down starts at the first row and Up at the last.
    pub fn move_hover<C: Candidate>(
        &mut self,
        rows: &[Suggestion<C>],
        delta: isize,
    ) -> Option<ListEvent<C>> {
        if rows.is_empty() {
            return None;
        }
        let len = rows.len() as isize;
        let next = match self.hovered_index(rows) {
            Some(index) => (index as isize + delta).rem_euclid(len) as usize,
            None if delta < 0 => rows.len() - 1,
            None => 0,
        };
        self.scroll.ensure_visible(next, rows.len());
        self.pointer_enter(&rows[next])
    }

    pub fn hovered<'a, C: Candidate>(&self, rows: &'a [Suggestion<C>]) -> Option<&'a Suggestion<C>> {
        self.hovered_index(rows).map(|index| &rows[index])
    }

    pub fn activate_hovered<C: Candidate>(&self, rows: &[Suggestion<C>]) -> Option<ListEvent<C>> {
        self.hovered(rows).map(|row| self.click(row))
    }

    /// Drops a hover whose row is gone and keeps the scroll window in range.
    pub fn sync<C: Candidate>(&mut self, rows: &[Suggestion<C>]) {
        if self.hovered_index(rows).is_none() {
            self.hover_id = None;
        }
        self.scroll.clamp(rows.len());
    }

    /// Row under the `line`-th drawn line of the list.
    pub fn row_at<'a, C: Candidate>(
        &self,
        rows: &'a [Suggestion<C>],
        line: usize,
    ) -> Option<&'a Suggestion<C>> {
        let (start, end) = self.scroll.visible_range(rows.len());
        let index = start + line;
        (index < end).then(|| &rows[index])
    }

    /// Draws the visible rows. `render_name` turns a name, its match and the
    /// row's base style into the spans after the hover marker.
    pub fn draw<C, R>(&self, rows: &[Suggestion<C>], render_name: R) -> Vec<SpanLine>
    where
        C: Candidate,
        R: Fn(&str, Option<MatchSpan>, Style) -> SpanLine,
    {
        let (start, end) = self.scroll.visible_range(rows.len());
        let mut lines = rows[start..end]
            .iter()
            .map(|row| self.draw_row(row, &render_name))
            .collect::<Vec<_>>();
        if let Some(footer) = self.scroll.footer(rows.len()) {
            lines.push(vec![Span::styled(
                format!("  {footer}"),
                Style::new().color(Color::DarkGrey),
            )]);
        }
        lines
    }

    fn draw_row<C, R>(&self, row: &Suggestion<C>, render_name: &R) -> SpanLine
    where
        C: Candidate,
        R: Fn(&str, Option<MatchSpan>, Style) -> SpanLine,
    {
        if row.is_sentinel() {
            return vec![
                Span::new("  "),
                Span::styled(row.name(), Style::new().color(Color::DarkGrey)),
            ];
        }

        let hovered = self.hover_id == Some(row.id());
        let (marker, base) = if hovered {
            ("› ", Style::new().color(Color::Cyan))
        } else {
            ("  ", Style::default())
        };
        let mut line = vec![Span::styled(marker, base)];
        line.extend(render_name(row.name(), row.span(), base));
        line
    }

    fn hovered_index<C: Candidate>(&self, rows: &[Suggestion<C>]) -> Option<usize> {
        let id = self.hover_id?;
        rows.iter().position(|row| row.id() == id)
    }
}
