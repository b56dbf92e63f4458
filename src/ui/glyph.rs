use crate::ui::span::Span;
use crate::ui::style::{Color, Style};

/// Close mark drawn at the end of the input line; clicking it clears the query.
pub const CLOSE_GLYPH: &str = "✕";

pub fn close_span() -> Span {
    Span::styled(CLOSE_GLYPH, Style::new().color(Color::DarkGrey))
}
