use crate::core::search::matcher::MatchSpan;
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::Style;

/// A name cut around its match span. Borrowed slices keep the name's own casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlighted<'a> {
    Plain(&'a str),
    Split {
        prefix: &'a str,
        matched: &'a str,
        suffix: &'a str,
    },
}

impl<'a> Highlighted<'a> {
    /// Ordered `(text, emphasized)` pieces, skipping empty ones.
    pub fn segments(&self) -> Vec<(&'a str, bool)> {
        match *self {
            Self::Plain(text) => vec![(text, false)],
            Self::Split {
                prefix,
                matched,
                suffix,
            } => [(prefix, false), (matched, true), (suffix, false)]
                .into_iter()
                .filter(|(text, _)| !text.is_empty())
                .collect(),
        }
    }

    pub fn to_text(&self) -> String {
        self.segments().into_iter().map(|(text, _)| text).collect()
    }
}

pub fn split_name(name: &str, span: Option<MatchSpan>) -> Highlighted<'_> {
    let Some(span) = span else {
        return Highlighted::Plain(name);
    };
    let start = byte_index_at_char(name, span.start);
    let end = byte_index_at_char(name, span.end.max(span.start));
    if start == end {
        return Highlighted::Plain(name);
    }

    Highlighted::Split {
        prefix: &name[..start],
        matched: &name[start..end],
        suffix: &name[end..],
    }
}

pub fn render_name_spans(
    name: &str,
    span: Option<MatchSpan>,
    base_style: Style,
    highlight_style: Style,
) -> SpanLine {
    split_name(name, span)
        .segments()
        .into_iter()
        .map(|(text, emphasized)| {
            let style = if emphasized {
                base_style.merge(highlight_style)
            } else {
                base_style
            };
            Span::styled(text, style)
        })
        .collect()
}

fn byte_index_at_char(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}
