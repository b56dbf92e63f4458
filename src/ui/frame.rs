use crate::terminal::CursorPos;
use crate::ui::span::SpanLine;

/// Everything the terminal needs to paint one screen.
#[derive(Debug, Default, Clone)]
pub struct RenderFrame {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<CursorPos>,
}

impl RenderFrame {
    pub fn push_line(&mut self, line: SpanLine) -> u16 {
        self.lines.push(line);
        (self.lines.len() - 1).min(u16::MAX as usize) as u16
    }

    pub fn row_count(&self) -> u16 {
        self.lines.len().min(u16::MAX as usize) as u16
    }
}
