#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    pub offset: usize,
    pub max_visible: Option<usize>,
}

impl ScrollState {
    pub fn new(max_visible: Option<usize>) -> Self {
        Self {
            offset: 0,
            max_visible,
        }
    }

    pub fn ensure_visible(&mut self, active: usize, total: usize) {
        let Some(max) = self.max_visible else {
            return;
        };
        if total <= max {
            self.offset = 0;
            return;
        }
        if active < self.offset {
            self.offset = active;
            return;
        }
        let last = self.offset.saturating_add(max).saturating_sub(1);
        if active > last {
            self.offset = active + 1 - max;
        }
    }

    pub fn clamp(&mut self, total: usize) {
        let Some(max) = self.max_visible else {
            self.offset = 0;
            return;
        };
        self.offset = self.offset.min(total.saturating_sub(max));
    }

    pub fn visible_range(&self, total: usize) -> (usize, usize) {
        match self.max_visible {
            Some(limit) => {
                let start = self.offset.min(total);
                let end = (start + limit).min(total);
                (start, end)
            }
            None => (0, total),
        }
    }

    pub fn footer(&self, total: usize) -> Option<String> {
        let max = self.max_visible?;
        if total <= max {
            return None;
        }
        let (start, end) = self.visible_range(total);
        let can_up = start > 0;
        let can_down = end < total;
        let arrow = match (can_up, can_down) {
            (true, true) => " ↑↓",
            (true, false) => " ↑",
            (false, true) => " ↓",
            (false, false) => "",
        };
        Some(format!("[{}-{} of {}]{}", start + 1, end, total, arrow))
    }
}

#[cfg(test)]
mod tests {
    use super::ScrollState;

    #[test]
    fn window_follows_active_row() {
        let mut scroll = ScrollState::new(Some(3));
        scroll.ensure_visible(4, 10);
        assert_eq!(scroll.visible_range(10), (2, 5));
        scroll.ensure_visible(0, 10);
        assert_eq!(scroll.visible_range(10), (0, 3));
    }

    #[test]
    fn clamp_pulls_offset_back_when_list_shrinks() {
        let mut scroll = ScrollState::new(Some(3));
        scroll.offset = 7;
        scroll.clamp(4);
        assert_eq!(scroll.offset, 1);
        scroll.clamp(2);
        assert_eq!(scroll.offset, 0);
    }

    #[test]
    fn footer_only_when_list_overflows() {
        let scroll = ScrollState::new(Some(3));
        assert_eq!(scroll.footer(3), None);
        assert_eq!(scroll.footer(5).as_deref(), Some("[1-3 of 5] ↓"));
        assert_eq!(ScrollState::new(None).footer(50), None);
    }
}
