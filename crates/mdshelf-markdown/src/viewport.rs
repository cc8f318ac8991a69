/// Vertical scroll state for the viewer pane.
///
/// Content height is in terminal rows; `y` is the first visible row and is kept
/// clamped so the viewport never scrolls past the content.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewportState {
    pub y: u32,
    pub viewport_h: u16,
    pub content_h: u32,
}

impl ViewportState {
    pub fn set_viewport_height(&mut self, h: u16) {
        self.viewport_h = h;
        self.clamp();
    }

    pub fn set_content_height(&mut self, h: u32) {
        self.content_h = h;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.y = self.y.min(self.max_y());
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = self.y as i64 + delta as i64;
        self.y = next.clamp(0, self.max_y() as i64) as u32;
    }

    pub fn page_down(&mut self) {
        self.scroll_by(self.viewport_h.saturating_sub(1) as i32);
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-(self.viewport_h.saturating_sub(1) as i32));
    }

    pub fn half_page_down(&mut self) {
        self.scroll_by((self.viewport_h / 2).max(1) as i32);
    }

    pub fn half_page_up(&mut self) {
        self.scroll_by(-((self.viewport_h / 2).max(1) as i32));
    }

    pub fn to_top(&mut self) {
        self.y = 0;
    }

    pub fn to_bottom(&mut self) {
        self.y = self.max_y();
    }

    /// Percentage of content scrolled past the viewport bottom, or `None` when
    /// everything fits.
    pub fn percent(&self) -> Option<u8> {
        if self.content_h == 0 || self.content_h <= self.viewport_h as u32 {
            return None;
        }
        let visible_bottom = self.y.saturating_add(self.viewport_h as u32) as f64;
        let pct = (visible_bottom / self.content_h as f64 * 100.0).round();
        Some(pct.clamp(0.0, 100.0) as u8)
    }

    fn max_y(&self) -> u32 {
        self.content_h.saturating_sub(self.viewport_h as u32)
    }
}
