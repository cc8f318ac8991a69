//! Virtualized viewer over a document's chunk sequence.
//!
//! Each chunk renders independently, so opening a large document costs one
//! chunk render, not a whole-document render. Chunk heights start as estimates
//! (raw line counts) and are replaced by measured heights the first time a
//! chunk is rendered at the current width; only chunks intersecting the
//! viewport are rendered per frame.

use crate::render;
use crate::theme::Theme;
use crate::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollAction {
    Up,
    Down,
    PageUp,
    PageDown,
    HalfPageUp,
    HalfPageDown,
    Top,
    Bottom,
}

#[derive(Clone, Debug)]
pub struct ChunkedDocViewOptions {
    pub show_scrollbar: bool,
}

impl Default for ChunkedDocViewOptions {
    fn default() -> Self {
        Self {
            show_scrollbar: true,
        }
    }
}

#[derive(Default)]
pub struct ChunkedDocView {
    chunks: Vec<String>,
    heights: Vec<u32>,
    measured: Vec<bool>,
    cache: Vec<Option<Vec<Line<'static>>>>,
    cached_width: Option<u16>,
    pub viewport: ViewportState,
    options: ChunkedDocViewOptions,
}

impl ChunkedDocView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ChunkedDocViewOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Replaces the displayed chunk sequence and rewinds to the top.
    pub fn set_chunks(&mut self, chunks: &[String]) {
        self.chunks = chunks.to_vec();
        self.reset_layout();
        self.viewport.y = 0;
    }

    pub fn clear(&mut self) {
        self.set_chunks(&[]);
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Drops cached renders (heights stay trusted). Call on theme change;
    /// layout is identical across themes, only styles differ.
    pub fn invalidate_styles(&mut self) {
        for slot in &mut self.cache {
            *slot = None;
        }
    }

    pub fn handle_scroll(&mut self, action: ScrollAction) {
        match action {
            ScrollAction::Up => self.viewport.scroll_by(-1),
            ScrollAction::Down => self.viewport.scroll_by(1),
            ScrollAction::PageUp => self.viewport.page_up(),
            ScrollAction::PageDown => self.viewport.page_down(),
            ScrollAction::HalfPageUp => self.viewport.half_page_up(),
            ScrollAction::HalfPageDown => self.viewport.half_page_down(),
            ScrollAction::Top => self.viewport.to_top(),
            ScrollAction::Bottom => self.viewport.to_bottom(),
        }
    }

    pub fn scroll_percent(&self) -> Option<u8> {
        self.viewport.percent()
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let (text_area, scrollbar_x) = if self.options.show_scrollbar && area.width >= 2 {
            (
                Rect::new(area.x, area.y, area.width - 1, area.height),
                Some(area.x + area.width - 1),
            )
        } else {
            (area, None)
        };

        if self.cached_width != Some(text_area.width) {
            self.cached_width = Some(text_area.width);
            self.reset_layout();
        }

        self.viewport.set_viewport_height(text_area.height);
        self.measure_visible(text_area.width, theme);
        self.viewport.set_content_height(self.total_height());

        self.draw_visible(text_area, buf, theme);

        if let Some(sb_x) = scrollbar_x {
            self.draw_scrollbar(Rect::new(sb_x, area.y, 1, area.height), buf, theme.text_muted);
        }
    }

    /// One-column scrollbar in `area`: a blank track when everything fits,
    /// otherwise a thumb whose size is the visible fraction of the content and
    /// whose offset divides the free track in proportion to the scroll offset.
    fn draw_scrollbar(&self, area: Rect, buf: &mut Buffer, style: ratatui::style::Style) {
        if area.height == 0 {
            return;
        }
        let track = area.height as u32;
        let content = self.viewport.content_h;
        let visible = self.viewport.viewport_h as u32;
        if content <= visible {
            for dy in 0..area.height {
                buf.set_stringn(area.x, area.y + dy, " ", 1, style);
            }
            return;
        }

        let thumb = (visible * track / content).clamp(1, track);
        let free = (track - thumb) as u64;
        let max_y = (content - visible) as u64;
        let top = ((self.viewport.y as u64 * free + max_y / 2) / max_y) as u32;

        for dy in 0..area.height {
            let row = dy as u32;
            let on_thumb = row >= top && row < top + thumb;
            let ch = if on_thumb { "█" } else { " " };
            buf.set_stringn(area.x, area.y + dy, ch, 1, style);
        }
    }

    fn reset_layout(&mut self) {
        self.heights = self
            .chunks
            .iter()
            .map(|c| c.lines().count().max(1) as u32)
            .collect();
        self.measured = vec![false; self.chunks.len()];
        self.cache = vec![None; self.chunks.len()];
        self.viewport.set_content_height(self.total_height());
    }

    fn total_height(&self) -> u32 {
        self.heights.iter().sum()
    }

    /// Renders every chunk intersecting the viewport that is not cached yet.
    /// Measuring a chunk shifts the offsets of everything below it, so the walk
    /// restarts after each new measurement until the visible set is stable.
    fn measure_visible(&mut self, width: u16, theme: &Theme) {
        loop {
            self.viewport.clamp();
            let top = self.viewport.y;
            let bottom = top + self.viewport.viewport_h as u32;

            let mut offset = 0u32;
            let mut remeasured = false;
            for idx in 0..self.chunks.len() {
                let h = self.heights[idx];
                if offset < bottom && offset + h > top && self.cache[idx].is_none() {
                    let lines = render::render_markdown(&self.chunks[idx], width, theme);
                    let new_h = (lines.len() as u32).max(1);
                    self.cache[idx] = Some(lines);
                    if !self.measured[idx] {
                        self.measured[idx] = true;
                        if new_h != h {
                            self.heights[idx] = new_h;
                            self.viewport.set_content_height(self.total_height());
                            remeasured = true;
                            break;
                        }
                    }
                }
                offset += self.heights[idx];
                if offset >= bottom {
                    break;
                }
            }
            if !remeasured {
                return;
            }
        }
    }

    fn draw_visible(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        buf.set_style(area, theme.text_primary);
        let top = self.viewport.y;
        let bottom = top + area.height as u32;

        let mut offset = 0u32;
        for idx in 0..self.chunks.len() {
            let h = self.heights[idx];
            if offset + h > top && offset < bottom {
                let Some(lines) = self.cache[idx].as_ref() else {
                    offset += h;
                    continue;
                };
                for (line_idx, line) in lines.iter().enumerate() {
                    let row = offset + line_idx as u32;
                    if row < top {
                        continue;
                    }
                    if row >= bottom {
                        break;
                    }
                    let y = area.y + (row - top) as u16;
                    buf.set_line(area.x, y, line, area.width);
                }
            }
            offset += h;
            if offset >= bottom {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(w: u16, h: u16) -> Buffer {
        Buffer::empty(Rect::new(0, 0, w, h))
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        let area = buf.area;
        (0..area.width)
            .map(|x| buf.cell((x, y)).unwrap().symbol())
            .collect::<String>()
    }

    #[test]
    fn renders_visible_chunk_text() {
        let mut view = ChunkedDocView::with_options(ChunkedDocViewOptions {
            show_scrollbar: false,
        });
        view.set_chunks(&["hello world".to_string()]);
        let mut buf = buffer(20, 3);
        view.render(Rect::new(0, 0, 20, 3), &mut buf, &Theme::default());
        assert!(row_text(&buf, 0).starts_with("hello world"));
    }

    #[test]
    fn empty_view_renders_nothing() {
        let mut view = ChunkedDocView::new();
        let mut buf = buffer(10, 3);
        view.render(Rect::new(0, 0, 10, 3), &mut buf, &Theme::default());
        assert_eq!(view.chunk_count(), 0);
        assert!(row_text(&buf, 0).trim().is_empty());
    }

    #[test]
    fn measurement_replaces_estimates_for_visible_chunks() {
        let mut view = ChunkedDocView::with_options(ChunkedDocViewOptions {
            show_scrollbar: false,
        });
        // One raw line that must wrap into several rendered rows.
        let chunk = "word ".repeat(30);
        view.set_chunks(&[chunk.trim_end().to_string()]);
        assert_eq!(view.heights[0], 1);

        let mut buf = buffer(10, 5);
        view.render(Rect::new(0, 0, 10, 5), &mut buf, &Theme::default());
        assert!(view.measured[0]);
        assert!(view.heights[0] > 1);
        assert_eq!(view.viewport.content_h, view.heights.iter().sum::<u32>());
    }

    #[test]
    fn scrolling_is_clamped_to_content() {
        let mut view = ChunkedDocView::with_options(ChunkedDocViewOptions {
            show_scrollbar: false,
        });
        // Six one-line paragraphs separated by blanks: 11 rendered rows.
        view.set_chunks(&["a\n\nb\n\nc\n\nd\n\ne\n\nf".to_string()]);
        let mut buf = buffer(10, 3);
        view.render(Rect::new(0, 0, 10, 3), &mut buf, &Theme::default());

        for _ in 0..50 {
            view.handle_scroll(ScrollAction::Down);
        }
        view.render(Rect::new(0, 0, 10, 3), &mut buf, &Theme::default());
        assert_eq!(view.viewport.y, view.viewport.content_h - 3);
        assert!(row_text(&buf, 2).starts_with('f'));

        view.handle_scroll(ScrollAction::Top);
        assert_eq!(view.viewport.y, 0);
    }

    #[test]
    fn set_chunks_rewinds_scroll() {
        let mut view = ChunkedDocView::new();
        view.set_chunks(&["x\n".repeat(50)]);
        let mut buf = buffer(10, 4);
        view.render(Rect::new(0, 0, 10, 4), &mut buf, &Theme::default());
        view.handle_scroll(ScrollAction::Bottom);
        assert!(view.viewport.y > 0);

        view.set_chunks(&["short".to_string()]);
        assert_eq!(view.viewport.y, 0);
    }

    #[test]
    fn only_visible_chunks_are_rendered() {
        let mut view = ChunkedDocView::with_options(ChunkedDocViewOptions {
            show_scrollbar: false,
        });
        let chunks: Vec<String> = (0..20).map(|i| format!("chunk {i}\nline\nline")).collect();
        view.set_chunks(&chunks);
        let mut buf = buffer(20, 4);
        view.render(Rect::new(0, 0, 20, 4), &mut buf, &Theme::default());
        assert!(view.cache[0].is_some());
        assert!(view.cache[19].is_none());
    }

    #[test]
    fn scrollbar_thumb_tracks_scroll_position() {
        let mut view = ChunkedDocView::new();
        // 20 one-line paragraphs: 39 rendered rows, far taller than the pane.
        view.set_chunks(&["p\n\n".repeat(20)]);
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = buffer(10, 4);
        view.render(area, &mut buf, &Theme::default());
        assert_eq!(buf.cell((9, 0)).unwrap().symbol(), "█");
        assert_eq!(buf.cell((9, 3)).unwrap().symbol(), " ");

        view.handle_scroll(ScrollAction::Bottom);
        view.render(area, &mut buf, &Theme::default());
        assert_eq!(buf.cell((9, 0)).unwrap().symbol(), " ");
        assert_eq!(buf.cell((9, 3)).unwrap().symbol(), "█");
    }

    #[test]
    fn scrollbar_is_blank_when_content_fits() {
        let mut view = ChunkedDocView::new();
        view.set_chunks(&["short".to_string()]);
        let mut buf = buffer(10, 4);
        view.render(Rect::new(0, 0, 10, 4), &mut buf, &Theme::default());
        for y in 0..4 {
            assert_eq!(buf.cell((9, y)).unwrap().symbol(), " ");
        }
    }

    #[test]
    fn scroll_percent_tracks_position() {
        let mut view = ChunkedDocView::with_options(ChunkedDocViewOptions {
            show_scrollbar: false,
        });
        view.set_chunks(&["l\n".repeat(40)]);
        let mut buf = buffer(10, 4);
        view.render(Rect::new(0, 0, 10, 4), &mut buf, &Theme::default());
        view.handle_scroll(ScrollAction::Bottom);
        assert_eq!(view.scroll_percent(), Some(100));
    }
}
