//! Markdown to styled terminal lines.
//!
//! Parsing happens once per chunk via `pulldown-cmark`; layout wraps prose to
//! the current pane width. Only known Markdown constructs and math spans reach
//! the output: raw HTML events are dropped entirely, which is the terminal
//! equivalent of sanitizing rendered HTML down to an allow-list.

use crate::theme::Theme;
use pulldown_cmark::Event;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;
use pulldown_cmark::TagEnd;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct InlineFlags {
    strong: bool,
    emphasis: bool,
    strike: bool,
    link: bool,
    code: bool,
    math: bool,
    muted: bool,
}

/// A run of text with uniform styling inside one logical prose line.
#[derive(Clone, Debug)]
struct Piece {
    text: String,
    flags: InlineFlags,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProseKind {
    Normal,
    Heading(u8),
}

#[derive(Clone, Debug)]
struct ProseBlock {
    kind: ProseKind,
    lines: Vec<Vec<Piece>>,
    first_prefix: String,
    cont_prefix: String,
}

#[derive(Clone, Debug)]
enum Block {
    Prose(ProseBlock),
    Code { lines: Vec<String>, prefix: String },
    Rule { prefix: String },
    Blank,
}

struct ListCtx {
    next_index: Option<u64>,
}

struct Builder {
    blocks: Vec<Block>,
    para_lines: Vec<Vec<Piece>>,
    para_current: Vec<Piece>,
    para_kind: ProseKind,
    flags: InlineFlags,
    quote_depth: usize,
    list_stack: Vec<ListCtx>,
    item_marker: Option<String>,
    in_code: bool,
    code_lines: Vec<String>,
    code_current: String,
    link_dest: Option<String>,
    wants_blank: bool,
}

impl Builder {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            para_lines: Vec::new(),
            para_current: Vec::new(),
            para_kind: ProseKind::Normal,
            flags: InlineFlags::default(),
            quote_depth: 0,
            list_stack: Vec::new(),
            item_marker: None,
            in_code: false,
            code_lines: Vec::new(),
            code_current: String::new(),
            link_dest: None,
            wants_blank: false,
        }
    }

    fn quote_prefix(&self) -> String {
        "| ".repeat(self.quote_depth)
    }

    fn list_indent(&self) -> String {
        "  ".repeat(self.list_stack.len().saturating_sub(1))
    }

    /// First-line and continuation prefixes for the next prose block. The item
    /// marker is consumed by the first paragraph of the item; later paragraphs
    /// hang under it.
    fn take_prefixes(&mut self) -> (String, String) {
        let base = format!("{}{}", self.quote_prefix(), self.list_indent());
        match self.item_marker.take() {
            Some(marker) => {
                let cont = format!("{base}{}", " ".repeat(marker.width()));
                (format!("{base}{marker}"), cont)
            }
            None if !self.list_stack.is_empty() => {
                let hang = format!("{base}  ");
                (hang.clone(), hang)
            }
            None => (base.clone(), base),
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.para_current.last_mut() {
            if last.flags == self.flags {
                last.text.push_str(text);
                return;
            }
        }
        self.para_current.push(Piece {
            text: text.to_string(),
            flags: self.flags,
        });
    }

    fn push_piece(&mut self, text: String, flags: InlineFlags) {
        self.para_current.push(Piece { text, flags });
    }

    fn maybe_blank(&mut self) {
        if self.wants_blank {
            self.blocks.push(Block::Blank);
            self.wants_blank = false;
        }
    }

    fn flush_para(&mut self) {
        if !self.para_current.is_empty() {
            let line = std::mem::take(&mut self.para_current);
            self.para_lines.push(line);
        }
        if self.para_lines.is_empty() {
            return;
        }
        self.maybe_blank();
        let (first_prefix, cont_prefix) = self.take_prefixes();
        self.blocks.push(Block::Prose(ProseBlock {
            kind: self.para_kind,
            lines: std::mem::take(&mut self.para_lines),
            first_prefix,
            cont_prefix,
        }));
        self.para_kind = ProseKind::Normal;
        self.wants_blank = true;
    }

    fn flush_code(&mut self) {
        if !self.in_code {
            return;
        }
        if !self.code_current.is_empty() {
            let line = std::mem::take(&mut self.code_current);
            self.code_lines.push(line);
        }
        while self.code_lines.last().is_some_and(|l| l.is_empty()) {
            self.code_lines.pop();
        }
        self.maybe_blank();
        let (_, cont) = self.take_prefixes();
        self.blocks.push(Block::Code {
            lines: std::mem::take(&mut self.code_lines),
            prefix: cont,
        });
        self.in_code = false;
        self.wants_blank = true;
    }
}

fn parse_blocks(input: &str) -> Vec<Block> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_MATH);
    let parser = Parser::new_ext(input, options);

    let mut b = Builder::new();

    for event in parser {
        match event {
            Event::Start(tag) => match tag {
                Tag::Paragraph => {
                    b.flush_para();
                    b.para_kind = ProseKind::Normal;
                }
                Tag::Heading { level, .. } => {
                    b.flush_para();
                    b.para_kind = ProseKind::Heading(level as u8);
                }
                Tag::BlockQuote(_) => {
                    b.flush_para();
                    b.quote_depth += 1;
                }
                // Language tags are accepted but unused; there is no highlighter.
                Tag::CodeBlock(_) => {
                    b.flush_para();
                    b.in_code = true;
                }
                Tag::List(start) => {
                    b.flush_para();
                    b.list_stack.push(ListCtx { next_index: start });
                }
                Tag::Item => {
                    b.flush_para();
                    let marker = match b.list_stack.last_mut() {
                        Some(ListCtx {
                            next_index: Some(n),
                        }) => {
                            let marker = format!("{n}. ");
                            *n += 1;
                            marker
                        }
                        _ => "• ".to_string(),
                    };
                    b.item_marker = Some(marker);
                    // List items are tight by default: no blank between them.
                    b.wants_blank = false;
                }
                Tag::Emphasis => b.flags.emphasis = true,
                Tag::Strong => b.flags.strong = true,
                Tag::Strikethrough => b.flags.strike = true,
                Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => {
                    b.flags.link = true;
                    b.link_dest = Some(dest_url.to_string());
                }
                _ => {}
            },
            Event::End(tag) => match tag {
                TagEnd::Paragraph | TagEnd::Heading(_) => b.flush_para(),
                TagEnd::BlockQuote(_) => {
                    b.flush_para();
                    b.quote_depth = b.quote_depth.saturating_sub(1);
                }
                TagEnd::CodeBlock => b.flush_code(),
                TagEnd::List(_) => {
                    b.flush_para();
                    b.list_stack.pop();
                    if b.list_stack.is_empty() {
                        b.wants_blank = true;
                    }
                }
                TagEnd::Item => {
                    b.flush_para();
                    b.item_marker = None;
                }
                TagEnd::Emphasis => b.flags.emphasis = false,
                TagEnd::Strong => b.flags.strong = false,
                TagEnd::Strikethrough => b.flags.strike = false,
                TagEnd::Link | TagEnd::Image => {
                    b.flags.link = false;
                    if let Some(dest) = b.link_dest.take() {
                        if !dest.is_empty() {
                            let flags = InlineFlags {
                                muted: true,
                                ..InlineFlags::default()
                            };
                            b.push_piece(format!(" ({dest})"), flags);
                        }
                    }
                }
                _ => {}
            },
            Event::Text(text) => {
                if b.in_code {
                    for ch in text.chars() {
                        match ch {
                            '\n' => {
                                let line = std::mem::take(&mut b.code_current);
                                b.code_lines.push(line);
                            }
                            '\r' => {}
                            '\t' => b.code_current.push_str("    "),
                            other => b.code_current.push(other),
                        }
                    }
                } else {
                    b.push_text(&text);
                }
            }
            Event::Code(code) => {
                let flags = InlineFlags {
                    code: true,
                    ..b.flags
                };
                b.push_piece(code.to_string(), flags);
            }
            Event::InlineMath(math) => {
                let flags = InlineFlags {
                    math: true,
                    ..b.flags
                };
                b.push_piece(format!("${math}$"), flags);
            }
            Event::DisplayMath(math) => {
                b.flush_para();
                let flags = InlineFlags {
                    math: true,
                    ..InlineFlags::default()
                };
                b.push_piece(format!("$$ {math} $$"), flags);
                b.flush_para();
            }
            Event::SoftBreak => b.push_text(" "),
            Event::HardBreak => {
                if !b.para_current.is_empty() {
                    let line = std::mem::take(&mut b.para_current);
                    b.para_lines.push(line);
                }
            }
            Event::Rule => {
                b.flush_para();
                b.maybe_blank();
                let (_, prefix) = b.take_prefixes();
                b.blocks.push(Block::Rule { prefix });
                b.wants_blank = true;
            }
            // Sanitization boundary: raw HTML never reaches the screen.
            Event::Html(_) | Event::InlineHtml(_) => {}
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                b.push_text(marker);
            }
            Event::FootnoteReference(label) => {
                let flags = InlineFlags {
                    muted: true,
                    ..b.flags
                };
                b.push_piece(format!("[^{label}]"), flags);
            }
        }
    }

    b.flush_para();
    b.flush_code();
    while matches!(b.blocks.last(), Some(Block::Blank)) {
        b.blocks.pop();
    }
    b.blocks
}

fn style_for(flags: InlineFlags, kind: ProseKind, theme: &Theme) -> Style {
    if flags.code {
        return theme.code;
    }
    if flags.math {
        return theme.math;
    }
    if flags.muted {
        return theme.text_muted;
    }
    if flags.link {
        return theme.link;
    }
    let mut style = match kind {
        // Deep headings drop to an italic variant so levels stay readable
        // without per-level colors.
        ProseKind::Heading(level) if level >= 3 => theme.heading.add_modifier(Modifier::ITALIC),
        ProseKind::Heading(_) => theme.heading,
        ProseKind::Normal => theme.text_primary,
    };
    if flags.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if flags.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if flags.strike {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    style
}

/// Renders one Markdown chunk into styled lines wrapped to `width` cells.
pub fn render_markdown(input: &str, width: u16, theme: &Theme) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut out = Vec::new();
    for block in parse_blocks(input) {
        match block {
            Block::Prose(prose) => layout_prose(&prose, width, theme, &mut out),
            Block::Code { lines, prefix } => {
                for line in lines {
                    out.push(Line::from(vec![
                        Span::styled(prefix.clone(), theme.text_muted),
                        Span::styled("    ", theme.code_block),
                        Span::styled(line, theme.code_block),
                    ]));
                }
            }
            Block::Rule { prefix } => {
                let fill = (width as usize).saturating_sub(prefix.width()).max(1);
                out.push(Line::from(vec![
                    Span::styled(prefix, theme.text_muted),
                    Span::styled("─".repeat(fill), theme.rule),
                ]));
            }
            Block::Blank => out.push(Line::default()),
        }
    }
    out
}

fn layout_prose(prose: &ProseBlock, width: u16, theme: &Theme, out: &mut Vec<Line<'static>>) {
    let mut first = true;
    for logical in &prose.lines {
        let mut wrapper = LineWrapper::new(
            width,
            if first {
                prose.first_prefix.clone()
            } else {
                prose.cont_prefix.clone()
            },
            prose.cont_prefix.clone(),
            theme.text_muted,
        );
        for piece in logical {
            let style = style_for(piece.flags, prose.kind, theme);
            wrapper.push(&piece.text, style);
        }
        wrapper.finish(out);
        first = false;
    }
}

/// Greedy word-wrapper that emits `Line`s as it fills each row.
struct LineWrapper {
    width: usize,
    next_prefix: String,
    cont_prefix: String,
    prefix_style: Style,
    spans: Vec<Span<'static>>,
    cols: usize,
    emitted: Vec<Line<'static>>,
}

impl LineWrapper {
    fn new(width: u16, first_prefix: String, cont_prefix: String, prefix_style: Style) -> Self {
        Self {
            width: width as usize,
            next_prefix: first_prefix,
            cont_prefix,
            prefix_style,
            spans: Vec::new(),
            cols: 0,
            emitted: Vec::new(),
        }
    }

    fn avail(&self) -> usize {
        self.width.saturating_sub(self.next_prefix.width()).max(1)
    }

    fn push(&mut self, text: &str, style: Style) {
        for token in tokenize(text) {
            let token_w = token.width();
            if self.cols + token_w > self.avail() && self.cols > 0 {
                self.break_line();
                if token.trim().is_empty() {
                    continue;
                }
            }
            if token_w > self.avail() && self.cols == 0 {
                self.push_hard_split(token, style);
                continue;
            }
            if self.cols == 0 && token.trim().is_empty() {
                continue;
            }
            self.spans.push(Span::styled(token.to_string(), style));
            self.cols += token_w;
        }
    }

    /// Splits a single over-wide token (a long URL, say) across rows.
    fn push_hard_split(&mut self, token: &str, style: Style) {
        let mut current = String::new();
        let mut cols = 0;
        for ch in token.chars() {
            let w = ch.width().unwrap_or(0);
            if cols + w > self.avail() && cols > 0 {
                let text = std::mem::take(&mut current);
                self.spans.push(Span::styled(text, style));
                self.cols = cols;
                self.break_line();
                cols = 0;
            }
            current.push(ch);
            cols += w;
        }
        if !current.is_empty() {
            self.spans.push(Span::styled(current, style));
            self.cols = cols;
        }
    }

    fn break_line(&mut self) {
        let spans = std::mem::take(&mut self.spans);
        let mut line = Vec::with_capacity(spans.len() + 1);
        if !self.next_prefix.is_empty() {
            line.push(Span::styled(self.next_prefix.clone(), self.prefix_style));
        }
        line.extend(spans);
        self.emitted.push(Line::from(line));
        self.next_prefix = self.cont_prefix.clone();
        self.cols = 0;
    }

    fn finish(mut self, out: &mut Vec<Line<'static>>) {
        if !self.spans.is_empty() || self.emitted.is_empty() {
            self.break_line();
        }
        out.append(&mut self.emitted);
    }
}

/// Splits text into alternating word / whitespace tokens.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut last_is_ws = None;
    for (i, ch) in text.char_indices() {
        let is_ws = ch.is_whitespace();
        if last_is_ws.is_some_and(|w| w != is_ws) {
            tokens.push(&text[start..i]);
            start = i;
        }
        last_is_ws = Some(is_ws);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect::<String>()
    }

    fn rendered_text(input: &str, width: u16) -> Vec<String> {
        render_markdown(input, width, &Theme::default())
            .iter()
            .map(plain)
            .collect()
    }

    #[test]
    fn renders_heading_with_heading_style() {
        let theme = Theme::default();
        let lines = render_markdown("# Title", 40, &theme);
        assert_eq!(plain(&lines[0]), "Title");
        assert_eq!(lines[0].spans[0].style, theme.heading);
    }

    #[test]
    fn wraps_prose_to_width() {
        let lines = rendered_text("one two three four five six seven eight", 12);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width() <= 12, "overlong line: {line:?}");
        }
    }

    #[test]
    fn paragraphs_are_separated_by_a_blank_line() {
        let lines = rendered_text("first\n\nsecond", 40);
        assert_eq!(lines, vec!["first", "", "second"]);
    }

    #[test]
    fn soft_break_joins_with_a_space() {
        let lines = rendered_text("alpha\nbeta", 40);
        assert_eq!(lines, vec!["alpha beta"]);
    }

    #[test]
    fn raw_html_is_dropped() {
        let lines = rendered_text("before <script>alert(1)</script> after", 60);
        let joined = lines.join("\n");
        assert!(!joined.contains("script"));
        assert!(joined.contains("before"));
        assert!(joined.contains("after"));
    }

    #[test]
    fn inline_math_keeps_delimiters_and_math_style() {
        let theme = Theme::default();
        let lines = render_markdown("value $x^2$ here", 40, &theme);
        let math_span = lines[0]
            .spans
            .iter()
            .find(|s| s.content.as_ref() == "$x^2$")
            .expect("math span present");
        assert_eq!(math_span.style, theme.math);
    }

    #[test]
    fn display_math_gets_its_own_line() {
        let lines = rendered_text("before\n\n$$\\frac{a}{b}$$\n\nafter", 40);
        assert!(lines.iter().any(|l| l.contains("$$ \\frac{a}{b} $$")));
    }

    #[test]
    fn code_blocks_are_indented_and_unwrapped() {
        let lines = rendered_text("```\nlet x = 1;\n```", 40);
        assert_eq!(lines, vec!["    let x = 1;"]);
    }

    #[test]
    fn block_quotes_carry_a_prefix() {
        let lines = rendered_text("> quoted words", 40);
        assert_eq!(lines, vec!["| quoted words"]);
    }

    #[test]
    fn unordered_list_uses_bullets() {
        let lines = rendered_text("- first\n- second", 40);
        assert_eq!(lines, vec!["• first", "• second"]);
    }

    #[test]
    fn ordered_list_counts_from_start() {
        let lines = rendered_text("3. third\n4. fourth", 40);
        assert_eq!(lines, vec!["3. third", "4. fourth"]);
    }

    #[test]
    fn list_continuation_hangs_under_marker() {
        let lines = rendered_text("- alpha beta gamma delta", 14);
        assert!(lines.len() > 1);
        assert!(lines[0].starts_with("• "));
        assert!(lines[1].starts_with("  "));
    }

    #[test]
    fn link_destination_is_appended_muted() {
        let theme = Theme::default();
        let lines = render_markdown("[here](https://example.com)", 60, &theme);
        let text = plain(&lines[0]);
        assert_eq!(text, "here (https://example.com)");
        assert_eq!(lines[0].spans[0].style, theme.link);
    }

    #[test]
    fn rule_fills_the_width() {
        let lines = rendered_text("---", 10);
        assert_eq!(lines, vec!["─".repeat(10)]);
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(render_markdown("", 40, &Theme::default()).is_empty());
    }

    #[test]
    fn overlong_word_is_hard_split() {
        let lines = rendered_text(&"x".repeat(25), 10);
        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert!(line.width() <= 10);
        }
    }
}
