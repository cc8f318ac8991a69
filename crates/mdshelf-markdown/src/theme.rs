use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

/// Style palette shared by the renderer and the app chrome.
///
/// Two built-in palettes mirror the viewer's light/dark modes; the app persists
/// the choice and rebuilds the theme on toggle.
#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub heading: Style,
    pub accent: Style,
    pub danger: Style,
    pub code: Style,
    pub code_block: Style,
    pub link: Style,
    pub math: Style,
    pub rule: Style,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            text_primary: Style::default().fg(Color::Rgb(40, 40, 40)),
            text_muted: Style::default().fg(Color::Rgb(150, 150, 150)),
            heading: Style::default()
                .fg(Color::Rgb(20, 80, 160))
                .add_modifier(Modifier::BOLD),
            accent: Style::default().fg(Color::Rgb(0, 128, 128)),
            danger: Style::default().fg(Color::Rgb(200, 0, 0)),
            code: Style::default().fg(Color::Rgb(160, 50, 120)),
            code_block: Style::default().fg(Color::Rgb(90, 90, 90)),
            link: Style::default()
                .fg(Color::Rgb(52, 120, 219))
                .add_modifier(Modifier::UNDERLINED),
            math: Style::default()
                .fg(Color::Rgb(0, 128, 128))
                .add_modifier(Modifier::ITALIC),
            rule: Style::default().fg(Color::Rgb(180, 180, 180)),
        }
    }

    pub fn dark() -> Self {
        Self {
            text_primary: Style::default().fg(Color::Rgb(220, 220, 220)),
            text_muted: Style::default().fg(Color::Rgb(110, 120, 120)),
            heading: Style::default()
                .fg(Color::Rgb(120, 180, 255))
                .add_modifier(Modifier::BOLD),
            accent: Style::default().fg(Color::Rgb(26, 188, 156)),
            danger: Style::default().fg(Color::Rgb(255, 80, 80)),
            code: Style::default().fg(Color::Rgb(230, 140, 200)),
            code_block: Style::default().fg(Color::Rgb(170, 180, 170)),
            link: Style::default()
                .fg(Color::Rgb(100, 160, 255))
                .add_modifier(Modifier::UNDERLINED),
            math: Style::default()
                .fg(Color::Rgb(26, 188, 156))
                .add_modifier(Modifier::ITALIC),
            rule: Style::default().fg(Color::Rgb(90, 100, 100)),
        }
    }

    pub fn for_mode(dark: bool) -> Self {
        if dark { Self::dark() } else { Self::light() }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
