use ratatui::{
    style::{Color, Modifier, Style},
    widgets::BorderType,
};

/// Colors assigned to token series, in ranking order. Wraps around when there
/// are more tokens than colors.
pub const SERIES_PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Red,
    Color::LightCyan,
    Color::LightMagenta,
];

pub trait Thematize {
    fn style(&self) -> Style;

    fn style_dim(&self) -> Style;

    fn border_type(&self) -> BorderType;

    fn series_color(&self, index: usize) -> Color {
        SERIES_PALETTE[index % SERIES_PALETTE.len()]
    }

    fn total_style(&self) -> Style;
}

#[derive(Default)]
pub struct DefaultTheme {
    pub ascii: bool,
}

impl Thematize for DefaultTheme {
    fn style(&self) -> Style {
        Style::default()
    }

    fn style_dim(&self) -> Style {
        Style::default().fg(Color::DarkGray)
    }

    fn border_type(&self) -> BorderType {
        if self.ascii {
            BorderType::Plain
        } else {
            BorderType::Rounded
        }
    }

    fn total_style(&self) -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }
}
