use ratatui::style::Color;
use satlens_core::SeriesColor;

pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub highlight: Color,
    pub satisfied: Color,
    pub not_satisfied: Color,
    pub muted: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            highlight: Color::Yellow,
            satisfied: Color::Red,
            not_satisfied: Color::Green,
            muted: Color::DarkGray,
        }
    }
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            highlight: Color::Blue,
            satisfied: Color::Red,
            not_satisfied: Color::Green,
            muted: Color::Gray,
        }
    }
    pub fn nord() -> Self {
        Self {
            bg: Color::Rgb(46, 52, 64),
            fg: Color::Rgb(216, 222, 233),
            highlight: Color::Rgb(136, 192, 208),
            satisfied: Color::Rgb(191, 97, 106),
            not_satisfied: Color::Rgb(163, 190, 140),
            muted: Color::Rgb(76, 86, 106),
        }
    }
    pub fn colorblind() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            highlight: Color::Yellow,
            satisfied: Color::Rgb(0xFF, 0x8C, 0x00),     // orange instead of red
            not_satisfied: Color::Rgb(0x00, 0x80, 0xFF), // blue instead of green
            muted: Color::DarkGray,
        }
    }
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "nord" => Self::nord(),
            "colorblind" => Self::colorblind(),
            _ => Self::dark(),
        }
    }

    pub fn series(&self, color: SeriesColor) -> Color {
        match color {
            SeriesColor::Red => self.satisfied,
            SeriesColor::Green => self.not_satisfied,
        }
    }
}
