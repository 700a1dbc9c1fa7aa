use ratatui::style::{Color, Modifier, Style};

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Rgb(129, 140, 248))
    .add_modifier(Modifier::BOLD);
pub const STATUS_STYLE: Style = Style::new()
    .fg(Color::Rgb(250, 189, 47))
    .add_modifier(Modifier::BOLD);
pub const DIM_STYLE: Style = Style::new().fg(Color::Rgb(146, 131, 116));
pub const ERROR_STYLE: Style = Style::new().fg(Color::Rgb(254, 128, 25));

pub fn step_marker_style(emphasized: bool) -> Style {
    if emphasized {
        Style::new()
            .fg(Color::Rgb(129, 140, 248))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::new().fg(Color::Rgb(102, 102, 102))
    }
}

/// Badge treatment for a vocabulary tag: hot terms get the red card, cold
/// ones stay gray, mirroring the generator's web styling.
pub fn tag_badge_style(hot: bool) -> Style {
    if hot {
        Style::new()
            .fg(Color::Rgb(220, 90, 90))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::new().fg(Color::Rgb(120, 120, 120))
    }
}

/// Heat bar fill shifts from yellow toward red as the score rises.
pub fn heat_color(score: f64) -> Color {
    if score >= 1.0 {
        Color::Rgb(248, 113, 113)
    } else if score >= 0.6 {
        Color::Rgb(251, 146, 60)
    } else if score > 0.0 {
        Color::Rgb(252, 211, 77)
    } else {
        Color::Rgb(68, 68, 68)
    }
}

pub fn zebra_row_style(index: usize) -> Style {
    let bg = if index % 2 == 0 {
        Color::Rgb(18, 20, 26)
    } else {
        Color::Rgb(24, 27, 34)
    };
    Style::new().bg(bg)
}

pub fn bubble_style(is_user: bool) -> Style {
    if is_user {
        Style::new().fg(Color::Rgb(142, 192, 124))
    } else {
        Style::new().fg(Color::Rgb(131, 165, 152))
    }
}

pub mod icons {
    pub const STEP_ON: &str = "*";
    pub const STEP_OFF: &str = ".";
    pub const USER: &str = ">";
    pub const ASSISTANT: &str = "~";
}
