use crossterm::style::Color;

use crate::model::task::{Priority, TaskStatus};
use crate::model::theme::ThemeName;

/// Terminal colors for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub star: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
}

impl Palette {
    pub fn for_theme(theme: ThemeName) -> Self {
        match theme {
            ThemeName::Light => Palette {
                text: Color::Rgb { r: 0x1F, g: 0x29, b: 0x37 },
                dim: Color::Rgb { r: 0x6B, g: 0x72, b: 0x80 },
                accent: Color::Rgb { r: 0x25, g: 0x63, b: 0xEB },
                star: Color::Rgb { r: 0xCA, g: 0x8A, b: 0x04 },
                red: Color::Rgb { r: 0xDC, g: 0x26, b: 0x26 },
                yellow: Color::Rgb { r: 0xCA, g: 0x8A, b: 0x04 },
                green: Color::Rgb { r: 0x16, g: 0xA3, b: 0x4A },
            },
            ThemeName::Dark => Palette {
                text: Color::Rgb { r: 0xE5, g: 0xE7, b: 0xEB },
                dim: Color::Rgb { r: 0x9C, g: 0xA3, b: 0xAF },
                accent: Color::Rgb { r: 0x60, g: 0xA5, b: 0xFA },
                star: Color::Rgb { r: 0xFA, g: 0xCC, b: 0x15 },
                red: Color::Rgb { r: 0xF8, g: 0x71, b: 0x71 },
                yellow: Color::Rgb { r: 0xFA, g: 0xCC, b: 0x15 },
                green: Color::Rgb { r: 0x4A, g: 0xDE, b: 0x80 },
            },
            ThemeName::Ocean => Palette {
                text: Color::Rgb { r: 0xCF, g: 0xFA, b: 0xFE },
                dim: Color::Rgb { r: 0x67, g: 0xA3, b: 0xB5 },
                accent: Color::Rgb { r: 0x22, g: 0xD3, b: 0xEE },
                star: Color::Rgb { r: 0xFD, g: 0xE0, b: 0x47 },
                red: Color::Rgb { r: 0xFB, g: 0x71, b: 0x85 },
                yellow: Color::Rgb { r: 0xFD, g: 0xE0, b: 0x47 },
                green: Color::Rgb { r: 0x2D, g: 0xD4, b: 0xBF },
            },
            ThemeName::Sunset => Palette {
                text: Color::Rgb { r: 0xFF, g: 0xED, b: 0xD5 },
                dim: Color::Rgb { r: 0xC0, g: 0x84, b: 0x7A },
                accent: Color::Rgb { r: 0xFB, g: 0x92, b: 0x3C },
                star: Color::Rgb { r: 0xFC, g: 0xD3, b: 0x4D },
                red: Color::Rgb { r: 0xF4, g: 0x3F, b: 0x5E },
                yellow: Color::Rgb { r: 0xFB, g: 0xBF, b: 0x24 },
                green: Color::Rgb { r: 0xA3, g: 0xE6, b: 0x35 },
            },
        }
    }

    /// High is red, Medium yellow, Low green
    pub fn priority(&self, priority: Priority) -> Color {
        match priority {
            Priority::High => self.red,
            Priority::Medium => self.yellow,
            Priority::Low => self.green,
        }
    }

    /// Column header color: To Do red, In Progress yellow, Done green
    pub fn status(&self, status: TaskStatus) -> Color {
        match status {
            TaskStatus::ToDo => self.red,
            TaskStatus::InProgress => self.yellow,
            TaskStatus::Done => self.green,
        }
    }
}
