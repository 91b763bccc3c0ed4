use colored::Color;

pub const PRIMARY: Color = Color::BrightWhite;
pub const ACCENT: Color = Color::BrightCyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

// Verdict classes
pub const HEALTHY: Color = Color::Green;
pub const EXPIRING: Color = Color::Yellow;
pub const EXPIRED: Color = Color::Red;
pub const FAILED: Color = Color::Magenta;
