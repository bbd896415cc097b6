/// ANSI color helper utilities for terminal output.
use ansi_term::Colour;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// `#rrggbb` → terminal colour; anything unparsable is white.
pub fn hex_to_colour(hex: &str) -> Colour {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 {
        return Colour::White;
    }
    let channel = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Colour::RGB(r, g, b),
        _ => Colour::White,
    }
}

/// Balance color:
/// \>0 → green
/// \<0 → red
/// 0 → reset
pub fn color_for_balance(value: f64) -> &'static str {
    if value > 0.0 {
        GREEN
    } else if value < 0.0 {
        RED
    } else {
        RESET
    }
}

/// Progress towards a goal: red under a third, yellow under two thirds, then green.
pub fn color_for_progress(percent: f64) -> &'static str {
    if percent >= 66.0 {
        GREEN
    } else if percent >= 33.0 {
        YELLOW
    } else {
        RED
    }
}
