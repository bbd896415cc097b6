//! Horizontal bar charts drawn with block characters.

use crate::utils::colors::hex_to_colour;
use crate::utils::formatting::{pad_left, pad_right, pct};

const BAR_WIDTH: usize = 30;

pub struct Bar {
    pub label: String,
    pub value: f64,
    pub percentage: f64,
    /// `#rrggbb`
    pub color: String,
    /// Pre-formatted value shown after the bar.
    pub caption: String,
}

/// Bars scaled against the largest value.
pub fn render_bars(bars: &[Bar]) -> String {
    let max = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
    let label_w = bars
        .iter()
        .map(|b| unicode_width::UnicodeWidthStr::width(b.label.as_str()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for bar in bars {
        let filled = if max > 0.0 {
            ((bar.value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let colour = hex_to_colour(&bar.color);

        out.push_str(&format!(
            "{}  {}{}  {}  {}\n",
            pad_right(&bar.label, label_w),
            colour.paint("█".repeat(filled)),
            "░".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
            pad_left(&pct(bar.percentage), 6),
            bar.caption
        ));
    }
    out
}

/// Single progress bar for a percentage in `0..=100`.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled.min(width)))
}
