//! Terminal text surface: prints labels with ANSI truecolor escapes.

use afps_common::LabelAnchor;
use afps_hud::{parse_markup, LabelStyle, Span, TextSurface};
use std::fmt::Write as _;
use std::io::{self, Write};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Converts label markup to ANSI-colored text.
pub fn to_ansi(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len() * 2);
    for Span { text, color, bold } in parse_markup(markup) {
        let styled = color.is_some() || bold;
        if bold {
            out.push_str(BOLD);
        }
        if let Some(c) = color {
            let _ = write!(out, "\x1b[38;2;{};{};{}m", c.r, c.g, c.b);
        }
        out.push_str(&text);
        if styled {
            out.push_str(RESET);
        }
    }
    out
}

/// Prints every label update as it arrives, prefixed with its anchor.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    plain: bool,
    updates: usize,
}

impl TerminalSurface {
    /// Creates a surface; `plain` drops escape codes.
    pub fn new(plain: bool) -> Self {
        Self { plain, updates: 0 }
    }

    /// Label updates printed so far.
    pub const fn updates(&self) -> usize {
        self.updates
    }

    fn print(&self, anchor: LabelAnchor, text: &str) {
        let rendered = if self.plain {
            afps_hud::strip_markup(text)
        } else {
            to_ansi(text)
        };
        let indent = format!("\n{:>12} | ", "");
        let body = rendered.replace('\n', &indent);

        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{:>12} | {body}", anchor.to_string());
    }
}

impl TextSurface for TerminalSurface {
    fn show(&mut self, anchor: LabelAnchor, text: &str, _style: &LabelStyle) {
        self.updates += 1;
        self.print(anchor, text);
    }

    fn restyle(&mut self, anchor: LabelAnchor, style: &LabelStyle) {
        tracing::debug!(%anchor, ?style, "Label restyled");
    }

    fn hide(&mut self, anchor: LabelAnchor) {
        tracing::debug!(%anchor, "Label hidden");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_ansi_colors_bold_runs() {
        let ansi = to_ansi("<color=#ff0000ff><b>FPS: 60</b></color> x");
        assert_eq!(ansi, "\x1b[1m\x1b[38;2;255;0;0mFPS: 60\x1b[0m x");
    }

    #[test]
    fn test_to_ansi_plain_text_untouched() {
        assert_eq!(to_ansi("no tags"), "no tags");
    }
}
