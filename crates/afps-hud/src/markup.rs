//! Label markup: a minimal `<color=#RRGGBBAA>` / `<b>` subset.
//!
//! Counters emit fragments such as `<color=#55da66ff><b>FPS: 60</b></color>`.
//! Opening tags are cached per tier in [`TierTags`] so a tick only appends
//! numbers. [`parse_markup`] turns the markup back into styled spans for
//! surfaces that render it themselves.

use afps_common::Rgba;

use crate::tier::{Tier, TierPalette};

/// Line break between label lines.
pub const NEW_LINE: char = '\n';

/// Separator between pieces on one line.
pub const SPACE: char = ' ';

/// Closes a colored bold run.
pub const CLOSE: &str = "</b></color>";

/// Opening tag for a colored bold run.
#[must_use]
pub fn open_tag(color: Rgba) -> String {
    format!("<color=#{}><b>", color.to_hex())
}

/// Cached opening tags (with a leading separator and caption) for each tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierTags {
    normal: String,
    warning: String,
    critical: String,
}

impl TierTags {
    /// Builds `{lead}<color=#..><b>{caption}` for every tier of `palette`.
    #[must_use]
    pub fn new(palette: &TierPalette, lead: &str, caption: &str) -> Self {
        let build = |tier| format!("{lead}{}{caption}", open_tag(palette.color(tier)));
        Self {
            normal: build(Tier::Normal),
            warning: build(Tier::Warning),
            critical: build(Tier::Critical),
        }
    }

    /// Opening tag for a tier.
    #[must_use]
    pub fn get(&self, tier: Tier) -> &str {
        match tier {
            Tier::Normal => &self.normal,
            Tier::Warning => &self.warning,
            Tier::Critical => &self.critical,
        }
    }
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Text content
    pub text: String,
    /// Innermost color, if any
    pub color: Option<Rgba>,
    /// Whether inside at least one `<b>`
    pub bold: bool,
}

/// Splits markup into styled spans.
///
/// Unknown or malformed tags are kept verbatim as text. Adjacent runs with the
/// same style are merged.
#[must_use]
pub fn parse_markup(text: &str) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    let mut colors: Vec<Rgba> = Vec::new();
    let mut bold_depth = 0u32;
    let mut pending = String::new();
    let mut rest = text;

    while let Some(start) = rest.find('<') {
        pending.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find('>') else {
            rest = tail;
            break;
        };

        let style = (colors.last().copied(), bold_depth > 0);
        let tag = &tail[1..end];
        let recognized = match tag {
            "b" => {
                bold_depth += 1;
                true
            },
            "/b" => {
                bold_depth = bold_depth.saturating_sub(1);
                true
            },
            "/color" => {
                colors.pop();
                true
            },
            _ => match tag.strip_prefix("color=").map(Rgba::from_hex) {
                Some(Ok(color)) => {
                    colors.push(color);
                    true
                },
                _ => false,
            },
        };

        if recognized {
            push_span(&mut spans, &mut pending, style);
        } else {
            pending.push_str(&tail[..=end]);
        }
        rest = &tail[end + 1..];
    }

    pending.push_str(rest);
    push_span(&mut spans, &mut pending, (colors.last().copied(), bold_depth > 0));
    spans
}

fn push_span(spans: &mut Vec<Span>, pending: &mut String, style: (Option<Rgba>, bool)) {
    if pending.is_empty() {
        return;
    }
    let (color, bold) = style;
    match spans.last_mut() {
        Some(last) if last.color == color && last.bold == bold => last.text.push_str(pending),
        _ => spans.push(Span {
            text: pending.clone(),
            color,
            bold,
        }),
    }
    pending.clear();
}

/// Removes all recognized tags, leaving plain text.
#[must_use]
pub fn strip_markup(text: &str) -> String {
    parse_markup(text).into_iter().map(|s| s.text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> TierPalette {
        TierPalette {
            normal: Rgba::rgb(0x55, 0xda, 0x66),
            warning: Rgba::rgb(0xec, 0xe0, 0x58),
            critical: Rgba::rgb(0xf9, 0x5b, 0x5b),
        }
    }

    #[test]
    fn test_open_tag() {
        assert_eq!(open_tag(Rgba::rgb(1, 2, 3)), "<color=#010203ff><b>");
    }

    #[test]
    fn test_tier_tags_include_lead_and_caption() {
        let tags = TierTags::new(&palette(), " ", "AVG: ");
        assert_eq!(tags.get(Tier::Normal), " <color=#55da66ff><b>AVG: ");
        assert_eq!(tags.get(Tier::Critical), " <color=#f95b5bff><b>AVG: ");
    }

    #[test]
    fn test_parse_colored_fragments() {
        let spans = parse_markup("<color=#55da66ff><b>FPS: 60</b></color> <color=#f95b5bff><b>MIN: 5</b></color>");
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].text, "FPS: 60");
        assert_eq!(spans[0].color, Some(Rgba::rgb(0x55, 0xda, 0x66)));
        assert!(spans[0].bold);
        assert_eq!(spans[1].text, " ");
        assert_eq!(spans[1].color, None);
        assert!(!spans[1].bold);
        assert_eq!(spans[2].text, "MIN: 5");
    }

    #[test]
    fn test_parse_keeps_unknown_tags() {
        let spans = parse_markup("a <i>b</i> <color=#zz>c");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "a <i>b</i> <color=#zz>c");
    }

    #[test]
    fn test_parse_unterminated_tag() {
        assert_eq!(strip_markup("<b>ok</b> <oops"), "ok <oops");
    }

    #[test]
    fn test_strip_markup_multiline() {
        let text = "<color=#eaee65ff><b>MEM TOTAL: 12 MB\nMEM ALLOC: 7 MB</b></color>";
        assert_eq!(strip_markup(text), "MEM TOTAL: 12 MB\nMEM ALLOC: 7 MB");
    }
}
