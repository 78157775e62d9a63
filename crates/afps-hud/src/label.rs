//! Anchored labels: one text buffer per screen anchor.

use afps_common::LabelAnchor;

use crate::config::LookAndFeel;
use crate::host::{LabelStyle, TextSurface};
use crate::markup::NEW_LINE;

/// A label pinned to one anchor.
///
/// Counters append their fragments into `pending` each update; the label then
/// pushes the assembled text to the surface and empties the buffer again.
#[derive(Debug, Clone)]
pub struct DrawableLabel {
    anchor: LabelAnchor,
    pending: String,
    dirty: bool,
    visible: bool,
    /// Offset as configured, before per-anchor normalization
    raw_offset: (f32, f32),
    style: LabelStyle,
}

impl DrawableLabel {
    /// Creates a hidden label at `anchor` styled from `look`.
    #[must_use]
    pub fn new(anchor: LabelAnchor, look: &LookAndFeel) -> Self {
        Self {
            anchor,
            pending: String::with_capacity(256),
            dirty: false,
            visible: false,
            raw_offset: look.anchors_offset,
            style: LabelStyle {
                font: look.font.clone(),
                font_size: look.font_size,
                line_spacing: look.line_spacing,
                pixel_offset: anchor.normalize_offset(look.anchors_offset),
                position: anchor.viewport_position(),
                alignment: anchor.alignment(),
            },
        }
    }

    /// Anchor this label is pinned to.
    #[must_use]
    pub const fn anchor(&self) -> LabelAnchor {
        self.anchor
    }

    /// Current style.
    #[must_use]
    pub const fn style(&self) -> &LabelStyle {
        &self.style
    }

    /// Whether the surface currently shows this label.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the next update must push text.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Text collected for the next update.
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Forces the next update to push text.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Appends a counter fragment, separated from earlier ones by
    /// `spacing + 1` line breaks.
    pub fn append(&mut self, fragment: &str, spacing: u32, dirty: bool) {
        if !self.pending.is_empty() {
            self.pending
                .extend(std::iter::repeat(NEW_LINE).take(spacing as usize + 1));
        }
        self.pending.push_str(fragment);
        self.dirty |= dirty;
    }

    /// Pushes pending text to the surface, or hides the label when nothing
    /// was collected. The buffer is empty afterwards.
    pub fn check_and_update(&mut self, surface: &mut dyn TextSurface) {
        if self.pending.is_empty() {
            if self.visible {
                surface.hide(self.anchor);
                self.visible = false;
            }
            return;
        }

        if self.dirty || !self.visible {
            surface.show(self.anchor, &self.pending, &self.style);
            self.visible = true;
            self.dirty = false;
        }
        self.pending.clear();
    }

    /// Drops pending text and hides the label.
    pub fn clear(&mut self, surface: &mut dyn TextSurface) {
        self.pending.clear();
        if self.visible {
            surface.hide(self.anchor);
            self.visible = false;
        }
    }

    /// Clears the label and releases its buffer.
    pub fn dispose(&mut self, surface: &mut dyn TextSurface) {
        self.clear(surface);
        self.pending = String::new();
        self.dirty = false;
    }

    /// Changes the font.
    pub fn change_font(&mut self, font: Option<String>, surface: &mut dyn TextSurface) {
        self.style.font = font;
        self.restyle(surface);
    }

    /// Changes the font size.
    pub fn change_font_size(&mut self, size: u32, surface: &mut dyn TextSurface) {
        self.style.font_size = size;
        self.restyle(surface);
    }

    /// Changes the pixel offset; it is normalized for this anchor.
    pub fn change_offset(&mut self, offset: (f32, f32), surface: &mut dyn TextSurface) {
        self.raw_offset = offset;
        self.style.pixel_offset = self.anchor.normalize_offset(offset);
        self.restyle(surface);
    }

    /// Changes the line spacing.
    pub fn change_line_spacing(&mut self, spacing: f32, surface: &mut dyn TextSurface) {
        self.style.line_spacing = spacing;
        self.restyle(surface);
    }

    /// Offset as configured, before normalization.
    #[must_use]
    pub const fn raw_offset(&self) -> (f32, f32) {
        self.raw_offset
    }

    fn restyle(&self, surface: &mut dyn TextSurface) {
        if self.visible {
            surface.restyle(self.anchor, &self.style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingSurface;

    fn label(anchor: LabelAnchor) -> DrawableLabel {
        DrawableLabel::new(anchor, &LookAndFeel::default())
    }

    #[test]
    fn test_show_then_hide_when_empty() {
        let mut surface = RecordingSurface::new();
        let mut label = label(LabelAnchor::UpperLeft);

        label.append("FPS: 60", 0, true);
        label.check_and_update(&mut surface);
        assert_eq!(surface.text(LabelAnchor::UpperLeft), Some("FPS: 60"));
        assert!(label.is_visible());
        assert!(label.pending().is_empty());

        label.check_and_update(&mut surface);
        assert_eq!(surface.text(LabelAnchor::UpperLeft), None);
        assert!(!label.is_visible());
    }

    #[test]
    fn test_clean_label_is_not_repushed() {
        let mut surface = RecordingSurface::new();
        let mut label = label(LabelAnchor::LowerRight);

        label.append("a", 0, true);
        label.check_and_update(&mut surface);
        label.append("b", 0, false);
        label.check_and_update(&mut surface);

        assert_eq!(surface.show_calls(), 1);
        assert_eq!(surface.text(LabelAnchor::LowerRight), Some("a"));
    }

    #[test]
    fn test_fragments_separated_by_spacing() {
        let mut label = label(LabelAnchor::UpperLeft);
        label.append("one", 2, false);
        label.append("two", 2, false);
        assert_eq!(label.pending(), "one\n\n\ntwo");
        assert!(!label.is_dirty());
    }

    #[test]
    fn test_offset_normalized_per_anchor() {
        let mut surface = RecordingSurface::new();
        let mut label = label(LabelAnchor::UpperRight);
        assert_eq!(label.style().pixel_offset, (-5.0, -5.0));

        label.append("x", 0, true);
        label.check_and_update(&mut surface);
        label.change_offset((10.0, 2.0), &mut surface);

        assert_eq!(label.raw_offset(), (10.0, 2.0));
        let style = surface.style(LabelAnchor::UpperRight).expect("visible");
        assert_eq!(style.pixel_offset, (-10.0, -2.0));
    }

    #[test]
    fn test_restyle_only_when_visible() {
        let mut surface = RecordingSurface::new();
        let mut label = label(LabelAnchor::LowerLeft);
        label.change_font_size(18, &mut surface);
        assert!(surface.style(LabelAnchor::LowerLeft).is_none());
        assert_eq!(label.style().font_size, 18);
    }

    #[test]
    fn test_dispose_hides() {
        let mut surface = RecordingSurface::new();
        let mut label = label(LabelAnchor::UpperCenter);
        label.append("x", 0, true);
        label.check_and_update(&mut surface);
        label.dispose(&mut surface);
        assert_eq!(surface.visible_anchors().count(), 0);
    }
}
