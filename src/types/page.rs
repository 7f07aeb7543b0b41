//! Page geometry from the document settings object.

use crate::types::Color;

/// Page size, content offsets, and background color, in inches.
#[derive(Debug, Clone, Copy)]
pub struct PageSettings {
    pub width: f64,
    pub height: f64,
    /// Canvas offset of the page's left edge.
    pub left_offset: f64,
    /// Canvas offset of the page's top edge.
    pub top_offset: f64,
    pub color: Color,
}

impl PageSettings {
    /// Create page settings with a white background.
    pub fn new(width: f64, height: f64, left_offset: f64, top_offset: f64) -> Self {
        PageSettings {
            width,
            height,
            left_offset,
            top_offset,
            color: Color::WHITE,
        }
    }

    /// Create page settings with an explicit background color.
    pub fn with_color(
        width: f64,
        height: f64,
        left_offset: f64,
        top_offset: f64,
        color: Color,
    ) -> Self {
        PageSettings {
            width,
            height,
            left_offset,
            top_offset,
            color,
        }
    }
}

impl Default for PageSettings {
    fn default() -> Self {
        PageSettings::new(0.0, 0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_background_is_white() {
        assert_eq!(PageSettings::new(8.5, 11.0, 0.0, 0.0).color, Color::WHITE);
    }
}
