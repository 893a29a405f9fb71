//! Host-free driving of the toast, for checking a catalog and configuration
//! by hand.

use std::path::Path;

use bgmtoast_overlay::renderer::{DrawCommand, ImageId, ImmediateRenderer, TextMeasure, TextSize};

/// Average glyph advance as a fraction of the font size.
const GLYPH_ADVANCE: f32 = 0.5;

/// Renderer that measures text with a fixed advance and logs what it would
/// draw instead of drawing it.
#[derive(Debug, Clone)]
pub struct LogRenderer {
    font_size: f32,
    icon: Option<ImageId>,
    commands: usize,
}

impl LogRenderer {
    pub fn new(font_size: f32, icon: Option<ImageId>) -> Self {
        Self {
            font_size,
            icon,
            commands: 0,
        }
    }

    /// Uses an icon only if `icon_path` exists, logging when it does not.
    pub fn with_icon_file(font_size: f32, icon_path: &Path) -> Self {
        let icon = if icon_path.is_file() {
            Some(ImageId(0))
        } else {
            log::error!("Failed to load toast icon from {icon_path:?}.");
            None
        };
        Self::new(font_size, icon)
    }

    /// Commands drawn since the last call.
    pub fn take_command_count(&mut self) -> usize {
        std::mem::take(&mut self.commands)
    }
}

impl TextMeasure for LogRenderer {
    fn measure_text(&self, text: &str) -> TextSize {
        TextSize {
            width: text.chars().count() as f32 * self.font_size * GLYPH_ADVANCE,
            height: self.font_size,
        }
    }
}

impl ImmediateRenderer for LogRenderer {
    fn icon(&self) -> Option<ImageId> {
        self.icon
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.commands += 1;
        match command {
            DrawCommand::Image { min, max, .. } => {
                log::trace!("icon ({:.1}, {:.1})..({:.1}, {:.1})", min.x, min.y, max.x, max.y);
            }
            DrawCommand::RoundedRect { min, max, .. } => {
                log::trace!("box ({:.1}, {:.1})..({:.1}, {:.1})", min.x, min.y, max.x, max.y);
            }
            DrawCommand::Text { position, text, .. } => {
                log::trace!("text {text:?} at ({:.1}, {:.1})", position.x, position.y);
            }
        }
    }
}
