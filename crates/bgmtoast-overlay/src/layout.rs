use bgmtoast_bridge::config::OverlayConfig;
use bgmtoast_bridge::notification::TrackInfo;

use crate::animation::Side;
use crate::renderer::{Color, DrawCommand, ImageId, Point, TextMeasure};

/// The text box always reserves room for this many lines, so one- and
/// two-line toasts have the same height.
const TEXT_BLOCK_LINES: f32 = 2.2;

const BOX_COLOR: Color = Color::rgba(0, 0, 0, 100);
const NAME_COLOR: Color = Color::WHITE;
const DETAIL_COLOR: Color = Color::rgba(180, 180, 180, 255);

/// Scaled paddings and rounding of the toast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToastStyle {
    pub screen_padding: f32,
    pub text_padding_x: f32,
    pub text_padding_y: f32,
    pub rounding: f32,
}

impl ToastStyle {
    pub fn from_config(config: &OverlayConfig) -> Self {
        let scale = config.ui_scale;
        Self {
            screen_padding: config.screen_padding,
            text_padding_x: 20.0 * scale,
            text_padding_y: 15.0 * scale,
            rounding: 8.0 * scale,
        }
    }
}

impl Default for ToastStyle {
    fn default() -> Self {
        Self::from_config(&OverlayConfig::default())
    }
}

/// Horizontal positions the toast animates between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Targets {
    pub onscreen: f32,
    pub offscreen: f32,
}

/// Geometry of one toast, measured from its current text.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastLayout {
    style: ToastStyle,
    detail: Option<String>,
    pub line_height: f32,
    pub icon_width: f32,
    pub box_width: f32,
    pub total_width: f32,
    pub total_height: f32,
}

impl ToastLayout {
    pub fn measure<M>(style: ToastStyle, track: &TrackInfo, measure: &M) -> Self
    where
        M: TextMeasure + ?Sized,
    {
        let detail = track.detail_line();
        let name_size = measure.measure_text(&track.display_name);
        let detail_width = detail
            .as_deref()
            .map(|line| measure.measure_text(line).width)
            .unwrap_or_default();

        let text_width = name_size.width.max(detail_width);
        let line_height = name_size.height;
        let total_height = line_height * TEXT_BLOCK_LINES + style.text_padding_y * 2.0;
        let icon_width = total_height;
        let box_width = text_width + style.text_padding_x * 2.0;

        Self {
            style,
            detail,
            line_height,
            icon_width,
            box_width,
            total_width: icon_width + box_width,
            total_height,
        }
    }

    /// Onscreen and offscreen positions for `side` on a surface
    /// `surface_width` pixels wide. Offscreen is just past the edge.
    pub fn targets(&self, side: Side, surface_width: f32) -> Targets {
        let padding = self.style.screen_padding;
        match side {
            Side::Left => Targets {
                onscreen: padding,
                offscreen: -self.total_width - padding,
            },
            Side::Right => Targets {
                onscreen: surface_width - self.total_width - padding,
                offscreen: surface_width + padding,
            },
        }
    }

    /// Primitives of the toast with its left edge at `x`.
    pub fn draw_commands(&self, x: f32, track: &TrackInfo, icon: Option<ImageId>) -> Vec<DrawCommand> {
        let top = self.style.screen_padding;
        let bottom = top + self.total_height;
        let box_left = x + self.icon_width;
        let text_x = box_left + self.style.text_padding_x;

        let lines = if self.detail.is_some() { 2.0 } else { 1.0 };
        let text_top = top + (self.total_height - self.line_height * lines) * 0.5;

        let mut commands = Vec::with_capacity(4);
        if let Some(image) = icon {
            commands.push(DrawCommand::Image {
                image,
                min: Point::new(x, top),
                max: Point::new(box_left, bottom),
            });
        }
        commands.push(DrawCommand::RoundedRect {
            min: Point::new(box_left, top),
            max: Point::new(box_left + self.box_width, bottom),
            color: BOX_COLOR,
            rounding: self.style.rounding,
        });
        commands.push(DrawCommand::Text {
            position: Point::new(text_x, text_top),
            color: NAME_COLOR,
            text: track.display_name.clone(),
        });
        if let Some(detail) = &self.detail {
            commands.push(DrawCommand::Text {
                position: Point::new(text_x, text_top + self.line_height),
                color: DETAIL_COLOR,
                text: detail.clone(),
            });
        }
        commands
    }
}
