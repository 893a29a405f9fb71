//! The seam between the toast and whatever immediate-mode renderer the host
//! integration provides.

/// A position on the presentation surface, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Measured size of a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextSize {
    pub width: f32,
    pub height: f32,
}

/// Straight RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Renderer-owned image resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u64);

/// A single primitive for the background draw layer.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Image stretched over the rectangle `min..max`.
    Image { image: ImageId, min: Point, max: Point },
    /// Filled rectangle with rounded corners.
    RoundedRect {
        min: Point,
        max: Point,
        color: Color,
        rounding: f32,
    },
    /// Text run whose top-left corner is at `position`.
    Text {
        position: Point,
        color: Color,
        text: String,
    },
}

/// Measures text in the font the toast is drawn with.
pub trait TextMeasure {
    fn measure_text(&self, text: &str) -> TextSize;
}

/// An immediate-mode renderer drawing into a layer below the host's own UI.
pub trait ImmediateRenderer: TextMeasure {
    /// Icon drawn left of the text box, or `None` if it failed to load.
    fn icon(&self) -> Option<ImageId>;

    fn draw(&mut self, command: &DrawCommand);
}
