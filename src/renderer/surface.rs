//! Drawing surface abstraction
//!
//! The simulation draws through [`Surface`]; [`DrawList`] records the calls
//! so the GPU pipeline and the text overlay can replay them, and so tests
//! can inspect a frame.

use glam::Vec2;

/// RGBA color, components in 0..=1
pub type Color = [f32; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// `pos` is the left end of the baseline
    Left,
    /// `pos` is the middle of the text box
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_px: f32,
    pub align: TextAlign,
    pub color: Color,
}

impl TextStyle {
    /// Score readout in the corner
    pub const HUD: Self = Self {
        size_px: 20.0,
        align: TextAlign::Left,
        color: super::vertex::colors::TEXT,
    };

    /// Centered terminal banner
    pub const BANNER: Self = Self {
        size_px: 30.0,
        align: TextAlign::Center,
        color: super::vertex::colors::TEXT,
    };
}

/// A 2D target in screen pixels (origin top-left, y down)
pub trait Surface {
    /// Wipe the whole frame
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn fill_text(&mut self, text: &str, pos: Vec2, style: TextStyle);
}

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Text {
        text: String,
        pos: Vec2,
        style: TextStyle,
    },
}

/// Recording surface, reset between frames
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forget the previous frame's commands
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Whether this frame wipes what was drawn before
    pub fn clears(&self) -> bool {
        self.commands.iter().any(|c| matches!(c, DrawCommand::Clear))
    }

    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, Color)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => Some((center, radius, color)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, Vec2, TextStyle)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, pos, style } => Some((text.as_str(), *pos, *style)),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            pos,
            style,
        });
    }
}
