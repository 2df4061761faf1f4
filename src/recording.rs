//! A [`Canvas`] that records primitives instead of rasterising them.
//!
//! Used by the tests to assert on exactly what the renderer drew, and by
//! anything that wants the diagram as data rather than pixels.

use crate::layout::Rect;
use crate::traits::{Canvas, Rgba};

/// One drawing primitive, in the order it was issued.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Rgba),
    Fill {
        rect: Rect,
        color: Rgba,
    },
    Stroke {
        rect: Rect,
        color: Rgba,
        line_width: f64,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        size: f64,
        color: Rgba,
    },
    PushClip(Rect),
    PopClip,
}

#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// Every filled rectangle, in draw order.
    pub fn fills(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// Every stroked rectangle, in draw order.
    pub fn strokes(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Stroke { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// Every drawn string, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self, color: Rgba) {
        self.ops.push(DrawOp::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.ops.push(DrawOp::Fill { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, line_width: f64) {
        self.ops.push(DrawOp::Stroke {
            rect,
            color,
            line_width,
        });
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, size: f64, color: Rgba) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            size,
            color,
        });
    }

    fn clipped(&mut self, clip: Rect, draw: &mut dyn FnMut(&mut dyn Canvas)) {
        self.ops.push(DrawOp::PushClip(clip));
        draw(&mut *self);
        self.ops.push(DrawOp::PopClip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipped_brackets_nested_ops() {
        let mut canvas = RecordingCanvas::new(100.0, 50.0);
        let clip = Rect::new(0.0, 0.0, 10.0, 10.0);
        canvas.clipped(clip, &mut |c| {
            c.draw_text("hi", 1.0, 2.0, 10.0, Rgba::grey(1.0, 1.0));
        });
        assert!(matches!(canvas.ops()[0], DrawOp::PushClip(r) if r == clip));
        assert!(matches!(canvas.ops()[1], DrawOp::Text { .. }));
        assert_eq!(canvas.ops()[2], DrawOp::PopClip);
        assert_eq!(canvas.texts(), vec!["hi"]);
    }

    #[test]
    fn reports_its_size() {
        let canvas = RecordingCanvas::new(640.0, 480.0);
        assert_eq!((canvas.width(), canvas.height()), (640.0, 480.0));
        assert!(canvas.ops().is_empty());
    }
}
