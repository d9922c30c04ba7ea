//! Filled shapes for the ratatui canvas, and the mapping from the virtual
//! screen onto a braille canvas of whatever size the terminal is.

use crate::{
    stimulus::{bounding_box, contains},
    Point,
};
use ratatui::{
    layout::Rect,
    style::Color,
    widgets::canvas::{Painter, Shape},
};

/// How the virtual screen maps onto a canvas area. Braille dots are close
/// to square, so the same scale is used on both axes and the virtual screen
/// is letterboxed rather than stretched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Virtual pixels per braille dot
    pub scale: f64,
}

impl Viewport {
    pub fn fit((width, height): (f64, f64), area: Rect) -> Self {
        let dots_x = 2.0 * area.width.max(1) as f64;
        let dots_y = 4.0 * area.height.max(1) as f64;
        let scale = (width / dots_x).max(height / dots_y);
        let half_x = scale * dots_x / 2.0;
        let half_y = scale * dots_y / 2.0;
        Self {
            x_bounds: [-half_x, half_x],
            y_bounds: [-half_y, half_y],
            scale,
        }
    }

    /// Left edge for `text` to come out centered on `x`. A terminal cell is
    /// two dots wide.
    pub fn centered_x(&self, text: &str, x: f64) -> f64 {
        x - text.chars().count() as f64 * self.scale
    }

    /// Spacing between samples when filling a shape; half a dot so that no
    /// dot inside the shape is skipped.
    pub fn fill_step(&self) -> f64 {
        self.scale / 2.0
    }
}

/// A polygon drawn with its outline and every dot inside it set.
#[derive(Debug, Clone)]
pub struct FilledPolygon<'a> {
    pub vertices: &'a [Point],
    pub color: Color,
    pub step: f64,
}

impl Shape for FilledPolygon<'_> {
    fn draw(&self, painter: &mut Painter) {
        let Some((lo, hi)) = bounding_box(self.vertices) else {
            return;
        };
        if self.step <= 0.0 {
            return;
        }

        let mut paint = |x: f64, y: f64| {
            if let Some((px, py)) = painter.get_point(x, y) {
                painter.paint(px, py, self.color);
            }
        };

        let mut y = lo.y;
        while y <= hi.y {
            let mut x = lo.x;
            while x <= hi.x {
                if contains(self.vertices, Point { x, y }) {
                    paint(x, y);
                }
                x += self.step;
            }
            y += self.step;
        }

        // Thin shapes like the balloon's neck can fall between samples
        let n = self.vertices.len();
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let steps = (a.abs_dist(&b) / self.step).ceil().max(1.0) as usize;
            for s in 0..=steps {
                let t = s as f64 / steps as f64;
                paint(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_hd_on_a_classic_terminal() {
        let viewport = Viewport::fit((1920.0, 1080.0), Rect::new(0, 0, 80, 24));
        assert_eq!(viewport.scale, 12.0);
        assert_eq!(viewport.x_bounds, [-960.0, 960.0]);
        assert_eq!(viewport.y_bounds, [-576.0, 576.0]);
    }

    #[test]
    fn tall_terminal_letterboxes_vertically() {
        let viewport = Viewport::fit((1920.0, 1080.0), Rect::new(0, 0, 40, 60));
        assert_eq!(viewport.scale, 24.0);
        assert_eq!(viewport.x_bounds, [-960.0, 960.0]);
        assert!(viewport.y_bounds[1] > 540.0);
    }

    #[test]
    fn empty_area_does_not_divide_by_zero() {
        let viewport = Viewport::fit((1920.0, 1080.0), Rect::new(0, 0, 0, 0));
        assert!(viewport.scale.is_finite());
    }

    #[test]
    fn centering_text() {
        let viewport = Viewport::fit((1920.0, 1080.0), Rect::new(0, 0, 80, 24));
        // five cells of 24 pixels each
        assert_eq!(viewport.centered_x("*POP*", 0.0), -60.0);
    }
}
