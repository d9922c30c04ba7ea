//! What the participant sees, independent of how it gets drawn.
//!
//! Geometry is in pixels of a virtual screen with the origin at its center
//! and y pointing up. A [StimulusSurface] turns a [Scene] into something
//! visible, and a [ResponseSource] reports the participant's key presses.

use crate::{config::ResponseKey, error::BartError, Point};
use std::f64::consts::PI;

/// Half-width of the balloon's neck triangle.
pub const NECK_SIZE: f64 = 6.0;

/// Segments used to approximate the balloon's round body.
pub const BODY_SEGMENTS: usize = 64;

/// One screenful of stimulus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scene {
    /// The task explanation, shown until the begin key is pressed
    Instructions(String),
    /// A balloon after `inflation - 1` pumps, with the reward readouts
    Balloon {
        inflation: u32,
        cumulative_reward: u64,
        run_reward: u32,
    },
    /// The popped balloon
    Explosion { show_reward: bool },
    /// End of session
    Summary { earned: u64, possible: u64 },
}

/// Something that can show a [Scene].
pub trait StimulusSurface {
    fn present(&mut self, scene: &Scene) -> Result<(), BartError>;
}

/// Something that produces the participant's key presses. Both calls block
/// until a qualifying key arrives; there is no timeout. Keys pressed before
/// a call starts, during a pause for instance, never count toward it.
pub trait ResponseSource {
    /// Wait for one of `accepted`, ignoring every other key.
    fn wait_for_key(&mut self, accepted: &[ResponseKey]) -> Result<ResponseKey, BartError>;

    /// Wait for any key at all.
    fn wait_for_any_key(&mut self) -> Result<(), BartError>;
}

/// The text on the instruction screen.
pub fn instructions_text(
    num_runs: u32,
    inflate: ResponseKey,
    cash_in: ResponseKey,
    begin: ResponseKey,
) -> String {
    format!(
        "You have {} total balloons.\n\n\
         Press {} to fill the balloon and {} to cash in for the run.\n\n\
         Try to maximize your income and cash in before the balloon explodes!\n\n\n\
         Press {} to begin",
        num_runs,
        inflate.label(),
        cash_in.label(),
        begin.label()
    )
}

/// The text on the final screen.
pub fn summary_text(earned: u64, possible: u64) -> String {
    format!(
        "Congratulations! You earned ${} out of ${} possible.",
        earned, possible
    )
}

/// Radius of the balloon on its `inflation`th showing.
pub fn balloon_radius(inflation: u32) -> f64 {
    10.0 * inflation as f64 + 20.0
}

/// Where things go on a screen of a particular size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
}

impl Layout {
    pub fn new((width, height): (f64, f64)) -> Self {
        Self { width, height }
    }

    /// A point slightly off the screen's center that explosions and the
    /// instructions are placed around.
    pub fn middle(&self) -> Point {
        Point {
            x: self.width / 32.0,
            y: self.height / 32.0,
        }
    }

    /// The bottom of the balloon stays put while it grows.
    pub fn balloon_bottom(&self) -> Point {
        Point {
            x: self.middle().x,
            y: -0.25 * self.height,
        }
    }

    /// Left edge of the cumulative reward line.
    pub fn cumulative_text(&self) -> Point {
        Point {
            x: -0.9 * self.width / 2.0,
            y: 0.85 * self.height / 2.0,
        }
    }

    /// Left edge of the run reward line.
    pub fn run_text(&self) -> Point {
        Point {
            x: -0.9 * self.width / 2.0,
            y: 0.65 * self.height / 2.0,
        }
    }

    /// Center of the reward line over an explosion.
    pub fn explosion_reward_text(&self) -> Point {
        Point {
            x: 0.0,
            y: self.middle().y + 275.0,
        }
    }
}

/// Vertices along a circular arc from `start_angle` to `end_angle`, in
/// degrees counterclockwise from the positive x axis. Yields
/// `num_segments + 1` points, both ends included.
pub fn arc_vertices(
    center: Point,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    num_segments: usize,
) -> Vec<Point> {
    let num_segments = num_segments.max(1);
    (0..=num_segments)
        .map(|i| start_angle + (end_angle - start_angle) * i as f64 / num_segments as f64)
        .map(|degrees| degrees * PI / 180.0)
        .map(|angle| Point {
            x: center.x + radius * angle.cos(),
            y: center.y + radius * angle.sin(),
        })
        .collect()
}

/// The two filled shapes a balloon is made of.
#[derive(Debug, Clone, PartialEq)]
pub struct BalloonShape {
    pub body: Vec<Point>,
    pub neck: [Point; 3],
}

/// A balloon of `radius` whose body rests on `bottom`. The neck hangs from
/// the body's center to just below `bottom`.
pub fn balloon_shape(bottom: Point, neck_size: f64, radius: f64) -> BalloonShape {
    let center = Point {
        x: bottom.x,
        y: bottom.y + radius,
    };
    let body = arc_vertices(center, radius, 0.0, 360.0, BODY_SEGMENTS);
    let neck = [
        center,
        Point {
            x: bottom.x + neck_size,
            y: bottom.y - neck_size,
        },
        Point {
            x: bottom.x - neck_size,
            y: bottom.y - neck_size,
        },
    ];
    BalloonShape { body, neck }
}

/// Four jagged, overlapping triangles around `mid`.
pub fn explosion_shards(mid: Point) -> [[Point; 3]; 4] {
    let at = |dx: f64, dy: f64| Point {
        x: mid.x + dx,
        y: mid.y + dy,
    };
    [
        [at(0.0, -150.0), at(-80.0, 150.0), at(80.0, 150.0)],
        [at(100.0, -170.0), at(-90.0, -20.0), at(0.0, 230.0)],
        [at(0.0, -50.0), at(-10.0, 100.0), at(180.0, 10.0)],
        [at(-180.0, 90.0), at(-10.0, 0.0), at(20.0, 90.0)],
    ]
}

/// Even-odd test for whether `p` falls inside the polygon `vertices`.
pub fn contains(vertices: &[Point], p: Point) -> bool {
    let mut inside = false;
    let n = vertices.len();
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + n - 1) % n];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
    }
    inside
}

/// Smallest axis-aligned box holding every vertex, as `(min, max)`.
pub fn bounding_box(vertices: &[Point]) -> Option<(Point, Point)> {
    let first = *vertices.first()?;
    Some(vertices.iter().fold((first, first), |(lo, hi), p| {
        (
            Point {
                x: lo.x.min(p.x),
                y: lo.y.min(p.y),
            },
            Point {
                x: hi.x.max(p.x),
                y: hi.y.max(p.y),
            },
        )
    }))
}
