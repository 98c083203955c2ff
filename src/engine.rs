//! Snowflake growth state machine.
//!
//! The active segment list is rebuilt once per tick: every segment is
//! replaced by the four children of the classic Koch bump. Once the leading
//! segment of the pre-subdivision list has shrunk to a pixel, the freshly
//! built generation is projected into display space, retired into the flake
//! history, and a new random seed triangle starts over with a color drawn
//! from the palette.

use crate::geometry::{Point, Segment};
use crossterm::style::Color;
use rand::prelude::*;

/// Fractal-space canvas extents, matching the 400x300 drawing surface the
/// display projection was tuned for.
pub const CANVAS_WIDTH: i32 = 400;
pub const CANVAS_HEIGHT: i32 = 300;

/// Display projection: shrink by half, recenter via the engine offsets.
const DISPLAY_SCALE: f64 = 0.5;

/// A generation is finished once its leading segment is this short.
const FREEZE_LENGTH: f64 = 1.0;

/// Bump rotation, -60 degrees.
const BUMP_ANGLE: f64 = -std::f64::consts::FRAC_PI_3;

/// Retired flakes kept on screen.
const MAX_FLAKES: usize = 2;

/// Colors a new generation can be assigned.
const PALETTE: [Color; 3] = [Color::Cyan, Color::Magenta, Color::Yellow];

/// A finished fractal: display-space segments plus the color it grew with.
/// The color is copied out of the live selection at freeze time.
struct Flake {
    color: Color,
    segments: Vec<Segment>,
}

/// One drawable batch: display-space segments and the color to draw them in.
pub struct Layer {
    pub color: Color,
    pub segments: Vec<Segment>,
}

pub struct SnowEngine {
    width: i32,
    height: i32,
    x_offset: i32,
    y_offset: i32,
    active: Vec<Segment>,
    color: Color,
    flakes: Vec<Flake>,
    rng: StdRng,
}

impl SnowEngine {
    /// Engine over a `width` x `height` fractal canvas. The RNG drives seed
    /// placement and palette choice; pass a fixed-seed one for a
    /// reproducible run.
    pub fn new(width: i32, height: i32, rng: StdRng) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let active = vec![
            Segment::new(Point::new(0, height), Point::new(width / 2, 0)),
            Segment::new(Point::new(width / 2, 0), Point::new(width, height)),
            Segment::new(Point::new(width, height), Point::new(0, height)),
        ];
        Self {
            width,
            height,
            x_offset: width / 4,
            y_offset: height / 6,
            active,
            color: PALETTE[0],
            flakes: Vec::new(),
            rng,
        }
    }

    /// One timer tick. Subdivides every active segment, then either keeps
    /// the new generation growing or retires it.
    ///
    /// The threshold is tested on the pre-subdivision list, so a generation
    /// freezes one subdivision after its segments cross it; the retired
    /// flake is the result of that extra pass.
    pub fn advance(&mut self) {
        let mut children = Vec::with_capacity(self.active.len() * 4);
        for seg in &self.active {
            children.extend(subdivide(seg));
        }

        let finished = self
            .active
            .first()
            .map_or(true, |seg| seg.length() <= FREEZE_LENGTH);

        if finished {
            for seg in &mut children {
                *seg = seg.scaled(DISPLAY_SCALE, self.x_offset, self.y_offset);
            }
            self.flakes.push(Flake {
                color: self.color,
                segments: children,
            });
            if self.flakes.len() > MAX_FLAKES {
                self.flakes.remove(0);
            }
            self.reseed();
        } else {
            self.active = children;
        }
    }

    /// Drawable snapshot: the growing set first (projected for display),
    /// then the retired flakes in age order, which paint over it.
    pub fn renderables(&self) -> Vec<Layer> {
        let mut layers = Vec::with_capacity(1 + self.flakes.len());
        layers.push(Layer {
            color: self.color,
            segments: self
                .active
                .iter()
                .map(|seg| seg.scaled(DISPLAY_SCALE, self.x_offset, self.y_offset))
                .collect(),
        });
        for flake in &self.flakes {
            layers.push(Layer {
                color: flake.color,
                segments: flake.segments.clone(),
            });
        }
        layers
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn flake_count(&self) -> usize {
        self.flakes.len()
    }

    /// Drop a fresh seed triangle onto the lower half of the canvas and
    /// pick the color it will grow with. The base edge is axis-aligned;
    /// the apex sits at -60 degrees off its left end.
    fn reseed(&mut self) {
        let base_x = self.rng.gen_range(0..self.width);
        let base_y = self.rng.gen_range(self.height / 2..self.height);
        let base_w = self.rng.gen_range(0..(self.width - base_x).max(1));

        let left = Point::new(base_x, base_y);
        let right = Point::new(base_x + base_w, base_y);
        let apex = left.offset(f64::from(base_w), BUMP_ANGLE);

        self.active = vec![
            Segment::new(left, apex),
            Segment::new(apex, right),
            Segment::new(right, left),
        ];
        self.color = PALETTE[self.rng.gen_range(0..PALETTE.len())];
    }
}

/// Replace a segment with the four-segment Koch bump, preserving direction.
/// Children chain end to end from `seg.p1` to `seg.p2`.
fn subdivide(seg: &Segment) -> [Segment; 4] {
    let len = seg.length() / 3.0;
    let angle = seg.angle() + BUMP_ANGLE;
    // Integer division truncates toward zero, like the canvas it lands on.
    let p1 = Point::new(seg.p1.x + seg.width() / 3, seg.p1.y + seg.height() / 3);
    let p2 = Point::new(
        seg.p1.x + seg.width() * 2 / 3,
        seg.p1.y + seg.height() * 2 / 3,
    );
    let apex = p1.offset(len, angle);
    [
        Segment::new(seg.p1, p1),
        Segment::new(p1, apex),
        Segment::new(apex, p2),
        Segment::new(p2, seg.p2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SnowEngine {
        SnowEngine::new(CANVAS_WIDTH, CANVAS_HEIGHT, StdRng::seed_from_u64(7))
    }

    #[test]
    fn subdivision_produces_four_chained_children() {
        let seg = Segment::new(Point::new(3, -14), Point::new(200, 91));
        let children = subdivide(&seg);
        assert_eq!(children[0].p1, seg.p1);
        assert_eq!(children[3].p2, seg.p2);
        for pair in children.windows(2) {
            assert_eq!(pair[0].p2, pair[1].p1);
        }
    }

    #[test]
    fn subdivision_matches_the_worked_bump() {
        let seg = Segment::new(Point::new(0, 0), Point::new(90, 0));
        let children = subdivide(&seg);
        assert_eq!(children[0], Segment::new(Point::new(0, 0), Point::new(30, 0)));
        assert_eq!(children[1], Segment::new(Point::new(30, 0), Point::new(45, -25)));
        assert_eq!(children[2], Segment::new(Point::new(45, -25), Point::new(60, 0)));
        assert_eq!(children[3], Segment::new(Point::new(60, 0), Point::new(90, 0)));
    }

    #[test]
    fn long_segments_keep_growing() {
        let mut eng = engine();
        eng.active = vec![Segment::new(Point::new(0, 0), Point::new(2, 0))];
        eng.advance();
        assert_eq!(eng.flake_count(), 0);
        assert_eq!(eng.active_len(), 4);
    }

    #[test]
    fn threshold_segment_freezes_into_a_flake() {
        let mut eng = engine();
        eng.active = vec![Segment::new(Point::new(40, 40), Point::new(41, 40))];
        eng.advance();
        assert_eq!(eng.flake_count(), 1);
        assert_eq!(eng.flakes[0].segments.len(), 4);
        // A fresh seed triangle replaces the frozen generation.
        assert_eq!(eng.active_len(), 3);
        assert!(PALETTE.contains(&eng.color));
    }

    #[test]
    fn frozen_segments_are_display_space() {
        let mut eng = engine();
        eng.active = vec![Segment::new(Point::new(40, 40), Point::new(41, 40))];
        eng.advance();
        // (40, 40) scaled by 0.5 and pushed by (100, 50).
        assert_eq!(eng.flakes[0].segments[0].p1, Point::new(120, 70));
    }

    #[test]
    fn flake_history_is_bounded_fifo() {
        let mut eng = engine();
        for i in 0..3 {
            let x = 10 * (i + 1);
            eng.active = vec![Segment::new(Point::new(x, 20), Point::new(x + 1, 20))];
            eng.advance();
        }
        assert_eq!(eng.flake_count(), 2);
        // The x = 10 generation was evicted; x = 20 now leads the history.
        assert_eq!(eng.flakes[0].segments[0].p1, Point::new(110, 60));
        assert_eq!(eng.flakes[1].segments[0].p1, Point::new(115, 60));
    }

    #[test]
    fn reseed_builds_a_closed_triangle_in_the_lower_half() {
        let mut eng = engine();
        for _ in 0..50 {
            eng.reseed();
            assert_eq!(eng.active.len(), 3);

            let base = eng.active[0].p1;
            assert!(base.x >= 0 && base.x < CANVAS_WIDTH);
            assert!(base.y >= CANVAS_HEIGHT / 2 && base.y < CANVAS_HEIGHT);

            // The base edge is horizontal and stays inside the canvas.
            let right = eng.active[2].p1;
            assert_eq!(right.y, base.y);
            assert!(right.x >= base.x && right.x <= CANVAS_WIDTH);

            assert_eq!(eng.active[0].p2, eng.active[1].p1);
            assert_eq!(eng.active[1].p2, eng.active[2].p1);
            assert_eq!(eng.active[2].p2, eng.active[0].p1);
        }
    }

    #[test]
    fn renderables_lead_with_the_projected_active_layer() {
        let eng = engine();
        let layers = eng.renderables();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].segments.len(), 3);
        // (0, 300) scaled by 0.5 and pushed by (100, 50).
        assert_eq!(layers[0].segments[0].p1, Point::new(100, 200));
    }

    #[test]
    fn thousand_ticks_stay_bounded_and_on_screen() {
        let mut eng = engine();
        for _ in 0..1000 {
            eng.advance();
            assert!(eng.flake_count() <= MAX_FLAKES);
            for flake in &eng.flakes {
                for seg in &flake.segments {
                    for p in [seg.p1, seg.p2] {
                        assert!(p.x > -CANVAS_WIDTH && p.x < 2 * CANVAS_WIDTH);
                        assert!(p.y > -CANVAS_HEIGHT && p.y < 2 * CANVAS_HEIGHT);
                    }
                }
            }
        }
        // Plenty of generations complete within a thousand ticks.
        assert_eq!(eng.flake_count(), MAX_FLAKES);
    }

    #[test]
    fn degenerate_canvas_is_clamped() {
        let mut eng = SnowEngine::new(0, 0, StdRng::seed_from_u64(11));
        for _ in 0..20 {
            eng.advance();
        }
        assert!(eng.flake_count() <= MAX_FLAKES);
    }
}
