use crate::draw::canvas::Canvas;
use crate::draw::model::BrushSettings;
use crate::draw::stroke::{smooth_path, stroke_width, PathPiece, Point, Sample};

/// Target length of the line segments a quadratic piece is flattened into.
const FLATTEN_STEP_PX: f32 = 2.0;
const MAX_FLATTEN_STEPS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DirtyRect {
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width: width as i32,
            height: height as i32,
        }
    }

    pub fn from_points(a: Point, b: Point, pad: f32) -> Self {
        let min_x = (a.0.min(b.0) - pad).floor() as i32;
        let max_x = (a.0.max(b.0) + pad).ceil() as i32;
        let min_y = (a.1.min(b.1) - pad).floor() as i32;
        let max_y = (a.1.max(b.1) + pad).ceil() as i32;
        Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x + 1).max(1),
            height: (max_y - min_y + 1).max(1),
        }
    }

    pub fn union(self, other: DirtyRect) -> DirtyRect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        DirtyRect {
            x: min_x,
            y: min_y,
            width: (max_x - min_x).max(1),
            height: (max_y - min_y).max(1),
        }
    }

    pub fn clamp(self, width: u32, height: u32) -> Option<DirtyRect> {
        let max_w = width as i32;
        let max_h = height as i32;
        let x0 = self.x.clamp(0, max_w);
        let y0 = self.y.clamp(0, max_h);
        let x1 = (self.x + self.width).clamp(0, max_w);
        let y1 = (self.y + self.height).clamp(0, max_h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(DirtyRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

pub fn union_dirty(a: Option<DirtyRect>, b: Option<DirtyRect>) -> Option<DirtyRect> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Per-stroke coverage mask. Each pixel is reported to the caller the first
/// time any segment of the stroke covers it, so a stroke blends every pixel
/// at most once no matter how many of its segments overlap there.
#[derive(Debug, Clone)]
pub struct Coverage {
    width: u32,
    height: u32,
    covered: Vec<bool>,
    bounds: Option<DirtyRect>,
}

impl Coverage {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            covered: vec![false; width as usize * height as usize],
            bounds: None,
        }
    }

    pub fn bounds(&self) -> Option<DirtyRect> {
        self.bounds
    }

    pub fn is_covered(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.covered[(y * self.width + x) as usize]
    }

    /// Covers every pixel whose center lies within `diameter / 2` of the
    /// segment, calling `on_new` for pixels not covered before.
    pub fn cover_segment<F>(
        &mut self,
        start: Point,
        end: Point,
        diameter: f32,
        mut on_new: F,
    ) -> Option<DirtyRect>
    where
        F: FnMut(u32, u32),
    {
        let radius = diameter.max(1.0) / 2.0;
        let clip =
            DirtyRect::from_points(start, end, radius + 1.0).clamp(self.width, self.height)?;
        let radius_sq = radius * radius + 1e-4;

        for y in clip.y..(clip.y + clip.height) {
            for x in clip.x..(clip.x + clip.width) {
                let center = (x as f32 + 0.5, y as f32 + 0.5);
                if point_segment_distance_sq(center, start, end) > radius_sq {
                    continue;
                }
                let idx = (y as u32 * self.width + x as u32) as usize;
                if !self.covered[idx] {
                    self.covered[idx] = true;
                    on_new(x as u32, y as u32);
                }
            }
        }

        self.bounds = union_dirty(self.bounds, Some(clip));
        Some(clip)
    }

    pub fn cover_dot<F>(&mut self, center: Point, diameter: f32, on_new: F) -> Option<DirtyRect>
    where
        F: FnMut(u32, u32),
    {
        self.cover_segment(center, center, diameter, on_new)
    }
}

fn point_segment_distance_sq(point: Point, start: Point, end: Point) -> f32 {
    let (px, py) = point;
    let (x0, y0) = start;
    let vx = end.0 - x0;
    let vy = end.1 - y0;
    let wx = px - x0;
    let wy = py - y0;
    let len_sq = vx * vx + vy * vy;
    if len_sq <= f32::EPSILON {
        return wx * wx + wy * wy;
    }
    let t = ((wx * vx + wy * vy) / len_sq).clamp(0.0, 1.0);
    let dx = px - (x0 + vx * t);
    let dy = py - (y0 + vy * t);
    dx * dx + dy * dy
}

fn distance(a: Point, b: Point) -> f32 {
    ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}

/// Flattens a quadratic curve into a polyline, endpoints included.
pub fn flatten_quad(from: Point, ctrl: Point, to: Point) -> Vec<Point> {
    let hull = distance(from, ctrl) + distance(ctrl, to);
    let steps = ((hull / FLATTEN_STEP_PX).ceil() as usize).clamp(1, MAX_FLATTEN_STEPS);
    (0..=steps)
        .map(|step| {
            let t = step as f32 / steps as f32;
            let mt = 1.0 - t;
            (
                mt * mt * from.0 + 2.0 * mt * t * ctrl.0 + t * t * to.0,
                mt * mt * from.1 + 2.0 * mt * t * ctrl.1 + t * t * to.1,
            )
        })
        .collect()
}

pub fn render_pieces(
    canvas: &mut Canvas,
    coverage: &mut Coverage,
    pieces: &[PathPiece],
    brush: &BrushSettings,
) -> Option<DirtyRect> {
    let mode = brush.blend_mode();
    let color = brush.color;
    let mut dirty = None;

    for piece in pieces {
        match *piece {
            PathPiece::Dot { center, pressure } => {
                let width = stroke_width(brush.size, pressure);
                let rect =
                    coverage.cover_dot(center, width, |x, y| canvas.blend(x, y, color, mode));
                dirty = union_dirty(dirty, rect);
            }
            PathPiece::Line { from, to, pressure } => {
                let width = stroke_width(brush.size, pressure);
                let rect =
                    coverage.cover_segment(from, to, width, |x, y| canvas.blend(x, y, color, mode));
                dirty = union_dirty(dirty, rect);
            }
            PathPiece::Quad {
                from,
                ctrl,
                to,
                pressure,
            } => {
                let width = stroke_width(brush.size, pressure);
                for segment in flatten_quad(from, ctrl, to).windows(2) {
                    let rect = coverage.cover_segment(segment[0], segment[1], width, |x, y| {
                        canvas.blend(x, y, color, mode)
                    });
                    dirty = union_dirty(dirty, rect);
                }
            }
        }
    }
    dirty
}

/// Renders a complete stroke as a smoothed path.
pub fn render_stroke(
    canvas: &mut Canvas,
    samples: &[Sample],
    brush: &BrushSettings,
) -> Option<DirtyRect> {
    let pieces = smooth_path(samples);
    if pieces.is_empty() {
        return None;
    }
    let mut coverage = Coverage::new(canvas.width(), canvas.height());
    render_pieces(canvas, &mut coverage, &pieces, brush)
}

/// Renders one raw straight segment between consecutive samples, used for
/// live previews and the direct drawing model.
pub fn render_segment(
    canvas: &mut Canvas,
    coverage: &mut Coverage,
    from: Sample,
    to: Sample,
    brush: &BrushSettings,
) -> Option<DirtyRect> {
    let pressure = (from.pressure + to.pressure) / 2.0;
    render_pieces(
        canvas,
        coverage,
        &[PathPiece::Line {
            from: from.pos,
            to: to.pos,
            pressure,
        }],
        brush,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::model::Color;
    use crate::draw::stroke::DEFAULT_PRESSURE;

    fn opaque_brush(size: u32) -> BrushSettings {
        BrushSettings {
            color: Color::RED,
            size,
            eraser: false,
        }
    }

    fn painted_columns_in_row(canvas: &Canvas, y: u32) -> Vec<u32> {
        (0..canvas.width())
            .filter(|&x| canvas.pixel(x, y).a > 0)
            .collect()
    }

    #[test]
    fn empty_stroke_draws_nothing() {
        let mut canvas = Canvas::new(16, 16);
        assert_eq!(render_stroke(&mut canvas, &[], &opaque_brush(8)), None);
        assert!(canvas.is_blank());
    }

    #[test]
    fn single_sample_draws_dot_of_brush_diameter() {
        let mut canvas = Canvas::new(32, 32);
        let samples = [Sample::new((10.0, 10.0), DEFAULT_PRESSURE)];
        render_stroke(&mut canvas, &samples, &opaque_brush(8)).expect("dirty rect");

        let columns = painted_columns_in_row(&canvas, 10);
        assert_eq!(columns.len(), 8);
        assert_eq!(columns.first(), Some(&6));
        assert_eq!(columns.last(), Some(&13));
        assert_eq!(canvas.pixel(10, 10), Color::RED);
        assert_eq!(canvas.pixel(10, 2).a, 0);
    }

    #[test]
    fn half_pressure_dot_is_half_as_wide() {
        let mut canvas = Canvas::new(32, 32);
        let samples = [Sample::new((10.0, 10.0), 0.5)];
        render_stroke(&mut canvas, &samples, &opaque_brush(8));
        assert_eq!(painted_columns_in_row(&canvas, 10).len(), 4);
    }

    #[test]
    fn translucent_stroke_blends_each_pixel_once() {
        let mut canvas = Canvas::new(40, 10);
        let brush = BrushSettings {
            color: Color::rgba(255, 0, 0, 128),
            size: 4,
            eraser: false,
        };
        let samples: Vec<Sample> = (0..10)
            .map(|i| Sample::new((5.0 + i as f32 * 3.0, 5.0), DEFAULT_PRESSURE))
            .collect();
        render_stroke(&mut canvas, &samples, &brush);

        for x in 6..30 {
            assert_eq!(canvas.pixel(x, 5).a, 128, "double blend at column {x}");
        }
    }

    #[test]
    fn eraser_over_opaque_region_leaves_zero_alpha() {
        let mut canvas = Canvas::filled(20, 20, Color::WHITE);
        let brush = BrushSettings {
            color: Color::RED,
            size: 6,
            eraser: true,
        };
        let samples = [
            Sample::new((2.0, 10.0), DEFAULT_PRESSURE),
            Sample::new((18.0, 10.0), DEFAULT_PRESSURE),
        ];
        render_stroke(&mut canvas, &samples, &brush);

        for x in 3..17 {
            assert_eq!(canvas.pixel(x, 10).a, 0);
            assert_eq!(canvas.pixel(x, 9).a, 0);
        }
        assert_eq!(canvas.pixel(10, 1), Color::WHITE);
    }

    #[test]
    fn quad_flattening_keeps_endpoints() {
        let points = flatten_quad((0.0, 0.0), (10.0, 0.0), (10.0, 10.0));
        assert_eq!(points.first(), Some(&(0.0, 0.0)));
        assert_eq!(points.last(), Some(&(10.0, 10.0)));
        assert!(points.len() > 2);
    }

    #[test]
    fn segment_dirty_rect_is_clamped_to_canvas() {
        let mut canvas = Canvas::new(10, 10);
        let mut coverage = Coverage::new(10, 10);
        let rect = render_segment(
            &mut canvas,
            &mut coverage,
            Sample::new((-5.0, 5.0), DEFAULT_PRESSURE),
            Sample::new((5.0, 5.0), DEFAULT_PRESSURE),
            &opaque_brush(2),
        )
        .expect("dirty rect");
        assert_eq!(rect.x, 0);
        assert!(rect.x + rect.width <= 10);
        assert!(coverage.is_covered(0, 5));
    }

    #[test]
    fn dirty_rect_union_and_clamp() {
        let a = DirtyRect::from_points((0.0, 0.0), (2.0, 2.0), 0.0);
        let b = DirtyRect::from_points((8.0, 8.0), (9.0, 9.0), 0.0);
        let merged = a.union(b);
        assert_eq!((merged.x, merged.y), (0, 0));
        assert_eq!(merged.clamp(5, 5).map(|r| (r.width, r.height)), Some((5, 5)));
        assert_eq!(
            DirtyRect::from_points((20.0, 20.0), (21.0, 21.0), 0.0).clamp(5, 5),
            None
        );
    }
}
