//! Stroke samples and the midpoint quadratic smoothing that turns them into
//! drawable path pieces.

pub const DEFAULT_PRESSURE: f32 = 1.0;
pub const MIN_PRESSURE: f32 = 0.01;

pub type Point = (f32, f32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub pos: Point,
    pub pressure: f32,
}

impl Sample {
    pub fn new(pos: Point, pressure: f32) -> Self {
        Self { pos, pressure }
    }
}

/// Samples collected between pointer-down and pointer-up.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stroke {
    samples: Vec<Sample>,
}

impl Stroke {
    pub fn begin(sample: Sample) -> Self {
        Self {
            samples: vec![sample],
        }
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn last(&self) -> Option<Sample> {
        self.samples.last().copied()
    }
}

/// One drawable element of a smoothed stroke. `pressure` is already the mean
/// of the two samples the piece spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathPiece {
    Dot {
        center: Point,
        pressure: f32,
    },
    Line {
        from: Point,
        to: Point,
        pressure: f32,
    },
    Quad {
        from: Point,
        ctrl: Point,
        to: Point,
        pressure: f32,
    },
}

pub fn midpoint(a: Point, b: Point) -> Point {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

pub fn mean_pressure(a: Sample, b: Sample) -> f32 {
    (a.pressure + b.pressure) / 2.0
}

/// Clamps a device-reported pressure; a missing value means no tablet.
pub fn normalize_pressure(raw: Option<f32>) -> f32 {
    match raw {
        Some(value) if value.is_finite() => value.clamp(MIN_PRESSURE, 1.0),
        _ => DEFAULT_PRESSURE,
    }
}

pub fn stroke_width(brush_size: u32, pressure: f32) -> f32 {
    (brush_size as f32 * pressure).max(1.0)
}

/// Midpoint quadratic smoothing.
///
/// Each interior sample becomes the control point of a quadratic curve that
/// ends halfway to the following sample, so consecutive curves meet at
/// midpoints instead of forming polyline corners. A final straight piece
/// reaches the last sample.
pub fn smooth_path(samples: &[Sample]) -> Vec<PathPiece> {
    match samples {
        [] => Vec::new(),
        [only] => vec![PathPiece::Dot {
            center: only.pos,
            pressure: only.pressure,
        }],
        _ => {
            let mut pieces = Vec::with_capacity(samples.len());
            let mut cursor = samples[0].pos;
            for i in 1..samples.len() - 1 {
                let ctrl = samples[i].pos;
                let to = midpoint(ctrl, samples[i + 1].pos);
                pieces.push(PathPiece::Quad {
                    from: cursor,
                    ctrl,
                    to,
                    pressure: mean_pressure(samples[i - 1], samples[i]),
                });
                cursor = to;
            }
            let n = samples.len();
            pieces.push(PathPiece::Line {
                from: cursor,
                to: samples[n - 1].pos,
                pressure: mean_pressure(samples[n - 2], samples[n - 1]),
            });
            pieces
        }
    }
}
