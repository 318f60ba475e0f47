//! Core capability trait for blade-station cross-sections.

/// Lift and drag coefficients at one angle of attack.
#[derive(Clone, Copy, Debug)]
pub struct AeroCoefficients {
    pub lift: f64,
    pub drag: f64,
}

/// Axis-aligned bounds of a rotated section, in the blade frame.
///
/// `x` runs along the rotation plane (chordwise before twist), `y` along the
/// prop axis (depth).
#[derive(Clone, Copy, Debug)]
pub struct FoilBounds {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl FoilBounds {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// One station's cross-section: geometry envelope queries plus an aerodynamic
/// polar. Chord and twist are mutable; everything else is fixed at
/// construction.
///
/// Sign conventions:
/// - angles in radians, positive twist pitches the leading edge into the flow
/// - section coordinates: unit chord along +x from the leading edge, thickness
///   along +y; rotation pivot at quarter chord
pub trait FoilAdapter: Send + Sync {
    /// Family name for logs and traces.
    fn name(&self) -> &str;

    /// Current chord length (m).
    fn chord(&self) -> f64;

    fn set_chord(&mut self, chord: f64);

    /// Current twist angle (rad).
    fn twist(&self) -> f64;

    fn set_twist(&mut self, twist: f64);

    /// Thickness-to-chord ratio.
    fn thickness_ratio(&self) -> f64;

    /// Lift and drag coefficients at the given angle of attack (rad).
    fn query_aero(&self, alpha: f64) -> AeroCoefficients;

    /// Lower and upper surface of the unit-chord section, `n` points each,
    /// ordered leading edge to trailing edge.
    fn unit_section(&self, n: usize) -> (Vec<[f64; 2]>, Vec<[f64; 2]>);

    /// Bounds of the section at the current chord, rotated by `twist`.
    fn bounding_box(&self, twist: f64) -> FoilBounds {
        let (lower, upper) = self.unit_section(SECTION_POINTS);
        let c = self.chord();
        let mut bounds = FoilBounds {
            x0: f64::INFINITY,
            x1: f64::NEG_INFINITY,
            y0: f64::INFINITY,
            y1: f64::NEG_INFINITY,
        };
        for p in lower.iter().chain(upper.iter()) {
            let [x, y] = rotate_about_pivot(*p, twist);
            bounds.x0 = bounds.x0.min(x * c);
            bounds.x1 = bounds.x1.max(x * c);
            bounds.y0 = bounds.y0.min(y * c);
            bounds.y1 = bounds.y1.max(y * c);
        }
        bounds
    }

    /// Largest chord whose rotated section fits inside a `chord_limit` wide,
    /// `depth_limit` deep envelope at the given twist.
    fn max_chord(&self, chord_limit: f64, depth_limit: f64, twist: f64) -> f64 {
        let (lower, upper) = self.unit_section(SECTION_POINTS);
        let mut x0 = f64::INFINITY;
        let mut x1 = f64::NEG_INFINITY;
        let mut y0 = f64::INFINITY;
        let mut y1 = f64::NEG_INFINITY;
        for p in lower.iter().chain(upper.iter()) {
            let [x, y] = rotate_about_pivot(*p, twist);
            x0 = x0.min(x);
            x1 = x1.max(x);
            y0 = y0.min(y);
            y1 = y1.max(y);
        }
        let width = (x1 - x0).max(f64::EPSILON);
        let height = (y1 - y0).max(f64::EPSILON);
        (chord_limit / width).min(depth_limit / height)
    }

    /// Lower and upper surface curves at the current chord and twist, shifted
    /// chordwise by `offset` (scimitar sweep). Consumed by export.
    fn boundary_points(&self, n: usize, offset: f64) -> (Vec<[f64; 2]>, Vec<[f64; 2]>) {
        let (lower, upper) = self.unit_section(n);
        let c = self.chord();
        let twist = self.twist();
        let place = |p: &[f64; 2]| {
            let [x, y] = rotate_about_pivot(*p, twist);
            [x * c + offset, y * c]
        };
        (
            lower.iter().map(place).collect(),
            upper.iter().map(place).collect(),
        )
    }
}

/// Point count used for envelope queries.
const SECTION_POINTS: usize = 40;

/// Rotate a unit-section point about the quarter-chord pivot.
pub(crate) fn rotate_about_pivot(p: [f64; 2], twist: f64) -> [f64; 2] {
    const PIVOT: f64 = 0.25;
    let (s, c) = twist.sin_cos();
    let x = p[0] - PIVOT;
    let y = p[1];
    [x * c + y * s + PIVOT, -x * s + y * c]
}

/// Cosine-spaced chordwise positions in [0, 1], clustered at both ends.
pub(crate) fn cosine_spacing(n: usize) -> Vec<f64> {
    let n = n.max(2);
    (0..n)
        .map(|i| 0.5 * (1.0 - (std::f64::consts::PI * i as f64 / (n - 1) as f64).cos()))
        .collect()
}
