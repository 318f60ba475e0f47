//! ASCII STL generation for one blade.
//!
//! The skin is built as ruled strips between consecutive section curves:
//! hub lower curve, then every upper curve hub to tip, then every lower
//! curve tip back to hub. The first and last strips close the root and tip
//! faces, and a separate trailing-edge strip seals the remaining seam.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use prop_blade::Blade;

use crate::error::{ExportError, ExportResult};

/// Output unit is millimeters; all blade geometry is meters.
const SCALE_MM: f64 = 1000.0;

/// Axial extent of the blade root section, millimeters. The SCAD assembly
/// sinks the hub cylinder so it swallows this band.
#[derive(Clone, Copy, Debug)]
pub struct HubBand {
    pub y_min_mm: f64,
    pub y_max_mm: f64,
}

/// Triangle soup accumulated from polyline strips.
struct StripBuilder {
    triangles: Vec<[[f64; 3]; 3]>,
    previous: Option<Vec<[f64; 3]>>,
}

impl StripBuilder {
    fn new() -> Self {
        Self {
            triangles: Vec::new(),
            previous: None,
        }
    }

    /// Add a polyline; if one is pending, stitch a quad strip between them.
    fn add_line(&mut self, line: Vec<[f64; 3]>) {
        if let Some(prev) = self.previous.take() {
            let n = prev.len().min(line.len());
            for i in 0..n.saturating_sub(1) {
                self.triangles.push([prev[i], prev[i + 1], line[i]]);
                self.triangles.push([line[i], prev[i + 1], line[i + 1]]);
            }
        }
        self.previous = Some(line);
    }

    /// End the current strip; the next line starts a fresh one.
    fn new_block(&mut self) {
        self.previous = None;
    }

    fn write_ascii(&self, name: &str, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "solid {name}")?;
        for tri in &self.triangles {
            let n = facet_normal(tri);
            writeln!(out, "  facet normal {:e} {:e} {:e}", n[0], n[1], n[2])?;
            writeln!(out, "    outer loop")?;
            for v in tri {
                writeln!(out, "      vertex {:e} {:e} {:e}", v[0], v[1], v[2])?;
            }
            writeln!(out, "    endloop")?;
            writeln!(out, "  endfacet")?;
        }
        writeln!(out, "endsolid {name}")?;
        Ok(())
    }
}

fn facet_normal(tri: &[[f64; 3]; 3]) -> [f64; 3] {
    let a = [
        tri[1][0] - tri[0][0],
        tri[1][1] - tri[0][1],
        tri[1][2] - tri[0][2],
    ];
    let b = [
        tri[2][0] - tri[0][0],
        tri[2][1] - tri[0][1],
        tri[2][2] - tri[0][2],
    ];
    let n = [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 0.0 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 0.0, 0.0]
    }
}

/// Write one blade as a watertight ASCII STL in millimeters.
///
/// `samples` is the point count per section surface. Returns the axial band
/// of the root section so the SCAD assembly can place the hub.
pub fn write_blade_stl(blade: &Blade, path: &Path, samples: usize) -> ExportResult<HubBand> {
    if samples < 2 {
        return Err(ExportError::InvalidArg {
            what: "at least two points per surface are required",
        });
    }
    let stations = blade.stations();
    if stations.len() < 2 {
        return Err(ExportError::InvalidArg {
            what: "at least two stations are required for a skin",
        });
    }

    // Blade frame: span along x, chord along y, prop axis along z.
    let mut top_lines: Vec<Vec<[f64; 3]>> = Vec::with_capacity(stations.len());
    let mut bottom_lines: Vec<Vec<[f64; 3]>> = Vec::with_capacity(stations.len());
    let mut top_edge: Vec<[f64; 3]> = Vec::with_capacity(stations.len());
    let mut bottom_edge: Vec<[f64; 3]> = Vec::with_capacity(stations.len());

    for station in stations {
        let offset = blade.constraints().scimitar_offset(station.r())?;
        let (lower, upper) = station.foil().boundary_points(samples, offset);
        let lift = |p: &[f64; 2]| {
            [
                station.r() * SCALE_MM,
                p[0] * SCALE_MM,
                p[1] * SCALE_MM,
            ]
        };
        let lower: Vec<[f64; 3]> = lower.iter().map(lift).collect();
        let upper: Vec<[f64; 3]> = upper.iter().map(lift).collect();
        bottom_edge.push(lower[lower.len() - 1]);
        top_edge.push(upper[upper.len() - 1]);
        bottom_lines.push(lower);
        top_lines.push(upper);
    }

    let root = &stations[0];
    let bounds = root.foil().bounding_box(root.twist());

    let mut builder = StripBuilder::new();
    // Root cap, upper skin hub to tip, tip cap, lower skin tip to hub.
    builder.add_line(bottom_lines[0].clone());
    for line in top_lines {
        builder.add_line(line);
    }
    for line in bottom_lines.into_iter().rev() {
        builder.add_line(line);
    }
    // Seal the trailing edge with a strip between the two edge curves.
    builder.new_block();
    builder.add_line(bottom_edge);
    builder.add_line(top_edge);

    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    builder.write_ascii(&blade.params().name, &mut out)?;
    out.flush()?;

    tracing::info!(
        path = %path.display(),
        triangles = builder.triangles.len(),
        "blade STL written"
    );
    Ok(HubBand {
        y_min_mm: bounds.y0 * SCALE_MM,
        y_max_mm: bounds.y1 * SCALE_MM,
    })
}
