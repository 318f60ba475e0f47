//! OpenSCAD assembly: hub cylinder plus rotated copies of the blade STL.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use prop_blade::Blade;

use crate::error::ExportResult;
use crate::stl::HubBand;

/// Write the assembly that imports `<name>_blade.stl` and unions it with a
/// bored hub. `ccw` mirrors the whole prop for a counter-rotating pair.
pub fn write_prop_scad(blade: &Blade, path: &Path, band: HubBand, ccw: bool) -> ExportResult<()> {
    let params = blade.params();
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "center_hole = {};", params.center_hole.value * 1000.0)?;
    writeln!(out, "hub_diameter = {};", params.hub_radius.value * 2000.0)?;
    writeln!(out, "hub_height = {};", params.hub_depth.value * 1000.0)?;
    writeln!(out, "n_blades = {};", params.blade_count)?;
    writeln!(out, "y_min = {};", band.y_min_mm)?;
    writeln!(out, "y_max = {};", band.y_max_mm)?;
    writeln!(out, "blade_name = \"{}_blade.stl\";", params.name)?;

    out.write_all(
        br#"
module blade() {
    import(blade_name);
}

module hub() {
    difference() {
        cylinder(d=hub_diameter+0.1, h=hub_height, $fn=61);
        cylinder(d=center_hole, h=55, center=true, $fn=31);
    }
}

module prop() {
    union() {
        for(angle = [0 : (360/n_blades) : 360]) {
            rotate(angle) blade();
        }
        translate([0,0,-hub_height+y_max]) hub();
    }
}
"#,
    )?;

    if ccw {
        writeln!(out, "mirror([1,0,0]) prop();")?;
    } else {
        writeln!(out, "prop();")?;
    }
    out.flush()?;

    tracing::info!(path = %path.display(), "prop SCAD written");
    Ok(())
}
