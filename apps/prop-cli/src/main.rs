use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use thiserror::Error;

use prop_blade::{integrate_forces, Blade, BladeAssembler, DesignTargets, StationTrace};
use prop_core::units::{newton, rpm};
use prop_export::{write_blade_stl, write_prop_scad};
use prop_solve::BemConfig;

mod design_file;
use design_file::DesignFile;

/// Surface points per side used for the exported STL skin.
const STL_SAMPLES: usize = 60;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("design file rejected: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{0}")]
    Foil(#[from] prop_foil::FoilError),
    #[error("{0}")]
    Blade(#[from] prop_blade::BladeError),
    #[error("{0}")]
    Export(#[from] prop_export::ExportError),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Parser)]
#[command(name = "prop-cli")]
#[command(about = "Propeller blade design tool - BEM station optimization and export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a design YAML file
    Validate {
        /// Path to the design YAML file
        design_path: PathBuf,
    },
    /// Design a blade and export STL/SCAD artifacts
    Design {
        /// Path to the design YAML file
        design_path: PathBuf,
        /// Target thrust in newtons
        #[arg(long)]
        thrust: f64,
        /// Design rotational speed in rev/min
        #[arg(long)]
        rpm: f64,
        /// Output directory (defaults to the design file's directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Mirror the assembly for a counter-rotating prop
        #[arg(long)]
        ccw: bool,
        /// Skip STL/SCAD generation and only print the station table
        #[arg(long)]
        no_export: bool,
    },
    /// Evaluate an existing design at an off-design rotational speed
    Forces {
        /// Path to the design YAML file
        design_path: PathBuf,
        /// Target thrust in newtons used for the design pass
        #[arg(long)]
        thrust: f64,
        /// Design rotational speed in rev/min
        #[arg(long)]
        rpm: f64,
        /// Rotational speed to evaluate, rev/min
        #[arg(long)]
        at_rpm: f64,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { design_path } => cmd_validate(&design_path),
        Commands::Design {
            design_path,
            thrust,
            rpm,
            output,
            ccw,
            no_export,
        } => cmd_design(&design_path, thrust, rpm, output.as_deref(), ccw, no_export),
        Commands::Forces {
            design_path,
            thrust,
            rpm,
            at_rpm,
        } => cmd_forces(&design_path, thrust, rpm, at_rpm),
    }
}

fn cmd_validate(design_path: &Path) -> AppResult<()> {
    println!("Validating design: {}", design_path.display());
    let file = DesignFile::load(design_path)?;
    let params = file.parameters();
    params.validate().map_err(prop_blade::BladeError::from)?;
    file.family()?;
    println!("✓ Design is valid");
    println!(
        "  {} blades, radius {:.1} mm, foil '{}'",
        params.blade_count,
        params.radius.value * 1000.0,
        file.foil
    );
    Ok(())
}

fn cmd_design(
    design_path: &Path,
    thrust_n: f64,
    rpm_rev_min: f64,
    output: Option<&Path>,
    ccw: bool,
    no_export: bool,
) -> AppResult<()> {
    let file = DesignFile::load(design_path)?;
    let assembler = BladeAssembler::new(file.parameters(), file.resolution(), file.family()?)?;
    println!(
        "Designing '{}' for {:.2} N at {:.0} rpm ({} stations)",
        file.name,
        thrust_n,
        rpm_rev_min,
        assembler.radial_steps()
    );

    let targets = DesignTargets {
        thrust: newton(thrust_n),
        rpm: rpm(rpm_rev_min),
    };
    let mut progress = |trace: &StationTrace| {
        let mark = if trace.converged { ' ' } else { '!' };
        println!(
            "  r={:>6.1} mm  twist={:>6.2}°  chord={:>5.1} mm  dv={:>6.2}/{:<6.2} m/s  dT={:>6.3} N {}",
            trace.r * 1000.0,
            trace.twist.to_degrees(),
            trace.chord * 1000.0,
            trace.dv,
            trace.dv_goal,
            trace.thrust,
            mark
        );
    };
    let blade = assembler.design_with(targets, Some(&mut progress))?;

    print_station_table(&blade);
    print_totals(&blade, rpm_rev_min);

    if !blade.flagged().is_empty() {
        println!(
            "⚠ {} station(s) missed their goal: {:?}",
            blade.flagged().len(),
            blade
                .flagged()
                .iter()
                .map(|r| (r * 1000.0).round())
                .collect::<Vec<_>>()
        );
    }

    if no_export {
        return Ok(());
    }

    let dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => design_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    std::fs::create_dir_all(&dir)?;

    let stl_path = dir.join(format!("{}_blade.stl", file.name));
    let scad_path = dir.join(format!("{}.scad", file.name));
    let band = write_blade_stl(&blade, &stl_path, STL_SAMPLES)?;
    write_prop_scad(&blade, &scad_path, band, ccw)?;
    println!("✓ Wrote {}", stl_path.display());
    println!("✓ Wrote {}", scad_path.display());
    Ok(())
}

fn cmd_forces(design_path: &Path, thrust_n: f64, rpm_rev_min: f64, at_rpm: f64) -> AppResult<()> {
    let file = DesignFile::load(design_path)?;
    let assembler = BladeAssembler::new(file.parameters(), file.resolution(), file.family()?)?;
    let mut blade = assembler.design(DesignTargets {
        thrust: newton(thrust_n),
        rpm: rpm(rpm_rev_min),
    })?;

    println!(
        "'{}' designed at {:.0} rpm, evaluated at {:.0} rpm",
        file.name, rpm_rev_min, at_rpm
    );
    let forces = integrate_forces(&mut blade, rpm(at_rpm), &BemConfig::default())?;
    let omega = rpm(at_rpm).value;
    println!("  Thrust: {:>8.3} N", forces.thrust.value);
    println!("  Torque: {:>8.4} N·m", forces.torque.value);
    println!("  Power:  {:>8.2} W", forces.torque.value * omega);
    if !forces.skipped.is_empty() {
        println!("  ⚠ {} station(s) skipped", forces.skipped.len());
    }
    Ok(())
}

fn print_station_table(blade: &Blade) {
    println!("\nStations (hub to tip, smoothed):");
    println!("  {:>8} {:>9} {:>9} {:>8}", "r (mm)", "twist (°)", "chord (mm)", "dv (m/s)");
    for station in blade.stations() {
        println!(
            "  {:>8.1} {:>9.2} {:>9.2} {:>8.2}",
            station.r() * 1000.0,
            station.twist().to_degrees(),
            station.chord() * 1000.0,
            station.induction.dv
        );
    }
}

fn print_totals(blade: &Blade, rpm_rev_min: f64) {
    let omega = rpm(rpm_rev_min).value;
    let thrust = blade.thrust().value;
    let torque = blade.torque().value;
    println!("\nDesign point totals:");
    println!("  Thrust: {:>8.3} N", thrust);
    println!("  Torque: {:>8.4} N·m", torque);
    println!("  Power:  {:>8.2} W", torque * omega);
    println!(
        "  Station sum before smoothing: {:.3} N, {:.4} N·m",
        blade.unsmoothed_thrust().value,
        blade.unsmoothed_torque().value
    );
}
