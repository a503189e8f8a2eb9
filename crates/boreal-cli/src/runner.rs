//! Job runner: builds the source from configuration and batches samples.

use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use boreal_core::distributions::{EnergyDist, PitchAngleDist};
use boreal_core::field::{DipoleField, FieldModel, SpaceTime};
use boreal_core::sequence::FileSequence;
use boreal_core::source::{ElectronSource, ParticleGun, ParticleSample, PrimaryGenerator};

use crate::config::JobConfig;

/// Gun implementation that collects every committed vertex.
#[derive(Default)]
struct CollectingGun {
    staged_position: [f64; 3],
    staged_direction: [f64; 3],
    staged_energy: f64,
    samples: Vec<ParticleSample>,
}

impl ParticleGun for CollectingGun {
    fn set_position(&mut self, position_km: [f64; 3]) {
        self.staged_position = position_km;
    }

    fn set_direction(&mut self, direction: [f64; 3]) {
        self.staged_direction = direction;
    }

    fn set_energy(&mut self, energy_kev: f64) {
        self.staged_energy = energy_kev;
    }

    fn create_vertex(&mut self) {
        self.samples.push(ParticleSample {
            position_km: self.staged_position,
            direction: self.staged_direction,
            energy_kev: self.staged_energy,
        });
    }
}

/// Build the electron source, attaching replay files where configured.
pub fn build_source(job: &JobConfig) -> Result<ElectronSource> {
    let config = job.source_config()?;

    let mut source = ElectronSource::new(config.clone());

    if config.pitch_angle_dist == PitchAngleDist::FromFile {
        let path = &job.source.pitch_angle.file;
        let sequence = FileSequence::open(path)
            .with_context(|| format!("Opening pitch-angle replay file '{path}'"))?;
        source = source.with_pitch_angle_replay(Box::new(sequence));
    }

    if config.energy_dist == EnergyDist::FromFile {
        let path = &job.source.energy.file;
        let sequence = FileSequence::open(path)
            .with_context(|| format!("Opening energy replay file '{path}'"))?;
        source = source.with_energy_replay(Box::new(sequence));
    }

    Ok(source)
}

/// Generate `n_events` primary samples from a parsed job configuration.
pub fn run_generation(job: &JobConfig, n_events: usize, seed: Option<u64>) -> Result<Vec<ParticleSample>> {
    let source = build_source(job)?;
    let mut generator = PrimaryGenerator::new(source);

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut gun = CollectingGun::default();
    for event in 0..n_events {
        generator
            .generate_primaries(&mut gun, &mut rng)
            .with_context(|| format!("Generating event {event}"))?;

        if (event + 1) % 10_000 == 0 {
            log::info!("{} / {} events generated", event + 1, n_events);
        }
    }

    Ok(gun.samples)
}

/// Write generated samples to a CSV file with a metadata header.
pub fn write_samples_csv(samples: &[ParticleSample], path: &Path, job: &JobConfig) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let source = job.source_config()?;
    let mut file = std::fs::File::create(path)?;

    writeln!(file, "# Boreal — Primary Electron Samples")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "# kind: {}", source.kind.name())?;
    writeln!(
        file,
        "# energy: {:?}, E0 = {} keV",
        source.energy_dist, source.e0_kev
    )?;
    writeln!(
        file,
        "# pitch angle: {:?}, max = {} deg",
        source.pitch_angle_dist, source.max_pitch_angle_deg
    )?;
    writeln!(
        file,
        "# altitude: {} km, disk radius: {} km, tilt: {} deg",
        source.injection_altitude_km, source.disk_radius_km, source.tilt_angle_deg
    )?;
    writeln!(file, "#")?;
    writeln!(file, "x_km,y_km,z_km,dir_x,dir_y,dir_z,energy_kev")?;

    for s in samples {
        writeln!(
            file,
            "{:.6e},{:.6e},{:.6e},{:.9},{:.9},{:.9},{:.6e}",
            s.position_km[0],
            s.position_km[1],
            s.position_km[2],
            s.direction[0],
            s.direction[1],
            s.direction[2],
            s.energy_kev,
        )?;
    }

    println!("Samples written to: {}", path.display());
    Ok(())
}

/// Write generated samples to a JSON file.
pub fn write_samples_json(samples: &[ParticleSample], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(samples)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    std::fs::write(path, json)?;

    println!("Samples (JSON) written to: {}", path.display());
    Ok(())
}

/// Print a table of dipole field strength against altitude.
pub fn print_field_profile(alt_min_km: f64, alt_max_km: f64, points: usize) {
    let field = DipoleField::default();

    println!("Dipole field profile ({} model)", field.model_name());
    println!(
        "  moment = {:.3e} T km^3, latitude = {} deg, R = {} km",
        field.dipole_moment, field.geomag_latitude_deg, field.planet_radius_km
    );
    println!();
    println!("{:>12} {:>14} {:>14}", "alt_km", "z_local_km", "Bz_T");

    for i in 0..points {
        let altitude = alt_min_km
            + (alt_max_km - alt_min_km) * i as f64 / (points - 1).max(1) as f64;
        // Local z places the 500 km shell at the volume centre.
        let z_local = altitude - 500.0;
        let fv = field.field_at(&SpaceTime::at(0.0, 0.0, z_local));
        println!("{:12.1} {:14.1} {:14.6e}", altitude, z_local, fv.b[2]);
    }
}
