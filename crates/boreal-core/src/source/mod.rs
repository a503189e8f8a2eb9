//! Primary-particle generation.
//!
//! The transport engine calls [`PrimaryGenerator::generate_primaries`] once
//! per event. The generator draws a single [`ParticleSample`] from the
//! configured source, pushes it through the [`ParticleGun`] seam, and
//! requests vertex creation. Samples carry no identity beyond the event
//! they seed.

pub mod electron;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::distributions::{EnergyDist, InvalidModeError, PitchAngleDist, SourceKind};
use crate::sequence::SequenceError;

pub use electron::ElectronSource;

/// Errors raised while configuring or sampling a primary source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    InvalidMode(#[from] InvalidModeError),

    #[error("Source kind '{0}' is declared but has no sampler yet")]
    NotImplemented(&'static str),

    #[error("{parameter} is file-driven but no replay sequence was supplied")]
    MissingReplay { parameter: &'static str },

    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

/// Initial conditions for one primary event.
///
/// Consumed immediately to configure the engine's particle gun, then
/// discarded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSample {
    /// Initial position in local coordinates (km).
    pub position_km: [f64; 3],
    /// Initial momentum direction. Unit length before the field-line tilt
    /// is applied; the tilt update can leave it slightly off unit.
    pub direction: [f64; 3],
    /// Initial kinetic energy (keV).
    pub energy_kev: f64,
}

/// Parameters of the primary source, fixed before the run starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Which spectrum to sample.
    pub kind: SourceKind,
    /// Kinetic-energy distribution family.
    pub energy_dist: EnergyDist,
    /// Folding energy for the exponential family, or the fixed energy for
    /// the monoenergetic one (keV).
    pub e0_kev: f64,
    /// Pitch-angle distribution family.
    pub pitch_angle_dist: PitchAngleDist,
    /// Upper edge of the pitch-angle range (degrees).
    pub max_pitch_angle_deg: f64,
    /// Injection altitude (km). Local z places the 500 km shell at z = 0.
    pub injection_altitude_km: f64,
    /// Radius of the injection disk (km).
    pub disk_radius_km: f64,
    /// Tilt of the local field line away from vertical, in the y-z plane
    /// (degrees). 12.682° matches the Poker Flat magnetic inclination.
    pub tilt_angle_deg: f64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Electron,
            energy_dist: EnergyDist::Exponential,
            e0_kev: 100.0,
            pitch_angle_dist: PitchAngleDist::Sine,
            max_pitch_angle_deg: 40.0,
            injection_altitude_km: 500.0,
            disk_radius_km: 0.01,
            tilt_angle_deg: 12.682,
        }
    }
}

/// The engine-side particle gun the generator feeds.
///
/// Mirrors the configure-then-fire protocol of the underlying framework:
/// the three setters stage the sample and [`create_vertex`] commits it as
/// the event's primary vertex.
///
/// [`create_vertex`]: ParticleGun::create_vertex
pub trait ParticleGun {
    fn set_position(&mut self, position_km: [f64; 3]);
    fn set_direction(&mut self, direction: [f64; 3]);
    fn set_energy(&mut self, energy_kev: f64);
    fn create_vertex(&mut self);
}

/// Per-event entry point driven by the engine's event loop.
pub struct PrimaryGenerator {
    electron: ElectronSource,
}

impl PrimaryGenerator {
    pub fn new(electron: ElectronSource) -> Self {
        Self { electron }
    }

    pub fn config(&self) -> &SourceConfig {
        self.electron.config()
    }

    /// Draw one sample for the configured source kind and forward it to the
    /// gun. On any error the gun is left untouched; a partially staged
    /// sample is never committed.
    pub fn generate_primaries<G, R>(&mut self, gun: &mut G, rng: &mut R) -> Result<(), SourceError>
    where
        G: ParticleGun + ?Sized,
        R: Rng + ?Sized,
    {
        let sample = match self.electron.config().kind {
            SourceKind::Electron => self.electron.sample(rng)?,
            kind @ (SourceKind::SolarSpectrum | SourceKind::CosmicXrayBackground) => {
                return Err(SourceError::NotImplemented(kind.name()));
            }
        };

        log::trace!(
            "Primary: pos = {:?} km, dir = {:?}, E = {:.3} keV",
            sample.position_km,
            sample.direction,
            sample.energy_kev
        );

        gun.set_position(sample.position_km);
        gun.set_direction(sample.direction);
        gun.set_energy(sample.energy_kev);
        gun.create_vertex();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Test double that records what the generator staged.
    #[derive(Default)]
    struct RecordingGun {
        position: Option<[f64; 3]>,
        direction: Option<[f64; 3]>,
        energy: Option<f64>,
        vertices: usize,
    }

    impl ParticleGun for RecordingGun {
        fn set_position(&mut self, position_km: [f64; 3]) {
            self.position = Some(position_km);
        }
        fn set_direction(&mut self, direction: [f64; 3]) {
            self.direction = Some(direction);
        }
        fn set_energy(&mut self, energy_kev: f64) {
            self.energy = Some(energy_kev);
        }
        fn create_vertex(&mut self) {
            self.vertices += 1;
        }
    }

    #[test]
    fn test_generate_primaries_stages_and_fires_one_vertex() {
        let config = SourceConfig {
            energy_dist: EnergyDist::Mono,
            pitch_angle_dist: PitchAngleDist::Fixed,
            ..Default::default()
        };
        let mut generator = PrimaryGenerator::new(ElectronSource::new(config));
        let mut gun = RecordingGun::default();
        let mut rng = StdRng::seed_from_u64(7);

        generator.generate_primaries(&mut gun, &mut rng).unwrap();

        assert_eq!(gun.vertices, 1);
        assert_eq!(gun.energy, Some(100.0));
        let pos = gun.position.unwrap();
        assert!((pos[0] * pos[0] + pos[1] * pos[1]).sqrt() <= 0.01);
        assert!(gun.direction.is_some());
    }

    #[test]
    fn test_unimplemented_kinds_leave_the_gun_untouched() {
        for kind in [SourceKind::SolarSpectrum, SourceKind::CosmicXrayBackground] {
            let config = SourceConfig {
                kind,
                ..Default::default()
            };
            let mut generator = PrimaryGenerator::new(ElectronSource::new(config));
            let mut gun = RecordingGun::default();
            let mut rng = StdRng::seed_from_u64(7);

            let err = generator.generate_primaries(&mut gun, &mut rng).unwrap_err();
            assert!(matches!(err, SourceError::NotImplemented(_)));
            assert_eq!(gun.vertices, 0);
            assert!(gun.position.is_none());
            assert!(gun.energy.is_none());
        }
    }

    #[test]
    fn test_sampling_failure_leaves_the_gun_untouched() {
        // File-driven pitch angles with no replay sequence attached.
        let config = SourceConfig {
            pitch_angle_dist: PitchAngleDist::FromFile,
            ..Default::default()
        };
        let mut generator = PrimaryGenerator::new(ElectronSource::new(config));
        let mut gun = RecordingGun::default();
        let mut rng = StdRng::seed_from_u64(7);

        let err = generator.generate_primaries(&mut gun, &mut rng).unwrap_err();
        assert!(matches!(err, SourceError::MissingReplay { .. }));
        assert_eq!(gun.vertices, 0);
        assert!(gun.direction.is_none());
    }
}
