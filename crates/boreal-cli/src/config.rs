//! TOML configuration deserialisation for source-generation jobs.

use serde::Deserialize;

use boreal_core::distributions::{EnergyDist, InvalidModeError, PitchAngleDist, SourceKind};
use boreal_core::sequence::{ENERGY_FILE, PITCH_ANGLE_FILE};
use boreal_core::source::SourceConfig;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub source: SourceSection,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The `[source]` table.
#[derive(Debug, Deserialize)]
pub struct SourceSection {
    /// Source kind, by name ("electron") or legacy mode number (0).
    #[serde(default = "default_kind")]
    pub kind: KindSpec,
    #[serde(default = "default_altitude_km")]
    pub altitude_km: f64,
    #[serde(default = "default_disk_radius_km")]
    pub disk_radius_km: f64,
    #[serde(default = "default_tilt_deg")]
    pub tilt_deg: f64,
    pub energy: EnergySection,
    pub pitch_angle: PitchAngleSection,
}

fn default_kind() -> KindSpec {
    KindSpec::Named(SourceKind::Electron)
}
fn default_altitude_km() -> f64 {
    500.0
}
fn default_disk_radius_km() -> f64 {
    0.01
}
fn default_tilt_deg() -> f64 {
    12.682
}

/// The `[source.energy]` table.
#[derive(Debug, Deserialize)]
pub struct EnergySection {
    pub distribution: EnergySpec,
    #[serde(default = "default_e0_kev")]
    pub e0_kev: f64,
    /// Replay file for the file-driven distribution.
    #[serde(default = "default_energy_file")]
    pub file: String,
}

fn default_e0_kev() -> f64 {
    100.0
}
fn default_energy_file() -> String {
    ENERGY_FILE.into()
}

/// The `[source.pitch_angle]` table.
#[derive(Debug, Deserialize)]
pub struct PitchAngleSection {
    pub distribution: PitchAngleSpec,
    #[serde(default = "default_max_deg")]
    pub max_deg: f64,
    /// Replay file for the file-driven distribution.
    #[serde(default = "default_pitch_angle_file")]
    pub file: String,
}

fn default_max_deg() -> f64 {
    40.0
}
fn default_pitch_angle_file() -> String {
    PITCH_ANGLE_FILE.into()
}

/// Source kind: either a name or a legacy integer mode flag.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum KindSpec {
    Named(SourceKind),
    Mode(u8),
}

impl KindSpec {
    pub fn resolve(&self) -> Result<SourceKind, InvalidModeError> {
        match self {
            Self::Named(kind) => Ok(*kind),
            Self::Mode(mode) => SourceKind::try_from(*mode),
        }
    }
}

/// Energy distribution: either a name or a legacy integer mode flag.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EnergySpec {
    Named(EnergyDist),
    Mode(u8),
}

impl EnergySpec {
    pub fn resolve(&self) -> Result<EnergyDist, InvalidModeError> {
        match self {
            Self::Named(dist) => Ok(*dist),
            Self::Mode(mode) => EnergyDist::try_from(*mode),
        }
    }
}

/// Pitch-angle distribution: either a name or a legacy integer mode flag.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PitchAngleSpec {
    Named(PitchAngleDist),
    Mode(u8),
}

impl PitchAngleSpec {
    pub fn resolve(&self) -> Result<PitchAngleDist, InvalidModeError> {
        match self {
            Self::Named(dist) => Ok(*dist),
            Self::Mode(mode) => PitchAngleDist::try_from(*mode),
        }
    }
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save samples as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_csv: bool,
    /// Whether to also save samples as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_csv: true,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

impl JobConfig {
    /// Resolve the TOML surface into the core source configuration.
    pub fn source_config(&self) -> Result<SourceConfig, InvalidModeError> {
        Ok(SourceConfig {
            kind: self.source.kind.resolve()?,
            energy_dist: self.source.energy.distribution.resolve()?,
            e0_kev: self.source.energy.e0_kev,
            pitch_angle_dist: self.source.pitch_angle.distribution.resolve()?,
            max_pitch_angle_deg: self.source.pitch_angle.max_deg,
            injection_altitude_km: self.source.altitude_km,
            disk_radius_km: self.source.disk_radius_km,
            tilt_angle_deg: self.source.tilt_deg,
        })
    }
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: JobConfig = toml::from_str(&content)?;
    Ok(config)
}
