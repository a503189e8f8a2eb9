//! Ambient geomagnetic field models.
//!
//! The transport engine integrates charged-particle trajectories through the
//! field returned by [`FieldModel::field_at`], querying it at every stepper
//! substep. Implementations must therefore be pure and cheap.
//!
//! The reference model is a dipole approximation evaluated on the field line
//! above a fixed high-latitude observation site:
//!
//! $$
//! B_z(z) = -\frac{m}{z^3}\sqrt{1 + 3\sin^2\lambda},
//! \qquad z = R_p + z_{\text{local}} + \tfrac{L}{2}
//! $$
//!
//! where $m$ is the dipole moment, $\lambda$ the geomagnetic latitude, $R_p$
//! the planetary radius, and $L$ the vertical span of the simulation volume
//! (local coordinates place $z_{\text{local}} = 0$ at the volume centre).

use serde::{Deserialize, Serialize};

/// A spacetime query point: Cartesian position (km) plus time (s).
///
/// Mirrors the 4-vector handed over by the engine's stepper. All current
/// models are static and ignore `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceTime {
    /// Position in local Cartesian coordinates (km).
    pub position: [f64; 3],
    /// Simulation time (s).
    pub t: f64,
}

impl SpaceTime {
    /// A query point at the given position and time zero.
    pub fn at(x_km: f64, y_km: f64, z_km: f64) -> Self {
        Self {
            position: [x_km, y_km, z_km],
            t: 0.0,
        }
    }
}

/// Combined electromagnetic field at a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldVector {
    /// Magnetic field (tesla).
    pub b: [f64; 3],
    /// Electric field (V/m).
    pub e: [f64; 3],
}

impl FieldVector {
    /// Magnitude of the magnetic component (tesla).
    pub fn b_magnitude(&self) -> f64 {
        let [bx, by, bz] = self.b;
        (bx * bx + by * by + bz * bz).sqrt()
    }
}

/// The interface the transport engine's stepper drives.
///
/// Implementations are queried at arbitrary points along each trajectory,
/// potentially millions of times per run, and must be side-effect free.
pub trait FieldModel {
    /// Evaluate the ambient field at a spacetime point.
    fn field_at(&self, point: &SpaceTime) -> FieldVector;

    /// Human-readable name of the field model.
    fn model_name(&self) -> &str;
}

/// Dipole approximation of Earth's magnetic field above an auroral site.
///
/// All parameters are fixed at construction; the default configuration
/// matches the Poker Flat reference geometry used throughout the
/// precipitation studies this crate supports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DipoleField {
    /// Dipole moment (T·km³).
    pub dipole_moment: f64,
    /// Geomagnetic latitude of the observation site (degrees).
    pub geomag_latitude_deg: f64,
    /// Planetary radius (km).
    pub planet_radius_km: f64,
    /// Vertical span of the simulation volume (km). Half of it offsets the
    /// local z = 0 plane, which sits at the volume centre.
    pub vertical_span_km: f64,
}

impl Default for DipoleField {
    fn default() -> Self {
        Self {
            dipole_moment: 8.0e6,
            geomag_latitude_deg: 70.0,
            planet_radius_km: 6371.0,
            vertical_span_km: 1020.0,
        }
    }
}

impl DipoleField {
    /// Radial distance (km) from the planet centre for a local z coordinate.
    fn radial_distance_km(&self, z_local_km: f64) -> f64 {
        self.planet_radius_km + z_local_km + self.vertical_span_km / 2.0
    }
}

impl FieldModel for DipoleField {
    /// Evaluate the dipole field.
    ///
    /// The field is vertical in local coordinates: only `b[2]` is nonzero,
    /// and the electric field is identically zero. The evaluation is total
    /// but singular where the radial distance vanishes; a query on that
    /// shell returns non-finite components, so callers must keep the
    /// simulation volume away from the planet centre.
    fn field_at(&self, point: &SpaceTime) -> FieldVector {
        let lat = self.geomag_latitude_deg.to_radians();
        let z = self.radial_distance_km(point.position[2]);

        let bz = -self.dipole_moment / z.powi(3) * (1.0 + 3.0 * lat.sin().powi(2)).sqrt();

        FieldVector {
            b: [0.0, 0.0, bz],
            e: [0.0, 0.0, 0.0],
        }
    }

    fn model_name(&self) -> &str {
        "dipole"
    }
}
