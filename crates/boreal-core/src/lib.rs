//! # Boreal Core
//!
//! Source-term components for Monte Carlo simulations of energetic electron
//! precipitation into the upper atmosphere. This crate supplies the two
//! pieces a general-purpose transport engine cannot provide itself: the
//! ambient geomagnetic field along the particle trajectories, and the
//! initial conditions (position, direction, energy) of each injected
//! primary electron.
//!
//! ## Architecture
//!
//! Field models implement the [`field::FieldModel`] trait, which the
//! engine's stepper queries at every integration point. The reference
//! implementation is a tilted-dipole approximation of Earth's field
//! ([`field::DipoleField`]).
//!
//! Primary generation goes through [`source::PrimaryGenerator`], which
//! draws one [`source::ParticleSample`] per event and forwards it to the
//! engine via the [`source::ParticleGun`] seam.
//!
//! ## Modules
//!
//! - [`field`] — Ambient field trait and the dipole field model.
//! - [`distributions`] — Pitch-angle and energy distribution families.
//! - [`sequence`] — Scalar replay sequences for stochastic collocation.
//! - [`source`] — Primary generator, sample type, and engine seams.

pub mod distributions;
pub mod field;
pub mod sequence;
pub mod source;
