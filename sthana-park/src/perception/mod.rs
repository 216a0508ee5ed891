//! Perception: from sphere casts to candidate parking spaces.
//!
//! - [`LineDetector`] sweeps the roof sensors and collects floor markings
//! - [`MarkingSet`] holds the bounded per-episode marking history
//! - [`SpaceClusterer`] finds marking triples that bound an empty space
//! - [`PedestrianMonitor`] scores how close the vehicle came to pedestrians

pub mod clusterer;
pub mod fan;
pub mod line_detector;
pub mod marking;
pub mod pedestrian;

pub use clusterer::{CandidateSet, CandidateSpace, OrientationClass, SpaceClusterer};
pub use fan::{FanGeometry, FanRay};
pub use line_detector::{LineDetector, SensorRig};
pub use marking::{LineMarker, MarkingSet};
pub use pedestrian::PedestrianMonitor;
