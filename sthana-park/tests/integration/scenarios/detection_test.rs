//! Drive-by detection with the default sensor rig.
//!
//! The vehicle searches along +Z at x = 0 past a lot on its right. The
//! default fan never sees a whole space in one tick, so candidates only
//! appear once the marking history holds all three bounding lines.

use crate::harness::{HarnessConfig, ParkHarness};
use sthana_park::core::{Pose, Vec3};
use sthana_park::sandbox::SandboxWorld;
use sthana_park::{AgentState, OrientationClass, VehicleMotor};

/// Ticks needed to drive past the lot.
const MAX_TICKS: usize = 400;

/// Free spaces reported by the agent, as (x, z) pairs.
fn candidate_centers(harness: &ParkHarness) -> Vec<Vec3> {
    harness
        .agent
        .candidates()
        .iter()
        .map(|candidate| candidate.center.flattened())
        .collect()
}

fn near_any(point: Vec3, centers: &[Vec3], tolerance: f32) -> bool {
    centers.iter().any(|c| point.distance(*c) < tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Only the two free rectangular spaces become candidates.
    #[test]
    fn test_drive_by_rectangular_row() {
        env_logger::try_init().ok();

        let mut world = SandboxWorld::new();
        let row = Pose::new(Vec3::new(7.3, 0.0, 20.0), 90.0);
        let centers = world.add_rectangular_row(row, 4, 2.5, 5.0, &[0, 2]);
        let mut harness = ParkHarness::new(HarnessConfig::default(), world);

        let report = harness
            .run_until(MAX_TICKS, |r| r.state == AgentState::Parking)
            .expect("a space is found while driving past");
        assert_relative_eq!(report.cumulative_reward, 0.2, epsilon = 1e-6);
        assert!(harness.agent.vehicle().pose().position.z < 20.0);

        let nearest = harness.agent.nearest_goal().unwrap().flattened();
        assert!(near_any(nearest, &[centers[1], centers[3]], 1.0));

        // Keep driving until the whole row has been swept
        while harness.agent.vehicle().pose().position.z < 35.0 && harness.ticks() < MAX_TICKS {
            harness.step(None);
        }

        let found = candidate_centers(&harness);
        assert_eq!(found.len(), 2);
        for center in &found {
            assert!(near_any(*center, &[centers[1], centers[3]], 1.0));
            assert!(!near_any(*center, &[centers[0], centers[2]], 1.0));
        }
        let candidates = harness.agent.candidates();
        assert!(
            candidates
                .iter()
                .all(|c| c.orientation == OrientationClass::Rectangular)
        );

        // One goal per space, each with its highlight
        assert_eq!(harness.agent.placed_goals().live_count(), 2);
        assert_eq!(harness.agent.state(), AgentState::Parking);
    }

    /// Angled spaces are found at their centers; the occupied one is skipped.
    #[test]
    fn test_drive_by_angled_row() {
        let mut world = SandboxWorld::new();
        let centers = world.add_angled_row(Vec3::new(7.5, 0.0, 10.0), 3, 4.0, &[1]);
        let mut harness = ParkHarness::new(HarnessConfig::default(), world);

        while harness.agent.vehicle().pose().position.z < 30.0 && harness.ticks() < MAX_TICKS {
            harness.step(None);
        }

        let found = candidate_centers(&harness);
        assert_eq!(found.len(), 2);
        assert!(near_any(found[0], &[centers[0], centers[2]], 0.05));
        assert!(near_any(found[1], &[centers[0], centers[2]], 0.05));
        assert!(!near_any(found[0], &[centers[1]], 1.0));
        assert!(!near_any(found[1], &[centers[1]], 1.0));
        let candidates = harness.agent.candidates();
        assert!(
            candidates
                .iter()
                .all(|c| c.orientation == OrientationClass::Angled)
        );

        // Angled goals are rotated to the space heading
        for goal in harness.agent.placed_goals().live() {
            assert_relative_eq!(goal.yaw, 45.0);
        }
    }

    /// Markings seen on several ticks are recorded once.
    #[test]
    fn test_markings_recorded_once() {
        let mut world = SandboxWorld::new();
        world.add_line(Vec3::new(8.0, 0.0, 0.0), 90.0, 5.0);
        world.add_line(Vec3::new(8.0, 0.0, 2.5), 90.0, 5.0);
        let start = Pose::new(Vec3::new(0.0, 0.5, 0.0), 0.0);
        let mut harness = ParkHarness::new(HarnessConfig::dense_fan().stationary(start), world);

        let first = harness.step(None);
        assert_eq!(first.new_markings, 2);
        for _ in 0..5 {
            let report = harness.step(None);
            assert_eq!(report.new_markings, 0);
            assert_eq!(report.new_candidates, 0);
        }
        // Two parallel lines never bound a space
        assert_eq!(harness.agent.markings().len(), 2);
        assert!(harness.agent.candidates().is_empty());
        assert_eq!(harness.agent.state(), AgentState::SearchingForParking);
    }
}
