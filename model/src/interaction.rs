use anyhow::Result;
use geom::Distance;

use crate::{Model, PedestrianID};

impl Model {
    /// All other pedestrians interacting with this one: anybody observed
    /// during the trajectory's frame range whose average distance to it stays
    /// within the threshold. The average only covers frames where both
    /// pedestrians were observed; candidates sharing a frame range but no
    /// exact frame don't count.
    pub fn interactions(&self, id: PedestrianID) -> Result<Vec<PedestrianID>> {
        let ped = self.pedestrian(id)?;
        let min_frame = ped.trajectory.start_frame();
        let max_frame = ped.trajectory.end_frame();
        let threshold = Distance::meters(2.0);

        let mut results = Vec::new();
        for other in &self.pedestrians {
            if other.id == id {
                continue;
            }
            // Any single record in range counts as temporal overlap
            if !other
                .trajectory
                .points()
                .iter()
                .any(|(_, f)| *f >= min_frame && *f <= max_frame)
            {
                continue;
            }

            let mut sum = Distance::ZERO;
            let mut matched = 0;
            for (pt, frame) in ped.trajectory.points() {
                if let Some(other_pt) = other.trajectory.at_frame(*frame) {
                    sum += pt.dist_to(other_pt);
                    matched += 1;
                }
            }
            if matched == 0 {
                continue;
            }
            if sum / (matched as f64) <= threshold {
                results.push(other.id);
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Model;

    #[test]
    fn no_other_pedestrians() {
        let model = Model::load_records("0 1 0.0 0.0\n1 1 1.0 0.0\n".as_bytes(), "test").unwrap();
        assert!(model.interactions(PedestrianID(0)).unwrap().is_empty());
    }

    #[test]
    fn disjoint_frame_ranges_never_interact() {
        let input = "0 1 0.0 0.0\n\
                     1 1 1.0 0.0\n\
                     5 2 0.0 0.0\n\
                     6 2 1.0 0.0\n";
        let model = Model::load_records(input.as_bytes(), "test").unwrap();
        assert!(model.interactions(PedestrianID(0)).unwrap().is_empty());
        assert!(model.interactions(PedestrianID(1)).unwrap().is_empty());
    }

    #[test]
    fn close_neighbors_interact_and_far_ones_dont() {
        let input = "0 1 0.0 0.0\n\
                     1 1 1.0 0.0\n\
                     0 2 0.0 1.0\n\
                     1 2 1.0 1.0\n\
                     0 3 50.0 50.0\n\
                     1 3 51.0 50.0\n";
        let model = Model::load_records(input.as_bytes(), "test").unwrap();
        let found = model.interactions(PedestrianID(0)).unwrap();
        assert_eq!(found, vec![PedestrianID(1)]);
        // Never contains the pedestrian itself
        assert!(!found.contains(&PedestrianID(0)));
    }

    #[test]
    fn average_distance_exactly_at_the_threshold_counts() {
        let input = "0 1 0.0 0.0\n\
                     1 1 1.0 0.0\n\
                     0 2 0.0 2.0\n\
                     1 2 1.0 2.0\n";
        let model = Model::load_records(input.as_bytes(), "test").unwrap();
        assert_eq!(
            model.interactions(PedestrianID(0)).unwrap(),
            vec![PedestrianID(1)]
        );
    }

    #[test]
    fn overlapping_range_without_shared_frames_is_rejected() {
        // Pedestrian 2's single record falls inside 1's frame range, but they
        // were never observed on the same frame
        let input = "0 1 0.0 0.0\n\
                     2 1 1.0 0.0\n\
                     1 2 0.5 0.0\n";
        let model = Model::load_records(input.as_bytes(), "test").unwrap();
        assert!(model.interactions(PedestrianID(0)).unwrap().is_empty());
    }
}
