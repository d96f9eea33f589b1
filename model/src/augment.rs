use anyhow::Result;
use geom::Pt2D;
use rand::Rng;

use crate::{Model, Normalization, Pedestrian, PedestrianID, PedestrianName, Trajectory};

impl Model {
    /// Grow the dataset by cloning one pedestrian's canonical trajectory
    /// under a fresh id, jittering every point after the first by up to 0.1
    /// units. Returns the new pedestrian's id.
    pub fn augment<R: Rng>(&mut self, id: PedestrianID, rng: &mut R) -> Result<PedestrianID> {
        let ped = self.pedestrian(id)?;
        let normalization = Normalization::for_trajectory(&ped.trajectory)?;
        let canonical = normalization.apply(&ped.trajectory);

        // Raw ids are sorted ascending, so one past the largest stays sorted
        let new_name = PedestrianName(self.pedestrians.last().unwrap().original_id.0 + 1);

        let mut points = Vec::new();
        for (idx, (pt, frame)) in canonical.points().iter().enumerate() {
            let pt = if idx == 0 {
                *pt
            } else {
                Pt2D::new(
                    pt.x() + rng.gen_range(0.0..0.1),
                    pt.y() + rng.gen_range(0.0..0.1),
                )
            };
            self.bounds.update(pt);
            points.push((pt, *frame));
        }

        let new_id = PedestrianID(self.pedestrians.len());
        self.pedestrians.push(Pedestrian {
            id: new_id,
            original_id: new_name,
            trajectory: Trajectory::new(points)?,
        });
        Ok(new_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn augmented_copy_gets_a_fresh_id() {
        let input = "0 3 1.0 1.0\n\
                     1 3 1.0 2.0\n\
                     2 3 1.0 3.0\n\
                     0 9 50.0 50.0\n\
                     1 9 50.0 50.0\n";
        let mut model = Model::load_records(input.as_bytes(), "test").unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let new_id = model.augment(PedestrianID(0), &mut rng).unwrap();
        assert_eq!(model.trajectory_count(), 3);
        assert_eq!(
            model.pedestrian(new_id).unwrap().original_id,
            PedestrianName(10)
        );

        let new_traj = &model.pedestrian(new_id).unwrap().trajectory;
        let canonical = {
            let original = &model.pedestrian(PedestrianID(0)).unwrap().trajectory;
            Normalization::for_trajectory(original)
                .unwrap()
                .apply(original)
        };

        // Same frames, same start, and every later point within the jitter
        assert_eq!(new_traj.len(), canonical.len());
        assert_eq!(new_traj.first_pt().x(), 0.0);
        assert_eq!(new_traj.first_pt().y(), 0.0);
        for ((new_pt, new_frame), (orig_pt, orig_frame)) in
            new_traj.points().iter().zip(canonical.points())
        {
            assert_eq!(new_frame, orig_frame);
            assert!((new_pt.x() - orig_pt.x()).abs() < 0.101);
            assert!((new_pt.y() - orig_pt.y()).abs() < 0.101);
        }
    }
}
