use anyhow::Result;
use geom::{Distance, Pt2D};
use serde::{Deserialize, Serialize};

use crate::{Model, PedestrianID, Trajectory};

/// The transform mapping one trajectory into its canonical frame: the first
/// point lands on (0, 0) and the first observed movement points up the +y
/// axis. The same transform can be applied to other trajectories so a whole
/// group shares one reference frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Normalization {
    shift: (f64, f64),
    rotation: Option<Rotation>,
}

/// A 2x2 rotation matrix, stored as the cos/sin pair.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct Rotation {
    cos: f64,
    sin: f64,
}

impl Rotation {
    fn apply(self, pt: Pt2D) -> Pt2D {
        Pt2D::new(
            self.cos * pt.x() - self.sin * pt.y(),
            self.sin * pt.x() + self.cos * pt.y(),
        )
    }
}

impl Normalization {
    pub fn for_trajectory(traj: &Trajectory) -> Result<Self> {
        if traj.len() < 2 {
            bail!(
                "can't normalize a trajectory with only {} point(s)",
                traj.len()
            );
        }
        let first = traj.first_pt();
        let shift = (first.x(), first.y());
        let pts = traj.points();
        let rel = |pt: Pt2D| (pt.x() - shift.0, pt.y() - shift.1);

        // Walk forwards until the pedestrian has moved away from its starting
        // point. The last index is deliberately never inspected; a trajectory
        // whose only movement happens at the final frame counts as stationary.
        let mut k = 1;
        while k < pts.len() - 1 {
            let (x, y) = rel(pts[k].0);
            if x != 0.0 || y != 0.0 {
                break;
            }
            k += 1;
        }

        let rotation = if k < pts.len() - 1 {
            let (x, y) = rel(pts[k].0);
            let norm = (x * x + y * y).sqrt();
            // The clamp only matters when floating-point drift pushes the
            // ratio a hair outside acos's domain
            let mut theta = (y / norm).clamp(-1.0, 1.0).acos();
            if x < 0.0 {
                theta = -theta;
            }
            Some(Rotation {
                cos: theta.cos(),
                sin: theta.sin(),
            })
        } else {
            None
        };

        Ok(Self { shift, rotation })
    }

    /// Shift, then rotate. For the trajectory this normalization was derived
    /// from, the first output point is exactly (0, 0).
    pub fn apply(&self, traj: &Trajectory) -> Trajectory {
        traj.map_points(|pt| {
            let shifted = Pt2D::new(pt.x() - self.shift.0, pt.y() - self.shift.1);
            match self.rotation {
                Some(rot) => rot.apply(shifted),
                None => shifted,
            }
        })
    }
}

impl Model {
    /// The canonical-frame trajectory of one pedestrian, along with every
    /// interacting trajectory mapped by the identical shift and rotation, so
    /// the whole group shares the focus pedestrian's reference frame.
    pub fn canonicalize(
        &self,
        id: PedestrianID,
    ) -> Result<(Trajectory, Vec<(PedestrianID, Trajectory)>)> {
        let ped = self.pedestrian(id)?;
        let normalization = Normalization::for_trajectory(&ped.trajectory)?;
        let focus = normalization.apply(&ped.trajectory);

        let mut partners = Vec::new();
        for other in self.interactions(id)? {
            let traj = &self.pedestrians[other.0].trajectory;
            partners.push((other, normalization.apply(traj)));
        }
        Ok((focus, partners))
    }

    /// Net displacement of the canonical-frame trajectory.
    pub fn total_displacement(&self, id: PedestrianID) -> Result<Distance> {
        let ped = self.pedestrian(id)?;
        let normalization = Normalization::for_trajectory(&ped.trajectory)?;
        normalization.apply(&ped.trajectory).total_displacement()
    }
}
