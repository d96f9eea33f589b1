use anyhow::Result;
use geom::{Distance, Pt2D};
use serde::{Deserialize, Serialize};

use crate::Frame;

/// The ordered positions of one pedestrian, one per frame it was observed.
#[derive(Clone, Serialize, Deserialize)]
pub struct Trajectory {
    inner: Vec<(Pt2D, Frame)>,
}

impl Trajectory {
    /// Single-point trajectories are allowed here; the operations that need
    /// at least 2 points check for themselves.
    pub fn new(raw: Vec<(Pt2D, Frame)>) -> Result<Self> {
        for pair in raw.windows(2) {
            if pair[0].1 > pair[1].1 {
                bail!(
                    "Trajectory input out-of-order: frame {} then {}",
                    (pair[0].1).0,
                    (pair[1].1).0
                );
            }
        }
        if raw.is_empty() {
            bail!("Trajectory has no points");
        }
        Ok(Self { inner: raw })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn points(&self) -> &[(Pt2D, Frame)] {
        &self.inner
    }

    pub fn start_frame(&self) -> Frame {
        self.inner[0].1
    }

    pub fn end_frame(&self) -> Frame {
        self.inner.last().unwrap().1
    }

    pub fn first_pt(&self) -> Pt2D {
        self.inner[0].0
    }

    pub fn last_pt(&self) -> Pt2D {
        self.inner.last().unwrap().0
    }

    /// The position at an exact frame, if the pedestrian was observed then.
    pub fn at_frame(&self, frame: Frame) -> Option<Pt2D> {
        self.inner
            .binary_search_by_key(&frame, |(_, f)| *f)
            .ok()
            .map(|idx| self.inner[idx].0)
    }

    /// Straight-line distance between the first and last points. Net
    /// movement, not path length.
    pub fn total_displacement(&self) -> Result<Distance> {
        if self.inner.len() < 2 {
            bail!(
                "total_displacement needs at least 2 points, got {}",
                self.inner.len()
            );
        }
        Ok(self.first_pt().dist_to(self.last_pt()))
    }

    pub(crate) fn map_points<F: Fn(Pt2D) -> Pt2D>(&self, f: F) -> Trajectory {
        Trajectory {
            inner: self
                .inner
                .iter()
                .map(|(pt, frame)| (f(*pt), *frame))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traj(pts: Vec<(f64, f64)>) -> Trajectory {
        Trajectory::new(
            pts.into_iter()
                .enumerate()
                .map(|(i, (x, y))| (Pt2D::new(x, y), Frame(i as i64)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_out_of_order_frames() {
        assert!(Trajectory::new(vec![
            (Pt2D::new(0.0, 0.0), Frame(3)),
            (Pt2D::new(1.0, 0.0), Frame(1)),
        ])
        .is_err());
        assert!(Trajectory::new(Vec::new()).is_err());
    }

    #[test]
    fn displacement_is_net_movement() {
        // A loop that comes back near the start has a small displacement no
        // matter how long the path is
        let t = traj(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 1.0)]);
        assert_eq!(t.total_displacement().unwrap().inner_meters(), 1.0);

        let single = Trajectory::new(vec![(Pt2D::new(2.0, 2.0), Frame(0))]).unwrap();
        assert!(single.total_displacement().is_err());
    }

    #[test]
    fn displacement_symmetric_under_reversal() {
        let forwards = traj(vec![(1.0, 2.0), (4.0, 6.0), (7.0, 3.0)]);
        let backwards = traj(vec![(7.0, 3.0), (4.0, 6.0), (1.0, 2.0)]);
        assert_eq!(
            forwards.total_displacement().unwrap(),
            backwards.total_displacement().unwrap()
        );
    }

    #[test]
    fn lookup_by_frame() {
        let t = Trajectory::new(vec![
            (Pt2D::new(0.0, 0.0), Frame(10)),
            (Pt2D::new(1.0, 0.0), Frame(12)),
        ])
        .unwrap();
        assert_eq!(t.at_frame(Frame(12)), Some(Pt2D::new(1.0, 0.0)));
        assert_eq!(t.at_frame(Frame(11)), None);
    }
}
