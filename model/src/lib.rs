#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod augment;
mod canonical;
mod classify;
mod export;
mod interaction;
mod records;
mod replay;
mod trajectory;

use std::collections::BTreeMap;

use abstutil::prettyprint_usize;
use anyhow::Result;
use geom::{Bounds, Pt2D};
use serde::{Deserialize, Serialize};

pub use self::canonical::Normalization;
pub use self::classify::{Category, Classification, ClassificationSummary};
pub use self::export::{export_classified, format_rows, ExportSink};
pub use self::replay::{Replay, ReplaySnapshot};
pub use self::trajectory::Trajectory;

/// A frame number from the source dataset. Frames are just ordered integers;
/// nothing assumes a fixed sampling rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Frame(pub i64);

/// The pedestrian id as it appears in the input file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PedestrianName(pub i64);

/// Dense index into `Model::pedestrians`, assigned in ascending
/// `PedestrianName` order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PedestrianID(pub usize);

/// One input row: where one pedestrian was at one frame.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Record {
    pub frame: Frame,
    pub name: PedestrianName,
    pub pos: Pt2D,
}

#[derive(Serialize, Deserialize)]
pub struct Model {
    pub dataset_name: String,
    pub bounds: Bounds,
    pub pedestrians: Vec<Pedestrian>,
}

#[derive(Serialize, Deserialize)]
pub struct Pedestrian {
    pub id: PedestrianID,
    pub original_id: PedestrianName,
    pub trajectory: Trajectory,
}

impl Model {
    /// Build a model from raw `frame id x y` records. Records must already be
    /// ordered by frame within each pedestrian; we never re-sort.
    pub fn load_records<R: std::io::Read>(reader: R, dataset_name: &str) -> Result<Self> {
        let records = records::load(reader)?;

        let mut bounds = Bounds::new();
        let mut per_pedestrian: BTreeMap<PedestrianName, Vec<(Pt2D, Frame)>> = BTreeMap::new();
        for rec in &records {
            bounds.update(rec.pos);
            per_pedestrian
                .entry(rec.name)
                .or_insert_with(Vec::new)
                .push((rec.pos, rec.frame));
        }

        let mut pedestrians = Vec::new();
        for (original_id, points) in per_pedestrian {
            pedestrians.push(Pedestrian {
                id: PedestrianID(pedestrians.len()),
                original_id,
                trajectory: Trajectory::new(points)?,
            });
        }
        info!(
            "{}: {} records for {} pedestrians",
            dataset_name,
            prettyprint_usize(records.len()),
            prettyprint_usize(pedestrians.len())
        );

        Ok(Self {
            dataset_name: dataset_name.to_string(),
            bounds,
            pedestrians,
        })
    }

    pub fn trajectory_count(&self) -> usize {
        self.pedestrians.len()
    }

    pub fn pedestrian(&self, id: PedestrianID) -> Result<&Pedestrian> {
        if id.0 >= self.pedestrians.len() {
            bail!(
                "{:?} out of range; the model only has {} trajectories",
                id,
                self.pedestrians.len()
            );
        }
        Ok(&self.pedestrians[id.0])
    }

    /// Ordered records for a raw id. Empty when the id never appears in the
    /// dataset.
    pub fn records_for(&self, name: PedestrianName) -> &[(Pt2D, Frame)] {
        match self
            .pedestrians
            .binary_search_by_key(&name, |p| p.original_id)
        {
            Ok(idx) => self.pedestrians[idx].trajectory.points(),
            Err(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_index() {
        let input = "0 5 1.0 2.0\n1 5 1.5 2.0\n0 3 4.0 4.0\n1 3 4.0 5.0\n";
        let model = Model::load_records(input.as_bytes(), "test").unwrap();

        assert_eq!(model.trajectory_count(), 2);
        // Ids are assigned in ascending order of the raw id
        assert_eq!(model.pedestrians[0].original_id, PedestrianName(3));
        assert_eq!(model.pedestrians[1].original_id, PedestrianName(5));

        let ped = model.pedestrian(PedestrianID(1)).unwrap();
        assert_eq!(ped.trajectory.len(), 2);
        assert!(model.pedestrian(PedestrianID(2)).is_err());

        assert_eq!(model.records_for(PedestrianName(5)).len(), 2);
        assert!(model.records_for(PedestrianName(99)).is_empty());
    }

    #[test]
    fn malformed_input() {
        assert!(Model::load_records("0 1 2.0".as_bytes(), "test").is_err());
        assert!(Model::load_records("0 1 2.0 nope".as_bytes(), "test").is_err());
        assert!(Model::load_records("0 1.5 2.0 3.0".as_bytes(), "test").is_err());
        assert!(Model::load_records("0 1 inf 3.0".as_bytes(), "test").is_err());
        // Frames out of order within one pedestrian
        assert!(Model::load_records("5 1 0.0 0.0\n2 1 1.0 1.0".as_bytes(), "test").is_err());
    }
}
