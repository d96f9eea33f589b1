use anyhow::Result;

use crate::{Category, Classification, Model, PedestrianID, Record, Trajectory};

/// Where classified trajectory groups get persisted. The library only
/// formats rows; implementations decide where they land (one file per group,
/// a database, a test buffer).
pub trait ExportSink {
    fn write_group(
        &mut self,
        category: Category,
        dataset: &str,
        id: PedestrianID,
        rows: &[Record],
    ) -> Result<()>;
}

/// One row per record: frame and id as integers, coordinates as fixed
/// 8-decimal floats, single-space separated.
pub fn format_rows(rows: &[Record]) -> Result<String> {
    let mut out = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .from_writer(&mut out);
        for row in rows {
            writer.write_record(&[
                row.frame.0.to_string(),
                row.name.0.to_string(),
                format!("{:.8}", row.pos.x()),
                format!("{:.8}", row.pos.y()),
            ])?;
        }
        writer.flush()?;
    }
    let out = String::from_utf8(out)?;
    Ok(out)
}

/// Write every classified trajectory through the sink, grouped by category.
pub fn export_classified(
    model: &Model,
    classification: &Classification,
    sink: &mut dyn ExportSink,
) -> Result<()> {
    let summary = classification.summary();
    for (category, ids) in &summary.by_category {
        for id in ids {
            let rows = model.export_rows(*id)?;
            sink.write_group(*category, &model.dataset_name, *id, &rows)?;
        }
    }
    Ok(())
}

impl Model {
    /// The canonical trajectory of one pedestrian followed by all of its
    /// interacting trajectories, in the shared reference frame.
    pub fn export_rows(&self, id: PedestrianID) -> Result<Vec<Record>> {
        let (focus, partners) = self.canonicalize(id)?;
        let name = self.pedestrian(id)?.original_id;

        let mut rows = Vec::new();
        for (pt, frame) in focus.points() {
            rows.push(Record {
                frame: *frame,
                name,
                pos: *pt,
            });
        }
        for (other, traj) in &partners {
            let other_name = self.pedestrians[other.0].original_id;
            for (pt, frame) in traj.points() {
                rows.push(Record {
                    frame: *frame,
                    name: other_name,
                    pos: *pt,
                });
            }
        }
        Ok(rows)
    }

    /// The same canonical group as a GeoJSON feature collection, for
    /// visualization collaborators.
    pub fn export_to_geojson(&self, id: PedestrianID) -> Result<String> {
        use geojson::{Feature, FeatureCollection, GeoJson};

        let (focus, partners) = self.canonicalize(id)?;
        let mut features = Vec::new();

        let mut feature = Feature {
            bbox: None,
            geometry: Some(linestring(&focus)),
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property("role", "focus");
        feature.set_property("id", self.pedestrian(id)?.original_id.0);
        features.push(feature);

        for (other, traj) in &partners {
            let mut feature = Feature {
                bbox: None,
                geometry: Some(linestring(traj)),
                id: None,
                properties: None,
                foreign_members: None,
            };
            feature.set_property("role", "partner");
            feature.set_property("id", self.pedestrians[other.0].original_id.0);
            features.push(feature);
        }

        let gj = GeoJson::FeatureCollection(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        });
        Ok(gj.to_string())
    }
}

fn linestring(traj: &Trajectory) -> geojson::Geometry {
    geojson::Geometry::new(geojson::Value::LineString(
        traj.points()
            .iter()
            .map(|(pt, _)| vec![pt.x(), pt.y()])
            .collect(),
    ))
}
