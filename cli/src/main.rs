#[macro_use]
extern crate log;

use std::path::Path;

use abstutil::{prettyprint_usize, Timer};
use anyhow::Result;
use structopt::StructOpt;

use model::{
    export_classified, format_rows, Category, Classification, ExportSink, Model, PedestrianID,
    Record,
};

/// Classify every pedestrian trajectory in some datasets and write the
/// results out grouped by category.
#[derive(StructOpt)]
struct Args {
    /// Paths to dataset files, one `frame id x y` record per line
    #[structopt(required = true)]
    datasets: Vec<String>,
    /// Directory for the per-category exports
    #[structopt(long, default_value = "new_data")]
    out_dir: String,
    /// Also write a GeoJSON file per classified trajectory
    #[structopt(long)]
    geojson: bool,
}

fn main() -> Result<()> {
    abstutil::logger::setup();
    let args = Args::from_args();
    let mut timer = Timer::new("classify trajectories");

    for path in &args.datasets {
        let name = dataset_name(path);

        timer.start(format!("load {}", name));
        let model = Model::load_records(fs_err::File::open(path)?, &name)?;
        timer.stop(format!("load {}", name));

        let mut classification = Classification::new();
        timer.start_iter(format!("classify {}", name), model.trajectory_count());
        for i in 0..model.trajectory_count() {
            timer.next();
            let id = PedestrianID(i);
            // One bad trajectory shouldn't sink the whole dataset
            if let Err(err) = classification.classify(&model, id) {
                warn!("Skipping {:?}: {}", id, err);
            }
        }

        let summary = classification.summary();
        for category in Category::all() {
            info!(
                "{}: {} trajectories of type {} ({})",
                name,
                prettyprint_usize(summary.counts.get(category)),
                category.label(),
                category
            );
        }

        timer.start(format!("export {}", name));
        let mut sink = FileSink {
            out_dir: args.out_dir.clone(),
        };
        export_classified(&model, &classification, &mut sink)?;

        if args.geojson {
            let dir = format!("{}/geojson", args.out_dir);
            fs_err::create_dir_all(&dir)?;
            for ids in summary.by_category.values() {
                for id in ids {
                    fs_err::write(
                        format!("{}/{}_{}.geojson", dir, name, id.0),
                        model.export_to_geojson(*id)?,
                    )?;
                }
            }
        }
        timer.stop(format!("export {}", name));
    }

    Ok(())
}

fn dataset_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|x| x.to_str())
        .unwrap_or("dataset")
        .to_string()
}

/// One file per classified trajectory, in a directory per numeric label.
struct FileSink {
    out_dir: String,
}

impl ExportSink for FileSink {
    fn write_group(
        &mut self,
        category: Category,
        dataset: &str,
        id: PedestrianID,
        rows: &[Record],
    ) -> Result<()> {
        let dir = format!("{}/{}", self.out_dir, category.label());
        fs_err::create_dir_all(&dir)?;
        fs_err::write(format!("{}/{}_{}.txt", dir, dataset, id.0), format_rows(rows)?)?;
        Ok(())
    }
}
