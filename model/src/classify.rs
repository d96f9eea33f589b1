use std::collections::BTreeMap;
use std::fmt;

use abstutil::Counter;
use anyhow::Result;
use geom::Distance;
use serde::{Deserialize, Serialize};

use crate::{Model, PedestrianID};

/// Pedestrians moving a net distance under this are static.
const MOVEMENT_THRESHOLD: f64 = 2.0;

/// Six kinds of trajectory: was the pedestrian moving, and if anybody
/// interacted with them, were those pedestrians moving?
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    StaticAlone,
    StaticWithStatic,
    StaticWithDynamic,
    DynamicAlone,
    DynamicWithStatic,
    DynamicWithDynamic,
}

impl Category {
    pub fn all() -> Vec<Category> {
        vec![
            Category::StaticAlone,
            Category::StaticWithStatic,
            Category::StaticWithDynamic,
            Category::DynamicAlone,
            Category::DynamicWithStatic,
            Category::DynamicWithDynamic,
        ]
    }

    /// The numeric label, 1-6, used for export directories.
    pub fn label(self) -> usize {
        match self {
            Category::StaticAlone => 1,
            Category::StaticWithStatic => 2,
            Category::StaticWithDynamic => 3,
            Category::DynamicAlone => 4,
            Category::DynamicWithStatic => 5,
            Category::DynamicWithDynamic => 6,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let describe = match self {
            Category::StaticAlone => "static, no interaction",
            Category::StaticWithStatic => "static, static interaction",
            Category::StaticWithDynamic => "static, dynamic interaction",
            Category::DynamicAlone => "dynamic, no interaction",
            Category::DynamicWithStatic => "dynamic, static interaction",
            Category::DynamicWithDynamic => "dynamic, dynamic interaction",
        };
        write!(f, "{}", describe)
    }
}

/// The labels assigned so far in one analysis run. Owned by the caller;
/// build one fresh per run.
pub struct Classification {
    labels: BTreeMap<PedestrianID, Category>,
}

impl Classification {
    pub fn new() -> Self {
        Self {
            labels: BTreeMap::new(),
        }
    }

    /// Classify one pedestrian and record the label. Re-classifying the same
    /// pedestrian just overwrites. A failure here (say a single-point
    /// trajectory) records nothing, leaving other labels untouched.
    pub fn classify(&mut self, model: &Model, id: PedestrianID) -> Result<Category> {
        let total = model.total_displacement(id)?;
        let partners = model.interactions(id)?;
        let moving = total >= Distance::meters(MOVEMENT_THRESHOLD);

        let category = if partners.is_empty() {
            if moving {
                Category::DynamicAlone
            } else {
                Category::StaticAlone
            }
        } else {
            // Partner displacement is recomputed fresh, never read back from
            // labels assigned earlier in the run. The sum, not the mean: one
            // fast partner makes the whole interaction dynamic.
            let mut partner_sum = Distance::ZERO;
            for partner in &partners {
                partner_sum += model.total_displacement(*partner)?;
            }
            let dynamic_partners = partner_sum > Distance::meters(MOVEMENT_THRESHOLD);
            match (moving, dynamic_partners) {
                (false, false) => Category::StaticWithStatic,
                (false, true) => Category::StaticWithDynamic,
                (true, false) => Category::DynamicWithStatic,
                (true, true) => Category::DynamicWithDynamic,
            }
        };

        self.labels.insert(id, category);
        Ok(category)
    }

    pub fn get(&self, id: PedestrianID) -> Option<Category> {
        self.labels.get(&id).copied()
    }

    pub fn labels(&self) -> &BTreeMap<PedestrianID, Category> {
        &self.labels
    }

    /// Aggregate the labels per category. Derived state; recompute whenever.
    pub fn summary(&self) -> ClassificationSummary {
        let mut counts = Counter::new();
        let mut by_category: BTreeMap<Category, Vec<PedestrianID>> = Category::all()
            .into_iter()
            .map(|c| (c, Vec::new()))
            .collect();
        for (id, category) in &self.labels {
            counts.inc(*category);
            by_category.get_mut(category).unwrap().push(*id);
        }
        ClassificationSummary {
            counts,
            by_category,
        }
    }
}

pub struct ClassificationSummary {
    pub counts: Counter<Category>,
    /// Always has an entry for all six categories, possibly empty.
    pub by_category: BTreeMap<Category, Vec<PedestrianID>>,
}
