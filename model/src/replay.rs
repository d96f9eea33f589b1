use anyhow::Result;
use geom::Pt2D;

use crate::{Model, PedestrianID, Trajectory};

/// An interacting trajectory's visible trail stops growing after this many
/// positions, so long-lived neighbors don't clutter the playback.
const PARTNER_TRAIL_LIMIT: usize = 20;

/// Step-by-step playback of one canonical trajectory group. A rendering
/// collaborator calls `step` once per timestep and draws the snapshot it
/// gets back; all of the accumulated state lives here, not in the renderer.
pub struct Replay {
    focus: Trajectory,
    trail: Vec<Pt2D>,
    partners: Vec<PartnerTrail>,
    timestep: usize,
}

struct PartnerTrail {
    id: PedestrianID,
    trajectory: Trajectory,
    // Which timestep of the focus trajectory this partner's first record
    // lines up with; negative when the partner was already being observed
    // before the focus trajectory started.
    offset: isize,
    points: Vec<Pt2D>,
}

/// What's visible after one timestep: the focus trajectory so far, and each
/// partner's trail.
pub struct ReplaySnapshot {
    pub timestep: usize,
    pub focus: Vec<Pt2D>,
    pub partners: Vec<(PedestrianID, Vec<Pt2D>)>,
}

impl Replay {
    pub fn new(model: &Model, id: PedestrianID) -> Result<Replay> {
        let (focus, partners) = model.canonicalize(id)?;

        let mut trails = Vec::new();
        for (other, trajectory) in partners {
            let offset = match focus
                .points()
                .iter()
                .position(|(_, f)| *f == trajectory.start_frame())
            {
                Some(idx) => idx as isize,
                None => {
                    // The partner starts earlier, so find where the focus
                    // trajectory begins along the partner instead
                    match trajectory
                        .points()
                        .iter()
                        .position(|(_, f)| *f == focus.start_frame())
                    {
                        Some(idx) => -(idx as isize),
                        None => {
                            warn!(
                                "Replay of {:?}: partner {:?} shares no alignment frame, skipping",
                                id, other
                            );
                            continue;
                        }
                    }
                }
            };
            trails.push(PartnerTrail {
                id: other,
                trajectory,
                offset,
                points: Vec::new(),
            });
        }

        Ok(Replay {
            focus,
            trail: Vec::new(),
            partners: trails,
            timestep: 0,
        })
    }

    /// Advance one timestep. None once the focus trajectory and every
    /// partner trail are exhausted.
    pub fn step(&mut self) -> Option<ReplaySnapshot> {
        let t = self.timestep;
        let mut advanced = false;

        if t < self.focus.len() {
            self.trail.push(self.focus.points()[t].0);
            advanced = true;
        }
        for partner in &mut self.partners {
            let local = t as isize - partner.offset;
            if local >= 0
                && (local as usize) < partner.trajectory.len()
                && (local as usize) < PARTNER_TRAIL_LIMIT
            {
                partner.points.push(partner.trajectory.points()[local as usize].0);
                advanced = true;
            }
        }

        if !advanced {
            return None;
        }
        self.timestep += 1;
        Some(ReplaySnapshot {
            timestep: t,
            focus: self.trail.clone(),
            partners: self
                .partners
                .iter()
                .map(|p| (p.id, p.points.clone()))
                .collect(),
        })
    }
}
