//! # Alignment Guides
//!
//! Smart guides shown while a block is dragged on the canvas.
//!
//! For every other block the dragged rect is compared edge-to-edge
//! (including the cross edges left↔right and top↔bottom) and
//! center-to-center; the container's center is a candidate too. Candidates
//! closer than the threshold compete per axis: the nearest one determines
//! the snap delta, and only guides that line up at that delta are shown.
//!
//! Spacing indicators measure the gap to the nearest block directly above
//! and below the snapped position.

use crate::geometry::Rect;
use blockforge_common::EditorConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_SNAP_THRESHOLD: f64 = 8.0;

/// Orientation of the guide line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GuideAxis {
    /// Vertical line at an x position (snaps horizontally)
    Vertical,
    /// Horizontal line at a y position (snaps vertically)
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GuideKind {
    Edge,
    Center,
    ContainerCenter,
    Spacing,
}

impl GuideKind {
    fn is_center(self) -> bool {
        matches!(self, GuideKind::Center | GuideKind::ContainerCenter)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guide {
    pub axis: GuideAxis,
    pub kind: GuideKind,

    /// x for vertical guides, y for horizontal ones
    pub position: f64,
    pub start: f64,
    pub end: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideOptions {
    pub threshold: f64,
    pub snap_enabled: bool,
}

impl GuideOptions {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            threshold: config.snap_threshold,
            snap_enabled: true,
        }
    }
}

impl Default for GuideOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SNAP_THRESHOLD,
            snap_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideResult {
    pub guides: Vec<Guide>,
    pub delta_x: f64,
    pub delta_y: f64,
}

struct Candidate {
    guide: Guide,
    delta: f64,
}

struct Collector {
    threshold: f64,
    candidates: Vec<Candidate>,
}

impl Collector {
    /// Register `source → target` alignment if within the threshold
    fn consider(&mut self, axis: GuideAxis, kind: GuideKind, source: f64, target: f64, span: (f64, f64)) {
        let delta = target - source;
        if delta.abs() < self.threshold {
            self.candidates.push(Candidate {
                guide: Guide {
                    axis,
                    kind,
                    position: target,
                    start: span.0,
                    end: span.1,
                    label: None,
                },
                delta,
            });
        }
    }

    /// Delta of the nearest candidate on `axis`; the first one wins ties
    fn snap(&self, axis: GuideAxis) -> f64 {
        let mut best: Option<f64> = None;
        for candidate in self.candidates.iter().filter(|c| c.guide.axis == axis) {
            if best.map_or(true, |b| candidate.delta.abs() < b.abs()) {
                best = Some(candidate.delta);
            }
        }
        best.unwrap_or(0.0)
    }

    /// Guides matching the winning delta on their axis, one per
    /// (axis, rounded position), center guides preferred
    fn into_guides(self) -> Vec<Guide> {
        let winners = [
            (GuideAxis::Vertical, self.snap(GuideAxis::Vertical)),
            (GuideAxis::Horizontal, self.snap(GuideAxis::Horizontal)),
        ];
        let mut guides: Vec<Guide> = Vec::new();
        let mut index: HashMap<(GuideAxis, i64), usize> = HashMap::new();

        for Candidate { guide, delta } in self.candidates {
            let lines_up = winners
                .iter()
                .any(|(axis, best)| *axis == guide.axis && (delta - best).abs() < 0.5);
            if !lines_up {
                continue;
            }
            let key = (guide.axis, guide.position.round() as i64);
            match index.get(&key) {
                Some(&existing) => {
                    if guide.kind.is_center() && !guides[existing].kind.is_center() {
                        guides[existing] = guide;
                    }
                }
                None => {
                    index.insert(key, guides.len());
                    guides.push(guide);
                }
            }
        }
        guides
    }
}

pub fn compute_guides(
    dragged: Rect,
    others: &[Rect],
    container: Option<Rect>,
    options: &GuideOptions,
) -> GuideResult {
    let mut collector = Collector {
        threshold: options.threshold,
        candidates: Vec::new(),
    };

    for other in others {
        let v_span = (dragged.top().min(other.top()), dragged.bottom().max(other.bottom()));
        let h_span = (dragged.left().min(other.left()), dragged.right().max(other.right()));

        use GuideAxis::{Horizontal, Vertical};
        use GuideKind::{Center, Edge};

        collector.consider(Vertical, Edge, dragged.left(), other.left(), v_span);
        collector.consider(Vertical, Edge, dragged.right(), other.right(), v_span);
        collector.consider(Vertical, Edge, dragged.left(), other.right(), v_span);
        collector.consider(Vertical, Edge, dragged.right(), other.left(), v_span);
        collector.consider(Vertical, Center, dragged.center_x(), other.center_x(), v_span);

        collector.consider(Horizontal, Edge, dragged.top(), other.top(), h_span);
        collector.consider(Horizontal, Edge, dragged.bottom(), other.bottom(), h_span);
        collector.consider(Horizontal, Edge, dragged.top(), other.bottom(), h_span);
        collector.consider(Horizontal, Edge, dragged.bottom(), other.top(), h_span);
        collector.consider(Horizontal, Center, dragged.center_y(), other.center_y(), h_span);
    }

    if let Some(container) = container {
        collector.consider(
            GuideAxis::Vertical,
            GuideKind::ContainerCenter,
            dragged.center_x(),
            container.center_x(),
            (container.top(), container.bottom()),
        );
        collector.consider(
            GuideAxis::Horizontal,
            GuideKind::ContainerCenter,
            dragged.center_y(),
            container.center_y(),
            (container.left(), container.right()),
        );
    }

    let (delta_x, delta_y) = if options.snap_enabled {
        (collector.snap(GuideAxis::Vertical), collector.snap(GuideAxis::Horizontal))
    } else {
        (0.0, 0.0)
    };

    let mut guides = collector.into_guides();
    guides.extend(spacing_guides(dragged.translate(delta_x, delta_y), others));

    GuideResult {
        guides,
        delta_x,
        delta_y,
    }
}

/// Gap indicators to the nearest block above and below
fn spacing_guides(dragged: Rect, others: &[Rect]) -> Vec<Guide> {
    let above = others
        .iter()
        .filter(|other| other.bottom() <= dragged.top())
        .max_by(|a, b| a.bottom().total_cmp(&b.bottom()));
    let below = others
        .iter()
        .filter(|other| other.top() >= dragged.bottom())
        .min_by(|a, b| a.top().total_cmp(&b.top()));

    let mut guides = Vec::new();
    if let Some(above) = above {
        guides.extend(spacing_guide(dragged.center_x(), above.bottom(), dragged.top()));
    }
    if let Some(below) = below {
        guides.extend(spacing_guide(dragged.center_x(), dragged.bottom(), below.top()));
    }
    guides
}

fn spacing_guide(x: f64, start: f64, end: f64) -> Option<Guide> {
    let gap = end - start;
    (gap > 0.0).then(|| Guide {
        axis: GuideAxis::Vertical,
        kind: GuideKind::Spacing,
        position: x,
        start,
        end,
        label: Some(format!("{}px", gap.round() as i64)),
    })
}
