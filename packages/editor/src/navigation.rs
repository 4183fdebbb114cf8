//! Tab-order navigation between editable fields.
//!
//! Fields are ordered in reading order: rows top-to-bottom, then
//! left-to-right within a row. Two fields share a row when their top edges
//! are within the row tolerance of the row's first field.

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROW_TOLERANCE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableField {
    pub block_id: String,
    pub field_path: String,
    pub rect: Rect,
}

impl EditableField {
    pub fn new(block_id: impl Into<String>, field_path: impl Into<String>, rect: Rect) -> Self {
        Self {
            block_id: block_id.into(),
            field_path: field_path.into(),
            rect,
        }
    }

    fn is(&self, block_id: &str, field_path: &str) -> bool {
        self.block_id == block_id && self.field_path == field_path
    }
}

/// Fields sorted into reading order
pub fn reading_order(fields: &[EditableField], row_tolerance: f64) -> Vec<&EditableField> {
    let mut by_top: Vec<&EditableField> = fields.iter().collect();
    by_top.sort_by(|a, b| a.rect.y.total_cmp(&b.rect.y));

    let mut rows: Vec<(usize, &EditableField)> = Vec::with_capacity(by_top.len());
    let mut row = 0;
    let mut row_top = None;
    for field in by_top {
        match row_top {
            Some(top) if field.rect.y - top <= row_tolerance => {}
            Some(_) => {
                row += 1;
                row_top = Some(field.rect.y);
            }
            None => row_top = Some(field.rect.y),
        }
        rows.push((row, field));
    }

    rows.sort_by(|(row_a, a), (row_b, b)| {
        row_a.cmp(row_b).then(a.rect.x.total_cmp(&b.rect.x))
    });
    rows.into_iter().map(|(_, field)| field).collect()
}

/// Field after `current`, wrapping to the first. With no (or an unknown)
/// current field the first field is returned.
pub fn next_field<'a>(
    fields: &'a [EditableField],
    current: Option<(&str, &str)>,
    row_tolerance: f64,
) -> Option<&'a EditableField> {
    step(fields, current, row_tolerance, true)
}

/// Field before `current`, wrapping to the last
pub fn previous_field<'a>(
    fields: &'a [EditableField],
    current: Option<(&str, &str)>,
    row_tolerance: f64,
) -> Option<&'a EditableField> {
    step(fields, current, row_tolerance, false)
}

fn step<'a>(
    fields: &'a [EditableField],
    current: Option<(&str, &str)>,
    row_tolerance: f64,
    forward: bool,
) -> Option<&'a EditableField> {
    let ordered = reading_order(fields, row_tolerance);
    let len = ordered.len();
    if len == 0 {
        return None;
    }

    let position = current.and_then(|(block_id, field_path)| {
        ordered.iter().position(|field| field.is(block_id, field_path))
    });

    let index = match (position, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    };
    Some(ordered[index])
}
