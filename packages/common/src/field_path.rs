//! # Settings Field Paths
//!
//! Addresses into a block's settings, as produced by inline-edit surfaces:
//!
//! ```text
//! settings.items[0].title   →  [Key("items"), Index(0), Key("title")]
//! heading                   →  [Key("heading")]
//! ```
//!
//! The leading `settings.` prefix is optional.

use crate::block::Settings;
use crate::error::FieldPathError;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Parsed address into a settings record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn parse(path: &str) -> Result<Self, FieldPathError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(FieldPathError::Empty);
        }

        let body = match trimmed.strip_prefix("settings") {
            Some(rest) if rest.is_empty() => return Err(FieldPathError::Empty),
            Some(rest) if rest.starts_with('.') => &rest[1..],
            Some(rest) if rest.starts_with('[') => rest,
            _ => trimmed,
        };

        let mut segments = Vec::new();
        let mut key = String::new();
        let mut chars = body.chars().peekable();
        // true right after `]`, where a key may not start without a dot
        let mut after_index = false;

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if key.is_empty() && !after_index {
                        return Err(FieldPathError::EmptySegment(path.to_string()));
                    }
                    if !key.is_empty() {
                        segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    }
                    after_index = false;
                    if chars.peek().is_none() {
                        return Err(FieldPathError::EmptySegment(path.to_string()));
                    }
                }
                '[' => {
                    if !key.is_empty() {
                        segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    }
                    let mut digits = String::new();
                    let mut closed = false;
                    for d in chars.by_ref() {
                        if d == ']' {
                            closed = true;
                            break;
                        }
                        digits.push(d);
                    }
                    if !closed {
                        return Err(FieldPathError::UnclosedBracket(path.to_string()));
                    }
                    let index = digits.trim().parse::<usize>().map_err(|_| {
                        FieldPathError::InvalidIndex {
                            path: path.to_string(),
                            index: digits.clone(),
                        }
                    })?;
                    segments.push(PathSegment::Index(index));
                    after_index = true;
                }
                ']' => return Err(FieldPathError::UnclosedBracket(path.to_string())),
                other => {
                    if after_index {
                        return Err(FieldPathError::EmptySegment(path.to_string()));
                    }
                    key.push(other);
                }
            }
        }

        if !key.is_empty() {
            segments.push(PathSegment::Key(key));
        }

        match segments.first() {
            None => Err(FieldPathError::Empty),
            Some(PathSegment::Index(_)) => Err(FieldPathError::EmptySegment(path.to_string())),
            Some(PathSegment::Key(_)) => Ok(Self { segments }),
        }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Read the value at this path
    pub fn get<'a>(&self, settings: &'a Settings) -> Option<&'a Value> {
        let (first, rest) = self.split_first_key()?;
        let mut current = settings.get(first)?;
        for segment in rest {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(key)?,
                (PathSegment::Index(index), Value::Array(items)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Write `value` at this path, creating intermediate objects as
    /// needed. An array index may address an existing element or append
    /// one; the settings are left untouched when the write fails.
    pub fn set(&self, settings: &mut Settings, value: Value) -> Result<(), FieldPathError> {
        let Some((first, rest)) = self.split_first_key() else {
            return Err(FieldPathError::Empty);
        };

        let Some(next) = rest.first() else {
            settings.insert(first.to_string(), value);
            return Ok(());
        };

        let mut slot = settings
            .get(first)
            .cloned()
            .unwrap_or_else(|| empty_container_for(next));
        set_in(&mut slot, rest, value, first)?;
        settings.insert(first.to_string(), slot);
        Ok(())
    }

    fn split_first_key(&self) -> Option<(&str, &[PathSegment])> {
        match self.segments.split_first()? {
            (PathSegment::Key(key), rest) => Some((key.as_str(), rest)),
            _ => None,
        }
    }
}

fn empty_container_for(segment: &PathSegment) -> Value {
    match segment {
        PathSegment::Key(_) => Value::Object(Map::new()),
        PathSegment::Index(_) => Value::Array(Vec::new()),
    }
}

fn set_in(
    current: &mut Value,
    segments: &[PathSegment],
    value: Value,
    trail: &str,
) -> Result<(), FieldPathError> {
    let Some((segment, rest)) = segments.split_first() else {
        *current = value;
        return Ok(());
    };

    if current.is_null() {
        *current = empty_container_for(segment);
    }

    let next = match (segment, current) {
        (PathSegment::Key(key), Value::Object(map)) => {
            if rest.is_empty() {
                map.insert(key.clone(), value);
                return Ok(());
            }
            map.entry(key.clone())
                .or_insert_with(|| empty_container_for(&rest[0]))
        }
        (PathSegment::Index(index), Value::Array(items)) => {
            let index = *index;
            if index > items.len() {
                return Err(FieldPathError::IndexOutOfRange {
                    path: trail.to_string(),
                    index,
                    len: items.len(),
                });
            }
            if index == items.len() {
                items.push(Value::Null);
            }
            if rest.is_empty() {
                items[index] = value;
                return Ok(());
            }
            &mut items[index]
        }
        _ => return Err(FieldPathError::NotAContainer(trail.to_string())),
    };

    set_in(next, rest, value, trail)
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("settings")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = FieldPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}
