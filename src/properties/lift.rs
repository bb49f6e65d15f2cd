//! Lift properties and their consolidation rules.
//!
//! Lifts follow the same identity/comparison split as runs. Numeric
//! attributes (occupancy, capacity, duration) can only differ by presence
//! between matched segments, so the first known value is kept.

use serde::{Deserialize, Serialize};

use super::{
    first_non_null, fold_oneway, join_text, pick_by_priority, union_by_key, Consolidate, Place,
    SkiAreaRef, Source, Status, BOOLEAN_PRIORITY, STATUS_PRIORITY,
};
use crate::error::{OptionExt, Result};

/// Kind of aerial or surface lift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiftType {
    CableCar,
    ChairLift,
    DragLift,
    Funicular,
    Gondola,
    #[serde(rename = "j-bar")]
    JBar,
    MagicCarpet,
    MixedLift,
    Platter,
    RopeTow,
    #[serde(rename = "t-bar")]
    TBar,
    ZipLine,
}

/// Properties of a lift segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftProperties {
    pub id: String,
    pub lift_type: LiftType,
    pub name: Option<String>,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    pub oneway: Option<bool>,
    /// Persons per carrier
    pub occupancy: Option<u32>,
    /// Persons per hour
    pub capacity: Option<u32>,
    /// Ride time in seconds
    pub duration: Option<u32>,
    pub detachable: Option<bool>,
    pub bubble: Option<bool>,
    pub heating: Option<bool>,
    #[serde(default)]
    pub ski_areas: Vec<SkiAreaRef>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub websites: Vec<String>,
    #[serde(rename = "wikidataID")]
    pub wikidata_id: Option<String>,
    #[serde(default)]
    pub places: Vec<Place>,
}

impl LiftProperties {
    /// Create an operating lift of `lift_type` with no other attributes.
    pub fn new(id: impl Into<String>, lift_type: LiftType) -> Self {
        Self {
            id: id.into(),
            lift_type,
            name: None,
            reference: None,
            description: None,
            status: Status::Operating,
            oneway: None,
            occupancy: None,
            capacity: None,
            duration: None,
            detachable: None,
            bubble: None,
            heating: None,
            ski_areas: Vec::new(),
            sources: Vec::new(),
            websites: Vec::new(),
            wikidata_id: None,
            places: Vec::new(),
        }
    }
}

impl Consolidate for LiftProperties {
    fn feature_id(&self) -> &str {
        &self.id
    }

    fn oneway(&self) -> Option<bool> {
        self.oneway
    }

    fn is_same_logical_feature(&self, other: &Self) -> bool {
        let Self {
            id: _,
            sources: _,
            ski_areas: _,
            places: _,
            lift_type,
            name,
            reference,
            description,
            status,
            oneway,
            occupancy,
            capacity,
            duration,
            detachable,
            bubble,
            heating,
            websites,
            wikidata_id,
        } = self;

        *lift_type == other.lift_type
            && *name == other.name
            && *reference == other.reference
            && *description == other.description
            && *status == other.status
            && *oneway == other.oneway
            && *occupancy == other.occupancy
            && *capacity == other.capacity
            && *duration == other.duration
            && *detachable == other.detachable
            && *bubble == other.bubble
            && *heating == other.heating
            && *websites == other.websites
            && *wikidata_id == other.wikidata_id
    }

    fn merge(parts: &[&Self]) -> Result<Self> {
        let first = parts.first().ok_or_empty_chain()?;

        Ok(Self {
            id: first.id.clone(),
            lift_type: first.lift_type,
            name: join_text(parts.iter().map(|p| p.name.as_deref())),
            reference: join_text(parts.iter().map(|p| p.reference.as_deref())),
            description: join_text(parts.iter().map(|p| p.description.as_deref())),
            status: pick_by_priority(parts.iter().map(|p| p.status), &STATUS_PRIORITY, "status")?,
            oneway: fold_oneway(parts.iter().map(|p| p.oneway)),
            occupancy: first_non_null(parts.iter().map(|p| &p.occupancy)),
            capacity: first_non_null(parts.iter().map(|p| &p.capacity)),
            duration: first_non_null(parts.iter().map(|p| &p.duration)),
            detachable: pick_by_priority(
                parts.iter().map(|p| p.detachable),
                &BOOLEAN_PRIORITY,
                "detachable",
            )?,
            bubble: pick_by_priority(parts.iter().map(|p| p.bubble), &BOOLEAN_PRIORITY, "bubble")?,
            heating: pick_by_priority(
                parts.iter().map(|p| p.heating),
                &BOOLEAN_PRIORITY,
                "heating",
            )?,
            ski_areas: union_by_key(parts.iter().map(|p| p.ski_areas.as_slice()), |area| {
                area.id.as_str()
            }),
            sources: union_by_key(parts.iter().map(|p| p.sources.as_slice()), Source::key),
            websites: union_by_key(parts.iter().map(|p| p.websites.as_slice()), |url| {
                url.as_str()
            }),
            wikidata_id: first_non_null(parts.iter().map(|p| &p.wikidata_id)),
            places: union_by_key(parts.iter().map(|p| p.places.as_slice()), Place::key),
        })
    }
}
