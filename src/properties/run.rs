//! Ski run properties and their consolidation rules.

use serde::{Deserialize, Serialize};

use super::{
    first_non_null, fold_oneway, join_text, pick_by_priority, union_by_key, Consolidate,
    ElevationProfile, Place, SkiAreaRef, Source, Status, BOOLEAN_PRIORITY, STATUS_PRIORITY,
};
use crate::error::{OptionExt, Result};

/// Activity a run is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunUse {
    Downhill,
    Nordic,
    Skitour,
    Sled,
    Hike,
    Sleigh,
    SnowPark,
    Playground,
    Connection,
    Fatbike,
}

/// Normalized run difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Novice,
    Easy,
    Intermediate,
    Advanced,
    Expert,
    Freeride,
    Extreme,
}

/// Merge preference for difficulty: the easiest rating wins, unset last.
pub(crate) const DIFFICULTY_PRIORITY: [Option<Difficulty>; 8] = [
    Some(Difficulty::Novice),
    Some(Difficulty::Easy),
    Some(Difficulty::Intermediate),
    Some(Difficulty::Advanced),
    Some(Difficulty::Expert),
    Some(Difficulty::Freeride),
    Some(Difficulty::Extreme),
    None,
];

/// Regional difficulty color convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Convention {
    Europe,
    Japan,
    NorthAmerica,
}

/// Grooming applied to a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grooming {
    Classic,
    Skating,
    #[serde(rename = "classic+skating")]
    ClassicAndSkating,
    Scooter,
    Mogul,
    Backcountry,
}

/// Merge preference for grooming: most thoroughly prepared first, unset last.
pub(crate) const GROOMING_PRIORITY: [Option<Grooming>; 7] = [
    Some(Grooming::ClassicAndSkating),
    Some(Grooming::Classic),
    Some(Grooming::Skating),
    Some(Grooming::Mogul),
    Some(Grooming::Scooter),
    Some(Grooming::Backcountry),
    None,
];

/// Properties of a ski run segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProperties {
    pub id: String,
    #[serde(default)]
    pub uses: Vec<RunUse>,
    pub name: Option<String>,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub convention: Option<Convention>,
    #[serde(default)]
    pub status: Status,
    pub oneway: Option<bool>,
    pub lit: Option<bool>,
    pub gladed: Option<bool>,
    pub patrolled: Option<bool>,
    pub grooming: Option<Grooming>,
    #[serde(default)]
    pub ski_areas: Vec<SkiAreaRef>,
    pub elevation_profile: Option<ElevationProfile>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub websites: Vec<String>,
    #[serde(rename = "wikidataID")]
    pub wikidata_id: Option<String>,
    #[serde(default)]
    pub places: Vec<Place>,
}

impl RunProperties {
    /// Create an operating run with the given id and no other attributes.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uses: Vec::new(),
            name: None,
            reference: None,
            description: None,
            difficulty: None,
            convention: None,
            status: Status::Operating,
            oneway: None,
            lit: None,
            gladed: None,
            patrolled: None,
            grooming: None,
            ski_areas: Vec::new(),
            elevation_profile: None,
            sources: Vec::new(),
            websites: Vec::new(),
            wikidata_id: None,
            places: Vec::new(),
        }
    }
}

impl Consolidate for RunProperties {
    fn feature_id(&self) -> &str {
        &self.id
    }

    fn oneway(&self) -> Option<bool> {
        self.oneway
    }

    fn is_same_logical_feature(&self, other: &Self) -> bool {
        // Exhaustive so that a new field has to be classified here
        let Self {
            id: _,
            sources: _,
            ski_areas: _,
            elevation_profile: _,
            places: _,
            uses,
            name,
            reference,
            description,
            difficulty,
            convention,
            status,
            oneway,
            lit,
            gladed,
            patrolled,
            grooming,
            websites,
            wikidata_id,
        } = self;

        *uses == other.uses
            && *name == other.name
            && *reference == other.reference
            && *description == other.description
            && *difficulty == other.difficulty
            && *convention == other.convention
            && *status == other.status
            && *oneway == other.oneway
            && *lit == other.lit
            && *gladed == other.gladed
            && *patrolled == other.patrolled
            && *grooming == other.grooming
            && *websites == other.websites
            && *wikidata_id == other.wikidata_id
    }

    fn merge(parts: &[&Self]) -> Result<Self> {
        let first = parts.first().ok_or_empty_chain()?;

        Ok(Self {
            id: first.id.clone(),
            uses: union_by_key(parts.iter().map(|p| p.uses.as_slice()), |u| *u),
            name: join_text(parts.iter().map(|p| p.name.as_deref())),
            reference: join_text(parts.iter().map(|p| p.reference.as_deref())),
            description: join_text(parts.iter().map(|p| p.description.as_deref())),
            difficulty: pick_by_priority(
                parts.iter().map(|p| p.difficulty),
                &DIFFICULTY_PRIORITY,
                "difficulty",
            )?,
            convention: first.convention,
            status: pick_by_priority(parts.iter().map(|p| p.status), &STATUS_PRIORITY, "status")?,
            oneway: fold_oneway(parts.iter().map(|p| p.oneway)),
            lit: pick_by_priority(parts.iter().map(|p| p.lit), &BOOLEAN_PRIORITY, "lit")?,
            gladed: pick_by_priority(parts.iter().map(|p| p.gladed), &BOOLEAN_PRIORITY, "gladed")?,
            patrolled: pick_by_priority(
                parts.iter().map(|p| p.patrolled),
                &BOOLEAN_PRIORITY,
                "patrolled",
            )?,
            grooming: pick_by_priority(
                parts.iter().map(|p| p.grooming),
                &GROOMING_PRIORITY,
                "grooming",
            )?,
            ski_areas: union_by_key(parts.iter().map(|p| p.ski_areas.as_slice()), |area| {
                area.id.as_str()
            }),
            elevation_profile: first.elevation_profile.clone(),
            sources: union_by_key(parts.iter().map(|p| p.sources.as_slice()), Source::key),
            websites: union_by_key(parts.iter().map(|p| p.websites.as_slice()), |url| {
                url.as_str()
            }),
            wikidata_id: first_non_null(parts.iter().map(|p| &p.wikidata_id)),
            places: union_by_key(parts.iter().map(|p| p.places.as_slice()), Place::key),
        })
    }
}
