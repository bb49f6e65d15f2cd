//! GeoJSON FeatureCollection reading and writing.
//!
//! Properties are (de)serialized through the typed records in
//! [`properties`](crate::properties); unknown property keys are ignored.

use std::io::{Read, Write};

use geojson::{FeatureCollection, GeoJson};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ConsolidationError, Result};
use crate::Feature;

/// Read a GeoJSON FeatureCollection into typed features.
///
/// Every feature must carry a geometry and a properties object matching `P`.
pub fn read_feature_collection<P, R>(mut reader: R) -> Result<Vec<Feature<P>>>
where
    P: DeserializeOwned,
    R: Read,
{
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;

    let geojson = contents.parse::<GeoJson>().map_err(geojson_error)?;
    let collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        _ => {
            return Err(ConsolidationError::InvalidFeature {
                index: 0,
                message: "expected a FeatureCollection".to_string(),
            })
        }
    };

    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| -> Result<Feature<P>> {
            let geometry = feature
                .geometry
                .ok_or_else(|| ConsolidationError::InvalidFeature {
                    index,
                    message: "missing geometry".to_string(),
                })?;
            let properties = feature
                .properties
                .ok_or_else(|| ConsolidationError::InvalidFeature {
                    index,
                    message: "missing properties".to_string(),
                })?;

            Ok(Feature {
                geometry: geo::Geometry::<f64>::try_from(geometry).map_err(geojson_error)?,
                properties: serde_json::from_value(serde_json::Value::Object(properties))?,
            })
        })
        .collect()
}

fn geojson_error(err: geojson::Error) -> ConsolidationError {
    ConsolidationError::GeoJson(err.to_string())
}

/// Write features as a GeoJSON FeatureCollection.
pub fn write_feature_collection<P, W>(writer: W, features: &[Feature<P>]) -> Result<()>
where
    P: Serialize,
    W: Write,
{
    let features = features
        .iter()
        .enumerate()
        .map(|(index, feature)| -> Result<geojson::Feature> {
            let properties = match serde_json::to_value(&feature.properties)? {
                serde_json::Value::Object(map) => map,
                _ => {
                    return Err(ConsolidationError::InvalidFeature {
                        index,
                        message: "properties did not serialize to an object".to_string(),
                    })
                }
            };

            Ok(geojson::Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(
                    &feature.geometry,
                ))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    serde_json::to_writer(writer, &collection)?;
    Ok(())
}
