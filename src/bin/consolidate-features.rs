//! Consolidate run and lift GeoJSON files produced by the tag-parsing stage.
//!
//! ```text
//! consolidate-features --runs runs.geojson --lifts lifts.geojson --output-dir out/
//! ```

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;
use piste_consolidation::{
    consolidate_with_stats, read_feature_collection, write_feature_collection, CandidateOrder,
    Consolidate, ConsolidationConfig, LiftProperties, Result, RunProperties,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Parser, Debug, Clone)]
#[command(name = "consolidate-features", version)]
struct Args {
    /// Runs FeatureCollection
    #[arg(long)]
    runs: Option<PathBuf>,

    /// Lifts FeatureCollection
    #[arg(long)]
    lifts: Option<PathBuf>,

    /// Directory receiving runs.geojson and lifts.geojson
    #[arg(long, default_value = "consolidated")]
    output_dir: PathBuf,

    /// Prefer continuations by ascending feature id instead of input order
    #[arg(long, default_value_t = false)]
    sort_by_id: bool,
}

fn consolidate_file<P>(input: &Path, output: &Path, config: &ConsolidationConfig) -> Result<()>
where
    P: Consolidate + Clone + Serialize + DeserializeOwned,
{
    let features = read_feature_collection::<P, _>(BufReader::new(File::open(input)?))?;
    let (consolidated, stats) = consolidate_with_stats(&features, config)?;
    write_feature_collection(BufWriter::new(File::create(output)?), &consolidated)?;

    info!(
        "OK {} -> {} ({} -> {} features, {} merged chains)",
        input.display(),
        output.display(),
        stats.input_features,
        stats.output_features,
        stats.merged_chains
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    fs::create_dir_all(&args.output_dir)?;

    let config = ConsolidationConfig {
        candidate_order: if args.sort_by_id {
            CandidateOrder::FeatureId
        } else {
            CandidateOrder::Insertion
        },
    };

    if let Some(runs) = &args.runs {
        consolidate_file::<RunProperties>(runs, &args.output_dir.join("runs.geojson"), &config)?;
    }
    if let Some(lifts) = &args.lifts {
        consolidate_file::<LiftProperties>(
            lifts,
            &args.output_dir.join("lifts.geojson"),
            &config,
        )?;
    }

    Ok(())
}
