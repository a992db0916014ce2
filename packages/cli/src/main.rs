#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the wild hazard toolchain.
//!
//! Single-value commands (`encode`, `decode`, `adjacent`, `bounds`,
//! `region`, `classify`) print one line or a JSON document. Table commands
//! (`annotate`, `join`, `near`, `rank`) read CSV files with a header row
//! and write CSV to stdout, so they compose with shell pipelines. Logs and
//! progress bars go to stderr; set `RUST_LOG=info` to see them.

mod table;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use wild_hazard_cli_utils::{IndicatifProgress, MultiProgress};
use wild_hazard_geocoder::Gazetteer;
use wild_hazard_geography::RegionTable;
use wild_hazard_geography_models::Coordinate;
use wild_hazard_mesh::{Direction, GridScheme, MeshCode, MeshTier};
use wild_hazard_spatial::ProgressCallback;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    name = "wild_hazard",
    about = "Mesh codes, spatial joins and severity ranking for wildlife sightings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a coordinate as a mesh code
    Encode(EncodeArgs),
    /// Decode a mesh code to the south-west corner of its cell
    Decode {
        /// Mesh code of any tier
        code: String,
    },
    /// Step from a 3rd-order mesh code to a neighbouring cell
    Adjacent(AdjacentArgs),
    /// Print the extent and centre of a mesh cell as JSON
    Bounds {
        /// 4, 6 or 8 digit mesh code
        code: String,
    },
    /// List the regions covering a mesh code as JSON
    Region {
        /// Mesh code of at least 4 digits
        code: String,
    },
    /// Add a mesh code column to a CSV point table
    Annotate(AnnotateArgs),
    /// Copy columns from the nearest destination point onto each source point
    Join(JoinArgs),
    /// List the points of a CSV table within a radius, nearest first
    Near(NearArgs),
    /// Classify a cumulative share into a severity band
    Classify {
        /// Cumulative share, normally in [0, 1]
        #[arg(allow_hyphen_values = true)]
        ratio: f64,
    },
    /// Rank the keys of a CSV table by their cumulative share of a count
    Rank(RankArgs),
}

#[derive(Args)]
struct GridArgs {
    /// Mesh tier: 1, 2 or 3
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=3))]
    tier: u8,
    /// Reject coordinates outside the grid domain
    #[arg(long)]
    strict: bool,
}

impl GridArgs {
    fn scheme(&self) -> GridScheme {
        if self.strict {
            GridScheme::JIS.strict()
        } else {
            GridScheme::JIS
        }
    }

    const fn mesh_tier(&self) -> MeshTier {
        match self.tier {
            1 => MeshTier::First,
            2 => MeshTier::Second,
            _ => MeshTier::Third,
        }
    }
}

#[derive(Args)]
struct PointColumns {
    /// Longitude column of the input table
    #[arg(long, default_value = "lon")]
    lon_column: String,
    /// Latitude column of the input table
    #[arg(long, default_value = "lat")]
    lat_column: String,
}

#[derive(Args)]
struct EncodeArgs {
    /// Longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,
    /// Latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    #[command(flatten)]
    grid: GridArgs,
}

#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
struct AdjacentArgs {
    /// 8 digit mesh code
    code: String,
    /// Move one cell west
    #[arg(long)]
    left: bool,
    /// Move one cell east
    #[arg(long)]
    right: bool,
    /// Move one cell north
    #[arg(long)]
    up: bool,
    /// Move one cell south
    #[arg(long)]
    down: bool,
    /// Fail instead of leaving the grid domain
    #[arg(long)]
    strict: bool,
}

impl AdjacentArgs {
    const fn direction(&self) -> Direction {
        Direction {
            left: self.left,
            right: self.right,
            up: self.up,
            down: self.down,
        }
    }
}

#[derive(Args)]
struct AnnotateArgs {
    /// Input CSV table
    #[arg(long)]
    input: PathBuf,
    #[command(flatten)]
    columns: PointColumns,
    /// Name of the added column
    #[arg(long, default_value = "mesh_code")]
    column: String,
    #[command(flatten)]
    grid: GridArgs,
}

#[derive(Args)]
struct JoinArgs {
    /// Table whose rows receive the copied columns
    #[arg(long)]
    src: PathBuf,
    /// Table the columns are copied from
    #[arg(long)]
    dst: PathBuf,
    /// Comma-separated destination columns to copy
    #[arg(long, value_delimiter = ',', required = true)]
    columns: Vec<String>,
    /// Latitude column of the source table
    #[arg(long, default_value = "lat")]
    src_lat: String,
    /// Longitude column of the source table
    #[arg(long, default_value = "lon")]
    src_lon: String,
    /// Latitude column of the destination table
    #[arg(long, default_value = "lat")]
    dst_lat: String,
    /// Longitude column of the destination table
    #[arg(long, default_value = "lon")]
    dst_lon: String,
    /// Name of the added distance column (km)
    #[arg(long, default_value = "distance_km")]
    distance_column: String,
}

#[derive(Args)]
struct NearArgs {
    /// Input CSV table
    #[arg(long)]
    input: PathBuf,
    #[command(flatten)]
    columns: PointColumns,
    /// Search radius in kilometres (inclusive)
    #[arg(long)]
    radius_km: f64,
    /// Longitude of the search origin
    #[arg(
        long,
        allow_hyphen_values = true,
        requires = "lat",
        required_unless_present = "address",
        conflicts_with = "address"
    )]
    lon: Option<f64>,
    /// Latitude of the search origin
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,
    /// Address of the search origin, resolved with --gazetteer
    #[arg(long, requires = "gazetteer")]
    address: Option<String>,
    /// CSV table of known addresses (columns: address, lon, lat)
    #[arg(long)]
    gazetteer: Option<PathBuf>,
    /// Name of the added distance column (km)
    #[arg(long, default_value = "distance_km")]
    distance_column: String,
}

#[derive(Args)]
struct RankArgs {
    /// Input CSV table
    #[arg(long)]
    input: PathBuf,
    /// Column identifying the ranked item (area, mesh code, ...)
    #[arg(long)]
    key_column: String,
    /// Non-negative integer column; repeated keys are summed
    #[arg(long)]
    count_column: String,
}

fn main() -> CliResult {
    let multi = wild_hazard_cli_utils::init_logger();
    let cli = Cli::parse();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli.command, &multi, &mut out)?;
    out.flush()?;

    Ok(())
}

fn run(command: Commands, multi: &MultiProgress, out: &mut dyn Write) -> CliResult {
    match command {
        Commands::Encode(args) => encode(&args, out),
        Commands::Decode { code } => decode(&code, out),
        Commands::Adjacent(args) => adjacent(&args, out),
        Commands::Bounds { code } => bounds(&code, out),
        Commands::Region { code } => region(&code, &RegionTable::embedded(), out),
        Commands::Annotate(args) => annotate(&args, out),
        Commands::Join(args) => {
            let progress = IndicatifProgress::records_bar(multi, "Joining records");
            join(&args, progress.as_ref(), out)
        }
        Commands::Near(args) => near(&args, out),
        Commands::Classify { ratio } => {
            writeln!(out, "{}", wild_hazard_severity::classify(ratio))?;
            Ok(())
        }
        Commands::Rank(args) => rank(&args, out),
    }
}

fn encode(args: &EncodeArgs, out: &mut dyn Write) -> CliResult {
    let code = args
        .grid
        .scheme()
        .encode(Coordinate::new(args.lon, args.lat), args.grid.mesh_tier())?;
    writeln!(out, "{code}")?;
    Ok(())
}

fn decode(code: &str, out: &mut dyn Write) -> CliResult {
    let corner = GridScheme::JIS.decode_str(code)?;
    writeln!(out, "{}", serde_json::to_string(&corner)?)?;
    Ok(())
}

fn adjacent(args: &AdjacentArgs, out: &mut dyn Write) -> CliResult {
    let code: MeshCode = args.code.parse()?;
    let scheme = if args.strict {
        GridScheme::JIS.strict()
    } else {
        GridScheme::JIS
    };
    writeln!(out, "{}", scheme.adjacent(code, args.direction())?)?;
    Ok(())
}

fn bounds(code: &str, out: &mut dyn Write) -> CliResult {
    let bounds = GridScheme::JIS.cell_bounds(code.parse()?)?;
    let document = serde_json::json!({
        "bounds": bounds,
        "center": bounds.center(),
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&document)?)?;
    Ok(())
}

fn region(code: &str, regions: &RegionTable, out: &mut dyn Write) -> CliResult {
    let code: MeshCode = code.parse()?;
    let matches = regions.regions_for(code);
    if matches.is_empty() {
        log::warn!("No registered region covers mesh code {code}");
    }
    writeln!(out, "{}", serde_json::to_string_pretty(&matches)?)?;
    Ok(())
}

fn annotate(args: &AnnotateArgs, out: &mut dyn Write) -> CliResult {
    let mut points = table::read_points(
        table::open(&args.input)?,
        &args.columns.lon_column,
        &args.columns.lat_column,
    )?;
    let scheme = args.grid.scheme();
    let tier = args.grid.mesh_tier();

    for record in &mut points.records {
        let code = scheme.encode(record.coordinate, tier)?;
        record
            .attributes
            .insert(args.column.clone(), code.to_string());
    }
    points.add_header(&args.column);

    log::info!(
        "Annotated {} records with {tier} mesh codes",
        points.records.len()
    );
    table::write_points(out, &points.headers, &points.records)?;
    Ok(())
}

fn join(args: &JoinArgs, progress: &dyn ProgressCallback, out: &mut dyn Write) -> CliResult {
    let mut src = table::read_points(table::open(&args.src)?, &args.src_lon, &args.src_lat)?;
    let dst = table::read_points(table::open(&args.dst)?, &args.dst_lon, &args.dst_lat)?;

    let joined = wild_hazard_spatial::join_with_progress(
        &src.records,
        &dst.records,
        &args.columns,
        progress,
    )?;

    for column in &args.columns {
        src.add_header(column);
    }
    src.add_header(&args.distance_column);

    let records: Vec<_> = joined
        .into_iter()
        .map(|joined| {
            let mut record = joined.record;
            record.attributes.insert(
                args.distance_column.clone(),
                format!("{:.3}", joined.distance_km),
            );
            record
        })
        .collect();

    table::write_points(out, &src.headers, &records)?;
    Ok(())
}

fn near(args: &NearArgs, out: &mut dyn Write) -> CliResult {
    let origin = match (args.lon, args.lat, &args.address, &args.gazetteer) {
        (Some(lon), Some(lat), _, _) => Coordinate::new(lon, lat),
        (_, _, Some(address), Some(path)) => {
            let gazetteer = Gazetteer::from_csv_path(path, "address", "lon", "lat")?;
            wild_hazard_geocoder::require(&gazetteer, address)?
        }
        _ => return Err("near needs --lon/--lat or --address with --gazetteer".into()),
    };

    let mut points = table::read_points(
        table::open(&args.input)?,
        &args.columns.lon_column,
        &args.columns.lat_column,
    )?;
    points.add_header(&args.distance_column);

    let found: Vec<_> =
        wild_hazard_spatial::within_radius(origin, &points.records, args.radius_km)
            .into_iter()
            .map(|nearby| {
                let mut record = nearby.record.clone();
                record.attributes.insert(
                    args.distance_column.clone(),
                    format!("{:.3}", nearby.distance_km),
                );
                record
            })
            .collect();

    log::info!(
        "{} of {} records within {} km of ({}, {})",
        found.len(),
        points.records.len(),
        args.radius_km,
        origin.longitude,
        origin.latitude
    );
    table::write_points(out, &points.headers, &found)?;
    Ok(())
}

fn rank(args: &RankArgs, out: &mut dyn Write) -> CliResult {
    let counts = table::read_counts(
        table::open(&args.input)?,
        &args.key_column,
        &args.count_column,
    )?;
    let ranked = wild_hazard_severity::rank_by_share(counts);

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["key", "count", "cumulative_ratio", "band"])?;
    for item in &ranked {
        writer.write_record([
            item.key.clone(),
            item.count.to_string(),
            format!("{:.4}", item.cumulative_ratio),
            item.band.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
