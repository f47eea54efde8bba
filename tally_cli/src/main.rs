//! # casing-tally
//!
//! Command-line front end for tally snapshot files (`.tly`).
//!
//! ## Usage
//!
//! ```bash
//! # Start a tally seeded with the built-in API casing catalog
//! casing-tally init surface.tly --label "13-3/8 surface" --well Endeavour-7
//!
//! # Set reference depth and mud weight
//! casing-tally params surface.tly --reference-depth 3000 --mud-weight 65
//!
//! # Run joints, mark one OUT
//! casing-tally add surface.tly --size 13.375 --length 12.02 --centralizer
//! casing-tally add surface.tly --size 13.375 --length 11.87
//! casing-tally update surface.tly 1 --centralizer=false
//! casing-tally update surface.tly 2 --out
//!
//! # Inspect
//! casing-tally table surface.tly
//! casing-tally report surface.tly
//! casing-tally report surface.tly --json
//! ```
//!
//! Every edit loads the snapshot, recomputes, and saves it back.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use tally_core::calculations::ProcessOutcome;
use tally_core::{
    load_snapshot, save_snapshot, CasingSpecification, CasingTally, JointStatus,
    JointUpdate, SpecificationCatalog, TallyConfig, TallySummary,
};

#[derive(Parser, Debug)]
#[command(name = "casing-tally")]
#[command(about = "Casing tally calculator: cumulative length, buoyed weight and capacity per joint")]
#[command(version)]
struct CliArgs {
    /// Config file (defaults: $CASING_TALLY_CONFIG, then ./tally_config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new tally file
    Init {
        file: PathBuf,
        #[arg(long, default_value = "")]
        label: String,
        #[arg(long, default_value = "")]
        well: String,
        /// Start with no catalog entries instead of the API sizes
        #[arg(long)]
        empty_catalog: bool,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Append a joint (unset fields use the configured joint defaults)
    Add {
        file: PathBuf,
        #[command(flatten)]
        fields: JointFields,
        /// Log the joint as OUT
        #[arg(long)]
        out: bool,
    },

    /// Edit the joint with the given sequence number
    Update {
        file: PathBuf,
        sequence: u32,
        #[command(flatten)]
        fields: JointFields,
        /// Mark IN or OUT
        #[arg(long, value_name = "IN|OUT")]
        status: Option<JointStatus>,
        /// Mark OUT (shorthand for --status OUT)
        #[arg(long, conflicts_with = "status")]
        out: bool,
    },

    /// Delete the joint with the given sequence number
    Remove { file: PathBuf, sequence: u32 },

    /// Change reference depth, mud weight or steel density
    Params {
        file: PathBuf,
        /// Reference depth (m)
        #[arg(long)]
        reference_depth: Option<f64>,
        #[arg(long)]
        mud_weight: Option<f64>,
        #[arg(long)]
        steel_density: Option<f64>,
    },

    /// Insert or replace a catalog entry
    Spec {
        file: PathBuf,
        /// Nominal size (in)
        #[arg(long)]
        size: f64,
        /// Weight (lb/ft)
        #[arg(long)]
        weight: f64,
        /// Internal diameter (in)
        #[arg(long)]
        id: f64,
        #[arg(long)]
        drift: Option<f64>,
        #[arg(long)]
        grade: Option<String>,
        #[arg(long)]
        connection: Option<String>,
        #[arg(long)]
        burst: Option<f64>,
        #[arg(long)]
        collapse: Option<f64>,
        /// Body tensile yield (klb)
        #[arg(long)]
        tensile: Option<f64>,
        /// Coupling OD (in)
        #[arg(long)]
        coupling_od: Option<f64>,
        /// Make-up torque (ft-lb)
        #[arg(long)]
        torque: Option<f64>,
    },

    /// Print per-joint running totals
    Table { file: PathBuf },

    /// Print the summary report
    Report {
        file: PathBuf,
        /// Emit summary and diagnostics as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Joint fields shared by `add` and `update`
#[derive(Args, Debug)]
struct JointFields {
    /// Nominal size (in)
    #[arg(long)]
    size: Option<f64>,
    /// Joint length (m)
    #[arg(long, allow_hyphen_values = true)]
    length: Option<f64>,
    #[arg(long)]
    grade: Option<String>,
    /// Pipe order reference
    #[arg(long)]
    order: Option<String>,
    /// Centralizer fitted (`--centralizer`, or `--centralizer=false` to clear)
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    centralizer: Option<bool>,
    #[arg(long)]
    remarks: Option<String>,
}

impl JointFields {
    fn into_update(self) -> JointUpdate {
        JointUpdate {
            size_in: self.size,
            grade: self.grade,
            order_reference: self.order,
            length_m: self.length,
            centralizer: self.centralizer,
            status: None,
            remarks: self.remarks,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    label: &'a str,
    well: &'a str,
    buoyancy_factor: f64,
    summary: &'a TallySummary,
    diagnostics: &'a ProcessOutcome,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => TallyConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TallyConfig::load(),
    };

    run(args.command, &config)
}

fn run(command: Command, config: &TallyConfig) -> Result<()> {
    match command {
        Command::Init {
            file,
            label,
            well,
            empty_catalog,
            force,
        } => {
            if file.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", file.display());
            }
            let catalog = if empty_catalog {
                SpecificationCatalog::new()
            } else {
                SpecificationCatalog::api_standard()
            };
            let tally = CasingTally::from_config(config, label, well).with_catalog(catalog);
            save(&tally, &file)?;
            info!(path = %file.display(), sizes = tally.catalog().len(), "Tally created");
        }

        Command::Add { file, fields, out } => {
            let mut tally = open(&file, config)?;
            let seq = tally.append_default_joint();
            let index = seq as usize - 1;
            let mut update = fields.into_update();
            if out {
                update.status = Some(JointStatus::Out);
            }
            if !update.is_empty() {
                tally.update_joint(index, update)?;
            }
            save(&tally, &file)?;
            print_joint_line(&tally, index);
        }

        Command::Update {
            file,
            sequence,
            fields,
            status,
            out,
        } => {
            let mut tally = open(&file, config)?;
            let index = joint_index(&tally, sequence)?;
            let mut update = fields.into_update();
            update.status = if out { Some(JointStatus::Out) } else { status };
            if update.is_empty() {
                bail!("nothing to update for joint {}", sequence);
            }
            tally.update_joint(index, update)?;
            save(&tally, &file)?;
            print_joint_line(&tally, index);
        }

        Command::Remove { file, sequence } => {
            let mut tally = open(&file, config)?;
            let index = joint_index(&tally, sequence)?;
            tally.remove_joint(index)?;
            save(&tally, &file)?;
            println!(
                "Removed joint {}; {} joints remain, total {:.2} m",
                sequence,
                tally.joints().len(),
                tally.summary().total_length_m
            );
        }

        Command::Params {
            file,
            reference_depth,
            mud_weight,
            steel_density,
        } => {
            let mut tally = open(&file, config)?;
            let mut params = *tally.parameters();
            if let Some(depth) = reference_depth {
                params.set_reference_depth(depth);
            }
            if let Some(mud) = mud_weight {
                params.set_mud_weight(mud);
            }
            if let Some(steel) = steel_density {
                params.set_steel_density(steel);
            }
            tally.set_parameters(params);
            save(&tally, &file)?;
            println!(
                "Reference depth {:.2} m, mud weight {:.2}, steel density {:.2}, buoyancy factor {:.4}",
                params.reference_depth_m(),
                params.mud_weight(),
                params.steel_density(),
                params.buoyancy_factor()
            );
        }

        Command::Spec {
            file,
            size,
            weight,
            id,
            drift,
            grade,
            connection,
            burst,
            collapse,
            tensile,
            coupling_od,
            torque,
        } => {
            let mut tally = open(&file, config)?;
            let mut spec = CasingSpecification::new(size, weight, id)
                .with_pressure_ratings(burst.unwrap_or(0.0), collapse.unwrap_or(0.0))
                .with_tensile(tensile.unwrap_or(0.0))
                .with_coupling(coupling_od.unwrap_or(0.0), torque.unwrap_or(0.0))
                .with_drift(drift.unwrap_or(0.0));
            if let Some(grade) = grade {
                spec = spec.with_grade(grade);
            }
            if let Some(connection) = connection {
                spec = spec.with_connection(connection);
            }
            let label = spec.display_name();
            let replaced = tally.upsert_specification(spec);
            save(&tally, &file)?;
            println!("{} {}", if replaced.is_some() { "Replaced" } else { "Added" }, label);
        }

        Command::Table { file } => {
            let tally = open(&file, config)?;
            print_table(&tally);
        }

        Command::Report { file, json } => {
            let tally = open(&file, config)?;
            if json {
                let report = JsonReport {
                    label: &tally.meta.label,
                    well: &tally.meta.well,
                    buoyancy_factor: tally.parameters().buoyancy_factor(),
                    summary: tally.summary(),
                    diagnostics: tally.diagnostics(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", tally.report());
                print_diagnostics(tally.diagnostics());
            }
        }
    }
    Ok(())
}

fn open(path: &Path, config: &TallyConfig) -> Result<CasingTally> {
    let snapshot = load_snapshot(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(CasingTally::from_snapshot(snapshot).with_config(config))
}

fn save(tally: &CasingTally, path: &Path) -> Result<()> {
    save_snapshot(&tally.to_snapshot(), path).with_context(|| format!("saving {}", path.display()))
}

fn joint_index(tally: &CasingTally, sequence: u32) -> Result<usize> {
    match tally.joints().index_of(sequence) {
        Some(index) => Ok(index),
        None => bail!(
            "no joint {} (tally has {} joints)",
            sequence,
            tally.joints().len()
        ),
    }
}

fn print_joint_line(tally: &CasingTally, index: usize) {
    if let Some(joint) = tally.joints().get(index) {
        let d = joint.derived();
        println!(
            "Joint {} {} {:.3}\" {:.2} m -> cum {:.2} m, to ref {:.2} m, {:.2} klb, {:.2} bbl",
            joint.sequence(),
            joint.status,
            joint.size_in,
            joint.length_m,
            d.cumulative_length_m,
            d.distance_to_reference_m,
            d.cumulative_weight_klb,
            d.cumulative_capacity_bbl
        );
    }
}

fn print_table(tally: &CasingTally) {
    println!(
        "{:>4}  {:<3}  {:>7}  {:<6}  {:>7}  {:>4}  {:>9}  {:>9}  {:>8}  {:>8}  {}",
        "#", "ST", "SIZE", "GRADE", "LEN m", "CENT", "CUM m", "TO REF m", "WT klb", "CAP bbl", "REMARKS"
    );
    for joint in tally.joints() {
        let d = joint.derived();
        println!(
            "{:>4}  {:<3}  {:>7.3}  {:<6}  {:>7.2}  {:>4}  {:>9.2}  {:>9.2}  {:>8.2}  {:>8.2}  {}",
            joint.sequence(),
            joint.status,
            joint.size_in,
            joint.grade,
            joint.length_m,
            if joint.centralizer { "Y" } else { "" },
            d.cumulative_length_m,
            d.distance_to_reference_m,
            d.cumulative_weight_klb,
            d.cumulative_capacity_bbl,
            joint.remarks
        );
    }
    print_diagnostics(tally.diagnostics());
}

fn print_diagnostics(outcome: &ProcessOutcome) {
    if !outcome.fallback_sizes.is_empty() {
        let sizes: Vec<String> = outcome.fallback_sizes.iter().map(|s| format!("{:.3}", s)).collect();
        println!();
        println!("NOTE: sizes not in catalog, estimated weights used: {}", sizes.join(", "));
    }
    if !outcome.negative_length_joints.is_empty() {
        let joints: Vec<String> = outcome.negative_length_joints.iter().map(|j| j.to_string()).collect();
        println!("NOTE: negative joint lengths on joints {}", joints.join(", "));
    }
}
