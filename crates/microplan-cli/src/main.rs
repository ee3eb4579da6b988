//! microplan CLI - create plan files, import work areas, cluster them
//! into groups, and export cases and GeoJSON.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use microplan_backend::{
    area_feature_collection, csv_template, group_features, work_area_cases, WorkAreaCsvImporter,
};
use microplan_cluster::{ClusterConfig, WorkAreaGrouper};
use microplan_core::Plan;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "microplan",
    about = "Plan, cluster, and export field-work areas",
    long_about = "Manage microplanning plan files: import work areas from CSV,\n\
                  cluster them into building-count-capped groups, and export\n\
                  case records and GeoJSON for maps.",
    version
)]
struct Args {
    /// Suppress informational output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show detailed processing information
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty plan file
    Init {
        /// Path of the plan file to create
        plan: PathBuf,
        /// Opportunity the plan belongs to
        #[arg(long, value_name = "ID")]
        opportunity_id: u64,
        /// Last day of field work (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        end_date: Option<NaiveDate>,
    },
    /// Write the CSV import template
    Template {
        /// Output file (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Import work areas from a CSV file
    Import {
        /// Plan file to import into
        plan: PathBuf,
        /// CSV file of work areas
        areas: PathBuf,
    },
    /// Cluster ungrouped work areas into groups
    Cluster {
        /// Plan file to cluster
        plan: PathBuf,
        /// Maximum total building count per group
        #[arg(long, value_name = "N")]
        max_buildings: Option<u32>,
        /// Adjacency buffer distance in metres
        #[arg(long, value_name = "METRES")]
        buffer_distance: Option<f64>,
    },
    /// Export work areas as case records (JSON)
    ExportCases {
        /// Plan file to export from
        plan: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Export GeoJSON: the work-area feature collection, or per-group
    /// boundary unions with --groups
    ExportGeojson {
        /// Plan file to export from
        plan: PathBuf,
        /// Export group boundary unions instead of individual areas
        #[arg(long)]
        groups: bool,
        /// Output file (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Show plan metrics
    Status {
        /// Plan file to summarize
        plan: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.quiet {
        "error"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();

    match args.command {
        Commands::Init {
            plan,
            opportunity_id,
            end_date,
        } => cmd_init(&plan, opportunity_id, end_date, args.quiet),
        Commands::Template { output } => cmd_template(output.as_deref()),
        Commands::Import { plan, areas } => cmd_import(&plan, &areas, args.quiet),
        Commands::Cluster {
            plan,
            max_buildings,
            buffer_distance,
        } => cmd_cluster(&plan, max_buildings, buffer_distance, args.quiet),
        Commands::ExportCases { plan, output } => cmd_export_cases(&plan, output.as_deref()),
        Commands::ExportGeojson {
            plan,
            groups,
            output,
        } => cmd_export_geojson(&plan, groups, output.as_deref()),
        Commands::Status { plan } => cmd_status(&plan),
    }
}

fn cmd_init(
    path: &Path,
    opportunity_id: u64,
    end_date: Option<NaiveDate>,
    quiet: bool,
) -> Result<()> {
    if path.exists() {
        bail!("plan file already exists: {}", path.display());
    }
    let mut plan = Plan::new(opportunity_id);
    plan.end_date = end_date;
    plan.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    if !quiet {
        println!(
            "{} plan for opportunity {} at {}",
            "Created".green().bold(),
            opportunity_id,
            path.display()
        );
    }
    Ok(())
}

fn cmd_template(output: Option<&Path>) -> Result<()> {
    let template = csv_template()?;
    write_output(output, &template)
}

fn cmd_import(plan_path: &Path, areas_path: &Path, quiet: bool) -> Result<()> {
    let mut plan = load_plan(plan_path)?;
    if !plan.areas.is_empty() {
        bail!("work areas already exist in {}", plan_path.display());
    }

    let content = fs::read_to_string(areas_path)
        .with_context(|| format!("failed to read {}", areas_path.display()))?;
    let report = WorkAreaCsvImporter::new(&mut plan).run(&content)?;

    if !report.is_ok() {
        eprintln!("{} import failed:", "Error:".red().bold());
        for (message, lines) in &report.errors {
            let lines: Vec<String> = lines.iter().map(ToString::to_string).collect();
            eprintln!("  {message} (line {})", lines.join(", "));
        }
        std::process::exit(1);
    }

    plan.save(plan_path)?;
    if !quiet {
        println!(
            "{} {} work areas into {}",
            "Imported".green().bold(),
            report.created,
            plan_path.display()
        );
    }
    Ok(())
}

fn cmd_cluster(
    plan_path: &Path,
    max_buildings: Option<u32>,
    buffer_distance: Option<f64>,
    quiet: bool,
) -> Result<()> {
    let mut plan = load_plan(plan_path)?;

    let mut config = ClusterConfig::default();
    if let Some(max) = max_buildings {
        config.max_buildings = max;
    }
    if let Some(buffer) = buffer_distance {
        config.buffer_distance = buffer;
    }

    let outcome = WorkAreaGrouper::new(config).group(&mut plan)?;
    plan.save(plan_path)?;

    if !quiet {
        println!(
            "{} {} groups over {} areas",
            "Created".green().bold(),
            outcome.groups_created,
            outcome.areas_grouped
        );
        for ward in &outcome.wards {
            println!("  {}: {} groups, {} areas", ward.ward, ward.groups, ward.areas);
        }
    }
    Ok(())
}

fn cmd_export_cases(plan_path: &Path, output: Option<&Path>) -> Result<()> {
    let plan = load_plan(plan_path)?;
    let cases = work_area_cases(&plan);
    let json = serde_json::to_string_pretty(&cases)?;
    write_output(output, &json)
}

fn cmd_export_geojson(plan_path: &Path, groups: bool, output: Option<&Path>) -> Result<()> {
    let plan = load_plan(plan_path)?;
    let doc = if groups {
        group_features(&plan)
    } else {
        area_feature_collection(&plan)
    };
    let json = serde_json::to_string_pretty(&doc)?;
    write_output(output, &json)
}

fn cmd_status(plan_path: &Path) -> Result<()> {
    let plan = load_plan(plan_path)?;
    let metrics = plan.metrics(chrono::Local::now().date_naive());

    println!("Opportunity: {}", plan.opportunity_id);
    match metrics.days_remaining {
        Some(days) => println!("Days remaining: {days}"),
        None => println!("Days remaining: --"),
    }
    println!(
        "Work areas: {} ({} grouped, {} ungrouped)",
        metrics.total_areas, metrics.grouped_areas, metrics.ungrouped_areas
    );
    println!("Groups: {}", metrics.group_count);
    if !metrics.status_counts.is_empty() {
        println!("By status:");
        for (status, count) in &metrics.status_counts {
            println!("  {status}: {count}");
        }
        println!(
            "  (to do: {}, in progress: {}, done: {})",
            metrics.to_do(),
            metrics.in_progress(),
            metrics.terminal()
        );
    }
    Ok(())
}

fn load_plan(path: &Path) -> Result<Plan> {
    Plan::load(path).with_context(|| format!("failed to load plan {}", path.display()))
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => {
            println!("{content}");
        }
    }
    Ok(())
}
