use clap::{Args, Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use golf_coach_engine::{
    analysis::AnalysisResult, reference, Analyzer, EngineConfig, Handedness, Metric, ReferenceTables,
    ShotInput, ShotMeasurement, TrajectorySimulator, UnitSystem,
};

#[derive(Parser)]
#[command(name = "golf-coach")]
#[command(author = "Golf Coach Engine Team")]
#[command(version)]
#[command(about = "Launch-monitor shot analysis: ball flight, shot shape, benchmarks and coaching", long_about = None)]
struct Cli {
    /// Engine configuration file (JSON); defaults are used when omitted
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct LaunchArgs {
    /// Ball speed (m/s)
    #[arg(short = 's', long)]
    speed: f64,

    /// Vertical launch angle (degrees)
    #[arg(short = 'v', long, default_value = "12.0", allow_hyphen_values = true)]
    vla: f64,

    /// Horizontal launch angle (degrees, positive = right)
    #[arg(short = 'H', long, default_value = "0.0", allow_hyphen_values = true)]
    hla: f64,

    /// Total spin (rpm)
    #[arg(short = 'r', long, default_value = "3000.0")]
    spin: f64,

    /// Spin axis tilt (degrees, positive = curves right)
    #[arg(short = 'a', long, default_value = "0.0", allow_hyphen_values = true)]
    axis: f64,

    /// Player handedness (right, left, rh, lh)
    #[arg(long, default_value = "right")]
    handedness: Handedness,
}

impl LaunchArgs {
    fn measurement(&self) -> ShotMeasurement {
        ShotMeasurement::now(self.speed, self.vla, self.hla, self.spin, self.axis)
    }
}

#[derive(Args, Debug, Clone)]
struct TableArgs {
    /// Cohort percentile table (JSON); requires --tips
    #[arg(long, requires = "tips")]
    benchmarks: Option<PathBuf>,

    /// Coaching tips table (JSON); requires --benchmarks
    #[arg(long, requires = "benchmarks")]
    tips: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single shot
    Analyze {
        #[command(flatten)]
        launch: LaunchArgs,

        #[command(flatten)]
        tables: TableArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,

        /// Units for the table output
        #[arg(short = 'u', long)]
        units: Option<Units>,
    },

    /// Simulate ball flight only
    Simulate {
        #[command(flatten)]
        launch: LaunchArgs,

        /// Record the flight path every N seconds
        #[arg(long)]
        path: Option<f64>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Analyze a session of shots from a JSON-lines file
    Batch {
        /// File with one shot record per line
        input: PathBuf,

        /// Player handedness (right, left, rh, lh)
        #[arg(long, default_value = "right")]
        handedness: Handedness,

        #[command(flatten)]
        tables: TableArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "summary")]
        output: BatchOutput,
    },

    /// Validate reference tables and configuration
    ValidateData {
        #[command(flatten)]
        tables: TableArgs,
    },

    /// Display engine information
    Info,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BatchOutput {
    /// One JSON result per line
    Jsonl,
    Summary,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Units {
    Metric,
    Us,
}

impl From<Units> for UnitSystem {
    fn from(units: Units) -> Self {
        match units {
            Units::Metric => UnitSystem::Metric,
            Units::Us => UnitSystem::UsCustomary,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Analyze { launch, tables, output, units } => {
            let units = units.map(UnitSystem::from).unwrap_or(config.display_units);
            let analyzer = Analyzer::new(config)?;
            let tables = install_tables(&tables)?;

            let result = analyzer.analyze(&launch.measurement(), launch.handedness, &tables);
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Table => display_analysis(&result, units),
            }
        }

        Commands::Simulate { launch, path, output } => {
            let mut sim_config = config.simulator.clone();
            if path.is_some() {
                sim_config.sample_interval_s = path;
            }
            sim_config.validate()?;
            let simulator = TrajectorySimulator::new(sim_config, config.bounds.clone());

            let outcome = simulator.simulate(&launch.measurement(), launch.handedness);
            for clamp in &outcome.clamped_inputs {
                eprintln!("clamped {} from {} to {}", clamp.field, clamp.measured, clamp.clamped_to);
            }
            let estimate = outcome.result?;

            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&estimate)?),
                OutputFormat::Table => {
                    println!("╔════════════════════════════════════════╗");
                    println!("║         ESTIMATED BALL FLIGHT          ║");
                    println!("╠════════════════════════════════════════╣");
                    println!("║ Carry:             {:>8.1} m          ║", estimate.carry_distance_m);
                    println!("║ Total:             {:>8.1} m          ║", estimate.total_distance_m);
                    println!("║ Offline:           {:>8.1} m          ║", estimate.offline_distance_m);
                    println!("║ Apex:              {:>8.1} m          ║", estimate.apex_height_m);
                    println!("║ Hang Time:         {:>8.2} s          ║", estimate.hang_time_s);
                    println!("║ Descent Angle:     {:>8.1} deg        ║", estimate.descent_angle_deg);
                    println!("║ Landing Speed:     {:>8.1} m/s        ║", estimate.landing_speed_mps);
                    println!("╚════════════════════════════════════════╝");

                    if let Some(samples) = &estimate.flight_path {
                        println!("\nFlight Path:");
                        println!("┌──────────┬──────────┬──────────┬──────────┬──────────┐");
                        println!("│ Time (s) │ Down (m) │ Up (m)   │ Side (m) │ Vel(m/s) │");
                        println!("├──────────┼──────────┼──────────┼──────────┼──────────┤");
                        for p in samples {
                            println!(
                                "│ {:>8.2} │ {:>8.1} │ {:>8.1} │ {:>8.1} │ {:>8.1} │",
                                p.time_s, p.downrange_m, p.height_m, p.lateral_m, p.speed_mps
                            );
                        }
                        println!("└──────────┴──────────┴──────────┴──────────┴──────────┘");
                    }
                }
            }
        }

        Commands::Batch { input, handedness, tables, output } => {
            let analyzer = Analyzer::new(config)?;
            let tables = install_tables(&tables)?;
            let shots = read_session(&input)?;
            log::info!("analyzing {} shots from {}", shots.len(), input.display());

            let results = analyzer.analyze_batch(&shots, handedness, &tables);
            match output {
                BatchOutput::Jsonl => {
                    for result in &results {
                        println!("{}", serde_json::to_string(result)?);
                    }
                }
                BatchOutput::Summary => display_session(&results),
            }
        }

        Commands::ValidateData { tables } => {
            let loaded = load_tables(&tables)?;
            config.validate()?;
            let cohorts: Vec<&str> = loaded.cohorts().cohort_names().collect();
            println!(
                "reference data OK: cohort table {} ({}), tips table {} ({} tips)",
                loaded.cohort_version(),
                cohorts.join(", "),
                loaded.tips_version(),
                loaded.tips().tips().len()
            );
        }

        Commands::Info => {
            println!("╔════════════════════════════════════════╗");
            println!("║      GOLF COACH ENGINE v{:<15}║", golf_coach_engine::ENGINE_VERSION);
            println!("╠════════════════════════════════════════╣");
            println!("║ Shot analysis from launch-monitor      ║");
            println!("║ ball data.                             ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Features:                              ║");
            println!("║ • RK4 ball-flight integration          ║");
            println!("║ • Drag, Magnus lift and spin decay     ║");
            println!("║ • Club and shot-shape classification   ║");
            println!("║ • Cohort percentile benchmarks         ║");
            println!("║ • Prioritized coaching cues            ║");
            println!("╚════════════════════════════════════════╝");
        }
    }

    Ok(())
}

fn load_tables(args: &TableArgs) -> Result<ReferenceTables, Box<dyn Error>> {
    let tables = match (&args.benchmarks, &args.tips) {
        (Some(benchmarks), Some(tips)) => ReferenceTables::from_paths(benchmarks, tips)?,
        (None, None) => ReferenceTables::builtin()?,
        _ => return Err("--benchmarks and --tips must be given together".into()),
    };
    Ok(tables)
}

fn install_tables(args: &TableArgs) -> Result<std::sync::Arc<ReferenceTables>, Box<dyn Error>> {
    reference::install(load_tables(args)?)?;
    reference::current().ok_or_else(|| "reference tables unavailable".into())
}

fn read_session(path: &Path) -> Result<Vec<ShotMeasurement>, Box<dyn Error>> {
    let text = fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let mut shots = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let input: ShotInput =
            serde_json::from_str(line).map_err(|e| format!("{}:{}: {e}", path.display(), number + 1))?;
        shots.push(input.into_measurement());
    }
    Ok(shots)
}

fn display_analysis(result: &AnalysisResult, units: UnitSystem) {
    let measured = &result.measured;
    let inferred = &result.inferred;

    println!("╔════════════════════════════════════════╗");
    println!("║              SHOT ANALYSIS             ║");
    println!("╠════════════════════════════════════════╣");
    println!("║ MEASURED                               ║");
    println!(
        "║ Ball Speed:  {:>6.1} {:<19}║",
        units.speed_from_metric(measured.ball_speed_meters_per_second),
        units.speed_label()
    );
    println!("║ Launch V/H:  {:>6.1} / {:>6.1} deg       ║", measured.vertical_launch_angle_degrees, measured.horizontal_launch_angle_degrees);
    println!("║ Spin:        {:>6.0} rpm, axis {:>5.1}   ║", measured.total_spin_rpm, measured.spin_axis_degrees);
    println!("╠════════════════════════════════════════╣");
    println!("║ INFERRED                               ║");
    println!("║ Club:        {:<26}║", format!("{} ({:?})", inferred.club_category, inferred.club_confidence));
    println!("║ Shape:       {:<26}║", inferred.shot_shape.to_string());
    println!("║ Back/Side:   {:<26}║", format!("{:.0} / {:+.0} rpm", inferred.backspin_rpm, inferred.sidespin_rpm));
    if let Some(club) = &inferred.club_estimate {
        println!("║ Club Speed:  {:>6.1} m/s (est.)         ║", club.estimated_club_speed_mps);
        println!("║ Face/Path:   {:>+5.1} / {:>+5.1} deg (est.)  ║", club.estimated_face_angle_deg, club.estimated_path_angle_deg);
    }

    println!("╠════════════════════════════════════════╣");
    match &result.estimated_trajectory {
        Some(t) => {
            let d = units.distance_label();
            let h = units.height_label();
            println!("║ ESTIMATED FLIGHT                       ║");
            println!("║ Carry:       {:>8.1} {:<17}║", units.distance_from_metric(t.carry_distance_m), d);
            println!("║ Total:       {:>8.1} {:<17}║", units.distance_from_metric(t.total_distance_m), d);
            println!("║ Offline:     {:>8.1} {:<17}║", units.distance_from_metric(t.offline_distance_m), d);
            println!("║ Apex:        {:>8.1} {:<17}║", units.height_from_metric(t.apex_height_m), h);
            println!("║ Hang Time:   {:>8.2} {:<17}║", t.hang_time_s, "s");
            println!("║ Descent:     {:>8.1} {:<17}║", t.descent_angle_deg, "deg");
        }
        None => println!("║ ESTIMATED FLIGHT: unavailable          ║"),
    }

    println!("╚════════════════════════════════════════╝");

    println!("benchmarks (percentile):");
    for (cohort, entries) in &result.benchmarks.cohorts {
        let cells: Vec<String> = entries
            .iter()
            .map(|(metric, entry)| match entry.percentile() {
                Some(p) => format!("{}={:.0}", short_metric(*metric), p),
                None => format!("{}=n/a", short_metric(*metric)),
            })
            .collect();
        println!("  {:<13}{}", cohort, cells.join(" "));
    }

    println!("coaching:");
    if result.coaching.coaching_cues.is_empty() {
        println!("  Nothing to fix on this one.");
    }
    for (i, cue) in result.coaching.coaching_cues.iter().enumerate() {
        println!("  {}. [{}] {}", i + 1, cue.diagnostic, cue.cue);
    }
    for check in &result.coaching.quick_checks {
        println!("     check: {check}");
    }
    for drill in &result.coaching.practice_drills {
        println!("     drill: {drill}");
    }
    if !result.metadata.flags.is_empty() {
        println!("flags: {}", result.metadata.flags.join(", "));
    }
}

fn short_metric(metric: Metric) -> &'static str {
    match metric {
        Metric::BallSpeed => "spd",
        Metric::VerticalLaunchAngle => "vla",
        Metric::HorizontalLaunchAngle => "hla",
        Metric::TotalSpin => "spin",
        Metric::SpinAxis => "axis",
    }
}

fn display_session(results: &[AnalysisResult]) {
    println!("┌──────┬────────────┬────────────┬──────────┬──────────┐");
    println!("│ Shot │ Club       │ Shape      │ Carry(m) │ Side (m) │");
    println!("├──────┼────────────┼────────────┼──────────┼──────────┤");
    for (i, result) in results.iter().enumerate() {
        let (carry, side) = match &result.estimated_trajectory {
            Some(t) => (format!("{:>8.1}", t.carry_distance_m), format!("{:>8.1}", t.offline_distance_m)),
            None => (format!("{:>8}", "n/a"), format!("{:>8}", "n/a")),
        };
        println!(
            "│ {:>4} │ {:<10} │ {:<10} │ {} │ {} │",
            i + 1,
            result.inferred.club_category.to_string(),
            result.inferred.shot_shape.to_string(),
            carry,
            side
        );
    }
    println!("└──────┴────────────┴────────────┴──────────┴──────────┘");

    let carries: Vec<f64> = results
        .iter()
        .filter_map(|r| r.estimated_trajectory.as_ref().map(|t| t.carry_distance_m))
        .collect();
    if !carries.is_empty() {
        let n = carries.len() as f64;
        let mean = carries.iter().sum::<f64>() / n;
        let std = (carries.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n).sqrt();
        println!("{} shots, mean carry {:.1} m, std dev {:.1} m", results.len(), mean, std);
    } else {
        println!("{} shots, no flights estimated", results.len());
    }
}
