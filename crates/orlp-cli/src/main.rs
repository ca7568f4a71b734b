use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use orlp_models::{catalog, CoefficientTable};
use orlp_solver::{analyze, report_with_tolerance, Model, SolutionStatus, Solver, DEFAULT_TOLERANCE};

#[derive(Parser)]
#[command(name = "orlp")]
#[command(about = "Build, solve, and report small linear programs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Relative tolerance for consistency checks in reports
    #[arg(long, global = true, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in scenarios
    List,
    /// Print a scenario's coefficient table
    Show {
        /// Scenario name
        scenario: String,
    },
    /// Solve a built-in scenario
    Solve {
        /// Scenario name
        scenario: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
        /// Show shadow prices and binding constraints
        #[arg(short, long)]
        analysis: bool,
    },
    /// Solve a coefficient table stored as JSON
    File {
        /// The JSON file containing the table
        file: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
        /// Show shadow prices and binding constraints
        #[arg(short, long)]
        analysis: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::List => {
            for scenario in catalog::SCENARIOS {
                println!("  {:24} {}", scenario.name, scenario.description);
            }
        }
        Commands::Show { scenario } => {
            let found = match catalog::find(&scenario) {
                Ok(s) => s,
                Err(e) => fail(&e.to_string()),
            };
            let table = match found.table() {
                Ok(t) => t,
                Err(e) => fail(&format!("Model error: {}", e)),
            };
            println!("{}: {}", found.name, found.description);
            println!();
            print!("{}", table);
        }
        Commands::Solve { scenario, format, analysis } => {
            let table = match catalog::find(&scenario).and_then(|s| s.table()) {
                Ok(t) => t,
                Err(e) => fail(&e.to_string()),
            };
            run(&scenario, &table, format, analysis, cli.tolerance);
        }
        Commands::File { file, format, analysis } => {
            let source = match std::fs::read_to_string(&file) {
                Ok(s) => s,
                Err(e) => fail(&format!("Error reading file: {}", e)),
            };
            let table: CoefficientTable = match serde_json::from_str(&source) {
                Ok(t) => t,
                Err(e) => fail(&format!("Parse error: {}", e)),
            };
            run(&file.display().to_string(), &table, format, analysis, cli.tolerance);
        }
    }
}

fn run(name: &str, table: &CoefficientTable, format: Format, analysis: bool, tolerance: f64) {
    let model: Model = match table.to_model() {
        Ok(m) => m,
        Err(e) => fail(&format!("Model error: {}", e)),
    };

    let solver = Solver::new();
    let solution = solver.solve(&model);
    let report = report_with_tolerance(&model, &solution, tolerance);
    let details = if analysis {
        analyze(&solver, &model, &solution)
    } else {
        None
    };

    match format {
        Format::Json => {
            let output = serde_json::json!({
                "model": name,
                "report": report,
                "analysis": details,
            });
            match serde_json::to_string_pretty(&output) {
                Ok(s) => println!("{}", s),
                Err(e) => fail(&format!("Error encoding output: {}", e)),
            }
        }
        Format::Pretty => {
            println!("Model: {}", name);
            println!();
            print!("{}", table);
            println!();
            print!("{}", report);

            if let Some(details) = &details {
                println!();
                println!("Analysis:");
                println!();
                if !details.binding_constraints.is_empty() {
                    println!("Binding constraints:");
                    for name in &details.binding_constraints {
                        println!("  - {}", name);
                    }
                    println!();
                }
                println!("Shadow prices:");
                for sp in &details.shadow_prices {
                    match sp.value {
                        Some(v) => println!("  {:30} {:10.4}", sp.constraint, v),
                        None => println!("  {:30} {:>10}", sp.constraint, "n/a"),
                    }
                    println!("    {}", sp.interpretation);
                }
            }
        }
    }

    if report.status != SolutionStatus::Optimal {
        std::process::exit(1);
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
