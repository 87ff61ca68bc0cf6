//! Command-line host for the modular floor-plan core (native).

mod error;
mod export;

use clap::{Parser, Subcommand, ValueEnum};
use error::CliError;
use modplan_core::{Building, CoordinateTransform, EditorConfig, ElementRef, build_schedule, copy_group, create_group};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "modplan")]
#[command(about = "Check modular building plans and print their module schedule")]
#[command(version)]
struct Cli {
    /// Editor configuration (JSON); defaults apply when omitted
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the deduplicated module schedule
    Schedule {
        /// Building plan (JSON)
        plan: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Write to a file instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Report invariant violations on every floor
    Check {
        /// Building plan (JSON)
        plan: PathBuf,
    },
    /// Group every ungrouped element of a floor and write the updated plan
    Group {
        /// Building plan (JSON)
        plan: PathBuf,

        /// Floor index, bottom floor is 0
        #[arg(long, default_value_t = 0)]
        floor: usize,

        #[arg(long, default_value = "Group")]
        name: String,

        /// Also place an offset copy of the new group
        #[arg(long)]
        copy: bool,

        /// Write to a file instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Csv,
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, CliError> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::FileCreate {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig, CliError> {
    let config = match path {
        Some(path) => EditorConfig::from_file(path)?,
        None => EditorConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Schedule { plan, format, output } => {
            let building = Building::from_file(&plan)?;
            let schedule = build_schedule(&building);
            log::info!("Loaded {} with {} distinct module(s)", plan.display(), schedule.len());

            let mut writer = open_output(output.as_deref())?;
            match format {
                Format::Json => export::write_json(&schedule, &mut writer)?,
                Format::Csv => export::write_csv(&schedule, &mut writer)?,
            }
            writer.flush()?;
        }
        Command::Check { plan } => {
            let building = Building::from_file(&plan)?;
            let mut total = 0;
            for floor in &building.floors {
                for violation in floor.check_invariants() {
                    println!("{}: {violation}", floor.name);
                    total += 1;
                }
            }
            if total > 0 {
                return Err(CliError::Violations(total));
            }
            println!("{}: {} floor(s), no violations", plan.display(), building.floors.len());
        }
        Command::Group {
            plan,
            floor,
            name,
            copy,
            output,
        } => {
            let mut building = Building::from_file(&plan)?;
            let count = building.floors.len();
            let target = building
                .floors
                .get_mut(floor)
                .ok_or(CliError::FloorOutOfRange { index: floor, count })?;

            let free: Vec<ElementRef> = target
                .z_order
                .iter()
                .copied()
                .filter(|&r| target.group_tag(r) == Some(None))
                .collect();
            let group_id = create_group(target, &free, name)?;
            log::info!("Created group {group_id} on floor {}", target.name);

            if copy {
                let transform = CoordinateTransform::from_config(&config);
                let copy_id = copy_group(target, &transform, &config, group_id)?;
                log::info!("Placed copy {copy_id}");
            }

            let mut writer = open_output(output.as_deref())?;
            writeln!(writer, "{}", building.to_json()?)?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
