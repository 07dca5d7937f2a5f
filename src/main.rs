use proctree::commands::{route, tree, Cli, Commands};
use proctree::error::ProctreeError;
use proctree::router::demo_routes;
use proctree::utils::config_paths::Settings;
use proctree::utils::logger::init_logger;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let settings = match Settings::load_from(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => return report_error(&err),
    };

    let log_level = cli.log_level.as_deref().or(settings.log_level.as_deref());
    if let Err(err) = init_logger(log_level, cli.log_file.clone()) {
        eprintln!("Failed to initialize logging: {err:#}");
        return ExitCode::from(1);
    }

    match main_impl(&cli, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_broken_pipe() => {
            tracing::debug!("stdout closed early");
            ExitCode::SUCCESS
        }
        Err(err) => report_error(&err),
    }
}

fn main_impl(cli: &Cli, settings: &Settings) -> Result<(), ProctreeError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.resolved_command() {
        Commands::Tree(args) => {
            let cycles = tree::run(&args, settings, &mut out)?;
            out.flush()?;
            for cycle in cycles {
                eprintln!(
                    "warning: {}",
                    ProctreeError::from(cycle).user_message()
                );
            }
        }
        Commands::Dispatch { verb, path } => {
            route::run_dispatch(&demo_routes(), &verb, &path, &mut out)?;
        }
        Commands::Routes => route::run_routes(&demo_routes(), &mut out)?,
    }

    Ok(())
}

fn report_error(err: &ProctreeError) -> ExitCode {
    tracing::debug!(category = err.category().display_name(), "{}", err);
    eprintln!("Error: {}", err.user_message());
    if let Some(hint) = err.hint() {
        eprintln!("Hint: {hint}");
    }
    ExitCode::from(err.exit_code())
}
