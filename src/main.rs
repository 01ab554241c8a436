use clap::Parser;
use multicam_recorder::cli::{handle_config_action, run_fleet, Args, Command};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.command {
        Some(Command::Config { action }) => handle_config_action(action, args.run.config.as_deref()),
        Some(Command::Run(run)) => run_fleet(run),
        None => run_fleet(args.run),
    }
}
