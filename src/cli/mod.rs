mod handlers;

use crate::config::{self, PluginConfig};
use crate::error::Result;
use clap::{Arg, ArgAction, Command, ValueEnum};
use std::time::Instant;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub struct Cli {
    config: PluginConfig,
    start_time: Instant,
}

impl Cli {
    pub fn new() -> Self {
        Self {
            config: PluginConfig::default(),
            start_time: Instant::now(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.start_time = Instant::now();
        let matches = self.build_cli().get_matches();

        self.setup_logging(matches.get_count("verbose"));

        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }

        match matches.subcommand() {
            Some(("build", sub_matches)) => handlers::handle_build_command(self, sub_matches),
            Some(("check", sub_matches)) => handlers::handle_check_command(self, sub_matches),
            _ => {
                println!("No subcommand specified. Use --help for usage information.");
                Ok(())
            }
        }
    }

    fn build_cli(&self) -> Command {
        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path (.toml or .json)")
                    .action(ArgAction::Set)
                    .global(true),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .action(ArgAction::Count)
                    .global(true),
            )
            .subcommand(
                Command::new("build")
                    .about("Compile a project's stylesheets into scoped CSS modules")
                    .arg(Arg::new("project").help("Project directory").required(true).index(1))
                    .arg(Arg::new("output").short('o').long("output").value_name("DIR").help("Output directory for emitted artifacts").default_value("build"))
                    .arg(Arg::new("include").short('I').long("include").value_name("DIR").help("Add an include directory").action(ArgAction::Append))
                    .arg(Arg::new("stats").long("stats").help("Show detailed build statistics").action(ArgAction::SetTrue))
                    .arg(Arg::new("format").short('f').long("format").value_parser(clap::value_parser!(OutputFormat)).default_value("text").help("Statistics output format"))
                    .arg(Arg::new("watch").short('w').long("watch").help("Watch for file changes and rebuild").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("check")
                    .about("Run the pipeline without writing artifacts and report diagnostics")
                    .arg(Arg::new("project").help("Project directory").required(true).index(1)),
            )
    }

    fn setup_logging(&self, verbose_count: u8) {
        let log_level = match verbose_count {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(log_level)
            .format_timestamp_secs()
            .init();
    }

    /// Effective configuration for one invocation: the loaded config file
    /// plus command-line include directories.
    pub fn build_config(&self, matches: &clap::ArgMatches) -> PluginConfig {
        let mut config = self.config.clone();
        if let Some(include_dirs) = matches.try_get_many::<String>("include").ok().flatten() {
            config.explicit_includes.extend(include_dirs.cloned());
        }
        config
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}
