use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use log::LevelFilter;

use jsonfilter::config::Config;
use jsonfilter::file::loader::{load_document, InputSource};
use jsonfilter::jsonpath::Query;
use jsonfilter::output::{write_result, OutputMode};

const EXAMPLES: &str = "\
Examples:
  Display the first IPv4 address on lan:
    ifstatus lan | jsonfilter -e '@[\"ipv4-address\"][0].address'

  Find the first interface which is up:
    ubus call network.interface dump | jsonfilter -e '@.interface[@.up=true].interface'

  Export traffic counters for shell eval:
    devstatus br-lan | jsonfilter -e 'RX=@.statistics.rx_bytes' -e 'TX=@.statistics.tx_bytes'";

/// jsonfilter - Select values from JSON documents
#[derive(Parser)]
#[command(name = "jsonfilter")]
#[command(version)]
#[command(about = "Select values from JSON documents and export them for shell eval", long_about = None)]
#[command(arg_required_else_help = true, after_help = EXAMPLES)]
struct Cli {
    /// JSON file to parse ("-" for stdin, the default)
    #[arg(short, long, value_name = "FILE", conflicts_with = "string")]
    input: Option<PathBuf>,

    /// JSON string to parse
    #[arg(short, long, value_name = "JSON")]
    string: Option<String>,

    /// Print the value matched by PATTERN, or serialize it for eval with VAR=PATTERN
    #[arg(short = 'e', long = "expr", value_name = "PATTERN")]
    expr: Vec<String>,

    /// Print the type of the value matched by PATTERN
    #[arg(short = 't', long = "type", value_name = "PATTERN")]
    type_expr: Vec<String>,

    /// Collect every JSON value in the input into one array, useful for JSON logs
    #[arg(short, long)]
    array: bool,

    /// Field separator for exported key and index lists
    #[arg(short = 'F', long, value_name = "SEPARATOR")]
    separator: Option<String>,

    /// Quiet, no errors are printed
    #[arg(short, long)]
    quiet: bool,
}

/// Returns `-e` and `-t` patterns in the order they appeared on the command line.
fn ordered_queries(matches: &ArgMatches) -> Vec<(OutputMode, String)> {
    let mut queries = Vec::new();

    for (id, mode) in [("expr", OutputMode::Value), ("type_expr", OutputMode::Type)] {
        if let (Some(indices), Some(values)) =
            (matches.indices_of(id), matches.get_many::<String>(id))
        {
            queries.extend(
                indices
                    .zip(values)
                    .map(|(idx, pattern)| (idx, mode, pattern.clone())),
            );
        }
    }

    queries.sort_by_key(|(idx, _, _)| *idx);
    queries
        .into_iter()
        .map(|(_, mode, pattern)| (mode, pattern))
        .collect()
}

fn init_logging(config: &Config, quiet: bool) {
    let env = env_logger::Env::default().default_filter_or(config.log_level.as_str());
    let mut builder = env_logger::Builder::from_env(env);
    builder.format_timestamp(None);
    if quiet {
        builder.filter_level(LevelFilter::Off);
    }
    // A logger may already be installed when embedded; keep it.
    let _ = builder.try_init();
}

fn main() -> ExitCode {
    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    let quiet = cli.quiet || config.quiet;
    init_logging(&config, quiet);
    if let Some(err) = config_error {
        log::warn!("{:#}; using defaults", err);
    }

    let queries = ordered_queries(&matches);

    match run(cli, &config, quiet, &queries) {
        Ok(code) => code,
        Err(err) => {
            if !quiet {
                eprintln!("{:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(
    cli: Cli,
    config: &Config,
    quiet: bool,
    queries: &[(OutputMode, String)],
) -> Result<ExitCode> {
    let source = InputSource::from_options(cli.input, cli.string);
    let array_mode = cli.array || config.array_mode;
    let separator = cli
        .separator
        .filter(|sep| !sep.is_empty())
        .unwrap_or_else(|| config.separator.clone());

    let document = match load_document(&source, array_mode) {
        Ok(document) => document,
        Err(err) => {
            if !quiet {
                eprintln!("{}", err);
            }
            return Ok(ExitCode::from(err.exit_code()));
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = false;

    // Each pattern is independent: a bad or unmatched one doesn't stop the rest.
    for (mode, pattern) in queries {
        let query: Query = match pattern.parse() {
            Ok(query) => query,
            Err(err) => {
                if !quiet {
                    eprintln!("{}", err.report(pattern));
                }
                failed = true;
                continue;
            }
        };

        match query.evaluate(&document) {
            Some(value) => write_result(&mut out, *mode, query.label(), value, &separator)
                .context("Failed to write output")?,
            None => {
                log::info!("no match for {}", pattern);
                failed = true;
            }
        }
    }

    out.flush().context("Failed to write output")?;

    Ok(if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}
