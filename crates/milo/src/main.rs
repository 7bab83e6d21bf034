use clap::Parser;
use milo::{
    format_token, parse_source, read_source, render_parse_error, run_source, tokenize_source,
    RunOptions,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "milo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Milo language interpreter", long_about = None)]
struct Args {
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the token stream instead of running
    #[arg(long = "tokens", conflicts_with_all = ["ast", "json"])]
    tokens: bool,

    /// Print the parsed program in canonical form instead of running
    #[arg(long = "ast", conflicts_with = "json")]
    ast: bool,

    /// Print the run report as JSON
    #[arg(long = "json")]
    json: bool,

    /// Skip evaluation when the script has parse errors
    #[arg(long = "strict")]
    strict: bool,

    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Log to stderr, filtered by `MILO_LOG` (default `warn`); `-v` forces `debug`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("MILO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let source = match read_source(&args.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let name = args.file.display().to_string();

    if args.tokens {
        for token in tokenize_source(&source) {
            println!("{}", format_token(&token));
        }
        return ExitCode::SUCCESS;
    }

    if args.ast {
        let parsed = parse_source(&name, &source);
        println!("{}", parsed.program);
        for err in parsed.errors.iter() {
            eprintln!("{}", render_parse_error(err));
        }
        return if parsed.is_ok() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    let options = RunOptions {
        evaluate_on_parse_error: !args.strict,
    };
    let report = run_source(&name, &source, &options);

    if args.json {
        match report.to_json() {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: failed to serialize report: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for line in &report.output {
            println!("{line}");
        }
        for diagnostic in report.diagnostics() {
            eprintln!("{diagnostic}");
        }
    }

    if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
