// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use globalview_app::{AppState, Route};
use globalview_source::{Client, DataSource};
use globalview_testkit::FixtureSource;
use runtime::SourceRuntime;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `globalview --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let start = match &options.start_path {
        Some(path) => Route::parse(path)
            .with_context(|| format!("--path {path:?} is not a route"))?,
        None => config.start_route()?,
    };

    let log_path = config.log_path()?;
    logging::init_logging(&log_path, &logging::filter_directive(config.log_level()))?;

    if options.demo {
        tracing::info!(%start, "starting with demo data");
        return launch(FixtureSource::sample(), start, options.check_only);
    }

    let timeout = config.timeout()?;
    let client = Client::new(config.endpoint(), timeout).with_context(|| {
        format!(
            "invalid [source] config in {}; fix endpoint/timeout values",
            options.config_path.display()
        )
    })?;
    tracing::info!(endpoint = client.endpoint(), ?timeout, %start, "starting");
    launch(client, start, options.check_only)
}

fn launch<S>(source: S, start: Route, check_only: bool) -> Result<()>
where
    S: DataSource + Clone + Send + 'static,
{
    if check_only {
        return Ok(());
    }
    let mut state = AppState::default();
    let mut runtime = SourceRuntime::new(source);
    globalview_tui::run_app(&mut state, &mut runtime, start)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    start_path: Option<String>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        start_path: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--path" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("--path requires a route such as / or /continent/Europe")
                })?;
                options.start_path = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("globalview: world population by continent");
    println!("  --config <path>          Use a specific config path");
    println!("  --path <route>           Start at / or /continent/<name>");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Use the built-in sample countries instead of HTTP");
    println!("  --check                  Validate config, route, source and logging, then exit");
    println!("  --help                   Show this help");
}
