// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use cardsearch_app::{Panel, SearchMode, SearchState, render_html, render_text, view_frame};
use cardsearch_testkit::{CardFaker, sample_catalog};
use config::Config;
use logging::{LogConfig, LogTarget};
use runtime::{CliRuntime, search_once};
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

const DEMO_SEED: u64 = 7345;
const DEMO_EXTRA_RECORDS: usize = 20;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(ExitCode::SUCCESS);
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(ExitCode::SUCCESS);
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `cardsearch --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let interactive = options.once.is_none() && !options.check_only;
    let target = if interactive {
        match config.log_file() {
            Some(path) => LogTarget::File(path),
            None => LogTarget::File(logging::default_log_file()?),
        }
    } else {
        LogTarget::Stderr
    };
    logging::init_logging(&LogConfig::from_verbosity(
        options.verbosity,
        config.log_level()?,
        target,
    ))?;

    let mode = if options.simulate {
        SearchMode::Simulated
    } else if options.demo {
        SearchMode::Networked
    } else {
        config.search_mode()
    };
    let mut runtime = build_runtime(&config, &options, mode)?;
    info!(
        mode = mode.as_str(),
        demo = options.demo,
        config = %options.config_path.display(),
        "starting cardsearch"
    );

    if options.check_only {
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(query) = &options.once {
        let state = search_once(&mut runtime, mode, query);
        return print_once(&mut io::stdout().lock(), &state, options.html);
    }

    let mut state = SearchState::new(mode);
    cardsearch_tui::run_app(&mut state, &mut runtime)?;
    Ok(ExitCode::SUCCESS)
}

fn build_runtime(config: &Config, options: &CliOptions, mode: SearchMode) -> Result<CliRuntime> {
    if options.demo {
        let mut records = sample_catalog();
        records.extend(CardFaker::new(DEMO_SEED).catalog(DEMO_EXTRA_RECORDS));
        debug!(records = records.len(), "serving demo catalog");
        return Ok(CliRuntime::Demo(records));
    }

    match mode {
        SearchMode::Simulated => Ok(CliRuntime::Simulated {
            delay: config.simulated_delay()?,
        }),
        SearchMode::Networked => {
            let client = cardsearch_api::Client::new(config.endpoint(), config.client_options()?)
                .with_context(|| {
                    format!(
                        "invalid [search] config in {}; fix endpoint/timeout values",
                        options.config_path.display()
                    )
                })?;
            debug!(endpoint = client.endpoint(), "searching remote catalog");
            Ok(CliRuntime::Network(client))
        }
    }
}

/// Writes the final frame. An Error panel still prints but fails the run.
fn print_once<W: Write>(out: &mut W, state: &SearchState, html: bool) -> Result<ExitCode> {
    if let Some(notice) = &state.notice {
        bail!("{notice}");
    }

    let frame = view_frame(&state.view);
    let rendered = if html {
        render_html(&frame)
    } else {
        render_text(&frame)
    };
    out.write_all(rendered.as_bytes())
        .and_then(|()| out.flush())
        .context("write search result")?;

    if frame.panel == Panel::Error {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    simulate: bool,
    demo: bool,
    once: Option<String>,
    html: bool,
    verbosity: u8,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        simulate: false,
        demo: false,
        once: None,
        html: false,
        verbosity: 0,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--simulate" => {
                options.simulate = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--once" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--once requires a search term"))?;
                options.once = Some(value.as_ref().to_owned());
            }
            "--html" => {
                options.html = true;
            }
            "-v" | "--verbose" => {
                options.verbosity = options.verbosity.saturating_add(1);
            }
            "-vv" => {
                options.verbosity = options.verbosity.saturating_add(2);
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    if options.simulate && options.demo {
        bail!("--simulate and --demo cannot be combined; pick one executor");
    }
    if options.html && options.once.is_none() {
        bail!("--html only applies to --once output");
    }

    Ok(options)
}

fn print_help() {
    println!("cardsearch");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config and executor setup");
    println!("  --simulate               Answer searches with canned content after a delay");
    println!("  --demo                   Search a built-in catalog instead of the API");
    println!("  --once <term>            Run one search and print the result");
    println!("  --html                   Print --once output as HTML");
    println!("  -v, -vv                  Raise log verbosity to debug or trace");
    println!("  --help                   Show this help");
}
