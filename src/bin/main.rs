// SPDX-License-Identifier: AGPL-3.0-or-later
//! CLI tool for cpuisfast

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use colored::Colorize;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use cpuisfast::{store, BenchConfig, Config, Report};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "cpuisfast")]
#[command(about = "Community CPU benchmark: loop and addition throughput, recorded locally or submitted", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (json or text)
    #[arg(short, long, default_value = "text", global = true)]
    format: String,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Run the benchmark and print the result (default)
    Run {
        #[command(flatten)]
        bench: BenchArgs,
    },
    /// Run the benchmark and append the result to the CSV collection file
    Record {
        #[command(flatten)]
        bench: BenchArgs,

        /// CSV file to append to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the benchmark and submit the result to the collection endpoint
    #[cfg(feature = "remote")]
    Submit {
        #[command(flatten)]
        bench: BenchArgs,

        /// Collection endpoint URL
        #[arg(long)]
        url: Option<String>,
    },
    /// Render collected CSV rows into the HTML results page
    Render {
        /// CSV collection file
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// HTML template with a single %s placeholder
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Page to write
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a sample configuration file
    Config,
}

/// Benchmark overrides shared by the benchmarking subcommands
#[cfg(feature = "cli")]
#[derive(Args, Default)]
struct BenchArgs {
    /// Loop length of one timed run
    #[arg(long)]
    iterations: Option<u64>,

    /// Timed runs per benchmark; the fastest is kept
    #[arg(long)]
    repeats: Option<u32>,
}

#[cfg(feature = "cli")]
impl BenchArgs {
    fn apply(&self, base: BenchConfig) -> BenchConfig {
        BenchConfig {
            iterations: self.iterations.unwrap_or(base.iterations),
            repeats: self.repeats.unwrap_or(base.repeats),
        }
    }
}

#[cfg(feature = "cli")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::init();

    let config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    };
    let json = match cli.format.as_str() {
        "json" => true,
        "text" => false,
        other => {
            eprintln!("Unknown format '{}'. Supported: text, json", other);
            return Err("Invalid format".into());
        }
    };

    match &cli.command {
        Some(Commands::Run { bench }) => {
            let report = benchmark(bench.apply(config.bench), json)?;
            print_report(&report, json, JsonMap::new())?;
        }
        None => {
            let report = benchmark(config.bench, json)?;
            print_report(&report, json, JsonMap::new())?;
        }

        Some(Commands::Record { bench, output }) => {
            let report = benchmark(bench.apply(config.bench), json)?;
            let path = output.clone().unwrap_or(config.record.path);
            handle_record(&report, &path, json)?;
        }

        #[cfg(feature = "remote")]
        Some(Commands::Submit { bench, url }) => {
            let report = benchmark(bench.apply(config.bench), json)?;
            let mut submit = config.submit;
            if let Some(url) = url {
                submit.url = url.clone();
            }
            handle_submit(&report, submit, json)?;
        }

        Some(Commands::Render {
            data,
            template,
            output,
        }) => {
            let data = data.clone().unwrap_or(config.render.data);
            let template = template.clone().unwrap_or(config.render.template);
            let output = output.clone().unwrap_or(config.render.output);
            let count = cpuisfast::render::render_site(&data, &template, &output)?;
            println!("{}", count);
            if !json {
                println!(
                    "{} {}",
                    "Rendered page:".white().bold(),
                    output.display().to_string().green()
                );
            }
        }

        Some(Commands::Config) => {
            print!("{}", Config::sample_toml());
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn benchmark(bench: BenchConfig, json: bool) -> Result<Report, Box<dyn std::error::Error>> {
    if !json {
        eprintln!(
            "{} {} iterations, best of {} runs...",
            "[*]".cyan(),
            bench.iterations,
            bench.repeats
        );
    }
    Ok(cpuisfast::run(&bench)?)
}

#[cfg(feature = "cli")]
type JsonMap = serde_json::Map<String, serde_json::Value>;

#[cfg(feature = "cli")]
fn json_object(report: &Report, extra: JsonMap) -> serde_json::Result<JsonMap> {
    let mut object = JsonMap::new();
    object.insert("result".into(), serde_json::to_value(&report.result)?);
    object.insert("measurement".into(), serde_json::to_value(&report.measurement)?);
    object.extend(extra);
    Ok(object)
}

/// Print the report; in JSON mode `extra` is merged into the single output object.
#[cfg(feature = "cli")]
fn print_report(report: &Report, json: bool, extra: JsonMap) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&json_object(report, extra)?)?);
        return Ok(());
    }

    let lines = report.summary_lines();
    let last = lines.len().saturating_sub(1);
    for (i, line) in lines.iter().enumerate() {
        if i == 0 || i == last {
            println!("{}", line.as_str().bold());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn handle_record(
    report: &Report,
    path: &std::path::Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let stamped = report.result.stamped();
    store::append_result(path, &stamped)?;

    let mut extra = JsonMap::new();
    extra.insert("appended_to".into(), path.display().to_string().into());
    print_report(report, json, extra)?;
    if !json {
        println!("{} {}", "[+] Result appended to".green(), path.display());
        println!("Done, please push then open new Pull Request to submit your result.");
    }
    Ok(())
}

#[cfg(all(feature = "cli", feature = "remote"))]
fn handle_submit(
    report: &Report,
    config: cpuisfast::config::SubmitConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let results_page = config.results_page.clone();
    if !json {
        print_report(report, json, JsonMap::new())?;
    }

    let outcome = cpuisfast::submit::submit_with_notice(config, &report.result, &mut std::io::stderr());
    if json {
        let mut extra = JsonMap::new();
        if let Ok(reply) = &outcome {
            extra.insert("response".into(), reply.clone().into());
        }
        print_report(report, json, extra)?;
    }

    let reply = outcome?;
    if !json {
        println!("{}", reply);
        println!("DONE, visit {} to see result", results_page.cyan());
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI features not enabled. Please compile with --features cli");
    std::process::exit(1);
}
