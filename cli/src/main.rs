mod config;
mod make;
mod test_runner;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

use config::Config;
use makedown::{GenerateError, Makefile};

const SUBCOMMANDS: &[&str] = &["generate", "targets", "run", "test", "help"];

#[derive(Parser)]
#[command(name = "makedown", version, about = "Generate and run Makefiles written in Markdown")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ./makedown.toml if present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write the generated Makefile
    Generate(GenerateArgs),

    /// List the targets declared by a document
    Targets(InputArgs),

    /// Generate a Makefile and run make with it
    Run(RunArgs),

    /// Run .test.md golden files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct InputArgs {
    /// Markdown document (default: first of the configured files that exists)
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[derive(clap::Args)]
struct GenerateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output file (default: from config, else stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct RunArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Targets passed to make
    targets: Vec<String>,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.md file or directory containing them
    path: PathBuf,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    let args = inject_run(std::env::args().collect());
    let cli = Cli::parse_from(&args);
    init_logging(cli.verbose);

    // Bare `makedown` runs make's default goal.
    let command = cli.command.unwrap_or(Command::Run(RunArgs {
        input: InputArgs { file: None },
        targets: Vec::new(),
    }));

    match command {
        Command::Test(args) => do_test(&args, cli.no_color),
        Command::Generate(args) => {
            do_generate(&load_config(cli.config.as_deref()), args, cli.no_color)
        }
        Command::Targets(args) => {
            do_targets(&load_config(cli.config.as_deref()), args, cli.no_color)
        }
        Command::Run(args) => do_run(&load_config(cli.config.as_deref()), args, cli.no_color),
    }
}

/// If the first positional argument is not a known subcommand, insert `run`
/// so `makedown build` works like `makedown run build`.
fn inject_run(mut args: Vec<String>) -> Vec<String> {
    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        if arg == "--config" {
            i += 2;
            continue;
        }
        if arg.starts_with('-') {
            i += 1;
            continue;
        }
        if !SUBCOMMANDS.contains(&arg) {
            args.insert(i, "run".to_string());
        }
        break;
    }
    args
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn die(msg: &str) -> ! {
    eprintln!("error: {}", msg);
    process::exit(1);
}

fn load_config(path: Option<&Path>) -> Config {
    Config::load(path).unwrap_or_else(|e| die(&e))
}

/// Read and convert the selected document, reporting failures and exiting.
fn load(config: &Config, input: &InputArgs, no_color: bool) -> (PathBuf, Makefile) {
    let path = config
        .resolve_input(input.file.as_deref())
        .unwrap_or_else(|e| die(&e));
    let bytes = std::fs::read(&path)
        .unwrap_or_else(|e| die(&format!("cannot read '{}': {}", path.display(), e)));

    let name = path.display().to_string();
    match makedown::generate_from_markdown(&name, &bytes) {
        Ok(made) => (path, made),
        Err(error) => {
            report(&name, &bytes, &error, no_color);
            process::exit(1);
        }
    }
}

fn report(name: &str, source: &[u8], error: &GenerateError, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let mut files = SimpleFiles::new();
    let file_id = files.add(name.to_string(), String::from_utf8_lossy(source).into_owned());

    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    let diagnostic = error.to_diagnostic(file_id);
    if term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic).is_err() {
        eprintln!("error: {}", error);
    }
}

fn do_test(args: &TestArgs, no_color: bool) {
    if args.list_categories {
        test_runner::list_categories(&args.path);
        return;
    }
    let exit_code = test_runner::run_tests(&args.path, no_color, &args.category);
    process::exit(exit_code);
}

fn do_generate(config: &Config, args: GenerateArgs, no_color: bool) {
    let (path, made) = load(config, &args.input, no_color);

    match args.output.or_else(|| config.output.clone()) {
        Some(output) => {
            std::fs::write(&output, &made.text).unwrap_or_else(|e| {
                die(&format!("cannot write {}: {}", output.display(), e))
            });
            eprintln!(
                "generated {} -> {} ({} targets)",
                path.display(),
                output.display(),
                made.targets.len()
            );
        }
        None => print!("{}", made.text),
    }
}

fn do_targets(config: &Config, args: InputArgs, no_color: bool) {
    let (_, made) = load(config, &args, no_color);
    for target in &made.targets {
        println!("{}", target);
    }
}

fn do_run(config: &Config, args: RunArgs, no_color: bool) {
    let (path, made) = load(config, &args.input, no_color);
    let workdir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let code = make::run_make(&config.make, &made.text, workdir, &args.targets)
        .unwrap_or_else(|e| die(&e));
    process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_target_becomes_run() {
        assert_eq!(
            inject_run(argv(&["makedown", "build", "test"])),
            argv(&["makedown", "run", "build", "test"])
        );
    }

    #[test]
    fn subcommands_are_left_alone() {
        let args = argv(&["makedown", "generate", "-o", "Makefile"]);
        assert_eq!(inject_run(args.clone()), args);
    }

    #[test]
    fn config_value_is_not_a_target() {
        assert_eq!(
            inject_run(argv(&["makedown", "--config", "m.toml", "clean"])),
            argv(&["makedown", "--config", "m.toml", "run", "clean"])
        );
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::parse_from(argv(&["makedown", "--no-color"]));
        assert!(cli.no_color);
        assert!(cli.command.is_none());
    }

    #[test]
    fn flags_only() {
        let args = argv(&["makedown", "--version"]);
        assert_eq!(inject_run(args.clone()), args);
    }

    #[test]
    fn cli_parses_run_targets() {
        let cli = Cli::parse_from(inject_run(argv(&["makedown", "-v", "all"])));
        assert!(cli.verbose);
        match cli.command {
            Some(Command::Run(args)) => {
                assert_eq!(args.targets, vec!["all"]);
                assert!(args.input.file.is_none());
            }
            _ => panic!("expected run"),
        }
    }
}
