//! cef-embed - Main Entry Point
//!
//! Command-line front end for inspecting and generating CEF settings, and the
//! sub-process entry point when built with the `libcef` feature.

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cef_embed::{
    config::{CliArgs, Settings},
    types::{Color, LogSeverity},
    NAME, VERSION,
};

/// Build the CLI command parser
fn build_cli() -> Command {
    Command::new(NAME)
        .version(VERSION)
        .author("cef-embed Team")
        .about("Inspect and generate Chromium Embedded Framework settings")
        .long_about(
            "cef-embed loads CEF initialization settings from defaults, a\n\
             configuration file, CEF_EMBED_* environment variables and command\n\
             line overrides, converts them into the native cef_settings_t record\n\
             and prints what the native layer would receive.",
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress output except errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .global(true),
        )
        .subcommand(settings_command())
        .subcommand(
            Command::new("init-config")
                .about("Write the default settings to a TOML or JSON file")
                .arg(
                    Arg::new("file")
                        .value_name("FILE")
                        .help("Destination file; the extension selects the format")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("force")
                        .short('f')
                        .long("force")
                        .help("Overwrite an existing file")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("helper")
                .about("Run as a CEF sub-process (requires the libcef feature)")
                .arg(
                    Arg::new("args")
                        .value_name("ARGS")
                        .help("Arguments forwarded by the browser process")
                        .num_args(0..)
                        .trailing_var_arg(true)
                        .allow_hyphen_values(true),
                ),
        )
}

fn settings_command() -> Command {
    Command::new("settings")
        .about("Load, validate and convert settings, then print the native record")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to configuration file (TOML or JSON)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .help("Output format")
                .value_parser(["json", "toml"])
                .default_value("json"),
        )
        .arg(
            Arg::new("single-process")
                .long("single-process")
                .help("Run the browser and renderer in the same process")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-sandbox")
                .long("no-sandbox")
                .help("Disable the sub-process sandbox")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("windowless")
                .long("windowless")
                .help("Enable windowless (off-screen) rendering")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("cache-path")
                .long("cache-path")
                .value_name("PATH")
                .help("Directory for cache data")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("user-agent")
                .long("user-agent")
                .value_name("STRING")
                .help("Custom user agent string"),
        )
        .arg(
            Arg::new("locale")
                .long("locale")
                .value_name("LOCALE")
                .help("Locale string, e.g. en-US"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .help("Debug log file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log-severity")
                .long("log-severity")
                .value_name("LEVEL")
                .help("Native log severity: default, verbose, info, warning, error or disable")
                .value_parser(|s: &str| s.parse::<LogSeverity>()),
        )
        .arg(
            Arg::new("remote-debugging-port")
                .long("remote-debugging-port")
                .value_name("PORT")
                .help("Remote debugging port (0 disables)")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("background-color")
                .long("background-color")
                .value_name("COLOR")
                .help("Background color as #AARRGGBB or #RRGGBB")
                .value_parser(|s: &str| s.parse::<Color>()),
        )
}

/// Parse `settings` subcommand arguments into CliArgs struct
fn parse_cli_args(matches: &ArgMatches) -> CliArgs {
    let mut args = CliArgs::default();

    args.config_file = matches.get_one::<PathBuf>("config").cloned();
    args.cache_path = matches.get_one::<PathBuf>("cache-path").cloned();
    args.user_agent = matches.get_one::<String>("user-agent").cloned();
    args.locale = matches.get_one::<String>("locale").cloned();
    args.log_file = matches.get_one::<PathBuf>("log-file").cloned();
    args.log_severity = matches.get_one::<LogSeverity>("log-severity").copied();
    args.remote_debugging_port = matches.get_one::<u16>("remote-debugging-port").copied();
    args.background_color = matches.get_one::<Color>("background-color").copied();

    // Flags only override when given
    if matches.get_flag("single-process") {
        args.single_process = Some(true);
    }
    if matches.get_flag("no-sandbox") {
        args.no_sandbox = Some(true);
    }
    if matches.get_flag("windowless") {
        args.windowless_rendering_enabled = Some(true);
    }

    args
}

/// Initialize the tracing/logging subsystem
fn init_tracing(verbosity: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbosity {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(filter)
        .init();
}

/// Load settings, convert them and render the native record.
fn render_settings(args: &CliArgs, format: &str) -> Result<String> {
    let settings = args
        .load_settings()
        .context("Failed to load configuration")?;
    render_native(&settings, format)
}

fn render_native(settings: &Settings, format: &str) -> Result<String> {
    let native = settings.to_native();
    let snapshot = native.snapshot();
    native.release();
    debug!(size = snapshot.size, "converted settings record");

    let output = match format {
        "toml" => toml::to_string_pretty(&snapshot).context("Failed to render TOML")?,
        _ => serde_json::to_string_pretty(&snapshot).context("Failed to render JSON")?,
    };
    Ok(output)
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Settings::default()
        .to_file(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote default settings");
    Ok(())
}

/// True when CEF launched this executable as one of its sub-processes.
///
/// CEF starts renderer, GPU and utility processes with a `--type=<kind>`
/// switch and no subcommand.
fn is_subprocess_launch<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    args.into_iter()
        .skip(1)
        .any(|arg| arg.as_ref().to_str().is_some_and(|arg| arg.starts_with("--type=")))
}

#[cfg(feature = "libcef")]
fn run_helper() -> Result<i32> {
    let args = cef_embed::MainArgs::from_env().context("Invalid process arguments")?;
    match cef_embed::app::execute_process(&args) {
        Some(code) => Ok(code),
        None => bail!("helper was started without a sub-process type"),
    }
}

#[cfg(not(feature = "libcef"))]
fn run_helper() -> Result<i32> {
    bail!("{NAME} was built without the libcef feature; the helper is unavailable")
}

/// Main application entry point
fn main() -> Result<()> {
    if is_subprocess_launch(std::env::args_os()) {
        let code = run_helper()?;
        std::process::exit(code);
    }

    let matches = build_cli().get_matches();

    let verbosity = matches.get_count("verbose");
    let quiet = matches.get_flag("quiet");
    init_tracing(verbosity, quiet);

    match matches.subcommand() {
        Some(("settings", sub)) => {
            let args = parse_cli_args(sub);
            let format = sub
                .get_one::<String>("format")
                .map(String::as_str)
                .unwrap_or("json");
            println!("{}", render_settings(&args, format)?);
        }
        Some(("init-config", sub)) => {
            let Some(path) = sub.get_one::<PathBuf>("file") else {
                bail!("missing destination file");
            };
            init_config(path, sub.get_flag("force"))?;
            if !quiet {
                println!("Wrote default settings to {}", path.display());
            }
        }
        Some(("helper", _)) => {
            let code = run_helper()?;
            std::process::exit(code);
        }
        _ => unreachable!("a subcommand is required"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_matches(argv: &[&str]) -> ArgMatches {
        let matches = build_cli().try_get_matches_from(argv).unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "settings");
        sub.clone()
    }

    #[test]
    fn test_cli_requires_subcommand() {
        let result = build_cli().try_get_matches_from(["cef-embed"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_settings_parsing() {
        let sub = settings_matches(&[
            "cef-embed",
            "settings",
            "--log-severity",
            "disable",
            "--remote-debugging-port",
            "9222",
            "--background-color",
            "#FF0A141E",
            "--no-sandbox",
        ]);

        let args = parse_cli_args(&sub);

        assert_eq!(args.log_severity, Some(LogSeverity::Disable));
        assert_eq!(args.remote_debugging_port, Some(9222));
        assert_eq!(args.background_color, Some(Color::from_argb(0xFF0A_141E)));
        assert_eq!(args.no_sandbox, Some(true));
        assert_eq!(args.single_process, None);
    }

    #[test]
    fn test_cli_rejects_bad_values() {
        let bad_color =
            build_cli().try_get_matches_from(["cef-embed", "settings", "--background-color", "red"]);
        assert!(bad_color.is_err());

        let bad_format =
            build_cli().try_get_matches_from(["cef-embed", "settings", "--format", "yaml"]);
        assert!(bad_format.is_err());
    }

    #[test]
    fn test_cli_global_flags_conflict() {
        let result = build_cli().try_get_matches_from(["cef-embed", "-v", "-q", "settings"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_helper_accepts_native_arguments() {
        let matches = build_cli()
            .try_get_matches_from(["cef-embed", "helper", "--type=renderer", "--lang=en-US"])
            .unwrap();
        assert_eq!(matches.subcommand_name(), Some("helper"));
    }

    #[test]
    fn test_subprocess_launch_detection() {
        assert!(is_subprocess_launch([
            "cef-embed",
            "--type=renderer",
            "--lang=en-US",
            "--renderer-client-id=3",
        ]));
        assert!(is_subprocess_launch(["cef-embed", "--lang=en-US", "--type=gpu-process"]));

        assert!(!is_subprocess_launch(["cef-embed", "settings", "--no-sandbox"]));
        assert!(!is_subprocess_launch(["cef-embed"]));
        // The program name itself is never a switch
        assert!(!is_subprocess_launch(["--type=renderer"]));
    }

    #[test]
    fn test_subprocess_command_line_bypasses_subcommands() {
        let argv = ["cef-embed", "--type=renderer", "--lang=en-US"];
        assert!(build_cli().try_get_matches_from(argv).is_err());
        assert!(is_subprocess_launch(argv));
    }

    #[test]
    fn test_render_settings_json() {
        let args = CliArgs {
            remote_debugging_port: Some(9222),
            log_severity: Some(LogSeverity::Disable),
            ..Default::default()
        };
        let settings = Settings::default().merge_with_args(&args);
        let output = render_native(&settings, "json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["remote_debugging_port"], 9222);
        assert_eq!(value["log_severity"], 99);
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cef.toml");

        init_config(&path, false).unwrap();
        assert!(init_config(&path, false).is_err());
        init_config(&path, true).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded, Settings::default());
    }
}
