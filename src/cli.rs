use crate::census::{run_categories, run_count};
use crate::config::SourcePaths;
use crate::sources::SourceKind;

const USAGE: &str = "usage: machine-census <count|categories> [--root DIR] [--service PATH] [--inventory PATH] [--demo PATH] [--json|--csv]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Count,
    Categories,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub paths: SourcePaths,
    pub format: OutputFormat,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("count") => Some(Command::Count),
        Some("categories") => Some(Command::Categories),
        _ => None,
    }
}

/// Parse the flags following the command name.
pub fn parse_options(args: &[String]) -> Result<Options, String> {
    let flags = args.get(2..).unwrap_or_default();

    let mut root = None;
    let mut overrides = Vec::new();
    let mut format = OutputFormat::Text;

    let mut iter = flags.iter();
    while let Some(flag) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("missing value for {name}"))
        };
        match flag.as_str() {
            "--root" => root = Some(value("--root")?),
            "--service" => overrides.push((SourceKind::Service, value("--service")?)),
            "--inventory" => overrides.push((SourceKind::Inventory, value("--inventory")?)),
            "--demo" => overrides.push((SourceKind::Demo, value("--demo")?)),
            "--json" | "--csv" => {
                let requested = if flag == "--json" {
                    OutputFormat::Json
                } else {
                    OutputFormat::Csv
                };
                if format != OutputFormat::Text && format != requested {
                    return Err("--json and --csv are mutually exclusive".to_string());
                }
                format = requested;
            }
            other => return Err(format!("unknown option '{other}'")),
        }
    }

    let mut paths = SourcePaths::resolve(root.as_deref());
    for (kind, path) in overrides {
        paths.set_path(kind, path);
    }
    Ok(Options { paths, format })
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let options = match parse_options(args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{USAGE}");
            return 2;
        }
    };

    match command {
        Command::Count => handle_count(&options),
        Command::Categories => handle_categories(&options),
    }
}

fn handle_count(options: &Options) -> i32 {
    let report = match run_count(&options.paths) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("count failed: {err}");
            return 1;
        }
    };

    let rendered = match options.format {
        OutputFormat::Text => Ok(report.render_text()),
        OutputFormat::Json => report.render_json().map(|json| format!("{json}\n")),
        OutputFormat::Csv => report.render_csv(),
    };
    emit(rendered)
}

fn handle_categories(options: &Options) -> i32 {
    if options.format == OutputFormat::Csv {
        eprintln!("categories does not support --csv");
        return 2;
    }
    let report = match run_categories(&options.paths) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("categories failed: {err}");
            return 1;
        }
    };

    let rendered = match options.format {
        OutputFormat::Json => report.render_json().map(|json| format!("{json}\n")),
        _ => Ok(report.render_text()),
    };
    emit(rendered)
}

fn emit(rendered: crate::error::Result<String>) -> i32 {
    match rendered {
        Ok(payload) => {
            print!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}
