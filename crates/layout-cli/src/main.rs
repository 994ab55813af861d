//! Minimal CLI front end: reads a `.layout-script` file (see
//! [`script`]), drives a [`layout_engine::Formatter`] with it, and
//! prints the formatted result to stdout.

mod script;

use std::path::PathBuf;
use std::sync::Once;

use anyhow::{Context, Result};
use clap::Parser;
use layout_engine::{Config, Formatter};
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser, Debug)]
#[command(name = "layoutfmt", version, about = "Chunk-and-rule layout engine CLI")]
struct Args {
    /// Path to a `.layout-script` file of operation-table commands.
    /// Reads stdin if omitted.
    path: Option<PathBuf>,

    /// Overrides the configured page width.
    #[arg(long = "page-width")]
    page_width: Option<usize>,

    /// Overrides the configured base indent.
    #[arg(long = "indent")]
    indent: Option<usize>,

    /// Configuration file path (overrides discovery of `layoutfmt.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = std::path::Path::new(".");
    let log_path = log_dir.join("layoutfmt.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "layoutfmt.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        Err(_err) => None,
    }
}

fn install_panic_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();

    let mut config = layout_engine::config::load_from(args.config.clone(), true);
    if let Some(page_width) = args.page_width {
        config.page_width = page_width;
    }
    if let Some(indent) = args.indent {
        config.indent = indent;
    }

    let source = match &args.path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading layout script {}", path.display()))?,
        None => {
            use std::io::Read;
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading layout script from stdin")?;
            buf
        }
    };

    let mut formatter = build_formatter(config, args.path.as_ref());
    script::run(&source, &mut formatter)?;
    let result = formatter.end().context("unbalanced block nesting in layout script")?;
    print!("{}", result.text);
    tracing::info!(target: "cli", bytes_in = source.len(), bytes_out = result.text.len(), "format_complete");
    Ok(())
}

fn build_formatter(config: Config, path: Option<&PathBuf>) -> Formatter {
    match path {
        Some(path) => Formatter::new(config).with_uri(path.display().to_string()),
        None => Formatter::new(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_engine::VisitorSink;

    #[test]
    fn page_width_and_indent_flags_override_the_config_file() {
        let args = Args::parse_from(["layoutfmt", "--page-width", "100", "--indent", "2"]);
        assert_eq!(args.page_width, Some(100));
        assert_eq!(args.indent, Some(2));
    }

    #[test]
    fn build_formatter_carries_the_path_as_a_uri() {
        let mut f = build_formatter(Config::default(), Some(&PathBuf::from("a.dart")));
        f.write("x;").unwrap();
        let result = f.end().unwrap();
        assert_eq!(result.uri.as_deref(), Some("a.dart"));
    }

    #[test]
    fn script_drives_the_formatter_end_to_end() {
        let source = "write a(\nsplit false single false\nwrite b\nsplit false single false\nwrite )\n";
        let mut f = build_formatter(Config::default(), None);
        script::run(source, &mut f).unwrap();
        let result = f.end().unwrap();
        assert_eq!(result.text, "a(b)\n");
    }
}
