//! CLI tool for highlighting code tags in HTML slide decks.

use anyhow::{Context, Result};
use clap::Parser;
use codeslide_core::{OutcomeStatus, PluginConfig, ProcessingReport};
use codeslide_dom::TagProcessor;
use codeslide_syntect::SyntectHighlighter;
use std::path::{Path, PathBuf};

/// Replace <source-code> and <src-code> tags with syntax-highlighted HTML.
#[derive(Parser, Debug)]
#[command(name = "codeslide")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input HTML file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print output to stdout instead of writing to file
    #[arg(short, long)]
    print: bool,

    /// Plugin configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also highlight existing <pre><code> blocks
    #[arg(short = 'a', long)]
    highlight_all: bool,

    /// Write a stylesheet for the emitted classes to this file
    #[arg(long)]
    css: Option<PathBuf>,

    /// Theme used for --css
    #[arg(long, default_value = "InspiredGitHub")]
    theme: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match &args.config {
        Some(path) => PluginConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PluginConfig::default(),
    };
    let config = if args.highlight_all {
        config.with_highlight_all(true)
    } else {
        config
    };

    let highlighter =
        SyntectHighlighter::from_config(&config).context("Failed to register languages")?;
    let processor = TagProcessor::with_config(&highlighter, &config);

    if let Some(css_path) = &args.css {
        let css = SyntectHighlighter::stylesheet(&args.theme)?;
        write_output(css_path, &css)?;
        if args.verbose {
            eprintln!("Stylesheet written to: {}", css_path.display());
        }
    }

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        let result = process_file(input_path, &args, &processor)
            .and_then(|output| emit(input_path, &args, &output));
        if let Err(e) = result {
            eprintln!("Error processing {}: {:#}", input_path.display(), e);
        }
    }

    Ok(())
}

/// Process a single HTML file.
fn process_file(
    input_path: &Path,
    args: &Args,
    processor: &TagProcessor<&SyntectHighlighter>,
) -> Result<String> {
    let html = std::fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;

    let processed = processor.process_html(&html);

    if args.verbose {
        print_summary(processed.report());
    }

    let output = processed
        .to_html()
        .with_context(|| format!("Failed to serialize {}", input_path.display()))?;

    Ok(output)
}

fn print_summary(report: &ProcessingReport) {
    eprintln!(
        "  {} rendered, {} failed",
        report.rendered_count(),
        report.failed_count()
    );

    for outcome in &report.outcomes {
        let state = match &outcome.status {
            OutcomeStatus::Rendered => continue,
            OutcomeStatus::Degraded(_) => "degraded",
            OutcomeStatus::Failed(_) => "failed",
        };
        eprintln!(
            "  {:?} #{} {}: {}",
            outcome.kind,
            outcome.index,
            state,
            outcome.messages().join("; ")
        );
    }
}

/// Print the highlighted document or write it next to the input (or into
/// the output directory).
fn emit(input_path: &Path, args: &Args, html: &str) -> Result<()> {
    if args.print {
        print!("{}", html);
        return Ok(());
    }

    if let Some(dir) = &args.output {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }

    let target = output_path(input_path, args.output.as_deref());
    write_output(&target, html)?;
    if args.verbose {
        eprintln!("Written to: {}", target.display());
    }
    Ok(())
}

/// `<stem>.highlighted.html`, in `output_dir` or beside the input.
fn output_path(input_path: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| "output".into());
    let file_name = format!("{}.highlighted.html", stem);

    output_dir
        .or_else(|| input_path.parent())
        .map(|dir| dir.join(&file_name))
        .unwrap_or_else(|| PathBuf::from(&file_name))
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_next_to_input() {
        let path = output_path(Path::new("talks/intro.html"), None);
        assert_eq!(path, PathBuf::from("talks/intro.highlighted.html"));

        let path = output_path(Path::new("talks/intro.html"), Some(Path::new("out")));
        assert_eq!(path, PathBuf::from("out/intro.highlighted.html"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "codeslide",
            "--highlight-all",
            "--css",
            "theme.css",
            "-p",
            "deck.html",
        ])
        .unwrap();

        assert!(args.highlight_all);
        assert!(args.print);
        assert_eq!(args.theme, "InspiredGitHub");
        assert_eq!(args.input, vec![PathBuf::from("deck.html")]);
    }
}
