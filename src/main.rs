use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tokio::fs;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use skill_lint::cli::{Cli, Commands, ConfigAction, Display};
use skill_lint::config::LintConfig;
use skill_lint::corpus::Corpus;
use skill_lint::document::plan_split;
use skill_lint::error::{LintError, Result};
use skill_lint::lint::{Linter, RuleId};
use skill_lint::output::{InventoryEntry, OutputWriter, RuleInfo};
use skill_lint::utils::write_file;

/// Context for command output handling.
struct OutputContext<'a> {
    display: &'a Display,
    writer: &'a OutputWriter,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            Display::new().print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("skill_lint=debug")
    } else {
        EnvFilter::new("skill_lint=info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Runs the selected command. `Ok(false)` means the command completed but failed its check.
async fn run(cli: Cli) -> Result<bool> {
    let display = Display::new();
    let writer = OutputWriter::new(cli.output);
    let out = OutputContext {
        display: &display,
        writer: &writer,
    };
    let config_path = cli.config;

    match cli.command {
        Commands::Check {
            paths,
            deny_warnings,
            disable,
            separator,
        } => {
            let mut config = load_config(config_path.as_deref(), separator).await?;
            for code in disable {
                let rule = RuleId::from_code(&code).ok_or(LintError::InvalidRule(code))?;
                config.rules.disabled.push(rule.code().to_string());
            }
            cmd_check(&out, &config, &paths, deny_warnings).await
        }
        Commands::List { paths, separator } => {
            let config = load_config(config_path.as_deref(), separator).await?;
            cmd_list(&out, &config, &paths).await
        }
        Commands::Split {
            file,
            out_dir,
            separator,
            force,
        } => {
            let config = load_config(config_path.as_deref(), separator).await?;
            cmd_split(&out, &config, &file, out_dir.as_deref(), force).await
        }
        Commands::Rules => {
            let config = load_config(config_path.as_deref(), None).await?;
            cmd_rules(&out, &config)
        }
        Commands::Config { action } => cmd_config(&out, config_path.as_deref(), action).await,
    }
}

/// Explicit `--config` path, else `skill-lint.toml` in the working directory.
async fn load_config(config_path: Option<&Path>, separator: Option<String>) -> Result<LintConfig> {
    let mut config = match config_path {
        Some(path) => LintConfig::load(path).await?,
        None => LintConfig::discover(&std::env::current_dir()?).await?,
    };

    if let Some(separator) = separator {
        config.bundle.separator = separator;
        config.validate()?;
    }

    Ok(config)
}

async fn cmd_check(
    out: &OutputContext<'_>,
    config: &LintConfig,
    paths: &[PathBuf],
    deny_warnings: bool,
) -> Result<bool> {
    let spinner = out
        .writer
        .is_text()
        .then(|| out.display.create_spinner("Linting skill documents..."));

    let corpus = Corpus::load(paths, config).await;
    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }
    let corpus = corpus?;

    let linter = Linter::new(config);
    let report = linter.lint_corpus(&corpus);
    out.writer.emit_report(&report);

    let clean = report.is_clean(deny_warnings);
    debug!(clean, deny_warnings, "Check finished");
    Ok(clean)
}

async fn cmd_list(out: &OutputContext<'_>, config: &LintConfig, paths: &[PathBuf]) -> Result<bool> {
    let corpus = Corpus::load(paths, config).await?;
    let entries: Vec<InventoryEntry> = corpus
        .files()
        .iter()
        .flat_map(InventoryEntry::for_file)
        .collect();

    out.writer.emit_inventory(&entries);
    Ok(true)
}

async fn cmd_split(
    out: &OutputContext<'_>,
    config: &LintConfig,
    file: &Path,
    out_dir: Option<&Path>,
    force: bool,
) -> Result<bool> {
    if !file.is_file() {
        return Err(LintError::PathNotFound(file.to_path_buf()));
    }

    let content = fs::read_to_string(file).await?;
    let entries = plan_split(file, &content, &config.bundle.separator);

    if let Some(dir) = out_dir {
        // Refuse before anything is written.
        if !force {
            for entry in entries.iter().filter(|e| !e.blank) {
                let target = dir.join(&entry.file_name);
                if fs::try_exists(&target).await? {
                    return Err(LintError::OutputExists(target));
                }
            }
        }

        for entry in entries.iter().filter(|e| !e.blank) {
            let target = dir.join(&entry.file_name);
            write_file(&target, &entry.content, force).await?;
            debug!(path = %target.display(), "Wrote document");
        }
        info!(
            source = %file.display(),
            documents = entries.len(),
            "Split bundle"
        );
    }

    out.writer.emit_split(file, &entries, out_dir);
    Ok(true)
}

fn cmd_rules(out: &OutputContext<'_>, config: &LintConfig) -> Result<bool> {
    let linter = Linter::new(config);
    let rules: Vec<RuleInfo> = RuleId::ALL
        .iter()
        .map(|&rule| RuleInfo::new(rule, linter.severity(rule), linter.is_enabled(rule)))
        .collect();

    out.writer.emit_rules(&rules);
    Ok(true)
}

async fn cmd_config(
    out: &OutputContext<'_>,
    config_path: Option<&Path>,
    action: ConfigAction,
) -> Result<bool> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path, None).await?;
            out.writer.emit_config(&config)?;
        }
        ConfigAction::Init { force } => {
            let dir = std::env::current_dir()?;
            let path = LintConfig::default().save(&dir, force).await?;

            if out.writer.is_text() {
                out.display
                    .print_success(&format!("Wrote {}", path.display()));
            } else {
                out.writer
                    .emit_message(&format!("Wrote {}", path.display()));
            }
        }
    }

    Ok(true)
}
