use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::{debug, trace, warn};

use std::path::{Path, PathBuf};

use crate::attributes::{AttributeResolver, Prefix};
use crate::collect;
use crate::config::{self, Config};
use crate::registry::{Registry, TestCase};
use crate::rules::{self, Selector};
use crate::suggest;

use super::error::CliError;
use super::exit_codes;
use super::output::{self, CheckData, CollectData, OutputMode, SelectData};

#[derive(Parser)]
#[command(name = "tagsel")]
#[command(about = "Select tests by attribute rules and boolean expressions")]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides TAGSEL_CONFIG env var and default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Attribute namespace token (overrides TAGSEL_PREFIX and config)
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log rule compilation and matching decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// selection rules given on the command line
#[derive(Args, Debug, Clone, Default)]
pub struct RuleArgs {
    /// Rule group, e.g. "slow,speed=fast" (rules in a group are AND-ed, groups are OR-ed)
    #[arg(
        short = 'a',
        long = "attr",
        visible_short_alias = 't',
        visible_alias = "tag",
        action = clap::ArgAction::Append
    )]
    pub attr: Vec<String>,

    /// Boolean expression over attributes, e.g. "db and not slow"
    #[arg(
        short = 'A',
        long = "eval-attr",
        visible_short_alias = 'T',
        visible_alias = "eval-tag",
        action = clap::ArgAction::Append
    )]
    pub eval_attr: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the tests selected by the rules
    Select {
        /// Test catalog (JSON)
        catalog: PathBuf,

        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Print the attributes of the selected tests as JSON
    Collect {
        /// Test catalog (JSON)
        catalog: PathBuf,

        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Compile the rules and show the resulting groups
    Check {
        #[command(flatten)]
        rules: RuleArgs,

        /// Warn about rule keys no test in this catalog carries
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Fail instead of warning when a rule key is unknown to the catalog
        #[arg(long, requires = "catalog")]
        strict: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration (file and environment)
    Show,
    /// Show configuration file path
    Path,
    /// Verify configuration file for errors
    Verify,
}

pub fn execute(cli: Cli) -> Result<(), CliError> {
    let mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);
    let config_path = cli.config.as_deref();
    let prefix = cli.prefix.as_deref();

    match cli.command {
        Commands::Select { catalog, rules } => {
            let config = load_config(config_path, prefix, rules)?;
            let selector = build_selector(&config)?;
            let registry = config::load_catalog(&catalog)?;

            let (total, selected) = select_cases(&registry, &selector)?;
            let names: Vec<String> = selected.iter().map(TestCase::qualified_name).collect();

            match mode {
                OutputMode::Json => output::print_json(&SelectData {
                    active: selector.is_active(),
                    total,
                    selected: names,
                }),
                OutputMode::Text => {
                    for name in &names {
                        println!("{}", name);
                    }
                }
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Collect { catalog, rules } => {
            let config = load_config(config_path, prefix, rules)?;
            let selector = build_selector(&config)?;
            let registry = config::load_catalog(&catalog)?;

            let (_, selected) = select_cases(&registry, &selector)?;
            let cases = collect::collect(selected, selector.resolver());

            match mode {
                OutputMode::Json => output::print_json(&CollectData { tests: &cases }),
                OutputMode::Text => {
                    let json = collect::to_json(&cases)
                        .map_err(|e| CliError::general(format!("Failed to serialize: {}", e)))?;
                    println!("{}", json);
                }
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Check {
            rules: rule_args,
            catalog,
            strict,
        } => {
            let config = load_config(config_path, prefix, rule_args)?;
            let rule_set = rules::compile(&config.selection.attr, &config.selection.eval_attr)?;

            let mut warnings = Vec::new();
            if let Some(catalog) = catalog {
                let registry = config::load_catalog(&catalog)?;
                let known = suggest::known_keys(&registry, &Prefix::new(config.prefix.as_str()));
                for (key, similar) in suggest::unknown_keys(&rule_set.keys(), &known) {
                    if strict {
                        return Err(CliError::with_suggestions(
                            exit_codes::INVALID_RULES,
                            format!("no test carries attribute '{}'", key),
                            similar,
                        ));
                    }
                    let message = if similar.is_empty() {
                        format!("no test carries attribute '{}'", key)
                    } else {
                        format!(
                            "no test carries attribute '{}' (did you mean: {}?)",
                            key,
                            similar.join(", ")
                        )
                    };
                    warn!("{}", message);
                    warnings.push(message);
                }
            }

            let groups: Vec<String> = rule_set.groups().iter().map(|g| g.to_string()).collect();

            match mode {
                OutputMode::Json => output::print_json(&CheckData {
                    active: rule_set.is_active(),
                    groups,
                    warnings,
                }),
                OutputMode::Text => {
                    if groups.is_empty() {
                        println!("No rules configured: every test is eligible");
                    } else {
                        println!("{} group(s), any of which selects a test:", groups.len());
                        for (i, group) in groups.iter().enumerate() {
                            println!("  {}. {}", i + 1, group);
                        }
                    }
                }
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let config = load_config(config_path, prefix, RuleArgs::default())?;
                match mode {
                    OutputMode::Json => output::print_json(&config),
                    OutputMode::Text => {
                        let json = serde_json::to_string_pretty(&config).map_err(|e| {
                            CliError::general(format!("Failed to serialize config: {}", e))
                        })?;
                        println!("{}", json);
                    }
                    OutputMode::Quiet => {}
                }
                Ok(())
            }
            ConfigCommands::Path => {
                let path = config::get_config_path_with_override(config_path)?;
                if !mode.is_quiet() {
                    println!("{}", path.display());
                }
                Ok(())
            }
            ConfigCommands::Verify => {
                let path = config::get_config_path_with_override(config_path)?;
                let errors = config::verify(&path).map_err(CliError::config)?;

                if errors.is_empty() {
                    match mode {
                        OutputMode::Json => {
                            output::print_json(&serde_json::json!({ "valid": true }))
                        }
                        OutputMode::Text => {
                            println!("✓ Configuration is valid: {}", path.display())
                        }
                        OutputMode::Quiet => {}
                    }
                    return Ok(());
                }

                if !mode.is_json() {
                    eprintln!(
                        "✗ Configuration has {} error(s): {}",
                        errors.len(),
                        path.display()
                    );
                    for error in &errors {
                        eprintln!("  - {}", error);
                    }
                }
                Err(CliError::new(
                    exit_codes::CONFIG_ERROR,
                    format!("configuration validation failed: {}", errors.join("; ")),
                ))
            }
        },

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "tagsel", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// config file and environment, then command-line overrides
fn load_config(
    config_path: Option<&Path>,
    prefix: Option<&str>,
    rules: RuleArgs,
) -> Result<Config, CliError> {
    let mut config = config::load(config_path).map_err(CliError::config)?;

    if let Some(prefix) = prefix {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(CliError::invalid_args("--prefix must not be empty"));
        }
        config.prefix = prefix.to_string();
    }

    config.selection.override_with(rules.attr, rules.eval_attr);
    debug!(
        prefix = %config.prefix,
        attr = ?config.selection.attr,
        eval_attr = ?config.selection.eval_attr,
        "effective selection"
    );
    Ok(config)
}

fn build_selector(config: &Config) -> Result<Selector, CliError> {
    let rule_set = rules::compile(&config.selection.attr, &config.selection.eval_attr)?;
    let resolver = AttributeResolver::new(Prefix::new(config.prefix.as_str()));
    Ok(Selector::new(rule_set, resolver))
}

/// offer every `test_*` case to the selector; returns (candidates, eligible)
fn select_cases<'r>(
    registry: &'r Registry,
    selector: &Selector,
) -> Result<(usize, Vec<TestCase<'r>>), CliError> {
    let mut total = 0;
    let mut selected = Vec::new();

    for case in registry.cases().filter(|c| collect::is_test_name(c.name)) {
        total += 1;
        let decision = selector.wants(&case.candidate)?;
        trace!(test = %case.qualified_name(), ?decision, "selection decision");
        if decision.is_eligible() {
            selected.push(case);
        }
    }

    debug!(total, selected = selected.len(), "selection finished");
    Ok((total, selected))
}
