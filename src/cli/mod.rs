use crate::provider::{DEFAULT_ADDRESS, DEFAULT_TIMEOUT};
use crate::{Config, Settings, VaultTemplateError, generate};
use clap::{CommandFactory, Parser};
use color_eyre::eyre::{Result, WrapErr};
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Main CLI structure for the vault-template application.
///
/// Every flag can also be supplied through the environment variable named in
/// its help text, which is how the tool is usually driven from container
/// entrypoints.
#[derive(Parser, Debug)]
#[command(name = "vault-template")]
#[command(about = "Render a template with secrets from Vault", long_about = None)]
#[command(version)]
struct Cli {
    /// Vault API endpoint
    #[arg(short = 'v', long = "vault", env = "VAULT_ADDR", default_value = DEFAULT_ADDRESS)]
    vault: String,
    /// The file which contains the vault token
    #[arg(short = 'f', long = "vault-token-file", env = "VAULT_TOKEN_FILE")]
    vault_token_file: Option<PathBuf>,
    /// The template file to render
    #[arg(short, long, env = "TEMPLATE_FILE")]
    template: Option<PathBuf>,
    /// The output file
    #[arg(short, long, env = "OUTPUT_FILE")]
    output: Option<PathBuf>,
    /// Timeout for each Vault request, in seconds
    #[arg(long, env = "VAULT_TIMEOUT", value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,
    /// Log filter, e.g. "info" or "vault_template=debug"
    #[arg(long, env = "VAULT_TEMPLATE_LOG", default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            vault_address: Some(self.vault.clone()),
            vault_token_file: self.vault_token_file.clone(),
            template_file: self.template.clone(),
            output_file: self.output.clone(),
            timeout: Some(Duration::from_secs(self.timeout)),
        }
    }
}

/// Installs the stderr log subscriber.
fn init_tracing(filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(filter)
        .wrap_err_with(|| format!("Invalid log filter '{}'", filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

/// Entry point for the `vault-template` binary.
///
/// Missing required settings print the problem together with the usage text
/// and exit with status 1. Every other failure is returned as a report naming
/// the step that failed.
pub fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = match Config::from_settings(cli.settings()) {
        Ok(config) => config,
        Err(err @ VaultTemplateError::MissingSetting(_)) => {
            eprintln!("{}\n", err.to_string().red());
            Cli::command().print_help()?;
            std::process::exit(1);
        }
        Err(err) => return Err(err).wrap_err("Invalid configuration"),
    };

    let report = generate(&config).wrap_err("Failed to generate output file")?;
    println!(
        "{} Rendered {} to {} ({} bytes)",
        "✓".green(),
        report.template.display(),
        report.output.display(),
        report.bytes
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "vault-template",
            "-v",
            "http://vault.internal:8200",
            "-f",
            "/run/secrets/token",
            "-t",
            "app.conf.tmpl",
            "-o",
            "app.conf",
            "--timeout",
            "5",
        ])
        .unwrap();

        let settings = cli.settings();
        assert_eq!(
            settings.vault_address.as_deref(),
            Some("http://vault.internal:8200")
        );
        assert_eq!(
            settings.vault_token_file,
            Some(PathBuf::from("/run/secrets/token"))
        );
        assert_eq!(settings.template_file, Some(PathBuf::from("app.conf.tmpl")));
        assert_eq!(settings.output_file, Some(PathBuf::from("app.conf")));
        assert_eq!(settings.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::try_parse_from([
            "vault-template",
            "--vault",
            "https://10.0.0.1:8200",
            "--vault-token-file",
            "token",
            "--template",
            "in.tmpl",
            "--output",
            "out.env",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.vault, "https://10.0.0.1:8200");
        assert_eq!(cli.log_level, "debug");
        assert!(Config::from_settings(cli.settings()).is_ok());
    }

    #[test]
    fn test_timeout_defaults_to_client_default() {
        let cli = Cli::try_parse_from(["vault-template", "-f", "token", "-t", "in", "-o", "out"])
            .unwrap();

        assert_eq!(cli.settings().timeout, Some(DEFAULT_TIMEOUT));
    }
}
