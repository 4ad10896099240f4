// src/cli/mod.rs — CLI definition (clap derive)

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "oramind", about = "Oracle DBA assistant powered by LLMs", version)]
pub struct Cli {
    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    /// Provider override: groq, gemini or ollama
    #[arg(short, long)]
    pub provider: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the security audit against the extracted snapshots
    Audit,
    /// Classify the most recent audit logs
    Anomalies,
    /// Optimization advice for a SQL statement
    Optimize {
        /// The SQL text to analyze
        sql: String,
        /// Optional execution-plan hint
        #[arg(long, default_value = "")]
        plan: String,
    },
    /// Recommend a backup strategy and RMAN script
    Backup {
        #[arg(long, default_value = "4h")]
        rpo: String,
        #[arg(long, default_value = "2h")]
        rto: String,
        #[arg(long, default_value = "medium")]
        budget: String,
    },
    /// Ask the assistant a one-shot question
    Chat {
        query: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_backup_defaults() {
        let cli = Cli::try_parse_from(["oramind", "backup"]).unwrap();
        match cli.command {
            Commands::Backup { rpo, rto, budget } => {
                assert_eq!(rpo, "4h");
                assert_eq!(rto, "2h");
                assert_eq!(budget, "medium");
            }
            _ => panic!("expected backup command"),
        }
    }

    #[test]
    fn test_cli_provider_override() {
        let cli = Cli::try_parse_from(["oramind", "--provider", "ollama", "audit"]).unwrap();
        assert_eq!(cli.provider.as_deref(), Some("ollama"));
    }
}
