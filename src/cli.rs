use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "laptop-rater",
    version,
    about = "Rates retail laptops by benchmark performance per price"
)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, global = true, default_value = "config.json")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Scrape the listing page for product links
    Listings,
    /// Fetch and store the spec table of every listed laptop
    Specs,
    /// Scrape CPU and GPU benchmark tables
    Benchmarks,
    /// Resolve hardware names, rate laptops and print the report
    Rate,
    /// Print the report from the last rating run
    Report,
    /// Run every stage in order
    All,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommand_and_config() {
        let cli = Cli::parse_from(["laptop-rater", "rate", "--config", "other.json"]);
        assert_eq!(cli.command, Commands::Rate);
        assert_eq!(cli.config, "other.json");
    }

    #[test]
    fn config_defaults_to_local_file() {
        let cli = Cli::parse_from(["laptop-rater", "all"]);
        assert_eq!(cli.config, "config.json");
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["laptop-rater"]).is_err());
    }
}
