use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tw", about = concat!("\u{29D6} timewarp v", env!("CARGO_PKG_VERSION"), " - time bends when you look away"), version)]
pub struct Cli {
    /// Store settings, sessions and chat history here
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of <data-dir>/config.toml
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Never call the live companion, even if an API key is configured
    #[arg(long)]
    pub offline: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from(["tw", "--offline", "-c", "/tmp/x.toml"]).unwrap();
        assert!(cli.offline);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
    }

    #[test]
    fn rejects_subcommands() {
        assert!(Cli::try_parse_from(["tw", "list"]).is_err());
    }
}
