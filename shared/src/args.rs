use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the JSON event record, read from stdin when omitted
    #[arg(short, long, global = true)]
    pub event: Option<PathBuf>,

    /// Enables verbose logging to the console
    #[arg(short, long, default_value_t = false, global = true)]
    pub debug: bool,
}

#[derive(clap::Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Log in to the IdP and exchange the SAML assertion for temporary keys
    TempKeys,
    /// Create the Splunk read policy and role in an account and record the role ARN
    Integrate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_subcommand_with_global_flags() {
        let args = Args::parse_from(["aws-adfs-tools", "integrate", "--event", "event.json", "-d"]);
        assert_eq!(args.command, Command::Integrate);
        assert_eq!(args.event, Some(PathBuf::from("event.json")));
        assert!(args.debug);
    }

    #[test]
    fn event_defaults_to_stdin() {
        let args = Args::parse_from(["aws-adfs-tools", "temp-keys"]);
        assert_eq!(args.command, Command::TempKeys);
        assert!(args.event.is_none());
        assert!(!args.debug);
    }
}
