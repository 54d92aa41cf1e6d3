use clap::Subcommand;

/// Session supervision commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SessionCommands {
    /// Stay in the foreground, warn before the token expires and log out when it does.
    Watch,
}
