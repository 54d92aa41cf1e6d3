use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Log in with email and password.
    Login(AuthLoginArgs),
    /// Create an account. Does not log you in.
    Register(AuthRegisterArgs),
    /// Clear the stored session.
    Logout,
    /// Restore the stored session and show it.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    #[arg(long)]
    pub email: String,
    /// Password (or set HARBOR_PASSWORD).
    #[arg(long, env = "HARBOR_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Clone, Debug, Args)]
pub struct AuthRegisterArgs {
    /// Display name.
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    /// At least 6 characters mixing case, digits or symbols (or set HARBOR_PASSWORD).
    #[arg(long, env = "HARBOR_PASSWORD", hide_env_values = true)]
    pub password: String,
}
