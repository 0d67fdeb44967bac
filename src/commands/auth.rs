//! `taskdeck login`, `register` and `logout` commands.

use tracing::info;

use crate::cli::CredentialArgs;
use crate::context::AppContext;
use crate::model::{AuthToken, Credentials};

/// Execute the `login` command.
///
/// # Errors
///
/// Returns an error string if the service rejects the credentials or the
/// token cannot be saved.
pub async fn login(ctx: &AppContext, args: &CredentialArgs) -> Result<(), String> {
    let credentials = credentials(args)?;
    let token = ctx.auth_api.login(&credentials).await.map_err(|e| format!("Login failed: {e}"))?;
    remember(ctx, token)?;
    println!("Logged in as {}.", credentials.email);
    Ok(())
}

/// Execute the `register` command.
///
/// # Errors
///
/// Returns an error string if the service rejects the registration or the
/// token cannot be saved.
pub async fn register(ctx: &AppContext, args: &CredentialArgs) -> Result<(), String> {
    let credentials = credentials(args)?;
    let token =
        ctx.auth_api.register(&credentials).await.map_err(|e| format!("Registration failed: {e}"))?;
    remember(ctx, token)?;
    println!("Registered and logged in as {}.", credentials.email);
    Ok(())
}

/// Execute the `logout` command. Succeeds when no one is logged in.
///
/// # Errors
///
/// Returns an error string if the saved token cannot be removed.
pub fn logout(ctx: &AppContext) -> Result<(), String> {
    ctx.credentials.clear().map_err(|e| format!("Failed to remove saved token: {e}"))?;
    ctx.auth.clear();
    info!("cleared saved token");
    println!("Logged out.");
    Ok(())
}

fn credentials(args: &CredentialArgs) -> Result<Credentials, String> {
    let email = args.email.trim();
    if email.is_empty() || args.password.is_empty() {
        return Err("Email and password are required.".into());
    }
    Ok(Credentials { email: email.to_string(), password: args.password.clone() })
}

fn remember(ctx: &AppContext, token: AuthToken) -> Result<(), String> {
    ctx.credentials.save(&token.token).map_err(|e| format!("Failed to save token: {e}"))?;
    ctx.auth.set(token.token);
    info!("saved token");
    Ok(())
}
