use crate::{
    cli::actions::{describe, print_json, require},
    routes::{Role, Route},
    session::context::Session,
};
use anyhow::{anyhow, bail, Context, Result};
use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug)]
pub struct LoginArgs {
    pub username: String,
    pub password: Option<SecretString>,
}

async fn read_password() -> Result<SecretString> {
    eprint!("Password: ");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("password is required");
    }
    Ok(SecretString::from(password))
}

/// # Errors
/// Returns an error if the credentials are rejected or the API is unreachable.
pub async fn login(session: &Session, args: LoginArgs) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => read_password().await?,
    };

    session.login(&args.username, &password).await?;

    let Some(user) = session.user() else {
        println!("Logged in, but the employee record could not be loaded.");
        return Ok(());
    };

    let home = user
        .role_name()
        .and_then(|name| name.parse::<Role>().ok())
        .map_or(Route::Login, Role::home);
    println!("Logged in as {} ({})", user.display_name(), user.username);
    println!("Home: {home}");
    Ok(())
}

pub fn logout(session: &Session) {
    let redirect = session.logout();
    println!("Logged out. Next: {}", redirect.to);
}

/// # Errors
/// Returns an error when no employee is logged in.
pub fn whoami(session: &Session) -> Result<()> {
    require(session, &[Route::Profile])?;
    let user = session
        .user()
        .ok_or_else(|| anyhow!("not logged in"))?;
    print_json(&user)
}

pub fn open(session: &Session, location: &str) {
    match Route::from_path(location) {
        Some(screen) => println!("{}", describe(screen, &session.navigate(location))),
        None => println!("{location}: no such screen"),
    }
}
