//! `connect` and `login`.

use peakers_client::api::auth::{connect_database, connect_failure_message, login_failure_message};
use tracing::debug;

use crate::error::{CliResult, Notice};
use crate::state::AppState;

pub async fn connect(state: &mut AppState, db_name: &str) -> CliResult<()> {
    debug!(db_name, "connect");
    let name = connect_database(&mut state.api, &state.store, db_name)
        .await
        .map_err(|e| match e {
            peakers_client::ClientError::Core(core) => Notice::from(core),
            other => Notice::error(connect_failure_message(&other)),
        })?;
    println!("Connected to {name}");
    Ok(())
}

pub async fn login(state: &AppState, username: &str, password: &str) -> CliResult<()> {
    debug!(username, db_name = %state.api.db_name(), "login");
    state
        .api
        .login(username, password)
        .await
        .map_err(|e| match e {
            peakers_client::ClientError::Core(core) => Notice::from(core),
            other => Notice::new("Login Failed", login_failure_message(&other)),
        })?;
    println!("Logged in as {} ({})", username.trim(), state.api.db_name());
    Ok(())
}
