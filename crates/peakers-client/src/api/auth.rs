//! Database selection and login.

use peakers_core::validation::{validate_credentials, validate_db_name};
use serde::Serialize;
use tracing::info;

use super::Ack;
use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;
use crate::session::SessionStore;

pub const CONNECT_FAILED: &str = "Cannot connect to database";
pub const LOGIN_FAILED: &str = "Invalid credentials";
pub const SERVER_UNREACHABLE: &str = "Cannot connect to server";

#[derive(Serialize)]
struct DbTest<'a> {
    db_name: &'a str,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// `POST /api/test-db`. Does not change which database this client uses.
    pub async fn test_database(&self, db_name: &str) -> ClientResult<()> {
        let ack: Ack = self.post("/api/test-db", &DbTest { db_name }).await?;
        ack.into_result(CONNECT_FAILED).map(|_| ())
    }

    /// `POST /api/login` against the current database.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<()> {
        validate_credentials(username, password)?;
        let ack: Ack = self
            .post(
                "/api/login",
                &Credentials {
                    username: username.trim(),
                    password,
                },
            )
            .await?;
        ack.into_result(LOGIN_FAILED)?;
        info!(username = %username.trim(), db_name = %self.db_name(), "Logged in");
        Ok(())
    }
}

/// Validates `name`, checks it with the server, then stores it and points
/// `api` at it. Returns the trimmed name.
pub async fn connect_database(
    api: &mut ApiClient,
    store: &SessionStore,
    name: &str,
) -> ClientResult<String> {
    let db_name = validate_db_name(name)?;
    api.test_database(&db_name).await?;
    store.save(&db_name)?;
    api.set_db_name(db_name.clone());
    info!(db_name = %db_name, "Connected to database");
    Ok(db_name)
}

/// Notice text for a failed login.
pub fn login_failure_message(err: &ClientError) -> String {
    if err.is_transport() {
        SERVER_UNREACHABLE.to_string()
    } else {
        err.user_message(LOGIN_FAILED)
    }
}

/// Notice text for a failed database connection.
pub fn connect_failure_message(err: &ClientError) -> String {
    if err.is_transport() {
        CONNECT_FAILED.to_string()
    } else {
        err.user_message(CONNECT_FAILED)
    }
}
