//! Session-bound backend client.

use std::{str::FromStr, sync::Arc};

use secrecy::ExposeSecret;
use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use thiserror::Error;

use crate::{
    config::{BackendConfig, get_max_connections},
    session::SessionTokens,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid backend url: {0}")]
    InvalidBackendUrl(#[source] sqlx::Error),
}

/// A backend client bound to one session state.
///
/// Every connection the pool opens publishes the application key and the
/// session's access token at establishment time as request-scoped settings,
/// which is what the backend's row-level policies read. One client exists
/// per session state; when the session changes, bind a new client and drop
/// this one.
///
/// Known limitation: connections opened under a previous binding keep the
/// credential they started with until they are retired, and nothing
/// synchronizes in-flight requests across a rebind. Callers must tolerate
/// either credential during a session transition.
#[derive(Clone)]
pub struct Client {
    pool: PgPool,
}

impl Client {
    /// Builds a client for `config`, attaching `session`'s current
    /// credential to each new backend connection.
    ///
    /// The pool connects lazily, so binding is cheap; past URL parsing the
    /// first repository call is where connectivity failures surface.
    pub fn bind(
        config: &BackendConfig,
        session: Arc<dyn SessionTokens>,
    ) -> Result<Self, ClientError> {
        let options = PgConnectOptions::from_str(&config.backend_url)
            .map_err(ClientError::InvalidBackendUrl)?;
        let public_key = config.public_key.expose_secret().to_owned();

        let pool = PgPoolOptions::new()
            .max_connections(get_max_connections())
            .after_connect(move |conn, _meta| {
                let session = Arc::clone(&session);
                let public_key = public_key.clone();
                Box::pin(async move {
                    sqlx::query("SELECT set_config('request.api_key', $1, false)")
                        .bind(public_key)
                        .execute(&mut *conn)
                        .await?;
                    if let Some(token) = session.access_token().await {
                        sqlx::query("SELECT set_config('request.jwt', $1, false)")
                            .bind(token.expose_secret().to_owned())
                            .execute(&mut *conn)
                            .await?;
                    } else {
                        tracing::debug!("no session token; connection carries only the application key");
                    }
                    Ok(())
                })
            })
            .connect_lazy_with(options);

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
