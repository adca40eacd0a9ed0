use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::server::{self, AppState};
use crate::source::data_source;
use crate::{Config, Mode, Result};
use std::sync::Arc;

/// Runs the HTTP API until Ctrl-C. `host` and `port` override the values in `config.json`.
pub async fn serve(
    config: Config,
    mode: Mode,
    host: Option<&str>,
    port: Option<u16>,
) -> Result<Out<()>> {
    let source = data_source(&config, mode).pub_result(ErrorType::Config)?;
    let state = AppState::new(
        Arc::new(config.db().clone()),
        source,
        config.fetch_timeout(),
        config.query_timeout(),
    );
    let host = host.unwrap_or(config.host());
    let port = port.unwrap_or(config.port());
    server::serve(state, host, port)
        .await
        .pub_result(ErrorType::Service)?;
    Ok("Server shut down".into())
}
