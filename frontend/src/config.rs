use crate::connection::{ConnectionAdapter, ConnectionMessageActor};
use crate::error_display::ErrorAlert;
use crate::dataflow::Relay;
use futures::{FutureExt, StreamExt, select};
use shared::{AppConfig, UpMsg};
use zoon::*;

/// How long to wait for the backend before starting with defaults.
const CONFIG_LOAD_TIMEOUT_MS: u32 = 3000;

/// Asks the backend for `outdoor.toml`. Falls back to defaults on error or
/// timeout so the form is usable without a backend.
pub async fn load_config(
    connection: &ConnectionAdapter,
    connection_message_actor: &ConnectionMessageActor,
    toast_added_relay: &Relay<ErrorAlert>,
) -> AppConfig {
    let mut config_loaded_stream = connection_message_actor.config_loaded_relay.subscribe().fuse();
    let mut config_error_stream = connection_message_actor.config_error_relay.subscribe().fuse();

    connection.send_up_msg(UpMsg::LoadConfig).await;

    let mut config = select! {
        config = config_loaded_stream.next() => config.unwrap_or_default(),
        error = config_error_stream.next() => {
            let error = error.unwrap_or_else(|| "connection closed".to_string());
            toast_added_relay.send(ErrorAlert::new_config_error(error));
            AppConfig::default()
        }
        _ = Timer::sleep(CONFIG_LOAD_TIMEOUT_MS).fuse() => {
            zoon::println!("⚠️ CONFIG: backend did not answer, using defaults");
            AppConfig::default()
        }
    };

    for warning in config.validate_and_fix() {
        zoon::println!("⚠️ CONFIG: {}", warning);
    }
    config
}
