use crate::dataflow::{Actor, Relay};
use crate::debug_log;
use crate::debug_utils::DEBUG_CONNECTION;
use futures::stream::StreamExt;
use shared::{AppConfig, DownMsg, UpMsg};
use std::rc::Rc;
use zoon::*;

/// Actor+Relay compatible Connection adapter
#[derive(Clone)]
pub struct ConnectionAdapter {
    connection: Rc<Connection<UpMsg, DownMsg>>,
}

impl ConnectionAdapter {
    pub fn new() -> (Self, impl futures::stream::Stream<Item = DownMsg>) {
        let (message_sender, message_stream) = futures::channel::mpsc::unbounded();

        let connection = Connection::new(move |down_msg, _| {
            let _ = message_sender.unbounded_send(down_msg);
        });

        let adapter = ConnectionAdapter {
            connection: Rc::new(connection),
        };
        (adapter, message_stream)
    }

    pub async fn send_up_msg(&self, up_msg: UpMsg) {
        debug_log!(DEBUG_CONNECTION, "CONNECTION: sending {:?}", up_msg);
        if let Err(error) = self.connection.send_up_msg(up_msg).await {
            zoon::println!("Failed to send message: {:?}", error);
        }
    }
}

/// Turns backend messages into relay events.
#[derive(Clone)]
pub struct ConnectionMessageActor {
    pub config_loaded_relay: Relay<AppConfig>,
    pub config_error_relay: Relay<String>,
    _message_handler: Actor<()>,
}

impl ConnectionMessageActor {
    pub fn new(down_msg_stream: impl futures::stream::Stream<Item = DownMsg> + Unpin + 'static) -> Self {
        let config_loaded_relay = Relay::<AppConfig>::default();
        let config_error_relay = Relay::<String>::default();

        let message_handler = {
            let config_loaded_relay = config_loaded_relay.clone();
            let config_error_relay = config_error_relay.clone();
            Actor::new((), async move |_state| {
                let mut down_msg_stream = down_msg_stream;
                while let Some(down_msg) = down_msg_stream.next().await {
                    debug_log!(DEBUG_CONNECTION, "CONNECTION: received {:?}", down_msg);
                    match down_msg {
                        DownMsg::ConfigLoaded(config) => config_loaded_relay.send(config),
                        DownMsg::ConfigError(error) => config_error_relay.send(error),
                    }
                }
            })
        };

        Self {
            config_loaded_relay,
            config_error_relay,
            _message_handler: message_handler,
        }
    }
}
