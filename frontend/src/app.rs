//! OutdoorApp - wires configuration, catalog, picker and proposal form.

use crate::billboard_picker::{BillboardPicker, SelectionHandle};
use crate::connection::{ConnectionAdapter, ConnectionMessageActor};
use crate::error_display::{ErrorDisplay, toasts_view};
use crate::proposal_form::{ProposalForm, proposal_form_view};
use crate::rest_catalog::{JsClock, RestCatalog};
use shared::{CachedCatalog, Selection};
use std::rc::Rc;
use zoon::*;

pub struct OutdoorApp {
    pub error_display: ErrorDisplay,
    pub picker: BillboardPicker,
    pub proposal_form: ProposalForm,
    // Kept alive for the backend session.
    _connection: ConnectionAdapter,
    _connection_message_actor: ConnectionMessageActor,
}

impl OutdoorApp {
    pub async fn new() -> Self {
        let error_display = ErrorDisplay::new();

        let (connection, down_msg_stream) = ConnectionAdapter::new();
        let connection_message_actor = ConnectionMessageActor::new(down_msg_stream);

        let config = crate::config::load_config(
            &connection,
            &connection_message_actor,
            &error_display.toast_added_relay,
        )
        .await;
        zoon::println!(
            "🔧 CONFIG: catalog at {}, search debounce {} ms",
            config.catalog.api_base_url,
            config.picker.search_debounce_ms
        );

        let catalog = CachedCatalog::new(
            Rc::new(RestCatalog::new(config.catalog.api_base_url.clone())),
            Rc::new(JsClock),
            config.picker.cache_ttl_ms,
        );

        let selection = SelectionHandle::new(Selection::new());
        let picker = BillboardPicker::new(catalog, &config.picker, selection.clone());
        let proposal_form = ProposalForm::new(
            selection,
            picker.reset_requested_relay.clone(),
            error_display.toast_added_relay.clone(),
        );

        OutdoorApp {
            error_display,
            picker,
            proposal_form,
            _connection: connection,
            _connection_message_actor: connection_message_actor,
        }
    }

    /// Root UI element
    pub fn root(&self) -> impl Element + use<> {
        Stack::new()
            .s(Height::screen())
            .s(Width::fill())
            .s(Background::new().color("rgb(250, 250, 252)"))
            .s(Font::new().family([
                FontFamily::new("Inter"),
                FontFamily::new("system-ui"),
                FontFamily::new("Segoe UI"),
                FontFamily::new("Arial"),
                FontFamily::SansSerif,
            ]))
            .layer(
                El::new()
                    .s(Width::fill())
                    .s(Height::fill())
                    .s(Scrollbars::y_and_clip_x())
                    .child(proposal_form_view(&self.proposal_form, &self.picker)),
            )
            .layer(toasts_view(&self.error_display))
    }
}
