use crate::dataflow::{Actor, Relay, relay};
use futures::{StreamExt, select};
use shared::{CatalogError, ProposalError};
use std::sync::atomic::{AtomicUsize, Ordering};
use zoon::*;

static ALERT_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

const DEFAULT_DISMISS_MS: u32 = 5000;

#[derive(Debug, Clone, PartialEq, Copy, Default)]
pub enum NotificationVariant {
    #[default]
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorAlert {
    pub id: String,
    pub title: String,
    pub message: String,
    /// Raw error text for the console.
    pub technical_error: String,
    /// 0 keeps the toast until it is dismissed.
    pub auto_dismiss_ms: u32,
    pub variant: NotificationVariant,
}

impl ErrorAlert {
    fn next_id(prefix: &str) -> String {
        format!("{prefix}_{}", ALERT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// `listing` names what was being loaded, e.g. "regions".
    pub fn new_catalog_error(listing: &str, error: &CatalogError) -> Self {
        let technical_error = error.to_string();
        Self {
            id: Self::next_id("catalog_error"),
            title: "Catalog Unavailable".to_string(),
            message: format!("Could not load {listing}: {}", make_error_user_friendly(&technical_error)),
            technical_error: format!("Loading {listing} failed: {technical_error}"),
            auto_dismiss_ms: DEFAULT_DISMISS_MS,
            variant: NotificationVariant::Error,
        }
    }

    pub fn new_config_error(error: String) -> Self {
        Self {
            id: Self::next_id("config_error"),
            title: "Configuration Error".to_string(),
            message: "Settings could not be loaded, using defaults.".to_string(),
            technical_error: format!("Config error: {error}"),
            auto_dismiss_ms: DEFAULT_DISMISS_MS,
            variant: NotificationVariant::Error,
        }
    }

    pub fn new_proposal_invalid(errors: &[ProposalError]) -> Self {
        let message = errors
            .iter()
            .map(|error| {
                let mut text = error.to_string();
                if let Some(first) = text.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                text
            })
            .collect::<Vec<_>>()
            .join(". ");
        Self {
            id: Self::next_id("proposal_invalid"),
            title: "Proposal Incomplete".to_string(),
            technical_error: format!("Proposal validation failed: {errors:?}"),
            message,
            auto_dismiss_ms: 0,
            variant: NotificationVariant::Error,
        }
    }

    pub fn new_proposal_ready(billboard_count: usize) -> Self {
        let noun = if billboard_count == 1 { "billboard" } else { "billboards" };
        Self {
            id: Self::next_id("proposal_ready"),
            title: "Proposal Ready".to_string(),
            message: format!("{billboard_count} {noun} selected."),
            technical_error: format!("Proposal validated with {billboard_count} {noun}"),
            auto_dismiss_ms: DEFAULT_DISMISS_MS,
            variant: NotificationVariant::Success,
        }
    }
}

pub fn make_error_user_friendly(error: &str) -> String {
    let error_lower = error.to_lowercase();

    if error_lower.contains("http 404") {
        "The catalog service could not find this listing.".to_string()
    } else if error_lower.contains("http 401") || error_lower.contains("http 403") {
        "You are not allowed to read the catalog. Please sign in again.".to_string()
    } else if error_lower.contains("http 5") {
        "The catalog service is having trouble. Please try again shortly.".to_string()
    } else if error_lower.contains("timeout") || error_lower.contains("timed out") {
        "The request timed out. Please try again.".to_string()
    } else if error_lower.contains("network") || error_lower.contains("failed to fetch") {
        "Connection error. Please check your network connection.".to_string()
    } else if error_lower.contains("unexpected response") {
        "The catalog service sent data this page does not understand.".to_string()
    } else {
        error.trim().to_string()
    }
}

/// Toast notifications.
#[derive(Clone)]
pub struct ErrorDisplay {
    pub active_toasts: Actor<Vec<ErrorAlert>>,
    pub toast_added_relay: Relay<ErrorAlert>,
    pub toast_dismissed_relay: Relay<String>,
}

impl ErrorDisplay {
    pub fn new() -> Self {
        let (toast_added_relay, mut toast_added_stream) = relay::<ErrorAlert>();
        let (toast_dismissed_relay, mut toast_dismissed_stream) = relay::<String>();

        let active_toasts = {
            let toast_dismissed_relay = toast_dismissed_relay.clone();
            Actor::new(vec![], async move |toasts| {
                loop {
                    select! {
                        toast = toast_added_stream.next() => {
                            let Some(alert) = toast else { break };
                            zoon::println!("Error: {}", alert.technical_error);
                            if alert.auto_dismiss_ms > 0 {
                                let dismissed_relay = toast_dismissed_relay.clone();
                                let id = alert.id.clone();
                                let delay_ms = alert.auto_dismiss_ms;
                                Task::start(async move {
                                    Timer::sleep(delay_ms).await;
                                    dismissed_relay.send(id);
                                });
                            }
                            toasts.lock_mut().push(alert);
                        }
                        dismissed_id = toast_dismissed_stream.next() => {
                            let Some(id) = dismissed_id else { break };
                            toasts.lock_mut().retain(|alert| alert.id != id);
                        }
                    }
                }
            })
        };

        Self {
            active_toasts,
            toast_added_relay,
            toast_dismissed_relay,
        }
    }
}

/// For background failures that already show inline.
pub fn log_error_console_only(alert: ErrorAlert) {
    zoon::println!("Error: {}", alert.technical_error);
}

pub fn toasts_view(error_display: &ErrorDisplay) -> impl Element + use<> {
    let toast_dismissed_relay = error_display.toast_dismissed_relay.clone();
    Column::new()
        .s(Gap::new().y(8))
        .s(Align::new().top().right())
        .s(Padding::all(16))
        .items_signal_vec(
            error_display
                .active_toasts
                .signal()
                .to_signal_vec()
                .map(move |alert| toast_view(alert, toast_dismissed_relay.clone())),
        )
}

fn toast_view(alert: ErrorAlert, toast_dismissed_relay: Relay<String>) -> impl Element {
    let (background, border) = match alert.variant {
        NotificationVariant::Error => ("oklch(96% 0.03 25)", "oklch(60% 0.18 25)"),
        NotificationVariant::Success => ("oklch(96% 0.04 150)", "oklch(60% 0.15 150)"),
    };
    let id = alert.id.clone();
    Row::new()
        .s(Width::exact(340))
        .s(Padding::new().x(12).y(10))
        .s(Gap::new().x(8))
        .s(Background::new().color(background))
        .s(Borders::all(Border::new().width(1).color(border)))
        .s(RoundedCorners::all(6))
        .item(
            Column::new()
                .s(Width::fill())
                .s(Gap::new().y(4))
                .item(El::new().s(Font::new().weight(FontWeight::SemiBold)).child(alert.title))
                .item(Paragraph::new().content(alert.message)),
        )
        .item(
            Button::new()
                .s(Align::new().top())
                .label("✕")
                .on_press(move || toast_dismissed_relay.send(id.clone())),
        )
}
