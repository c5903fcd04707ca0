//! Proposal ("PI") form: owns the draft and the billboard selection.

use crate::billboard_picker::{BillboardPicker, SelectionHandle, billboard_picker_view};
use crate::dataflow::{Actor, Relay, relay};
use crate::debug_log;
use crate::debug_utils::DEBUG_FORM;
use crate::error_display::ErrorAlert;
use futures::{StreamExt, select};
use shared::{ProposalDetails, ProposalDraft};
use zoon::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
    Client,
    Title,
    StartDate,
    EndDate,
}

impl DetailField {
    fn value_mut(self, details: &mut ProposalDetails) -> &mut String {
        match self {
            Self::Client => &mut details.client,
            Self::Title => &mut details.title,
            Self::StartDate => &mut details.start_date,
            Self::EndDate => &mut details.end_date,
        }
    }

    fn value(self, details: &ProposalDetails) -> &str {
        match self {
            Self::Client => &details.client,
            Self::Title => &details.title,
            Self::StartDate => &details.start_date,
            Self::EndDate => &details.end_date,
        }
    }
}

#[derive(Clone)]
pub struct ProposalForm {
    pub details: Actor<ProposalDetails>,
    pub selection: SelectionHandle,
    /// Last draft that passed validation.
    pub validated_draft: Actor<Option<ProposalDraft>>,

    pub detail_changed_relay: Relay<(DetailField, String)>,
    /// Opening the form (new or existing proposal) replaces the whole draft.
    pub form_opened_relay: Relay<ProposalDraft>,
    pub submit_requested_relay: Relay<()>,
}

impl ProposalForm {
    pub fn new(
        selection: SelectionHandle,
        picker_reset_requested_relay: Relay<()>,
        toast_added_relay: Relay<ErrorAlert>,
    ) -> Self {
        let (detail_changed_relay, detail_changed_stream) = relay::<(DetailField, String)>();
        let form_opened_relay = Relay::<ProposalDraft>::default();
        let (submit_requested_relay, submit_requested_stream) = relay::<()>();

        let details = {
            let form_opened_stream = form_opened_relay.subscribe();
            let selection_replaced_relay = selection.selection_replaced_relay.clone();
            Actor::new(ProposalDetails::default(), async move |state| {
                let mut detail_changed_stream = detail_changed_stream.fuse();
                let mut form_opened_stream = form_opened_stream.fuse();
                loop {
                    select! {
                        change = detail_changed_stream.next() => {
                            let Some((field, value)) = change else { break };
                            if field.value(&state.lock_ref()) != value {
                                *field.value_mut(&mut state.lock_mut()) = value;
                            }
                        }
                        opened = form_opened_stream.next() => {
                            let Some(draft) = opened else { break };
                            debug_log!(DEBUG_FORM, "FORM: opened with {} billboards", draft.billboard_count());
                            state.set_neq(draft.details);
                            selection_replaced_relay.send(draft.billboard_ids);
                            picker_reset_requested_relay.send(());
                        }
                    }
                }
            })
        };

        let validated_draft = {
            let details = details.clone();
            let selection = selection.clone();
            let form_opened_stream = form_opened_relay.subscribe();
            Actor::new(None, async move |state| {
                let mut submit_requested_stream = submit_requested_stream.fuse();
                let mut form_opened_stream = form_opened_stream.fuse();
                loop {
                    select! {
                        submit = submit_requested_stream.next() => {
                            if submit.is_none() {
                                break;
                            }
                            let Some(details) = details.signal().to_stream().next().await else { break };
                            let Some(billboard_ids) = selection.signal().to_stream().next().await else { break };
                            let draft = ProposalDraft { details, billboard_ids };
                            match draft.validate() {
                                Ok(()) => {
                                    toast_added_relay.send(ErrorAlert::new_proposal_ready(draft.billboard_count()));
                                    state.set(Some(draft));
                                }
                                Err(errors) => {
                                    debug_log!(DEBUG_FORM, "FORM: {} validation errors", errors.len());
                                    toast_added_relay.send(ErrorAlert::new_proposal_invalid(&errors));
                                    state.set(None);
                                }
                            }
                        }
                        opened = form_opened_stream.next() => {
                            if opened.is_none() {
                                break;
                            }
                            state.set(None);
                        }
                    }
                }
            })
        };

        Self {
            details,
            selection,
            validated_draft,
            detail_changed_relay,
            form_opened_relay,
            submit_requested_relay,
        }
    }

    fn field_signal(&self, field: DetailField) -> impl Signal<Item = String> + use<> {
        self.details
            .signal_ref(move |details| field.value(details).to_string())
            .dedupe_cloned()
    }
}

pub fn proposal_form_view(form: &ProposalForm, picker: &BillboardPicker) -> impl Element + use<> {
    let form_opened_relay = form.form_opened_relay.clone();
    let submit_requested_relay = form.submit_requested_relay.clone();
    Column::new()
        .s(Width::fill().max(960))
        .s(Align::new().center_x())
        .s(Padding::all(24))
        .s(Gap::new().y(16))
        .item(
            Row::new()
                .s(Gap::new().x(12))
                .item(
                    El::new()
                        .s(Font::new().size(20).weight(FontWeight::SemiBold))
                        .child("New proposal"),
                )
                .item(
                    Button::new()
                        .s(Align::new().right())
                        .label("Start over")
                        .on_press(move || form_opened_relay.send(ProposalDraft::default())),
                ),
        )
        .item(
            Row::new()
                .multiline()
                .s(Gap::both(12))
                .item(detail_input(form, DetailField::Client, "Client", "Client name"))
                .item(detail_input(form, DetailField::Title, "Title", "Campaign title"))
                .item(detail_input(form, DetailField::StartDate, "Start", "YYYY-MM-DD"))
                .item(detail_input(form, DetailField::EndDate, "End", "YYYY-MM-DD")),
        )
        .item(billboard_picker_view(picker))
        .item_signal(form.validated_draft.signal_ref(|draft| {
            draft.as_ref().map(|draft| {
                El::new()
                    .s(Font::new().size(13).color("oklch(50% 0.14 150)"))
                    .child(format!(
                        "Ready to save: {} for {}, {} to {}, {} billboards.",
                        draft.details.title,
                        draft.details.client,
                        draft.details.start_date,
                        draft.details.end_date,
                        draft.billboard_count()
                    ))
            })
        }))
        .item(
            Button::new()
                .s(Align::new().right())
                .s(Padding::new().x(16).y(8))
                .s(RoundedCorners::all(4))
                .s(Background::new().color("oklch(55% 0.16 250)"))
                .s(Font::new().color("white"))
                .label("Save proposal")
                .on_press(move || submit_requested_relay.send(())),
        )
}

fn detail_input(
    form: &ProposalForm,
    field: DetailField,
    label: &'static str,
    placeholder: &'static str,
) -> impl Element + use<> {
    let detail_changed_relay = form.detail_changed_relay.clone();
    Column::new()
        .s(Gap::new().y(4))
        .item(El::new().s(Font::new().size(13)).child(label))
        .item(
            TextInput::new()
                .s(Width::exact(200))
                .s(Padding::new().x(8).y(6))
                .s(Borders::all(Border::new().width(1).color("oklch(88% 0.01 250)")))
                .s(RoundedCorners::all(4))
                .label_hidden(label)
                .placeholder(Placeholder::new(placeholder))
                .text_signal(form.field_signal(field))
                .on_change(move |value| detail_changed_relay.send((field, value))),
        )
}
