use super::{BillboardPicker, BillboardRow};
use crate::dataflow::Relay;
use shared::{LoadPhase, LoadState, PickerGate, Region};
use zoon::*;

const ACCENT: &str = "oklch(55% 0.16 250)";
const MUTED: &str = "oklch(55% 0.02 250)";
const ERROR: &str = "oklch(55% 0.19 25)";
const PANEL_BORDER: &str = "oklch(88% 0.01 250)";

pub fn billboard_picker_view(picker: &BillboardPicker) -> impl Element + use<> {
    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(12))
        .item(header(picker))
        .item(region_filter(picker))
        .item(search_input(picker))
        .item_signal(picker.gate_signal().map({
            let retry_requested_relay = picker.retry_requested_relay.clone();
            move |gate| status_notices(gate, retry_requested_relay.clone())
        }))
        .item(
            Row::new()
                .s(Width::fill())
                .s(Gap::new().x(16))
                .s(Align::new().top())
                .item(selected_panel(picker))
                .item(available_panel(picker)),
        )
}

fn header(picker: &BillboardPicker) -> impl Element + use<> {
    let reset_requested_relay = picker.reset_requested_relay.clone();
    Row::new()
        .s(Gap::new().x(12))
        .item(
            El::new()
                .s(Font::new().size(16).weight(FontWeight::SemiBold))
                .child("Billboards"),
        )
        .item(
            El::new()
                .s(Font::new().size(13).color(MUTED))
                .child_signal(picker.selection.count_signal().map(|count| format!("{count} selected"))),
        )
        .item(
            Button::new()
                .s(Align::new().right())
                .s(Font::new().size(13).color(ACCENT))
                .label("Clear filters")
                .on_press(move || reset_requested_relay.send(())),
        )
}

fn region_filter(picker: &BillboardPicker) -> impl Element + use<> {
    let picker = picker.clone();
    El::new().child_signal(picker.regions.signal().map(move |regions| match regions {
        LoadState::Ready(regions) => region_chips(&picker, regions).unify(),
        LoadState::Loading => notice("Loading regions...", MUTED).unify(),
        // The failure is listed with the other notices; search still works.
        LoadState::Failed(_) => El::new().unify(),
    }))
}

fn region_chips(picker: &BillboardPicker, regions: Vec<Region>) -> impl Element + use<> {
    let all_regions = std::iter::once((String::new(), "All regions".to_string()));
    let chips = all_regions
        .chain(regions.into_iter().map(|region| (region.id, region.name)))
        .map(|(id, name)| region_chip(picker, id, name));
    Row::new().multiline().s(Gap::both(6)).items(chips)
}

fn region_chip(picker: &BillboardPicker, region_id: String, name: String) -> impl Element + use<> {
    let region_selected_relay = picker.region_selected_relay.clone();
    let is_selected = picker
        .selected_region
        .signal_ref({
            let region_id = region_id.clone();
            move |selected| *selected == region_id
        })
        .dedupe()
        .broadcast();
    Button::new()
        .s(Padding::new().x(10).y(4))
        .s(RoundedCorners::all_max())
        .s(Borders::all(Border::new().width(1).color(ACCENT)))
        .s(Font::new()
            .size(13)
            .color_signal(is_selected.signal().map_bool(|| "white", || ACCENT)))
        .s(Background::new()
            .color_signal(is_selected.signal().map_bool(|| ACCENT, || "transparent")))
        .label(name)
        .on_press(move || region_selected_relay.send(region_id.clone()))
}

fn search_input(picker: &BillboardPicker) -> impl Element + use<> {
    let search_text_changed_relay = picker.search_text_changed_relay.clone();
    TextInput::new()
        .s(Width::fill())
        .s(Padding::new().x(10).y(6))
        .s(Borders::all(Border::new().width(1).color(PANEL_BORDER)))
        .s(RoundedCorners::all(4))
        .label_hidden("Search billboards")
        .placeholder(Placeholder::new("Search by code or street"))
        .text_signal(picker.search_text.signal())
        .on_change(move |text| search_text_changed_relay.send(text))
}

fn status_notices(gate: PickerGate, retry_requested_relay: Relay<()>) -> Option<impl Element> {
    if !gate.is_loading && gate.errors.is_empty() {
        return None;
    }
    let has_errors = !gate.errors.is_empty();
    let loading = gate
        .is_loading
        .then(|| notice("Loading billboards...", MUTED).unify());
    let errors = gate
        .errors
        .into_iter()
        .map(|error| notice(error, ERROR).unify());
    let retry = has_errors.then(|| {
        Button::new()
            .s(Font::new().size(13).color(ACCENT))
            .label("Retry")
            .on_press(move || retry_requested_relay.send(()))
            .unify()
    });
    Some(
        Column::new()
            .s(Gap::new().y(4))
            .items(loading.into_iter().chain(errors).chain(retry)),
    )
}

fn selected_panel(picker: &BillboardPicker) -> impl Element + use<> {
    let billboard_removed_relay = picker.selection.billboard_removed_relay.clone();
    let empty_text = picker.all_billboards.signal_ref(|all| match all.phase() {
        LoadPhase::Loading => None,
        _ => Some("No billboards selected yet."),
    });
    list_panel(
        "Selected",
        picker.selected_rows_signal(),
        empty_text,
        "Remove",
        billboard_removed_relay,
    )
}

fn available_panel(picker: &BillboardPicker) -> impl Element + use<> {
    let billboard_added_relay = picker.selection.billboard_added_relay.clone();
    let empty_text = picker.filtered_signal().map(|filtered| match filtered.phase() {
        LoadPhase::Loading | LoadPhase::Error => None,
        LoadPhase::Empty => Some("No billboards match this filter."),
        LoadPhase::Ready => Some("Every matching billboard is already selected."),
    });
    list_panel(
        "Available",
        picker.available_rows_signal(),
        empty_text,
        "Add",
        billboard_added_relay,
    )
}

/// `empty_text` is shown only while `rows` is empty.
fn list_panel(
    title: &'static str,
    rows: impl Signal<Item = Vec<BillboardRow>> + 'static,
    empty_text: impl Signal<Item = Option<&'static str>> + 'static,
    action_label: &'static str,
    action_relay: Relay<String>,
) -> impl Element {
    let rows = rows.broadcast();
    let is_empty = rows.signal_ref(Vec::is_empty);
    Column::new()
        .s(Width::fill())
        .s(Height::exact(360))
        .s(Padding::all(8))
        .s(Gap::new().y(4))
        .s(Borders::all(Border::new().width(1).color(PANEL_BORDER)))
        .s(RoundedCorners::all(6))
        .item(El::new().s(Font::new().weight(FontWeight::SemiBold)).child(title))
        .item_signal(map_ref! {
            let is_empty = is_empty,
            let empty_text = empty_text =>
            empty_text.filter(|_| *is_empty).map(|text| notice(text, MUTED))
        })
        .item(
            Column::new()
                .s(Width::fill())
                .s(Height::fill())
                .s(Scrollbars::both())
                .update_raw_el(|raw_el| raw_el.style("scrollbar-width", "thin"))
                .items_signal_vec(rows.signal_cloned().to_signal_vec().map(move |row| {
                    billboard_row(row, action_label, action_relay.clone())
                })),
        )
}

fn billboard_row(row: BillboardRow, action_label: &'static str, action_relay: Relay<String>) -> impl Element {
    let BillboardRow {
        id,
        code,
        street_label,
        region_name,
    } = row;
    Row::new()
        .s(Width::fill())
        .s(Padding::new().x(4).y(3))
        .s(Gap::new().x(8))
        .item(
            Column::new()
                .s(Width::fill())
                .item(El::new().s(Font::new().size(14)).child(code))
                .item(
                    El::new()
                        .s(Font::new().size(12).color(MUTED))
                        .child(match street_label {
                            Some(street_label) => format!("{street_label} · {region_name}"),
                            None => region_name,
                        }),
                ),
        )
        .item(
            Button::new()
                .s(Font::new().size(13).color(ACCENT))
                .label(action_label)
                .on_press(move || action_relay.send(id.clone())),
        )
}

fn notice(text: impl IntoCowStr<'static>, color: &'static str) -> impl Element {
    El::new().s(Font::new().size(13).color(color)).child(Text::new(text))
}
