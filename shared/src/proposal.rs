use crate::selection::Selection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Text fields of a proposal form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ProposalDetails {
    pub client: String,
    pub title: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
}

/// Proposal ("PI") being created or edited; owner of the billboard selection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ProposalDraft {
    #[serde(flatten)]
    pub details: ProposalDetails,
    pub billboard_ids: Selection,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProposalError {
    #[error("a client is required")]
    MissingClient,
    #[error("{field} must be a date like 2025-01-31, got '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("the end date {end} is before the start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("select at least one billboard")]
    NoBillboards,
}

impl ProposalDraft {
    /// Reports every problem at once, in form order.
    pub fn validate(&self) -> Result<(), Vec<ProposalError>> {
        let mut errors = Vec::new();
        let details = &self.details;

        if details.client.trim().is_empty() {
            errors.push(ProposalError::MissingClient);
        }

        let start = parse_date("start date", &details.start_date).map_err(|error| errors.push(error));
        let end = parse_date("end date", &details.end_date).map_err(|error| errors.push(error));
        if let (Ok(start), Ok(end)) = (start, end) {
            if end < start {
                errors.push(ProposalError::EndBeforeStart { start, end });
            }
        }

        if self.billboard_ids.is_empty() {
            errors.push(ProposalError::NoBillboards);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub fn billboard_count(&self) -> usize {
        self.billboard_ids.len()
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ProposalError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ProposalError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProposalDraft {
        ProposalDraft {
            details: ProposalDetails {
                client: "Padaria Central".into(),
                title: "Summer campaign".into(),
                start_date: "2025-01-01".into(),
                end_date: "2025-01-31".into(),
            },
            billboard_ids: Selection::from_ids(["b1"]),
        }
    }

    #[test]
    fn complete_draft_is_valid() {
        assert_eq!(draft().validate(), Ok(()));
    }

    #[test]
    fn empty_selection_is_rejected() {
        let mut draft = draft();
        draft.billboard_ids.clear();
        assert_eq!(draft.validate(), Err(vec![ProposalError::NoBillboards]));
    }

    #[test]
    fn all_problems_are_reported_together() {
        let draft = ProposalDraft {
            details: ProposalDetails {
                client: "  ".into(),
                start_date: "31/01/2025".into(),
                ..ProposalDetails::default()
            },
            ..ProposalDraft::default()
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0], ProposalError::MissingClient);
        assert!(matches!(errors[1], ProposalError::InvalidDate { field: "start date", .. }));
        assert!(matches!(errors[2], ProposalError::InvalidDate { field: "end date", .. }));
        assert_eq!(errors[3], ProposalError::NoBillboards);
    }

    #[test]
    fn draft_serializes_flat() {
        let json = serde_json::to_value(draft()).unwrap();
        assert_eq!(json["client"], "Padaria Central");
        assert_eq!(json["billboard_ids"], serde_json::json!(["b1"]));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut draft = draft();
        draft.details.end_date = "2024-12-31".into();
        let errors = draft.validate().unwrap_err();
        assert!(matches!(errors[..], [ProposalError::EndBeforeStart { .. }]));
        assert_eq!(
            errors[0].to_string(),
            "the end date 2024-12-31 is before the start date 2025-01-01"
        );
    }
}
