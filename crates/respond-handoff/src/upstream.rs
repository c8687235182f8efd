//! Upstream collaborator DTOs and the [`UpstreamServices`] trait.
//!
//! These records are read-only inputs owned by the upstream services; field
//! names mirror their JSON (camelCase). The trait is implemented by the HTTP
//! client layer, which owns availability, timeout, and retry semantics —
//! its errors pass through the handoff builder unchanged.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Case ────────────────────────────────────────────────────────────────────

/// One enrolment case: a respondent's obligation to complete a specific
/// collection instrument in a specific collection exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
  pub id:                       Uuid,
  pub case_ref:                 String,
  pub collection_instrument_id: Uuid,
  pub collection_exercise_id:   Uuid,
}

// ─── Collection exercise ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionExercise {
  pub id:               Uuid,
  /// The period identifier, e.g. `"201812"`.
  pub exercise_ref:     String,
  /// Human-readable period description, e.g. `"December 2018"`.
  pub user_description: String,
  pub survey_id:        Uuid,
}

/// A timestamped, tagged collection-exercise event. The timestamp is an
/// ISO-8601 string as delivered by the upstream service; events can arrive
/// without one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionExerciseEvent {
  pub tag:       String,
  #[serde(default)]
  pub timestamp: Option<String>,
}

// ─── Collection instrument ───────────────────────────────────────────────────

/// How a collection instrument is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrumentType {
  /// Electronic questionnaire — the only type eligible for handoff.
  #[serde(rename = "EQ")]
  Eq,
  /// Spreadsheet upload; completed in the portal, never handed off.
  #[serde(rename = "SEFT")]
  Seft,
  #[serde(other)]
  Other,
}

/// Classifier map attached to an instrument. Both fields must be present and
/// non-empty for an EQ handoff.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Classifiers {
  #[serde(default)]
  pub eq_id:     Option<String>,
  #[serde(default)]
  pub form_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionInstrument {
  pub id:          Uuid,
  #[serde(rename = "type")]
  pub instrument_type: InstrumentType,
  #[serde(default)]
  pub classifiers: Classifiers,
}

// ─── Party / survey ──────────────────────────────────────────────────────────

/// The reporting unit (business) a case belongs to, scoped to a collection
/// exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessParty {
  pub id:              Uuid,
  pub name:            String,
  pub sample_unit_ref: String,
  pub checkletter:     String,
  #[serde(default)]
  pub tradstyle1:      Option<String>,
  #[serde(default)]
  pub tradstyle2:      Option<String>,
  #[serde(default)]
  pub tradstyle3:      Option<String>,
}

impl BusinessParty {
  /// Reporting-unit reference: sample unit reference plus check letter.
  pub fn ru_ref(&self) -> String {
    format!("{}{}", self.sample_unit_ref, self.checkletter)
  }

  /// Trading-as name: the non-empty trading styles joined with spaces.
  pub fn trading_as(&self) -> String {
    [&self.tradstyle1, &self.tradstyle2, &self.tradstyle3]
      .into_iter()
      .filter_map(|style| style.as_deref())
      .filter(|style| !style.is_empty())
      .collect::<Vec<_>>()
      .join(" ")
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
  pub id:         Uuid,
  /// Short survey reference, e.g. `"139"`.
  pub survey_ref: String,
  pub long_name:  String,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// The five upstream read APIs the handoff builder consumes.
///
/// All methods return `Send` futures; implementations are shared, long-lived
/// clients safe for concurrent use across request tasks.
pub trait UpstreamServices: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn case(
    &self,
    case_id: Uuid,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send;

  fn collection_instrument(
    &self,
    instrument_id: Uuid,
  ) -> impl Future<Output = Result<CollectionInstrument, Self::Error>> + Send;

  fn collection_exercise(
    &self,
    exercise_id: Uuid,
  ) -> impl Future<Output = Result<CollectionExercise, Self::Error>> + Send;

  fn collection_exercise_events(
    &self,
    exercise_id: Uuid,
  ) -> impl Future<Output = Result<Vec<CollectionExerciseEvent>, Self::Error>> + Send;

  /// The business party for `party_id`, with enrolment details scoped to
  /// `collection_exercise_id`.
  fn business_party(
    &self,
    party_id: Uuid,
    collection_exercise_id: Uuid,
  ) -> impl Future<Output = Result<BusinessParty, Self::Error>> + Send;

  fn survey(
    &self,
    survey_id: Uuid,
  ) -> impl Future<Output = Result<Survey, Self::Error>> + Send;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn trading_as_skips_empty_styles() {
    let party = BusinessParty {
      id:              Uuid::new_v4(),
      name:            "Bolts and Ratchets Ltd".into(),
      sample_unit_ref: "49900000001".into(),
      checkletter:     "F".into(),
      tradstyle1:      Some("Bolts".into()),
      tradstyle2:      Some(String::new()),
      tradstyle3:      Some("Ratchets".into()),
    };

    assert_eq!(party.trading_as(), "Bolts Ratchets");
    assert_eq!(party.ru_ref(), "49900000001F");
  }

  #[test]
  fn instrument_type_tolerates_unknown_values() {
    let instrument: CollectionInstrument = serde_json::from_str(
      r#"{"id":"68ad4018-2ddd-4894-89e7-33f0135887a2","type":"PAPER"}"#,
    )
    .unwrap();
    assert_eq!(instrument.instrument_type, InstrumentType::Other);
    assert!(instrument.classifiers.eq_id.is_none());
  }
}
