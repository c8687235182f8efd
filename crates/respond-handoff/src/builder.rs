//! [`HandoffPayloadBuilder`] — assembles and signs the handoff claim set.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use respond_core::{config::PortalConfig, token::TokenCodec};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  events::EventResolver,
  upstream::{InstrumentType, UpstreamServices},
};

// Collection-exercise event tags consumed by the build.
const REF_PERIOD_START: &str = "ref_period_start";
const REF_PERIOD_END: &str = "ref_period_end";
const EMPLOYMENT: &str = "employment";
const RETURN_BY: &str = "return_by";
const EXERCISE_END: &str = "exercise_end";

// ─── Claims ──────────────────────────────────────────────────────────────────

/// The survey-metadata block nested inside [`HandoffClaims`], as the
/// downstream questionnaire system expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyMetadataData {
  pub case_ref:         String,
  pub form_type:        String,
  pub period_id:        String,
  pub period_str:       String,
  /// Omitted (never null) when the optional event is absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ref_p_start_date: Option<NaiveDate>,
  pub ref_p_end_date:   NaiveDate,
  pub return_by:        NaiveDate,
  /// Omitted (never null) when the optional event is absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub employment_date:  Option<NaiveDate>,
  pub ru_name:          String,
  pub ru_ref:           String,
  pub trad_as:          String,
  pub user_id:          Uuid,
  pub survey_id:        String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyMetadata {
  pub data: SurveyMetadataData,
}

/// A one-shot signed claim set authorizing one respondent for one
/// questionnaire instance. Never persisted: handed to the caller for
/// immediate redirect and not retrievable afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoffClaims {
  pub jti:                     Uuid,
  /// Cross-service correlation id; appears in logs on both sides.
  pub tx_id:                   Uuid,
  /// Epoch seconds.
  pub iat:                     i64,
  /// Epoch seconds; tight — issued-at plus the handoff TTL (5 minutes).
  pub exp:                     i64,
  pub version:                 String,
  pub account_service_url:     String,
  pub case_id:                 Uuid,
  pub collection_exercise_sid: Uuid,
  pub response_id:             String,
  pub response_expires_at:     DateTime<FixedOffset>,
  pub schema_name:             String,
  pub survey_metadata:         SurveyMetadata,
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Single-pass, fail-fast orchestration over the upstream read APIs.
///
/// Stateless and safe to share across request tasks; the only I/O is the
/// read-only upstream fetches. Upstream state is never mutated.
pub struct HandoffPayloadBuilder<U> {
  upstream:            Arc<U>,
  codec:               TokenCodec,
  resolver:            EventResolver,
  account_service_url: String,
  token_ttl:           Duration,
}

impl<U: UpstreamServices> HandoffPayloadBuilder<U> {
  pub fn new(
    upstream: Arc<U>,
    codec: TokenCodec,
    resolver: EventResolver,
    account_service_url: String,
    token_ttl: Duration,
  ) -> Self {
    Self { upstream, codec, resolver, account_service_url, token_ttl }
  }

  pub fn from_config(upstream: Arc<U>, config: &PortalConfig) -> Self {
    Self::new(
      upstream,
      TokenCodec::new(config.jwt_secret.as_bytes()),
      EventResolver::with_utc_offset_hours(config.display_utc_offset_hours),
      config.account_service_url.clone(),
      Duration::from_secs(config.handoff_ttl_seconds),
    )
  }

  /// Build and sign the handoff token for one case. The returned string is
  /// appended to the downstream redirect URL by the caller.
  pub async fn build(
    &self,
    case_id: Uuid,
    respondent_party_id: Uuid,
    business_party_id: Uuid,
  ) -> Result<String> {
    let claims = self
      .build_claims(case_id, respondent_party_id, business_party_id)
      .await?;
    Ok(self.codec.encode(&claims)?)
  }

  /// The unsigned claim set. Validation and reconciliation happen here;
  /// [`build`](Self::build) only adds the signature.
  pub async fn build_claims(
    &self,
    case_id: Uuid,
    respondent_party_id: Uuid,
    business_party_id: Uuid,
  ) -> Result<HandoffClaims> {
    let tx_id = Uuid::new_v4();
    tracing::info!(%case_id, %tx_id, "building handoff payload");

    let case = self.fetch(self.upstream.case(case_id)).await?;

    // Step 1: the instrument must be completed in the downstream system.
    let instrument = self
      .fetch(self.upstream.collection_instrument(case.collection_instrument_id))
      .await?;
    if instrument.instrument_type != InstrumentType::Eq {
      return Err(Error::InvalidHandoff(format!(
        "collection instrument {} type is not EQ",
        instrument.id
      )));
    }

    // Step 2: both classifiers must be present and non-empty.
    let classifiers = &instrument.classifiers;
    let (Some(eq_id), Some(form_type)) = (
      classifiers.eq_id.as_deref().filter(|v| !v.is_empty()),
      classifiers.form_type.as_deref().filter(|v| !v.is_empty()),
    ) else {
      return Err(Error::InvalidHandoff(format!(
        "collection instrument {} classifiers are incorrect or missing",
        instrument.id
      )));
    };

    // Step 3: resolve the exercise's event dates; any mandatory miss aborts.
    let exercise = self
      .fetch(self.upstream.collection_exercise(case.collection_exercise_id))
      .await?;
    let events = self
      .fetch(self.upstream.collection_exercise_events(exercise.id))
      .await?;

    let ref_p_start_date =
      self.resolver.resolve(REF_PERIOD_START, &events, false, exercise.id)?;
    let ref_p_end_date = self
      .resolver
      .resolve(REF_PERIOD_END, &events, true, exercise.id)?
      .ok_or_else(|| Error::MissingMandatoryEvent {
        tag:                    REF_PERIOD_END.to_owned(),
        collection_exercise_id: exercise.id,
      })?;
    let employment_date =
      self.resolver.resolve(EMPLOYMENT, &events, false, exercise.id)?;
    let return_by = self
      .resolver
      .resolve(RETURN_BY, &events, true, exercise.id)?
      .ok_or_else(|| Error::MissingMandatoryEvent {
        tag:                    RETURN_BY.to_owned(),
        collection_exercise_id: exercise.id,
      })?;
    let response_expires_at = self
      .resolver
      .resolve_timestamp(EXERCISE_END, &events, true, exercise.id)?
      .ok_or_else(|| Error::MissingMandatoryEvent {
        tag:                    EXERCISE_END.to_owned(),
        collection_exercise_id: exercise.id,
      })?;

    // Step 4: business identity and survey reference.
    let party = self
      .fetch(self.upstream.business_party(business_party_id, exercise.id))
      .await?;
    let survey = self.fetch(self.upstream.survey(exercise.survey_id)).await?;

    // Step 5: assemble.
    let ru_ref = party.ru_ref();
    let trad_as = party.trading_as();
    let iat = Utc::now().timestamp();

    Ok(HandoffClaims {
      jti: Uuid::new_v4(),
      tx_id,
      iat,
      exp: iat + self.token_ttl.as_secs() as i64,
      version: "v2".to_owned(),
      account_service_url: self.account_service_url.clone(),
      case_id: case.id,
      collection_exercise_sid: exercise.id,
      response_id: format!("{ru_ref}{}{eq_id}{form_type}", exercise.id),
      response_expires_at,
      schema_name: format!("{eq_id}_{form_type}"),
      survey_metadata: SurveyMetadata {
        data: SurveyMetadataData {
          case_ref: case.case_ref,
          form_type: form_type.to_owned(),
          period_id: exercise.exercise_ref,
          period_str: exercise.user_description,
          ref_p_start_date,
          ref_p_end_date,
          return_by,
          employment_date,
          ru_name: party.name,
          ru_ref,
          trad_as,
          user_id: respondent_party_id,
          survey_id: survey.survey_ref,
        },
      },
    })
  }

  async fn fetch<T>(
    &self,
    fut: impl Future<Output = Result<T, U::Error>>,
  ) -> Result<T> {
    fut.await.map_err(|e| Error::Upstream(Box::new(e)))
  }
}
