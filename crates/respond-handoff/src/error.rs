//! Error type for `respond-handoff`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// The collection instrument is not eligible for this handoff path or
  /// lacks required classifiers. A client-visible authorization failure,
  /// not a transient error.
  #[error("invalid handoff: {0}")]
  InvalidHandoff(String),

  /// A mandatory collection-exercise event is absent. Upstream data defect.
  #[error(
    "mandatory event {tag:?} not found for collection exercise \
     {collection_exercise_id}"
  )]
  MissingMandatoryEvent {
    tag:                    String,
    collection_exercise_id: Uuid,
  },

  /// An event matched but its timestamp could not be parsed. A matched-but-
  /// unusable event must not be treated as absent.
  #[error("unable to parse event timestamp {0:?}")]
  UnparseableDate(String),

  #[error("token error: {0}")]
  Token(#[from] respond_core::Error),

  /// Upstream transport failure, propagated unchanged from the collaborator
  /// layer. Retry policy belongs to that layer, not here.
  #[error("upstream error: {0}")]
  Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
