//! [`EventResolver`] — named-event lookup over collection-exercise events.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use uuid::Uuid;

use crate::{Error, Result, upstream::CollectionExerciseEvent};

/// Resolves tagged collection-exercise events to dates in a fixed display
/// zone.
///
/// The zone is injected rather than taken from the process environment so a
/// timestamp just before local midnight lands on the correct local day
/// regardless of where the service runs.
#[derive(Debug, Clone, Copy)]
pub struct EventResolver {
  display_offset: FixedOffset,
}

impl EventResolver {
  pub fn new(display_offset: FixedOffset) -> Self {
    Self { display_offset }
  }

  /// A resolver for a whole-hour UTC offset, as carried in portal config.
  /// Offsets outside ±24 h fall back to UTC.
  pub fn with_utc_offset_hours(hours: i32) -> Self {
    let offset =
      FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix());
    Self::new(offset)
  }

  /// Resolve `tag` to a calendar date in the display zone.
  ///
  /// Scans `events` in the order given and takes the first event whose tag
  /// matches and whose timestamp is present; tag matches without a timestamp
  /// are skipped. A matched timestamp that fails to parse is a hard error
  /// regardless of `mandatory`. When nothing matches: `Ok(None)` if the
  /// event is optional, [`Error::MissingMandatoryEvent`] otherwise.
  pub fn resolve(
    &self,
    tag: &str,
    events: &[CollectionExerciseEvent],
    mandatory: bool,
    collection_exercise_id: Uuid,
  ) -> Result<Option<NaiveDate>> {
    Ok(
      self
        .resolve_timestamp(tag, events, mandatory, collection_exercise_id)?
        .map(|dt| dt.date_naive()),
    )
  }

  /// Resolve `tag` to the full timestamp, converted to the display zone but
  /// not truncated. Used where the downstream system needs the instant
  /// rather than the day.
  pub fn resolve_timestamp(
    &self,
    tag: &str,
    events: &[CollectionExerciseEvent],
    mandatory: bool,
    collection_exercise_id: Uuid,
  ) -> Result<Option<DateTime<FixedOffset>>> {
    let matched = events.iter().find(|event| {
      event.tag == tag
        && event.timestamp.as_deref().is_some_and(|ts| !ts.is_empty())
    });

    let Some(event) = matched else {
      if mandatory {
        return Err(Error::MissingMandatoryEvent {
          tag: tag.to_owned(),
          collection_exercise_id,
        });
      }
      return Ok(None);
    };

    let raw = event.timestamp.as_deref().unwrap_or_default();
    let parsed = DateTime::parse_from_rfc3339(raw)
      .map_err(|_| Error::UnparseableDate(raw.to_owned()))?;

    Ok(Some(parsed.with_timezone(&self.display_offset)))
  }
}
