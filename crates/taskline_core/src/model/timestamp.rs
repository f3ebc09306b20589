use crate::error::AppError;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

const DATE_TIME_SECONDS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const DATE_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");
const DATE_ONLY: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS]` or a bare date (midnight).
/// Naive forms are read in the local offset.
pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, AppError> {
    parse_timestamp_with_offset(raw, local_offset())
}

pub(crate) fn parse_timestamp_with_offset(
    raw: &str,
    offset: UtcOffset,
) -> Result<OffsetDateTime, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("Please provide a date and time."));
    }

    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(parsed);
    }

    let naive = PrimitiveDateTime::parse(trimmed, DATE_TIME_SECONDS)
        .or_else(|_| PrimitiveDateTime::parse(trimmed, DATE_TIME))
        .or_else(|_| {
            Date::parse(trimmed, DATE_ONLY)
                .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT))
        })
        .map_err(|_| {
            AppError::invalid_input(format!(
                "\"{trimmed}\" is not a date. Use YYYY-MM-DD, YYYY-MM-DD HH:MM or RFC 3339."
            ))
        })?;

    Ok(naive.assume_offset(offset))
}

pub fn format_timestamp(value: OffsetDateTime) -> Result<String, AppError> {
    format_timestamp_in(value, local_offset())
}

pub(crate) fn format_timestamp_in(
    value: OffsetDateTime,
    offset: UtcOffset,
) -> Result<String, AppError> {
    value
        .to_offset(offset)
        .format(DATE_TIME)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
