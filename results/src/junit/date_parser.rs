use chrono::{DateTime, FixedOffset};
use speedate::{Date as SpeedateDate, DateTime as SpeedateDateTime};

/// Which shape the previous successful parse had. Report files are usually consistent, so
/// the parser tries that shape first on the next value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum DateShape {
    DateTime,
    Date,
}

#[derive(Debug, Clone, Default)]
pub struct ReportDateParser {
    last_shape: Option<DateShape>,
}

impl ReportDateParser {
    pub fn parse_date<T: AsRef<str>>(&mut self, value: T) -> Option<DateTime<FixedOffset>> {
        let value = value.as_ref().trim();

        let parsed = match self.last_shape {
            Some(DateShape::Date) => {
                Self::parse_naive_date(value).or_else(|| Self::parse_date_time(value))
            }
            _ => Self::parse_date_time(value).or_else(|| Self::parse_naive_date(value)),
        };

        parsed.map(|(shape, date_time)| {
            self.last_shape = Some(shape);
            date_time
        })
    }

    fn parse_date_time(value: &str) -> Option<(DateShape, DateTime<FixedOffset>)> {
        let parsed = SpeedateDateTime::parse_str(value).ok()?;
        let nanos = parsed.time.microsecond.checked_mul(1_000)?;
        // Timestamps without an offset are interpreted as UTC.
        let offset_secs = parsed.time.tz_offset.unwrap_or(0);
        let offset = FixedOffset::east_opt(offset_secs)?;
        let utc = DateTime::from_timestamp(parsed.timestamp() - i64::from(offset_secs), nanos)?;
        Some((DateShape::DateTime, utc.with_timezone(&offset)))
    }

    fn parse_naive_date(value: &str) -> Option<(DateShape, DateTime<FixedOffset>)> {
        let parsed = SpeedateDate::parse_str(value).ok()?;
        let utc = DateTime::from_timestamp(parsed.timestamp(), 0)?;
        Some((DateShape::Date, utc.fixed_offset()))
    }
}
