//! Local time formatting for markdown output.
//!
//! Models that print clock times implement [`ZonedDisplay`]. Their plain
//! [`fmt::Display`] uses the system zone; interfaces that know the configured
//! zone render through [`ZonedDisplay::in_zone`] so printed times match the
//! times the user entered.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Markdown formatting that depends on the zone used for clock times.
pub trait ZonedDisplay {
    fn fmt_zoned(&self, f: &mut fmt::Formatter<'_>, tz: &TimeZone) -> fmt::Result;

    /// Borrows `self` as a value that displays in `tz`.
    fn in_zone<'a>(&'a self, tz: &'a TimeZone) -> InZone<'a, Self> {
        InZone { value: self, tz }
    }
}

/// A [`ZonedDisplay`] value bound to a time zone.
pub struct InZone<'a, T: ?Sized> {
    value: &'a T,
    tz: &'a TimeZone,
}

impl<T: ZonedDisplay + ?Sized> fmt::Display for InZone<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt_zoned(f, self.tz)
    }
}

/// Implements `Display` in the system zone for [`ZonedDisplay`] types.
macro_rules! display_in_system_zone {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ::std::fmt::Display for $ty {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    $crate::display::ZonedDisplay::fmt_zoned(
                        self,
                        f,
                        &::jiff::tz::TimeZone::system(),
                    )
                }
            }
        )+
    };
}

pub(crate) use display_in_system_zone;

/// Formats a timestamp as `YYYY-MM-DD HH:MM TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp, pub &'a TimeZone);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0.to_zoned(self.1.clone()).strftime("%Y-%m-%d %H:%M %Z")
        )
    }
}

/// Formats a start/end pair as `HH:MM-HH:MM`.
pub struct LocalTimeRange<'a>(pub &'a Timestamp, pub &'a Timestamp, pub &'a TimeZone);

impl fmt::Display for LocalTimeRange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.0.to_zoned(self.2.clone()).strftime("%H:%M"),
            self.1.to_zoned(self.2.clone()).strftime("%H:%M")
        )
    }
}
