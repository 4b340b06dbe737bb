//! US Eastern daylight-saving rule.

/// Returns whether daylight-saving time is in effect on the given date.
///
/// `weekday` counts from Monday = 0. April through October are always DST and
/// December through February never are. For March and November the switch day is
/// found from `weekday` with day-of-month offsets (`14 - weekday` and
/// `8 - weekday`). Those offsets approximate "second Sunday in March" and "first
/// Sunday in November"; they are kept as-is so displayed counts match the
/// deployed appliance.
#[must_use]
pub const fn is_dst(_year: i32, month: u8, day: u8, weekday: u8) -> bool {
    match month {
        4..=10 => true,
        // out-of-range weekdays saturate instead of wrapping
        3 => day >= 14_u8.saturating_sub(weekday),
        11 => day < 8_u8.saturating_sub(weekday),
        _ => false,
    }
}
