use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};

use crate::logix::{AtomicValue, LogixError, Radix, Result};

const STAMP_FORMAT: &str = "%Y-%m-%d-%H:%M:%S";
const MICROS_PER_SEC: i64 = 1_000_000;
const NANOS_PER_SEC: i64 = 1_000_000_000;

pub(super) fn format_dt(value: &AtomicValue) -> Result<String> {
	let micros = value.bits() as i64;
	let stamp = utc_from_micros(micros)?;
	let sub = micros.rem_euclid(MICROS_PER_SEC) as u32;

	Ok(format!("DT#{}.{:03}_{:03}Z", stamp.format(STAMP_FORMAT), sub / 1_000, sub % 1_000))
}

pub(super) fn format_ldt(value: &AtomicValue) -> Result<String> {
	let nanos = value.bits() as i64;
	let stamp = utc_from_nanos(nanos)?;
	let offset = Local.offset_from_utc_datetime(&stamp.naive_utc());
	format_ldt_with_offset(nanos, offset)
}

/// Render nanoseconds since the Unix epoch as `LDT#` text in a fixed UTC offset.
pub fn format_ldt_with_offset(nanos: i64, offset: FixedOffset) -> Result<String> {
	let stamp = utc_from_nanos(nanos)?.with_timezone(&offset);
	let sub = nanos.rem_euclid(NANOS_PER_SEC) as u32;

	Ok(format!(
		"LDT#{}.{:03}_{:03}_{:03}({})",
		stamp.format(STAMP_FORMAT),
		sub / 1_000_000,
		sub / 1_000 % 1_000,
		sub % 1_000,
		render_offset(offset)
	))
}

/// Parse `DT#` text into microseconds since the Unix epoch.
pub(super) fn parse_dt(text: &str) -> Result<i64> {
	let body = text
		.strip_prefix("DT#")
		.and_then(|rest| rest.strip_suffix('Z'))
		.ok_or_else(|| LogixError::format(Radix::DateTime, text))?;

	let (stamp, fraction) = split_fraction(body);
	let naive = NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).map_err(|_| LogixError::format(Radix::DateTime, text))?;
	let sub = parse_fraction(fraction, 6).ok_or_else(|| LogixError::format(Radix::DateTime, text))?;

	naive
		.and_utc()
		.timestamp()
		.checked_mul(MICROS_PER_SEC)
		.and_then(|micros| micros.checked_add(sub))
		.ok_or_else(|| LogixError::NumberTooLarge { text: text.to_owned() })
}

/// Parse `LDT#` text into nanoseconds since the Unix epoch.
pub(super) fn parse_ldt(text: &str) -> Result<i64> {
	let body = text
		.strip_prefix("LDT#")
		.and_then(|rest| rest.strip_suffix(')'))
		.ok_or_else(|| LogixError::format(Radix::DateTimeNs, text))?;
	let (local, zone) = body.split_once('(').ok_or_else(|| LogixError::format(Radix::DateTimeNs, text))?;
	let offset = parse_offset(zone).ok_or_else(|| LogixError::format(Radix::DateTimeNs, text))?;

	let (stamp, fraction) = split_fraction(local);
	let naive = NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).map_err(|_| LogixError::format(Radix::DateTimeNs, text))?;
	let sub = parse_fraction(fraction, 9).ok_or_else(|| LogixError::format(Radix::DateTimeNs, text))?;
	let stamp = offset
		.from_local_datetime(&naive)
		.single()
		.ok_or_else(|| LogixError::format(Radix::DateTimeNs, text))?;

	stamp
		.timestamp()
		.checked_mul(NANOS_PER_SEC)
		.and_then(|nanos| nanos.checked_add(sub))
		.ok_or_else(|| LogixError::NumberTooLarge { text: text.to_owned() })
}

/// `DT#` text carries a four-digit year; counts outside years 1..=9999 have no text form.
pub(super) fn check_dt(micros: i64) -> Result<()> {
	let year = utc_from_micros(micros)?.year();
	if (1..=9999).contains(&year) {
		Ok(())
	} else {
		Err(LogixError::DateOutOfRange { value: micros })
	}
}

fn utc_from_micros(micros: i64) -> Result<DateTime<Utc>> {
	let secs = micros.div_euclid(MICROS_PER_SEC);
	let sub = micros.rem_euclid(MICROS_PER_SEC) as u32;
	DateTime::<Utc>::from_timestamp(secs, sub * 1_000).ok_or(LogixError::DateOutOfRange { value: micros })
}

fn utc_from_nanos(nanos: i64) -> Result<DateTime<Utc>> {
	let secs = nanos.div_euclid(NANOS_PER_SEC);
	let sub = nanos.rem_euclid(NANOS_PER_SEC) as u32;
	DateTime::<Utc>::from_timestamp(secs, sub).ok_or(LogixError::DateOutOfRange { value: nanos })
}

fn split_fraction(body: &str) -> (&str, Option<&str>) {
	match body.split_once('.') {
		Some((stamp, fraction)) => (stamp, Some(fraction)),
		None => (body, None),
	}
}

/// Fractional digits with `_` grouping, right-padded to `digits` places.
fn parse_fraction(fraction: Option<&str>, digits: usize) -> Option<i64> {
	let Some(fraction) = fraction else {
		return Some(0);
	};
	let cleaned: String = fraction.chars().filter(|ch| *ch != '_').collect();
	if cleaned.is_empty() || cleaned.len() > digits || !cleaned.bytes().all(|byte| byte.is_ascii_digit()) {
		return None;
	}
	let value: i64 = cleaned.parse().ok()?;
	Some(value * 10_i64.pow((digits - cleaned.len()) as u32))
}

fn render_offset(offset: FixedOffset) -> String {
	let secs = offset.local_minus_utc();
	let sign = if secs < 0 { '-' } else { '+' };
	let abs = secs.unsigned_abs();
	format!("UTC{sign}{:02}:{:02}", abs / 3_600, abs % 3_600 / 60)
}

fn parse_offset(zone: &str) -> Option<FixedOffset> {
	let rest = zone.strip_prefix("UTC")?;
	if rest.is_empty() {
		return FixedOffset::east_opt(0);
	}

	let (sign, rest) = match rest.as_bytes().first()? {
		b'+' => (1, &rest[1..]),
		b'-' => (-1, &rest[1..]),
		_ => return None,
	};
	let (hours, minutes) = rest.split_once(':')?;
	if hours.len() != 2 || minutes.len() != 2 {
		return None;
	}
	let hours: i32 = hours.parse().ok()?;
	let minutes: i32 = minutes.parse().ok()?;
	if minutes >= 60 {
		return None;
	}
	FixedOffset::east_opt(sign * (hours * 3_600 + minutes * 60))
}
