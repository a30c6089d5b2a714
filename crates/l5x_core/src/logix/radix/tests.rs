use chrono::FixedOffset;

use crate::logix::{AtomicKind, AtomicValue, ErrorKind, Radix, format_ldt_with_offset};

fn samples(kind: AtomicKind) -> Vec<AtomicValue> {
	match kind {
		AtomicKind::Bool => vec![AtomicValue::bool(false), AtomicValue::bool(true)],
		AtomicKind::Sint => vec![AtomicValue::sint(0), AtomicValue::sint(-1), AtomicValue::sint(i8::MIN), AtomicValue::sint(65)],
		AtomicKind::Int => vec![AtomicValue::int(0), AtomicValue::int(-300), AtomicValue::int(i16::MAX)],
		AtomicKind::Dint => vec![AtomicValue::dint(0), AtomicValue::dint(-1), AtomicValue::dint(i32::MIN), AtomicValue::dint(0x0102_0304)],
		AtomicKind::Lint => vec![AtomicValue::lint(0), AtomicValue::lint(-42), AtomicValue::lint(1_700_000_000_123_456)],
		AtomicKind::Usint => vec![AtomicValue::usint(0), AtomicValue::usint(u8::MAX)],
		AtomicKind::Uint => vec![AtomicValue::uint(0), AtomicValue::uint(u16::MAX)],
		AtomicKind::Udint => vec![AtomicValue::udint(0), AtomicValue::udint(u32::MAX)],
		AtomicKind::Ulint => vec![AtomicValue::ulint(0), AtomicValue::ulint(u64::MAX)],
		AtomicKind::Real => vec![
			AtomicValue::real(0.0),
			AtomicValue::real(-0.0),
			AtomicValue::real(1.5),
			AtomicValue::real(0.1),
			AtomicValue::real(f32::MAX),
			AtomicValue::real(f32::MIN_POSITIVE),
			AtomicValue::real(1.0e-10),
			AtomicValue::real(f32::INFINITY),
		],
		AtomicKind::Lreal => vec![
			AtomicValue::lreal(0.0),
			AtomicValue::lreal(-2.5),
			AtomicValue::lreal(0.1),
			AtomicValue::lreal(std::f64::consts::PI),
			AtomicValue::lreal(f64::MAX),
			AtomicValue::lreal(f64::NEG_INFINITY),
		],
	}
}

#[test]
fn every_supported_pair_round_trips_bit_for_bit() {
	for radix in Radix::ALL {
		for kind in AtomicKind::ALL {
			if !radix.supports(kind) {
				continue;
			}
			for value in samples(kind) {
				let value = value.with_radix(radix).expect("supported radix applies");
				let text = radix.format(&value).expect("format succeeds");
				let parsed = radix.parse_as(&text, kind).expect("typed parse succeeds");
				assert_eq!(parsed, value, "round trip of {kind} through {radix} via {text:?}");
			}
		}
	}
}

#[test]
fn untyped_parse_preserves_bits_for_full_width_text() {
	for radix in [Radix::Binary, Radix::Octal, Radix::Hex, Radix::Ascii] {
		let value = AtomicValue::dint(-123_456).with_radix(radix).expect("radix applies");
		let text = value.to_text().expect("format succeeds");
		let parsed = radix.parse(&text).expect("untyped parse succeeds");
		assert_eq!(parsed.kind(), AtomicKind::Dint, "{radix} keeps width");
		assert_eq!(parsed.bits(), value.bits());
	}
}

#[test]
fn unsupported_radix_is_reported() {
	let err = Radix::Float.format(&AtomicValue::dint(1)).expect_err("dint float fails");
	assert_eq!(err.kind(), ErrorKind::FormatMismatch);

	let err = Radix::Ascii.format(&AtomicValue::bool(true)).expect_err("bool ascii fails");
	assert_eq!(err.kind(), ErrorKind::FormatMismatch);

	let err = Radix::Hex.parse_as("16#00", AtomicKind::Real).expect_err("real hex fails");
	assert_eq!(err.kind(), ErrorKind::FormatMismatch);

	let err = Radix::Null.format(&AtomicValue::dint(1)).expect_err("null radix fails");
	assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);

	let err = Radix::Null.parse("1").expect_err("null radix parse fails");
	assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
}

#[test]
fn power_of_two_layouts_pad_each_byte() {
	assert_eq!(Radix::Binary.format(&AtomicValue::sint(5)).expect("binary"), "2#0000_0101");
	assert_eq!(Radix::Binary.format(&AtomicValue::bool(true)).expect("binary bool"), "2#1");
	assert_eq!(Radix::Octal.format(&AtomicValue::int(255)).expect("octal"), "8#000_377");
	assert_eq!(Radix::Hex.format(&AtomicValue::dint(255)).expect("hex"), "16#0000_00ff");
	assert_eq!(Radix::Hex.format(&AtomicValue::dint(-1)).expect("hex"), "16#ffff_ffff");
	assert_eq!(Radix::Hex.format(&AtomicValue::lint(1)).expect("hex"), "16#0000_0000_0000_0001");
}

#[test]
fn power_of_two_parse_selects_width_from_byte_count() {
	assert_eq!(Radix::Binary.parse("2#1").expect("bool").kind(), AtomicKind::Bool);
	assert_eq!(Radix::Hex.parse("16#0").expect("bool").kind(), AtomicKind::Bool);
	assert_eq!(Radix::Binary.parse("2#0000_0001").expect("sint").kind(), AtomicKind::Sint);
	assert_eq!(Radix::Hex.parse("16#1234").expect("int").kind(), AtomicKind::Int);
	assert_eq!(Radix::Hex.parse("16#12_3456").expect("dint").kind(), AtomicKind::Dint);
	assert_eq!(Radix::Octal.parse("8#001_002_003_004_005").expect("lint").kind(), AtomicKind::Lint);

	let err = Radix::Hex.parse("16#01_0000_0000_0000_0000").expect_err("nine bytes overflow");
	assert_eq!(err.kind(), ErrorKind::RangeViolation);

	let err = Radix::Octal.parse("8#777").expect_err("octal byte overflow");
	assert_eq!(err.kind(), ErrorKind::FormatMismatch);
}

#[test]
fn typed_parse_checks_width() {
	let value = Radix::Hex.parse_as("16#ff", AtomicKind::Sint).expect("sint parses");
	assert_eq!(value.as_i64(), Some(-1));

	let err = Radix::Hex.parse_as("16#0100", AtomicKind::Usint).expect_err("overflow");
	assert_eq!(err.kind(), ErrorKind::RangeViolation);

	let err = Radix::Decimal.parse_as("128", AtomicKind::Sint).expect_err("overflow");
	assert_eq!(err.kind(), ErrorKind::RangeViolation);

	let err = Radix::Decimal.parse_as("2", AtomicKind::Bool).expect_err("bool overflow");
	assert_eq!(err.kind(), ErrorKind::RangeViolation);
}

#[test]
fn decimal_width_selection() {
	let cases = [
		("127", AtomicKind::Sint),
		("128", AtomicKind::Usint),
		("32767", AtomicKind::Int),
		("32768", AtomicKind::Uint),
		("2147483647", AtomicKind::Dint),
		("-129", AtomicKind::Int),
		("4294967295", AtomicKind::Udint),
		("18446744073709551615", AtomicKind::Ulint),
	];
	for (text, kind) in cases {
		let value = Radix::Decimal.parse(text).expect("decimal parses");
		assert_eq!(value.kind(), kind, "width for {text}");
		assert_eq!(value.to_text().expect("format"), text);
	}

	let err = Radix::Decimal.parse("18446744073709551616").expect_err("too large");
	assert_eq!(err.kind(), ErrorKind::RangeViolation);
}

#[test]
fn float_forms_render_with_a_decimal_point() {
	assert_eq!(Radix::Float.format(&AtomicValue::real(1.0)).expect("float"), "1.0");
	assert_eq!(Radix::Float.format(&AtomicValue::real(0.1)).expect("float"), "0.1");
	assert_eq!(Radix::Float.format(&AtomicValue::real(f32::NAN)).expect("float"), "1.#QNAN");
	assert_eq!(Radix::Exponential.format(&AtomicValue::real(1.5)).expect("exp"), "1.50000000e+000");
	assert_eq!(Radix::Exponential.format(&AtomicValue::real(-0.125)).expect("exp"), "-1.25000000e-001");
	assert_eq!(Radix::Exponential.format(&AtomicValue::lreal(1.0)).expect("exp"), "1.0000000000000000e+000");
}

#[test]
fn float_parse_picks_real_unless_precision_requires_lreal() {
	assert_eq!(Radix::Float.parse("3.25").expect("real").kind(), AtomicKind::Real);
	assert_eq!(Radix::Float.parse("0.1000000000000000055").expect("lreal").kind(), AtomicKind::Lreal);
	assert_eq!(Radix::Exponential.parse("1.0e+300").expect("lreal").kind(), AtomicKind::Lreal);
	assert!(Radix::Float.parse(QNAN_TEXT).expect("nan parses").as_f64().is_nan());

	let err = Radix::Float.parse("1.5e3").expect_err("exponent is not float text");
	assert_eq!(err.kind(), ErrorKind::FormatMismatch);
}

const QNAN_TEXT: &str = "1.#QNAN";

#[test]
fn ascii_escape_idempotence() {
	let value = AtomicValue::from_be_bytes(AtomicKind::Dint, &[0x00, b'A', 0x09, 0x01]).expect("dint from bytes");
	let text = Radix::Ascii.format(&value).expect("ascii formats");
	assert_eq!(text, "'$00A$09$01'");

	let three = AtomicValue::from_be_bytes(AtomicKind::Dint, &[b'A', 0x09, 0x01]).expect("dint from bytes");
	let parsed = Radix::Ascii.parse("'A$09$01'").expect("ascii parses");
	assert_eq!(parsed.bits(), three.bits());
	assert_eq!(&parsed.to_be_bytes()[1..], &[b'A', 0x09, 0x01]);

	let named = Radix::Ascii.parse("'A$t$01'").expect("named escape parses");
	assert_eq!(named.bits(), parsed.bits());
	assert_eq!(Radix::Ascii.format(&named).expect("formats"), "'$00A$09$01'");
}

#[test]
fn ascii_selects_width_from_character_count() {
	assert_eq!(Radix::Ascii.parse("'A'").expect("sint").kind(), AtomicKind::Sint);
	assert_eq!(Radix::Ascii.parse("'AB'").expect("int").kind(), AtomicKind::Int);
	assert_eq!(Radix::Ascii.parse("'ABC'").expect("dint").kind(), AtomicKind::Dint);
	assert_eq!(Radix::Ascii.parse("'ABCDEFGH'").expect("lint").kind(), AtomicKind::Lint);

	let err = Radix::Ascii.parse("'ABCDEFGHI'").expect_err("nine bytes");
	assert_eq!(err.kind(), ErrorKind::RangeViolation);
	assert!(Radix::Ascii.parse("''").is_err());
}

#[test]
fn date_time_renders_microseconds_since_epoch() {
	let value = AtomicValue::lint(0).with_radix(Radix::DateTime).expect("date radix");
	assert_eq!(value.to_text().expect("formats"), "DT#1970-01-01-00:00:00.000_000Z");

	let parsed = Radix::DateTime.parse("DT#2024-03-05-06:07:08.123_456Z").expect("parses");
	assert_eq!(parsed.kind(), AtomicKind::Lint);
	assert_eq!(parsed.as_i64(), Some(1_709_618_828_123_456));
	assert_eq!(parsed.to_text().expect("formats"), "DT#2024-03-05-06:07:08.123_456Z");

	let before = Radix::DateTime.parse("DT#1969-12-31-23:59:59.999_999Z").expect("parses");
	assert_eq!(before.as_i64(), Some(-1));
}

#[test]
fn date_time_radix_is_limited_to_four_digit_years() {
	let last = Radix::DateTime.parse("DT#9999-12-31-23:59:59.999_999Z").expect("last representable instant");
	assert_eq!(last.as_i64(), Some(253_402_300_799_999_999));
	let first = AtomicValue::lint(-62_135_596_800_000_000).with_radix(Radix::DateTime).expect("first representable instant");
	assert_eq!(first.to_text().expect("formats"), "DT#0001-01-01-00:00:00.000_000Z");

	for micros in [253_402_300_800_000_000, -62_135_596_800_000_001, i64::MAX, i64::MIN] {
		let value = AtomicValue::lint(micros);
		assert!(!Radix::DateTime.supports_value(&value), "{micros}");
		let err = value.with_radix(Radix::DateTime).expect_err("rejected when the radix is assigned");
		assert_eq!(err.kind(), ErrorKind::RangeViolation);
	}
	assert!(Radix::DateTimeNs.supports_value(&AtomicValue::lint(i64::MAX)));
}

#[test]
fn date_time_ns_honours_offset() {
	let utc = FixedOffset::east_opt(0).expect("utc offset");
	assert_eq!(format_ldt_with_offset(1, utc).expect("formats"), "LDT#1970-01-01-00:00:00.000_000_001(UTC+00:00)");

	let value = Radix::DateTimeNs.parse("LDT#1970-01-01-01:00:00.000_000_000(UTC+01:00)").expect("parses");
	assert_eq!(value.as_i64(), Some(0));

	let minus = FixedOffset::west_opt(5 * 3_600).expect("offset");
	let text = format_ldt_with_offset(1_500_000_000, minus).expect("formats");
	assert_eq!(text, "LDT#1969-12-31-19:00:01.500_000_000(UTC-05:00)");
	assert_eq!(Radix::DateTimeNs.parse(&text).expect("parses").as_i64(), Some(1_500_000_000));
}

#[test]
fn inference_matches_canonical_examples() {
	let cases = [
		("2#0000_0101", Radix::Binary),
		("8#017", Radix::Octal),
		("5", Radix::Decimal),
		("-17", Radix::Decimal),
		("16#00ff", Radix::Hex),
		("1.5", Radix::Float),
		("1.#QNAN", Radix::Float),
		("1.50000000e+000", Radix::Exponential),
		("'AB$0D'", Radix::Ascii),
		("DT#1970-01-01-00:00:00.000_000Z", Radix::DateTime),
		("LDT#1970-01-01-00:00:00.000_000_000(UTC+00:00)", Radix::DateTimeNs),
	];
	for (text, radix) in cases {
		assert_eq!(Radix::infer(text).expect("inference succeeds"), radix, "infer {text}");
		assert_eq!(Radix::try_infer(text), Some(radix));
	}
}

#[test]
fn inference_rejects_malformed_text() {
	for text in ["", "abc", "2#102", "8#9", "16#xyz", "1e5", "'unterminated", "DT#yesterday", "LDT#1970-01-01-00:00:00", "1_000"] {
		assert_eq!(Radix::try_infer(text), None, "infer {text:?}");
		let err = Radix::infer(text).expect_err("inference fails");
		assert_eq!(err.kind(), ErrorKind::FormatMismatch);
	}
}

#[test]
fn try_variants_swallow_errors() {
	assert!(Radix::Hex.try_parse("nope").is_none());
	assert_eq!(Radix::Decimal.try_parse("7").map(|value| value.kind()), Some(AtomicKind::Sint));
	assert_eq!(Radix::parse_any("16#0f").expect("parses").radix(), Radix::Hex);
}

#[test]
fn radix_names_round_trip() {
	for radix in Radix::ALL {
		assert_eq!(Radix::from_name(radix.name()), Some(radix));
		assert_eq!(radix.name().parse::<Radix>().expect("name parses"), radix);
	}
	assert_eq!(Radix::from_name("ascii"), Some(Radix::Ascii));
	assert_eq!(Radix::from_name("Date/Time (NS)"), Some(Radix::DateTimeNs));
}
