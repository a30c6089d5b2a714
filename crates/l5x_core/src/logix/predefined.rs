use crate::logix::value::STANDARD_STRING_CAPACITY;
use crate::logix::{
	ArrayValue, AtomicKind, AtomicValue, Dimensions, LogixError, LogixValue, Radix, Result, SerializationShape, StringValue, StructureValue,
};

/// How a parameter-style member is written as an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
	/// Not a parameter member; lives in a decorated structure.
	None,
	/// `BOOL` written as `true`/`false`.
	Bool,
	/// Number written through the member radix.
	Numeric,
	/// `LINT` written as `DT#` text.
	DateTime,
	/// Free text written verbatim.
	Text,
}

/// Layout of one member of a predefined structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredefinedMember {
	/// Member name.
	pub name: &'static str,
	/// Atomic kind name or `STRING`.
	pub data_type: &'static str,
	/// Array length, `0` for a scalar.
	pub len: usize,
	/// Radix override; `None` uses the kind default.
	pub radix: Option<Radix>,
	/// Attribute encoding for parameter-style structures.
	pub param: ParamKind,
}

const fn field(name: &'static str, data_type: &'static str) -> PredefinedMember {
	PredefinedMember {
		name,
		data_type,
		len: 0,
		radix: None,
		param: ParamKind::None,
	}
}

const fn param(name: &'static str, data_type: &'static str, param: ParamKind) -> PredefinedMember {
	PredefinedMember {
		name,
		data_type,
		len: 0,
		radix: None,
		param,
	}
}

const fn hex_param(name: &'static str, data_type: &'static str) -> PredefinedMember {
	PredefinedMember {
		name,
		data_type,
		len: 0,
		radix: Some(Radix::Hex),
		param: ParamKind::Numeric,
	}
}

const fn dt_param(name: &'static str) -> PredefinedMember {
	PredefinedMember {
		name,
		data_type: "LINT",
		len: 0,
		radix: Some(Radix::DateTime),
		param: ParamKind::DateTime,
	}
}

const TIMER: &[PredefinedMember] = &[field("PRE", "DINT"), field("ACC", "DINT"), field("EN", "BOOL"), field("TT", "BOOL"), field("DN", "BOOL")];

const COUNTER: &[PredefinedMember] = &[
	field("PRE", "DINT"),
	field("ACC", "DINT"),
	field("CU", "BOOL"),
	field("CD", "BOOL"),
	field("DN", "BOOL"),
	field("OV", "BOOL"),
	field("UN", "BOOL"),
];

const CONTROL: &[PredefinedMember] = &[
	field("LEN", "DINT"),
	field("POS", "DINT"),
	field("EN", "BOOL"),
	field("EU", "BOOL"),
	field("DN", "BOOL"),
	field("EM", "BOOL"),
	field("ER", "BOOL"),
	field("UL", "BOOL"),
	field("IN", "BOOL"),
	field("FD", "BOOL"),
];

const PID: &[PredefinedMember] = &[
	field("CTL", "DINT"),
	field("SP", "REAL"),
	field("KP", "REAL"),
	field("KI", "REAL"),
	field("KD", "REAL"),
	field("BIAS", "REAL"),
	field("MAXS", "REAL"),
	field("MINS", "REAL"),
	field("DB", "REAL"),
	field("SO", "REAL"),
	field("MAXO", "REAL"),
	field("MINO", "REAL"),
	field("UPD", "REAL"),
	field("PV", "REAL"),
	field("ERR", "REAL"),
	field("OUT", "REAL"),
	field("PVH", "REAL"),
	field("PVL", "REAL"),
	field("DVP", "REAL"),
	field("DVN", "REAL"),
	field("PVDB", "REAL"),
	field("DVDB", "REAL"),
	field("MAXI", "REAL"),
	field("MINI", "REAL"),
	field("TIE", "REAL"),
	field("MAXCV", "REAL"),
	field("MINCV", "REAL"),
	field("MINTIE", "REAL"),
	field("MAXTIE", "REAL"),
	PredefinedMember {
		name: "DATA",
		data_type: "REAL",
		len: 17,
		radix: None,
		param: ParamKind::None,
	},
	field("EN", "BOOL"),
	field("CT", "BOOL"),
	field("CL", "BOOL"),
	field("PVT", "BOOL"),
	field("DOE", "BOOL"),
	field("SWM", "BOOL"),
	field("CA", "BOOL"),
	field("MO", "BOOL"),
	field("PE", "BOOL"),
	field("NDF", "BOOL"),
	field("NOBC", "BOOL"),
	field("NOZC", "BOOL"),
	field("INI", "BOOL"),
	field("SPOR", "BOOL"),
	field("OLL", "BOOL"),
	field("OLH", "BOOL"),
	field("EWD", "BOOL"),
	field("DVNA", "BOOL"),
	field("DVPA", "BOOL"),
	field("PVLA", "BOOL"),
	field("PVHA", "BOOL"),
];

const PHASE: &[PredefinedMember] = &[
	field("State", "DINT"),
	field("Running", "BOOL"),
	field("Holding", "BOOL"),
	field("Restarting", "BOOL"),
	field("Stopping", "BOOL"),
	field("Aborting", "BOOL"),
	field("Resetting", "BOOL"),
	field("Idle", "BOOL"),
	field("Held", "BOOL"),
	field("Complete", "BOOL"),
	field("Stopped", "BOOL"),
	field("Aborted", "BOOL"),
	field("Substate", "DINT"),
	field("Pausing", "BOOL"),
	field("Paused", "BOOL"),
	field("AutoPause", "BOOL"),
	field("StepIndex", "DINT"),
	field("Failure", "DINT"),
	field("UnitID", "DINT"),
	field("Owner", "DINT"),
	field("PendingRequest", "DINT"),
	field("DownloadInputParameters", "BOOL"),
	field("DownloadInputParametersSubset", "BOOL"),
	field("UploadOutputParameters", "BOOL"),
	field("UploadOutputParametersSubset", "BOOL"),
	field("DownloadOutputParameterLimits", "BOOL"),
	field("AcquiredResources", "BOOL"),
	field("ProducerConfirm", "BOOL"),
	field("NewInputParameters", "BOOL"),
];

const MESSAGE: &[PredefinedMember] = &[
	param("MessageType", "STRING", ParamKind::Text),
	param("RequestedLength", "INT", ParamKind::Numeric),
	param("ConnectedFlag", "DINT", ParamKind::Numeric),
	param("ConnectionPath", "STRING", ParamKind::Text),
	param("CommTypeCode", "DINT", ParamKind::Numeric),
	hex_param("ServiceCode", "INT"),
	hex_param("ObjectType", "INT"),
	param("TargetObject", "STRING", ParamKind::Text),
	hex_param("AttributeNumber", "INT"),
	param("LocalIndex", "DINT", ParamKind::Numeric),
	param("LocalElement", "STRING", ParamKind::Text),
	param("DestinationTag", "STRING", ParamKind::Text),
	param("CacheConnections", "BOOL", ParamKind::Bool),
	param("LargePacketUsage", "BOOL", ParamKind::Bool),
];

const ALARM_ANALOG: &[PredefinedMember] = &[
	param("EnableIn", "BOOL", ParamKind::Bool),
	param("InFault", "BOOL", ParamKind::Bool),
	param("HHEnabled", "BOOL", ParamKind::Bool),
	param("HEnabled", "BOOL", ParamKind::Bool),
	param("LEnabled", "BOOL", ParamKind::Bool),
	param("LLEnabled", "BOOL", ParamKind::Bool),
	param("AckRequired", "BOOL", ParamKind::Bool),
	param("ProgAckAll", "BOOL", ParamKind::Bool),
	param("OperAckAll", "BOOL", ParamKind::Bool),
	param("UseProgTime", "BOOL", ParamKind::Bool),
	dt_param("ProgTime"),
	param("HHLimit", "REAL", ParamKind::Numeric),
	param("HHSeverity", "DINT", ParamKind::Numeric),
	param("HLimit", "REAL", ParamKind::Numeric),
	param("HSeverity", "DINT", ParamKind::Numeric),
	param("LLimit", "REAL", ParamKind::Numeric),
	param("LSeverity", "DINT", ParamKind::Numeric),
	param("LLLimit", "REAL", ParamKind::Numeric),
	param("LLSeverity", "DINT", ParamKind::Numeric),
	param("MinDurationPRE", "DINT", ParamKind::Numeric),
	param("ShelveDuration", "DINT", ParamKind::Numeric),
	param("MaxShelveDuration", "DINT", ParamKind::Numeric),
	param("Deadband", "REAL", ParamKind::Numeric),
	param("ROCPosLimit", "REAL", ParamKind::Numeric),
	param("ROCPosSeverity", "DINT", ParamKind::Numeric),
	param("ROCNegLimit", "REAL", ParamKind::Numeric),
	param("ROCNegSeverity", "DINT", ParamKind::Numeric),
	param("ROCPeriod", "REAL", ParamKind::Numeric),
	param("AssocTag1", "STRING", ParamKind::Text),
	param("AssocTag2", "STRING", ParamKind::Text),
];

const ALARM_DIGITAL: &[PredefinedMember] = &[
	param("Severity", "DINT", ParamKind::Numeric),
	param("MinDurationPRE", "DINT", ParamKind::Numeric),
	param("ShelveDuration", "DINT", ParamKind::Numeric),
	param("MaxShelveDuration", "DINT", ParamKind::Numeric),
	dt_param("ProgTime"),
	param("EnableIn", "BOOL", ParamKind::Bool),
	param("In", "BOOL", ParamKind::Bool),
	param("InFault", "BOOL", ParamKind::Bool),
	param("Condition", "BOOL", ParamKind::Bool),
	param("AckRequired", "BOOL", ParamKind::Bool),
	param("Latched", "BOOL", ParamKind::Bool),
	param("ProgAck", "BOOL", ParamKind::Bool),
	param("OperAck", "BOOL", ParamKind::Bool),
	param("ProgReset", "BOOL", ParamKind::Bool),
	param("OperReset", "BOOL", ParamKind::Bool),
	param("UseProgTime", "BOOL", ParamKind::Bool),
	param("AssocTag1", "STRING", ParamKind::Text),
	param("AssocTag2", "STRING", ParamKind::Text),
];

/// Closed catalog of structure types with built-in member layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedType {
	/// `TIMER`
	Timer,
	/// `COUNTER`
	Counter,
	/// `CONTROL`
	Control,
	/// `PID`
	Pid,
	/// `PHASE`
	Phase,
	/// `MESSAGE`, written as `MessageParameters`.
	Message,
	/// `ALARM_ANALOG`, written as `AlarmAnalogParameters`.
	AlarmAnalog,
	/// `ALARM_DIGITAL`, written as `AlarmDigitalParameters`.
	AlarmDigital,
	/// `STRING`, 82 characters.
	String,
}

impl PredefinedType {
	/// Every catalog entry.
	pub const ALL: [PredefinedType; 9] = [
		PredefinedType::Timer,
		PredefinedType::Counter,
		PredefinedType::Control,
		PredefinedType::Pid,
		PredefinedType::Phase,
		PredefinedType::Message,
		PredefinedType::AlarmAnalog,
		PredefinedType::AlarmDigital,
		PredefinedType::String,
	];

	/// Canonical type name.
	pub fn name(self) -> &'static str {
		match self {
			Self::Timer => "TIMER",
			Self::Counter => "COUNTER",
			Self::Control => "CONTROL",
			Self::Pid => "PID",
			Self::Phase => "PHASE",
			Self::Message => "MESSAGE",
			Self::AlarmAnalog => "ALARM_ANALOG",
			Self::AlarmDigital => "ALARM_DIGITAL",
			Self::String => "STRING",
		}
	}

	/// Look up a catalog entry, ignoring case.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.name().eq_ignore_ascii_case(name))
	}

	/// On-disk shape used when the type is the root of a tag.
	pub fn shape(self) -> SerializationShape {
		match self {
			Self::Message => SerializationShape::Message,
			Self::AlarmAnalog => SerializationShape::AlarmAnalog,
			Self::AlarmDigital => SerializationShape::AlarmDigital,
			Self::String => SerializationShape::String,
			_ => SerializationShape::Decorated,
		}
	}

	/// Member layout in declaration order. `STRING` lists its structural `LEN`/`DATA` pair.
	pub fn members(self) -> &'static [PredefinedMember] {
		const STRING: &[PredefinedMember] = &[
			field("LEN", "DINT"),
			PredefinedMember {
				name: "DATA",
				data_type: "SINT",
				len: STANDARD_STRING_CAPACITY,
				radix: Some(Radix::Ascii),
				param: ParamKind::None,
			},
		];

		match self {
			Self::Timer => TIMER,
			Self::Counter => COUNTER,
			Self::Control => CONTROL,
			Self::Pid => PID,
			Self::Phase => PHASE,
			Self::Message => MESSAGE,
			Self::AlarmAnalog => ALARM_ANALOG,
			Self::AlarmDigital => ALARM_DIGITAL,
			Self::String => STRING,
		}
	}

	/// Layout of one member, ignoring case.
	pub fn member(self, name: &str) -> Option<&'static PredefinedMember> {
		self.members().iter().find(|member| member.name.eq_ignore_ascii_case(name))
	}

	/// Whether members are written as attributes of a parameter element.
	pub fn is_parameter_list(self) -> bool {
		matches!(self, Self::Message | Self::AlarmAnalog | Self::AlarmDigital)
	}

	/// Zero-valued default instance.
	pub fn default_value(self) -> Result<LogixValue> {
		if self == Self::String {
			return Ok(LogixValue::String(StringValue::new(self.name(), STANDARD_STRING_CAPACITY)?));
		}

		let members = self
			.members()
			.iter()
			.map(|member| Ok((member.name.to_owned(), member.default_value()?)))
			.collect::<Result<Vec<_>>>()?;
		Ok(LogixValue::Structure(StructureValue::from_parts(self.name(), members, self.shape())))
	}
}

impl PredefinedMember {
	/// Zero-valued default for this member.
	pub fn default_value(&self) -> Result<LogixValue> {
		if self.data_type == "STRING" {
			return Ok(LogixValue::String(StringValue::new(self.data_type, STANDARD_STRING_CAPACITY)?));
		}

		let kind = AtomicKind::from_name(self.data_type).ok_or_else(|| LogixError::UnknownDataType {
			name: self.data_type.to_owned(),
		})?;
		let radix = self.radix.unwrap_or(Radix::default_for(kind));
		let zero = AtomicValue::zero(kind).with_radix(radix)?;
		if self.len == 0 {
			return Ok(LogixValue::Atomic(zero));
		}

		let dimensions = Dimensions::new(&[self.len])?;
		Ok(LogixValue::Array(ArrayValue::new(kind.name(), dimensions)?.with_radix(radix)?))
	}
}

#[cfg(test)]
mod tests {
	use super::{ParamKind, PredefinedType};
	use crate::logix::{AtomicKind, LogixValue, Radix, SerializationShape, TagName};

	#[test]
	fn lookup_ignores_case() {
		assert_eq!(PredefinedType::from_name("timer"), Some(PredefinedType::Timer));
		assert_eq!(PredefinedType::from_name("Alarm_Analog"), Some(PredefinedType::AlarmAnalog));
		assert_eq!(PredefinedType::from_name("MY_UDT"), None);
	}

	#[test]
	fn timer_default_is_zeroed_in_declared_order() {
		let value = PredefinedType::Timer.default_value().expect("timer default");
		let LogixValue::Structure(timer) = &value else {
			panic!("timer should be a structure");
		};
		let names: Vec<&str> = timer.names().collect();
		assert_eq!(names, vec!["PRE", "ACC", "EN", "TT", "DN"]);
		assert_eq!(timer.shape(), SerializationShape::Decorated);

		let acc = value.get(&TagName::member("acc")).and_then(LogixValue::as_atomic).expect("ACC is atomic");
		assert_eq!(acc.kind(), AtomicKind::Dint);
		assert_eq!(acc.bits(), 0);
	}

	#[test]
	fn pid_carries_a_real_array() {
		let value = PredefinedType::Pid.default_value().expect("pid default");
		let data = value.get(&TagName::member("DATA")).and_then(LogixValue::as_array).expect("DATA is an array");
		assert_eq!(data.len(), 17);
		assert_eq!(data.element_type(), "REAL");
	}

	#[test]
	fn parameter_types_select_their_shape() {
		assert_eq!(PredefinedType::Message.shape(), SerializationShape::Message);
		assert_eq!(PredefinedType::AlarmDigital.shape(), SerializationShape::AlarmDigital);
		assert!(PredefinedType::AlarmAnalog.is_parameter_list());
		assert!(!PredefinedType::Counter.is_parameter_list());

		let service = PredefinedType::Message.member("servicecode").expect("ServiceCode exists");
		assert_eq!(service.radix, Some(Radix::Hex));
		assert_eq!(PredefinedType::AlarmAnalog.member("ProgTime").map(|member| member.param), Some(ParamKind::DateTime));
	}

	#[test]
	fn string_default_is_empty_with_standard_capacity() {
		let value = PredefinedType::String.default_value().expect("string default");
		let text = value.as_string().expect("STRING is a string value");
		assert_eq!(text.capacity(), 82);
		assert!(text.is_empty());
	}
}
