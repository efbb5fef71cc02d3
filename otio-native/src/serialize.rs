//! JSON encoding of the object model
//!
//! Every object is a JSON object tagged with `"OTIO_SCHEMA": "Name.version"`.
//! Opentime values use the same tagging (`RationalTime.1`, `TimeRange.1`,
//! `TimeTransform.1`). Unknown schema names decode into an `UnknownSchema`
//! object that keeps the original fields and writes them back unchanged.

use crate::any::AnyDictionary;
use crate::object::{
    Detail, ImageSequenceFields, ObjectRetainer, ObjectState, ReferenceFields, SerializableObject,
};
use crate::opentime::{RationalTime, TimeRange, TimeTransform};
use crate::schema::{parse_schema_specifier, SchemaKind};
use crate::status::{ErrorStatus, Outcome};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{json, Map, Value};
use std::path::Path;

pub const SCHEMA_KEY: &str = "OTIO_SCHEMA";

// --- opentime values -------------------------------------------------------

pub fn rational_time_to_json(time: RationalTime) -> Value {
    json!({
        SCHEMA_KEY: "RationalTime.1",
        "rate": time.rate(),
        "value": time.value(),
    })
}

pub fn time_range_to_json(range: TimeRange) -> Value {
    json!({
        SCHEMA_KEY: "TimeRange.1",
        "duration": rational_time_to_json(range.duration()),
        "start_time": rational_time_to_json(range.start_time()),
    })
}

pub fn time_transform_to_json(transform: TimeTransform) -> Value {
    json!({
        SCHEMA_KEY: "TimeTransform.1",
        "offset": rational_time_to_json(transform.offset()),
        "rate": transform.rate(),
        "scale": transform.scale(),
    })
}

fn type_mismatch(details: String) -> ErrorStatus {
    ErrorStatus::with_details(Outcome::TypeMismatch, details)
}

/// Check an optional value tag against the expected value type
fn expect_value_schema(map: &Map<String, Value>, expected: &str) -> Result<(), ErrorStatus> {
    match map.get(SCHEMA_KEY) {
        None => Ok(()),
        Some(Value::String(s)) => match parse_schema_specifier(s) {
            Some((name, _)) if name == expected => Ok(()),
            Some(_) => Err(type_mismatch(format!("expected {} but found {}", expected, s))),
            None => Err(ErrorStatus::with_details(
                Outcome::MalformedSchema,
                format!("'{}' is not a valid schema specifier", s),
            )),
        },
        Some(other) => Err(type_mismatch(format!(
            "expected string for '{}' in {}, found {}",
            SCHEMA_KEY,
            expected,
            json_type_name(other)
        ))),
    }
}

fn number_field(map: &Map<String, Value>, key: &str, context: &str) -> Result<f64, ErrorStatus> {
    match map.get(key) {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| type_mismatch(format!("'{}' in {} is not representable", key, context))),
        Some(other) => Err(type_mismatch(format!(
            "expected number for '{}' in {}, found {}",
            key,
            context,
            json_type_name(other)
        ))),
        None => Err(ErrorStatus::with_details(
            Outcome::KeyNotFound,
            format!("missing '{}' in {}", key, context),
        )),
    }
}

fn value_object<'a>(value: &'a Value, context: &str) -> Result<&'a Map<String, Value>, ErrorStatus> {
    value.as_object().ok_or_else(|| {
        type_mismatch(format!(
            "expected object for {}, found {}",
            context,
            json_type_name(value)
        ))
    })
}

pub fn rational_time_from_json(value: &Value) -> Result<RationalTime, ErrorStatus> {
    let map = value_object(value, "RationalTime")?;
    expect_value_schema(map, "RationalTime")?;
    Ok(RationalTime::new(
        number_field(map, "value", "RationalTime")?,
        number_field(map, "rate", "RationalTime")?,
    ))
}

pub fn time_range_from_json(value: &Value) -> Result<TimeRange, ErrorStatus> {
    let map = value_object(value, "TimeRange")?;
    expect_value_schema(map, "TimeRange")?;
    let start = map.get("start_time").ok_or_else(|| {
        ErrorStatus::with_details(Outcome::KeyNotFound, "missing 'start_time' in TimeRange")
    })?;
    let duration = map.get("duration").ok_or_else(|| {
        ErrorStatus::with_details(Outcome::KeyNotFound, "missing 'duration' in TimeRange")
    })?;
    Ok(TimeRange::new(
        rational_time_from_json(start)?,
        rational_time_from_json(duration)?,
    ))
}

pub fn time_transform_from_json(value: &Value) -> Result<TimeTransform, ErrorStatus> {
    let map = value_object(value, "TimeTransform")?;
    expect_value_schema(map, "TimeTransform")?;
    let offset = match map.get("offset") {
        Some(v) => rational_time_from_json(v)?,
        None => RationalTime::default(),
    };
    let scale = if map.contains_key("scale") {
        number_field(map, "scale", "TimeTransform")?
    } else {
        1.0
    };
    let rate = if map.contains_key("rate") {
        number_field(map, "rate", "TimeTransform")?
    } else {
        -1.0
    };
    Ok(TimeTransform::new(offset, scale, rate))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// --- encoding --------------------------------------------------------------

fn optional(value: Option<Value>) -> Value {
    value.unwrap_or(Value::Null)
}

fn object_list(objects: &[ObjectRetainer]) -> Value {
    Value::Array(objects.iter().map(|o| o.to_json_value()).collect())
}

impl SerializableObject {
    /// Encode this object and everything it owns
    pub fn to_json_value(&self) -> Value {
        let state = self.state();
        let mut map = Map::new();

        if let Detail::Unknown {
            original_schema_name,
            original_schema_version,
            data,
        } = &state.detail
        {
            map.extend(data.clone());
            map.insert(
                SCHEMA_KEY.to_string(),
                Value::String(format!("{}.{}", original_schema_name, original_schema_version)),
            );
            return Value::Object(map);
        }

        let kind = self.schema();
        map.insert(
            SCHEMA_KEY.to_string(),
            Value::String(format!("{}.{}", kind.name(), kind.version())),
        );

        if kind.has_metadata() {
            map.insert("name".into(), Value::String(state.name.clone()));
            map.insert("metadata".into(), state.metadata.to_json());
        }

        if let Some(item) = &state.item {
            map.insert(
                "source_range".into(),
                optional(item.source_range.map(time_range_to_json)),
            );
            map.insert("enabled".into(), Value::Bool(item.enabled));
            map.insert("effects".into(), object_list(&item.effects));
            map.insert("markers".into(), object_list(&item.markers));
        }

        if kind.is_composition() || kind == SchemaKind::SerializableCollection {
            map.insert("children".into(), object_list(&state.children));
        }

        match &state.detail {
            Detail::None | Detail::Unknown { .. } => {}
            Detail::Track { kind } => {
                map.insert("kind".into(), Value::String(kind.clone()));
            }
            Detail::Clip { media_reference } => {
                map.insert("media_reference".into(), media_reference.to_json_value());
            }
            Detail::Transition {
                transition_type,
                in_offset,
                out_offset,
            } => {
                map.insert("transition_type".into(), Value::String(transition_type.clone()));
                map.insert("in_offset".into(), rational_time_to_json(*in_offset));
                map.insert("out_offset".into(), rational_time_to_json(*out_offset));
            }
            Detail::Timeline {
                tracks,
                global_start_time,
            } => {
                map.insert("tracks".into(), tracks.to_json_value());
                map.insert(
                    "global_start_time".into(),
                    optional(global_start_time.map(rational_time_to_json)),
                );
            }
            Detail::Effect {
                effect_name,
                time_scalar,
            } => {
                map.insert("effect_name".into(), Value::String(effect_name.clone()));
                if kind.is_a(SchemaKind::LinearTimeWarp) {
                    map.insert("time_scalar".into(), json!(time_scalar));
                }
            }
            Detail::Marker {
                marked_range,
                color,
            } => {
                map.insert("marked_range".into(), time_range_to_json(*marked_range));
                map.insert("color".into(), Value::String(color.clone()));
            }
            Detail::Reference {
                available_range,
                fields,
            } => {
                map.insert(
                    "available_range".into(),
                    optional(available_range.map(time_range_to_json)),
                );
                match fields {
                    ReferenceFields::None => {}
                    ReferenceFields::External { target_url } => {
                        map.insert("target_url".into(), Value::String(target_url.clone()));
                    }
                    ReferenceFields::Generator {
                        generator_kind,
                        parameters,
                    } => {
                        map.insert("generator_kind".into(), Value::String(generator_kind.clone()));
                        map.insert("parameters".into(), parameters.to_json());
                    }
                    ReferenceFields::ImageSequence(seq) => {
                        map.insert("target_url_base".into(), Value::String(seq.target_url_base.clone()));
                        map.insert("name_prefix".into(), Value::String(seq.name_prefix.clone()));
                        map.insert("name_suffix".into(), Value::String(seq.name_suffix.clone()));
                        map.insert("start_frame".into(), json!(seq.start_frame));
                        map.insert("frame_step".into(), json!(seq.frame_step));
                        map.insert("rate".into(), json!(seq.rate));
                        map.insert("frame_zero_padding".into(), json!(seq.frame_zero_padding));
                    }
                }
            }
        }

        Value::Object(map)
    }

    /// Encode as text; `indent == 0` produces compact output
    pub fn to_json_string(&self, indent: usize) -> Result<String, ErrorStatus> {
        let value = self.to_json_value();
        if indent == 0 {
            return serde_json::to_string(&value)
                .map_err(|e| ErrorStatus::with_details(Outcome::InternalError, e.to_string()));
        }

        let spaces = " ".repeat(indent);
        let mut out = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(spaces.as_bytes()));
        value
            .serialize(&mut serializer)
            .map_err(|e| ErrorStatus::with_details(Outcome::InternalError, e.to_string()))?;
        String::from_utf8(out).map_err(|e| ErrorStatus::with_details(Outcome::InternalError, e.to_string()))
    }

    pub fn to_json_file(&self, path: impl AsRef<Path>, indent: usize) -> Result<(), ErrorStatus> {
        let path = path.as_ref();
        let text = self.to_json_string(indent)?;
        std::fs::write(path, text).map_err(|e| {
            ErrorStatus::with_details(
                Outcome::FileWriteFailed,
                format!("{}: {}", path.display(), e),
            )
        })
    }

    pub fn from_json_string(input: &str) -> Result<ObjectRetainer, ErrorStatus> {
        let value: Value = serde_json::from_str(input).map_err(|e| {
            ErrorStatus::with_details(
                Outcome::JsonParseError,
                format!("{} (line {}, column {})", e, e.line(), e.column()),
            )
        })?;
        Self::from_json_value(&value)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<ObjectRetainer, ErrorStatus> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ErrorStatus::with_details(
                Outcome::FileOpenFailed,
                format!("{}: {}", path.display(), e),
            )
        })?;
        Self::from_json_string(&text)
    }

    pub fn from_json_value(value: &Value) -> Result<ObjectRetainer, ErrorStatus> {
        let map = match value {
            Value::Object(map) if map.contains_key(SCHEMA_KEY) => map,
            other => {
                return Err(type_mismatch(format!(
                    "expected a schema-tagged object, found {}",
                    if other.is_object() { "untagged object" } else { json_type_name(other) }
                )))
            }
        };

        let specifier = match &map[SCHEMA_KEY] {
            Value::String(s) => s.as_str(),
            other => {
                return Err(ErrorStatus::with_details(
                    Outcome::MalformedSchema,
                    format!("'{}' must be a string, found {}", SCHEMA_KEY, json_type_name(other)),
                ))
            }
        };
        let (name, version) = parse_schema_specifier(specifier).ok_or_else(|| {
            ErrorStatus::with_details(
                Outcome::MalformedSchema,
                format!("'{}' is not a valid schema specifier", specifier),
            )
        })?;

        match SchemaKind::from_name(name) {
            None => Ok(decode_unknown(name, version, map)),
            Some(kind) if version > kind.version() => Err(ErrorStatus::with_details(
                Outcome::SchemaVersionUnsupported,
                format!(
                    "{}.{} is newer than the supported {}.{}",
                    name,
                    version,
                    name,
                    kind.version()
                ),
            )),
            Some(SchemaKind::UnknownSchema) => Ok(decode_unknown(name, version, map)),
            Some(kind) => Decoder { kind, map }.decode(),
        }
    }

    /// Structural equality of the encoded forms
    pub fn is_equivalent_to(&self, other: &SerializableObject) -> bool {
        self.to_json_value() == other.to_json_value()
    }

    /// Independent copy of this object and everything it owns
    pub fn deep_copy(&self) -> Result<ObjectRetainer, ErrorStatus> {
        Self::from_json_value(&self.to_json_value())
    }

    pub fn original_schema_name(&self) -> Result<String, ErrorStatus> {
        match &self.state().detail {
            Detail::Unknown {
                original_schema_name,
                ..
            } => Ok(original_schema_name.clone()),
            _ => Err(self.wrong_kind("original_schema_name", SchemaKind::UnknownSchema)),
        }
    }

    pub fn original_schema_version(&self) -> Result<u32, ErrorStatus> {
        match &self.state().detail {
            Detail::Unknown {
                original_schema_version,
                ..
            } => Ok(*original_schema_version),
            _ => Err(self.wrong_kind("original_schema_version", SchemaKind::UnknownSchema)),
        }
    }
}

// --- decoding --------------------------------------------------------------

fn decode_unknown(name: &str, version: u32, map: &Map<String, Value>) -> ObjectRetainer {
    let mut data = map.clone();
    data.remove(SCHEMA_KEY);
    let mut state = ObjectState::new(SchemaKind::UnknownSchema);
    state.detail = Detail::Unknown {
        original_schema_name: name.to_string(),
        original_schema_version: version,
        data,
    };
    SerializableObject::from_parts(SchemaKind::UnknownSchema, state)
}

struct Decoder<'a> {
    kind: SchemaKind,
    map: &'a Map<String, Value>,
}

impl<'a> Decoder<'a> {
    fn mismatch(&self, key: &str, expected: &str, found: &Value) -> ErrorStatus {
        type_mismatch(format!(
            "expected {} for '{}' in {}, found {}",
            expected,
            key,
            self.kind.name(),
            json_type_name(found)
        ))
    }

    /// Present and non-null field
    fn field(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn string(&self, key: &str) -> Result<Option<String>, ErrorStatus> {
        match self.field(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.mismatch(key, "string", other)),
        }
    }

    fn boolean(&self, key: &str) -> Result<Option<bool>, ErrorStatus> {
        match self.field(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.mismatch(key, "bool", other)),
        }
    }

    fn number(&self, key: &str) -> Result<Option<f64>, ErrorStatus> {
        match self.field(key) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(other) => Err(self.mismatch(key, "number", other)),
        }
    }

    fn integer(&self, key: &str) -> Result<Option<i64>, ErrorStatus> {
        match self.field(key) {
            None => Ok(None),
            Some(value @ Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.mismatch(key, "integer", value)),
            Some(other) => Err(self.mismatch(key, "integer", other)),
        }
    }

    fn dictionary(&self, key: &str) -> Result<Option<AnyDictionary>, ErrorStatus> {
        match self.field(key) {
            None => Ok(None),
            Some(Value::Object(m)) => Ok(Some(AnyDictionary::from_json(m.clone()))),
            Some(other) => Err(self.mismatch(key, "object", other)),
        }
    }

    fn rational_time(&self, key: &str) -> Result<Option<RationalTime>, ErrorStatus> {
        self.field(key).map(rational_time_from_json).transpose()
    }

    fn time_range(&self, key: &str) -> Result<Option<TimeRange>, ErrorStatus> {
        self.field(key).map(time_range_from_json).transpose()
    }

    fn object(&self, key: &str, base: SchemaKind) -> Result<Option<ObjectRetainer>, ErrorStatus> {
        let value = match self.field(key) {
            None => return Ok(None),
            Some(v) => v,
        };
        let object = SerializableObject::from_json_value(value)?;
        if !object.schema().is_a(base) {
            return Err(type_mismatch(format!(
                "expected {} for '{}' in {}, found {}",
                base.name(),
                key,
                self.kind.name(),
                object.schema_name()
            )));
        }
        Ok(Some(object))
    }

    fn objects(&self, key: &str, base: SchemaKind) -> Result<Vec<ObjectRetainer>, ErrorStatus> {
        let items = match self.field(key) {
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => return Err(self.mismatch(key, "array", other)),
        };
        let mut objects = Vec::with_capacity(items.len());
        for value in items {
            let object = SerializableObject::from_json_value(value)?;
            if !object.schema().is_a(base) {
                return Err(type_mismatch(format!(
                    "expected {} in '{}' of {}, found {}",
                    base.name(),
                    key,
                    self.kind.name(),
                    object.schema_name()
                )));
            }
            objects.push(object);
        }
        Ok(objects)
    }

    fn decode(self) -> Result<ObjectRetainer, ErrorStatus> {
        let kind = self.kind;
        let mut state = ObjectState::new(kind);

        if kind.has_metadata() {
            if let Some(name) = self.string("name")? {
                state.name = name;
            }
            if let Some(metadata) = self.dictionary("metadata")? {
                state.metadata = metadata;
            }
        }

        if let Some(item) = state.item.as_mut() {
            if let Some(range) = self.time_range("source_range")? {
                item.source_range = Some(range);
            } else if kind != SchemaKind::Gap {
                item.source_range = None;
            }
            if let Some(enabled) = self.boolean("enabled")? {
                item.enabled = enabled;
            }
            item.effects = self.objects("effects", SchemaKind::Effect)?;
            item.markers = self.objects("markers", SchemaKind::Marker)?;
        }

        if kind.is_composition() {
            state.children = self.objects("children", SchemaKind::Composable)?;
        } else if kind == SchemaKind::SerializableCollection {
            state.children = self.objects("children", SchemaKind::SerializableObject)?;
        }

        match &mut state.detail {
            Detail::None | Detail::Unknown { .. } => {}
            Detail::Track { kind: track_kind } => {
                if let Some(k) = self.string("kind")? {
                    *track_kind = k;
                }
            }
            Detail::Clip { media_reference } => {
                if let Some(r) = self.object("media_reference", SchemaKind::MediaReference)? {
                    *media_reference = r;
                }
            }
            Detail::Transition {
                transition_type,
                in_offset,
                out_offset,
            } => {
                if let Some(t) = self.string("transition_type")? {
                    *transition_type = t;
                }
                if let Some(t) = self.rational_time("in_offset")? {
                    *in_offset = t;
                }
                if let Some(t) = self.rational_time("out_offset")? {
                    *out_offset = t;
                }
            }
            Detail::Timeline {
                tracks,
                global_start_time,
            } => {
                if let Some(stack) = self.object("tracks", SchemaKind::Stack)? {
                    *tracks = stack;
                }
                *global_start_time = self.rational_time("global_start_time")?;
            }
            Detail::Effect {
                effect_name,
                time_scalar,
            } => {
                if let Some(name) = self.string("effect_name")? {
                    *effect_name = name;
                }
                if kind.is_a(SchemaKind::LinearTimeWarp) {
                    if let Some(scalar) = self.number("time_scalar")? {
                        *time_scalar = scalar;
                    }
                }
            }
            Detail::Marker {
                marked_range,
                color,
            } => {
                if let Some(range) = self.time_range("marked_range")? {
                    *marked_range = range;
                }
                if let Some(c) = self.string("color")? {
                    *color = c;
                }
            }
            Detail::Reference {
                available_range,
                fields,
            } => {
                *available_range = self.time_range("available_range")?;
                match fields {
                    ReferenceFields::None => {}
                    ReferenceFields::External { target_url } => {
                        if let Some(url) = self.string("target_url")? {
                            *target_url = url;
                        }
                    }
                    ReferenceFields::Generator {
                        generator_kind,
                        parameters,
                    } => {
                        if let Some(k) = self.string("generator_kind")? {
                            *generator_kind = k;
                        }
                        if let Some(p) = self.dictionary("parameters")? {
                            *parameters = p;
                        }
                    }
                    ReferenceFields::ImageSequence(seq) => {
                        *seq = self.image_sequence()?;
                    }
                }
            }
        }

        Ok(SerializableObject::from_parts(kind, state))
    }

    fn image_sequence(&self) -> Result<ImageSequenceFields, ErrorStatus> {
        let defaults = ImageSequenceFields::default();
        Ok(ImageSequenceFields {
            target_url_base: self.string("target_url_base")?.unwrap_or(defaults.target_url_base),
            name_prefix: self.string("name_prefix")?.unwrap_or(defaults.name_prefix),
            name_suffix: self.string("name_suffix")?.unwrap_or(defaults.name_suffix),
            start_frame: self.integer("start_frame")?.unwrap_or(defaults.start_frame),
            frame_step: self.integer("frame_step")?.unwrap_or(defaults.frame_step),
            rate: self.number("rate")?.unwrap_or(defaults.rate),
            frame_zero_padding: self
                .integer("frame_zero_padding")?
                .unwrap_or(defaults.frame_zero_padding),
        })
    }
}

#[cfg(test)]
mod tests;
