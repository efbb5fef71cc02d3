//! Media references

use super::{call, read, Wrapper};
use crate::context::BridgeContext;
use crate::dispatch;
use crate::error::BridgeError;
use crate::wrapper::ManagedObject;
use otio_native::{ImageSequenceFields, SchemaKind, SerializableObject, TimeRange};

pub fn create_external(ctx: &BridgeContext, target_url: &str, available_range: Option<TimeRange>) -> Wrapper {
    dispatch::project(ctx, SerializableObject::external_reference(target_url, available_range))
}

/// Generator reference; `parameters` must be an `AnyDictionary` wrapper
pub fn create_generator(
    ctx: &BridgeContext,
    generator_kind: &str,
    parameters: Option<&ManagedObject>,
    available_range: Option<TimeRange>,
) -> Result<Wrapper, BridgeError> {
    let parameters = match parameters {
        Some(p) => p.with_dictionary(|d| d.clone())?,
        None => Default::default(),
    };
    Ok(dispatch::project(
        ctx,
        SerializableObject::generator_reference(generator_kind, parameters, available_range),
    ))
}

pub fn create_image_sequence(
    ctx: &BridgeContext,
    fields: ImageSequenceFields,
    available_range: Option<TimeRange>,
) -> Result<Wrapper, BridgeError> {
    let wrapper = dispatch::project(ctx, SerializableObject::new(SchemaKind::ImageSequenceReference));
    set_image_sequence(&wrapper, fields)?;
    set_available_range(&wrapper, available_range)?;
    Ok(wrapper)
}

pub fn available_range(wrapper: &ManagedObject) -> Result<Option<TimeRange>, BridgeError> {
    call(wrapper, SchemaKind::MediaReference, "available_range", |o| {
        o.reference_available_range()
    })
}

pub fn set_available_range(wrapper: &ManagedObject, range: Option<TimeRange>) -> Result<(), BridgeError> {
    call(wrapper, SchemaKind::MediaReference, "set_available_range", |o| {
        o.set_reference_available_range(range)
    })
}

pub fn is_missing_reference(wrapper: &ManagedObject) -> Result<bool, BridgeError> {
    read(wrapper, SchemaKind::MediaReference, "is_missing_reference", |o| {
        o.is_missing_reference()
    })
}

pub fn target_url(wrapper: &ManagedObject) -> Result<String, BridgeError> {
    call(wrapper, SchemaKind::ExternalReference, "target_url", |o| o.target_url())
}

pub fn set_target_url(wrapper: &ManagedObject, value: &str) -> Result<(), BridgeError> {
    call(wrapper, SchemaKind::ExternalReference, "set_target_url", |o| o.set_target_url(value))
}

pub fn generator_kind(wrapper: &ManagedObject) -> Result<String, BridgeError> {
    call(wrapper, SchemaKind::GeneratorReference, "generator_kind", |o| o.generator_kind())
}

pub fn set_generator_kind(wrapper: &ManagedObject, value: &str) -> Result<(), BridgeError> {
    call(wrapper, SchemaKind::GeneratorReference, "set_generator_kind", |o| {
        o.set_generator_kind(value)
    })
}

pub fn generator_parameters(wrapper: &ManagedObject) -> Result<Wrapper, BridgeError> {
    let parameters = call(wrapper, SchemaKind::GeneratorReference, "parameters", |o| {
        o.generator_parameters()
    })?;
    Ok(ManagedObject::dictionary(wrapper.context(), parameters))
}

pub fn image_sequence(wrapper: &ManagedObject) -> Result<ImageSequenceFields, BridgeError> {
    call(wrapper, SchemaKind::ImageSequenceReference, "image_sequence", |o| o.image_sequence())
}

pub fn set_image_sequence(wrapper: &ManagedObject, fields: ImageSequenceFields) -> Result<(), BridgeError> {
    call(wrapper, SchemaKind::ImageSequenceReference, "set_image_sequence", |o| {
        o.set_image_sequence(fields)
    })
}

pub fn number_of_images_in_sequence(wrapper: &ManagedObject) -> Result<i64, BridgeError> {
    call(wrapper, SchemaKind::ImageSequenceReference, "number_of_images_in_sequence", |o| {
        o.number_of_images_in_sequence()
    })
}

pub fn target_url_for_image_number(wrapper: &ManagedObject, image_number: i64) -> Result<String, BridgeError> {
    call(wrapper, SchemaKind::ImageSequenceReference, "target_url_for_image_number", |o| {
        o.target_url_for_image_number(image_number)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use otio_native::{AnyDictionary, RationalTime};
    use serde_json::json;

    #[test]
    fn test_external_reference() {
        let ctx = BridgeContext::default();
        let reference = create_external(&ctx, "file:///a.mov", None);
        assert_eq!(target_url(&reference).unwrap(), "file:///a.mov");
        assert_eq!(available_range(&reference).unwrap(), None);
        assert!(!is_missing_reference(&reference).unwrap());
        assert_eq!(generator_kind(&reference).unwrap_err().kind(), FailureKind::ClassCast);
    }

    #[test]
    fn test_generator_parameters_are_copied() {
        let ctx = BridgeContext::default();
        let mut params = AnyDictionary::new();
        params.set("color", json!("black"));
        let dict = ManagedObject::dictionary(&ctx, params);
        let reference = create_generator(&ctx, "SolidColor", Some(&dict), None).unwrap();

        dict.with_dictionary(|d| d.clear()).unwrap();
        let stored = generator_parameters(&reference).unwrap();
        assert_eq!(stored.with_dictionary(|d| d.len()).unwrap(), 1);
        assert_eq!(generator_kind(&reference).unwrap(), "SolidColor");
    }

    #[test]
    fn test_image_sequence() {
        let ctx = BridgeContext::default();
        let fields = ImageSequenceFields {
            target_url_base: "file:///frames".to_string(),
            name_prefix: "shot.".to_string(),
            name_suffix: ".exr".to_string(),
            start_frame: 1,
            frame_step: 1,
            rate: 24.0,
            frame_zero_padding: 4,
        };
        let range = TimeRange::new(RationalTime::new(0.0, 24.0), RationalTime::new(48.0, 24.0));
        let reference = create_image_sequence(&ctx, fields, Some(range)).unwrap();

        assert_eq!(number_of_images_in_sequence(&reference).unwrap(), 48);
        assert_eq!(
            target_url_for_image_number(&reference, 0).unwrap(),
            "file:///frames/shot.0001.exr"
        );
        let err = target_url_for_image_number(&reference, 48).unwrap_err();
        assert_eq!(err.kind(), FailureKind::IndexOutOfBounds);
    }
}
