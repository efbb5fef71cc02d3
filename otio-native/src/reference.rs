//! Media references - where a clip's media lives and how much of it exists

use crate::any::AnyDictionary;
use crate::object::{Detail, ImageSequenceFields, ObjectRetainer, ReferenceFields, SerializableObject};
use crate::opentime::TimeRange;
use crate::schema::SchemaKind;
use crate::status::{ErrorStatus, Outcome};

impl SerializableObject {
    pub fn external_reference(target_url: &str, available_range: Option<TimeRange>) -> ObjectRetainer {
        let reference = Self::new(SchemaKind::ExternalReference);
        if let Detail::Reference {
            available_range: range,
            fields: ReferenceFields::External { target_url: url },
        } = &mut reference.state().detail
        {
            *range = available_range;
            *url = target_url.to_string();
        }
        reference
    }

    pub fn generator_reference(
        generator_kind: &str,
        parameters: AnyDictionary,
        available_range: Option<TimeRange>,
    ) -> ObjectRetainer {
        let reference = Self::new(SchemaKind::GeneratorReference);
        if let Detail::Reference {
            available_range: range,
            fields:
                ReferenceFields::Generator {
                    generator_kind: kind,
                    parameters: params,
                },
        } = &mut reference.state().detail
        {
            *range = available_range;
            *kind = generator_kind.to_string();
            *params = parameters;
        }
        reference
    }

    pub fn reference_available_range(&self) -> Result<Option<TimeRange>, ErrorStatus> {
        match &self.state().detail {
            Detail::Reference {
                available_range, ..
            } => Ok(*available_range),
            _ => Err(self.wrong_kind("available_range", SchemaKind::MediaReference)),
        }
    }

    pub fn set_reference_available_range(&self, range: Option<TimeRange>) -> Result<(), ErrorStatus> {
        match &mut self.state().detail {
            Detail::Reference {
                available_range, ..
            } => {
                *available_range = range;
                Ok(())
            }
            _ => Err(self.wrong_kind("set_available_range", SchemaKind::MediaReference)),
        }
    }

    #[inline]
    pub fn is_missing_reference(&self) -> bool {
        self.schema() == SchemaKind::MissingReference
    }

    pub fn target_url(&self) -> Result<String, ErrorStatus> {
        match &self.state().detail {
            Detail::Reference {
                fields: ReferenceFields::External { target_url },
                ..
            } => Ok(target_url.clone()),
            _ => Err(self.wrong_kind("target_url", SchemaKind::ExternalReference)),
        }
    }

    pub fn set_target_url(&self, value: &str) -> Result<(), ErrorStatus> {
        match &mut self.state().detail {
            Detail::Reference {
                fields: ReferenceFields::External { target_url },
                ..
            } => {
                *target_url = value.to_string();
                Ok(())
            }
            _ => Err(self.wrong_kind("set_target_url", SchemaKind::ExternalReference)),
        }
    }

    pub fn generator_kind(&self) -> Result<String, ErrorStatus> {
        match &self.state().detail {
            Detail::Reference {
                fields: ReferenceFields::Generator { generator_kind, .. },
                ..
            } => Ok(generator_kind.clone()),
            _ => Err(self.wrong_kind("generator_kind", SchemaKind::GeneratorReference)),
        }
    }

    pub fn set_generator_kind(&self, value: &str) -> Result<(), ErrorStatus> {
        match &mut self.state().detail {
            Detail::Reference {
                fields: ReferenceFields::Generator { generator_kind, .. },
                ..
            } => {
                *generator_kind = value.to_string();
                Ok(())
            }
            _ => Err(self.wrong_kind("set_generator_kind", SchemaKind::GeneratorReference)),
        }
    }

    pub fn generator_parameters(&self) -> Result<AnyDictionary, ErrorStatus> {
        match &self.state().detail {
            Detail::Reference {
                fields: ReferenceFields::Generator { parameters, .. },
                ..
            } => Ok(parameters.clone()),
            _ => Err(self.wrong_kind("parameters", SchemaKind::GeneratorReference)),
        }
    }

    pub fn set_generator_parameters(&self, value: AnyDictionary) -> Result<(), ErrorStatus> {
        match &mut self.state().detail {
            Detail::Reference {
                fields: ReferenceFields::Generator { parameters, .. },
                ..
            } => {
                *parameters = value;
                Ok(())
            }
            _ => Err(self.wrong_kind("set_parameters", SchemaKind::GeneratorReference)),
        }
    }

    pub fn image_sequence(&self) -> Result<ImageSequenceFields, ErrorStatus> {
        match &self.state().detail {
            Detail::Reference {
                fields: ReferenceFields::ImageSequence(fields),
                ..
            } => Ok(fields.clone()),
            _ => Err(self.wrong_kind("image_sequence", SchemaKind::ImageSequenceReference)),
        }
    }

    pub fn set_image_sequence(&self, value: ImageSequenceFields) -> Result<(), ErrorStatus> {
        match &mut self.state().detail {
            Detail::Reference {
                fields: ReferenceFields::ImageSequence(fields),
                ..
            } => {
                *fields = value;
                Ok(())
            }
            _ => Err(self.wrong_kind("set_image_sequence", SchemaKind::ImageSequenceReference)),
        }
    }

    /// Frames in the sequence, derived from the available range at the sequence rate
    pub fn number_of_images_in_sequence(&self) -> Result<i64, ErrorStatus> {
        let fields = self.image_sequence()?;
        let range = self.sequence_range()?;
        let frames = range.duration().value_rescaled_to(fields.rate);
        Ok((frames / fields.frame_step.max(1) as f64).ceil() as i64)
    }

    /// URL of the `image_number`th image, counting from zero
    pub fn target_url_for_image_number(&self, image_number: i64) -> Result<String, ErrorStatus> {
        let fields = self.image_sequence()?;
        let count = self.number_of_images_in_sequence()?;
        if image_number < 0 || image_number >= count {
            return Err(ErrorStatus::with_details(
                Outcome::IllegalIndex,
                format!("image number {} outside sequence of {} images", image_number, count),
            ));
        }

        let frame = fields.start_frame + image_number * fields.frame_step;
        let width = fields.frame_zero_padding.max(0) as usize;
        let separator = if fields.target_url_base.is_empty() || fields.target_url_base.ends_with('/') {
            ""
        } else {
            "/"
        };

        Ok(format!(
            "{}{}{}{:0width$}{}",
            fields.target_url_base,
            separator,
            fields.name_prefix,
            frame,
            fields.name_suffix,
            width = width
        ))
    }

    fn sequence_range(&self) -> Result<TimeRange, ErrorStatus> {
        self.reference_available_range()?.ok_or_else(|| {
            ErrorStatus::with_details(
                Outcome::CannotComputeAvailableRange,
                "image sequence has no available_range",
            )
        })
    }
}
