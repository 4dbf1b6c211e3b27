pub mod encoder;
pub mod prefill;
pub mod values;

pub use encoder::{encode, EncodedForm, PartValue, PayloadPart};
pub use prefill::{prefill, PhaseInit, PrefillError, PrefilledForm, Society, SOCIETIES};
pub use values::{FormValues, ImageSlot, LayoutPlan, UiState, UploadFile};

use thiserror::Error;

use crate::schema::FormMode;

/// Client-side validation failures. The display strings are the exact
/// messages surfaced to the user; submission is aborted and form state
/// kept for correction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please select a property type")]
    MissingPropertyType,
    #[error("Cannot upload more than 5 images")]
    TooManyImages,
    #[error("Only JPG, PNG, or WEBP image files are allowed")]
    UnsupportedImageType,
    #[error("Each image must be less than 5MB")]
    ImageTooLarge,
    #[error("Only JPG, PNG, or WEBP files are allowed")]
    UnsupportedLayoutType,
    #[error("Only JPG, PNG, WEBP, or PDF files are allowed")]
    UnsupportedLayoutTypeOnUpdate,
    #[error("File must be less than 10MB")]
    LayoutTooLarge,
    #[error("Invalid size format")]
    InvalidSize,
    #[error("Invalid extra land format")]
    InvalidExtraLand,
}

impl FormError {
    pub(crate) fn unsupported_layout(mode: FormMode) -> Self {
        match mode {
            FormMode::Create => FormError::UnsupportedLayoutType,
            FormMode::Update => FormError::UnsupportedLayoutTypeOnUpdate,
        }
    }
}
