use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::forms::FormError;
use crate::models::{PropertyKind, UtilitySelection};
use crate::schema::FormMode;

pub const MAX_IMAGES: usize = 5;
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_LAYOUT_BYTES: usize = 10 * 1024 * 1024;

pub(crate) const IMAGE_MIME_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/jpg", "image/webp"];

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// One entry of the image strip: either a URL the API already hosts
/// (edit flow) or a freshly selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSlot {
    Existing(String),
    New(UploadFile),
}

/// The single optional layout-plan document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutPlan {
    Existing(String),
    New(UploadFile),
}

/// Raw form field values keyed by wire name, the stand-in for the form
/// library's data object. Values are JSON-shaped: plain text for most
/// fields, a `{value, unit}` object (or its string encoding, on edit)
/// for `size` and `extra_land`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    fields: BTreeMap<String, Value>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, field: &str, value: impl Into<String>) {
        self.fields.insert(field.to_string(), Value::from(value.into()));
    }

    pub fn set_value(&mut self, field: &str, value: Value) {
        self.fields.insert(field.to_string(), value);
    }

    /// Stores a size-style field as the nested `{value, unit}` object.
    pub fn set_measurement(&mut self, field: &str, value: impl Into<Value>, unit: &str) {
        self.fields.insert(
            field.to_string(),
            json!({ "value": value.into(), "unit": unit }),
        );
    }

    pub fn clear(&mut self, field: &str) {
        self.fields.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// The selected property kind, if any spelling of it is present.
    pub fn property_kind(&self) -> Option<PropertyKind> {
        self.text("property_type").and_then(PropertyKind::parse)
    }
}

/// Page-lifetime state that lives next to the form fields: the utility
/// checkboxes and the file selections.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub utilities: UtilitySelection,
    images: Vec<ImageSlot>,
    layout_plan: Option<LayoutPlan>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[ImageSlot] {
        &self.images
    }

    pub fn layout_plan(&self) -> Option<&LayoutPlan> {
        self.layout_plan.as_ref()
    }

    /// Seeds the strip with URLs the API already hosts (edit flow).
    pub fn set_existing_images(&mut self, urls: impl IntoIterator<Item = String>) {
        self.images = urls.into_iter().map(ImageSlot::Existing).collect();
    }

    pub fn set_existing_layout_plan(&mut self, url: impl Into<String>) {
        self.layout_plan = Some(LayoutPlan::Existing(url.into()));
    }

    /// Adds newly selected files to the image strip. All files are
    /// checked before any state changes, so a rejected batch leaves the
    /// strip as it was.
    pub fn push_images(&mut self, files: Vec<UploadFile>) -> Result<(), FormError> {
        if files.is_empty() {
            return Ok(());
        }
        if self.images.len() + files.len() > MAX_IMAGES {
            return Err(FormError::TooManyImages);
        }
        for file in &files {
            if !IMAGE_MIME_TYPES.contains(&file.mime.as_str()) {
                return Err(FormError::UnsupportedImageType);
            }
            if file.bytes.len() > MAX_IMAGE_BYTES {
                return Err(FormError::ImageTooLarge);
            }
        }
        self.images.extend(files.into_iter().map(ImageSlot::New));
        Ok(())
    }

    pub fn remove_image(&mut self, index: usize) {
        if index < self.images.len() {
            self.images.remove(index);
        }
    }

    /// Selects the layout-plan document. The create flow accepts images
    /// only; the edit flow also accepts PDF.
    pub fn set_layout_plan(
        &mut self,
        mode: FormMode,
        file: Option<UploadFile>,
    ) -> Result<(), FormError> {
        let Some(file) = file else {
            self.layout_plan = None;
            return Ok(());
        };
        let allowed = IMAGE_MIME_TYPES.contains(&file.mime.as_str())
            || (mode == FormMode::Update && file.mime == "application/pdf");
        if !allowed {
            return Err(FormError::unsupported_layout(mode));
        }
        if file.bytes.len() > MAX_LAYOUT_BYTES {
            return Err(FormError::LayoutTooLarge);
        }
        self.layout_plan = Some(LayoutPlan::New(file));
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_file(name: &str, mime: &str, len: usize) -> UploadFile {
    UploadFile {
        file_name: name.to_string(),
        mime: mime.to_string(),
        bytes: vec![0u8; len],
    }
}
