//! Assembles a multipart submission from raw form values.
//!
//! One encoder serves both flows; [`FormMode`] selects the handful of
//! places where the create and update contracts differ (field tables,
//! layout-plan keying, string-encoded size re-parsing).

use serde_json::{json, Map, Value};

use crate::forms::values::{FormValues, ImageSlot, LayoutPlan, UiState, UploadFile, MAX_IMAGES};
use crate::forms::FormError;
use crate::models::{AllotmentStatus, PropertyKind};
use crate::schema::{
    boolean_fields, common_fields, specific_fields, FormMode, ALLOTMENT_DETAIL_FIELDS,
};

/// One entry of the multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadPart {
    pub key: String,
    pub value: PartValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartValue {
    Text(String),
    File(UploadFile),
}

/// The assembled submission: the resolved kind plus the ordered payload
/// entries. Network transport is the caller's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedForm {
    pub kind: PropertyKind,
    pub mode: FormMode,
    pub parts: Vec<PayloadPart>,
}

impl EncodedForm {
    /// API sub-path for this submission's kind and mode.
    pub fn endpoint(&self) -> &'static str {
        self.kind.endpoint(self.mode)
    }

    pub fn texts<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> {
        self.parts.iter().filter_map(move |p| match &p.value {
            PartValue::Text(t) if p.key == key => Some(t.as_str()),
            _ => None,
        })
    }

    // The returned text borrows from `self`, not the lookup key.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.parts.iter().find_map(|p| match &p.value {
            PartValue::Text(t) if p.key == key => Some(t.as_str()),
            _ => None,
        })
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.parts.iter().any(|p| p.key == key)
    }
}

/// Encodes `values` + page state into the multipart payload for the
/// selected property kind. Validation failures abort with no payload
/// produced and form state untouched.
pub fn encode(values: &FormValues, mode: FormMode, ui: &UiState) -> Result<EncodedForm, FormError> {
    let kind = values.property_kind().ok_or(FormError::MissingPropertyType)?;

    // All upload checks run before any part is assembled.
    validate_uploads(mode, ui)?;

    let booleans = boolean_fields(kind);
    let allotment_selection = values.text("allotment");
    let mut parts = Vec::new();

    let relevant = common_fields(mode)
        .iter()
        .chain(specific_fields(kind, mode).iter());
    for &field in relevant {
        // These are assembled by their own steps below.
        if matches!(
            field,
            "images" | "utilities" | "layout_plan" | "allotment" | "size" | "extra_land"
                | "installment"
        ) {
            continue;
        }
        // Balloted detail fields flow through the allotment step once a
        // selection exists, never through the generic loop as well.
        if allotment_selection.is_some() && ALLOTMENT_DETAIL_FIELDS.contains(&field) {
            continue;
        }
        let Some(value) = values.get(field) else {
            continue;
        };
        let text = if field == "property_type" {
            kind.wire_value().to_string()
        } else if booleans.contains(&field) {
            (value.as_str() == Some("Yes")).to_string()
        } else {
            value_text(value)
        };
        parts.push(PayloadPart { key: field.to_string(), value: PartValue::Text(text) });
    }

    if let Some(selection) = allotment_selection {
        if let Some(status) = AllotmentStatus::parse(selection) {
            parts.push(PayloadPart {
                key: "allotment_status".to_string(),
                value: PartValue::Text(status.wire_value().to_string()),
            });
            if status == AllotmentStatus::Balloted {
                for &field in &ALLOTMENT_DETAIL_FIELDS {
                    if let Some(value) = values.get(field) {
                        parts.push(PayloadPart {
                            key: field.to_string(),
                            value: PartValue::Text(value_text(value)),
                        });
                    }
                }
            }
        }
    }

    if let Some(size) = measurement_object(values, mode, "size", FormError::InvalidSize)? {
        parts.push(PayloadPart {
            key: "size".to_string(),
            value: PartValue::Text(Value::Object(size).to_string()),
        });
    }
    if let Some(extra) = measurement_object(values, mode, "extra_land", FormError::InvalidExtraLand)?
    {
        parts.push(PayloadPart {
            key: "extra_land".to_string(),
            value: PartValue::Text(Value::Object(extra).to_string()),
        });
    }

    if values.text("payment_type") == Some("Installment") {
        let down = values.get("down_payment");
        let amount = values.get("installment_amount");
        let count = values.get("number_of_installments");
        if let (Some(down), Some(amount), Some(count)) = (down, amount, count) {
            let installment = json!({
                "down_payment": down,
                "installment_amount": amount,
                "number_of_installments": count,
            });
            parts.push(PayloadPart {
                key: "installment".to_string(),
                value: PartValue::Text(installment.to_string()),
            });
        }
    }

    for utility in ui.utilities.as_slice() {
        parts.push(PayloadPart {
            key: "utilities".to_string(),
            value: PartValue::Text(utility.wire_value().to_string()),
        });
    }

    for (index, slot) in ui.images().iter().enumerate() {
        match slot {
            ImageSlot::New(file) => parts.push(PayloadPart {
                key: "images".to_string(),
                value: PartValue::File(file.clone()),
            }),
            // Retained URLs go under an indexed key so the API can tell
            // kept assets apart from new uploads.
            ImageSlot::Existing(url) => parts.push(PayloadPart {
                key: format!("existing_images[{index}]"),
                value: PartValue::Text(url.clone()),
            }),
        }
    }

    if let Some(plan) = ui.layout_plan() {
        match plan {
            LayoutPlan::New(file) => {
                let key = match mode {
                    FormMode::Create => "layout_plan",
                    FormMode::Update => "new_layout_plan",
                };
                parts.push(PayloadPart {
                    key: key.to_string(),
                    value: PartValue::File(file.clone()),
                });
            }
            LayoutPlan::Existing(url) => parts.push(PayloadPart {
                key: "layout_plan".to_string(),
                value: PartValue::Text(url.clone()),
            }),
        }
    }

    Ok(EncodedForm { kind, mode, parts })
}

fn validate_uploads(mode: FormMode, ui: &UiState) -> Result<(), FormError> {
    use super::values::{IMAGE_MIME_TYPES, MAX_IMAGE_BYTES, MAX_LAYOUT_BYTES};

    if ui.images().len() > MAX_IMAGES {
        return Err(FormError::TooManyImages);
    }
    for slot in ui.images() {
        if let ImageSlot::New(file) = slot {
            if !IMAGE_MIME_TYPES.contains(&file.mime.as_str()) {
                return Err(FormError::UnsupportedImageType);
            }
            if file.bytes.len() > MAX_IMAGE_BYTES {
                return Err(FormError::ImageTooLarge);
            }
        }
    }
    if let Some(LayoutPlan::New(file)) = ui.layout_plan() {
        let image = IMAGE_MIME_TYPES.contains(&file.mime.as_str());
        let pdf = mode == FormMode::Update && file.mime == "application/pdf";
        if !image && !pdf {
            return Err(FormError::unsupported_layout(mode));
        }
        if file.bytes.len() > MAX_LAYOUT_BYTES {
            return Err(FormError::LayoutTooLarge);
        }
    }
    Ok(())
}

/// Resolves `size`/`extra_land` into the `{value, unit}` object to be
/// serialized, or `None` when the field is absent or incomplete. Only
/// the update flow sees these as serialized strings (values echoed back
/// by the API); a malformed string there is a hard validation error.
fn measurement_object(
    values: &FormValues,
    mode: FormMode,
    field: &str,
    parse_error: FormError,
) -> Result<Option<Map<String, Value>>, FormError> {
    let Some(raw) = values.get(field) else {
        return Ok(None);
    };
    let object = match raw {
        Value::Object(map) => map.clone(),
        Value::String(encoded) if mode == FormMode::Update => {
            match serde_json::from_str::<Value>(encoded) {
                Ok(Value::Object(map)) => map,
                _ => return Err(parse_error),
            }
        }
        _ => return Ok(None),
    };
    let complete = is_truthy(object.get("value")) && is_truthy(object.get("unit"));
    Ok(complete.then_some(object))
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::Bool(b)) => *b,
        Some(_) => true,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::values::test_file;

    fn plaza_values() -> FormValues {
        let mut values = FormValues::new();
        values.set_text("property_type", "Plaza");
        values.set_text("list_type", "Sale");
        values.set_text("payment_type", "Full Payment");
        values.set_text("price", "90000000");
        values.set_text("city", "Islamabad");
        values.set_text("construction_story", "4");
        values.set_text("shops", "12");
        values.set_text("lift", "Yes");
        values
    }

    #[test]
    fn missing_property_type_aborts() {
        let values = FormValues::new();
        let err = encode(&values, FormMode::Create, &UiState::new()).unwrap_err();
        assert_eq!(err, FormError::MissingPropertyType);
    }

    #[test]
    fn property_type_is_lowercased_on_the_wire() {
        let mut values = FormValues::new();
        values.set_text("property_type", "ResidentialPlot");
        let form = encode(&values, FormMode::Create, &UiState::new()).unwrap();
        assert_eq!(form.text("property_type"), Some("residentialplot"));
        assert_eq!(form.endpoint(), "/residential_plot");
    }

    #[test]
    fn text_lookup_outlives_a_temporary_key() {
        let form = encode(&plaza_values(), FormMode::Create, &UiState::new()).unwrap();
        let city = {
            let key = String::from("city");
            form.text(&key)
        };
        assert_eq!(city, Some("Islamabad"));
    }

    #[test]
    fn yes_no_fields_become_booleans() {
        let form = encode(&plaza_values(), FormMode::Create, &UiState::new()).unwrap();
        assert_eq!(form.text("lift"), Some("true"));
        // Non-boolean fields pass through as text.
        assert_eq!(form.text("shops"), Some("12"));
    }

    #[test]
    fn no_installment_without_installment_payment_type() {
        let mut values = plaza_values();
        // Installment-shaped leftovers in the raw values must not leak.
        values.set_text("down_payment", "1000000");
        values.set_text("installment_amount", "250000");
        values.set_text("number_of_installments", "36");
        let form = encode(&values, FormMode::Create, &UiState::new()).unwrap();
        assert!(!form.has_key("installment"));
        assert!(!form.has_key("down_payment"));
    }

    #[test]
    fn installment_requires_all_three_sub_fields() {
        let mut values = plaza_values();
        values.set_text("payment_type", "Installment");
        values.set_text("down_payment", "1000000");
        values.set_text("installment_amount", "250000");
        let form = encode(&values, FormMode::Create, &UiState::new()).unwrap();
        assert!(!form.has_key("installment"));

        values.set_text("number_of_installments", "36");
        let form = encode(&values, FormMode::Create, &UiState::new()).unwrap();
        let installment: Value = serde_json::from_str(form.text("installment").unwrap()).unwrap();
        assert_eq!(installment["number_of_installments"], "36");
    }

    #[test]
    fn size_serializes_as_a_json_sub_object() {
        let mut values = plaza_values();
        values.set_measurement("size", "5", "Marla");
        let form = encode(&values, FormMode::Create, &UiState::new()).unwrap();
        let size: Value = serde_json::from_str(form.text("size").unwrap()).unwrap();
        assert_eq!(size, serde_json::json!({ "value": "5", "unit": "Marla" }));
    }

    #[test]
    fn incomplete_size_is_skipped() {
        let mut values = plaza_values();
        values.set_measurement("size", "", "Marla");
        let form = encode(&values, FormMode::Create, &UiState::new()).unwrap();
        assert!(!form.has_key("size"));
    }

    #[test]
    fn string_encoded_size_is_reparsed_on_update() {
        let mut values = plaza_values();
        values.set_text("size", r#"{"value":"5","unit":"Marla"}"#);
        let form = encode(&values, FormMode::Update, &UiState::new()).unwrap();
        let size: Value = serde_json::from_str(form.text("size").unwrap()).unwrap();
        assert_eq!(size["unit"], "Marla");
    }

    #[test]
    fn malformed_size_string_aborts_update() {
        let mut values = plaza_values();
        values.set_text("size", "{not json");
        let err = encode(&values, FormMode::Update, &UiState::new()).unwrap_err();
        assert_eq!(err, FormError::InvalidSize);

        let mut values = plaza_values();
        values.set_text("extra_land", "{not json");
        let err = encode(&values, FormMode::Update, &UiState::new()).unwrap_err();
        assert_eq!(err, FormError::InvalidExtraLand);
    }

    #[test]
    fn string_size_is_ignored_on_create() {
        let mut values = plaza_values();
        values.set_text("size", "{not json");
        let form = encode(&values, FormMode::Create, &UiState::new()).unwrap();
        assert!(!form.has_key("size"));
    }

    #[test]
    fn utilities_repeat_one_entry_per_choice() {
        use crate::models::Utility;
        let mut ui = UiState::new();
        ui.utilities.toggle(Utility::Electricity, true);
        ui.utilities.toggle(Utility::Internet, true);
        let form = encode(&plaza_values(), FormMode::Create, &ui).unwrap();
        let entries: Vec<_> = form.texts("utilities").collect();
        assert_eq!(entries, vec!["Electricity", "internet"]);
    }

    #[test]
    fn balloted_allotment_flattens_details() {
        let mut values = FormValues::new();
        values.set_text("property_type", "ResidentialPlot");
        values.set_text("allotment", "Balloted");
        values.set_text("plot", "12-B");
        values.set_text("street", "7");
        values.set_text("map_charges", "50000");
        let form = encode(&values, FormMode::Create, &UiState::new()).unwrap();
        assert_eq!(form.text("allotment_status"), Some("balloted"));
        assert_eq!(form.text("plot"), Some("12-B"));
        assert_eq!(form.text("street"), Some("7"));
        assert_eq!(form.text("map_charges"), Some("50000"));
        // Exactly one entry per detail field.
        assert_eq!(form.texts("plot").count(), 1);
    }

    #[test]
    fn non_balloted_allotment_omits_details() {
        let mut values = FormValues::new();
        values.set_text("property_type", "ResidentialPlot");
        values.set_text("allotment", "Non Balloted");
        values.set_text("plot", "12-B");
        values.set_text("road_width", "40");
        let form = encode(&values, FormMode::Create, &UiState::new()).unwrap();
        assert_eq!(form.text("allotment_status"), Some("non-balloted"));
        assert!(!form.has_key("plot"));
        assert!(!form.has_key("road_width"));
    }

    #[test]
    fn six_images_abort_with_no_payload() {
        let mut ui = UiState::new();
        ui.set_existing_images((0..6).map(|i| format!("https://cdn.example/{i}.webp")));
        let err = encode(&plaza_values(), FormMode::Update, &ui).unwrap_err();
        assert_eq!(err, FormError::TooManyImages);
    }

    #[test]
    fn retained_images_use_indexed_keys() {
        let mut ui = UiState::new();
        ui.set_existing_images(vec!["https://cdn.example/0.webp".to_string()]);
        ui.push_images(vec![test_file("new.png", "image/png", 10)]).unwrap();
        let form = encode(&plaza_values(), FormMode::Update, &ui).unwrap();
        assert_eq!(
            form.text("existing_images[0]"),
            Some("https://cdn.example/0.webp")
        );
        let files: Vec<_> = form
            .parts
            .iter()
            .filter(|p| p.key == "images" && matches!(p.value, PartValue::File(_)))
            .collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn layout_plan_key_depends_on_mode() {
        let mut ui = UiState::new();
        ui.set_layout_plan(FormMode::Create, Some(test_file("plan.png", "image/png", 10)))
            .unwrap();
        let form = encode(&plaza_values(), FormMode::Create, &ui).unwrap();
        assert!(form.has_key("layout_plan"));

        let mut ui = UiState::new();
        ui.set_layout_plan(FormMode::Update, Some(test_file("plan.png", "image/png", 10)))
            .unwrap();
        let form = encode(&plaza_values(), FormMode::Update, &ui).unwrap();
        assert!(form.has_key("new_layout_plan"));
        assert!(!form.has_key("layout_plan"));
    }

    #[test]
    fn retained_layout_url_keeps_the_plain_key() {
        let mut ui = UiState::new();
        ui.set_existing_layout_plan("https://cdn.example/plan.webp");
        let form = encode(&plaza_values(), FormMode::Update, &ui).unwrap();
        assert_eq!(form.text("layout_plan"), Some("https://cdn.example/plan.webp"));
    }

    #[test]
    fn irrelevant_fields_never_reach_the_payload() {
        let mut values = plaza_values();
        // A Home-only field left over from a previous kind selection.
        values.set_text("bedrooms", "4");
        let form = encode(&values, FormMode::Create, &UiState::new()).unwrap();
        assert!(!form.has_key("bedrooms"));
    }
}
