//! Static field schema for the property forms.
//!
//! One registry serves both the create and the edit flow; the places
//! where the two disagree on the backend contract (endpoint spellings,
//! the update-only `installment` entries, layout-plan MIME set) are
//! keyed by [`FormMode`] instead of being duplicated.

use crate::models::{PropertyKind, SizeUnit};

/// Which submission flow a form is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

/// Fields present for every property kind. The create flow additionally
/// collects a free-text description.
pub fn common_fields(mode: FormMode) -> &'static [&'static str] {
    match mode {
        FormMode::Create => &[
            "list_type",
            "property_type",
            "payment_type",
            "description",
            "price",
            "city",
            "society",
            "phase",
            "video_url",
            "pin_location",
            "images",
            "layout_plan",
            "full_Name",
            "office_Name",
            "email",
            "contact_Number",
        ],
        FormMode::Update => &[
            "list_type",
            "property_type",
            "payment_type",
            "price",
            "city",
            "society",
            "phase",
            "video_url",
            "pin_location",
            "images",
            "layout_plan",
            "full_Name",
            "office_Name",
            "email",
            "contact_Number",
        ],
    }
}

/// Kind-specific field names, in form order. Some names recur across
/// kinds with the same semantics (size, possession, lift).
pub fn specific_fields(kind: PropertyKind, mode: FormMode) -> &'static [&'static str] {
    use FormMode::*;
    use PropertyKind::*;
    match (kind, mode) {
        (Apartment, Create) => &[
            "bedrooms",
            "bathrooms",
            "floor_level",
            "furnished",
            "size",
            "building_name",
            "apartment_no",
            "parking",
            "lift",
            "is_living",
            "tv_lounch",
            "servent",
            "kitchen",
            "utilities",
            "possession",
            "commercialName",
        ],
        (Apartment, Update) => &[
            "bedrooms",
            "bathrooms",
            "floor_level",
            "furnished",
            "size",
            "building_name",
            "apartment_no",
            "parking",
            "lift",
            "is_living",
            "tv_lounch",
            "servent",
            "kitchen",
            "utilities",
            "possession",
            "commercialName",
            "installment",
        ],
        (Home, Create) => &[
            "bedrooms",
            "bathrooms",
            "floor_level",
            "furnished",
            "house",
            "design",
            "store_room",
            "servent_room",
            "living",
            "car_parking",
            "possession",
            "solar_panel",
            "swimmingPool",
            "kitchen",
            "construction_year",
            "utilities",
            "size",
            "extra_land",
            "sector",
        ],
        (Home, Update) => &[
            "bedrooms",
            "bathrooms",
            "floor_level",
            "furnished",
            "house",
            "design",
            "store_room",
            "servent_room",
            "living",
            "car_parking",
            "possession",
            "solar_panel",
            "swimmingPool",
            "kitchen",
            "construction_year",
            "utilities",
            "size",
            "extra_land",
            "sector",
            "installment",
        ],
        (ResidentialPlot, Create) => &[
            "plot",
            "road_width",
            "street",
            "category",
            "allotment",
            "possessionUitilityCharges",
            "size",
            "extra_land",
            "note_for_result",
            "sector",
            "earth_status",
            "ownership",
            "map_charges",
            "development_charges",
        ],
        (ResidentialPlot, Update) => &[
            "plot",
            "road_width",
            "street",
            "category",
            "allotment",
            "possessionUitilityCharges",
            "size",
            "extra_land",
            "note_for_result",
            "sector",
            "earth_status",
            "ownership",
            "map_charges",
            "development_charges",
            "installment",
        ],
        (FarmHouse, Create) => &[
            "street",
            "possessionUitilityCharges",
            "size",
            "extra_land",
            "category",
            "sector",
            "plot",
            "road_width",
            "allotment",
            "note_for_result",
            "earth_status",
            "ownership",
            "map_charges",
            "development_charges",
            "construction_allowed",
            "plot_dimension",
        ],
        (FarmHouse, Update) => &[
            "street",
            "possessionUitilityCharges",
            "size",
            "extra_land",
            "category",
            "sector",
            "plot",
            "road_width",
            "allotment",
            "note_for_result",
            "earth_status",
            "ownership",
            "map_charges",
            "development_charges",
            "construction_allowed",
            "plot_dimension",
            "installment",
        ],
        (CommercialPlot, Create) => &[
            "plot",
            "category",
            "plot_dimension",
            "commercialName",
            "road_width",
            "allotment",
            "possessionUitilityCharges",
            "size",
            "extra_land",
            "note_for_result",
            "earth_status",
            "ownership",
            "map_charges",
            "development_charges",
            "construction_allowed",
            "coverage",
        ],
        (CommercialPlot, Update) => &[
            "plot",
            "category",
            "plot_dimension",
            "commercialName",
            "road_width",
            "allotment",
            "possessionUitilityCharges",
            "size",
            "extra_land",
            "note_for_result",
            "earth_status",
            "ownership",
            "map_charges",
            "development_charges",
            "construction_allowed",
            "coverage",
            "installment",
        ],
        (Plaza, Create) => &[
            "construction_story",
            "shops",
            "parking",
            "plot_dimension",
            "category",
            "building_name",
            "height",
            "apartments",
            "monthly_rent",
            "utilities",
            "commercialName",
            "apartment_floors",
            "commercial_floors",
            "lift",
        ],
        (Plaza, Update) => &[
            "construction_story",
            "shops",
            "parking",
            "plot_dimension",
            "building_name",
            "height",
            "apartments",
            "monthly_rent",
            "utilities",
            "commercialName",
            "apartment_floors",
            "commercial_floors",
            "installment",
            "lift",
            "size",
        ],
        (Shop, Create) => &[
            "floor_number",
            "shop_number",
            "washroom",
            "monthly_rent",
            "building_name",
            "size",
            "commercialName",
            "possession",
        ],
        (Shop, Update) => &[
            "floor_number",
            "shop_number",
            "washroom",
            "monthly_rent",
            "building_name",
            "size",
            "commercialName",
            "possession",
            "installment",
        ],
    }
}

/// Fields rendered as Yes/No selectors that must serialize as booleans.
pub fn boolean_fields(kind: PropertyKind) -> &'static [&'static str] {
    use PropertyKind::*;
    match kind {
        Apartment => &["furnished", "lift", "is_living", "servent", "possession", "tv_lounch"],
        Home => &[
            "furnished",
            "store_room",
            "servent_room",
            "living",
            "possession",
            "swimmingPool",
        ],
        ResidentialPlot => &[],
        // "parking" is not in the farm house field tables, so the entry
        // is dormant. It stays declared so a payload that does carry the
        // field serializes as a boolean.
        FarmHouse => &["parking"],
        CommercialPlot => &["construction_allowed"],
        Plaza => &["lift"],
        Shop => &["washroom", "possession"],
    }
}

/// Units offered by the size selector for a kind. Apartments and shops
/// never measure in Kanal.
pub fn allowed_units(kind: PropertyKind) -> &'static [SizeUnit] {
    match kind {
        PropertyKind::Apartment | PropertyKind::Shop => {
            &[SizeUnit::Marla, SizeUnit::SquareYards, SizeUnit::SquareFeet]
        }
        _ => &SizeUnit::ALL,
    }
}

/// The fixed detail set flattened into the payload when an allotment is
/// balloted.
pub const ALLOTMENT_DETAIL_FIELDS: [&str; 7] = [
    "plot",
    "street",
    "category",
    "road_width",
    "map_charges",
    "development_charges",
    "possessionUitilityCharges",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_fields_are_declared_for_their_kind() {
        for kind in PropertyKind::ALL {
            for mode in [FormMode::Create, FormMode::Update] {
                let specific = specific_fields(kind, mode);
                let common = common_fields(mode);
                for field in boolean_fields(kind) {
                    // Farm house carries a dormant "parking" boolean with
                    // no matching form field.
                    if kind == PropertyKind::FarmHouse && *field == "parking" {
                        continue;
                    }
                    assert!(
                        specific.contains(field) || common.contains(field),
                        "{kind}: boolean field {field} not in schema ({mode:?})"
                    );
                }
            }
        }
    }

    #[test]
    fn farm_house_parking_boolean_is_dormant() {
        assert!(boolean_fields(PropertyKind::FarmHouse).contains(&"parking"));
        for mode in [FormMode::Create, FormMode::Update] {
            assert!(!specific_fields(PropertyKind::FarmHouse, mode).contains(&"parking"));
            assert!(!common_fields(mode).contains(&"parking"));
        }
    }

    #[test]
    fn update_mode_adds_installment_everywhere() {
        for kind in PropertyKind::ALL {
            assert!(!specific_fields(kind, FormMode::Create).contains(&"installment"));
            assert!(specific_fields(kind, FormMode::Update).contains(&"installment"));
        }
    }

    #[test]
    fn only_create_mode_collects_description() {
        assert!(common_fields(FormMode::Create).contains(&"description"));
        assert!(!common_fields(FormMode::Update).contains(&"description"));
    }

    #[test]
    fn apartment_and_shop_omit_kanal() {
        assert!(!allowed_units(PropertyKind::Apartment).contains(&SizeUnit::Kanal));
        assert!(!allowed_units(PropertyKind::Shop).contains(&SizeUnit::Kanal));
        assert!(allowed_units(PropertyKind::Home).contains(&SizeUnit::Kanal));
        assert!(allowed_units(PropertyKind::FarmHouse).contains(&SizeUnit::Kanal));
    }

    #[test]
    fn no_duplicate_field_names_within_a_kind() {
        for kind in PropertyKind::ALL {
            for mode in [FormMode::Create, FormMode::Update] {
                let fields = specific_fields(kind, mode);
                for (i, field) in fields.iter().enumerate() {
                    assert!(
                        !fields[i + 1..].contains(field),
                        "{kind}: duplicate {field} ({mode:?})"
                    );
                }
            }
        }
    }
}
