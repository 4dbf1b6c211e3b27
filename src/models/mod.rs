use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::FormMode;

/// Kind of a property listing. Closed set; every kind carries its own
/// field schema (see `schema`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyKind {
    Apartment,
    Home,
    ResidentialPlot,
    FarmHouse,
    CommercialPlot,
    Plaza,
    Shop,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 7] = [
        PropertyKind::Apartment,
        PropertyKind::Home,
        PropertyKind::ResidentialPlot,
        PropertyKind::FarmHouse,
        PropertyKind::CommercialPlot,
        PropertyKind::Plaza,
        PropertyKind::Shop,
    ];

    /// Display name used client-side ("ResidentialPlot", "FarmHouse", ...).
    pub fn display_name(&self) -> &'static str {
        match self {
            PropertyKind::Apartment => "Apartment",
            PropertyKind::Home => "Home",
            PropertyKind::ResidentialPlot => "ResidentialPlot",
            PropertyKind::FarmHouse => "FarmHouse",
            PropertyKind::CommercialPlot => "CommercialPlot",
            PropertyKind::Plaza => "Plaza",
            PropertyKind::Shop => "Shop",
        }
    }

    /// snake_case name the listing API uses on reads and deletes.
    pub fn backend_name(&self) -> &'static str {
        match self {
            PropertyKind::Apartment => "apartment",
            PropertyKind::Home => "home",
            PropertyKind::ResidentialPlot => "residential_plot",
            PropertyKind::FarmHouse => "farmhouse",
            PropertyKind::CommercialPlot => "commercial_plot",
            PropertyKind::Plaza => "plaza",
            PropertyKind::Shop => "shop",
        }
    }

    /// Value the form encoders put in the `property_type` payload field
    /// (the display name, lowercased).
    pub fn wire_value(&self) -> &'static str {
        match self {
            PropertyKind::Apartment => "apartment",
            PropertyKind::Home => "home",
            PropertyKind::ResidentialPlot => "residentialplot",
            PropertyKind::FarmHouse => "farmhouse",
            PropertyKind::CommercialPlot => "commercialplot",
            PropertyKind::Plaza => "plaza",
            PropertyKind::Shop => "shop",
        }
    }

    /// Create/update API sub-path. The two modes disagree on the plot
    /// kinds (`/residential_plot` vs `/residentialplot`); both spellings
    /// are part of the backend contract, so the table is keyed by mode.
    pub fn endpoint(&self, mode: FormMode) -> &'static str {
        match (self, mode) {
            (PropertyKind::Apartment, _) => "/apartment",
            (PropertyKind::Home, _) => "/home",
            (PropertyKind::ResidentialPlot, FormMode::Create) => "/residential_plot",
            (PropertyKind::ResidentialPlot, FormMode::Update) => "/residentialplot",
            (PropertyKind::FarmHouse, _) => "/farmhouse",
            (PropertyKind::CommercialPlot, FormMode::Create) => "/commercial_plot",
            (PropertyKind::CommercialPlot, FormMode::Update) => "/commercialplot",
            (PropertyKind::Plaza, _) => "/plaza",
            (PropertyKind::Shop, _) => "/shop",
        }
    }

    /// Accepts any of the spellings in circulation: backend snake_case,
    /// display casing, and the lowercased display form.
    pub fn parse(s: &str) -> Option<Self> {
        let lowered = s.to_ascii_lowercase();
        match lowered.as_str() {
            "apartment" => Some(PropertyKind::Apartment),
            "home" => Some(PropertyKind::Home),
            "residentialplot" | "residential_plot" => Some(PropertyKind::ResidentialPlot),
            "farmhouse" => Some(PropertyKind::FarmHouse),
            "commercialplot" | "commercial_plot" => Some(PropertyKind::CommercialPlot),
            "plaza" => Some(PropertyKind::Plaza),
            "shop" => Some(PropertyKind::Shop),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for PropertyKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_name())
    }
}

impl<'de> Deserialize<'de> for PropertyKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PropertyKind::parse(&s)
            .ok_or_else(|| de::Error::custom(format!("unknown property type: {s}")))
    }
}

/// Rent vs sale listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListKind {
    Rent,
    Sale,
}

impl ListKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ListKind::Rent => "Rent",
            ListKind::Sale => "Sale",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Payment terms. Installment sub-fields are only meaningful on Sale
/// listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentKind {
    #[serde(rename = "Full Payment")]
    FullPayment,
    Installment,
}

impl PaymentKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentKind::FullPayment => "Full Payment",
            PaymentKind::Installment => "Installment",
        }
    }
}

/// Land/area units understood by the size selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeUnit {
    Kanal,
    Marla,
    #[serde(rename = "Square Yards")]
    SquareYards,
    #[serde(rename = "Square Feet")]
    SquareFeet,
}

impl SizeUnit {
    pub const ALL: [SizeUnit; 4] = [
        SizeUnit::Kanal,
        SizeUnit::Marla,
        SizeUnit::SquareYards,
        SizeUnit::SquareFeet,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SizeUnit::Kanal => "Kanal",
            SizeUnit::Marla => "Marla",
            SizeUnit::SquareYards => "Square Yards",
            SizeUnit::SquareFeet => "Square Feet",
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SizeUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Kanal" => Ok(SizeUnit::Kanal),
            "Marla" => Ok(SizeUnit::Marla),
            "Square Yards" => Ok(SizeUnit::SquareYards),
            "Square Feet" => Ok(SizeUnit::SquareFeet),
            _ => Err(()),
        }
    }
}

/// A `{value, unit}` pair, used for both `size` and `extra_land`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: SizeUnit,
}

/// Deferred-payment terms. The API echoes these back as the strings the
/// form submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub down_payment: String,
    pub installment_amount: String,
    pub number_of_installments: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllotmentStatus {
    #[serde(rename = "balloted")]
    Balloted,
    #[serde(rename = "non-balloted")]
    NonBalloted,
}

impl AllotmentStatus {
    pub fn wire_value(&self) -> &'static str {
        match self {
            AllotmentStatus::Balloted => "balloted",
            AllotmentStatus::NonBalloted => "non-balloted",
        }
    }

    /// Normalizes the form's selection text ("Balloted", "Non Balloted")
    /// as well as the already-lowercased wire forms.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().replace(' ', "-").as_str() {
            "balloted" => Some(AllotmentStatus::Balloted),
            "non-balloted" => Some(AllotmentStatus::NonBalloted),
            _ => None,
        }
    }
}

/// Detail block attached to a balloted allotment. Field names are the
/// wire contract, misspelling included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllotmentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_charges: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub development_charges: Option<String>,
    #[serde(
        default,
        rename = "possessionUitilityCharges",
        skip_serializing_if = "Option::is_none"
    )]
    pub possession_utility_charges: Option<String>,
}

/// Allotment status of a plot. `details` is only populated while
/// `status` is balloted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allotment {
    pub status: AllotmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<AllotmentDetails>,
}

/// Available services on a listing. `None` is an exclusive sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Utility {
    Electricity,
    Water,
    Gas,
    #[serde(rename = "internet")]
    Internet,
    None,
}

impl Utility {
    pub fn wire_value(&self) -> &'static str {
        match self {
            Utility::Electricity => "Electricity",
            Utility::Water => "Water",
            Utility::Gas => "Gas",
            Utility::Internet => "internet",
            Utility::None => "None",
        }
    }
}

/// Checkbox-group state for utilities. Selecting `None` clears every
/// other choice; selecting anything else clears `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UtilitySelection {
    selected: Vec<Utility>,
}

impl UtilitySelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_utilities(utilities: &[Utility]) -> Self {
        let mut selection = Self::new();
        for u in utilities {
            selection.toggle(*u, true);
        }
        selection
    }

    pub fn toggle(&mut self, utility: Utility, checked: bool) {
        if !checked {
            self.selected.retain(|u| *u != utility);
            return;
        }
        if utility == Utility::None {
            self.selected = vec![Utility::None];
        } else {
            if self.selected.contains(&Utility::None) {
                self.selected.clear();
            }
            if !self.selected.contains(&utility) {
                self.selected.push(utility);
            }
        }
    }

    pub fn as_slice(&self) -> &[Utility] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// A single property listing as returned by `GET /properties/all`.
///
/// The contact and location fields are common to every kind; the
/// kind-specific fields (bedrooms, plot, construction_story, ...) land in
/// `extra` untyped, since which of them exist is schema-table-driven.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "_id")]
    pub id: String,
    pub property_type: PropertyKind,
    pub list_type: ListKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub society: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_location: Option<String>,
    #[serde(default, rename = "full_Name", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, rename = "office_Name", skip_serializing_if = "Option::is_none")]
    pub office_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, rename = "contact_Number", skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_land: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment: Option<Installment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allotment: Option<Allotment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub utilities: Vec<Utility>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Property {
    /// Looks up a field by its wire name, covering both the typed common
    /// fields and the kind-specific `extra` map. Used by the edit-flow
    /// prefill, which walks schema tables by name.
    pub fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "list_type" => Some(Value::from(self.list_type.display_name())),
            "property_type" => Some(Value::from(self.property_type.display_name())),
            "payment_type" => self.payment_type.map(|p| Value::from(p.display_name())),
            "price" => self.price.map(Value::from),
            "city" => self.city.clone().map(Value::from),
            "society" => self.society.clone().map(Value::from),
            "phase" => self.phase.clone().map(Value::from),
            "description" => self.description.clone().map(Value::from),
            "video_url" => self.video_url.clone().map(Value::from),
            "pin_location" => self.pin_location.clone().map(Value::from),
            "full_Name" => self.full_name.clone().map(Value::from),
            "office_Name" => self.office_name.clone().map(Value::from),
            "email" => self.email.clone().map(Value::from),
            "contact_Number" => self.contact_number.clone().map(Value::from),
            other => self.extra.get(other).cloned(),
        }
    }
}

/// Aggregate counters for the dashboard, pre-computed by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(rename = "totalProperties", default)]
    pub total_properties: u64,
    #[serde(rename = "forSale", default)]
    pub for_sale: u64,
    #[serde(rename = "forRent", default)]
    pub for_rent: u64,
    #[serde(rename = "byType", default, deserialize_with = "null_to_default")]
    pub by_type: BTreeMap<String, u64>,
}

/// Shape of `GET /properties/dashboard`. Display-only; no aggregation
/// happens client-side. Missing or explicitly null sections fall back to
/// empty defaults so one bad aggregate never sinks the whole response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(default, deserialize_with = "null_to_default")]
    pub stats: DashboardStats,
    #[serde(
        rename = "topExpensiveProperties",
        default,
        deserialize_with = "null_to_default"
    )]
    pub top_expensive_properties: Vec<Property>,
    #[serde(
        rename = "cheapestProperties",
        default,
        deserialize_with = "null_to_default"
    )]
    pub cheapest_properties: Vec<Property>,
}

/// Treats an explicit JSON `null` the same as an absent field.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
