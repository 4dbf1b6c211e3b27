//! Edit-flow form population.
//!
//! Flattens a fetched [`Property`] back into raw form values and page
//! state. The society -> phase dependency is sequenced by an explicit
//! state machine: the phase can only be applied after the society's
//! option list has resolved, never on a timer.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::forms::values::{FormValues, UiState};
use crate::models::Property;
use crate::schema::{boolean_fields, common_fields, specific_fields, FormMode};

/// A housing society and its selectable phases/blocks.
#[derive(Debug, Clone, Copy)]
pub struct Society {
    pub name: &'static str,
    pub phases: &'static [&'static str],
}

pub static SOCIETIES: &[Society] = &[
    Society {
        name: "Gulberg Islamabad",
        phases: &[
            "Gulberg Greens",
            "Gulberg Residencia",
            "Executive Block",
            "A Block",
            "B Block",
        ],
    },
    Society {
        name: "Bahria Town Islamabad",
        phases: &[
            "Phase 1", "Phase 2", "Phase 3", "Phase 4", "Phase 5", "Phase 6", "Phase 7",
            "Phase 8",
        ],
    },
    Society {
        name: "DHA Islamabad",
        phases: &["Phase 1", "Phase 2", "Phase 3", "Phase 4", "Phase 5", "Phase 6"],
    },
    Society { name: "G-13", phases: &["G-13/1", "G-13/2", "G-13/3", "G-13/4"] },
    Society { name: "G-14", phases: &["G-14/1", "G-14/2", "G-14/3", "G-14/4"] },
    Society { name: "F-10", phases: &["F-10/1", "F-10/2", "F-10/3", "F-10/4"] },
    Society { name: "E-11", phases: &["E-11/1", "E-11/2", "E-11/3", "E-11/4"] },
    Society {
        name: "PWD Housing Society",
        phases: &["Block A", "Block B", "Block C", "Commercial Area"],
    },
    Society {
        name: "Soan Gardens",
        phases: &["Block A", "Block B", "Block C", "Block D"],
    },
    Society { name: "I-8", phases: &["I-8/1", "I-8/2", "I-8/3", "I-8/4"] },
];

fn phases_of(society: &str) -> &'static [&'static str] {
    SOCIETIES
        .iter()
        .find(|s| s.name == society)
        .map(|s| s.phases)
        .unwrap_or(&[])
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefillError {
    #[error("phase options requested before a society was set")]
    OptionsBeforeSociety,
    #[error("phase set before phase options resolved")]
    PhaseBeforeOptions,
    #[error("phase {phase:?} is not offered by society {society:?}")]
    UnknownPhase { society: String, phase: String },
}

/// Two-phase initialization of the society/phase pair:
/// Idle -> SocietySet -> PhaseOptionsReady -> PhaseSet. Re-selecting the
/// society drops any downstream state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PhaseInit {
    #[default]
    Idle,
    SocietySet {
        society: String,
    },
    PhaseOptionsReady {
        society: String,
        options: &'static [&'static str],
    },
    PhaseSet {
        society: String,
        phase: String,
    },
}

impl PhaseInit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_society(&mut self, society: impl Into<String>) {
        *self = PhaseInit::SocietySet { society: society.into() };
    }

    /// Resolves the phase options for the chosen society. A society
    /// outside the table yields an empty option list, not an error.
    pub fn resolve_options(&mut self) -> Result<&'static [&'static str], PrefillError> {
        let society = match self {
            PhaseInit::Idle => return Err(PrefillError::OptionsBeforeSociety),
            PhaseInit::SocietySet { society }
            | PhaseInit::PhaseOptionsReady { society, .. }
            | PhaseInit::PhaseSet { society, .. } => society.clone(),
        };
        let options = phases_of(&society);
        *self = PhaseInit::PhaseOptionsReady { society, options };
        Ok(options)
    }

    pub fn set_phase(&mut self, phase: impl Into<String>) -> Result<(), PrefillError> {
        let phase = phase.into();
        let (society, options) = match self {
            PhaseInit::PhaseOptionsReady { society, options } => (society.clone(), *options),
            _ => return Err(PrefillError::PhaseBeforeOptions),
        };
        if !options.contains(&phase.as_str()) {
            return Err(PrefillError::UnknownPhase { society, phase });
        }
        *self = PhaseInit::PhaseSet { society, phase };
        Ok(())
    }

    pub fn society(&self) -> Option<&str> {
        match self {
            PhaseInit::Idle => None,
            PhaseInit::SocietySet { society }
            | PhaseInit::PhaseOptionsReady { society, .. }
            | PhaseInit::PhaseSet { society, .. } => Some(society),
        }
    }

    pub fn phase(&self) -> Option<&str> {
        match self {
            PhaseInit::PhaseSet { phase, .. } => Some(phase),
            _ => None,
        }
    }
}

/// Output of [`prefill`]: form values, page state, and where the
/// society/phase initialization landed.
#[derive(Debug, Clone)]
pub struct PrefilledForm {
    pub values: FormValues,
    pub ui: UiState,
    pub phase_init: PhaseInit,
}

/// Populates an edit form from a fetched property: booleans back to
/// Yes/No, installment and balloted-allotment sub-fields flattened,
/// size/extra_land as `{value, unit}` objects, uploads seeded as
/// retained URLs.
pub fn prefill(property: &Property) -> PrefilledForm {
    let kind = property.property_type;
    let mut values = FormValues::new();

    for &field in common_fields(FormMode::Update) {
        if matches!(field, "society" | "phase" | "images" | "layout_plan") {
            continue;
        }
        if let Some(value) = property.field_value(field) {
            values.set_value(field, value);
        }
    }

    let booleans = boolean_fields(kind);
    for &field in specific_fields(kind, FormMode::Update) {
        match field {
            "utilities" => {}
            "size" => {
                if let Some(size) = &property.size {
                    values.set_measurement("size", size.value, size.unit.display_name());
                }
            }
            "extra_land" => {
                if let Some(extra) = &property.extra_land {
                    values.set_measurement("extra_land", extra.value, extra.unit.display_name());
                }
            }
            "installment" => {
                if let Some(installment) = &property.installment {
                    values.set_text("down_payment", installment.down_payment.clone());
                    values.set_text(
                        "installment_amount",
                        installment.installment_amount.clone(),
                    );
                    values.set_text(
                        "number_of_installments",
                        installment.number_of_installments.clone(),
                    );
                }
            }
            "allotment" => {
                if let Some(allotment) = &property.allotment {
                    values.set_text("allotment", allotment.status.wire_value());
                    if let Some(details) = &allotment.details {
                        set_opt(&mut values, "plot", &details.plot);
                        set_opt(&mut values, "street", &details.street);
                        set_opt(&mut values, "category", &details.category);
                        set_opt(&mut values, "road_width", &details.road_width);
                        set_opt(&mut values, "map_charges", &details.map_charges);
                        set_opt(&mut values, "development_charges", &details.development_charges);
                        set_opt(
                            &mut values,
                            "possessionUitilityCharges",
                            &details.possession_utility_charges,
                        );
                    }
                }
            }
            _ => {
                if let Some(value) = property.field_value(field) {
                    if booleans.contains(&field) {
                        if let Value::Bool(b) = value {
                            values.set_text(field, if b { "Yes" } else { "No" });
                        } else {
                            values.set_value(field, value);
                        }
                    } else {
                        values.set_value(field, value);
                    }
                }
            }
        }
    }

    let mut ui = UiState::new();
    ui.utilities = crate::models::UtilitySelection::from_utilities(&property.utilities);
    ui.set_existing_images(property.images.iter().cloned());
    if let Some(plan) = &property.layout_plan {
        ui.set_existing_layout_plan(plan.clone());
    }

    // Society first; the phase only applies once its options resolved.
    let mut phase_init = PhaseInit::new();
    if let Some(society) = &property.society {
        phase_init.set_society(society.clone());
        values.set_text("society", society.clone());
        // set_society guarantees resolve_options cannot fail here.
        let _ = phase_init.resolve_options();
        if let Some(phase) = &property.phase {
            match phase_init.set_phase(phase.clone()) {
                Ok(()) => values.set_text("phase", phase.clone()),
                Err(err) => {
                    warn!(property_id = %property.id, error = %err, "phase left unset");
                }
            }
        }
    }

    PrefilledForm { values, ui, phase_init }
}

fn set_opt(values: &mut FormValues, field: &str, value: &Option<String>) {
    if let Some(value) = value {
        values.set_text(field, value.clone());
    }
}
