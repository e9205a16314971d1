//! Breeding — inheritance, compatibility and the request lifecycle
//!
//! - **Inheritance**: parent genomes → offspring genome, success and
//!   special-ability rolls
//! - **Compatibility**: side-effect-free prediction for a candidate pair
//! - **Request**: pending → completed state machine around incubation
//! - **Gate**: bond level, cooldown and seasonal collaborators

mod compatibility;
mod config;
mod gate;
mod inheritance;
mod request;

pub use compatibility::{
    analyze_compatibility, success_rate_for_distance, BreedingCompatibility, DistanceBand, PersonalityRange,
    PredictedTraits,
};
pub use config::{BreedingConfig, EarlyCompletion};
pub use gate::{
    seasonal_breeding_bonus, BondGate, BondLedger, FixedBonus, KizunaLevel, Season, SeasonCalendar,
    SeasonalCalendar, SubscriptionTier,
};
pub use inheritance::{
    attempt_breeding, blend_genomes, breed_genomes, roll_special_ability, success_chance, BreedingOutcome,
    BreedingPair, Offspring, Parent, SpecialAbility, INCUBATION_DAYS,
};
pub use request::{BreedingRequest, RequestStatus};

use crate::genome::GenomeError;

/// Everything one breeding attempt needs, passed in explicitly
pub struct BreedingContext<'a> {
    pub config: BreedingConfig,
    pub gate: &'a dyn BondGate,
    pub calendar: &'a dyn SeasonalCalendar,
}

impl<'a> BreedingContext<'a> {
    pub fn new(config: BreedingConfig, gate: &'a dyn BondGate, calendar: &'a dyn SeasonalCalendar) -> Self {
        Self { config, gate, calendar }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BreedingError {
    #[error("Companion '{companion_id}' has not reached the breeding bond level")]
    IneligibleParent { companion_id: String },

    #[error("Cannot {operation} breeding request {request_id} in state {status}")]
    InvalidRequestState {
        request_id: String,
        status: RequestStatus,
        operation: &'static str,
    },

    #[error("Breeding request {request_id} is still incubating ({:.0}% done)", .progress * 100.0)]
    IncubationIncomplete { request_id: String, progress: f64 },

    #[error("Invalid breeding config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Genome(#[from] GenomeError),
}
