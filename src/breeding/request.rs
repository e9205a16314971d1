//! BreedingRequest — one breeding attempt from proposal to hatched egg
//!
//! ```text
//! pending ──accept──▶ accepted ──complete──▶ completed
//!    │  └──────────────complete──────────────▲ (same-owner pairs)
//!    ├──reject──▶ rejected
//!    └──cancel──▶ cancelled
//! ```
//! Completed, rejected and cancelled are terminal. Cross-player requests
//! (a `partner_id` is set) must be accepted before they can complete.

use super::{breed_genomes, BondGate, BreedingContext, BreedingError, EarlyCompletion, INCUBATION_DAYS};
use crate::genome::Genome;
use crate::pedigree::PedigreeNode;
use crate::random::RandomSource;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    Cancelled,
}

impl RequestStatus {
    /// No transition leaves this state
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RequestStatus::Completed | RequestStatus::Rejected | RequestStatus::Cancelled
        )
    }

    /// Egg is incubating
    pub fn is_in_flight(self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Accepted)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingRequest {
    /// Unique request ID (uuid v4)
    pub id: String,
    /// First parent companion
    pub companion1_id: String,
    /// Second parent companion
    pub companion2_id: String,
    /// Player who proposed the breeding
    pub requester_id: String,
    /// Other player, for cross-player breeding
    pub partner_id: Option<String>,
    /// Current lifecycle state
    pub status: RequestStatus,
    /// Length of the incubation window
    pub incubation_days: u32,
    /// Incubation starts here
    pub created_at: DateTime<Utc>,
    /// Set once the egg hatches
    pub completed_at: Option<DateTime<Utc>>,
    /// Hatched genome, present only when completed
    pub offspring: Option<Genome>,
}

impl BreedingRequest {
    /// New pending request with the standard incubation window
    pub fn new(
        companion1_id: impl Into<String>,
        companion2_id: impl Into<String>,
        requester_id: impl Into<String>,
        partner_id: Option<String>,
    ) -> Self {
        let request = Self {
            id: Uuid::new_v4().to_string(),
            companion1_id: companion1_id.into(),
            companion2_id: companion2_id.into(),
            requester_id: requester_id.into(),
            partner_id,
            status: RequestStatus::Pending,
            incubation_days: INCUBATION_DAYS,
            created_at: Utc::now(),
            completed_at: None,
            offspring: None,
        };
        info!(
            "Created breeding request {} ({} x {})",
            request.id, request.companion1_id, request.companion2_id
        );
        request
    }

    /// Gate-checked creation: both companions must be breeding-eligible
    pub fn propose<G: BondGate + ?Sized>(
        gate: &G,
        companion1_id: impl Into<String>,
        companion2_id: impl Into<String>,
        requester_id: impl Into<String>,
        partner_id: Option<String>,
    ) -> Result<Self, BreedingError> {
        let companion1_id = companion1_id.into();
        let companion2_id = companion2_id.into();
        check_eligible(gate, [&companion1_id, &companion2_id])?;
        Ok(Self::new(companion1_id, companion2_id, requester_id, partner_id))
    }

    /// A partner player is involved
    pub fn is_cross_player(&self) -> bool {
        self.partner_id.is_some()
    }

    fn required(&self) -> Duration {
        Duration::days(self.incubation_days as i64)
    }

    fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.created_at).max(Duration::zero())
    }

    /// In flight and the incubation window has fully elapsed
    pub fn is_ready_at(&self, now: DateTime<Utc>) -> bool {
        self.status.is_in_flight() && self.elapsed_at(now) >= self.required()
    }

    /// `is_ready_at` against the UTC clock
    pub fn is_ready(&self) -> bool {
        self.is_ready_at(Utc::now())
    }

    /// Incubation progress in `[0, 1]`: 1 once completed, 0 once rejected or cancelled
    pub fn progress_at(&self, now: DateTime<Utc>) -> f64 {
        match self.status {
            RequestStatus::Completed => 1.0,
            s if s.is_in_flight() => {
                let required = self.required().num_milliseconds();
                if required <= 0 {
                    return 1.0;
                }
                (self.elapsed_at(now).num_milliseconds() as f64 / required as f64).min(1.0)
            }
            _ => 0.0,
        }
    }

    /// `progress_at` against the UTC clock
    pub fn progress(&self) -> f64 {
        self.progress_at(Utc::now())
    }

    fn transition(&mut self, operation: &'static str, allowed: &[RequestStatus], to: RequestStatus) -> Result<(), BreedingError> {
        if !allowed.contains(&self.status) {
            return Err(self.invalid_state(operation));
        }
        self.status = to;
        info!("Breeding request {} {}", self.id, to);
        Ok(())
    }

    fn invalid_state(&self, operation: &'static str) -> BreedingError {
        BreedingError::InvalidRequestState {
            request_id: self.id.clone(),
            status: self.status,
            operation,
        }
    }

    /// Partner agrees to a pending request
    pub fn accept(&mut self) -> Result<(), BreedingError> {
        self.transition("accept", &[RequestStatus::Pending], RequestStatus::Accepted)
    }

    /// Partner declines a pending request
    pub fn reject(&mut self) -> Result<(), BreedingError> {
        self.transition("reject", &[RequestStatus::Pending], RequestStatus::Rejected)
    }

    /// Requester withdraws a pending request
    pub fn cancel(&mut self) -> Result<(), BreedingError> {
        self.transition("cancel", &[RequestStatus::Pending], RequestStatus::Cancelled)
    }

    /// Hatch the egg: breed the parents with the pedigree formula, stamp
    /// `completed_at`, and move to `completed`. Before incubation ends this
    /// follows `early_completion` of the context config.
    ///
    /// Both companions are checked against the bond gate first; an
    /// ineligible companion leaves the request untouched and draws nothing.
    pub fn complete_at<R: RandomSource + ?Sized>(
        &mut self,
        ctx: &BreedingContext<'_>,
        parent1: &Genome,
        parent2: &Genome,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<&Genome, BreedingError> {
        check_eligible(ctx.gate, [&self.companion1_id, &self.companion2_id])?;

        let completable = match self.status {
            RequestStatus::Accepted => true,
            RequestStatus::Pending => !self.is_cross_player(),
            _ => false,
        };
        if !completable {
            return Err(self.invalid_state("complete"));
        }

        if !self.is_ready_at(now) {
            let progress = self.progress_at(now);
            match ctx.config.early_completion {
                EarlyCompletion::Reject => {
                    return Err(BreedingError::IncubationIncomplete {
                        request_id: self.id.clone(),
                        progress,
                    });
                }
                EarlyCompletion::Allow => {
                    warn!(
                        "Completing breeding request {} early ({:.0}% incubated)",
                        self.id,
                        progress * 100.0
                    );
                }
            }
        }

        let offspring = breed_genomes(parent1, parent2, ctx.config.inheritance_ratio, rng);
        self.completed_at = Some(now);
        self.status = RequestStatus::Completed;
        info!(
            "Breeding request {} completed, offspring rarity {}",
            self.id,
            offspring.rarity_tier().name()
        );
        let stored: &Genome = self.offspring.insert(offspring);
        Ok(stored)
    }

    /// `complete_at` against the UTC clock
    pub fn complete<R: RandomSource + ?Sized>(
        &mut self,
        ctx: &BreedingContext<'_>,
        parent1: &Genome,
        parent2: &Genome,
        rng: &mut R,
    ) -> Result<&Genome, BreedingError> {
        self.complete_at(ctx, parent1, parent2, rng, Utc::now())
    }

    /// Pedigree node for the hatched offspring, linked to both parents
    pub fn offspring_node(
        &self,
        name: impl Into<String>,
        parent1: &Arc<PedigreeNode>,
        parent2: &Arc<PedigreeNode>,
    ) -> Result<Arc<PedigreeNode>, BreedingError> {
        let genome = match (&self.status, &self.offspring) {
            (RequestStatus::Completed, Some(genome)) => genome,
            _ => return Err(self.invalid_state("record offspring")),
        };
        let birth = self.completed_at.unwrap_or_else(Utc::now);
        Ok(PedigreeNode::born_at(
            Uuid::new_v4().to_string(),
            name,
            genome,
            Some(Arc::clone(parent1)),
            Some(Arc::clone(parent2)),
            birth,
        ))
    }
}

fn check_eligible<G: BondGate + ?Sized>(gate: &G, companions: [&String; 2]) -> Result<(), BreedingError> {
    for id in companions {
        if !gate.is_breeding_eligible(id) {
            warn!("Breeding request refused: '{}' has not reached the breeding bond level", id);
            return Err(BreedingError::IneligibleParent {
                companion_id: id.clone(),
            });
        }
    }
    Ok(())
}
