//! Kizuna Genetics — base-7 companion genomes and breeding
//!
//! Every companion carries three strands of 60 base-7 digits
//! (personality, appearance, ability). Breeding mixes two parent genomes
//! into an offspring, a pedigree tree records who descends from whom.

pub mod breeding;
pub mod genome;
pub mod pedigree;
pub mod random;

pub use breeding::{
    analyze_compatibility, attempt_breeding, BondGate, BreedingCompatibility, BreedingConfig, BreedingContext,
    BreedingError, BreedingOutcome, BreedingPair, BreedingRequest, Parent, RequestStatus, SeasonalCalendar,
};
pub use genome::{deserialize_genome, serialize_genome, Base7Digit, Genome, GenomeError, Strand, StrandKind};
pub use pedigree::{PedigreeNode, PedigreeSnapshot};
pub use random::RandomSource;
