//! Text codec for genomes
//!
//! Wire form is a string triple, one 60-character digit string per
//! strand. Parsing never clamps: any character outside `'0'..='6'` or a
//! strand of the wrong length is an error.

use super::{Genome, GenomeError, Strand, StrandKind};
use serde::{Deserialize, Serialize};

/// Serialized genome. `red`/`blue`/`black` are accepted as legacy keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeRecord {
    #[serde(alias = "red")]
    pub personality: String,
    #[serde(alias = "blue")]
    pub appearance: String,
    #[serde(alias = "black")]
    pub ability: String,
}

impl From<Genome> for GenomeRecord {
    fn from(g: Genome) -> Self {
        GenomeRecord::from(&g)
    }
}

impl From<&Genome> for GenomeRecord {
    fn from(g: &Genome) -> Self {
        Self {
            personality: g.personality.to_string(),
            appearance: g.appearance.to_string(),
            ability: g.ability.to_string(),
        }
    }
}

impl TryFrom<GenomeRecord> for Genome {
    type Error = GenomeError;

    fn try_from(r: GenomeRecord) -> Result<Self, Self::Error> {
        Ok(Genome {
            personality: Strand::parse(&r.personality, StrandKind::Personality)?,
            appearance: Strand::parse(&r.appearance, StrandKind::Appearance)?,
            ability: Strand::parse(&r.ability, StrandKind::Ability)?,
        })
    }
}

/// Genome to its JSON string triple
pub fn serialize_genome(genome: &Genome) -> String {
    // Digit strings need no JSON escaping
    format!(
        r#"{{"personality":"{}","appearance":"{}","ability":"{}"}}"#,
        genome.personality, genome.appearance, genome.ability
    )
}

/// Parse a JSON string triple, validating every digit
pub fn deserialize_genome(json: &str) -> Result<Genome, GenomeError> {
    let record: GenomeRecord =
        serde_json::from_str(json).map_err(|e| GenomeError::Malformed(e.to_string()))?;
    Genome::try_from(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Base7Digit;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn arb_strand() -> impl Strategy<Value = Strand> {
        prop::collection::vec(0u8..7, 60).prop_map(|v| {
            Strand::from_fn(|i| Base7Digit::new(v[i]).unwrap_or(Base7Digit::MIN))
        })
    }

    fn arb_genome() -> impl Strategy<Value = Genome> {
        (arb_strand(), arb_strand(), arb_strand()).prop_map(|(p, a, b)| Genome::new(p, a, b))
    }

    proptest! {
        #[test]
        fn prop_round_trip(g in arb_genome()) {
            let text = serialize_genome(&g);
            prop_assert_eq!(deserialize_genome(&text).unwrap(), g);
        }

        #[test]
        fn prop_distance_bounded_and_symmetric(a in arb_genome(), b in arb_genome()) {
            let ab = a.distance(&b);
            prop_assert!((0.0..=6.0).contains(&ab));
            prop_assert_eq!(ab, b.distance(&a));
            prop_assert_eq!(a.distance(&a), 0.0);
        }
    }

    #[test]
    fn test_record_uses_digit_strings() {
        let mut rng = StdRng::seed_from_u64(31);
        let g = Genome::random(&mut rng);
        let record = GenomeRecord::from(&g);
        assert_eq!(record.personality.len(), 60);
        assert!(record.ability.chars().all(|c| ('0'..='6').contains(&c)));
    }

    #[test]
    fn test_serialized_matches_record() {
        let mut rng = StdRng::seed_from_u64(32);
        let g = Genome::random(&mut rng);
        let text = serialize_genome(&g);
        assert_eq!(text, serde_json::to_string(&GenomeRecord::from(&g)).unwrap());
        assert_eq!(text, serde_json::to_string(&g).unwrap());
        assert!(text.starts_with(r#"{"personality":""#));
    }

    #[test]
    fn test_legacy_keys_accepted() {
        let s = "3".repeat(60);
        let json = format!(r#"{{"red":"{s}","blue":"{s}","black":"{s}"}}"#);
        let g = deserialize_genome(&json).unwrap();
        assert_eq!(g.personality, Strand::uniform(Base7Digit::clamped(3)));
    }

    #[test]
    fn test_rejects_digit_seven() {
        let good = "1".repeat(60);
        let bad = format!("{}7", "1".repeat(59));
        let json = format!(
            r#"{{"personality":"{good}","appearance":"{bad}","ability":"{good}"}}"#
        );
        match deserialize_genome(&json) {
            Err(GenomeError::InvalidDigit { strand, position, found }) => {
                assert_eq!(strand, "appearance");
                assert_eq!(position, 59);
                assert_eq!(found, '7');
            }
            other => panic!("expected InvalidDigit, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_short_strand() {
        let good = "1".repeat(60);
        let json = format!(
            r#"{{"personality":"{good}","appearance":"{good}","ability":"{}"}}"#,
            "1".repeat(12)
        );
        assert!(matches!(
            deserialize_genome(&json),
            Err(GenomeError::InvalidLength { length: 12, .. })
        ));
    }

    #[test]
    fn test_rejects_non_json() {
        assert!(matches!(deserialize_genome("not json"), Err(GenomeError::Malformed(_))));
    }

    #[test]
    fn test_embedded_genome_validates() {
        #[derive(Deserialize)]
        struct Holder {
            genome: Genome,
        }
        let bad = "9".repeat(60);
        let json = format!(
            r#"{{"genome":{{"personality":"{bad}","appearance":"{bad}","ability":"{bad}"}}}}"#
        );
        assert!(serde_json::from_str::<Holder>(&json).is_err());
    }
}
