//! External collaborators of the breeding core
//!
//! - **BondGate**: bond (kizuna) progression decides who may breed and how
//!   long an account waits between breedings
//! - **SeasonalCalendar**: the current season may boost breeding odds
//!
//! Both are traits so the game can plug in its own state. `BondLedger`
//! and `SeasonCalendar` are in-memory implementations of the stock rules.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Account subscription tier; decides the breeding cooldown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Free,
    Premium,
    #[serde(alias = "mythic")]
    Eternal,
}

impl SubscriptionTier {
    /// Days between breedings: one a year, three a year, unlimited
    pub fn cooldown_days(self) -> u32 {
        match self {
            SubscriptionTier::Free => 365,
            SubscriptionTier::Premium => 120,
            SubscriptionTier::Eternal => 0,
        }
    }
}

pub trait BondGate {
    /// Whether the companion has reached the breeding tier
    fn is_breeding_eligible(&self, companion_id: &str) -> bool;

    /// Cooldown between breedings for an account tier
    fn cooldown_days_for_tier(&self, tier: SubscriptionTier) -> u32 {
        tier.cooldown_days()
    }

    /// Earliest time the next breeding may start after one at `last_bred`
    fn next_breeding_at(&self, tier: SubscriptionTier, last_bred: DateTime<Utc>) -> DateTime<Utc> {
        last_bred + Duration::days(self.cooldown_days_for_tier(tier) as i64)
    }

    /// Whether the cooldown since `last_bred` has elapsed at `now`
    fn is_cooled_down_at(&self, tier: SubscriptionTier, last_bred: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now >= self.next_breeding_at(tier, last_bred)
    }
}

pub trait SeasonalCalendar {
    /// Additive breeding bonus for today, in `[0, ~1.5]`
    fn current_breeding_bonus(&self) -> f64;
}

/// Bond level 1 (Found) through 7 (Reincarnation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct KizunaLevel(u8);

/// XP needed to reach levels 1..=7
const LEVEL_XP: [u32; 7] = [0, 100, 300, 600, 1000, 1500, 2200];

impl KizunaLevel {
    pub const MAX: KizunaLevel = KizunaLevel(7);
    /// Breeding unlocks here
    pub const BREEDING: KizunaLevel = KizunaLevel(7);

    /// `None` outside `1..=7`
    pub fn new(level: u8) -> Option<Self> {
        (1..=7).contains(&level).then_some(Self(level))
    }

    /// Highest level whose XP threshold `xp` meets
    pub fn from_xp(xp: u32) -> Self {
        let reached = LEVEL_XP.iter().filter(|need| xp >= **need).count();
        Self(reached.max(1) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// XP threshold of this level
    pub fn required_xp(self) -> u32 {
        LEVEL_XP[(self.0 - 1) as usize]
    }

    /// Display name, Found through Reincarnation
    pub fn name(self) -> &'static str {
        match self.0 {
            1 => "Found",
            2 => "Friend",
            3 => "Family",
            4 => "Soul-Bound",
            5 => "Resonance",
            6 => "Eternal",
            _ => "Reincarnation",
        }
    }

    pub fn can_breed(self) -> bool {
        self >= Self::BREEDING
    }
}

impl TryFrom<u8> for KizunaLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or_else(|| format!("kizuna level {} is outside 1..=7", level))
    }
}

impl From<KizunaLevel> for u8 {
    fn from(level: KizunaLevel) -> u8 {
        level.0
    }
}

/// Bond XP per companion. Unknown companions are not eligible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BondLedger {
    xp: HashMap<String, u32>,
}

impl BondLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a companion's bond XP
    pub fn set_xp(&mut self, companion_id: impl Into<String>, xp: u32) {
        self.xp.insert(companion_id.into(), xp);
    }

    /// Add XP (saturating) and return the resulting level
    pub fn add_xp(&mut self, companion_id: &str, amount: u32) -> KizunaLevel {
        let entry = self.xp.entry(companion_id.to_string()).or_insert(0);
        *entry = entry.saturating_add(amount);
        KizunaLevel::from_xp(*entry)
    }

    /// `None` for a companion the ledger has never seen
    pub fn level(&self, companion_id: &str) -> Option<KizunaLevel> {
        self.xp.get(companion_id).map(|xp| KizunaLevel::from_xp(*xp))
    }
}

impl BondGate for BondLedger {
    fn is_breeding_eligible(&self, companion_id: &str) -> bool {
        self.level(companion_id).is_some_and(KizunaLevel::can_breed)
    }
}

/// The seven seasons of the garden year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    /// Great Cold, from Jan 20
    Daikan,
    /// Spring Awakening, from Feb 4
    Risshun,
    /// Gentle Rain, from May 21
    Shoman,
    /// Plum Rains, from Jun 6
    Tsuyu,
    /// Star Festival, from Jul 7
    Shocho,
    /// Autumn Dew, from Oct 8
    Kanro,
    /// Winter Arrival, from Nov 7
    Ritto,
}

impl Season {
    /// In calendar order of their start dates
    pub const ALL: [Season; 7] = [
        Season::Daikan,
        Season::Risshun,
        Season::Shoman,
        Season::Tsuyu,
        Season::Shocho,
        Season::Kanro,
        Season::Ritto,
    ];

    /// (month, day) the season begins
    pub fn start(self) -> (u32, u32) {
        match self {
            Season::Daikan => (1, 20),
            Season::Risshun => (2, 4),
            Season::Shoman => (5, 21),
            Season::Tsuyu => (6, 6),
            Season::Shocho => (7, 7),
            Season::Kanro => (10, 8),
            Season::Ritto => (11, 7),
        }
    }

    /// Additive breeding chance during this season
    pub fn breeding_bonus(self) -> f64 {
        match self {
            Season::Risshun => 1.0,
            Season::Shocho => 1.5,
            _ => 0.0,
        }
    }

    /// Stable lowercase identifier
    pub fn id(self) -> &'static str {
        match self {
            Season::Daikan => "daikan",
            Season::Risshun => "risshun",
            Season::Shoman => "shoman",
            Season::Tsuyu => "tsuyu",
            Season::Shocho => "shocho",
            Season::Kanro => "kanro",
            Season::Ritto => "ritto",
        }
    }

    pub fn from_id(id: &str) -> Option<Season> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// The season in effect on `date`. Dates before Jan 20 fall in the
    /// previous year's Ritto.
    pub fn for_date(date: NaiveDate) -> Season {
        let today = (date.month(), date.day());
        Self::ALL
            .into_iter()
            .rev()
            .find(|s| s.start() <= today)
            .unwrap_or(Season::Ritto)
    }
}

/// Bonus lookup by season id; unknown ids give no bonus
pub fn seasonal_breeding_bonus(season_id: &str) -> f64 {
    Season::from_id(season_id).map(Season::breeding_bonus).unwrap_or(0.0)
}

/// Calendar that reads the season from a date, or from the UTC clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonCalendar {
    pinned: Option<NaiveDate>,
}

impl SeasonCalendar {
    /// Follows the UTC clock
    pub fn system() -> Self {
        Self { pinned: None }
    }

    /// Pinned to one date
    pub fn on(date: NaiveDate) -> Self {
        Self { pinned: Some(date) }
    }

    pub fn season(&self) -> Season {
        let date = self.pinned.unwrap_or_else(|| Utc::now().date_naive());
        Season::for_date(date)
    }
}

impl SeasonalCalendar for SeasonCalendar {
    fn current_breeding_bonus(&self) -> f64 {
        self.season().breeding_bonus()
    }
}

/// Constant bonus, for tests and scripted events
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedBonus(pub f64);

impl SeasonalCalendar for FixedBonus {
    fn current_breeding_bonus(&self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_cooldown_table() {
        assert_eq!(SubscriptionTier::Free.cooldown_days(), 365);
        assert_eq!(SubscriptionTier::Premium.cooldown_days(), 120);
        assert_eq!(SubscriptionTier::Eternal.cooldown_days(), 0);
    }

    #[test]
    fn test_cooldown_window() {
        let ledger = BondLedger::new();
        let last = Utc::now();
        assert!(!ledger.is_cooled_down_at(SubscriptionTier::Premium, last, last + Duration::days(119)));
        assert!(ledger.is_cooled_down_at(SubscriptionTier::Premium, last, last + Duration::days(120)));
        assert!(ledger.is_cooled_down_at(SubscriptionTier::Eternal, last, last));
    }

    #[test]
    fn test_levels_from_xp() {
        assert_eq!(KizunaLevel::from_xp(0).value(), 1);
        assert_eq!(KizunaLevel::from_xp(99).value(), 1);
        assert_eq!(KizunaLevel::from_xp(100).value(), 2);
        assert_eq!(KizunaLevel::from_xp(2199).value(), 6);
        assert_eq!(KizunaLevel::from_xp(2200), KizunaLevel::MAX);
        assert_eq!(KizunaLevel::from_xp(u32::MAX).name(), "Reincarnation");
        assert_eq!(KizunaLevel::new(4).map(KizunaLevel::required_xp), Some(600));
        assert!(KizunaLevel::new(0).is_none());
    }

    #[test]
    fn test_level_serde_checks_range() {
        assert!(serde_json::from_str::<KizunaLevel>("0").is_err());
        assert!(serde_json::from_str::<KizunaLevel>("8").is_err());
        let level: KizunaLevel = serde_json::from_str("7").unwrap();
        assert_eq!(level, KizunaLevel::MAX);
        assert_eq!(level.required_xp(), 2200);
        assert_eq!(serde_json::to_string(&level).unwrap(), "7");
    }

    #[test]
    fn test_ledger_gate() {
        let mut ledger = BondLedger::new();
        ledger.set_xp("hana", 2500);
        ledger.set_xp("kuro", 1400);
        assert!(ledger.is_breeding_eligible("hana"));
        assert!(!ledger.is_breeding_eligible("kuro"));
        assert!(!ledger.is_breeding_eligible("nobody"));
        assert_eq!(ledger.add_xp("kuro", 800).value(), 7);
        assert!(ledger.is_breeding_eligible("kuro"));
    }

    #[test]
    fn test_season_for_date() {
        assert_eq!(Season::for_date(date(2026, 1, 5)), Season::Ritto);
        assert_eq!(Season::for_date(date(2026, 1, 20)), Season::Daikan);
        assert_eq!(Season::for_date(date(2026, 2, 3)), Season::Daikan);
        assert_eq!(Season::for_date(date(2026, 2, 4)), Season::Risshun);
        assert_eq!(Season::for_date(date(2026, 7, 7)), Season::Shocho);
        assert_eq!(Season::for_date(date(2026, 10, 19)), Season::Kanro);
        assert_eq!(Season::for_date(date(2026, 12, 31)), Season::Ritto);
    }

    #[test]
    fn test_calendar_bonus() {
        assert_eq!(SeasonCalendar::on(date(2026, 7, 20)).current_breeding_bonus(), 1.5);
        assert_eq!(SeasonCalendar::on(date(2026, 3, 1)).current_breeding_bonus(), 1.0);
        assert_eq!(SeasonCalendar::on(date(2026, 6, 10)).current_breeding_bonus(), 0.0);
        assert_eq!(seasonal_breeding_bonus("shocho"), 1.5);
        assert_eq!(seasonal_breeding_bonus("summer"), 0.0);
    }
}
