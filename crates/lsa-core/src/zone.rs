//! Campus zones and the ordered marker rules that assign a location to one.

use std::{fmt, str::FromStr};

use crate::error::{Error, ZoneUnresolved};

/// A campus area whose channel is notified about upcoming classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Zone {
  HassArts,
  HassBle,
  Stem,
  LifeSciences,
  Southbank,
  /// Catch-all for known but unserved locations. Resolvable, never notified.
  Unknown,
}

impl Zone {
  /// Zones that receive announcements, in the order a pass visits them.
  pub const NOTIFIABLE: [Zone; 5] = [
    Zone::HassArts,
    Zone::HassBle,
    Zone::Stem,
    Zone::LifeSciences,
    Zone::Southbank,
  ];

  /// Identifier used in configuration and logs (`HASS_Arts`, ...).
  pub fn id(self) -> &'static str {
    match self {
      Zone::HassArts => "HASS_Arts",
      Zone::HassBle => "HASS_BLE",
      Zone::Stem => "STEM",
      Zone::LifeSciences => "Life_Sciences",
      Zone::Southbank => "Southbank",
      Zone::Unknown => "UNKNOWN",
    }
  }

  /// Human label: the identifier with underscores replaced by spaces.
  pub fn display_name(self) -> String { self.id().replace('_', " ") }

  /// Bare environment variable holding this zone's webhook
  /// (`HASS_ARTS`, `LIFE_SCIENCES`, ...).
  pub fn env_key(self) -> String { self.id().to_ascii_uppercase() }

  pub fn is_notifiable(self) -> bool { self != Zone::Unknown }

  fn all() -> [Zone; 6] {
    [
      Zone::HassArts,
      Zone::HassBle,
      Zone::Stem,
      Zone::LifeSciences,
      Zone::Southbank,
      Zone::Unknown,
    ]
  }
}

impl fmt::Display for Zone {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.id())
  }
}

impl FromStr for Zone {
  type Err = Error;

  /// Case-insensitive on the identifier, so `LSA_CHANNELS__STEM` and
  /// `hass_arts` both resolve.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    Zone::all()
      .into_iter()
      .find(|z| z.id().eq_ignore_ascii_case(s))
      .ok_or_else(|| Error::UnknownZone(s.to_string()))
  }
}

// ─── Rules ───────────────────────────────────────────────────────────────────

/// One zone and the location substrings that identify it.
#[derive(Debug, Clone)]
pub struct ZoneRule {
  pub zone:    Zone,
  markers:     Vec<String>,
  /// Lowercased copies of `markers`, compared against lowercased locations.
  folded:      Vec<String>,
}

impl ZoneRule {
  pub fn new<I, S>(zone: Zone, markers: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let markers: Vec<String> = markers.into_iter().map(Into::into).collect();
    let folded = markers.iter().map(|m| m.to_lowercase()).collect();
    Self { zone, markers, folded }
  }

  pub fn markers(&self) -> &[String] { &self.markers }

  fn matches(&self, folded_location: &str) -> bool {
    self
      .folded
      .iter()
      .any(|m| !m.is_empty() && folded_location.contains(m.as_str()))
  }
}

/// An ordered list of zone rules. The first rule with a marker contained in
/// the location wins, so rule order is significant.
#[derive(Debug, Clone)]
pub struct ZoneRules {
  rules: Vec<ZoneRule>,
}

impl ZoneRules {
  pub fn new(rules: Vec<ZoneRule>) -> Self { Self { rules } }

  /// Build rules from `(zone id, markers)` pairs, keeping their order.
  pub fn from_pairs<I>(pairs: I) -> crate::Result<Self>
  where
    I: IntoIterator<Item = (String, Vec<String>)>,
  {
    let rules = pairs
      .into_iter()
      .map(|(id, markers)| Ok(ZoneRule::new(id.parse()?, markers)))
      .collect::<crate::Result<Vec<_>>>()?;
    Ok(Self::new(rules))
  }

  pub fn rules(&self) -> &[ZoneRule] { &self.rules }

  /// Find the zone a location belongs to.
  pub fn resolve(&self, location: &str) -> Result<Zone, ZoneUnresolved> {
    let folded = location.to_lowercase();
    self
      .rules
      .iter()
      .find(|rule| rule.matches(&folded))
      .map(|rule| rule.zone)
      .ok_or_else(|| ZoneUnresolved {
        location: location.to_string(),
      })
  }
}

impl Default for ZoneRules {
  /// The Parkville and Southbank buildings served by each zone.
  fn default() -> Self {
    Self::new(vec![
      ZoneRule::new(Zone::HassArts, [
        "Arts West",
        "Old Arts",
        "Building 125",
        "Food and Nutrition Building",
      ]),
      ZoneRule::new(Zone::HassBle, [
        "FBE",
        "The Spot",
        "Law",
        "Kwong Lee Dow",
        "100 Leicester St",
      ]),
      ZoneRule::new(Zone::Stem, [
        "Chemistry",
        "Glyn Davis",
        "Peter Hall",
        "Engineering",
        "Metallurgy",
        "Redmond Barry",
        "Melbourne Connect",
        "McCoy",
      ]),
      ZoneRule::new(Zone::LifeSciences, [
        "Alan Gilbert",
        "780 Elizabeth St",
        "780 Elisabeth St",
      ]),
      ZoneRule::new(Zone::Southbank, ["Southbank"]),
      ZoneRule::new(Zone::Unknown, ["Swinburne"]),
    ])
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolves_default_markers() {
    let rules = ZoneRules::default();
    assert_eq!(rules.resolve("Arts West-North Wing-353"), Ok(Zone::HassArts));
    assert_eq!(rules.resolve("The Spot-Room 2.019"), Ok(Zone::HassBle));
    assert_eq!(rules.resolve("Peter Hall-G03"), Ok(Zone::Stem));
    assert_eq!(rules.resolve("Alan Gilbert-101"), Ok(Zone::LifeSciences));
    assert_eq!(rules.resolve("Southbank-Elisabeth Murdoch"), Ok(Zone::Southbank));
  }

  #[test]
  fn matching_ignores_case() {
    let rules = ZoneRules::default();
    assert_eq!(rules.resolve("ARTS WEST-153"), Ok(Zone::HassArts));
    assert_eq!(rules.resolve("melbourne connect-5201"), Ok(Zone::Stem));
  }

  #[test]
  fn catch_all_zone_resolves() {
    let rules = ZoneRules::default();
    let zone = rules.resolve("Swinburne Hawthorn").unwrap();
    assert_eq!(zone, Zone::Unknown);
    assert!(!zone.is_notifiable());
  }

  #[test]
  fn unmatched_location_is_unresolved() {
    let err = ZoneRules::default().resolve("Online").unwrap_err();
    assert_eq!(err.location, "Online");
  }

  #[test]
  fn first_configured_zone_wins() {
    let location = "Law Building Engineering Annex";
    let law_first = ZoneRules::new(vec![
      ZoneRule::new(Zone::HassBle, ["Law"]),
      ZoneRule::new(Zone::Stem, ["Engineering"]),
    ]);
    let eng_first = ZoneRules::new(vec![
      ZoneRule::new(Zone::Stem, ["Engineering"]),
      ZoneRule::new(Zone::HassBle, ["Law"]),
    ]);
    for _ in 0..3 {
      assert_eq!(law_first.resolve(location), Ok(Zone::HassBle));
      assert_eq!(eng_first.resolve(location), Ok(Zone::Stem));
    }
  }

  #[test]
  fn empty_marker_never_matches() {
    let rules = ZoneRules::new(vec![ZoneRule::new(Zone::Stem, [""])]);
    assert!(rules.resolve("anything").is_err());
  }

  #[test]
  fn rules_from_config_pairs() {
    let rules = ZoneRules::from_pairs([
      ("southbank".to_string(), vec!["Conservatorium".to_string()]),
      ("STEM".to_string(), vec!["Lab".to_string()]),
    ])
    .unwrap();
    assert_eq!(rules.rules()[0].zone, Zone::Southbank);
    assert_eq!(rules.rules()[0].markers(), ["Conservatorium".to_string()]);
    assert_eq!(rules.resolve("Ian Potter Conservatorium Lab"), Ok(Zone::Southbank));

    let err = ZoneRules::from_pairs([("Hawthorn".to_string(), vec![])]);
    assert!(matches!(err, Err(Error::UnknownZone(id)) if id == "Hawthorn"));
  }

  #[test]
  fn zone_identifiers() {
    assert_eq!("Life_Sciences".parse::<Zone>().unwrap(), Zone::LifeSciences);
    assert_eq!("hass_ble".parse::<Zone>().unwrap(), Zone::HassBle);
    assert_eq!(Zone::LifeSciences.display_name(), "Life Sciences");
    assert_eq!(Zone::HassArts.env_key(), "HASS_ARTS");
    assert_eq!(Zone::Stem.to_string(), "STEM");
  }
}
