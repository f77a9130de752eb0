//! The seven fixed weekday names that key a family's schedule.

use serde::{Deserialize, Serialize};

/// A weekday in a family schedule.
///
/// Serialises to the Spanish display name (`"Lunes"`, `"Miércoles"`,
/// `"Sábado"`, ...), which is also the JSON key used in
/// [`Planning::data`](crate::planning::Planning) and the `dia` column of
/// the change log. Keeping the key an enum means a schedule can never
/// carry a key outside the fixed seven.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Weekday {
  Lunes,
  Martes,
  #[serde(rename = "Miércoles")]
  Miercoles,
  Jueves,
  Viernes,
  #[serde(rename = "Sábado")]
  Sabado,
  Domingo,
}

impl Weekday {
  /// All seven days, Monday first.
  pub const ALL: [Weekday; 7] = [
    Weekday::Lunes,
    Weekday::Martes,
    Weekday::Miercoles,
    Weekday::Jueves,
    Weekday::Viernes,
    Weekday::Sabado,
    Weekday::Domingo,
  ];

  /// The display name, identical to the serde representation.
  pub fn as_str(self) -> &'static str {
    match self {
      Weekday::Lunes => "Lunes",
      Weekday::Martes => "Martes",
      Weekday::Miercoles => "Miércoles",
      Weekday::Jueves => "Jueves",
      Weekday::Viernes => "Viernes",
      Weekday::Sabado => "Sábado",
      Weekday::Domingo => "Domingo",
    }
  }

  /// Parse a display name. Returns `None` for anything outside the fixed
  /// seven — callers decide whether that is a client error or a decode
  /// error.
  pub fn parse(s: &str) -> Option<Weekday> {
    Weekday::ALL.into_iter().find(|d| d.as_str() == s)
  }
}

impl std::fmt::Display for Weekday {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_round_trips_every_display_name() {
    for day in Weekday::ALL {
      assert_eq!(Weekday::parse(day.as_str()), Some(day));
    }
  }

  #[test]
  fn parse_rejects_unknown_names() {
    assert_eq!(Weekday::parse("Funday"), None);
    assert_eq!(Weekday::parse("lunes"), None);
    assert_eq!(Weekday::parse(""), None);
  }

  #[test]
  fn serde_uses_display_names() {
    let json = serde_json::to_string(&Weekday::Miercoles).unwrap();
    assert_eq!(json, "\"Miércoles\"");
    let back: Weekday = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Weekday::Miercoles);
  }
}
