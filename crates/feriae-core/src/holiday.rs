//! Public holiday record model.
//!
//! A [`PublicHoliday`] is one stored record. Records are unique on their
//! natural key `(country, date, local_name)`; the store assigns `id`.

use std::fmt;

use chrono::NaiveDate;
use isocountry::CountryCode;
use serde::{Deserialize, Serialize};

/// A stored public holiday record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// Store-assigned identifier (primary key).
    pub id: u64,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    /// English name of the holiday.
    pub name: String,
    /// Name of the holiday in the local language.
    pub local_name: String,
    /// Calendar date of the holiday.
    pub date: NaiveDate,
}

impl PublicHoliday {
    /// Field names in declaration order. The first one is the primary key.
    pub const FIELDS: [&'static str; 5] = ["id", "country", "name", "local_name", "date"];

    /// Natural key of this record.
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey {
            country: self.country.clone(),
            date: self.date,
            local_name: self.local_name.clone(),
        }
    }

    /// Full country name, or the stored code if it is not ISO 3166-1 alpha-2.
    pub fn country_name(&self) -> &str {
        CountryCode::for_alpha2(&self.country).map_or(self.country.as_str(), |c| c.name())
    }
}

impl fmt::Display for PublicHoliday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} | {}] {} ({})",
            self.country_name(),
            self.date,
            self.name,
            self.local_name
        )
    }
}

/// A holiday that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHoliday {
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    /// English name of the holiday.
    pub name: String,
    /// Name of the holiday in the local language.
    pub local_name: String,
    /// Calendar date of the holiday.
    pub date: NaiveDate,
}

impl NewHoliday {
    /// Natural key of this record.
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey {
            country: self.country.clone(),
            date: self.date,
            local_name: self.local_name.clone(),
        }
    }

    pub(crate) fn into_record(self, id: u64) -> PublicHoliday {
        PublicHoliday {
            id,
            country: self.country,
            name: self.name,
            local_name: self.local_name,
            date: self.date,
        }
    }
}

/// Uniqueness key for holiday records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NaturalKey {
    /// Country code.
    pub country: String,
    /// Holiday date.
    pub date: NaiveDate,
    /// Local name.
    pub local_name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn christmas() -> PublicHoliday {
        PublicHoliday {
            id: 1,
            country: "IT".to_string(),
            name: "Christmas".to_string(),
            local_name: "Natale".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 12, 25).unwrap(),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            christmas().to_string(),
            "[Italy | 2023-12-25] Christmas (Natale)"
        );
    }

    #[test]
    fn test_country_name_falls_back_to_code() {
        let mut holiday = christmas();
        holiday.country = "XK".to_string();
        assert_eq!(holiday.country_name(), "XK");
        assert!(holiday.to_string().starts_with("[XK | 2023-12-25]"));
    }

    #[test]
    fn test_fields_start_with_primary_key() {
        assert_eq!(PublicHoliday::FIELDS[0], "id");
        assert_eq!(PublicHoliday::FIELDS.len(), 5);
    }

    #[test]
    fn test_serialization_uses_iso_date() {
        let json = serde_json::to_value(christmas()).unwrap();
        assert_eq!(json["date"], "2023-12-25");
        assert_eq!(json["local_name"], "Natale");
        assert_eq!(json["id"], 1);
    }

    #[test]
    fn test_natural_key_ignores_id_and_name() {
        let a = christmas();
        let mut b = christmas();
        b.id = 42;
        b.name = "Xmas".to_string();
        assert_eq!(a.natural_key(), b.natural_key());
    }

    #[test]
    fn test_new_holiday_key_matches_record_key() {
        let new = NewHoliday {
            country: "IT".to_string(),
            name: "Christmas".to_string(),
            local_name: "Natale".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 12, 25).unwrap(),
        };
        assert_eq!(new.natural_key(), christmas().natural_key());
        assert_eq!(new.into_record(1), christmas());
    }
}
