//! The month key and the monthly totals mapping stored on each category.

use std::{borrow::Borrow, collections::BTreeMap, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::Error;

/// A calendar month in the format "YYYY-MM", e.g. "2024-01".
///
/// Keys sort chronologically for four digit years.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey(String);

impl MonthKey {
    /// Parse a month key.
    ///
    /// # Errors
    /// Returns an [Error::InvalidMonthKey] if `key` is not a four digit year
    /// and a two digit month between 01 and 12 separated by a hyphen.
    pub fn new(key: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidMonthKey(key.to_owned());

        let (year, month) = key.split_once('-').ok_or_else(invalid)?;

        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let month: u8 = month.parse().map_err(|_| invalid())?;
        Month::try_from(month).map_err(|_| invalid())?;

        Ok(Self(key.to_owned()))
    }

    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self(format!("{:04}-{:02}", date.year(), u8::from(date.month())))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MonthKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MonthKey::new(&value)
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.0
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MonthKey::new(s)
    }
}

// Ord on MonthKey is the derived Ord on the inner string, so map lookups by
// &str agree with lookups by MonthKey.
impl Borrow<str> for MonthKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The sum of expense amounts per month.
///
/// Stored on each category as a JSON object, e.g. `{"2024-01": 100.0}`.
/// Use [MonthlyStats::encode] and [MonthlyStats::decode] to convert to and
/// from the stored text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlyStats(BTreeMap<MonthKey, f64>);

impl MonthlyStats {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// The total for `month`, if the month has an entry.
    pub fn get(&self, month: &str) -> Option<f64> {
        self.0.get(month).copied()
    }

    /// Add `amount` to the total for `month`, starting from zero if the month
    /// has no entry yet.
    ///
    /// `amount` may be negative. An entry that returns to zero is kept.
    pub fn add(&mut self, month: MonthKey, amount: f64) {
        *self.0.entry(month).or_insert(0.0) += amount;
    }

    /// Iterate over the months and their totals in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (&MonthKey, &f64)> {
        self.0.iter()
    }

    /// The number of months with an entry.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode the mapping as a JSON object for storage.
    ///
    /// # Errors
    /// Returns an [Error::NonFiniteMonthlyTotal] if a total is NaN or
    /// infinite, since JSON cannot represent it and the stored text would no
    /// longer decode.
    pub fn encode(&self) -> Result<String, Error> {
        if let Some((month, _)) = self.0.iter().find(|(_, total)| !total.is_finite()) {
            return Err(Error::NonFiniteMonthlyTotal(month.to_string()));
        }

        serde_json::to_string(&self.0)
            .map_err(|error| Error::JSONSerializationError(error.to_string()))
    }

    /// Decode stored monthly stats.
    ///
    /// `None` and empty text decode to an empty mapping.
    ///
    /// # Errors
    /// Returns an [Error::MalformedMonthlyStats] if `text` is not a JSON object
    /// mapping valid month keys to numbers.
    pub fn decode(text: Option<&str>) -> Result<Self, Error> {
        match text {
            None => Ok(Self::new()),
            Some(text) if text.trim().is_empty() => Ok(Self::new()),
            Some(text) => serde_json::from_str(text)
                .map_err(|error| Error::MalformedMonthlyStats(error.to_string())),
        }
    }
}

impl FromIterator<(MonthKey, f64)> for MonthlyStats {
    fn from_iter<I: IntoIterator<Item = (MonthKey, f64)>>(iter: I) -> Self {
        let mut stats = Self::new();

        for (month, amount) in iter {
            stats.add(month, amount);
        }

        stats
    }
}

#[cfg(test)]
mod month_key_tests {
    use time::macros::date;

    use crate::{Error, stats::MonthKey};

    #[test]
    fn from_date_truncates_to_month() {
        let key = MonthKey::from_date(date!(2024 - 01 - 31));

        assert_eq!(key.as_str(), "2024-01");
    }

    #[test]
    fn from_date_pads_month() {
        let key = MonthKey::from_date(date!(999 - 09 - 01));

        assert_eq!(key.as_str(), "0999-09");
    }

    #[test]
    fn new_accepts_valid_key() {
        assert_eq!(
            MonthKey::new("2024-12"),
            Ok(MonthKey::from_date(date!(2024 - 12 - 25)))
        );
    }

    #[test]
    fn new_rejects_invalid_keys() {
        for key in ["", "2024", "2024-1", "2024-13", "2024-00", "24-01", "2024-01-01", "abcd-ef"] {
            assert_eq!(
                MonthKey::new(key),
                Err(Error::InvalidMonthKey(key.to_owned())),
                "want \"{key}\" to be rejected"
            );
        }
    }
}
