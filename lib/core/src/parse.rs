//! Field Parser
//!
//! Each raw string field of a listing has a dedicated parser. The `try_*`
//! functions report *why* a field could not be read; the plain functions
//! absorb that, log it, and hand back an empty / null value so one bad field
//! never takes the rest of the record (or the catalog build) down with it.

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::CharIndices;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Building type given to the `Land` configuration when the blob leaves it blank
pub const LAND_LABEL: &str = "Land";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseFailure {
    #[error("facility list has no quoted entries: {0:?}")]
    Facilities(String),

    #[error("configuration details are not a JSON object: {0}")]
    ConfigurationBlob(String),

    #[error("area is not `<n>` or `<n>-<m>`: {0:?}")]
    Area(String),

    #[error("price range is not `<low>-<high>`: {0:?}")]
    Price(String),

    #[error("landmark distances are not a literal mapping at byte {offset}: {reason}")]
    LandmarkBlob { offset: usize, reason: String },

    #[error("distance has no recognizable unit: {0:?}")]
    DistanceUnit(String),

    #[error("distance is not a number: {0:?}")]
    DistanceValue(String),
}

/// Parsed area / price information for one configuration label.
/// Low and high are always both present or both absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDetail {
    pub building_type: Option<String>,
    pub area_low: Option<f64>,
    pub area_high: Option<f64>,
    /// Crore
    pub price_low: Option<f64>,
    /// Crore
    pub price_high: Option<f64>,
}

/// Landmark name → distance, in the order the landmarks were listed.
///
/// Entries whose distance could not be read keep their name (with no value):
/// the landmark still exists, this listing just has no usable distance to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkDistances {
    entries: Vec<(String, Option<f64>)>,
}

impl LandmarkDistances {
    fn insert(&mut self, name: String, meters: Option<f64>) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = meters,
            None => self.entries.push((name, meters)),
        }
    }

    /// Distance in meters, if this landmark was listed with a readable distance
    pub fn get(&self, landmark: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == landmark)
            .and_then(|(_, m)| *m)
    }

    /// Every listed landmark name, readable distance or not
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.entries.iter().map(|(n, m)| (n.as_str(), *m))
    }

    /// Only the landmarks with a readable distance
    pub fn known(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .filter_map(|(n, m)| m.map(|m| (n.as_str(), m)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn quoted_item_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"'(.*?)'").expect("static regex"))
}

// ---------------------------------------------------------------------------
// Facilities
// ---------------------------------------------------------------------------

/// Every substring between a pair of single quotes, in order.
pub fn try_parse_facilities(raw: &str) -> Result<Vec<String>, ParseFailure> {
    let items: Vec<String> = quoted_item_regex()
        .captures_iter(raw)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect();

    let bare = raw.trim();
    if items.is_empty() && !(bare.is_empty() || bare == "[]") {
        return Err(ParseFailure::Facilities(raw.to_string()));
    }
    Ok(items)
}

pub fn parse_facilities(raw: &str) -> Vec<String> {
    try_parse_facilities(raw).unwrap_or_else(|e| {
        debug!("{}", e);
        Vec::new()
    })
}

// ---------------------------------------------------------------------------
// Configuration details
// ---------------------------------------------------------------------------

/// `f64` parse that also rejects `nan` and `inf`; those are missing values here.
fn finite_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `"1,200 sq.ft."` → `(1200, 1200)`, `"850 - 1,100 sq.ft."` → `(850, 1100)`
pub fn try_parse_area(raw: &str) -> Result<(f64, f64), ParseFailure> {
    let fail = || ParseFailure::Area(raw.to_string());
    let parse_part = |part: &str| -> Result<f64, ParseFailure> {
        finite_number(part.replace(',', "").replace(" sq.ft.", "").trim()).ok_or_else(fail)
    };

    let parts: Vec<&str> = raw.split('-').collect();
    match parts.as_slice() {
        [single] => {
            let v = parse_part(single)?;
            Ok((v, v))
        }
        [low, high] => Ok((parse_part(low)?, parse_part(high)?)),
        _ => Err(fail()),
    }
}

/// `"₹45 L - ₹1.2 Cr"` → `(0.45, 1.2)`; every price is normalized to crore.
pub fn try_parse_price_range(raw: &str) -> Result<(f64, f64), ParseFailure> {
    let fail = || ParseFailure::Price(raw.to_string());
    let parse_part = |part: &str| -> Result<f64, ParseFailure> {
        let cleaned = part
            .replace('₹', "")
            .replace(" Cr", "")
            .replace(" L", "")
            .replace(',', "");
        let value = finite_number(cleaned.trim()).ok_or_else(fail)?;
        // lakh → crore
        Ok(if part.contains('L') { value / 100.0 } else { value })
    };

    let parts: Vec<&str> = raw.split('-').collect();
    match parts.as_slice() {
        [low, high] => Ok((parse_part(low)?, parse_part(high)?)),
        _ => Err(fail()),
    }
}

fn detail_from_json(label: &str, detail: &Value) -> ConfigurationDetail {
    let field = |key: &str| detail.get(key).and_then(Value::as_str);

    let mut building_type = field("building_type").map(str::to_string);
    if label == LAND_LABEL && building_type.as_deref() == Some("") {
        building_type = Some(LAND_LABEL.to_string());
    }

    let (area_low, area_high) = match try_parse_area(field("area").unwrap_or("")) {
        Ok((lo, hi)) => (Some(lo), Some(hi)),
        Err(e) => {
            debug!(label, "{}", e);
            (None, None)
        }
    };

    let (price_low, price_high) = match try_parse_price_range(field("price-range").unwrap_or("")) {
        Ok((lo, hi)) => (Some(lo), Some(hi)),
        Err(e) => {
            debug!(label, "{}", e);
            (None, None)
        }
    };

    ConfigurationDetail {
        building_type,
        area_low,
        area_high,
        price_low,
        price_high,
    }
}

/// Parse the per-configuration blob. The blob is JSON, except that the
/// dataset often writes it with single quotes, so a second attempt is made
/// with every `'` turned into `"`.
///
/// Only a blob that is not an object at all fails; a bad area or price inside
/// one label nulls that sub-field and nothing else.
pub fn try_parse_configuration_details(
    raw: &str,
) -> Result<BTreeMap<String, ConfigurationDetail>, ParseFailure> {
    let value: Value = serde_json::from_str(raw)
        .or_else(|_| serde_json::from_str(&raw.replace('\'', "\"")))
        .map_err(|e: serde_json::Error| ParseFailure::ConfigurationBlob(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| ParseFailure::ConfigurationBlob(format!("expected object, got {}", value)))?;

    Ok(object
        .iter()
        .map(|(label, detail)| (label.clone(), detail_from_json(label, detail)))
        .collect())
}

pub fn parse_configuration_details(raw: &str) -> BTreeMap<String, ConfigurationDetail> {
    try_parse_configuration_details(raw).unwrap_or_else(|e| {
        debug!("{}", e);
        BTreeMap::new()
    })
}

// ---------------------------------------------------------------------------
// Landmark distances
// ---------------------------------------------------------------------------

/// `"3 Km"` → 3000, `"450 Meter"` → 450. The number is the first
/// whitespace-separated token.
pub fn distance_to_meters(raw: &str) -> Result<f64, ParseFailure> {
    let scale = if raw.contains("Km") || raw.contains("KM") {
        1000.0
    } else if raw.contains("Meter") || raw.contains("meter") {
        1.0
    } else {
        return Err(ParseFailure::DistanceUnit(raw.to_string()));
    };

    raw.split_whitespace()
        .next()
        .and_then(finite_number)
        .map(|v| v * scale)
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseFailure::DistanceValue(raw.to_string()))
}

/// Reader for `{'name': 'value', "other": "value"}` literals
struct LiteralReader<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> LiteralReader<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
        }
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map(|&(i, _)| i).unwrap_or(self.src.len())
    }

    fn error(&mut self, reason: impl Into<String>) -> ParseFailure {
        ParseFailure::LandmarkBlob {
            offset: self.offset(),
            reason: reason.into(),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn expect(&mut self, want: char) -> Result<(), ParseFailure> {
        self.skip_ws();
        match self.chars.peek() {
            Some(&(_, c)) if c == want => {
                self.chars.next();
                Ok(())
            }
            _ => Err(self.error(format!("expected '{}'", want))),
        }
    }

    fn peek_is(&mut self, want: char) -> bool {
        self.skip_ws();
        matches!(self.chars.peek(), Some(&(_, c)) if c == want)
    }

    fn string(&mut self) -> Result<String, ParseFailure> {
        self.skip_ws();
        let quote = match self.chars.peek() {
            Some(&(_, q)) if q == '\'' || q == '"' => q,
            _ => return Err(self.error("expected a quoted string")),
        };
        self.chars.next();

        let mut out = String::new();
        loop {
            match self.chars.next() {
                None => return Err(self.error("unterminated string")),
                Some((_, c)) if c == quote => return Ok(out),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, c)) => out.push(c),
                    None => return Err(self.error("unterminated escape")),
                },
                Some((_, c)) => out.push(c),
            }
        }
    }

    /// A value is normally a string, but bare scalars (`12`, `None`) are
    /// still legal literals. They carry no unit, so they are kept as text.
    fn value(&mut self) -> Result<String, ParseFailure> {
        self.skip_ws();
        match self.chars.peek() {
            Some(&(_, '\'')) | Some(&(_, '"')) => self.string(),
            _ => {
                let mut out = String::new();
                while let Some(&(_, c)) = self.chars.peek() {
                    if c == ',' || c == '}' {
                        break;
                    }
                    out.push(c);
                    self.chars.next();
                }
                let out = out.trim().to_string();
                if out.is_empty() {
                    Err(self.error("expected a value"))
                } else {
                    Ok(out)
                }
            }
        }
    }

    fn mapping(mut self) -> Result<Vec<(String, String)>, ParseFailure> {
        self.expect('{')?;
        let mut entries = Vec::new();
        loop {
            if self.peek_is('}') {
                self.chars.next();
                break;
            }
            let key = self.string()?;
            self.expect(':')?;
            let value = self.value()?;
            entries.push((key, value));

            if self.peek_is(',') {
                self.chars.next();
            } else {
                self.expect('}')?;
                break;
            }
        }
        self.skip_ws();
        if self.chars.peek().is_some() {
            return Err(self.error("trailing characters after mapping"));
        }
        Ok(entries)
    }
}

/// Parse the landmark blob. Fails only when the blob is not a mapping; an
/// individual distance without a recognizable unit is kept as a name with no
/// value.
pub fn try_parse_landmark_distances(raw: &str) -> Result<LandmarkDistances, ParseFailure> {
    let entries = LiteralReader::new(raw).mapping()?;

    let mut out = LandmarkDistances::default();
    for (name, distance) in entries {
        let meters = match distance_to_meters(&distance) {
            Ok(m) => Some(m),
            Err(e) => {
                debug!(landmark = %name, "{}", e);
                None
            }
        };
        out.insert(name, meters);
    }
    Ok(out)
}

pub fn parse_landmark_distances(raw: &str) -> LandmarkDistances {
    try_parse_landmark_distances(raw).unwrap_or_else(|e| {
        debug!("{}", e);
        LandmarkDistances::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_facilities_quoted_items() {
        let got = parse_facilities("['Swimming Pool', 'Gym', 'Club House']");
        assert_eq!(got, vec!["Swimming Pool", "Gym", "Club House"]);
    }

    #[test]
    fn test_facilities_malformed_is_empty() {
        assert!(parse_facilities("Swimming Pool, Gym").is_empty());
        assert!(try_parse_facilities("Swimming Pool, Gym").is_err());
        assert!(try_parse_facilities("[]").unwrap().is_empty());
        assert!(try_parse_facilities("").unwrap().is_empty());
    }

    #[test]
    fn test_price_lakh_to_crore() {
        let (lo, hi) = try_parse_price_range("₹45 L - ₹1.2 Cr").unwrap();
        assert!(approx(lo, 0.45));
        assert!(approx(hi, 1.2));
    }

    #[test]
    fn test_price_both_crore() {
        let (lo, hi) = try_parse_price_range("₹2.1 Cr - ₹3 Cr").unwrap();
        assert!(approx(lo, 2.1));
        assert!(approx(hi, 3.0));
    }

    #[test]
    fn test_price_single_value_rejected() {
        assert!(matches!(
            try_parse_price_range("₹1.2 Cr"),
            Err(ParseFailure::Price(_))
        ));
        assert!(try_parse_price_range("Price on Request").is_err());
    }

    #[test]
    fn test_area_single_and_range() {
        assert_eq!(try_parse_area("1,200 sq.ft.").unwrap(), (1200.0, 1200.0));
        assert_eq!(try_parse_area("850 - 1,100 sq.ft.").unwrap(), (850.0, 1100.0));
        assert!(try_parse_area("").is_err());
        assert!(try_parse_area("1-2-3").is_err());
    }

    #[test]
    fn test_configuration_details_single_quoted() {
        let raw = "{'2 BHK': {'building_type': 'Apartment', 'area': '1,050 sq.ft.', \
                   'price-range': '₹80 L - ₹1.1 Cr'}, \
                   'Land': {'building_type': '', 'area': '2,000 - 3,000 sq.ft.', 'price-range': 'N/A'}}";
        let details = parse_configuration_details(raw);
        assert_eq!(details.len(), 2);

        let two = &details["2 BHK"];
        assert_eq!(two.building_type.as_deref(), Some("Apartment"));
        assert_eq!(two.area_low, Some(1050.0));
        assert_eq!(two.area_high, Some(1050.0));
        assert!(approx(two.price_low.unwrap(), 0.8));
        assert!(approx(two.price_high.unwrap(), 1.1));

        let land = &details["Land"];
        assert_eq!(land.building_type.as_deref(), Some("Land"));
        assert_eq!(land.area_low, Some(2000.0));
        assert_eq!(land.price_low, None);
        assert_eq!(land.price_high, None);
    }

    #[test]
    fn test_configuration_bad_label_does_not_spoil_others() {
        let raw = r#"{"1 BHK": {"area": "garbage"}, "3 BHK": {"building_type": "Villa", "area": "2400", "price-range": "₹3 Cr - ₹4 Cr"}}"#;
        let details = parse_configuration_details(raw);
        assert_eq!(details["1 BHK"], ConfigurationDetail::default());
        assert_eq!(details["3 BHK"].area_high, Some(2400.0));
        assert_eq!(details["3 BHK"].price_high, Some(4.0));
    }

    #[test]
    fn test_configuration_not_an_object() {
        assert!(parse_configuration_details("not json").is_empty());
        assert!(matches!(
            try_parse_configuration_details("[1, 2]"),
            Err(ParseFailure::ConfigurationBlob(_))
        ));
    }

    #[test]
    fn test_area_rejects_non_finite() {
        assert!(matches!(try_parse_area("nan sq.ft."), Err(ParseFailure::Area(_))));
        assert!(try_parse_area("100 - inf").is_err());
        assert!(try_parse_area("NaN").is_err());
    }

    #[test]
    fn test_price_rejects_non_finite() {
        assert!(matches!(try_parse_price_range("₹NaN L - ₹1 Cr"), Err(ParseFailure::Price(_))));
        assert!(try_parse_price_range("₹1 Cr - ₹inf Cr").is_err());
    }

    #[test]
    fn test_distance_rejects_non_finite() {
        assert!(matches!(distance_to_meters("NaN Km"), Err(ParseFailure::DistanceValue(_))));
        assert!(matches!(distance_to_meters("inf meter"), Err(ParseFailure::DistanceValue(_))));
        assert!(matches!(distance_to_meters("1e308 Km"), Err(ParseFailure::DistanceValue(_))));

        let d = parse_landmark_distances("{'Cyber City': 'NaN Km', 'Airport': '2 Km'}");
        assert_eq!(d.get("Cyber City"), None);
        assert_eq!(d.names().count(), 2);
    }

    #[test]
    fn test_distance_units() {
        assert_eq!(distance_to_meters("3 Km").unwrap(), 3000.0);
        assert_eq!(distance_to_meters("1.5 KM").unwrap(), 1500.0);
        assert_eq!(distance_to_meters("450 Meter").unwrap(), 450.0);
        assert_eq!(distance_to_meters("90 meters").unwrap(), 90.0);
        assert!(matches!(distance_to_meters("5 mins"), Err(ParseFailure::DistanceUnit(_))));
        assert!(matches!(distance_to_meters("near Km"), Err(ParseFailure::DistanceValue(_))));
    }

    #[test]
    fn test_landmark_literal_mapping() {
        let raw = r#"{'Cyber City': '4.5 Km', "Huda City Centre": '800 Meter', 'Golf Course': '10 mins', 'It\'s Mall': '2 KM'}"#;
        let d = parse_landmark_distances(raw);
        assert_eq!(d.len(), 4);
        assert_eq!(d.get("Cyber City"), Some(4500.0));
        assert_eq!(d.get("Huda City Centre"), Some(800.0));
        assert_eq!(d.get("Golf Course"), None);
        assert_eq!(d.get("It's Mall"), Some(2000.0));
        assert_eq!(
            d.names().collect::<Vec<_>>(),
            vec!["Cyber City", "Huda City Centre", "Golf Course", "It's Mall"]
        );
        assert_eq!(d.known().count(), 3);
    }

    #[test]
    fn test_landmark_blob_malformed() {
        assert!(parse_landmark_distances("Cyber City: 4 Km").is_empty());
        assert!(matches!(
            try_parse_landmark_distances("{'a': '1 Km'"),
            Err(ParseFailure::LandmarkBlob { .. })
        ));
        assert!(try_parse_landmark_distances("{}").unwrap().is_empty());
        assert_eq!(
            try_parse_landmark_distances("{'a': '1 Km',}").unwrap().get("a"),
            Some(1000.0)
        );
    }
}
