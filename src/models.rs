use serde::{Deserialize, Serialize};

/// Issuing country, as reported by the lookup service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryInfo {
    pub numeric: Option<String>,
    pub alpha2: Option<String>,
    pub name: Option<String>,
    pub emoji: Option<String>,
    pub currency: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Issuing bank
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankInfo {
    pub name: Option<String>,
}

/// Result of one successful BIN lookup.
///
/// `card_number_length` is the service's `number.length` value: the length
/// of a full card number for this prefix, not the length of the BIN itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BinRecord {
    pub card_number_length: Option<u32>,
    pub scheme: Option<String>,
    pub card_type: Option<String>,
    pub brand: Option<String>,
    pub prepaid: Option<bool>,
    pub country: CountryInfo,
    pub bank: BankInfo,
}

// Wire shapes. Every field is optional and absent objects fall back to
// empty ones, so a sparse body never fails to map.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct BinResponse {
    number: Option<NumberResponse>,
    scheme: Option<String>,
    #[serde(rename = "type")]
    card_type: Option<String>,
    brand: Option<String>,
    prepaid: Option<bool>,
    country: Option<CountryResponse>,
    bank: Option<BankResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NumberResponse {
    length: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CountryResponse {
    numeric: Option<NumericCode>,
    alpha2: Option<String>,
    name: Option<String>,
    emoji: Option<String>,
    currency: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// ISO 3166 numeric code; binlist sends a string but some records carry a number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumericCode {
    Text(String),
    Number(serde_json::Number),
}

impl From<NumericCode> for String {
    fn from(code: NumericCode) -> Self {
        match code {
            NumericCode::Text(s) => s,
            NumericCode::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BankResponse {
    name: Option<String>,
}

impl From<CountryResponse> for CountryInfo {
    fn from(c: CountryResponse) -> Self {
        Self {
            numeric: c.numeric.map(String::from),
            alpha2: c.alpha2,
            name: c.name,
            emoji: c.emoji,
            currency: c.currency,
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

impl From<BinResponse> for BinRecord {
    fn from(r: BinResponse) -> Self {
        Self {
            card_number_length: r.number.and_then(|n| n.length),
            scheme: r.scheme,
            card_type: r.card_type,
            brand: r.brand,
            prepaid: r.prepaid,
            country: r.country.map(CountryInfo::from).unwrap_or_default(),
            bank: BankInfo {
                name: r.bank.and_then(|b| b.name),
            },
        }
    }
}

impl BinRecord {
    /// Map a decoded response body into a record
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let response: BinResponse = serde_json::from_value(value)?;
        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_body_maps_every_field() {
        let body = json!({
            "number": {"length": 16, "luhn": true},
            "scheme": "visa",
            "type": "debit",
            "brand": "Visa/Dankort",
            "prepaid": false,
            "country": {
                "numeric": "208",
                "alpha2": "DK",
                "name": "Denmark",
                "emoji": "🇩🇰",
                "currency": "DKK",
                "latitude": 56,
                "longitude": 10
            },
            "bank": {"name": "Jyske Bank"}
        });

        let record = BinRecord::from_json(body).unwrap();
        assert_eq!(record.card_number_length, Some(16));
        assert_eq!(record.scheme.as_deref(), Some("visa"));
        assert_eq!(record.card_type.as_deref(), Some("debit"));
        assert_eq!(record.brand.as_deref(), Some("Visa/Dankort"));
        assert_eq!(record.prepaid, Some(false));
        assert_eq!(record.country.numeric.as_deref(), Some("208"));
        assert_eq!(record.country.alpha2.as_deref(), Some("DK"));
        assert_eq!(record.country.name.as_deref(), Some("Denmark"));
        assert_eq!(record.country.emoji.as_deref(), Some("🇩🇰"));
        assert_eq!(record.country.currency.as_deref(), Some("DKK"));
        assert_eq!(record.country.latitude, Some(56.0));
        assert_eq!(record.country.longitude, Some(10.0));
        assert_eq!(record.bank.name.as_deref(), Some("Jyske Bank"));
    }

    #[test]
    fn test_missing_objects_become_none() {
        let record = BinRecord::from_json(json!({"scheme": "mastercard"})).unwrap();
        assert_eq!(record.scheme.as_deref(), Some("mastercard"));
        assert_eq!(record.card_number_length, None);
        assert_eq!(record.country, CountryInfo::default());
        assert_eq!(record.bank, BankInfo::default());
    }

    #[test]
    fn test_null_values_become_none() {
        let record = BinRecord::from_json(json!({
            "number": null,
            "prepaid": null,
            "country": null,
            "bank": {"name": null}
        }))
        .unwrap();
        assert_eq!(record, BinRecord::default());
    }

    #[test]
    fn test_numeric_code_accepts_number() {
        let record = BinRecord::from_json(json!({
            "country": {"numeric": 208, "alpha2": "DK"}
        }))
        .unwrap();
        assert_eq!(record.country.numeric.as_deref(), Some("208"));
        assert_eq!(record.country.alpha2.as_deref(), Some("DK"));
    }

    #[test]
    fn test_empty_object() {
        let record = BinRecord::from_json(json!({})).unwrap();
        assert_eq!(record, BinRecord::default());
    }
}
