//! Physical attribute layout types.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::codec::DecodingError;

/// Partition key attribute name.
pub const ATTR_PK: &str = "PK";
/// Sort key attribute name, reused as the overloaded GSI's partition key.
pub const ATTR_SK_GSI: &str = "SK_GSI";
/// Local secondary index sort key attribute name.
pub const ATTR_LSI: &str = "LSI";
/// Overloaded GSI sort key attribute name.
pub const ATTR_GSI_SK: &str = "GSI_SK";

/// The table primary key addressing a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    pub pk: String,
    pub sk_gsi: String,
}

/// The four key columns every item shares. `LSI` and `GSI_SK` are
/// entity-specific and may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyAttrs {
    pub pk: String,
    pub sk_gsi: String,
    pub lsi: Option<String>,
    pub gsi_sk: Option<String>,
}

/// A fully encoded item: key columns plus passthrough attributes.
///
/// Passthrough attributes are domain fields not folded into any key; they
/// are carried as-is, keyed by their physical attribute name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhysicalItem {
    pub keys: KeyAttrs,
    pub rest: BTreeMap<String, Value>,
}

impl PhysicalItem {
    /// Creates an item with the given key columns and no passthrough
    /// attributes.
    pub fn new(keys: KeyAttrs) -> Self {
        Self {
            keys,
            rest: BTreeMap::new(),
        }
    }

    /// The primary key addressing this item.
    pub fn primary_key(&self) -> PrimaryKey {
        PrimaryKey {
            pk: self.keys.pk.clone(),
            sk_gsi: self.keys.sk_gsi.clone(),
        }
    }

    /// Sets a passthrough attribute.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.rest.insert(name.into(), value.into());
    }

    /// Gets a required string attribute.
    pub fn str_attr(&self, attribute: &'static str) -> Result<&str, DecodingError> {
        self.required(attribute)?
            .as_str()
            .ok_or_else(|| malformed(attribute, "expected a string"))
    }

    /// Gets an optional string attribute. Missing is `None`; present but
    /// non-string is an error.
    pub fn opt_str_attr(&self, attribute: &'static str) -> Result<Option<&str>, DecodingError> {
        match self.rest.get(attribute) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| malformed(attribute, "expected a string")),
        }
    }

    /// Gets a required numeric attribute as `f64`.
    pub fn f64_attr(&self, attribute: &'static str) -> Result<f64, DecodingError> {
        self.required(attribute)?
            .as_f64()
            .ok_or_else(|| malformed(attribute, "expected a number"))
    }

    /// Gets a required numeric attribute as `u32`.
    pub fn u32_attr(&self, attribute: &'static str) -> Result<u32, DecodingError> {
        self.required(attribute)?
            .as_u64()
            .and_then(|value| u32::try_from(value).ok())
            .ok_or_else(|| malformed(attribute, "expected an unsigned 32-bit number"))
    }

    /// Gets a required numeric attribute as `u8`.
    pub fn u8_attr(&self, attribute: &'static str) -> Result<u8, DecodingError> {
        self.required(attribute)?
            .as_u64()
            .and_then(|value| u8::try_from(value).ok())
            .ok_or_else(|| malformed(attribute, "expected an unsigned 8-bit number"))
    }

    /// Gets a required date attribute (`YYYY-MM-DD`).
    pub fn date_attr(&self, attribute: &'static str) -> Result<NaiveDate, DecodingError> {
        parse_date(self.str_attr(attribute)?)
            .map_err(|reason| malformed(attribute, &reason))
    }

    /// Gets a required datetime attribute (RFC 3339).
    pub fn datetime_attr(&self, attribute: &'static str) -> Result<DateTime<Utc>, DecodingError> {
        parse_datetime(self.str_attr(attribute)?)
            .map_err(|reason| malformed(attribute, &reason))
    }

    /// Gets an optional datetime attribute (RFC 3339). Missing is `None`;
    /// present but malformed is an error.
    pub fn opt_datetime_attr(
        &self,
        attribute: &'static str,
    ) -> Result<Option<DateTime<Utc>>, DecodingError> {
        match self.opt_str_attr(attribute)? {
            None => Ok(None),
            Some(raw) => parse_datetime(raw)
                .map(Some)
                .map_err(|reason| malformed(attribute, &reason)),
        }
    }

    fn required(&self, attribute: &'static str) -> Result<&Value, DecodingError> {
        self.rest
            .get(attribute)
            .ok_or(DecodingError::MissingAttribute { attribute })
    }
}

/// Formats a date the way sort keys and passthrough attributes store it.
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|err| err.to_string())
}

fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| err.to_string())
}

fn malformed(attribute: &'static str, reason: &str) -> DecodingError {
    DecodingError::MalformedAttribute {
        attribute: attribute.to_string(),
        reason: reason.to_string(),
    }
}
