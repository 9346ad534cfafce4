use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchoolId(pub u64);

impl fmt::Display for SchoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolRecord {
    pub id: SchoolId,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl SchoolRecord {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// 驗證通過、等待寫入的學校資料 (name/address 已 trim)
#[derive(Debug, Clone, PartialEq)]
pub struct NewSchool {
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
}

impl NewSchool {
    pub fn into_record(self, id: SchoolId) -> SchoolRecord {
        SchoolRecord {
            id,
            name: self.name,
            address: self.address,
            latitude: self.coordinates.latitude,
            longitude: self.coordinates.longitude,
        }
    }
}

/// Response-only: flattened numbers do not deserialize under `arbitrary_precision`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSchool {
    #[serde(flatten)]
    pub school: SchoolRecord,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityListing {
    pub reference: Coordinates,
    pub total: usize,
    pub schools: Vec<RankedSchool>,
}

/// Raw create-school body. Fields keep whatever JSON shape the client sent;
/// the validator decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchoolSubmission {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub address: Option<Value>,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
}

impl SchoolSubmission {
    /// 從 JSON 字串解析請求內容
    pub fn from_json_str(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        Ok(Self::from_value(value))
    }

    /// 非物件的 JSON 視為所有欄位皆缺
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut obj) => Self {
                name: obj.remove("name"),
                address: obj.remove("address"),
                latitude: obj.remove("latitude"),
                longitude: obj.remove("longitude"),
            },
            _ => Self::default(),
        }
    }

    pub fn trimmed_key(&self) -> Option<(String, String)> {
        let name = self.name.as_ref()?.as_str()?.trim();
        let address = self.address.as_ref()?.as_str()?.trim();
        Some((name.to_string(), address.to_string()))
    }
}

/// Raw list-by-proximity query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProximityQuery {
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
    #[serde(default)]
    pub radius_km: Option<Value>,
    #[serde(default)]
    pub limit: Option<Value>,
}

impl ProximityQuery {
    /// Builds a query from query-string pairs. Every value arrives as text.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let value = Some(Value::String(value.to_string()));
            match key {
                "latitude" => query.latitude = value,
                "longitude" => query.longitude = value,
                "radius_km" => query.radius_km = value,
                "limit" => query.limit = value,
                _ => {}
            }
        }
        query
    }
}
