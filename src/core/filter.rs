use crate::config::QueryConfig;
use crate::core::validator::optional_number;
use crate::domain::model::{ProximityQuery, RankedSchool};
use crate::utils::error::{Result, SchoolError};

/// Radius and count limits applied on top of a full ranked list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProximityFilter {
    pub max_distance_km: Option<f64>,
    pub limit: Option<usize>,
}

impl ProximityFilter {
    /// 合併查詢參數與配置預設值；查詢參數優先，limit 不超過 max_limit
    pub fn resolve(query: &ProximityQuery, defaults: &QueryConfig) -> Result<Self> {
        let max_distance_km = match optional_number("radius_km", query.radius_km.as_ref())? {
            Some(radius) if !radius.is_finite() || radius <= 0.0 => {
                return Err(SchoolError::OutOfRange {
                    field: "radius_km".to_string(),
                    value: radius.to_string(),
                    min: 0.0,
                    max: f64::INFINITY,
                });
            }
            Some(radius) => Some(radius),
            None => defaults.default_radius_km,
        };

        let requested = match optional_number("limit", query.limit.as_ref())? {
            Some(limit) if limit.fract() != 0.0 || !limit.is_finite() => {
                return Err(SchoolError::NotANumber {
                    field: "limit".to_string(),
                    value: limit.to_string(),
                });
            }
            Some(limit) if limit < 1.0 => {
                return Err(SchoolError::OutOfRange {
                    field: "limit".to_string(),
                    value: limit.to_string(),
                    min: 1.0,
                    max: defaults.max_limit.map_or(f64::INFINITY, |m| m as f64),
                });
            }
            Some(limit) => Some(limit as usize),
            None => defaults.default_limit,
        };

        let limit = match (requested, defaults.max_limit) {
            (Some(limit), Some(max)) => Some(limit.min(max)),
            (None, max) => max,
            (limit, None) => limit,
        };

        Ok(Self {
            max_distance_km,
            limit,
        })
    }

    pub fn is_noop(&self) -> bool {
        self.max_distance_km.is_none() && self.limit.is_none()
    }

    /// Expects `ranked` in ascending distance order.
    pub fn apply(&self, ranked: Vec<RankedSchool>) -> Vec<RankedSchool> {
        let within = ranked.into_iter().filter(|entry| {
            self.max_distance_km
                .map_or(true, |radius| entry.distance_km <= radius)
        });

        match self.limit {
            Some(limit) => within.take(limit).collect(),
            None => within.collect(),
        }
    }
}
