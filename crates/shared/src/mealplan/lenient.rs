use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use validator::Validate;

use super::{DayKey, DayPlan, MealEntry};

/// Keeps the well-formed, valid entries of a meal list; anything else is empty.
pub(super) fn meals<'de, D>(deserializer: D) -> Result<Vec<MealEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<MealEntry>(item).ok())
        .filter(|meal| meal.validate().is_ok())
        .collect())
}

/// Unknown day keys and null days are dropped, a malformed day is an empty day.
pub(super) fn week<'de, D>(deserializer: D) -> Result<BTreeMap<DayKey, DayPlan>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(days) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };

    Ok(days
        .into_iter()
        .filter(|(_, day)| !day.is_null())
        .filter_map(|(key, day)| {
            let key = key.parse::<DayKey>().ok()?;
            Some((key, serde_json::from_value(day).unwrap_or_default()))
        })
        .collect())
}
