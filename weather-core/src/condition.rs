use crate::model::{ConditionSignal, WeatherResult};

/// Derive the background signal for `weather` at `now_epoch_seconds`.
///
/// Sunrise and sunset themselves count as night.
pub fn derive(weather: &WeatherResult, now_epoch_seconds: i64) -> ConditionSignal {
    ConditionSignal {
        condition_category: weather.weather_main.clone(),
        is_daytime: weather.sunrise_epoch_seconds < now_epoch_seconds
            && now_epoch_seconds < weather.sunset_epoch_seconds,
    }
}
