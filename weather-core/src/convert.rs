use crate::model::Unit;

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Celsius => "C",
            Unit::Fahrenheit => "F",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Unit::Celsius => Unit::Fahrenheit,
            Unit::Fahrenheit => Unit::Celsius,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "°{}", self.symbol())
    }
}

/// Convert a provider temperature (metric) into the requested unit, rounded to
/// the nearest whole degree.
pub fn convert(temp_celsius: f64, target: Unit) -> i64 {
    let value = match target {
        Unit::Celsius => temp_celsius,
        Unit::Fahrenheit => temp_celsius * 9.0 / 5.0 + 32.0,
    };
    value.round() as i64
}
