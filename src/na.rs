use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A panel cell that may be missing (NA, Not Available)
///
/// Missing observations are explicit in the type rather than encoded as
/// `NaN`, so a stage can never mistake a gap for a numeric value.
#[derive(Clone, Copy)]
pub enum NA<T> {
    /// An observed or imputed value
    Value(T),
    /// No value
    NA,
}

impl<T> NA<T> {
    /// Returns true if the cell is missing
    pub fn is_na(&self) -> bool {
        match self {
            NA::Value(_) => false,
            NA::NA => true,
        }
    }

    /// Returns true if the cell holds a value
    pub fn is_value(&self) -> bool {
        !self.is_na()
    }

    /// Reference to the value, if present
    pub fn value(&self) -> Option<&T> {
        match self {
            NA::Value(v) => Some(v),
            NA::NA => None,
        }
    }

    /// Maps the contained value, keeping NA as NA
    pub fn map<U, F>(&self, f: F) -> NA<U>
    where
        F: FnOnce(&T) -> U,
    {
        match self {
            NA::Value(v) => NA::Value(f(v)),
            NA::NA => NA::NA,
        }
    }
}

impl NA<f64> {
    /// Builds a cell from a raw float; `NaN` and infinities become NA
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            NA::Value(value)
        } else {
            NA::NA
        }
    }

    /// The value as an `Option`
    pub fn to_option(&self) -> Option<f64> {
        match self {
            NA::Value(v) => Some(*v),
            NA::NA => None,
        }
    }
}

impl From<f64> for NA<f64> {
    fn from(value: f64) -> Self {
        NA::from_f64(value)
    }
}

impl From<Option<f64>> for NA<f64> {
    fn from(opt: Option<f64>) -> Self {
        match opt {
            Some(v) => NA::from_f64(v),
            None => NA::NA,
        }
    }
}

impl<T> From<NA<T>> for Option<T> {
    fn from(na: NA<T>) -> Self {
        match na {
            NA::Value(v) => Some(v),
            NA::NA => None,
        }
    }
}

impl<T: Debug> Debug for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => write!(f, "{:?}", v),
            NA::NA => write!(f, "NA"),
        }
    }
}

impl<T: Display> Display for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => write!(f, "{}", v),
            NA::NA => write!(f, "NA"),
        }
    }
}

impl<T: PartialEq> PartialEq for NA<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NA::Value(a), NA::Value(b)) => a == b,
            (NA::NA, NA::NA) => true,
            _ => false,
        }
    }
}

// Serialized as a nullable value: `null` for NA
impl<T: Serialize> Serialize for NA<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            NA::Value(v) => serializer.serialize_some(v),
            NA::NA => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for NA<f64> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let opt = Option::<f64>::deserialize(deserializer)?;
        Ok(NA::from(opt))
    }
}
