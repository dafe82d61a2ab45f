use std::{fmt, str::FromStr};

pub mod measurement;
pub mod patterns;
pub mod studio;

pub use measurement::{MeasurementMethod, MeasurementSheet};
pub use patterns::{Difficulty, Pattern, PatternAction, PatternLibrary};
pub use studio::{DesignStudio, StudioAction, StudioCatalog};

/// Filter chip value, where "All" disables the filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(x) => x == value,
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Selection::All)
        } else {
            s.parse().map(Selection::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "All"),
            Selection::Only(x) => x.fmt(f),
        }
    }
}
