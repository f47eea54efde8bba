//! # Unit Types
//!
//! Type-safe wrappers for the oilfield units a casing tally mixes together.
//! Joint lengths and depths are recorded in meters on the rig floor, while
//! pipe catalogs quote weights in lb/ft and diameters in inches, and mud
//! volumes are planned in barrels.
//!
//! ## Conversions
//!
//! - Length: meters ↔ feet (1 m = 3.28084 ft), feet ↔ inches
//! - Force: pounds ↔ kips (1 kip = 1000 lb)
//! - Volume: cubic feet ↔ oilfield barrels (1 bbl = 5.615 ft³)
//!
//! ## Example
//!
//! ```rust
//! use tally_core::units::{Barrels, CubicFeet, Feet, Meters};
//!
//! let joint = Meters(12.0);
//! let joint_ft: Feet = joint.into();
//! assert!((joint_ft.0 - 39.37008).abs() < 1e-9);
//!
//! let bbl: Barrels = CubicFeet(5.615).into();
//! assert!((bbl.0 - 1.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Feet per meter
pub const FEET_PER_METER: f64 = 3.28084;

/// Cubic feet per oilfield barrel
pub const CUBIC_FEET_PER_BARREL: f64 = 5.615;

// ============================================================================
// Length Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Meters> for Feet {
    fn from(m: Meters) -> Self {
        Feet(m.0 * FEET_PER_METER)
    }
}

impl From<Feet> for Meters {
    fn from(ft: Feet) -> Self {
        Meters(ft.0 / FEET_PER_METER)
    }
}

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

// ============================================================================
// Force Units
// ============================================================================

/// Force in pounds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pounds(pub f64);

/// Force in kips (1 kip = 1000 pounds)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kips(pub f64);

impl From<Pounds> for Kips {
    fn from(lb: Pounds) -> Self {
        Kips(lb.0 / 1000.0)
    }
}

impl From<Kips> for Pounds {
    fn from(k: Kips) -> Self {
        Pounds(k.0 * 1000.0)
    }
}

// ============================================================================
// Volume Units
// ============================================================================

/// Volume in cubic feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicFeet(pub f64);

/// Volume in oilfield barrels
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Barrels(pub f64);

impl From<CubicFeet> for Barrels {
    fn from(cuft: CubicFeet) -> Self {
        Barrels(cuft.0 / CUBIC_FEET_PER_BARREL)
    }
}

impl From<Barrels> for CubicFeet {
    fn from(bbl: Barrels) -> Self {
        CubicFeet(bbl.0 * CUBIC_FEET_PER_BARREL)
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Feet);
impl_arithmetic!(Inches);
impl_arithmetic!(Pounds);
impl_arithmetic!(Kips);
impl_arithmetic!(CubicFeet);
impl_arithmetic!(Barrels);
