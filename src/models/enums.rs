use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(PatientCategory {
    Home => "home",
    Hospital => "hospital",
    Freelance => "freelance",
});

impl PatientCategory {
    /// Parse a stored label. Matching is exact; besides the canonical
    /// names the legacy Portuguese labels (`domiciliar`, `hospitalar`,
    /// `freelancer`) are accepted.
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw {
            "home" | "domiciliar" => Some(Self::Home),
            "hospital" | "hospitalar" => Some(Self::Hospital),
            "freelance" | "freelancer" => Some(Self::Freelance),
            _ => None,
        }
    }
}

str_enum!(VitalType {
    Temperature => "temperature",
    BloodPressure => "blood_pressure",
    Weight => "weight",
    Height => "height",
    HeartRate => "heart_rate",
    BloodGlucose => "blood_glucose",
    OxygenSaturation => "oxygen_saturation",
    RespiratoryRate => "respiratory_rate",
});

impl VitalType {
    /// Default unit for this vital type.
    pub fn default_unit(self) -> &'static str {
        match self {
            VitalType::Temperature => "°C",
            VitalType::BloodPressure => "mmHg",
            VitalType::Weight => "kg",
            VitalType::Height => "cm",
            VitalType::HeartRate => "bpm",
            VitalType::BloodGlucose => "mg/dL",
            VitalType::OxygenSaturation => "%",
            VitalType::RespiratoryRate => "breaths/min",
        }
    }
}

str_enum!(AppointmentType {
    HomeVisit => "home_visit",
    HospitalRound => "hospital_round",
    Consultation => "consultation",
    FollowUp => "follow_up",
});
