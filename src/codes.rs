//! Code tables for avalanche observations.
//!
//! The CAIC API reports "unknown" in many spellings (`U`, `Un`, `Unknown`,
//! `Unkn`, `UNKNOWN`, `UNK`, `---`, `--`, ...). Every table accepts all of
//! them and collapses them into its `Unknown` variant, so a record is never
//! rejected for spelling "unknown" differently. Any other unrecognized token
//! fails to parse.
//!
//! See <https://avalanche.state.co.us/forecasts/help/observation-avalanche>.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Spellings the API has used for an unknown value.
pub const UNKNOWN_SPELLINGS: &[&str] = &[
    "U", "Un", "Unk", "Unkn", "Unknown", "UNK", "UNKN", "UNKNOWN", "unk", "unknown", "UKN", "---",
    "--", "-",
];

pub fn is_unknown_spelling(s: &str) -> bool {
    UNKNOWN_SPELLINGS.contains(&s.trim())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {table} code [{value}]")]
pub struct CodeError {
    pub table: &'static str,
    pub value: String,
}

// Each table: variant, canonical token, extra accepted tokens, description.
// `Unknown` is always present, serializes as "U", and absorbs
// UNKNOWN_SPELLINGS plus any table-specific `unknown:` tokens.
macro_rules! code_table {
    (
        $(#[$meta:meta])*
        $name:ident, $table:literal $(, unknown: $( $unk:literal )|+ )? {
            $( $variant:ident => $code:literal $(| $alias:literal)* : $desc:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )*
            Unknown,
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $code, )*
                    Self::Unknown => "U",
                }
            }

            pub fn description(&self) -> &'static str {
                match self {
                    $( Self::$variant => $desc, )*
                    Self::Unknown => "Unknown",
                }
            }

            pub fn all() -> &'static [Self] {
                &[ $( Self::$variant, )* Self::Unknown ]
            }
        }

        impl FromStr for $name {
            type Err = CodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                match s {
                    $( $code $(| $alias)* => Ok(Self::$variant), )*
                    $( $( $unk )|+ => Ok(Self::Unknown), )?
                    _ if is_unknown_spelling(s) => Ok(Self::Unknown),
                    _ => Err(CodeError { table: $table, value: s.to_string() }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

code_table! {
    /// Avalanche type.
    TypeCode, "avalanche type" {
        Loose => "L": "Loose",
        WetLoose => "WL": "Wet Loose",
        SoftSlab => "SS": "Soft Slab",
        HardSlab => "HS": "Hard Slab",
        WetSlab => "WS": "Wet Slab",
        Glide => "G": "Glide",
        IceFall => "I": "Ice Fall",
        SlushFlow => "SF": "Slush Flow",
        CorniceFall => "C": "Cornice Fall",
        Roof => "R": "Roof",
    }
}

code_table! {
    /// Primary avalanche trigger.
    PrimaryTrigger, "primary trigger", unknown: "A" {
        Natural => "N": "Natural",
        ArtificialNatural => "AN": "Artificial natural (e.g. a falling cornice triggered by a person)",
        Skier => "AS": "Skier",
        Snowboarder => "AR": "Snowboarder",
        Snowshoer => "AI": "Snowshoer",
        FootPenetration => "AF": "Foot penetration",
        ExplosiveCornice => "AC": "Cornice fall triggered by explosive action",
        Snowmobile => "AM": "Snowmobile",
        Snowcat => "AK": "Snowcat",
        Vehicle => "AV": "Vehicle (Specified in comments)",
        Artillery => "AA": "Artillery",
        HandCharge => "AE": "An explosive thrown or placed on or under the snow surface by hand",
        Avalauncher => "AL": "Avalauncher",
        AirBlast => "AB": "An explosive detonated above the surface (air blast)",
        GasExploder => "AX": "Gas exploder",
        Helicopter => "AH": "Explosive placed via helicopter",
        PrePlaced => "AP": "Pre-placed, remotely detonated explosive charge",
        Wildlife => "AW": "Wildlife",
        UnknownArtificial => "AU": "Unknown artificial trigger",
        Unclassified => "AO": "Unclassified artificial trigger (Specified in comments)",
    }
}

code_table! {
    /// Secondary trigger modifier. Lowercase codes; uppercase `U` is unknown.
    SecondaryTrigger, "secondary trigger" {
        Unintentional => "u": "An unintentional release",
        Controlled => "c": "A controlled or intentional release",
        Remote => "r": "A remote avalanche released by the indicated trigger",
        Sympathetic => "y": "An avalanche released in sympathy with another avalanche",
    }
}

code_table! {
    /// Slope aspect.
    Aspect, "aspect" {
        All => "All" | "ALL": "All aspects",
        North => "N": "North",
        Northeast => "NE": "Northeast",
        East => "E": "East",
        Southeast => "SE": "Southeast",
        South => "S": "South",
        Southwest => "SW": "Southwest",
        West => "W": "West",
        Northwest => "NW": "Northwest",
    }
}

code_table! {
    /// Avalanche size relative to its path.
    RelativeSize, "relative size" {
        R1 => "R1": "Very small, relative to the path",
        R2 => "R2": "Small, relative to the path",
        R3 => "R3": "Medium, relative to the path",
        R4 => "R4": "Large, relative to the path",
        R5 => "R5": "Major or maximum, relative to path",
    }
}

code_table! {
    /// Destructive size, including half sizes.
    DestructiveSize, "destructive size" {
        D1 => "D1": "Relatively harmless to people",
        D1_5 => "D1.5": "Relatively harmless to people",
        D2 => "D2": "Could bury, injure, or kill a person",
        D2_5 => "D2.5": "Could bury, injure, or kill a person",
        D3 => "D3": "Could bury and destroy a car, damage a truck, destroy a wood frame house, or break a few trees",
        D3_5 => "D3.5": "Could bury and destroy a car, damage a truck, destroy a wood frame house, or break a few trees",
        D4 => "D4": "Could destroy a railway car, large truck, several buildings, or a substantial amount of trees",
        D4_5 => "D4.5": "Could destroy a railway car, large truck, several buildings, or a substantial amount of trees",
        D5 => "D5": "Could gouge the landscape, largest snow avalanche known",
    }
}

/// Elevation band. The API sends `<` and `>` URL encoded, so this is for
/// display only and is not used to validate responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationBand {
    AboveTreeline,
    NearTreeline,
    BelowTreeline,
}

impl ElevationBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AboveTreeline => ">TL",
            Self::NearTreeline => "TL",
            Self::BelowTreeline => "<TL",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::AboveTreeline => "Above Treeline",
            Self::NearTreeline => "Near Treeline",
            Self::BelowTreeline => "Below treeline",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim() {
            ">TL" | "%3ETL" => Some(Self::AboveTreeline),
            "TL" => Some(Self::NearTreeline),
            "<TL" | "%3CTL" => Some(Self::BelowTreeline),
            _ => None,
        }
    }
}

/// The `type` discriminator of CAIC API objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObsType {
    AvalancheObservation,
    ReportObservation,
    SnowpackObservation,
    ImageAsset,
    WeatherObservation,
    BackcountryZone,
    HighwayZone,
    ObservationReport,
    VideoAsset,
    SnowpitAsset,
}

impl ObsType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AvalancheObservation => "avalanche_observation",
            Self::ReportObservation => "report_observation",
            Self::SnowpackObservation => "snowpack_observation",
            Self::ImageAsset => "image_asset",
            Self::WeatherObservation => "weather_observation",
            Self::BackcountryZone => "backcountry_zone",
            Self::HighwayZone => "highway_zone",
            Self::ObservationReport => "observation_report",
            Self::VideoAsset => "video_asset",
            Self::SnowpitAsset => "snowpit_asset",
        }
    }
}

/// The `type` of the detail objects attached to a field report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailType {
    AvalancheDetail,
    SnowpackDetail,
    WeatherDetail,
}

/// Backcountry zone titles accepted by the field report search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackcountryZoneTitle {
    Aspen,
    FrontRange,
    GrandMesa,
    Gunnison,
    NorthernSanJuan,
    SouthernSanJuan,
    SangreDeCristo,
    Sawatch,
    SteamboatFlatTops,
    VailSummitCounty,
}

impl BackcountryZoneTitle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aspen => "Aspen",
            Self::FrontRange => "Front Range",
            Self::GrandMesa => "Grand Mesa",
            Self::Gunnison => "Gunnison",
            Self::NorthernSanJuan => "Northern San Juan",
            Self::SouthernSanJuan => "Southern San Juan",
            Self::SangreDeCristo => "Sangre de Cristo",
            Self::Sawatch => "Sawatch",
            Self::SteamboatFlatTops => "Steamboat & Flat Tops",
            Self::VailSummitCounty => "Vail & Summit County",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Aspen,
            Self::FrontRange,
            Self::GrandMesa,
            Self::Gunnison,
            Self::NorthernSanJuan,
            Self::SouthernSanJuan,
            Self::SangreDeCristo,
            Self::Sawatch,
            Self::SteamboatFlatTops,
            Self::VailSummitCounty,
        ]
    }
}

impl FromStr for BackcountryZoneTitle {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|z| z.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CodeError {
                table: "backcountry zone",
                value: s.to_string(),
            })
    }
}

/// Cracking levels accepted by the field report search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrackingObs {
    None,
    Minor,
    Moderate,
    Shooting,
    Unknown,
}

impl CrackingObs {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Minor => "Minor",
            Self::Moderate => "Moderate",
            Self::Shooting => "Shooting",
            Self::Unknown => "Unknown",
        }
    }
}

impl FromStr for CrackingObs {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::None, Self::Minor, Self::Moderate, Self::Shooting, Self::Unknown]
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CodeError {
                table: "cracking",
                value: s.to_string(),
            })
    }
}

/// Collapsing levels accepted by the field report search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapsingObs {
    None,
    Minor,
    Moderate,
    Rumbling,
    Unknown,
}

impl CollapsingObs {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Minor => "Minor",
            Self::Moderate => "Moderate",
            Self::Rumbling => "Rumbling",
            Self::Unknown => "Unknown",
        }
    }
}

impl FromStr for CollapsingObs {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::None, Self::Minor, Self::Moderate, Self::Rumbling, Self::Unknown]
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CodeError {
                table: "collapsing",
                value: s.to_string(),
            })
    }
}
