use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Standby crew positions: an ambulance crew and a fire engine crew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    AmbulanceChief,
    AmbulanceDriver,
    AmbulanceCareEquipier,
    EngineChief,
    EngineDriver,
    EngineFireEquipier,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::AmbulanceChief,
        Role::AmbulanceDriver,
        Role::AmbulanceCareEquipier,
        Role::EngineChief,
        Role::EngineDriver,
        Role::EngineFireEquipier,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::AmbulanceChief => "ambulance-chief",
            Role::AmbulanceDriver => "ambulance-driver",
            Role::AmbulanceCareEquipier => "ambulance-care-equipier",
            Role::EngineChief => "engine-chief",
            Role::EngineDriver => "engine-driver",
            Role::EngineFireEquipier => "engine-fire-equipier",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Accepts the kebab identifiers and the legacy station codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if let Some(role) = Role::ALL.iter().find(|r| r.as_str().eq_ignore_ascii_case(key)) {
            return Ok(*role);
        }
        match key.to_ascii_uppercase().as_str() {
            "AMB_CHEF" => Ok(Role::AmbulanceChief),
            "AMB_COND" => Ok(Role::AmbulanceDriver),
            "AMB_EQUI_SUAP" => Ok(Role::AmbulanceCareEquipier),
            "FPT_CHEF" => Ok(Role::EngineChief),
            "FPT_COND" => Ok(Role::EngineDriver),
            "FPT_EQUI_INC" => Ok(Role::EngineFireEquipier),
            _ => Err(format!("unknown role `{}`", key)),
        }
    }
}
