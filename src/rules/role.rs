use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Closed role hierarchy. Rank order: Employee(1) < Leader(2) < Director(3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Employee,
    Leader,
    Director,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Employee, Role::Leader, Role::Director];

    pub fn rank(self) -> i16 {
        match self {
            Role::Employee => 1,
            Role::Leader => 2,
            Role::Director => 3,
        }
    }

    pub fn from_rank(rank: i16) -> Option<Self> {
        match rank {
            1 => Some(Role::Employee),
            2 => Some(Role::Leader),
            3 => Some(Role::Director),
            _ => None,
        }
    }

    /// Lowercase name used in tokens and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Leader => "leader",
            Role::Director => "director",
        }
    }

    /// Parse a role claim. Case-insensitive, surrounding whitespace ignored.
    pub fn from_claim(claim: &str) -> Option<Self> {
        match claim.trim().to_ascii_lowercase().as_str() {
            "employee" => Some(Role::Employee),
            "leader" => Some(Role::Leader),
            "director" => Some(Role::Director),
            _ => None,
        }
    }

    /// A caller may only create, change-to, or act upon roles at or below their own rank.
    pub fn can_act_on(self, target: Role) -> bool {
        self.rank() >= target.rank()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::from_claim(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Clients send either the name ("leader", "Leader") or the rank (2).
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RoleRepr {
            Name(String),
            Rank(i64),
        }

        match RoleRepr::deserialize(deserializer)? {
            RoleRepr::Name(name) => Role::from_claim(&name)
                .ok_or_else(|| de::Error::custom(format!("unknown role '{}'", name))),
            RoleRepr::Rank(rank) => i16::try_from(rank)
                .ok()
                .and_then(Role::from_rank)
                .ok_or_else(|| de::Error::custom(format!("unknown role rank {}", rank))),
        }
    }
}
