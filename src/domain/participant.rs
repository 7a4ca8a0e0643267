use serde::Serialize;

/// A member of the household, identified by name.
///
/// Participants are only ever produced by a [`Roster`] lookup, so holding one
/// means the name is on the roster it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Participant(String);

impl Participant {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed set of roommates, defined once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    members: Vec<Participant>,
}

impl Roster {
    /// Build a roster from names. Names are trimmed. Empty rosters, blank
    /// names, names containing a comma and case-insensitive duplicates are
    /// rejected.
    pub fn new<I, S>(names: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut members: Vec<Participant> = Vec::new();

        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(RosterError::BlankName);
            }
            // Commas separate names in `--involved`
            if name.contains(',') {
                return Err(RosterError::CommaInName(name.to_string()));
            }
            if members.iter().any(|m| same_name(&m.0, name)) {
                return Err(RosterError::DuplicateName(name.to_string()));
            }
            members.push(Participant(name.to_string()));
        }

        if members.is_empty() {
            return Err(RosterError::Empty);
        }

        Ok(Self { members })
    }

    /// Look up a participant by name (trimmed, case-insensitive).
    /// Returns the roster's canonical spelling.
    pub fn find(&self, name: &str) -> Option<&Participant> {
        let name = name.trim();
        self.members.iter().find(|m| same_name(&m.0, name))
    }

    pub fn members(&self) -> &[Participant] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Comma-separated member names, for error messages and listings.
    pub fn names(&self) -> String {
        self.members
            .iter()
            .map(|m| m.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            members: DEFAULT_ROOMMATES
                .iter()
                .map(|name| Participant(name.to_string()))
                .collect(),
        }
    }
}

/// Case-insensitive comparison that also folds non-ASCII letters.
fn same_name(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

pub const DEFAULT_ROOMMATES: [&str; 4] = ["IBRAHIM", "TAHA", "AMJID", "ADNAN"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    Empty,
    BlankName,
    DuplicateName(String),
    CommaInName(String),
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Empty => write!(f, "roster must name at least one roommate"),
            RosterError::BlankName => write!(f, "roster contains a blank name"),
            RosterError::DuplicateName(name) => {
                write!(f, "roster lists '{}' more than once", name)
            }
            RosterError::CommaInName(name) => {
                write!(f, "roommate name '{}' must not contain a comma", name)
            }
        }
    }
}

impl std::error::Error for RosterError {}
