//! Immutable gateway profile: backend program names and the session
//! backend's allow-list.

pub const DEFAULT_SESSION_PROGRAM: &str = "bmw";
pub const DEFAULT_STATELESS_PROGRAM: &str = "phevctl";

const MUTATING_OPERATIONS: &[&str] = &["charge", "climate", "lock", "unlock", "flash", "honk"];
const READ_ONLY_OPERATIONS: &[&str] = &["info", "status", "trips", "charging"];

/// Operation names accepted by the session backend, partitioned by whether
/// they change vehicle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    mutating: Vec<String>,
    read_only: Vec<String>,
}

impl AllowList {
    pub fn new<M, R>(mutating: M, read_only: R) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            mutating: mutating.into_iter().map(Into::into).collect(),
            read_only: read_only.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.is_mutating(name) || self.is_read_only(name)
    }

    pub fn is_mutating(&self, name: &str) -> bool {
        self.mutating.iter().any(|op| op == name)
    }

    pub fn is_read_only(&self, name: &str) -> bool {
        self.read_only.iter().any(|op| op == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.mutating
            .iter()
            .chain(self.read_only.iter())
            .map(String::as_str)
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(
            MUTATING_OPERATIONS.iter().copied(),
            READ_ONLY_OPERATIONS.iter().copied(),
        )
    }
}

/// Process-wide settings handed to the router at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayProfile {
    pub session_program: String,
    pub stateless_program: String,
    pub allow_list: AllowList,
}

impl GatewayProfile {
    pub fn new(session_program: impl Into<String>, stateless_program: impl Into<String>) -> Self {
        Self {
            session_program: session_program.into(),
            stateless_program: stateless_program.into(),
            allow_list: AllowList::default(),
        }
    }
}

impl Default for GatewayProfile {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_PROGRAM, DEFAULT_STATELESS_PROGRAM)
    }
}
