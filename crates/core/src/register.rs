use core::fmt;
use core::str::FromStr;

/// Why a textual register or label token couldn't be turned into a name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseNameError {
    #[error("`{token}` is missing its `{sigil}` sigil")]
    MissingSigil { token: String, sigil: char },
    #[error("`{sigil}` must be followed by a name")]
    Empty { sigil: char },
}

fn strip_sigil(token: &str, sigil: char) -> Result<&str, ParseNameError> {
    let Some(name) = token.strip_prefix(sigil) else {
        return Err(ParseNameError::MissingSigil { token: token.to_owned(), sigil });
    };

    match name.is_empty() {
        true => Err(ParseNameError::Empty { sigil }),
        false => Ok(name),
    }
}

/// A virtual register, e.g. `%acc`.
///
/// Registers are scoped to one call frame. The name is stored without its sigil.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct Register(Box<str>);

impl Register {
    pub const SIGIL: char = '%';

    #[must_use]
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::SIGIL, self.0)
    }
}

impl fmt::Debug for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Register {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        strip_sigil(s, Self::SIGIL).map(Self::new)
    }
}

/// The name of a block or function entry point, e.g. `@entry`.
///
/// Labels are unique across the whole program.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct Label(Box<str>);

impl Label {
    pub const SIGIL: char = '@';
    pub const ENTRY: &'static str = "entry";

    #[must_use]
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Self(name.into())
    }

    /// The label every program must open with.
    #[must_use]
    pub fn entry() -> Self {
        Self::new(Self::ENTRY)
    }

    #[must_use]
    pub fn is_entry(&self) -> bool {
        &*self.0 == Self::ENTRY
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::SIGIL, self.0)
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Label {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        strip_sigil(s, Self::SIGIL).map(Self::new)
    }
}
