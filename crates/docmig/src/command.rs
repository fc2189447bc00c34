use std::fmt;
use std::str::FromStr;

use crate::error::ChangeError;

/// What a change does to its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Command {
    /// Not supplied; inferred from `before`/`after` during resolution.
    #[default]
    Unknown,
    /// Merge the patch fields into the existing document.
    Update,
    /// Overwrite the document with exactly the patch fields.
    Set,
    /// Create the document with the patch fields.
    Add,
    /// Remove the document.
    Delete,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Unknown => "unknown",
            Command::Update => "update",
            Command::Set => "set",
            Command::Add => "add",
            Command::Delete => "delete",
        }
    }

    /// Commands whose execution writes the patch payload.
    pub fn writes_payload(&self) -> bool {
        matches!(self, Command::Update | Command::Set | Command::Add)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = ChangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unknown" | "" => Ok(Command::Unknown),
            "update" => Ok(Command::Update),
            "set" => Ok(Command::Set),
            "add" => Ok(Command::Add),
            "delete" => Ok(Command::Delete),
            other => Err(ChangeError::UnknownCommand(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("SET".parse::<Command>().unwrap(), Command::Set);
        assert_eq!("Delete".parse::<Command>().unwrap(), Command::Delete);
        assert_eq!("".parse::<Command>().unwrap(), Command::Unknown);
        assert!("upsert".parse::<Command>().is_err());
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for cmd in [Command::Unknown, Command::Update, Command::Set, Command::Add, Command::Delete] {
            assert_eq!(cmd.to_string().parse::<Command>().unwrap(), cmd);
        }
    }
}
