use serde::{Deserialize, Serialize};

/// Command filter attached to a hook.
///
/// An empty `commands` list means every command. A command listed in
/// `exclude` is always skipped, even if it is also listed in `commands`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookFilter {
    pub commands: Vec<String>,
    pub exclude: Vec<String>,
}

impl HookFilter {
    /// Match only the given commands
    pub fn commands<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
        }
    }

    /// Match every command except the given ones
    pub fn exclude<I, S>(exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: Vec::new(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    pub fn and_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(exclude.into_iter().map(Into::into));
        self
    }

    pub fn matches(&self, command: &str) -> bool {
        if self.exclude.iter().any(|it| it == command) {
            return false;
        }
        self.commands.is_empty() || self.commands.iter().any(|it| it == command)
    }
}
