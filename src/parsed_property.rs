use std::{fmt::Display, ops::Deref, path::PathBuf};

/// A configuration property that tracks its source and original value
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedProperty<T> {
    /// Value from command line arguments (parsed_value, original_string)
    Cli(T, String),
    /// Value from environment variable (parsed_value, env_var_value)
    Env(T, String),
    /// Value from configuration file (parsed_value, file_path, toml_value_string)
    File(T, PathBuf, String),
    /// Default value when no other source provided
    Default(T),
}

impl<T> ParsedProperty<T> {
    /// Get the parsed value
    pub fn value(&self) -> &T {
        match self {
            ParsedProperty::Cli(value, _)
            | ParsedProperty::Env(value, _)
            | ParsedProperty::File(value, _, _)
            | ParsedProperty::Default(value) => value,
        }
    }

    /// Consume the property and return the parsed value
    pub fn into_value(self) -> T {
        match self {
            ParsedProperty::Cli(value, _)
            | ParsedProperty::Env(value, _)
            | ParsedProperty::File(value, _, _)
            | ParsedProperty::Default(value) => value,
        }
    }

    /// Get the source name as a string
    pub fn source_name(&self) -> &'static str {
        match self {
            ParsedProperty::Cli(_, _) => "cli",
            ParsedProperty::Env(_, _) => "env",
            ParsedProperty::File(_, _, _) => "file",
            ParsedProperty::Default(_) => "default",
        }
    }

    /// Get the original string value if available
    pub fn original(&self) -> Option<&str> {
        match self {
            ParsedProperty::Cli(_, original)
            | ParsedProperty::Env(_, original)
            | ParsedProperty::File(_, _, original) => Some(original),
            ParsedProperty::Default(_) => None,
        }
    }
}

impl<T> Deref for ParsedProperty<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.value()
    }
}

impl<T: Display> Display for ParsedProperty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.value().fmt(f)
    }
}

impl<T> From<T> for ParsedProperty<T> {
    fn from(value: T) -> Self {
        ParsedProperty::Default(value)
    }
}
