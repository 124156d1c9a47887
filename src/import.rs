use std::fmt;
use std::path::PathBuf;

/// Command prefix that injects secrets into the `terraform` process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretsWrapper {
    OnePassword { env_file: PathBuf },
}

impl fmt::Display for SecretsWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretsWrapper::OnePassword { env_file } => {
                write!(f, "op run --env-file={} --", env_file.display())
            }
        }
    }
}

/// A `terraform import` invocation ready to paste into a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCommand {
    pub address: String,
    pub identifier: String,
    pub wrapper: Option<SecretsWrapper>,
}

impl ImportCommand {
    pub fn new(address: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            identifier: identifier.into(),
            wrapper: None,
        }
    }

    pub fn wrapped(mut self, wrapper: Option<SecretsWrapper>) -> Self {
        self.wrapper = wrapper;
        self
    }
}

impl fmt::Display for ImportCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(wrapper) = &self.wrapper {
            write!(f, "{} ", wrapper)?;
        }
        let identifier = if needs_quoting(&self.identifier) {
            single_quote(&self.identifier)
        } else {
            self.identifier.clone()
        };
        write!(
            f,
            "terraform import {} {}",
            single_quote(&self.address),
            identifier
        )
    }
}

// NOTE: Addresses always contain `.` and often `[`/`"`, so they are quoted unconditionally
fn single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@+=,".contains(c))
}
