pub const SATELLITE_ADDR_VAR: &str = "SATELLITE_0_ADDR";
pub const ACCESS_VAR: &str = "UPLINK_0_ACCESS";

/// Test runner configuration, normally provided through the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestConfig {
    pub satellite_addr: Option<String>,
    pub access: Option<String>,
}

impl TestConfig {
    const REDACTED_PREFIX: usize = 8;

    pub fn new(satellite_addr: impl Into<String>, access: impl Into<String>) -> Self {
        Self {
            satellite_addr: Some(satellite_addr.into()),
            access: Some(access.into()),
        }
    }

    /// Unset variables are left as `None`; the access parser reports them later.
    pub fn from_env() -> Self {
        let read = |name: &str| match std::env::var(name) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("{name}: {e}");
                None
            }
        };
        Self {
            satellite_addr: read(SATELLITE_ADDR_VAR),
            access: read(ACCESS_VAR),
        }
    }

    /// access grant to hand to the parser, empty when unset
    pub fn access_or_empty(&self) -> &str {
        self.access.as_deref().unwrap_or_default()
    }

    /// Lines echoed before the project is opened. The grant is a secret, only
    /// a short prefix and its length are shown.
    pub fn diagnostic_lines(&self) -> [String; 2] {
        let satellite_addr = self.satellite_addr.as_deref().unwrap_or("(unset)");
        let access = match self.access.as_deref() {
            None => "(unset)".to_owned(),
            Some(access) => {
                let prefix = access
                    .char_indices()
                    .nth(Self::REDACTED_PREFIX)
                    .map_or(access, |(idx, _)| &access[..idx]);
                format!("{prefix}... ({} chars)", access.chars().count())
            }
        };
        [
            format!("using {SATELLITE_ADDR_VAR}: {satellite_addr}"),
            format!("using {ACCESS_VAR}: {access}"),
        ]
    }
}
