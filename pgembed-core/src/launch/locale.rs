//! Cluster locale settings passed to `initdb`.

use serde::{Deserialize, Serialize};

/// Encoding and locale flags for cluster initialization.
///
/// Every field is optional; an absent field leaves the choice to the
/// executable's own default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleSpec {
    pub encoding: Option<String>,
    pub locale: Option<String>,
    pub lc_collate: Option<String>,
    pub lc_ctype: Option<String>,
    pub lc_messages: Option<String>,
    pub lc_monetary: Option<String>,
    pub lc_numeric: Option<String>,
    pub lc_time: Option<String>,
    pub no_locale: bool,
}

impl LocaleSpec {
    pub fn with_encoding(mut self, value: impl Into<String>) -> Self {
        self.encoding = Some(value.into());
        self
    }

    pub fn with_locale(mut self, value: impl Into<String>) -> Self {
        self.locale = Some(value.into());
        self
    }

    pub fn with_lc_collate(mut self, value: impl Into<String>) -> Self {
        self.lc_collate = Some(value.into());
        self
    }

    pub fn with_lc_ctype(mut self, value: impl Into<String>) -> Self {
        self.lc_ctype = Some(value.into());
        self
    }

    pub fn with_lc_messages(mut self, value: impl Into<String>) -> Self {
        self.lc_messages = Some(value.into());
        self
    }

    pub fn with_lc_monetary(mut self, value: impl Into<String>) -> Self {
        self.lc_monetary = Some(value.into());
        self
    }

    pub fn with_lc_numeric(mut self, value: impl Into<String>) -> Self {
        self.lc_numeric = Some(value.into());
        self
    }

    pub fn with_lc_time(mut self, value: impl Into<String>) -> Self {
        self.lc_time = Some(value.into());
        self
    }

    pub fn with_no_locale(mut self, no_locale: bool) -> Self {
        self.no_locale = no_locale;
        self
    }

    /// Renders one `--<name>=<value>` flag per present field, followed by a
    /// bare `--no-locale` when set.
    ///
    /// The order is fixed so that rendered command lines are reproducible.
    pub fn build_command_line(&self) -> Vec<String> {
        let flags = [
            ("encoding", &self.encoding),
            ("locale", &self.locale),
            ("lc-collate", &self.lc_collate),
            ("lc-ctype", &self.lc_ctype),
            ("lc-messages", &self.lc_messages),
            ("lc-monetary", &self.lc_monetary),
            ("lc-numeric", &self.lc_numeric),
            ("lc-time", &self.lc_time),
        ];

        let mut cmd: Vec<String> = flags
            .into_iter()
            .filter_map(|(name, value)| {
                value
                    .as_ref()
                    .map(|value| format!("--{}={}", name, value))
            })
            .collect();

        if self.no_locale {
            cmd.push("--no-locale".to_string());
        }

        cmd
    }
}
