use std::fmt;
use std::str::FromStr;

use crate::constants::{
    CLASSIC_PREFIX, MODULAR_PREFIX, PRODUCTION_HOST, STAGING_HOST, TEST_PROVIDER, UAT_HOST,
};
use crate::error::ParseError;

/**
    Which operation a request targets.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purpose {
    License,
    ContentKey,
}

impl Purpose {
    pub const fn path(self) -> &'static str {
        match self {
            Self::License => "getlicense",
            Self::ContentKey => "getcontentkey",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::License => "license",
            Self::ContentKey => "key",
        })
    }
}

impl FromStr for Purpose {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "license" | "getlicense" => Ok(Self::License),
            "key" | "contentkey" | "content-key" | "getcontentkey" => Ok(Self::ContentKey),
            _ => Err(ParseError {
                kind: "purpose",
                value: s.to_owned(),
            }),
        }
    }
}

/**
    Licensing service environment.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Uat,
    Staging,
    Production,
}

impl Environment {
    /**
        Environment used for a provider: the test provider goes to UAT,
        everyone else to production. Staging is never selected.
    */
    pub fn for_provider(provider: &str) -> Self {
        if provider == TEST_PROVIDER {
            Self::Uat
        } else {
            Self::Production
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uat => "uat",
            Self::Staging => "staging",
            Self::Production => "production",
        })
    }
}

impl FromStr for Environment {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uat" => Ok(Self::Uat),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ParseError {
                kind: "environment",
                value: s.to_owned(),
            }),
        }
    }
}

/**
    Base URLs for each environment, without the purpose path.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub uat: String,
    pub staging: String,
    pub production: String,
}

impl Endpoints {
    /**
        Widevine Modular (CENC) services.
    */
    pub fn modular() -> Self {
        Self::with_prefix(MODULAR_PREFIX)
    }

    /**
        Widevine Classic services.
    */
    pub fn classic() -> Self {
        Self::with_prefix(CLASSIC_PREFIX)
    }

    /**
        Arbitrary base URLs, e.g. a private deployment or a local mock.
        Trailing slashes are ignored.
    */
    pub fn custom(
        uat: impl Into<String>,
        staging: impl Into<String>,
        production: impl Into<String>,
    ) -> Self {
        Self {
            uat: trim_slash(uat.into()),
            staging: trim_slash(staging.into()),
            production: trim_slash(production.into()),
        }
    }

    fn with_prefix(prefix: &str) -> Self {
        Self {
            uat: format!("{UAT_HOST}/{prefix}"),
            staging: format!("{STAGING_HOST}/{prefix}"),
            production: format!("{PRODUCTION_HOST}/{prefix}"),
        }
    }

    pub fn base(&self, environment: Environment) -> &str {
        match environment {
            Environment::Uat => &self.uat,
            Environment::Staging => &self.staging,
            Environment::Production => &self.production,
        }
    }

    /**
        Full URL for an environment and purpose.

        The last path segment is always the test provider literal, whichever
        provider the request is signed as.
    */
    pub fn url(&self, environment: Environment, purpose: Purpose) -> String {
        format!(
            "{}/{}/{TEST_PROVIDER}",
            self.base(environment),
            purpose.path()
        )
    }

    /**
        Resolve the URL a provider's request for `purpose` is sent to.
    */
    pub fn resolve(&self, provider: &str, purpose: Purpose) -> String {
        self.url(Environment::for_provider(provider), purpose)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::modular()
    }
}

/**
    Resolve against the default Modular endpoints.
*/
pub fn resolve(provider: &str, purpose: Purpose) -> String {
    Endpoints::modular().resolve(provider, purpose)
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
