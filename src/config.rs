use anyhow::Context;
use api::interaction::{self, PublicKey};
use std::net::{Ipv4Addr, SocketAddr};

/// Settings for the optional HTTP interaction endpoint.
pub struct Endpoint {
    pub addr: SocketAddr,
    pub public: PublicKey,
}

pub struct Config {
    /// Bot token used by both the gateway and the REST client.
    pub token: String,
    /// Name of the channel where finished quizzes are reviewed.
    pub staff: Box<str>,
    /// When absent, interactions are received over the gateway instead.
    pub endpoint: Option<Endpoint>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let token = lookup("TOKEN").context("missing TOKEN")?;
        let staff = lookup("STAFF_CHANNEL")
            .filter(|name| !name.trim().is_empty())
            .map_or_else(|| api::DEFAULT_STAFF_CHANNEL.into(), String::into_boxed_str);

        let endpoint = match (lookup("PORT"), lookup("PUBLIC_KEY")) {
            (None, None) => None,
            (Some(port), Some(public)) => {
                let port = port.parse().context("invalid PORT")?;
                let public = interaction::parse_public_key(&public).context("invalid PUBLIC_KEY")?;
                Some(Endpoint { addr: (Ipv4Addr::UNSPECIFIED, port).into(), public })
            }
            _ => anyhow::bail!("PORT and PUBLIC_KEY must be set together"),
        };

        Ok(Self { token, staff, endpoint })
    }
}
