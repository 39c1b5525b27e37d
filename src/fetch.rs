use std::{fmt, time::Duration};

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE},
    Client, StatusCode,
};

use crate::error::{Error, Result};

/// Page holding the schedule
pub const PRIMARY_URL: &str = "https://czq.rth1.xyz/time";

/// Reader proxy used when the page refuses us
pub const PROXY_URL: &str = "https://r.jina.ai/";

/// Browser-like User-Agent, the site blocks obvious bots
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "zh-CN,zh;q=0.9,en;q=0.8";

/// Where the page came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Primary,
    Fallback,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

/// Downloaded page
#[derive(Debug)]
pub struct Page {
    pub text: String,
    pub source: Source,
}

pub struct Config {
    pub url: String,
    pub proxy: String,
    pub timeout: Duration,
}

impl Config {
    /// URL of the page through the proxy
    pub fn fallback_url(&self) -> String {
        format!("{}{}", self.proxy, self.url)
    }
}

pub struct Fetcher {
    client: Client,
    config: Config,
}

impl Fetcher {
    pub fn new(config: Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));

        // Use custom User-Agent
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(Error::Client)?;

        Ok(Self { client, config })
    }

    /// Get the schedule page, going through the proxy only if the site forbids us
    pub async fn fetch(&self) -> Result<Page> {
        let primary = &self.config.url;
        match self.get(primary).await {
            Ok(text) => Ok(Page {
                text,
                source: Source::Primary,
            }),
            Err(err) if err.status() == Some(StatusCode::FORBIDDEN) => {
                log::warn!("{primary} answered 403, retrying through the proxy");
                let fallback = self.config.fallback_url();
                let text = self.get(&fallback).await.map_err(|source| Error::Fetch {
                    url: fallback.clone(),
                    source,
                })?;

                Ok(Page {
                    text,
                    source: Source::Fallback,
                })
            }
            Err(source) => Err(Error::Fetch {
                url: primary.clone(),
                source,
            }),
        }
    }

    /// Download a page, invalid UTF-8 sequences are replaced
    async fn get(&self, url: &str) -> reqwest::Result<String> {
        log::info!("Fetching {url}");
        let body = self
            .client
            .get(url)
            .timeout(self.config.timeout)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            url: PRIMARY_URL.to_owned(),
            proxy: PROXY_URL.to_owned(),
            timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn fallback_wraps_primary() {
        let config = config();
        assert_eq!(
            config.fallback_url(),
            "https://r.jina.ai/https://czq.rth1.xyz/time"
        );
    }

    #[test]
    fn source_names() {
        assert_eq!(Source::Primary.to_string(), "primary");
        assert_eq!(Source::Fallback.to_string(), "fallback");
    }

    #[test]
    fn client_builds() {
        assert!(Fetcher::new(config()).is_ok());
    }
}
