use crate::source::{ImageProbe, ProbeOutcome};
use crate::{ProbeError, Result};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "logomark";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4);

#[cfg(feature = "http-probe")]
mod imp {
    use super::{ImageProbe, ProbeError, ProbeOutcome, Result, DEFAULT_USER_AGENT};
    use reqwest::blocking::Client;
    use reqwest::header::{ACCEPT, CONTENT_TYPE};
    use std::time::Duration;
    use tracing::debug;
    use url::Url;

    #[derive(Debug, Clone)]
    pub struct HttpProbe {
        client: Client,
    }

    impl HttpProbe {
        /// `timeout` bounds each provider attempt; an expired attempt
        /// reports [`ProbeOutcome::TimedOut`].
        pub fn new(timeout: Duration, user_agent: Option<&str>) -> Result<Self> {
            if timeout.is_zero() {
                return Err(ProbeError::InvalidSetting(
                    "timeout must be positive".to_string(),
                ));
            }
            let client = Client::builder()
                .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
                .timeout(timeout)
                .connect_timeout(timeout)
                .build()?;
            Ok(Self { client })
        }
    }

    impl ImageProbe for HttpProbe {
        fn probe_name(&self) -> &'static str {
            "http"
        }

        fn probe(&self, url: &str) -> ProbeOutcome {
            let parsed = match Url::parse(url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => parsed,
                Ok(parsed) => {
                    debug!(url, scheme = parsed.scheme(), "unsupported logo url scheme");
                    return ProbeOutcome::Failed;
                }
                Err(err) => {
                    debug!(url, error = %err, "invalid logo url");
                    return ProbeOutcome::Failed;
                }
            };

            let response = match self
                .client
                .get(parsed)
                .header(ACCEPT, "image/*")
                .send()
            {
                Ok(response) => response,
                Err(err) if err.is_timeout() => return ProbeOutcome::TimedOut,
                Err(err) => {
                    debug!(url, error = %err, "logo request failed");
                    return ProbeOutcome::Failed;
                }
            };

            let status = response.status();
            if !status.is_success() {
                debug!(url, status = status.as_u16(), "logo provider returned error status");
                return ProbeOutcome::Failed;
            }
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();
            if is_image_content_type(content_type) {
                ProbeOutcome::Loaded
            } else {
                debug!(url, content_type, "logo provider returned non-image body");
                ProbeOutcome::Failed
            }
        }
    }

    pub(super) fn is_image_content_type(value: &str) -> bool {
        value
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }

    #[cfg(test)]
    mod tests {
        use super::{is_image_content_type, HttpProbe};
        use crate::source::{ImageProbe, ProbeOutcome};
        use std::time::Duration;

        #[test]
        fn image_content_types_are_detected() {
            assert!(is_image_content_type("image/png"));
            assert!(is_image_content_type(" Image/SVG+xml; charset=utf-8"));
            assert!(!is_image_content_type("text/html"));
            assert!(!is_image_content_type(""));
        }

        #[test]
        fn zero_timeout_is_rejected() {
            assert!(HttpProbe::new(Duration::ZERO, None).is_err());
        }

        #[test]
        fn non_http_urls_fail_without_network() {
            let probe = HttpProbe::new(Duration::from_secs(1), None).expect("probe");
            assert_eq!(probe.probe("ftp://logos.example/a.png"), ProbeOutcome::Failed);
            assert_eq!(probe.probe("not a url"), ProbeOutcome::Failed);
        }
    }
}

#[cfg(not(feature = "http-probe"))]
mod imp {
    use super::{ImageProbe, ProbeError, ProbeOutcome, Result};
    use std::time::Duration;

    #[derive(Debug, Clone)]
    pub struct HttpProbe {
        _private: (),
    }

    impl HttpProbe {
        pub fn new(_timeout: Duration, _user_agent: Option<&str>) -> Result<Self> {
            Err(ProbeError::Unavailable(
                "logo probing requires the http-probe feature".to_string(),
            ))
        }
    }

    impl ImageProbe for HttpProbe {
        fn probe_name(&self) -> &'static str {
            "http"
        }

        fn probe(&self, _url: &str) -> ProbeOutcome {
            ProbeOutcome::Failed
        }
    }
}

pub use imp::HttpProbe;
