use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, ScrapeError};

/// Page and asset retrieval used by both crawls.
pub trait Fetch: Send + Sync {
    fn get_text(&self, url: &str) -> Result<String>;
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let redirect_policy = redirect::Policy::custom(|attempt| {
            if attempt.previous().len() > Config::MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else if attempt.url().scheme() != "https" && attempt.url().scheme() != "http" {
                attempt.stop()
            } else {
                attempt.follow()
            }
        });

        let client = Client::builder()
            .redirect(redirect_policy)
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    fn send(&self, url: &str) -> Result<reqwest::blocking::Response> {
        debug!(url, "GET");
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp)
    }
}

impl Fetch for HttpFetcher {
    fn get_text(&self, url: &str) -> Result<String> {
        Ok(self.send(url)?.text()?)
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        Ok(self.send(url)?.bytes()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::runtime::Runtime;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const UA: &str = "catalog-test/1.0";

    // server is declared first so it shuts down before its runtime
    struct Site {
        server: MockServer,
        rt: Runtime,
    }

    impl Site {
        fn start() -> Self {
            let rt = Runtime::new().unwrap();
            let server = rt.block_on(MockServer::start());
            Self { server, rt }
        }

        fn mount(&self, mock: Mock) {
            self.rt.block_on(mock.mount(&self.server));
        }

        fn url(&self, p: &str) -> String {
            format!("{}{}", self.server.uri(), p)
        }

        /// `/{prefix}/0` redirects `hops` times before landing on a 200.
        fn redirect_chain(&self, prefix: &str, hops: usize) {
            for i in 0..hops {
                self.mount(
                    Mock::given(method("GET"))
                        .and(path(format!("/{prefix}/{i}")))
                        .respond_with(
                            ResponseTemplate::new(302).insert_header("Location", format!("/{prefix}/{}", i + 1)),
                        ),
                );
            }
            self.mount(
                Mock::given(method("GET"))
                    .and(path(format!("/{prefix}/{hops}")))
                    .respond_with(ResponseTemplate::new(200).set_body_string("landed")),
            );
        }
    }

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(UA, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn non_success_status_is_an_error() {
        let site = Site::start();
        let url = site.url("/missing");

        match fetcher().get_text(&url) {
            Err(ScrapeError::Status { status, url: failed }) => {
                assert_eq!(status, 404);
                assert_eq!(failed, url);
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert!(matches!(
            fetcher().get_bytes(&url),
            Err(ScrapeError::Status { status: 404, .. })
        ));
    }

    #[test]
    fn sends_configured_user_agent() {
        let site = Site::start();
        site.mount(
            Mock::given(method("GET"))
                .and(path("/ua"))
                .and(header("user-agent", UA))
                .respond_with(ResponseTemplate::new(200).set_body_string("ok")),
        );

        let fetcher = fetcher();
        assert_eq!(fetcher.get_text(&site.url("/ua")).unwrap(), "ok");
        assert_eq!(fetcher.get_bytes(&site.url("/ua")).unwrap(), b"ok");
    }

    #[test]
    fn follows_ten_redirects() {
        let site = Site::start();
        site.redirect_chain("short", Config::MAX_REDIRECTS);

        assert_eq!(fetcher().get_text(&site.url("/short/0")).unwrap(), "landed");
    }

    #[test]
    fn gives_up_after_ten_redirects() {
        let site = Site::start();
        site.redirect_chain("long", Config::MAX_REDIRECTS + 1);

        assert!(matches!(
            fetcher().get_text(&site.url("/long/0")),
            Err(ScrapeError::Http(_))
        ));
    }
}
