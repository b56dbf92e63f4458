use crate::core::candidate::Candidate;
use crate::store::error::FetchError;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::time::Duration;

/// Where candidate lists come from. Called from a worker thread.
pub trait DataSource<C>: Send + Sync {
    fn fetch(&self) -> Result<Vec<C>, FetchError>;

    fn describe(&self) -> String {
        "data source".to_string()
    }
}

/// `GET {base_url}/{endpoint}` returning a JSON array of records.
pub struct HttpDataSource<C> {
    agent: ureq::Agent,
    url: String,
    _record: PhantomData<fn() -> C>,
}

impl<C> HttpDataSource<C> {
    pub fn new(base_url: &str, endpoint: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            url: join_url(base_url, endpoint),
            _record: PhantomData,
        }
    }
}

impl<C> DataSource<C> for HttpDataSource<C>
where
    C: Candidate + DeserializeOwned,
{
    fn fetch(&self) -> Result<Vec<C>, FetchError> {
        let response = match self.agent.get(&self.url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                return Err(FetchError::Status {
                    code,
                    status_text: response.status_text().to_string(),
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(FetchError::Transport(transport.to_string()));
            }
        };

        let code = response.status();
        if !(200..300).contains(&code) {
            return Err(FetchError::Status {
                code,
                status_text: response.status_text().to_string(),
            });
        }

        let body = response
            .into_string()
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        decode_candidates(&body)
    }

    fn describe(&self) -> String {
        format!("GET {}", self.url)
    }
}

/// Fixed in-memory list, optionally delivered after a delay.
pub struct StaticDataSource<C> {
    items: Vec<C>,
    delay: Option<Duration>,
}

impl<C> StaticDataSource<C> {
    pub fn new(items: Vec<C>) -> Self {
        Self { items, delay: None }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl<C: Candidate> DataSource<C> for StaticDataSource<C> {
    fn fetch(&self) -> Result<Vec<C>, FetchError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        Ok(self.items.clone())
    }

    fn describe(&self) -> String {
        format!("static list of {} records", self.items.len())
    }
}

pub fn decode_candidates<C: DeserializeOwned>(body: &str) -> Result<Vec<C>, FetchError> {
    serde_json::from_str(body).map_err(|err| FetchError::Decode(err.to_string()))
}

fn join_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
