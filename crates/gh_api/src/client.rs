use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid request url {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("transport failure for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected status {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("url template `{template}` expects {expected} arguments, got {got}")]
    Arity {
        template: String,
        expected: usize,
        got: usize,
    },
}

/// Substitutes `args` into `{}` placeholders in order. Running short of
/// arguments is a caller bug and fails loudly rather than producing a
/// truncated url; surplus arguments are ignored. Literal double quotes left
/// over from substitution are stripped; the upstream API has been seen
/// echoing quoted values back into redirect locations.
pub fn build_url(template: &str, args: &[&str]) -> Result<String, FetchError> {
    let expected = template.matches("{}").count();
    if args.len() < expected {
        return Err(FetchError::Arity {
            template: template.to_string(),
            expected,
            got: args.len(),
        });
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut args = args.iter();
    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        if let Some(arg) = args.next() {
            out.push_str(arg);
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    Ok(out.replace('"', ""))
}

/// Single outbound GET against the hosting API. No retry policy lives here;
/// callers decide whether a failure is worth another attempt.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn fetch(&self, template: &str, args: &[&str]) -> Result<String, FetchError>;
}

pub struct HttpRemoteClient {
    client: reqwest::Client,
}

impl HttpRemoteClient {
    pub fn new(user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .expect("reqwest client");
        Self { client }
    }
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn fetch(&self, template: &str, args: &[&str]) -> Result<String, FetchError> {
        let url = build_url(template, args)?;
        let parsed = Url::parse(&url).map_err(|source| FetchError::Url {
            url: url.clone(),
            source,
        })?;
        debug!(url = %parsed, "dispatching github request");

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status, url });
        }

        response
            .text()
            .await
            .map_err(|source| FetchError::Transport { url, source })
    }
}
