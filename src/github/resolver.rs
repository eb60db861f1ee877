//! Commit-search identity resolution over sync HTTP (no async runtime)

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::debug;

use super::LookupError;

/// Default API host; override for GitHub Enterprise or tests.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Accept header the commit-search preview API requires.
const SEARCH_ACCEPT: &str = "application/vnd.github.cloak-preview+json";

const USER_AGENT: &str = concat!("bylines/", env!("CARGO_PKG_VERSION"));

/// A GitHub profile matched to a committer email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub avatar_url: String,
    pub profile_url: String,
    pub id: u64,
}

/// Outcome of one identity lookup.
///
/// `NotFound` and `Failed` are both "no usable identity" to aggregation,
/// but stay distinguishable so hosts can report them differently.
#[derive(Debug)]
pub enum Resolution {
    /// The email matched a GitHub profile.
    Found(Identity),
    /// The search succeeded but matched no profile.
    NotFound,
    /// The lookup could not be completed.
    Failed(LookupError),
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    /// The matched profile, when there is one.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Resolution::Found(identity) => Some(identity),
            _ => None,
        }
    }
}

/// Resolves committer emails against the GitHub commit-search API.
pub struct IdentityResolver {
    agent: ureq::Agent,
    api_url: String,
    token: Option<String>,
}

fn make_agent() -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // status codes are handled by the caller
        .timeout_global(Some(Duration::from_secs(30)))
        .build()
        .new_agent()
}

impl IdentityResolver {
    /// Create a resolver against `api_url` with no credentials.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            agent: make_agent(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Create a resolver, picking up a bearer token from `GITHUB_TOKEN`
    /// when set. Anonymous lookups work too, under stricter rate limits.
    pub fn from_env(api_url: impl Into<String>) -> Self {
        let token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
        let mut resolver = Self::new(api_url);
        resolver.token = token;
        resolver
    }

    /// Attach a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Resolve a committer email to a GitHub profile.
    ///
    /// One synchronous attempt per call; results are never cached, so two
    /// calls with the same email perform two lookups. The query strips
    /// single quotes from the email (they cannot appear in a search
    /// qualifier) and URL-encodes everything else.
    pub fn resolve(&self, email: &str) -> Resolution {
        let email = sanitize_email(email);
        debug!("looking up GitHub identity for {}", email);

        let url = format!("{}/search/commits", self.api_url);
        let mut request = self
            .agent
            .get(&url)
            .header("Accept", SEARCH_ACCEPT)
            .header("User-Agent", USER_AGENT)
            .query("q", &format!("author-email:{email}"));

        if let Some(token) = &self.token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }

        let response = match request.call() {
            Ok(resp) => resp,
            Err(e) => {
                debug!("commit search failed for {}: {}", email, e);
                return Resolution::Failed(LookupError::Transport(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!("commit search for {} returned {}", email, status);
            return Resolution::Failed(LookupError::Status(status.as_u16()));
        }

        let result: SearchResponse = match response.into_body().read_json() {
            Ok(parsed) => parsed,
            Err(e) => return Resolution::Failed(LookupError::Parse(e.to_string())),
        };

        match result.items.into_iter().next().and_then(|item| item.committer) {
            Some(user) => {
                debug!("matched {} to GitHub user {}", email, user.login);
                Resolution::Found(Identity {
                    username: user.login,
                    avatar_url: user.avatar_url,
                    profile_url: user.html_url,
                    id: user.id,
                })
            }
            None => Resolution::NotFound,
        }
    }

    /// Probe the API host with a single GET; returns the HTTP status.
    /// Any response at all (even an error status) proves reachability.
    pub fn ping(&self) -> Result<u16, LookupError> {
        let response = self
            .agent
            .get(&format!("{}/", self.api_url))
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}

/// The search qualifier cannot hold single quotes; everything else is left
/// to URL encoding when the query string is built.
fn sanitize_email(email: &str) -> String {
    email.replace('\'', "")
}

// Commit-search wire types (the slice of the response this crate reads).

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    committer: Option<CommitterUser>,
}

#[derive(Deserialize)]
struct CommitterUser {
    login: String,
    avatar_url: String,
    html_url: String,
    id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn found_body(login: &str, id: u64) -> String {
        serde_json::json!({
            "total_count": 1,
            "items": [{
                "sha": "0123abcd",
                "committer": {
                    "login": login,
                    "avatar_url": format!("https://avatars.example.com/{id}"),
                    "html_url": format!("https://github.com/{login}"),
                    "id": id,
                }
            }]
        })
        .to_string()
    }

    fn empty_body() -> String {
        serde_json::json!({ "total_count": 0, "items": [] }).to_string()
    }

    fn query_matcher(email: &str) -> Matcher {
        Matcher::UrlEncoded("q".into(), format!("author-email:{email}"))
    }

    #[test]
    fn maps_first_committer_to_identity() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/search/commits")
            .match_query(query_matcher("alice@example.com"))
            .match_header("accept", SEARCH_ACCEPT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(found_body("alice", 42))
            .create();

        let resolver = IdentityResolver::new(server.url());
        match resolver.resolve("alice@example.com") {
            Resolution::Found(identity) => {
                assert_eq!(identity.username, "alice");
                assert_eq!(identity.profile_url, "https://github.com/alice");
                assert_eq!(identity.id, 42);
            }
            other => panic!("expected Found, got {:?}", other),
        }
        mock.assert();
    }

    #[test]
    fn empty_items_is_not_found() {
        let mut server = Server::new();
        server
            .mock("GET", "/search/commits")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(empty_body())
            .create();

        let resolver = IdentityResolver::new(server.url());
        assert!(matches!(
            resolver.resolve("ghost@example.com"),
            Resolution::NotFound
        ));
    }

    #[test]
    fn missing_committer_record_is_not_found() {
        let mut server = Server::new();
        server
            .mock("GET", "/search/commits")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "total_count": 1,
                    "items": [{ "sha": "0123abcd", "committer": null }]
                })
                .to_string(),
            )
            .create();

        let resolver = IdentityResolver::new(server.url());
        assert!(matches!(
            resolver.resolve("detached@example.com"),
            Resolution::NotFound
        ));
    }

    #[test]
    fn error_status_is_failed() {
        let mut server = Server::new();
        server
            .mock("GET", "/search/commits")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create();

        let resolver = IdentityResolver::new(server.url());
        match resolver.resolve("alice@example.com") {
            Resolution::Failed(LookupError::Status(500)) => {}
            other => panic!("expected Failed(Status(500)), got {:?}", other),
        }
    }

    #[test]
    fn unreachable_host_is_failed() {
        // Nothing listens on port 1.
        let resolver = IdentityResolver::new("http://127.0.0.1:1");
        match resolver.resolve("alice@example.com") {
            Resolution::Failed(LookupError::Transport(_)) => {}
            other => panic!("expected Failed(Transport), got {:?}", other),
        }
    }

    #[test]
    fn unparseable_body_is_failed() {
        let mut server = Server::new();
        server
            .mock("GET", "/search/commits")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json at all")
            .create();

        let resolver = IdentityResolver::new(server.url());
        assert!(matches!(
            resolver.resolve("alice@example.com"),
            Resolution::Failed(LookupError::Parse(_))
        ));
    }

    #[test]
    fn single_quotes_are_stripped_from_query() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/search/commits")
            .match_query(query_matcher("obrien@example.com"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(empty_body())
            .create();

        let resolver = IdentityResolver::new(server.url());
        resolver.resolve("o'brien@example.com");
        mock.assert();
    }

    #[test]
    fn special_characters_are_url_encoded() {
        // Ampersands and spaces must ride inside the q value, not split it.
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/search/commits")
            .match_query(query_matcher("devs&ops team@example.com"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(empty_body())
            .create();

        let resolver = IdentityResolver::new(server.url());
        resolver.resolve("devs&ops team@example.com");
        mock.assert();
    }

    #[test]
    fn repeated_lookups_are_not_cached() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/search/commits")
            .match_query(query_matcher("alice@example.com"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(found_body("alice", 42))
            .expect(2)
            .create();

        let resolver = IdentityResolver::new(server.url());
        assert!(resolver.resolve("alice@example.com").is_found());
        assert!(resolver.resolve("alice@example.com").is_found());
        mock.assert();
    }

    #[test]
    fn ping_reports_reachability() {
        let mut server = Server::new();
        server.mock("GET", "/").with_status(200).create();

        let resolver = IdentityResolver::new(server.url());
        assert_eq!(resolver.ping().expect("ping"), 200);

        let unreachable = IdentityResolver::new("http://127.0.0.1:1");
        assert!(unreachable.ping().is_err());
    }
}
