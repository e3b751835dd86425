//! Member search.

use serde_json::Value;

use crate::error::Result;
use crate::http_client::HttpClient;
use crate::params::Params;
use crate::resource::{ResourceApi, ResourceDescriptor};

/// Results per search; the service caps member search at 20.
pub const LIMIT: i64 = 20;

pub static SEARCH_MEMBERS: ResourceDescriptor =
    ResourceDescriptor::new("member search", "search/members");

#[derive(Debug, Clone, Copy)]
pub struct MemberSearchApi<'a> {
    api: ResourceApi<'a>,
}

impl<'a> MemberSearchApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self {
            api: ResourceApi::new(http, &SEARCH_MEMBERS),
        }
    }

    /// GET `search/members/?query=...&limit=20`. `query` and `limit`
    /// override the same keys in `params`.
    pub fn search(&self, query: &str, params: &Params) -> Result<Value> {
        let params = params.clone().with("query", query).with("limit", LIMIT);
        self.api.get(&format!("{}/", self.api.get_path(None)), &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::mock::MockTransport;
    use serde_json::json;

    #[test]
    fn search_forces_limit() {
        let mock = MockTransport::new();
        let http = HttpClient::with_transport(&ClientConfig::default(), mock.clone());
        mock.push_json(200, json!([{"id": "m1", "username": "ada"}]));

        let found = MemberSearchApi::new(&http)
            .search("ada", &Params::new().with("limit", 100).with("idBoard", "b1"))
            .unwrap();
        assert_eq!(found[0]["username"], "ada");

        let req = mock.last_request().unwrap();
        assert!(req.url.starts_with("https://api.trello.com/1/search/members/?"));
        assert_eq!(
            req.query_pairs(),
            vec![
                ("limit".to_string(), "20".to_string()),
                ("idBoard".to_string(), "b1".to_string()),
                ("query".to_string(), "ada".to_string()),
            ]
        );
    }
}
