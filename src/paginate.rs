use crate::error::Result;
use crate::request::{Query, Request};
use crate::response::{is_truthy, Envelope};
use crate::rest::CloudbedsClient;
use serde_json::Value;
use tracing::{debug, warn};

/// Items requested per page by [`CloudbedsClient::fetch_all`]
pub const PAGE_SIZE: usize = 100;

const PAGE_NUMBER_PARAM: &str = "pageNumber";
const PAGE_SIZE_PARAM: &str = "pageSize";

impl CloudbedsClient {
    /// Fetch every item of a listing endpoint.
    ///
    /// Pages are requested one after the other starting at `pageNumber=0`
    /// with `pageSize=100`. Fetching continues while the last page was a full
    /// array and the accumulated count is still below `total` (when the
    /// server reports one). A non-array `data` is returned as the single item
    /// and ends the fetch.
    ///
    /// A server that keeps returning full pages without `total` is followed
    /// until it returns a short page, unless [`Config::max_pages`] is set.
    ///
    /// Any failing page fails the whole call; no partial result is returned.
    ///
    /// [`Config::max_pages`]: crate::client::Config::max_pages
    pub fn fetch_all(&self, request: &Request) -> Result<Vec<Value>> {
        let mut items: Vec<Value> = Vec::new();
        let mut page_number: u32 = 0;

        loop {
            let envelope = self.request(&with_paging(request, page_number, PAGE_SIZE))?;
            let total = envelope.total;

            let (full_page, single) = match envelope.data {
                Some(Value::Array(page)) => {
                    let len = page.len();
                    items.extend(page);
                    (len == PAGE_SIZE, false)
                }
                Some(data) if is_truthy(&data) => {
                    items.push(data);
                    (false, true)
                }
                _ => (false, false),
            };

            debug!(
                endpoint = %request.endpoint,
                page = page_number,
                accumulated = items.len(),
                ?total,
                "fetched page"
            );

            if single {
                break;
            }

            page_number += 1;

            let below_total = total.map_or(true, |t| (items.len() as u64) < t);
            if !(full_page && below_total) {
                break;
            }

            if let Some(max_pages) = self.config().max_pages {
                if page_number >= max_pages {
                    warn!(
                        endpoint = %request.endpoint,
                        max_pages,
                        accumulated = items.len(),
                        "page limit reached, stopping before the listing was exhausted"
                    );
                    break;
                }
            }
        }

        Ok(items)
    }

    /// Fetch only the first page, sized to `limit`
    pub fn fetch_page(&self, request: &Request, limit: usize) -> Result<Envelope> {
        let mut limited = request.clone();
        limited.query.insert(PAGE_SIZE_PARAM, limit);
        self.request(&limited)
    }
}

fn with_paging(request: &Request, page_number: u32, page_size: usize) -> Request {
    let mut paged = request.clone();
    paged.query.merge(
        &Query::new()
            .with(PAGE_NUMBER_PARAM, page_number)
            .with(PAGE_SIZE_PARAM, page_size),
    );
    paged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Config;
    use crate::credential::Credential;
    use crate::transport::mock::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn page(start: usize, len: usize) -> Value {
        Value::Array((start..start + len).map(|i| json!({"id": i})).collect())
    }

    fn client(mock: &MockTransport, config: Config) -> CloudbedsClient {
        CloudbedsClient::with_transport(Credential::api_key("K"), config, Arc::new(mock.clone()))
    }

    fn page_numbers(mock: &MockTransport) -> Vec<String> {
        mock.requests()
            .iter()
            .map(|r| r.query_param("pageNumber").unwrap())
            .collect()
    }

    #[test]
    fn test_accumulates_until_short_page() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"success": true, "data": page(0, 100)}));
        mock.push_json(200, json!({"success": true, "data": page(100, 100)}));
        mock.push_json(200, json!({"success": true, "data": page(200, 37)}));

        let items = client(&mock, Config::default())
            .fetch_all(&Request::get("/getGuests").param("propertyID", "1"))
            .unwrap();

        assert_eq!(items.len(), 237);
        assert_eq!(items[0], json!({"id": 0}));
        assert_eq!(items[236], json!({"id": 236}));
        assert_eq!(page_numbers(&mock), vec!["0", "1", "2"]);

        for request in mock.requests() {
            assert_eq!(request.query_param("pageSize"), Some("100".to_string()));
            assert_eq!(request.query_param("propertyID"), Some("1".to_string()));
        }
    }

    #[test]
    fn test_stops_on_short_page_with_total() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"success": true, "data": page(0, 100), "total": 150}));
        mock.push_json(200, json!({"success": true, "data": page(100, 50), "total": 150}));

        let items = client(&mock, Config::default())
            .fetch_all(&Request::get("/getReservations"))
            .unwrap();

        assert_eq!(items.len(), 150);
        assert_eq!(mock.requests().len(), 2);
    }

    #[test]
    fn test_stops_when_total_reached_on_full_page() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"success": true, "data": page(0, 100), "total": 200}));
        mock.push_json(200, json!({"success": true, "data": page(100, 100), "total": 200}));

        let items = client(&mock, Config::default())
            .fetch_all(&Request::get("/getReservations"))
            .unwrap();

        assert_eq!(items.len(), 200);
        assert_eq!(mock.requests().len(), 2);
    }

    #[test]
    fn test_single_object_is_one_item() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"success": true, "data": {"propertyID": "1"}}));

        let items = client(&mock, Config::default())
            .fetch_all(&Request::get("/getHotelDetails"))
            .unwrap();

        assert_eq!(items, vec![json!({"propertyID": "1"})]);
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn test_missing_data_ends_fetch() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"success": true}));

        let items = client(&mock, Config::default())
            .fetch_all(&Request::get("/getTransactions"))
            .unwrap();

        assert!(items.is_empty());
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn test_falsy_scalar_data_is_not_an_item() {
        for data in [json!(false), json!(""), json!(0)] {
            let mock = MockTransport::new();
            mock.push_json(200, json!({"success": true, "data": data.clone()}));

            let items = client(&mock, Config::default())
                .fetch_all(&Request::get("/getHotelDetails"))
                .unwrap();

            assert!(items.is_empty(), "data {} was kept", data);
            assert_eq!(mock.requests().len(), 1);
        }
    }

    #[test]
    fn test_page_failure_discards_accumulation() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"success": true, "data": page(0, 100)}));
        mock.push_json(200, json!({"success": false, "message": "Rate limited"}));

        let err = client(&mock, Config::default())
            .fetch_all(&Request::get("/getGuests"))
            .unwrap_err();

        assert!(err.is_api());
        assert_eq!(mock.requests().len(), 2);
    }

    #[test]
    fn test_caller_paging_params_are_overridden() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"success": true, "data": page(0, 3)}));

        client(&mock, Config::default())
            .fetch_all(
                &Request::get("/getRooms")
                    .param("pageSize", 5)
                    .param("pageNumber", 9),
            )
            .unwrap();

        let sent = &mock.requests()[0];
        assert_eq!(sent.query_param("pageSize"), Some("100".to_string()));
        assert_eq!(sent.query_param("pageNumber"), Some("0".to_string()));
    }

    #[test]
    fn test_max_pages_caps_unbounded_listing() {
        let mock = MockTransport::new();
        for i in 0..3 {
            mock.push_json(200, json!({"success": true, "data": page(i * 100, 100)}));
        }

        let items = client(&mock, Config::default().with_max_pages(2))
            .fetch_all(&Request::get("/getGuests"))
            .unwrap();

        assert_eq!(items.len(), 200);
        assert_eq!(page_numbers(&mock), vec!["0", "1"]);
    }

    #[test]
    fn test_fetch_page_uses_limit() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"success": true, "data": page(0, 10)}));

        let envelope = client(&mock, Config::default())
            .fetch_page(&Request::get("/getGuests").param("propertyID", "1"), 10)
            .unwrap();

        assert_eq!(envelope.into_items().len(), 10);
        let sent = &mock.requests()[0];
        assert_eq!(sent.query_param("pageSize"), Some("10".to_string()));
        assert_eq!(sent.query_param("pageNumber"), None);
    }
}
