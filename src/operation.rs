//! Catalog of the business operations exposed by the Cloudbeds API.
//!
//! Every operation is a variant of [`Operation`] with a fixed [`Route`]; the
//! dispatcher [`CloudbedsClient::execute`] turns an operation plus its
//! parameters into one call (or one paginated fetch) and flattens the result
//! into items.

use crate::dates::validate_date_range;
use crate::error::{RestError, Result};
use crate::request::{Method, Query, Request};
use crate::rest::CloudbedsClient;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Business entity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Property,
    Reservation,
    Guest,
    Room,
    Calendar,
    Transaction,
    Housekeeping,
    Report,
    Channel,
}

impl Resource {
    pub const ALL: [Resource; 9] = [
        Resource::Property,
        Resource::Reservation,
        Resource::Guest,
        Resource::Room,
        Resource::Calendar,
        Resource::Transaction,
        Resource::Housekeeping,
        Resource::Report,
        Resource::Channel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Property => "property",
            Resource::Reservation => "reservation",
            Resource::Guest => "guest",
            Resource::Room => "room",
            Resource::Calendar => "calendar",
            Resource::Transaction => "transaction",
            Resource::Housekeeping => "housekeeping",
            Resource::Report => "report",
            Resource::Channel => "channel",
        }
    }

    /// Operations belonging to this resource, in catalog order
    pub fn operations(&self) -> Vec<Operation> {
        Operation::ALL
            .iter()
            .copied()
            .filter(|op| op.resource() == *self)
            .collect()
    }

    /// Look up an operation of this resource by its name, e.g. `"getAll"`
    pub fn operation(&self, name: &str) -> Result<Operation> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.resource() == *self && op.name() == name)
            .ok_or_else(|| {
                RestError::validation(format!("Unknown operation: {} for resource {}", name, self))
            })
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = RestError;

    fn from_str(s: &str) -> Result<Self> {
        Resource::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| RestError::validation(format!("Unknown resource: {}", s)))
    }
}

/// Where and how an operation is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub resource: Resource,
    /// Operation name within its resource
    pub name: &'static str,
    pub method: Method,
    pub endpoint: &'static str,
    /// Whether the endpoint returns a paginated list
    pub listing: bool,
}

/// Every operation the client knows how to route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetHotels,
    GetHotelDetails,
    GetRoomTypes,
    GetPropertyRooms,
    GetRatePlans,
    GetAmenities,

    CreateReservation,
    GetReservation,
    GetReservations,
    UpdateReservation,
    CancelReservation,
    GetReservationsByDates,
    GetReservationsByStatus,
    AddReservationNote,

    CreateGuest,
    GetGuest,
    GetGuests,
    UpdateGuest,
    SearchGuests,
    GetReservationGuests,

    GetRooms,
    GetRoomAvailability,
    AssignRoom,
    UnassignRoom,
    BlockRoom,
    UnblockRoom,
    SetRoomOutOfService,
    GetRoomHousekeeping,
    UpdateRoomHousekeeping,

    GetCalendar,
    UpdateCalendar,
    GetRates,
    UpdateRates,
    GetRestrictions,
    UpdateRestrictions,

    GetTransactions,
    AddPayment,
    AddCharge,
    VoidTransaction,
    GetInvoice,
    EmailInvoice,

    GetHousekeepingStatus,
    UpdateHousekeepingStatus,
    GetHousekeepingAssignments,
    CreateHousekeepingAssignment,

    GetOccupancyReport,
    GetRevenueReport,
    GetArrivalsDepartures,
    GetCustomReport,
    GetSavedReports,

    GetChannelConnections,
    GetChannelRateMappings,
    GetChannelInventoryMappings,
    SyncChannelAvailability,
    SyncChannelRates,
}

impl Operation {
    pub const ALL: [Operation; 55] = [
        Operation::GetHotels,
        Operation::GetHotelDetails,
        Operation::GetRoomTypes,
        Operation::GetPropertyRooms,
        Operation::GetRatePlans,
        Operation::GetAmenities,
        Operation::CreateReservation,
        Operation::GetReservation,
        Operation::GetReservations,
        Operation::UpdateReservation,
        Operation::CancelReservation,
        Operation::GetReservationsByDates,
        Operation::GetReservationsByStatus,
        Operation::AddReservationNote,
        Operation::CreateGuest,
        Operation::GetGuest,
        Operation::GetGuests,
        Operation::UpdateGuest,
        Operation::SearchGuests,
        Operation::GetReservationGuests,
        Operation::GetRooms,
        Operation::GetRoomAvailability,
        Operation::AssignRoom,
        Operation::UnassignRoom,
        Operation::BlockRoom,
        Operation::UnblockRoom,
        Operation::SetRoomOutOfService,
        Operation::GetRoomHousekeeping,
        Operation::UpdateRoomHousekeeping,
        Operation::GetCalendar,
        Operation::UpdateCalendar,
        Operation::GetRates,
        Operation::UpdateRates,
        Operation::GetRestrictions,
        Operation::UpdateRestrictions,
        Operation::GetTransactions,
        Operation::AddPayment,
        Operation::AddCharge,
        Operation::VoidTransaction,
        Operation::GetInvoice,
        Operation::EmailInvoice,
        Operation::GetHousekeepingStatus,
        Operation::UpdateHousekeepingStatus,
        Operation::GetHousekeepingAssignments,
        Operation::CreateHousekeepingAssignment,
        Operation::GetOccupancyReport,
        Operation::GetRevenueReport,
        Operation::GetArrivalsDepartures,
        Operation::GetCustomReport,
        Operation::GetSavedReports,
        Operation::GetChannelConnections,
        Operation::GetChannelRateMappings,
        Operation::GetChannelInventoryMappings,
        Operation::SyncChannelAvailability,
        Operation::SyncChannelRates,
    ];

    pub fn route(&self) -> Route {
        use Method::{Delete, Get, Post, Put};
        use Resource as R;

        let (resource, name, method, endpoint, listing) = match self {
            Operation::GetHotels => (R::Property, "getHotels", Get, "/getHotels", false),
            Operation::GetHotelDetails => (R::Property, "getHotelDetails", Get, "/getHotelDetails", false),
            Operation::GetRoomTypes => (R::Property, "getRoomTypes", Get, "/getRoomTypes", false),
            Operation::GetPropertyRooms => (R::Property, "getRooms", Get, "/getRooms", false),
            Operation::GetRatePlans => (R::Property, "getRatePlans", Get, "/getRatePlans", false),
            Operation::GetAmenities => (R::Property, "getAmenities", Get, "/getAmenities", false),

            Operation::CreateReservation => (R::Reservation, "create", Post, "/postReservation", false),
            Operation::GetReservation => (R::Reservation, "get", Get, "/getReservation", false),
            Operation::GetReservations => (R::Reservation, "getAll", Get, "/getReservations", true),
            Operation::UpdateReservation => (R::Reservation, "update", Put, "/putReservation", false),
            Operation::CancelReservation => (R::Reservation, "cancel", Put, "/putReservation", false),
            Operation::GetReservationsByDates => (R::Reservation, "getByDates", Get, "/getReservationsByDate", true),
            Operation::GetReservationsByStatus => (R::Reservation, "getByStatus", Get, "/getReservations", true),
            Operation::AddReservationNote => (R::Reservation, "addNote", Post, "/postReservationNote", false),

            Operation::CreateGuest => (R::Guest, "create", Post, "/postGuest", false),
            Operation::GetGuest => (R::Guest, "get", Get, "/getGuest", false),
            Operation::GetGuests => (R::Guest, "getAll", Get, "/getGuests", true),
            Operation::UpdateGuest => (R::Guest, "update", Put, "/putGuest", false),
            Operation::SearchGuests => (R::Guest, "search", Get, "/getGuestSearch", true),
            Operation::GetReservationGuests => (R::Guest, "getByReservation", Get, "/getReservationGuests", false),

            Operation::GetRooms => (R::Room, "getAll", Get, "/getRooms", true),
            Operation::GetRoomAvailability => (R::Room, "getAvailability", Get, "/getAvailableRoomTypes", false),
            Operation::AssignRoom => (R::Room, "assignRoom", Post, "/postRoomAssign", false),
            Operation::UnassignRoom => (R::Room, "unassignRoom", Post, "/postRoomUnassign", false),
            Operation::BlockRoom => (R::Room, "setBlocked", Post, "/postRoomBlock", false),
            Operation::UnblockRoom => (R::Room, "removeBlocked", Delete, "/deleteRoomBlock", false),
            Operation::SetRoomOutOfService => (R::Room, "setOutOfService", Post, "/postRoomOutOfService", false),
            Operation::GetRoomHousekeeping => (R::Room, "getHousekeeping", Get, "/getHousekeepingStatus", false),
            Operation::UpdateRoomHousekeeping => (R::Room, "updateHousekeeping", Put, "/putHousekeepingStatus", false),

            Operation::GetCalendar => (R::Calendar, "getCalendar", Get, "/getCalendar", false),
            Operation::UpdateCalendar => (R::Calendar, "updateCalendar", Put, "/putCalendar", false),
            Operation::GetRates => (R::Calendar, "getRates", Get, "/getRates", false),
            Operation::UpdateRates => (R::Calendar, "updateRates", Put, "/putRates", false),
            Operation::GetRestrictions => (R::Calendar, "getRestrictions", Get, "/getRestrictions", false),
            Operation::UpdateRestrictions => (R::Calendar, "updateRestrictions", Put, "/putRestrictions", false),

            Operation::GetTransactions => (R::Transaction, "getAll", Get, "/getTransactions", true),
            Operation::AddPayment => (R::Transaction, "addPayment", Post, "/postPayment", false),
            Operation::AddCharge => (R::Transaction, "addCharge", Post, "/postCharge", false),
            Operation::VoidTransaction => (R::Transaction, "voidTransaction", Post, "/postVoidTransaction", false),
            Operation::GetInvoice => (R::Transaction, "getInvoice", Get, "/getInvoice", false),
            Operation::EmailInvoice => (R::Transaction, "emailInvoice", Post, "/postEmailInvoice", false),

            Operation::GetHousekeepingStatus => (R::Housekeeping, "getStatus", Get, "/getHousekeepingStatus", true),
            Operation::UpdateHousekeepingStatus => (R::Housekeeping, "updateStatus", Put, "/putHousekeepingStatus", false),
            Operation::GetHousekeepingAssignments => (R::Housekeeping, "getAssignments", Get, "/getHousekeepingAssignments", true),
            Operation::CreateHousekeepingAssignment => (R::Housekeeping, "createAssignment", Post, "/postHousekeepingAssignment", false),

            Operation::GetOccupancyReport => (R::Report, "getOccupancy", Get, "/getOccupancyReport", false),
            Operation::GetRevenueReport => (R::Report, "getRevenue", Get, "/getRevenueReport", false),
            Operation::GetArrivalsDepartures => (R::Report, "getArrivalsDepartures", Get, "/getArrivalsDepartures", false),
            Operation::GetCustomReport => (R::Report, "getCustomReport", Get, "/getCustomReport", false),
            Operation::GetSavedReports => (R::Report, "getSavedReports", Get, "/getSavedReports", false),

            Operation::GetChannelConnections => (R::Channel, "getConnections", Get, "/getChannelConnections", true),
            Operation::GetChannelRateMappings => (R::Channel, "getRateMappings", Get, "/getChannelRateMappings", true),
            Operation::GetChannelInventoryMappings => (R::Channel, "getInventoryMappings", Get, "/getChannelInventoryMappings", true),
            Operation::SyncChannelAvailability => (R::Channel, "syncAvailability", Post, "/postChannelAvailabilitySync", false),
            Operation::SyncChannelRates => (R::Channel, "syncRates", Post, "/postChannelRatesSync", false),
        };

        Route {
            resource,
            name,
            method,
            endpoint,
            listing,
        }
    }

    pub fn resource(&self) -> Resource {
        self.route().resource
    }

    pub fn name(&self) -> &'static str {
        self.route().name
    }

    /// Parse a `(resource, operation)` name pair such as `("reservation", "getAll")`
    pub fn parse(resource: &str, name: &str) -> Result<Operation> {
        resource.parse::<Resource>()?.operation(name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource(), self.name())
    }
}

/// How a listing operation is fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    /// One plain call, server-side defaults apply
    #[default]
    Single,
    /// One call asking for at most this many items
    Limit(usize),
    /// Every page
    All,
}

/// Parameters for one operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    pub query: Query,
    pub body: Option<Value>,
    pub list: ListMode,
}

impl Params {
    pub fn query(query: Query) -> Self {
        Params {
            query,
            ..Params::default()
        }
    }

    pub fn body(body: Value) -> Self {
        Params {
            body: Some(body),
            ..Params::default()
        }
    }

    pub fn with_list(mut self, list: ListMode) -> Self {
        self.list = list;
        self
    }

    /// Look up a string parameter in the query first, then in the body
    fn lookup(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .and_then(Value::as_str)
            .or_else(|| self.body.as_ref()?.get(key)?.as_str())
            .filter(|v| !v.is_empty())
    }
}

impl CloudbedsClient {
    /// Run one catalog operation and flatten the result into items.
    ///
    /// Listing operations honour [`ListMode`]; other operations always make a
    /// single call. When both `startDate` and `endDate` are given, the range is
    /// validated before anything is sent.
    pub fn execute(&self, operation: Operation, params: Params) -> Result<Vec<Value>> {
        if let (Some(start), Some(end)) = (params.lookup("startDate"), params.lookup("endDate")) {
            validate_date_range(start, end)?;
        }

        let route = operation.route();
        let mut body = params.body;

        if operation == Operation::CancelReservation {
            let mut object = match body {
                Some(Value::Object(map)) => map,
                Some(_) => {
                    return Err(RestError::validation("cancel expects a JSON object body"));
                }
                None => Map::new(),
            };
            object.insert("status".to_string(), Value::String("canceled".to_string()));
            body = Some(Value::Object(object));
        }

        let request = Request {
            method: route.method,
            endpoint: route.endpoint.to_string(),
            body,
            query: params.query,
        };

        debug!(%operation, list = ?params.list, "executing operation");

        match (route.listing, params.list) {
            (true, ListMode::All) => self.fetch_all(&request),
            (true, ListMode::Limit(limit)) => Ok(self.fetch_page(&request, limit)?.into_items()),
            _ => Ok(self.request(&request)?.into_items()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Config;
    use crate::credential::Credential;
    use crate::transport::mock::MockTransport;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn client(mock: &MockTransport) -> CloudbedsClient {
        CloudbedsClient::with_transport(
            Credential::api_key("K"),
            Config::default(),
            Arc::new(mock.clone()),
        )
    }

    #[test]
    fn test_catalog_is_consistent() {
        let mut seen = HashSet::new();
        for op in Operation::ALL {
            let route = op.route();
            assert!(route.endpoint.starts_with('/'), "{} endpoint", op);
            assert!(seen.insert((route.resource, route.name)), "duplicate {}", op);
            assert_eq!(Operation::parse(route.resource.as_str(), route.name).unwrap(), op);
        }

        let per_resource: usize = Resource::ALL.iter().map(|r| r.operations().len()).sum();
        assert_eq!(per_resource, Operation::ALL.len());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            Operation::parse("reservation", "getAll").unwrap(),
            Operation::GetReservations
        );
        assert_eq!(Operation::parse("room", "getAll").unwrap(), Operation::GetRooms);
        assert_eq!(
            Operation::parse("property", "getRooms").unwrap(),
            Operation::GetPropertyRooms
        );

        assert!(Operation::parse("spa", "getAll").unwrap_err().is_validation());
        assert!(Operation::parse("guest", "delete").unwrap_err().is_validation());
    }

    #[test]
    fn test_single_call_flattens_array() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"success": true, "data": [{"roomTypeID": "a"}, {"roomTypeID": "b"}]}));

        let items = client(&mock)
            .execute(
                Operation::GetRoomTypes,
                Params::query(Query::new().with("propertyID", "1")),
            )
            .unwrap();

        assert_eq!(items.len(), 2);
        let sent = &mock.requests()[0];
        assert_eq!(sent.url.path(), "/api/v1.2/getRoomTypes");
        assert_eq!(sent.query_param("propertyID"), Some("1".to_string()));
    }

    #[test]
    fn test_return_all_paginates() {
        let mock = MockTransport::new();
        let full: Vec<Value> = (0..100).map(|i| json!({"guestID": i})).collect();
        mock.push_json(200, json!({"success": true, "data": full}));
        mock.push_json(200, json!({"success": true, "data": [{"guestID": 100}]}));

        let items = client(&mock)
            .execute(
                Operation::GetGuests,
                Params::query(Query::new().with("propertyID", "1")).with_list(ListMode::All),
            )
            .unwrap();

        assert_eq!(items.len(), 101);
        assert_eq!(mock.requests().len(), 2);
    }

    #[test]
    fn test_limit_sets_page_size() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"success": true, "data": [{"transactionID": "t"}]}));

        client(&mock)
            .execute(
                Operation::GetTransactions,
                Params::default().with_list(ListMode::Limit(25)),
            )
            .unwrap();

        assert_eq!(mock.requests()[0].query_param("pageSize"), Some("25".to_string()));
    }

    #[test]
    fn test_list_mode_ignored_for_non_listing() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"success": true, "data": {"propertyID": "1"}}));

        client(&mock)
            .execute(
                Operation::GetHotelDetails,
                Params::default().with_list(ListMode::Limit(5)),
            )
            .unwrap();

        assert_eq!(mock.requests()[0].query_param("pageSize"), None);
    }

    #[test]
    fn test_cancel_sets_status() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"success": true}));

        let items = client(&mock)
            .execute(
                Operation::CancelReservation,
                Params::body(json!({"reservationID": "R1"})),
            )
            .unwrap();

        // No data: the envelope itself is the item
        assert_eq!(items, vec![json!({"success": true})]);

        let sent = &mock.requests()[0];
        assert_eq!(sent.method, Method::Put);
        let body: Value = serde_json::from_slice(sent.body.as_ref().unwrap()).unwrap();
        assert_eq!(body, json!({"reservationID": "R1", "status": "canceled"}));
    }

    #[test]
    fn test_inverted_date_range_fails_before_sending() {
        let mock = MockTransport::new();

        let err = client(&mock)
            .execute(
                Operation::GetReservationsByDates,
                Params::query(
                    Query::new()
                        .with("propertyID", "1")
                        .with("startDate", "2024-02-10")
                        .with("endDate", "2024-01-01"),
                ),
            )
            .unwrap_err();

        assert!(err.is_validation());
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_date_range_checked_in_body() {
        let mock = MockTransport::new();

        let err = client(&mock)
            .execute(
                Operation::UpdateRates,
                Params::body(json!({"startDate": "bad", "endDate": "2024-01-01", "rate": 120})),
            )
            .unwrap_err();

        assert!(err.is_validation());
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_delete_sends_body() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"success": true}));

        client(&mock)
            .execute(
                Operation::UnblockRoom,
                Params::body(json!({"propertyID": "1", "roomID": "101"})),
            )
            .unwrap();

        let sent = &mock.requests()[0];
        assert_eq!(sent.method, Method::Delete);
        assert!(sent.body.is_some());
    }
}
