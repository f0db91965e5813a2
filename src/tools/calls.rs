//! Typed view of the tool calls the model may request.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{ListingCategory, OperationKind};
use crate::stores::ListingFilter;

/// One validated tool call. Argument structs mirror the schemas in
/// [`tool_definitions`](super::tool_definitions); required fields are
/// enforced by deserialization.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    SearchListings(SearchListingsArgs),
    GetListingDetail(GetListingDetailArgs),
    ScheduleVisit(ScheduleVisitArgs),
    SaveLead(SaveLeadArgs),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchListingsArgs {
    #[serde(rename = "type")]
    pub category: Option<ListingCategory>,
    pub operation: Option<OperationKind>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub location: Option<String>,
    pub rooms: Option<i64>,
    pub bathrooms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GetListingDetailArgs {
    pub listing_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduleVisitArgs {
    pub listing_id: String,
    pub client_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaveLeadArgs {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub preferences: Option<Value>,
}

impl ToolCall {
    /// Resolve a raw (name, input) pair from a `tool_use` block. Unknown
    /// names and malformed arguments come back as error strings suitable
    /// for a failure payload.
    pub fn parse(name: &str, input: Value) -> Result<Self, String> {
        match name {
            "search_listings" => args(name, input).map(Self::SearchListings),
            "get_listing_detail" => args(name, input).map(Self::GetListingDetail),
            "schedule_visit" => args(name, input).map(Self::ScheduleVisit),
            "save_lead" => args(name, input).map(Self::SaveLead),
            other => Err(format!("unknown tool '{other}'")),
        }
    }
}

fn args<T: DeserializeOwned>(tool: &str, input: Value) -> Result<T, String> {
    serde_json::from_value(input).map_err(|e| format!("invalid arguments for {tool}: {e}"))
}

impl SearchListingsArgs {
    pub fn into_filter(self) -> ListingFilter {
        ListingFilter {
            category: self.category,
            operation: self.operation,
            price_min: self.price_min,
            price_max: self.price_max,
            location: self.location,
            rooms: self.rooms,
            bathrooms: self.bathrooms,
        }
    }
}
