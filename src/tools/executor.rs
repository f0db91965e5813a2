//! Executes model-requested tool calls against the stores.

use serde_json::{Value, json};
use uuid::Uuid;

use crate::models::{NewLead, NewVisit};
use crate::stores::{LeadStore, ListingStore, VisitStore};

use super::calls::ToolCall;

/// Result of one tool execution, already shaped for the model: a JSON
/// object with a `success` flag plus either payload fields or an `error`
/// message.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome(Value);

impl ToolOutcome {
    fn ok(fields: Value) -> Self {
        let mut body = json!({"success": true});
        if let (Some(obj), Some(extra)) = (body.as_object_mut(), fields.as_object()) {
            for (key, value) in extra {
                obj.insert(key.clone(), value.clone());
            }
        }
        Self(body)
    }

    fn error(message: impl Into<String>) -> Self {
        Self(json!({"success": false, "error": message.into()}))
    }

    pub fn is_success(&self) -> bool {
        self.0
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Compact JSON string for the tool-result content block.
    pub fn to_content(&self) -> String {
        self.0.to_string()
    }
}

/// Maps validated tool calls onto the stores. Infallible at its boundary:
/// unknown tools, bad arguments, and store errors all come back as
/// `success: false` outcomes rather than bubbling up.
#[derive(Clone)]
pub struct ToolExecutor {
    listings: ListingStore,
    leads: LeadStore,
    visits: VisitStore,
}

impl ToolExecutor {
    pub fn new(listings: ListingStore, leads: LeadStore, visits: VisitStore) -> Self {
        Self {
            listings,
            leads,
            visits,
        }
    }

    /// Run one tool call as requested by the model.
    pub async fn execute(&self, name: &str, input: Value) -> ToolOutcome {
        let call = match ToolCall::parse(name, input) {
            Ok(call) => call,
            Err(message) => {
                tracing::warn!("Tool call rejected: {message}");
                return ToolOutcome::error(message);
            }
        };

        match self.run(call).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Tool {name} failed: {e}");
                ToolOutcome::error(e.to_string())
            }
        }
    }

    async fn run(&self, call: ToolCall) -> sqlx::Result<ToolOutcome> {
        match call {
            ToolCall::SearchListings(args) => {
                let listings = self.listings.search(&args.into_filter()).await?;
                Ok(ToolOutcome::ok(json!({
                    "count": listings.len(),
                    "listings": listings,
                })))
            }
            ToolCall::GetListingDetail(args) => {
                let listing = match Uuid::parse_str(&args.listing_id) {
                    Ok(id) => self.listings.get(id).await?,
                    Err(_) => None,
                };
                Ok(match listing {
                    Some(listing) => ToolOutcome::ok(json!({"listing": listing})),
                    None => ToolOutcome::error("not found"),
                })
            }
            ToolCall::ScheduleVisit(args) => {
                let Ok(listing_id) = Uuid::parse_str(&args.listing_id) else {
                    return Ok(ToolOutcome::error(format!(
                        "invalid listing_id '{}'",
                        args.listing_id
                    )));
                };
                let id = self
                    .visits
                    .insert(NewVisit {
                        listing_id,
                        client_name: args.client_name,
                        phone: args.phone,
                        email: args.email,
                        preferred_date: args.preferred_date,
                        preferred_time: args.preferred_time,
                    })
                    .await?;
                Ok(ToolOutcome::ok(json!({"visit_id": id})))
            }
            ToolCall::SaveLead(args) => {
                let id = self
                    .leads
                    .insert(NewLead {
                        name: args.name,
                        phone: args.phone,
                        email: args.email,
                        preferences: args.preferences,
                    })
                    .await?;
                Ok(ToolOutcome::ok(json!({"lead_id": id})))
            }
        }
    }
}
