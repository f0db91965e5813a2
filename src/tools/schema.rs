//! Fixed tool schema set advertised to the model on every request.

use serde_json::json;

use crate::llm::ToolDefinition;

/// The four tools the assistant may call. Names, argument names, and
/// required lists are part of the model contract and must stay stable.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "search_listings".into(),
            description: "Search available properties by criteria. Filters by type, price, \
                          location, rooms, etc."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "type": {
                        "type": "string",
                        "enum": ["house", "apartment", "land", "office", "commercial_unit"],
                        "description": "Property type"
                    },
                    "operation": {
                        "type": "string",
                        "enum": ["sale", "rental"],
                        "description": "Sale or rental"
                    },
                    "price_min": {"type": "number", "description": "Minimum price"},
                    "price_max": {"type": "number", "description": "Maximum price"},
                    "location": {"type": "string", "description": "City or area"},
                    "rooms": {"type": "integer", "description": "Number of rooms"},
                    "bathrooms": {"type": "integer", "description": "Number of bathrooms"}
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "get_listing_detail".into(),
            description: "Get the full details of a listing by id".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "listing_id": {
                        "type": "string",
                        "description": "Listing id"
                    }
                },
                "required": ["listing_id"]
            }),
        },
        ToolDefinition {
            name: "schedule_visit".into(),
            description: "Schedule a visit to a listing".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "listing_id": {"type": "string", "description": "Listing id"},
                    "client_name": {"type": "string", "description": "Client name"},
                    "phone": {"type": "string", "description": "Client phone"},
                    "email": {"type": "string", "description": "Client email"},
                    "preferred_date": {
                        "type": "string",
                        "description": "Preferred date (YYYY-MM-DD)"
                    },
                    "preferred_time": {"type": "string", "description": "Preferred time"}
                },
                "required": ["listing_id", "client_name", "phone"]
            }),
        },
        ToolDefinition {
            name: "save_lead".into(),
            description: "Save a potential client's contact information".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Client name"},
                    "phone": {"type": "string", "description": "Client phone"},
                    "email": {"type": "string", "description": "Client email"},
                    "preferences": {"type": "object", "description": "Client preferences"}
                },
                "required": ["name"]
            }),
        },
    ]
}
