use super::*;
use crate::db::{Database, seed};
use crate::llm::{
    ContentBlock, LLMRequest, LLMResponse, Message, Provider, ProviderError, Role, StopReason,
    TokenUsage,
};
use crate::stores::{ConversationStore, LeadStore, ListingStore, VisitStore};
use crate::tools::ToolExecutor;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Provider that replays a fixed script of responses and records every
/// request it receives.
struct ScriptedProvider {
    script: Mutex<VecDeque<crate::llm::Result<LLMResponse>>>,
    requests: Mutex<Vec<LLMRequest>>,
}

impl ScriptedProvider {
    fn new(script: Vec<crate::llm::Result<LLMResponse>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<LLMRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(&self, request: LLMRequest) -> crate::llm::Result<LLMResponse> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("provider script exhausted")
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }
}

fn text_response(text: &str) -> LLMResponse {
    LLMResponse {
        id: "msg_text".to_string(),
        model: "mock-model".to_string(),
        content: vec![ContentBlock::Text {
            text: text.to_string(),
        }],
        stop_reason: Some(StopReason::EndTurn),
        usage: TokenUsage {
            input_tokens: 10,
            output_tokens: 20,
        },
    }
}

fn tool_response(calls: Vec<(&str, &str, Value)>) -> LLMResponse {
    let content = calls
        .into_iter()
        .map(|(id, name, input)| ContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input,
        })
        .collect();
    LLMResponse {
        id: "msg_tools".to_string(),
        model: "mock-model".to_string(),
        content,
        stop_reason: Some(StopReason::ToolUse),
        usage: TokenUsage {
            input_tokens: 10,
            output_tokens: 20,
        },
    }
}

fn api_error() -> ProviderError {
    ProviderError::Api {
        status: 529,
        message: "overloaded".to_string(),
    }
}

struct Harness {
    engine: ConversationEngine,
    provider: Arc<ScriptedProvider>,
    conversations: ConversationStore,
    pool: sqlx::SqlitePool,
}

async fn lead_count(pool: &sqlx::SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM leads")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn harness(script: Vec<crate::llm::Result<LLMResponse>>) -> Harness {
    let db = Database::connect_in_memory().await.unwrap();
    db.run_migrations().await.unwrap();
    seed::seed_listings(db.pool()).await.unwrap();
    let pool = db.pool().clone();

    let provider = Arc::new(ScriptedProvider::new(script));
    let executor = ToolExecutor::new(
        ListingStore::new(pool.clone()),
        LeadStore::new(pool.clone()),
        VisitStore::new(pool.clone()),
    );
    let conversations = ConversationStore::new(pool.clone());
    let engine = ConversationEngine::new(provider.clone(), executor, conversations.clone());

    Harness {
        engine,
        provider,
        conversations,
        pool,
    }
}

const CONTACT: &str = "54341234567";

#[tokio::test]
async fn plain_reply_appends_user_and_assistant_turns() {
    let h = harness(vec![Ok(text_response("¡Hola! ¿Qué estás buscando?"))]).await;

    let answer = h.engine.handle_message(CONTACT, "hola").await.unwrap();
    assert_eq!(answer, "¡Hola! ¿Qué estás buscando?");

    let history = h.conversations.history(CONTACT).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], Message::user("hola"));
    assert_eq!(history[1], Message::assistant_text(answer));

    let requests = h.provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "mock-model");
    assert_eq!(requests[0].max_tokens, 4000);
    assert_eq!(requests[0].system.as_deref(), Some(SYSTEM_PROMPT));
    assert_eq!(requests[0].tools.len(), 4);
}

#[tokio::test]
async fn tool_round_feeds_results_back_and_persists_the_turn() {
    // The catalog's only apartment rental at or under 500 is the student
    // studio, so the search result the model sees must name it.
    let h = harness(vec![
        Ok(tool_response(vec![(
            "toolu_1",
            "search_listings",
            json!({"type": "apartment", "operation": "rental", "price_max": 500}),
        )])),
        Ok(text_response(
            "Encontré un monoambiente por 450 USD en Pichincha. ¿Querés verlo?",
        )),
    ])
    .await;

    let answer = h
        .engine
        .handle_message(CONTACT, "busco depto en alquiler hasta 500 dólares")
        .await
        .unwrap();

    let requests = h.provider.requests();
    assert_eq!(requests.len(), 2);

    // Second call resends the grown history: user, assistant tool call,
    // tool results.
    let resent = &requests[1].messages;
    assert_eq!(resent.len(), 3);
    assert_eq!(resent[0], Message::user("busco depto en alquiler hasta 500 dólares"));
    assert_eq!(resent[1].role, Role::Assistant);
    assert_eq!(resent[2].role, Role::User);

    let ContentBlock::ToolResult { tool_use_id, content } = &resent[2].content[0] else {
        panic!("expected a tool result block");
    };
    assert_eq!(tool_use_id, "toolu_1");
    assert!(content.contains("\"success\":true"));
    assert!(content.contains("Monoambiente para estudiantes"));

    let history = h.conversations.history(CONTACT).await.unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[3], Message::assistant_text(answer));
}

#[tokio::test]
async fn several_calls_in_one_round_run_in_request_order() {
    let h = harness(vec![
        Ok(tool_response(vec![
            ("toolu_a", "save_lead", json!({"name": "Ana"})),
            ("toolu_b", "search_listings", json!({"operation": "rental"})),
        ])),
        Ok(text_response("Listo, te registré y te paso opciones.")),
    ])
    .await;

    h.engine
        .handle_message(CONTACT, "soy Ana, busco alquiler")
        .await
        .unwrap();

    let requests = h.provider.requests();
    let results = &requests[1].messages[2].content;
    assert_eq!(results.len(), 2);
    assert!(matches!(
        &results[0],
        ContentBlock::ToolResult { tool_use_id, .. } if tool_use_id == "toolu_a"
    ));
    assert!(matches!(
        &results[1],
        ContentBlock::ToolResult { tool_use_id, .. } if tool_use_id == "toolu_b"
    ));
    assert_eq!(lead_count(&h.pool).await, 1);
}

#[tokio::test]
async fn provider_failure_aborts_the_turn_without_persisting() {
    let h = harness(vec![Err(api_error())]).await;

    let err = h.engine.handle_message(CONTACT, "hola").await.unwrap_err();
    assert!(matches!(err, EngineError::Provider(_)));
    assert!(h.conversations.get(CONTACT).await.unwrap().is_none());
}

#[tokio::test]
async fn provider_failure_mid_turn_discards_the_whole_history() {
    let h = harness(vec![
        Ok(tool_response(vec![(
            "toolu_1",
            "search_listings",
            json!({}),
        )])),
        Err(api_error()),
    ])
    .await;

    let err = h.engine.handle_message(CONTACT, "hola").await.unwrap_err();
    assert!(matches!(err, EngineError::Provider(_)));
    assert!(h.conversations.get(CONTACT).await.unwrap().is_none());
}

#[tokio::test]
async fn tool_rounds_past_the_limit_fail_fatally() {
    // Three tool-use rounds against a limit of two: the third response
    // must abort the turn before its calls execute.
    let h = harness(vec![
        Ok(tool_response(vec![(
            "toolu_1",
            "save_lead",
            json!({"name": "ronda uno"}),
        )])),
        Ok(tool_response(vec![(
            "toolu_2",
            "save_lead",
            json!({"name": "ronda dos"}),
        )])),
        Ok(tool_response(vec![(
            "toolu_3",
            "save_lead",
            json!({"name": "ronda tres"}),
        )])),
    ])
    .await;
    let engine = h.engine.with_max_tool_rounds(2);

    let err = engine.handle_message(CONTACT, "hola").await.unwrap_err();
    assert!(matches!(err, EngineError::ToolRoundsExceeded { limit: 2 }));
    assert_eq!(h.provider.requests().len(), 3);
    // Rounds one and two executed before the guard tripped; round three
    // never ran.
    assert_eq!(lead_count(&h.pool).await, 2);
    assert!(h.conversations.get(CONTACT).await.unwrap().is_none());
}

#[tokio::test]
async fn failed_tool_calls_do_not_abort_the_loop() {
    let h = harness(vec![
        Ok(tool_response(vec![("toolu_9", "open_door", json!({}))])),
        Ok(text_response("Perdón, eso no lo puedo hacer.")),
    ])
    .await;

    let answer = h.engine.handle_message(CONTACT, "abrí la puerta").await.unwrap();
    assert_eq!(answer, "Perdón, eso no lo puedo hacer.");

    let requests = h.provider.requests();
    let ContentBlock::ToolResult { content, .. } = &requests[1].messages[2].content[0] else {
        panic!("expected a tool result block");
    };
    assert!(content.contains("\"success\":false"));
    assert!(content.contains("unknown tool"));
}

#[tokio::test]
async fn each_call_resends_the_full_history() {
    let h = harness(vec![
        Ok(text_response("¡Hola!")),
        Ok(text_response("Claro, contame más.")),
    ])
    .await;

    h.engine.handle_message(CONTACT, "hola").await.unwrap();
    h.engine.handle_message(CONTACT, "busco casa").await.unwrap();

    let requests = h.provider.requests();
    assert_eq!(requests[0].messages.len(), 1);
    assert_eq!(requests[1].messages.len(), 3);
    assert_eq!(requests[1].messages[0], Message::user("hola"));
    assert_eq!(requests[1].messages[1], Message::assistant_text("¡Hola!"));
    assert_eq!(requests[1].messages[2], Message::user("busco casa"));
    assert_eq!(requests[1].system.as_deref(), Some(SYSTEM_PROMPT));
}

#[tokio::test]
async fn chained_rounds_grow_the_history_between_calls() {
    let h = harness(vec![
        Ok(tool_response(vec![(
            "toolu_1",
            "search_listings",
            json!({"type": "house", "rooms": 4}),
        )])),
        Ok(tool_response(vec![(
            "toolu_2",
            "save_lead",
            json!({"name": "Ana", "phone": "341555000"}),
        )])),
        Ok(text_response("Te agendo apenas confirmes el día.")),
    ])
    .await;

    let answer = h
        .engine
        .handle_message(CONTACT, "quiero ver la casa quinta")
        .await
        .unwrap();
    assert_eq!(answer, "Te agendo apenas confirmes el día.");

    let requests = h.provider.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].messages.len(), 3);
    assert_eq!(requests[2].messages.len(), 5);
    assert_eq!(lead_count(&h.pool).await, 1);

    let history = h.conversations.history(CONTACT).await.unwrap();
    assert_eq!(history.len(), 6);
    assert_eq!(history[5], Message::assistant_text(answer));
}

#[tokio::test]
async fn builder_overrides_reach_the_request() {
    let h = harness(vec![Ok(text_response("ok"))]).await;
    let engine = h.engine.with_model("claude-haiku-test").with_max_tokens(512);

    engine.handle_message(CONTACT, "hola").await.unwrap();

    let requests = h.provider.requests();
    assert_eq!(requests[0].model, "claude-haiku-test");
    assert_eq!(requests[0].max_tokens, 512);
}
