//! Create endpoint: turns a JSON body into a submission, validates it and
//! runs it through the POST transaction handler.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use restx_core::builders::InfoBuilder;
use restx_core::store::{TransactionStore, UnitOfWork};
use restx_core::transaction::Message;
use restx_core::validation::evaluate_record;
use restx_core::{
    CoreError, CrudEntity, HandlerContext, HandlerResponse, RequestMethod, Submission,
    Transaction, Violation, ViolationList,
};
use serde_json::{json, Map, Value};

use crate::error::{AppError, AppResult};
use crate::record::{KeySource, Record};
use crate::response::TransactionResponse;
use crate::state::AppState;

/// Longest accepted model name.
const MAX_MODEL_LEN: usize = 64;

/// POST /api/v1/entities/{model} -- create one entity or a collection.
///
/// Responds with the handler's payload and the batch transaction; the HTTP
/// status is the transaction's status (201 or 409).
pub async fn create_entities(
    State(state): State<AppState>,
    Path(model): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<TransactionResponse>)> {
    if !is_valid_model(&model) {
        return Err(AppError::BadRequest(format!(
            "Invalid model name '{model}': use up to {MAX_MODEL_LEN} lowercase letters, digits, '-' or '_'"
        )));
    }

    let mut transaction = Transaction::new(
        state.ids.generate(),
        model.as_str(),
        RequestMethod::Post,
        state.request_ids.next(),
    )
    .with_related_route(format!("/api/v1/entities/{model}"));

    let Prepared {
        submission,
        violations,
        info,
    } = Intake::new(&state, &model).prepare(body);
    let empty_collection =
        matches!(&submission, Submission::Collection(items) if items.is_empty());

    let mut uow = UnitOfWork::new();
    let response = {
        let handler = state.handlers.handler_for(RequestMethod::Post)?;
        let mut ctx = HandlerContext::new(&mut uow).with_info(info);
        handler.handle(&mut ctx, &mut transaction, submission, Some(&violations))?
    };

    // Final state of the batch transaction; an empty submission leaves none.
    if !empty_collection {
        uow.persist(&transaction).map_err(CoreError::from)?;
    }
    let persisted = uow.len();
    state.sink.flush(uow.take_pending()).await?;

    tracing::info!(
        transaction_id = %transaction.id,
        %model,
        status = transaction.status().code(),
        violations = violations.len(),
        persisted,
        "Create request handled"
    );

    let data = render(&response)?;
    let status = StatusCode::from_u16(transaction.status().code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok((status, Json(TransactionResponse { data, transaction })))
}

fn is_valid_model(model: &str) -> bool {
    !model.is_empty()
        && model.len() <= MAX_MODEL_LEN
        && model
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

fn render(response: &HandlerResponse<Record>) -> Result<Value, serde_json::Error> {
    match response {
        HandlerResponse::Entity(record) => record.render(false),
        HandlerResponse::Collection(collection) => collection
            .items()
            .iter()
            .map(|record| record.render(collection.show_associations()))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Intake
// ---------------------------------------------------------------------------

/// Everything the handler needs from a parsed body.
struct Prepared {
    submission: Submission<Record>,
    violations: ViolationList,
    info: InfoBuilder,
}

/// Builds records from a JSON body and collects their violations.
struct Intake<'a> {
    state: &'a AppState,
    model: &'a str,
    violations: ViolationList,
    info: InfoBuilder,
    seen: HashSet<String>,
    generated: usize,
}

impl<'a> Intake<'a> {
    fn new(state: &'a AppState, model: &'a str) -> Self {
        Self {
            state,
            model,
            violations: ViolationList::new(),
            info: InfoBuilder::new(),
            seen: HashSet::new(),
            generated: 0,
        }
    }

    fn prepare(mut self, body: Value) -> Prepared {
        let submission = match body {
            Value::Array(items) => {
                let limit = self.state.config.max_batch_size;
                if items.len() > limit {
                    self.violations.push(
                        Violation::global(
                            "",
                            format!("Collection of {} entities exceeds the limit of {limit}", items.len()),
                        )
                        .with_code("batch_size"),
                    );
                }
                let mut records = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    let record = match item {
                        Value::Object(fields) => self.record(fields),
                        other => {
                            self.violations.push(
                                Violation::global(format!("[{index}]"), "Collection items must be objects")
                                    .with_code("type")
                                    .with_invalid_value(other.clone()),
                            );
                            Record::opaque(other)
                        }
                    };
                    records.push(record);
                }
                Submission::Collection(records)
            }
            Value::Object(fields) => Submission::Single(self.record(fields)),
            other => Submission::Unsupported {
                type_name: json_type_name(&other).to_string(),
            },
        };

        if self.generated > 0 {
            self.info.add(
                Message::new(format!("Generated primary keys for {} entities", self.generated))
                    .with_code("generated_keys")
                    .with_context(json!({ "count": self.generated })),
            );
        }

        Prepared {
            submission,
            violations: self.violations,
            info: self.info,
        }
    }

    fn record(&mut self, fields: Map<String, Value>) -> Record {
        let key_field = self.state.config.primary_key_field.as_str();
        let ids = &self.state.ids;
        let (record, source) = Record::from_object(fields, key_field, || ids.generate());
        let key = record.primary_key().to_string();

        match source {
            KeySource::Submitted => {}
            KeySource::Generated => self.generated += 1,
            KeySource::Empty => self.violations.push(
                Violation::for_entity(&key, key_field, "Primary key must not be empty")
                    .with_code("primary_key"),
            ),
            KeySource::Invalid => self.violations.push(
                Violation::for_entity(&key, key_field, "Primary key must be a string or a number")
                    .with_code("primary_key"),
            ),
        }
        if !self.seen.insert(key.clone()) {
            self.violations.push(
                Violation::for_entity(&key, key_field, "Duplicate primary key in submission")
                    .with_code("duplicate_key"),
            );
        }

        if let Value::Object(fields) = record.body() {
            let check = evaluate_record(&self.state.rules, self.model, &key, fields);
            if !check.is_valid() {
                tracing::debug!(
                    model = %self.model,
                    entity = %key,
                    errors = check.errors.len(),
                    "Record failed validation"
                );
            }
            self.violations.extend(check.errors);
            for warning in &check.warnings {
                self.info.add(warning.to_message());
            }
        }
        record
    }
}
