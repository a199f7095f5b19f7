use crate::analysis::{
    AnalysisResponse, HealthSummary, build_prompt, has_enough_records, recent_records,
    split_blocks, summarize,
};
use crate::errors::AppError;
use crate::models::{
    AnalysisRecord, AnalysisRequest, EntryRequest, ModelAnalysisRequest, SavedResponse,
    WeightRecord,
};
use crate::progress::{Progress, build_progress};
use crate::records::{remove_by_date, sort_by_date, upsert_by_date};
use crate::state::AppState;
use crate::store::StoreError;
use crate::ui::render_index;
use crate::validation::{validate_analysis, validate_entry};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Html,
};
use chrono::Utc;
use tracing::{info, warn};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(state.target_weight))
}

pub async fn list_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<WeightRecord>>, AppError> {
    let mut records = state.store.records().await?;
    sort_by_date(&mut records);
    Ok(Json(records))
}

pub async fn save_record(
    State(state): State<AppState>,
    payload: Result<Json<EntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SavedResponse<WeightRecord>>), AppError> {
    let Json(request) = payload?;
    let record = validate_entry(request)?;

    let _gate = state.write_gate.lock().await;
    let mut records = state.store.records().await?;
    let outcome = upsert_by_date(&mut records, record.clone());
    state.store.put_records(&records).await?;
    info!(date = %record.date, weight = %record.weight, ?outcome, "saved weight record");

    // Cached analyses cover the edited day and the window ending at the newest day.
    let mut stale = vec![record.date.clone()];
    if let Some(newest) = recent_records(&records).into_iter().next() {
        if newest.date != record.date {
            stale.push(newest.date);
        }
    }
    if let Err(err) = drop_analyses(&state, &stale).await {
        warn!("could not invalidate cached analysis for {}: {err}", record.date);
    }

    Ok((
        StatusCode::CREATED,
        Json(SavedResponse {
            message: "Data saved successfully".to_string(),
            entry: record,
        }),
    ))
}

pub async fn list_analyses(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnalysisRecord>>, AppError> {
    let mut analyses = state.store.analyses().await?;
    sort_by_date(&mut analyses);
    Ok(Json(analyses))
}

pub async fn save_analysis(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SavedResponse<AnalysisRecord>>), AppError> {
    let Json(request) = payload?;
    let record = validate_analysis(request, Utc::now())?;
    cache_analysis(&state, record.clone()).await?;

    Ok((
        StatusCode::CREATED,
        Json(SavedResponse {
            message: "Analysis saved successfully".to_string(),
            entry: record,
        }),
    ))
}

pub async fn delete_analysis(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<StatusCode, AppError> {
    let _gate = state.write_gate.lock().await;
    let mut analyses = state.store.analyses().await?;
    if !remove_by_date(&mut analyses, &date) {
        return Err(AppError::not_found(format!("No cached analysis for {date}")));
    }
    state.store.put_analyses(&analyses).await?;
    info!(%date, "dropped cached analysis");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_progress(
    State(state): State<AppState>,
) -> Result<Json<Option<Progress>>, AppError> {
    let records = state.store.records().await?;
    Ok(Json(build_progress(&records, state.target_weight)))
}

pub async fn get_summary(
    State(state): State<AppState>,
) -> Result<Json<Option<HealthSummary>>, AppError> {
    let records = state.store.records().await?;
    if records.is_empty() {
        return Ok(Json(None));
    }
    Ok(Json(Some(summarize(&records))))
}

/// Asks the model about the newest entries. Anything short of a record
/// store failure degrades to the rule-based summary.
pub async fn model_analysis(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalysisResponse>, AppError> {
    let request: ModelAnalysisRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ModelAnalysisRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|_| AppError::bad_request("Invalid JSON format in request body"))?
    };

    let records = state.store.records().await?;
    let recent = recent_records(&records);
    if !has_enough_records(&recent) {
        return Ok(fallback(
            &records,
            "Log at least two days of entries to get an AI analysis.",
        ));
    }
    let date = recent[0].date.clone();

    if !request.refresh {
        match state.store.analyses().await {
            Ok(analyses) => {
                if let Some(cached) = analyses.into_iter().find(|a| a.date == date) {
                    return Ok(Json(AnalysisResponse::Cached {
                        blocks: split_blocks(&cached.analysis),
                        date: cached.date,
                        analysis: cached.analysis,
                        timestamp: cached.timestamp,
                    }));
                }
            }
            Err(err) => warn!("could not read cached analyses: {err}"),
        }
    }

    let Some(analyst) = state.analyst.as_ref() else {
        return Ok(fallback(&records, "AI analysis is not configured."));
    };

    let analysis = match analyst.analyze(&build_prompt(&recent)).await {
        Ok(text) => text,
        Err(err) => {
            warn!("model analysis failed: {err:#}");
            return Ok(fallback(
                &records,
                "AI analysis is unavailable right now, please try again later.",
            ));
        }
    };

    let record = AnalysisRecord {
        date,
        analysis,
        timestamp: Utc::now(),
    };
    if let Err(err) = cache_analysis(&state, record.clone()).await {
        warn!("could not cache analysis for {}: {err}", record.date);
    }
    info!(date = %record.date, "model analysis completed");

    Ok(Json(AnalysisResponse::Model {
        blocks: split_blocks(&record.analysis),
        date: record.date,
        analysis: record.analysis,
        timestamp: record.timestamp,
    }))
}

async fn cache_analysis(state: &AppState, record: AnalysisRecord) -> Result<(), StoreError> {
    let _gate = state.write_gate.lock().await;
    let mut analyses = state.store.analyses().await?;
    upsert_by_date(&mut analyses, record);
    state.store.put_analyses(&analyses).await
}

/// Caller holds the write gate.
async fn drop_analyses(state: &AppState, dates: &[String]) -> Result<(), StoreError> {
    let mut analyses = state.store.analyses().await?;
    let mut removed = false;
    for date in dates {
        removed |= remove_by_date(&mut analyses, date);
    }
    if removed {
        state.store.put_analyses(&analyses).await?;
        info!(?dates, "dropped stale cached analysis");
    }
    Ok(())
}

fn fallback(records: &[WeightRecord], note: &str) -> Json<AnalysisResponse> {
    Json(AnalysisResponse::Fallback {
        note: note.to_string(),
        summary: summarize(records),
    })
}
