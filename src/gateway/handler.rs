use axum::{
    Json,
    extract::{Path, State},
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use crate::completion::CompletionClient;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    AnswerResponse, AnswerSummary, CreateRespondentRequest, CreateSurveyRequest, CreatedResponse,
    DeletedResponse, GuidelineUpsert, OkResponse, QuestionOut, RespondentCreated, SubmitRequest,
    SurveyDetail, SurveyOut,
};
use crate::gateway::state::HandlerState;
use crate::grading::{AnswerChanges, NewAnswer};
use crate::store::{AnswerId, NewQuestion, QuestionId, RespondentId, SurveyId, SurveyStore};

/// Decodes a JSON body, reporting schema problems as `400`.
pub(crate) fn parse_body<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, GatewayError> {
    serde_json::from_value(body)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))
}

#[instrument(skip(state, body))]
pub async fn create_survey_handler<C, S>(
    State(state): State<HandlerState<C, S>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<CreatedResponse>, GatewayError>
where
    C: CompletionClient + 'static,
    S: SurveyStore + 'static,
{
    let request: CreateSurveyRequest = parse_body(body)?;
    let title = request
        .title()
        .ok_or_else(|| GatewayError::InvalidRequest("Title is required".to_string()))?
        .to_string();
    let description = request.description().map(str::to_string);
    let questions = request.into_questions();

    let survey = state
        .store()
        .create_survey(&title, description.as_deref(), questions);
    info!(survey_id = survey.id, "Survey created");
    Ok(Json(CreatedResponse { id: survey.id }))
}

#[instrument(skip(state))]
pub async fn list_surveys_handler<C, S>(
    State(state): State<HandlerState<C, S>>,
) -> Json<Vec<SurveyOut>>
where
    C: CompletionClient + 'static,
    S: SurveyStore + 'static,
{
    Json(
        state
            .store()
            .list_surveys()
            .into_iter()
            .map(SurveyOut::from)
            .collect(),
    )
}

#[instrument(skip(state))]
pub async fn delete_survey_handler<C, S>(
    State(state): State<HandlerState<C, S>>,
    Path(survey_id): Path<SurveyId>,
) -> Result<Json<OkResponse>, GatewayError>
where
    C: CompletionClient + 'static,
    S: SurveyStore + 'static,
{
    state.service.delete_survey(survey_id)?;
    Ok(Json(OkResponse::OK))
}

#[instrument(skip(state, body))]
pub async fn add_question_handler<C, S>(
    State(state): State<HandlerState<C, S>>,
    Path(survey_id): Path<SurveyId>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<CreatedResponse>, GatewayError>
where
    C: CompletionClient + 'static,
    S: SurveyStore + 'static,
{
    let mut question: NewQuestion = parse_body(body)?;
    question.text = question.text.trim().to_string();
    if question.text.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "Question text is required".to_string(),
        ));
    }

    let question = state.store().add_question(survey_id, question)?;
    debug!(survey_id, question_id = question.id, "Question added");
    Ok(Json(CreatedResponse { id: question.id }))
}

#[instrument(skip(state))]
pub async fn survey_detail_handler<C, S>(
    State(state): State<HandlerState<C, S>>,
    Path(survey_id): Path<SurveyId>,
) -> Result<Json<SurveyDetail>, GatewayError>
where
    C: CompletionClient + 'static,
    S: SurveyStore + 'static,
{
    let store = state.store();
    let survey = store.survey(survey_id)?;
    let questions = store
        .questions(survey_id)?
        .into_iter()
        .map(|q| {
            let guideline = store.guideline(q.id).map(|g| g.content);
            QuestionOut::new(q, guideline)
        })
        .collect();

    Ok(Json(SurveyDetail {
        survey: survey.into(),
        questions,
    }))
}

#[instrument(skip(state, body))]
pub async fn upsert_guideline_handler<C, S>(
    State(state): State<HandlerState<C, S>>,
    Path(question_id): Path<QuestionId>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<OkResponse>, GatewayError>
where
    C: CompletionClient + 'static,
    S: SurveyStore + 'static,
{
    let body: GuidelineUpsert = parse_body(body)?;
    state.store().upsert_guideline(question_id, &body.content)?;
    info!(question_id, "Guideline saved");
    Ok(Json(OkResponse::OK))
}

/// Idempotent: deleting a missing guideline reports `deleted: 0`.
#[instrument(skip(state))]
pub async fn delete_guideline_handler<C, S>(
    State(state): State<HandlerState<C, S>>,
    Path(question_id): Path<QuestionId>,
) -> Json<DeletedResponse>
where
    C: CompletionClient + 'static,
    S: SurveyStore + 'static,
{
    let deleted = state.store().delete_guideline(question_id);
    Json(DeletedResponse {
        ok: true,
        deleted: u8::from(deleted),
    })
}

#[instrument(skip(state))]
pub async fn delete_question_handler<C, S>(
    State(state): State<HandlerState<C, S>>,
    Path(question_id): Path<QuestionId>,
) -> Result<Json<OkResponse>, GatewayError>
where
    C: CompletionClient + 'static,
    S: SurveyStore + 'static,
{
    state.store().delete_question(question_id)?;
    info!(question_id, "Question deleted");
    Ok(Json(OkResponse::OK))
}

#[instrument(skip(state, body))]
pub async fn create_respondent_handler<C, S>(
    State(state): State<HandlerState<C, S>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<RespondentCreated>, GatewayError>
where
    C: CompletionClient + 'static,
    S: SurveyStore + 'static,
{
    let request: CreateRespondentRequest = parse_body(body)?;
    let display_name = request
        .display_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let respondent = state
        .store()
        .create_respondent(request.survey_id, display_name)?;
    debug!(respondent_id = respondent.id, survey_id = respondent.survey_id, "Respondent created");
    Ok(Json(RespondentCreated {
        respondent_id: respondent.id,
    }))
}

#[instrument(skip(state, body))]
pub async fn create_answer_handler<C, S>(
    State(state): State<HandlerState<C, S>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<AnswerResponse>, GatewayError>
where
    C: CompletionClient + 'static,
    S: SurveyStore + 'static,
{
    let new: NewAnswer = parse_body(body)?;
    let receipt = state.service.create_answer(new).await?;
    Ok(Json(receipt.into()))
}

#[instrument(skip(state, body))]
pub async fn update_answer_handler<C, S>(
    State(state): State<HandlerState<C, S>>,
    Path(answer_id): Path<AnswerId>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<AnswerResponse>, GatewayError>
where
    C: CompletionClient + 'static,
    S: SurveyStore + 'static,
{
    let changes: AnswerChanges = parse_body(body)?;
    let receipt = state.service.update_answer(answer_id, changes).await?;
    Ok(Json(receipt.into()))
}

#[instrument(skip(state))]
pub async fn delete_answer_handler<C, S>(
    State(state): State<HandlerState<C, S>>,
    Path(answer_id): Path<AnswerId>,
) -> Result<Json<OkResponse>, GatewayError>
where
    C: CompletionClient + 'static,
    S: SurveyStore + 'static,
{
    state.service.delete_answer(answer_id).await?;
    Ok(Json(OkResponse::OK))
}

#[instrument(skip(state))]
pub async fn list_answers_handler<C, S>(
    State(state): State<HandlerState<C, S>>,
    Path(respondent_id): Path<RespondentId>,
) -> Result<Json<Vec<AnswerSummary>>, GatewayError>
where
    C: CompletionClient + 'static,
    S: SurveyStore + 'static,
{
    let answers = state.service.list_answers(respondent_id)?;
    Ok(Json(answers.into_iter().map(AnswerSummary::from).collect()))
}

#[instrument(skip(state, body))]
pub async fn submit_handler<C, S>(
    State(state): State<HandlerState<C, S>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<OkResponse>, GatewayError>
where
    C: CompletionClient + 'static,
    S: SurveyStore + 'static,
{
    let request: SubmitRequest = parse_body(body)?;
    state.service.submit(request.respondent_id).await?;
    Ok(Json(OkResponse::OK))
}
