use tracing::{debug, info, instrument};

use super::pipeline::AnswerPipeline;
use super::types::{CascadeReport, GuidelineMap};
use crate::completion::CompletionClient;
use crate::references::SemanticResolver;
use crate::response::ResponseSheet;
use crate::store::QuestionId;

/// Rescores the dependents of a changed answer within one [`ResponseSheet`].
#[derive(Debug)]
pub struct RescoreCascade<'a, C, R> {
    pipeline: &'a AnswerPipeline<C, R>,
}

impl<'a, C: CompletionClient, R: SemanticResolver> RescoreCascade<'a, C, R> {
    pub fn new(pipeline: &'a AnswerPipeline<C, R>) -> Self {
        Self { pipeline }
    }

    #[instrument(skip(self, sheet, guidelines), fields(respondent_id = sheet.respondent_id()))]
    pub async fn run(
        &self,
        sheet: &mut ResponseSheet,
        changed: QuestionId,
        guidelines: &GuidelineMap,
    ) -> CascadeReport {
        let mut report = CascadeReport::new(changed);

        for question_id in sheet.question_ids() {
            if question_id == changed {
                continue;
            }
            report.examined += 1;

            let (referenced, analysis) = if sheet.graph().depends_on(question_id, changed) {
                report.cache_hits += 1;
                let cached = sheet
                    .graph()
                    .references_of(question_id)
                    .cloned()
                    .unwrap_or_default();
                (cached, None)
            } else {
                let Some(analysis) = self.pipeline.analyze(sheet, question_id).await else {
                    continue;
                };
                report.rederived += 1;
                if !analysis.ids.contains(&changed) {
                    let warning = analysis.warning();
                    sheet.record_references(question_id, analysis.ids, warning);
                    continue;
                }
                (analysis.ids.clone(), Some(analysis))
            };

            let guideline = guidelines.get(&question_id).map(String::as_str);
            let Some(outcome) = self
                .pipeline
                .score(sheet, question_id, &referenced, guideline)
                .await
            else {
                continue;
            };

            if let Some(analysis) = analysis {
                let warning = analysis.warning();
                sheet.record_references(question_id, analysis.ids, warning);
            }
            sheet.record_score(question_id, &outcome, self.pipeline.scoring_config());
            debug!(question_id, outcome = %outcome, "Dependent rescored");
            report.rescored.push(question_id);
        }

        if !report.is_empty() {
            info!(
                changed,
                examined = report.examined,
                cache_hits = report.cache_hits,
                rederived = report.rederived,
                rescored = report.rescored.len(),
                "Cascade rescored dependents"
            );
        }
        report
    }
}
