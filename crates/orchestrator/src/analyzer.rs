use std::sync::Arc;

use capabilities::{Capabilities, CapabilityError, ChurnFeatures, RecommendationInput};
use events::{ProgressBus, ProgressEvent};
use ticket_core::{AnalysisRequest, AnalysisResult, Overview, TicketId, TicketIdGenerator};
use tracing::{debug, error, info, warn};

use crate::churn;
use crate::error::{AnalysisError, Result};
use crate::overview::OverviewTally;
use crate::recommendations;
use crate::state_machine::{AnalysisStage, AnalysisStateMachine};

/// Drives the analysis pipeline for submitted tickets.
///
/// Each call to [`analyze`](Self::analyze) runs an independent pipeline;
/// the only state shared between concurrent analyses is the progress bus
/// and the overview tally. The broadcaster is an explicit dependency, so
/// there is no global handle to initialize.
pub struct TicketAnalyzer {
    capabilities: Arc<dyn Capabilities>,
    bus: ProgressBus,
    ids: TicketIdGenerator,
    tally: OverviewTally,
}

impl TicketAnalyzer {
    pub fn new(capabilities: Arc<dyn Capabilities>, bus: ProgressBus) -> Self {
        Self {
            capabilities,
            bus,
            ids: TicketIdGenerator::new(),
            tally: OverviewTally::default(),
        }
    }

    /// The bus this analyzer publishes progress on.
    pub fn bus(&self) -> &ProgressBus {
        &self.bus
    }

    /// Analyze one ticket end to end.
    ///
    /// Emits one progress event per stage, then a terminal `complete` or
    /// `error` event. Returns the fully assembled result or fails as a
    /// whole; callers never observe a partial result.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AnalysisError::EmptyTicket);
        }

        let request = AnalysisRequest::new(self.ids.next_id(), text);
        let ticket_id = request.ticket_id.clone();
        info!(ticket_id = %ticket_id, "starting ticket analysis");

        let mut stage = AnalysisStage::Init;

        // Stage 1: security screen. Hard-fail: everything downstream works
        // on the anonymized text this stage produces.
        self.advance(&mut stage, AnalysisStage::Security, &ticket_id);
        let security = match self.capabilities.screen_security(&request.text).await {
            Ok(report) => report,
            Err(cause) => return Err(self.hard_fail(&mut stage, &ticket_id, &cause)),
        };

        if !security.is_safe {
            // Unsafe content is informational; only capability
            // unavailability aborts the pipeline.
            warn!(
                ticket_id = %ticket_id,
                threats = ?security.threats_detected,
                "ticket flagged as unsafe, continuing analysis"
            );
        }

        // Stage 2: sentiment and classification fan-out. Both calls are
        // issued together and the stage resolves only when both have; this
        // is a join, not a race.
        self.advance(&mut stage, AnalysisStage::TextAndClassification, &ticket_id);
        let (sentiment_outcome, classification_outcome) = tokio::join!(
            self.capabilities.analyze_sentiment(&security.anonymized_text),
            self.capabilities
                .classify(ticket_id.as_str(), &security.anonymized_text),
        );

        // When both fail, sentiment is the reported cause (fixed order).
        let (sentiment, classification) = match (sentiment_outcome, classification_outcome) {
            (Ok(sentiment), Ok(classification)) => (sentiment, classification),
            (Err(cause), _) | (_, Err(cause)) => {
                return Err(self.hard_fail(&mut stage, &ticket_id, &cause))
            }
        };

        // Stage 3: churn prediction. Soft-fail: fall back to the local
        // sentiment-derived estimate.
        self.advance(&mut stage, AnalysisStage::Churn, &ticket_id);
        let features = ChurnFeatures {
            sentiment_score: sentiment.score,
            text_length: request.text.chars().count(),
            num_threats: security.threats_detected.len(),
        };
        let churn_risk = match self
            .capabilities
            .predict_churn(ticket_id.as_str(), &features)
            .await
        {
            Ok(prediction) => churn::from_prediction(&prediction),
            Err(cause) => {
                warn!(
                    ticket_id = %ticket_id,
                    cause = %cause,
                    "churn capability unavailable, using sentiment fallback"
                );
                churn::estimate_from_sentiment(sentiment.score)
            }
        };

        // Stage 4: recommendations. Soft-fail: the local selector guarantees
        // a non-empty list.
        self.advance(&mut stage, AnalysisStage::Recommendation, &ticket_id);
        let insights = match self.capabilities.fetch_insights().await {
            Ok(analytics) => Some(analytics.into_insights()),
            Err(cause) => {
                debug!(ticket_id = %ticket_id, cause = %cause, "no analytics insights available");
                None
            }
        };
        let input = RecommendationInput {
            kind: classification.kind.clone(),
            sentiment: sentiment.score,
            churn_score: churn_risk.score,
            churn_level: churn_risk.level,
            insights,
        };
        let recommendations = match self.capabilities.recommend(&input).await {
            Ok(list) if !list.is_empty() => list,
            Ok(_) => {
                warn!(ticket_id = %ticket_id, "recommendation capability returned nothing, selecting locally");
                recommendations::select(&input)
            }
            Err(cause) => {
                warn!(
                    ticket_id = %ticket_id,
                    cause = %cause,
                    "recommendation capability unavailable, selecting locally"
                );
                recommendations::select(&input)
            }
        };

        self.advance(&mut stage, AnalysisStage::Complete, &ticket_id);
        self.tally.record(&sentiment, &churn_risk);
        info!(
            ticket_id = %ticket_id,
            churn_level = churn_risk.level.as_str(),
            fallback_used = churn_risk.fallback_used,
            "ticket analysis complete"
        );

        Ok(AnalysisResult {
            ticket_id,
            security,
            classification,
            sentiment,
            churn_risk,
            recommendations,
            insights: input.insights,
        })
    }

    /// Overview report: base fields from the local tally, enriched
    /// best-effort from the analytics capability.
    pub async fn overview(&self) -> Overview {
        let mut overview = self.tally.snapshot();

        match self.capabilities.fetch_insights().await {
            Ok(analytics) => {
                let insights = analytics.into_insights();
                overview.top_factor = insights.principal_factor.clone();
                overview.insights = Some(insights);
            }
            Err(cause) => {
                warn!(cause = %cause, "analytics unreachable, returning base overview");
            }
        }

        overview
    }

    /// Move the pipeline to the next stage and notify observers.
    ///
    /// The pipeline only walks transitions the state machine allows, so a
    /// rejected transition is a defect, not an input error; it is logged
    /// and the pipeline keeps its previous stage.
    fn advance(&self, stage: &mut AnalysisStage, to: AnalysisStage, ticket_id: &TicketId) {
        if let Err(e) = AnalysisStateMachine::validate_transition(*stage, to) {
            error!(ticket_id = %ticket_id, error = %e, "rejected stage transition");
            return;
        }
        *stage = to;

        // Publishing is fire-and-forget: a missing or slow subscriber never
        // stalls the pipeline.
        match to {
            AnalysisStage::Complete => {
                self.bus
                    .publish(ProgressEvent::complete(ticket_id.clone(), to.message()));
            }
            _ => {
                if let Some(step) = to.step() {
                    self.bus
                        .publish(ProgressEvent::progress(ticket_id.clone(), step, to.message()));
                }
            }
        }
    }

    /// Abort the pipeline from a hard-fail stage.
    ///
    /// The downstream cause is logged here and only a generic message is
    /// broadcast and returned.
    fn hard_fail(
        &self,
        stage: &mut AnalysisStage,
        ticket_id: &TicketId,
        cause: &CapabilityError,
    ) -> AnalysisError {
        let failed_stage = *stage;
        error!(
            ticket_id = %ticket_id,
            stage = failed_stage.as_str(),
            cause = %cause,
            "hard-fail stage aborted the analysis"
        );

        if AnalysisStateMachine::validate_transition(*stage, AnalysisStage::Failed).is_ok() {
            *stage = AnalysisStage::Failed;
        }

        let step = failed_stage.step().unwrap_or(1);
        self.bus.publish(ProgressEvent::error(
            ticket_id.clone(),
            step,
            AnalysisStage::Failed.message(),
        ));

        AnalysisError::AnalysisFailed {
            stage: failed_stage,
        }
    }
}
