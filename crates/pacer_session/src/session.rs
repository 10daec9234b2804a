//! The driver loop: one item at a time through classification, the pacing
//! limiter and the action sink.

use crate::pacing::{jittered_read_delay, random_between};
use crate::sink::ActionSink;
use crate::source::ContentSource;
use pacer_core::config::SoftWaitPolicy;
use pacer_core::templates::render;
use pacer_core::{
    classify, Classification, ContentItem, Decision, PacerConfig, Reason, RenderOptions,
    TemplateCategory, TemplatePack,
};
use pacer_limiter::{
    cooldown, interruptible_sleep, Admission, AuthorVerdict, FailureVerdict, PacingLimiter,
    PageVerdict, RunSignal,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// Already handled earlier in this session.
    Duplicate,
    /// Author streak over the cap.
    AuthorCap,
    /// Too little text to classify.
    InsufficientText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ItemOutcome {
    Performed,
    Skipped(SkipReason),
    Failed(String),
    /// The run flag dropped while the item was in flight.
    Stopped,
}

/// Everything that happened to one item.
#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub item_id: String,
    /// `None` when the item was dropped before classification.
    pub decision: Option<Decision>,
    /// Denials met on the way, in order (window waits, cooldowns).
    pub holds: Vec<Reason>,
    pub outcome: ItemOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub performed: usize,
    pub skipped: usize,
    pub failures: usize,
    pub cooldowns: usize,
}

impl SessionSummary {
    fn absorb(&mut self, report: &ItemReport) {
        match report.outcome {
            ItemOutcome::Performed => self.performed += 1,
            ItemOutcome::Skipped(_) => self.skipped += 1,
            ItemOutcome::Failed(_) => self.failures += 1,
            ItemOutcome::Stopped => {}
        }
    }
}

/// One running session. Owns its limiter; nothing here is shared with other
/// sessions.
pub struct Session {
    config: PacerConfig,
    limiter: PacingLimiter,
    source: Arc<dyn ContentSource>,
    sink: Arc<dyn ActionSink>,
    templates: TemplatePack,
    render_opts: RenderOptions,
    signal: RunSignal,
    rng: StdRng,
    processed: HashSet<String>,
    summary: SessionSummary,
    stop_when_exhausted: bool,
    idle_poll: Duration,
}

impl Session {
    pub fn new(
        config: PacerConfig,
        source: Arc<dyn ContentSource>,
        sink: Arc<dyn ActionSink>,
        signal: RunSignal,
    ) -> Self {
        let limiter = PacingLimiter::new(config.limits.clone());
        let render_opts = RenderOptions::from(&config.comments);
        Self {
            config,
            limiter,
            source,
            sink,
            templates: TemplatePack::default(),
            render_opts,
            signal,
            rng: StdRng::from_entropy(),
            processed: HashSet::new(),
            summary: SessionSummary::default(),
            stop_when_exhausted: true,
            idle_poll: Duration::from_secs(5),
        }
    }

    pub fn with_templates(mut self, templates: TemplatePack) -> Self {
        self.templates = templates;
        self
    }

    /// Deterministic randomness for tests and reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Keep polling the source after it runs dry instead of ending the run.
    pub fn keep_polling(mut self, idle_poll: Duration) -> Self {
        self.stop_when_exhausted = false;
        self.idle_poll = idle_poll;
        self
    }

    pub fn limiter(&self) -> &PacingLimiter {
        &self.limiter
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Run until the run flag drops (or the source is exhausted, unless
    /// [`Session::keep_polling`] was used).
    pub async fn run(&mut self) -> SessionSummary {
        tracing::info!("Session started on source {}", self.source.name());
        let batch_size = self.config.pacing.batch_size;

        'outer: while self.signal.is_running() {
            let batch = match self.source.next_batch(batch_size).await {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::warn!("Source {} failed: {:#}", self.source.name(), e);
                    self.summary.failures += 1;
                    self.register_failure(&mut Vec::new()).await;
                    if interruptible_sleep(self.idle_poll, &mut self.signal)
                        .await
                        .is_interrupted()
                    {
                        break;
                    }
                    continue;
                }
            };

            if batch.is_empty() {
                if self.stop_when_exhausted {
                    tracing::info!("Source {} exhausted", self.source.name());
                    break;
                }
                if interruptible_sleep(self.idle_poll, &mut self.signal)
                    .await
                    .is_interrupted()
                {
                    break;
                }
                continue;
            }

            for item in batch {
                if !self.signal.is_running() {
                    break 'outer;
                }
                let report = self.process_item(item).await;
                self.summary.absorb(&report);

                match report.outcome {
                    ItemOutcome::Stopped => break 'outer,
                    ItemOutcome::Performed | ItemOutcome::Failed(_) => {
                        let spacing = random_between(
                            Duration::from_secs(self.config.pacing.delay_min_secs),
                            Duration::from_secs(self.config.pacing.delay_max_secs),
                            &mut self.rng,
                        );
                        if interruptible_sleep(spacing, &mut self.signal)
                            .await
                            .is_interrupted()
                        {
                            break 'outer;
                        }
                    }
                    ItemOutcome::Skipped(_) => {}
                }
            }
        }

        tracing::info!(
            performed = self.summary.performed,
            skipped = self.summary.skipped,
            failures = self.summary.failures,
            cooldowns = self.summary.cooldowns,
            "Session stopped"
        );
        self.summary
    }

    /// Take one item through every gate and, if admitted, the sink.
    pub async fn process_item(&mut self, item: ContentItem) -> ItemReport {
        let mut holds = Vec::new();

        if self.processed.contains(&item.id) {
            tracing::debug!(item = %item.id, "skip: already processed");
            return skipped(item.id, None, holds, SkipReason::Duplicate);
        }

        let classification = classify(&item.text, self.config.reactions.mode, &mut self.rng);
        let decide = |admitted: bool, reason: Reason| Decision {
            category: classification.category,
            reaction: classification.reaction,
            admitted,
            reason,
        };

        if self.limiter.observe_author(&item.author) == AuthorVerdict::Skip {
            tracing::info!(item = %item.id, author = %item.author, "skip: same author cap");
            let decision = decide(false, Reason::AuthorCap);
            return skipped(item.id, Some(decision), holds, SkipReason::AuthorCap);
        }

        if let PageVerdict::Cooldown(duration) = self.limiter.observe_page(&item.page) {
            holds.push(Reason::PageCap);
            self.summary.cooldowns += 1;
            if cooldown(duration, "same-page", &mut self.signal).await.is_interrupted() {
                return stopped(item.id, Some(decide(false, Reason::PageCap)), holds);
            }
        }

        if item.text.trim().chars().count() < self.config.pacing.min_text_chars {
            tracing::debug!(item = %item.id, "skip: insufficient text");
            return skipped(item.id, None, holds, SkipReason::InsufficientText);
        }

        let read = jittered_read_delay(
            &item.text,
            Duration::from_secs(self.config.pacing.max_read_secs),
            &mut self.rng,
        );
        if interruptible_sleep(read, &mut self.signal).await.is_interrupted() {
            return stopped(item.id, None, holds);
        }

        if let Err(reason) = self.await_capacity(&mut holds).await {
            return stopped(item.id, Some(decide(false, reason)), holds);
        }

        let decision = decide(true, Reason::Admitted);
        tracing::info!(
            item = %item.id,
            category = %decision.category,
            reaction = %decision.reaction,
            sentiment = classification.sentiment,
            topic = %classification.topic,
            "admitted"
        );

        let comment = self.compose(&classification);
        match self.sink.perform(&item, &classification, &comment).await {
            Ok(()) => {
                self.limiter.record_action(Instant::now());
                self.processed.insert(item.id.clone());
                ItemReport {
                    item_id: item.id,
                    decision: Some(decision),
                    holds,
                    outcome: ItemOutcome::Performed,
                }
            }
            Err(e) => {
                tracing::warn!(item = %item.id, "action failed: {:#}", e);
                self.register_failure(&mut holds).await;
                ItemReport {
                    item_id: item.id,
                    decision: Some(decision),
                    holds,
                    outcome: ItemOutcome::Failed(format!("{:#}", e)),
                }
            }
        }
    }

    /// Wait until the limiter admits an action. Returns the denial in force
    /// when the run flag dropped.
    async fn await_capacity(&mut self, holds: &mut Vec<Reason>) -> Result<(), Reason> {
        loop {
            match self.limiter.check_capacity(Instant::now()) {
                Admission::Admitted => return Ok(()),
                Admission::WindowFull {
                    reason,
                    retry_after,
                } => {
                    holds.push(reason);
                    tracing::debug!(%reason, ?retry_after, "rate window full, backing off");
                    let wait = random_between(
                        Duration::from_millis(self.config.pacing.soft_wait_min_ms),
                        Duration::from_millis(self.config.pacing.soft_wait_max_ms),
                        &mut self.rng,
                    );
                    if interruptible_sleep(wait, &mut self.signal)
                        .await
                        .is_interrupted()
                    {
                        return Err(reason);
                    }
                    if self.config.pacing.soft_wait_policy == SoftWaitPolicy::Proceed {
                        return Ok(());
                    }
                }
                Admission::SessionCap { cooldown: duration } => {
                    holds.push(Reason::SessionCap);
                    self.summary.cooldowns += 1;
                    if cooldown(duration, "session", &mut self.signal)
                        .await
                        .is_interrupted()
                    {
                        return Err(Reason::SessionCap);
                    }
                    self.limiter.reset_session();
                }
            }
        }
    }

    async fn register_failure(&mut self, holds: &mut Vec<Reason>) {
        if let FailureVerdict::Cooldown(duration) = self.limiter.record_failure() {
            holds.push(Reason::FailureStreak);
            self.summary.cooldowns += 1;
            cooldown(duration, "failure-streak", &mut self.signal).await;
        }
    }

    fn compose(&mut self, classification: &Classification) -> String {
        let category = if self.config.comments.context_aware {
            classification.category
        } else {
            TemplateCategory::General
        };
        let template = self.templates.pick(category, &mut self.rng);
        render(
            template,
            &self.render_opts,
            &mut self.rng,
            chrono::Local::now().time(),
        )
    }
}

fn skipped(
    item_id: String,
    decision: Option<Decision>,
    holds: Vec<Reason>,
    reason: SkipReason,
) -> ItemReport {
    ItemReport {
        item_id,
        decision,
        holds,
        outcome: ItemOutcome::Skipped(reason),
    }
}

fn stopped(item_id: String, decision: Option<Decision>, holds: Vec<Reason>) -> ItemReport {
    ItemReport {
        item_id,
        decision,
        holds,
        outcome: ItemOutcome::Stopped,
    }
}
