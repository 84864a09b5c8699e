//! Built-in plan templates.
//!
//! Every template owns an anchor vector, computed by encoding a summary
//! representative of the requests it serves. Strategies that only have a
//! vector to go on map it to the template with the nearest anchor.

use serde::{Deserialize, Serialize};
use synth_encoder::SemanticEncoder;
use synth_types::{
    Candidate, CandidateId, Certainty, IntentCategory, IntentSummary, Optimization, PlanPayload,
    PlanStep, PlanType, Regime, SemanticVector, StepKind, StrategyKind,
};

/// How a template trades latency against system pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanProfile {
    Standard,
    /// Cheap and fast when caches are warm.
    CacheFirst,
    /// Spreads work out when the system is busy.
    LoadDistributing,
}

/// One reusable plan shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTemplate {
    pub plan_type: PlanType,
    pub category: IntentCategory,
    pub profile: PlanProfile,
    pub title: String,
    pub description: String,
    pub steps: Vec<PlanStep>,
    pub external_dependencies: u32,
    pub edge_cases_covered: u32,
    pub optimizations: Vec<Optimization>,
    pub base_duration_ms: u64,
    pub base_cost: f64,
    pub anchor: SemanticVector,
}

impl PlanTemplate {
    pub fn payload(&self) -> PlanPayload {
        PlanPayload {
            plan_type: self.plan_type.clone(),
            steps: self.steps.clone(),
            external_dependencies: self.external_dependencies,
            edge_cases_covered: self.edge_cases_covered,
            optimizations: self.optimizations.clone(),
        }
    }

    /// Build a fresh, unscored candidate from this template.
    pub fn instantiate(
        &self,
        strategy: StrategyKind,
        vector: SemanticVector,
        regime: Regime,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Candidate {
        Candidate {
            id: CandidateId::new(),
            strategy_origin: strategy,
            plan_type: self.plan_type.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            confidence: confidence.clamp(0.0, 1.0),
            regime,
            estimated_duration_ms: self.base_duration_ms,
            estimated_cost: self.base_cost,
            plan_payload: self.payload(),
            reasoning: reasoning.into(),
            vector,
            quality: None,
        }
    }
}

/// The fixed set of plan templates known to the generator.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    templates: Vec<PlanTemplate>,
}

impl PlanCatalog {
    /// The ten built-in templates, anchored with `encoder`.
    pub fn builtin(encoder: &SemanticEncoder) -> Self {
        let templates = builtin_defs()
            .into_iter()
            .map(|def| def.build(encoder))
            .collect();
        Self { templates }
    }

    pub fn templates(&self) -> &[PlanTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, plan_type: &PlanType) -> Option<&PlanTemplate> {
        self.templates.iter().find(|t| &t.plan_type == plan_type)
    }

    /// Template whose anchor is most similar to `vector`. Ties keep catalog
    /// order.
    pub fn nearest(&self, vector: &SemanticVector) -> Option<&PlanTemplate> {
        let mut best: Option<(&PlanTemplate, f64)> = None;
        for template in &self.templates {
            let similarity = template.anchor.similarity(vector);
            match best {
                Some((_, score)) if score >= similarity => {}
                _ => best = Some((template, similarity)),
            }
        }
        best.map(|(template, _)| template)
    }

    /// Every template, most similar anchor first. Ties keep catalog order.
    pub fn ranked(&self, vector: &SemanticVector) -> Vec<&PlanTemplate> {
        let mut ranked: Vec<(&PlanTemplate, f64)> = self
            .templates
            .iter()
            .map(|t| (t, t.anchor.similarity(vector)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.into_iter().map(|(t, _)| t).collect()
    }

    /// Template of `profile` serving `category`, falling back to the
    /// category's standard template. General intents are served as retrieval.
    pub fn for_profile(
        &self,
        category: IntentCategory,
        profile: PlanProfile,
    ) -> Option<&PlanTemplate> {
        self.serving(category)
            .find(|t| t.profile == profile)
            .or_else(|| self.serving(category).find(|t| t.profile == PlanProfile::Standard))
    }

    /// Templates serving `category`, in catalog order. General intents are
    /// served as retrieval.
    pub fn serving(&self, category: IntentCategory) -> impl Iterator<Item = &PlanTemplate> + '_ {
        let category = match category {
            IntentCategory::General => IntentCategory::Retrieval,
            other => other,
        };
        self.templates.iter().filter(move |t| t.category == category)
    }
}

struct TemplateDef {
    plan_type: &'static str,
    category: IntentCategory,
    profile: PlanProfile,
    title: &'static str,
    description: &'static str,
    steps: Vec<(&'static str, StepKind, f64)>,
    external_dependencies: u32,
    edge_cases_covered: u32,
    optimizations: Vec<Optimization>,
    base_duration_ms: u64,
    base_cost: f64,
    anchor: (&'static str, &'static str, &'static [&'static str], Certainty),
}

impl TemplateDef {
    fn build(self, encoder: &SemanticEncoder) -> PlanTemplate {
        let (action, entity, attributes, certainty) = self.anchor;
        let mut summary = IntentSummary::new(action, entity).with_certainty(certainty);
        for attribute in attributes {
            summary = summary.with_attribute(*attribute);
        }

        PlanTemplate {
            plan_type: PlanType::new(self.plan_type),
            category: self.category,
            profile: self.profile,
            title: self.title.to_string(),
            description: self.description.to_string(),
            steps: self
                .steps
                .into_iter()
                .map(|(name, kind, weight)| PlanStep::new(name, kind, weight))
                .collect(),
            external_dependencies: self.external_dependencies,
            edge_cases_covered: self.edge_cases_covered,
            optimizations: self.optimizations,
            base_duration_ms: self.base_duration_ms,
            base_cost: self.base_cost,
            anchor: encoder.encode(&summary).vector,
        }
    }
}

fn builtin_defs() -> Vec<TemplateDef> {
    use Optimization::*;
    use StepKind::*;

    vec![
        TemplateDef {
            plan_type: "lookup.indexed",
            category: IntentCategory::Retrieval,
            profile: PlanProfile::Standard,
            title: "Indexed lookup",
            description: "Filter through the primary index and read matching rows",
            steps: vec![("index_filter", Filter, 0.618), ("fetch_rows", Read, 0.382)],
            external_dependencies: 0,
            edge_cases_covered: 4,
            optimizations: vec![Indexed, Bounded],
            base_duration_ms: 24,
            base_cost: 1.0,
            anchor: ("search", "record", &["id"], Certainty::High),
        },
        TemplateDef {
            plan_type: "lookup.cached",
            category: IntentCategory::Retrieval,
            profile: PlanProfile::CacheFirst,
            title: "Cache-first lookup",
            description: "Serve from the read-through cache, falling back to the index",
            steps: vec![("cache_probe", Cache, 0.618), ("fetch_rows", Read, 0.382)],
            external_dependencies: 1,
            edge_cases_covered: 4,
            optimizations: vec![Cached, Indexed, Bounded],
            base_duration_ms: 6,
            base_cost: 0.4,
            anchor: ("get", "record", &["recent"], Certainty::High),
        },
        TemplateDef {
            plan_type: "lookup.partitioned",
            category: IntentCategory::Retrieval,
            profile: PlanProfile::LoadDistributing,
            title: "Partitioned lookup",
            description: "Fan the lookup out across partitions and merge the results",
            steps: vec![
                ("fan_out", Fanout, 0.5),
                ("scan_partition", Read, 0.3),
                ("merge", Join, 0.2),
            ],
            external_dependencies: 1,
            edge_cases_covered: 3,
            optimizations: vec![Bounded],
            base_duration_ms: 180,
            base_cost: 4.0,
            anchor: ("list", "records", &["region"], Certainty::Medium),
        },
        TemplateDef {
            plan_type: "lookup.full_scan",
            category: IntentCategory::Retrieval,
            profile: PlanProfile::Standard,
            title: "Full scan",
            description: "Scan the whole collection and filter in memory",
            steps: vec![("scan", Read, 0.8), ("filter", Filter, 0.2)],
            external_dependencies: 0,
            edge_cases_covered: 2,
            optimizations: vec![],
            base_duration_ms: 900,
            base_cost: 8.0,
            anchor: ("search", "text", &[], Certainty::Low),
        },
        TemplateDef {
            plan_type: "mutation.transactional",
            category: IntentCategory::Mutation,
            profile: PlanProfile::Standard,
            title: "Transactional write",
            description: "Locate the target row and write it inside one transaction",
            steps: vec![("locate", Filter, 0.382), ("write", Write, 0.618)],
            external_dependencies: 0,
            edge_cases_covered: 4,
            optimizations: vec![Bounded],
            base_duration_ms: 35,
            base_cost: 1.5,
            anchor: ("update", "record", &["id"], Certainty::High),
        },
        TemplateDef {
            plan_type: "mutation.batched",
            category: IntentCategory::Mutation,
            profile: PlanProfile::LoadDistributing,
            title: "Batched write",
            description: "Queue writes into batches applied by background workers",
            steps: vec![
                ("fan_out", Fanout, 0.5),
                ("write_batch", Write, 0.35),
                ("verify", Read, 0.15),
            ],
            external_dependencies: 1,
            edge_cases_covered: 3,
            optimizations: vec![Bounded],
            base_duration_ms: 250,
            base_cost: 2.5,
            anchor: ("create", "records", &["batch"], Certainty::Medium),
        },
        TemplateDef {
            plan_type: "analysis.aggregate",
            category: IntentCategory::Analysis,
            profile: PlanProfile::Standard,
            title: "Live aggregate",
            description: "Read, join and aggregate the source rows on demand",
            steps: vec![
                ("read", Read, 0.5),
                ("aggregate", Aggregate, 0.3),
                ("join_dimensions", Join, 0.2),
            ],
            external_dependencies: 0,
            edge_cases_covered: 3,
            optimizations: vec![Indexed],
            base_duration_ms: 400,
            base_cost: 5.0,
            anchor: ("analyze", "metrics", &["group"], Certainty::Medium),
        },
        TemplateDef {
            plan_type: "analysis.materialized",
            category: IntentCategory::Analysis,
            profile: PlanProfile::CacheFirst,
            title: "Materialized aggregate",
            description: "Answer from a maintained materialized view",
            steps: vec![("view_probe", Cache, 0.618), ("aggregate", Aggregate, 0.382)],
            external_dependencies: 1,
            edge_cases_covered: 4,
            optimizations: vec![Cached, Bounded, Ranked],
            base_duration_ms: 15,
            base_cost: 0.8,
            anchor: ("summarize", "metrics", &["daily"], Certainty::High),
        },
        TemplateDef {
            plan_type: "analysis.sharded",
            category: IntentCategory::Analysis,
            profile: PlanProfile::LoadDistributing,
            title: "Sharded aggregate",
            description: "Aggregate per shard in parallel and combine the partials",
            steps: vec![
                ("fan_out", Fanout, 0.45),
                ("aggregate_shard", Aggregate, 0.35),
                ("combine", Join, 0.2),
            ],
            external_dependencies: 2,
            edge_cases_covered: 3,
            optimizations: vec![Bounded],
            base_duration_ms: 600,
            base_cost: 6.0,
            anchor: ("aggregate", "events", &["partition"], Certainty::Low),
        },
        TemplateDef {
            plan_type: "report.export",
            category: IntentCategory::Reporting,
            profile: PlanProfile::Standard,
            title: "Ranked export",
            description: "Read, rank and write the result set to an export file",
            steps: vec![("read", Read, 0.618), ("write_export", Write, 0.382)],
            external_dependencies: 1,
            edge_cases_covered: 3,
            optimizations: vec![Ranked, Bounded],
            base_duration_ms: 120,
            base_cost: 2.0,
            anchor: ("export", "report", &["csv"], Certainty::Medium),
        },
    ]
}
