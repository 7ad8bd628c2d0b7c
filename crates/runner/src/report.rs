//! Parameter and allocation reports.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::alloc::{format_bytes, AllocSnapshot};
use crate::config::BenchConfig;
use crate::fixture::BenchContext;

/// Allocation figures for one case, per operation.
#[derive(Debug, Clone, Serialize)]
pub struct CaseMemory {
    pub case: String,
    /// None when the counting allocator is not installed
    pub allocated_bytes: Option<u64>,
    pub allocations: Option<u64>,
}

impl CaseMemory {
    pub fn new(case: String, stats: Option<AllocSnapshot>) -> Self {
        Self {
            case,
            allocated_bytes: stats.map(|s| s.bytes),
            allocations: stats.map(|s| s.count),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemeSummary {
    pub scheme: String,
    pub parameters: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryReport {
    pub generated_at: DateTime<Utc>,
    pub profile: String,
    pub build: String,
    pub iterations_per_case: u32,
    pub schemes: Vec<SchemeSummary>,
    pub cases: Vec<CaseMemory>,
}

impl MemoryReport {
    pub fn new(config: &BenchConfig, ctx: &BenchContext) -> Self {
        Self {
            generated_at: Utc::now(),
            profile: config.profile.as_str().to_string(),
            build: config.build_profile.as_str().to_string(),
            iterations_per_case: config.alloc_iterations,
            schemes: scheme_summaries(ctx),
            cases: Vec::new(),
        }
    }

    pub fn add(&mut self, case: CaseMemory) {
        self.cases.push(case);
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Render the allocation table as plain text.
    pub fn to_text(&self) -> String {
        let width = self
            .cases
            .iter()
            .map(|c| c.case.len())
            .max()
            .unwrap_or(0)
            .max("Case".len());

        let mut out = String::new();
        out.push_str(&format!(
            "\nMemory diagnoser ({} run(s) per case, profile {})\n",
            self.iterations_per_case, self.profile
        ));
        out.push_str(&format!("{:<width$} | {:>12} | {:>11}\n", "Case", "Allocated", "Allocations"));
        out.push_str(&format!("{}-|-{}-|-{}\n", "-".repeat(width), "-".repeat(12), "-".repeat(11)));
        for c in &self.cases {
            let allocated = c.allocated_bytes.map(format_bytes).unwrap_or_else(|| "n/a".to_string());
            let count = c.allocations.map(|n| n.to_string()).unwrap_or_else(|| "n/a".to_string());
            out.push_str(&format!("{:<width$} | {:>12} | {:>11}\n", c.case, allocated, count));
        }
        out
    }
}

pub fn scheme_summaries(ctx: &BenchContext) -> Vec<SchemeSummary> {
    ctx.fixtures()
        .iter()
        .map(|f| SchemeSummary {
            scheme: f.kind().as_str().to_string(),
            parameters: f.scheme().describe(),
        })
        .collect()
}
