//! # tagmend-core
//!
//! The reconciliation kernel: detect resources whose tags use
//! non-canonical naming variants for a semantic attribute, and rewrite
//! them to the canonical form under explicit operator control.
//!
//! ## Pipeline
//!
//! ```text
//! VariantDictionary         ← Static configuration, one canonical key
//!     │
//! match_tags                ← Pure, per-resource, case-insensitive
//!     │
//! collect_findings          ← One deterministic scan over all boundaries
//!     │
//! plan_remediation          ← 1:1 findings → items, conflict capture
//!     │
//! ConfirmMode + Prompt      ← Three-mode gate, one-way escalation
//!     │
//! execute_run               ← delete → settle → merge, per item
//!     │
//! RunOutcome                ← remediated / skipped / errored tallies
//! ```
//!
//! Everything up to `execute_run` is side-effect free. Inventory access
//! goes through the `tagmend-inventory` traits, so the kernel has no
//! dependency on how calls are transported.

pub mod config;
pub mod confirm;
pub mod dictionary;
pub mod execute;
pub mod matcher;
pub mod outcome;
pub mod plan;
pub mod scan;

pub use config::{ConfigError, DEFAULT_CONFIG_PATH, DEFAULT_LOG_PATH, FALLBACK_CONFIG_PATH, RunConfig};
pub use confirm::{
    ConfirmMode, ItemAnswer, ItemDecision, ModeParseError, Prompt, PromptError, ScriptedPrompt,
    apply_answer, parse_answer,
};
pub use dictionary::{DictionaryError, VariantDictionary};
pub use execute::{
    DEFAULT_SETTLE_SECONDS, ExecuteConfig, MAX_SETTLE_SECONDS, NoopListener, RunListener,
    execute_run,
};
pub use matcher::{MatchOutcome, TagMatch, match_tags};
pub use outcome::{ItemResult, ItemStatus, RunOutcome};
pub use plan::{PlanError, RemediationItem, plan_remediation};
pub use scan::{BoundarySkip, Finding, ScanReport, collect_findings};
