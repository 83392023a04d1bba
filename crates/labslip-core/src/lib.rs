//! Labslip Core Library
//!
//! Case design, validation and submission for dental lab slips, with a local
//! cache that survives reloads.
//!
//! # Architecture
//!
//! ```text
//! Host UI events → CaseDesign (single state owner) ──persist──→ SQLite cache
//!                        │                                         │
//!                        │                              rehydrate on mount
//!                     Submit
//!                        │
//!        Validate → MapProduct (CatalogIndex) → BuildPayload
//!                        │
//!                  POST /cases ──→ IdMap, delivery dates, attachments
//!                        │
//!                  ErrorReport (validation, 422, network, other)
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (Slip, Product, ProductConfiguration, CaseDraft, etc.)
//! - [`resolver`]: Catalog matching cascade and the per-fetch `CatalogIndex`
//! - [`design`]: In-progress case state and its mutation handlers
//! - [`mapper`]: Validation and wire payload construction
//! - [`api`]: Backend case API (trait + HTTP client)
//! - [`submit`]: Submission orchestration
//! - [`cache`]: Local cache persist and rehydrate
//! - [`db`]: SQLite storage
//! - [`report`]: User-facing error reports
//! - [`export`]: Print preview summaries
//! - [`config`]: Client configuration

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod design;
pub mod export;
pub mod mapper;
pub mod models;
pub mod report;
pub mod resolver;
pub mod submit;

// Re-export commonly used types
pub use api::{ApiError, CaseApi, CaseCreated, HttpCaseApi};
pub use cache::{CacheSync, Rehydration};
pub use config::{ClientConfig, ConfigError};
pub use db::Database;
pub use design::{CaseDesign, ConfigUpdate, DesignError, ToothStatus};
pub use mapper::{CaseMapper, CasePayload};
pub use models::{
    Arch, ArchType, CaseDraft, CaseInfo, Catalog, ExtractionKind, Product, ProductConfiguration,
    Session, Slip,
};
pub use report::ErrorReport;
pub use resolver::{CatalogIndex, ShadeFallback};
pub use submit::{CaseSubmitter, SubmitOutcome, SubmitReceipt, SubmitRejection};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::ApiResult;
use crate::db::PendingAttachment;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum LabSlipError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Case error: {0}")]
    CaseError(String),
}

impl From<db::DbError> for LabSlipError {
    fn from(e: db::DbError) -> Self {
        LabSlipError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for LabSlipError {
    fn from(e: serde_json::Error) -> Self {
        LabSlipError::SerializationError(e.to_string())
    }
}

impl From<ConfigError> for LabSlipError {
    fn from(e: ConfigError) -> Self {
        LabSlipError::ConfigError(e.to_string())
    }
}

impl From<DesignError> for LabSlipError {
    fn from(e: DesignError) -> Self {
        match e {
            DesignError::SlipNotFound(_)
            | DesignError::ProductNotFound(_)
            | DesignError::NoteNotFound(_) => LabSlipError::NotFound(e.to_string()),
            DesignError::InvalidTooth(_) | DesignError::ArchNotDeclared { .. } => {
                LabSlipError::InvalidInput(e.to_string())
            }
            DesignError::Submitted | DesignError::SubmissionInFlight => {
                LabSlipError::CaseError(e.to_string())
            }
        }
    }
}

impl From<resolver::ResolveError> for LabSlipError {
    fn from(e: resolver::ResolveError) -> Self {
        LabSlipError::InvalidInput(e.to_string())
    }
}

impl From<ApiError> for LabSlipError {
    fn from(e: ApiError) -> Self {
        LabSlipError::CaseError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for LabSlipError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        LabSlipError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install the `tracing` subscriber. `RUST_LOG` overrides the `info` default.
#[uniffi::export]
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A host may already have installed one
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Open the core using a TOML config file, or defaults plus environment
/// overrides when no path is given.
#[uniffi::export]
pub fn open_core(config_path: Option<String>) -> Result<Arc<LabSlipCore>, LabSlipError> {
    let config = match config_path {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::from_env()?,
    };
    let db = Database::open(&config.database_path)?;
    LabSlipCore::new(db, config).map(Arc::new)
}

/// Create a core backed by an in-memory database (for testing).
#[uniffi::export]
pub fn open_core_in_memory() -> Result<Arc<LabSlipCore>, LabSlipError> {
    let db = Database::open_in_memory()?;
    LabSlipCore::new(db, ClientConfig::default()).map(Arc::new)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe case state and cache for FFI.
#[derive(uniffi::Object)]
pub struct LabSlipCore {
    db: Arc<Mutex<Database>>,
    design: Mutex<Option<CaseDesign>>,
    index: Mutex<Option<Arc<CatalogIndex>>>,
    config: ClientConfig,
}

impl LabSlipCore {
    fn new(db: Database, config: ClientConfig) -> Result<Self, LabSlipError> {
        let index = db
            .get_cached_catalog()?
            .map(|catalog| Arc::new(CatalogIndex::new(catalog, config.shade_fallback)));
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            design: Mutex::new(None),
            index: Mutex::new(index),
            config,
        })
    }

    /// Run a state handler, then write the cache.
    fn mutate<T>(
        &self,
        handler: impl FnOnce(&mut CaseDesign) -> Result<T, DesignError>,
    ) -> Result<T, LabSlipError> {
        let mut guard = self.design.lock()?;
        let design = guard
            .as_mut()
            .ok_or_else(|| LabSlipError::NotFound("No case in progress".into()))?;
        let value = handler(design)?;

        let db = self.db.lock()?;
        CacheSync::new(&db).persist(design)?;
        Ok(value)
    }

    fn read<T>(&self, view: impl FnOnce(&CaseDesign) -> T) -> Result<T, LabSlipError> {
        let guard = self.design.lock()?;
        let design = guard
            .as_ref()
            .ok_or_else(|| LabSlipError::NotFound("No case in progress".into()))?;
        Ok(view(design))
    }

    fn catalog_index(&self) -> Result<Arc<CatalogIndex>, LabSlipError> {
        self.index
            .lock()?
            .clone()
            .ok_or_else(|| LabSlipError::NotFound("Catalog not loaded".into()))
    }

    /// Submit through the backend built by `connect` from the session token.
    /// Once the backend accepts the case, local failures are logged and the
    /// result still reports the submission.
    fn submit_with<A, F>(&self, connect: F) -> Result<FfiSubmitResult, LabSlipError>
    where
        A: CaseApi,
        F: FnOnce(Option<String>) -> ApiResult<A>,
    {
        let index = self.catalog_index()?;
        let session = self.db.lock()?.get_session()?.unwrap_or_default();
        let fade_after = chrono::Duration::seconds(self.config.error_fade_secs);

        let payload = {
            let mut guard = self.design.lock()?;
            let design = guard
                .as_mut()
                .ok_or_else(|| LabSlipError::NotFound("No case in progress".into()))?;
            let db = self.db.lock()?;
            let submitter = CaseSubmitter::new(&db, &index)
                .with_default_location(session.location_id)
                .with_fade_after(fade_after);
            match submitter.prepare(design) {
                Ok(payload) => payload,
                Err(SubmitRejection::Blocked(reason)) => {
                    return Ok(FfiSubmitResult::ignored(reason.to_string()))
                }
                Err(SubmitRejection::Invalid(report)) => {
                    return Ok(FfiSubmitResult::rejected(report))
                }
            }
        };

        let api = connect(session.api_token.clone());
        let result = match &api {
            Ok(api) => api.create_case(&payload),
            Err(e) => Err(e.clone()),
        };

        let mut guard = self.design.lock()?;
        let design = guard
            .as_mut()
            .ok_or_else(|| LabSlipError::NotFound("No case in progress".into()))?;
        let db = self.db.lock()?;
        let submitter = CaseSubmitter::new(&db, &index)
            .with_default_location(session.location_id)
            .with_fade_after(fade_after);

        let mut receipt = match submitter.complete(design, result) {
            Ok(receipt) => receipt,
            Err(report) => {
                CacheSync::new(&db).persist(design)?;
                return Ok(FfiSubmitResult::rejected(report));
            }
        };

        match &api {
            Ok(api) => match submitter.upload_attachments(api, design.draft()) {
                Ok((uploaded, failed)) => {
                    receipt.attachments_uploaded = uploaded;
                    receipt.attachments_failed = failed;
                }
                Err(e) => error!(
                    "Case {} accepted but attachment uploads failed: {}",
                    receipt.case_id, e
                ),
            },
            Err(e) => warn!("Skipping attachment uploads: {}", e),
        }
        info!("Submitted case {}", receipt.case_id);
        Ok(FfiSubmitResult::submitted(receipt))
    }
}

#[uniffi::export]
impl LabSlipCore {
    // =========================================================================
    // Catalog and Session
    // =========================================================================

    /// Load a freshly fetched lookup catalog and rebuild the index.
    pub fn load_catalog(&self, catalog_json: String) -> Result<(), LabSlipError> {
        let catalog = Catalog::from_json(&catalog_json)?;
        self.db.lock()?.cache_catalog(&catalog)?;
        let index = CatalogIndex::new(catalog, self.config.shade_fallback);
        *self.index.lock()? = Some(Arc::new(index));
        Ok(())
    }

    pub fn has_catalog(&self) -> Result<bool, LabSlipError> {
        Ok(self.index.lock()?.is_some())
    }

    pub fn save_session(&self, session: FfiSession) -> Result<(), LabSlipError> {
        self.db.lock()?.save_session(&session.into())?;
        Ok(())
    }

    pub fn get_session(&self) -> Result<Option<FfiSession>, LabSlipError> {
        Ok(self.db.lock()?.get_session()?.map(Into::into))
    }

    pub fn clear_session(&self) -> Result<bool, LabSlipError> {
        Ok(self.db.lock()?.clear_session()?)
    }

    // =========================================================================
    // Case Lifecycle
    // =========================================================================

    /// Start a new case, replacing any case in progress.
    pub fn start_case(&self, case: FfiCaseInfo) -> Result<String, LabSlipError> {
        let design = CaseDesign::new(case.into());
        let draft_id = design.draft().draft_id.clone();
        *self.design.lock()? = Some(design);
        Ok(draft_id)
    }

    /// Restore cached state on mount.
    pub fn rehydrate(&self) -> Result<FfiRehydration, LabSlipError> {
        let rehydration = CacheSync::new(&*self.db.lock()?).rehydrate()?;
        Ok(match rehydration {
            Rehydration::Fresh => FfiRehydration::Fresh,
            Rehydration::Redirect { draft_id } => FfiRehydration::Redirect { draft_id },
            Rehydration::Restored {
                design,
                open_product,
            } => {
                let draft_id = design.draft().draft_id.clone();
                *self.design.lock()? = Some(design);
                FfiRehydration::Restored {
                    draft_id,
                    open_product,
                }
            }
        })
    }

    /// Start over after a submission, keeping the patient details.
    pub fn reset(&self) -> Result<String, LabSlipError> {
        let mut guard = self.design.lock()?;
        let design = guard
            .as_mut()
            .ok_or_else(|| LabSlipError::NotFound("No case in progress".into()))?;
        let case = design.draft().case.clone();
        design.reset(case);
        Ok(design.draft().draft_id.clone())
    }

    pub fn set_case_info(&self, case: FfiCaseInfo) -> Result<(), LabSlipError> {
        self.mutate(|design| design.set_case_info(case.into()))
    }

    /// Current draft as JSON for rendering.
    pub fn draft_json(&self) -> Result<String, LabSlipError> {
        let json = self.read(|design| serde_json::to_string(design.draft()))??;
        Ok(json)
    }

    pub fn is_submitted(&self) -> Result<bool, LabSlipError> {
        self.read(|design| design.is_submitted())
    }

    pub fn open_product(&self) -> Result<Option<String>, LabSlipError> {
        self.read(|design| design.open_product().map(str::to_string))
    }

    pub fn set_open_product(&self, product_id: Option<String>) -> Result<(), LabSlipError> {
        let mut guard = self.design.lock()?;
        if let Some(design) = guard.as_mut() {
            design.set_open_product(product_id);
        }
        Ok(())
    }

    // =========================================================================
    // Slips and Products
    // =========================================================================

    /// Add a slip. Without a location the session's default is used.
    pub fn add_slip(&self, location_id: Option<i64>) -> Result<String, LabSlipError> {
        let location_id = match location_id {
            Some(id) => Some(id),
            None => self.db.lock()?.get_session()?.and_then(|s| s.location_id),
        };
        self.mutate(|design| design.add_slip(location_id))
    }

    pub fn remove_slip(&self, slip_id: String) -> Result<(), LabSlipError> {
        self.mutate(|design| design.remove_slip(&slip_id).map(|_| ()))
    }

    /// Add a catalog product. `arch_type` is "maxillary", "mandibular" or "both".
    pub fn add_product(
        &self,
        slip_id: Option<String>,
        catalog_id: i64,
        name: String,
        arch_type: String,
    ) -> Result<String, LabSlipError> {
        let arch_type = ArchType::parse(&arch_type)
            .ok_or_else(|| LabSlipError::InvalidInput(format!("Unknown arch type: {arch_type}")))?;
        self.mutate(|design| design.add_product(slip_id.as_deref(), catalog_id, name, arch_type))
    }

    pub fn remove_product(&self, product_id: String) -> Result<(), LabSlipError> {
        let removed = self.mutate(|design| design.remove_product(&product_id))?;
        self.db.lock()?.delete_product_selections(&removed.client_id)?;
        Ok(())
    }

    pub fn update_configuration(
        &self,
        product_id: String,
        arch: String,
        update: FfiConfigUpdate,
    ) -> Result<(), LabSlipError> {
        let arch = parse_arch(&arch)?;
        self.mutate(|design| design.update_configuration(&product_id, arch, update.into()))
    }

    // =========================================================================
    // Teeth and Extractions
    // =========================================================================

    pub fn select_tooth(&self, product_id: String, tooth: u8) -> Result<(), LabSlipError> {
        self.mutate(|design| design.select_tooth(&product_id, tooth))
    }

    pub fn deselect_tooth(&self, product_id: String, tooth: u8) -> Result<(), LabSlipError> {
        self.mutate(|design| design.deselect_tooth(&product_id, tooth))
    }

    /// Assign a tooth to an extraction kind, by its label ("Missing teeth", ...).
    pub fn assign_extraction(
        &self,
        product_id: String,
        kind: String,
        tooth: u8,
    ) -> Result<(), LabSlipError> {
        let kind = ExtractionKind::from_label(&kind)
            .ok_or_else(|| LabSlipError::InvalidInput(format!("Unknown extraction kind: {kind}")))?;
        self.mutate(|design| design.assign_extraction(&product_id, kind, tooth))
    }

    pub fn clear_extraction(&self, product_id: String, tooth: u8) -> Result<(), LabSlipError> {
        self.mutate(|design| design.clear_extraction(&product_id, tooth).map(|_| ()))
    }

    /// Marked teeth on one arch, for the arch viewers.
    pub fn tooth_status(&self, arch: String) -> Result<Vec<FfiToothStatus>, LabSlipError> {
        let arch = parse_arch(&arch)?;
        self.read(|design| {
            design
                .tooth_status(arch)
                .into_iter()
                .map(|(tooth, status)| FfiToothStatus {
                    tooth,
                    status: match status {
                        ToothStatus::Selected => "selected".to_string(),
                        ToothStatus::Extraction(kind) => kind.label().to_string(),
                    },
                })
                .collect()
        })
    }

    // =========================================================================
    // Notes, Rush and Attachments
    // =========================================================================

    pub fn add_note(
        &self,
        slip_id: String,
        text: String,
        stage: Option<String>,
    ) -> Result<String, LabSlipError> {
        let author = self.db.lock()?.get_session()?.and_then(|s| s.display_name);
        self.mutate(|design| design.add_note(&slip_id, text, stage, author))
    }

    pub fn remove_note(&self, slip_id: String, note_id: String) -> Result<(), LabSlipError> {
        self.mutate(|design| design.remove_note(&slip_id, &note_id))
    }

    /// Request a rush delivery; `date` is `YYYY-MM-DD`.
    pub fn request_rush(
        &self,
        slip_id: String,
        date: String,
        reason: Option<String>,
    ) -> Result<(), LabSlipError> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|e| LabSlipError::InvalidInput(format!("Invalid rush date '{date}': {e}")))?;
        self.mutate(|design| design.request_rush(&slip_id, date, reason))
    }

    pub fn cancel_rush(&self, slip_id: String) -> Result<(), LabSlipError> {
        self.mutate(|design| design.cancel_rush(&slip_id))
    }

    /// Stash a file for upload once the slip exists on the server.
    /// Returns false if the same file is already stashed for the slip.
    pub fn stash_attachment(
        &self,
        slip_id: String,
        file_name: String,
        content_type: String,
        content: Vec<u8>,
    ) -> Result<bool, LabSlipError> {
        let attachment = PendingAttachment::new(slip_id, file_name, content_type, content);
        Ok(self.db.lock()?.stash_attachment(&attachment)?)
    }

    pub fn pending_attachment_count(&self) -> Result<u64, LabSlipError> {
        Ok(self.db.lock()?.pending_attachment_count()? as u64)
    }

    // =========================================================================
    // Validation, Submission and Export
    // =========================================================================

    /// Missing fields, as shown before submitting.
    pub fn validate(&self) -> Result<Vec<String>, LabSlipError> {
        self.read(|design| mapper::validate_draft(design.draft()))
    }

    /// Submit the case. The state lock is released while the request is sent.
    pub fn submit(&self) -> Result<FfiSubmitResult, LabSlipError> {
        self.submit_with(|token| HttpCaseApi::new(&self.config, token))
    }

    /// Print preview, one text block per slip.
    pub fn print_preview(&self) -> Result<Vec<String>, LabSlipError> {
        self.read(|design| {
            export::SlipSummary::from_draft(design.draft())
                .iter()
                .map(|summary| summary.to_text())
                .collect()
        })
    }

    pub fn print_preview_json(&self) -> Result<String, LabSlipError> {
        let summaries = self.read(|design| export::SlipSummary::from_draft(design.draft()))?;
        Ok(serde_json::to_string_pretty(&summaries)?)
    }

    /// Delivery dates recorded for a submitted draft.
    pub fn delivery_dates(&self, draft_id: String) -> Result<Vec<FfiDeliveryDate>, LabSlipError> {
        let dates = self.db.lock()?.delivery_dates_for_draft(&draft_id)?;
        Ok(dates
            .into_iter()
            .map(|(slip_id, date)| FfiDeliveryDate { slip_id, date })
            .collect())
    }
}

fn parse_arch(tag: &str) -> Result<Arch, LabSlipError> {
    match ArchType::parse(tag) {
        Some(ArchType::Maxillary) => Ok(Arch::Maxillary),
        Some(ArchType::Mandibular) => Ok(Arch::Mandibular),
        _ => Err(LabSlipError::InvalidInput(format!("Unknown arch: {tag}"))),
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe case details.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCaseInfo {
    pub patient_name: String,
    pub doctor_id: Option<i64>,
    pub office_id: Option<i64>,
    pub case_number: Option<String>,
}

impl From<FfiCaseInfo> for CaseInfo {
    fn from(case: FfiCaseInfo) -> Self {
        CaseInfo {
            patient_name: case.patient_name,
            doctor_id: case.doctor_id,
            office_id: case.office_id,
            case_number: case.case_number,
        }
    }
}

/// FFI-safe session.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSession {
    pub user_id: Option<i64>,
    pub display_name: Option<String>,
    pub location_id: Option<i64>,
    pub api_token: Option<String>,
}

impl From<Session> for FfiSession {
    fn from(session: Session) -> Self {
        Self {
            user_id: session.user_id,
            display_name: session.display_name,
            location_id: session.location_id,
            api_token: session.api_token,
        }
    }
}

impl From<FfiSession> for Session {
    fn from(session: FfiSession) -> Self {
        Session {
            user_id: session.user_id,
            display_name: session.display_name,
            location_id: session.location_id,
            api_token: session.api_token,
        }
    }
}

/// FFI-safe rehydration result.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiRehydration {
    Fresh,
    Redirect {
        draft_id: String,
    },
    Restored {
        draft_id: String,
        open_product: Option<String>,
    },
}

/// FFI-safe configuration change.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiConfigUpdate {
    Restoration { value: String },
    ProductName { value: String },
    Grade { value: String },
    Stage { value: String },
    TeethShadeBrand { value: String },
    TeethShade { value: String },
    GumShadeBrand { value: String },
    GumShade { value: String },
    Impression { name: String, quantity: u32 },
    AddOn { name: String, quantity: u32 },
}

impl From<FfiConfigUpdate> for ConfigUpdate {
    fn from(update: FfiConfigUpdate) -> Self {
        match update {
            FfiConfigUpdate::Restoration { value } => ConfigUpdate::Restoration(value),
            FfiConfigUpdate::ProductName { value } => ConfigUpdate::ProductName(value),
            FfiConfigUpdate::Grade { value } => ConfigUpdate::Grade(value),
            FfiConfigUpdate::Stage { value } => ConfigUpdate::Stage(value),
            FfiConfigUpdate::TeethShadeBrand { value } => ConfigUpdate::TeethShadeBrand(value),
            FfiConfigUpdate::TeethShade { value } => ConfigUpdate::TeethShade(value),
            FfiConfigUpdate::GumShadeBrand { value } => ConfigUpdate::GumShadeBrand(value),
            FfiConfigUpdate::GumShade { value } => ConfigUpdate::GumShade(value),
            FfiConfigUpdate::Impression { name, quantity } => {
                ConfigUpdate::Impression { name, quantity }
            }
            FfiConfigUpdate::AddOn { name, quantity } => ConfigUpdate::AddOn { name, quantity },
        }
    }
}

/// FFI-safe tooth marker.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiToothStatus {
    pub tooth: u8,
    /// "selected" or an extraction kind label
    pub status: String,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDeliveryDate {
    pub slip_id: i64,
    pub date: String,
}

/// FFI-safe submission result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSubmitResult {
    pub submitted: bool,
    /// Nothing was sent (already submitted or in flight)
    pub ignored: bool,
    pub case_id: Option<i64>,
    pub slip_ids: Vec<i64>,
    /// Messages to show together in the error panel
    pub messages: Vec<String>,
    pub fade_after_secs: i64,
    pub attachments_failed: u32,
}

impl FfiSubmitResult {
    fn submitted(receipt: SubmitReceipt) -> Self {
        Self {
            submitted: true,
            ignored: false,
            case_id: Some(receipt.case_id),
            slip_ids: receipt.slip_ids,
            messages: Vec::new(),
            fade_after_secs: 0,
            attachments_failed: receipt.attachments_failed as u32,
        }
    }

    fn rejected(report: ErrorReport) -> Self {
        Self {
            submitted: false,
            ignored: false,
            case_id: None,
            slip_ids: Vec::new(),
            fade_after_secs: report.fade_after.num_seconds(),
            messages: report.messages,
            attachments_failed: 0,
        }
    }

    fn ignored(reason: String) -> Self {
        Self {
            submitted: false,
            ignored: true,
            case_id: None,
            slip_ids: Vec::new(),
            messages: vec![reason],
            fade_after_secs: 0,
            attachments_failed: 0,
        }
    }
}
