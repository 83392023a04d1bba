//! Case submission.
//!
//! `prepare` and `complete` bracket the network call so a caller holding the
//! design behind a lock can release it while the request is in flight.

use chrono::Duration;
use tracing::{debug, error, info, warn};

use crate::api::{ApiError, CaseApi, CaseCreated};
use crate::cache::CacheSync;
use crate::db::{Database, DbResult};
use crate::design::{CaseDesign, DesignError};
use crate::mapper::{validate_draft, CaseMapper, CasePayload};
use crate::models::{CaseDraft, Slip, SlipStatus};
use crate::report::{ErrorReport, DEFAULT_FADE_SECS};
use crate::resolver::CatalogIndex;

/// Why a submission did not reach the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejection {
    /// Already submitted or a request is in flight
    Blocked(DesignError),
    Invalid(ErrorReport),
}

/// Server ids and follow-up work from a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub case_id: i64,
    pub slip_ids: Vec<i64>,
    /// (slip server id, delivery date)
    pub delivery_dates: Vec<(i64, String)>,
    pub attachments_uploaded: usize,
    pub attachments_failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted(SubmitReceipt),
    Rejected(ErrorReport),
    /// Duplicate or late submit, nothing sent
    Ignored(DesignError),
}

/// Error report for a failed backend call.
pub fn report_for(err: &ApiError) -> ErrorReport {
    match err {
        ApiError::Validation(_) => {
            let messages = err.field_messages();
            if messages.is_empty() {
                ErrorReport::generic_failure()
            } else {
                ErrorReport::new(messages)
            }
        }
        ApiError::Network(_) => ErrorReport::network_failure(),
        ApiError::Status { .. } | ApiError::Decode(_) => ErrorReport::generic_failure(),
    }
}

/// Validates, maps and submits a case design.
pub struct CaseSubmitter<'a> {
    db: &'a Database,
    index: &'a CatalogIndex,
    default_location: Option<i64>,
    fade_after: Duration,
}

impl<'a> CaseSubmitter<'a> {
    pub fn new(db: &'a Database, index: &'a CatalogIndex) -> Self {
        Self {
            db,
            index,
            default_location: None,
            fade_after: Duration::seconds(DEFAULT_FADE_SECS),
        }
    }

    pub fn with_default_location(mut self, location_id: Option<i64>) -> Self {
        self.default_location = location_id;
        self
    }

    pub fn with_fade_after(mut self, fade_after: Duration) -> Self {
        self.fade_after = fade_after;
        self
    }

    /// Validate and map the design, then raise the in-flight flag.
    pub fn prepare(&self, design: &mut CaseDesign) -> Result<CasePayload, SubmitRejection> {
        if design.is_submitted() {
            return Err(SubmitRejection::Blocked(DesignError::Submitted));
        }
        if design.is_submitting() {
            return Err(SubmitRejection::Blocked(DesignError::SubmissionInFlight));
        }

        let issues = validate_draft(design.draft());
        if !issues.is_empty() {
            info!("Submission blocked by {} validation issues", issues.len());
            return Err(self.rejection(issues));
        }

        let payload = CaseMapper::new(self.index)
            .with_default_location(self.default_location)
            .build_payload(design.draft())
            .map_err(|errors| {
                info!("Submission blocked by {} mapping errors", errors.len());
                self.rejection(errors)
            })?;

        design
            .begin_submission()
            .map_err(SubmitRejection::Blocked)?;
        Ok(payload)
    }

    /// Lower the in-flight flag and apply the backend result.
    pub fn complete(
        &self,
        design: &mut CaseDesign,
        result: Result<CaseCreated, ApiError>,
    ) -> Result<SubmitReceipt, ErrorReport> {
        design.end_submission();

        let created = match result {
            Ok(created) => created,
            Err(err) => {
                warn!("Case submission failed: {}", err);
                return Err(report_for(&err).with_fade_after(self.fade_after));
            }
        };

        let draft_id = design.draft().draft_id.clone();
        apply_created(design.draft_mut(), &created, self.default_location);
        info!(
            "Case {} created with {} slips",
            created.case_id,
            created.slips.len()
        );

        // The case exists on the server now; local bookkeeping failures are logged only.
        let delivery_dates = match self.record_delivery_dates(design.draft()) {
            Ok(dates) => dates,
            Err(e) => {
                error!("Failed to record delivery dates: {}", e);
                Vec::new()
            }
        };
        if let Err(e) = CacheSync::new(self.db).clear(&draft_id) {
            error!("Failed to clear cached draft {}: {}", draft_id, e);
        }

        Ok(SubmitReceipt {
            case_id: created.case_id,
            slip_ids: created.slips.iter().map(|slip| slip.id).collect(),
            delivery_dates,
            attachments_uploaded: 0,
            attachments_failed: 0,
        })
    }

    /// Upload attachments stashed for submitted slips. Failures stay stashed.
    pub fn upload_attachments<A: CaseApi>(
        &self,
        api: &A,
        draft: &CaseDraft,
    ) -> DbResult<(usize, usize)> {
        let mut uploaded = 0;
        let mut failed = 0;

        for slip in &draft.slips {
            let Some(server_id) = slip.server_id else {
                continue;
            };
            for attachment in self.db.pending_attachments_for_slip(&slip.client_id)? {
                match api.upload_attachment(server_id, &attachment) {
                    Ok(()) => {
                        self.db.remove_attachment(&attachment.attachment_id)?;
                        uploaded += 1;
                    }
                    Err(e) => {
                        warn!(
                            "Failed to upload {} to slip {}: {}",
                            attachment.file_name, server_id, e
                        );
                        failed += 1;
                    }
                }
            }
        }
        Ok((uploaded, failed))
    }

    /// Prepare, send, complete and upload attachments.
    pub fn submit<A: CaseApi>(&self, api: &A, design: &mut CaseDesign) -> SubmitOutcome {
        let payload = match self.prepare(design) {
            Ok(payload) => payload,
            Err(SubmitRejection::Blocked(reason)) => {
                debug!("Ignoring submit: {}", reason);
                return SubmitOutcome::Ignored(reason);
            }
            Err(SubmitRejection::Invalid(report)) => return SubmitOutcome::Rejected(report),
        };

        let result = api.create_case(&payload);
        let mut receipt = match self.complete(design, result) {
            Ok(receipt) => receipt,
            Err(report) => return SubmitOutcome::Rejected(report),
        };

        match self.upload_attachments(api, design.draft()) {
            Ok((uploaded, failed)) => {
                receipt.attachments_uploaded = uploaded;
                receipt.attachments_failed = failed;
            }
            Err(e) => error!("Failed to read stashed attachments: {}", e),
        }
        SubmitOutcome::Submitted(receipt)
    }

    fn rejection(&self, messages: Vec<String>) -> SubmitRejection {
        SubmitRejection::Invalid(ErrorReport::new(messages).with_fade_after(self.fade_after))
    }

    fn record_delivery_dates(&self, draft: &CaseDraft) -> DbResult<Vec<(i64, String)>> {
        let mut dates = Vec::new();
        for slip in &draft.slips {
            if let (Some(server_id), Some(date)) = (slip.server_id, slip.delivery_date.as_deref()) {
                self.db
                    .record_delivery_date(server_id, &slip.client_id, &draft.draft_id, date)?;
                dates.push((server_id, date.to_string()));
            }
        }
        Ok(dates)
    }
}

/// Record server ids on the draft and mark it submitted.
fn apply_created(draft: &mut CaseDraft, created: &CaseCreated, default_location: Option<i64>) {
    let sent_implicit_slip = !draft.slips.iter().any(|slip| !slip.products.is_empty())
        && !draft.unslipped_products.is_empty();
    if sent_implicit_slip {
        let mut slip = Slip::new(default_location);
        slip.client_id = draft.draft_id.clone();
        slip.products = std::mem::take(&mut draft.unslipped_products);
        draft.slips.push(slip);
    }

    draft.ids.case_id = Some(created.case_id);
    for created_slip in &created.slips {
        let Some(slip) = draft
            .slips
            .iter_mut()
            .find(|slip| slip.client_id == created_slip.client_ref)
        else {
            warn!("Backend returned unknown slip ref {}", created_slip.client_ref);
            continue;
        };
        slip.server_id = Some(created_slip.id);
        slip.status = SlipStatus::Submitted;
        slip.delivery_date = created_slip.delivery_date.clone();

        for created_product in &created_slip.products {
            if let Some(product) = slip.product_mut(&created_product.client_ref) {
                // Both-arch products come back twice; keep the first id
                product.server_id.get_or_insert(created_product.id);
                draft
                    .ids
                    .products
                    .entry(created_product.client_ref.clone())
                    .or_insert(created_product.id);
            }
        }
        draft.ids.slips.insert(created_slip.client_ref.clone(), created_slip.id);
    }

    draft.submitted = true;
    draft.touch();
}
