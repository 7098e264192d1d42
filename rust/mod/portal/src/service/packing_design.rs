use tracing::{info, warn};

use brandhub_core::{Claims, ListParams, ListResult, ServiceError, new_id, now_rfc3339};

use crate::model::*;
use super::{PortalService, RecordFilter, Tracked, blob_err, optional, required};

const MAX_FILE_NAME: usize = 100;

impl Tracked for PackingDesign {
    const SECTION: Section = Section::PackingDesigns;

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn status_code(&self) -> &'static str {
        self.stage().code
    }

    fn title(&self) -> String {
        match &self.brand_name {
            Some(b) => format!("{} ({})", self.product_name, b),
            None => self.product_name.clone(),
        }
    }

    fn status_label(code: &str) -> &'static str {
        TRACKING_STAGES
            .iter()
            .chain(POST_PRINT_STAGES)
            .find(|s| s.code == code)
            .map(|s| s.label)
            .unwrap_or("Unknown")
    }
}

/// Blob key prefix holding every file of one design.
pub fn design_prefix(id: &str) -> String {
    format!("designs/{}/", id)
}

/// Reduce an uploaded file name to `[A-Za-z0-9._-]`, without leading dots.
pub fn sanitize_file_name(name: &str) -> String {
    // Browsers on Windows may send the full client path.
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    let cleaned: String = cleaned.chars().take(MAX_FILE_NAME).collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

fn step_error(design: &PackingDesign, action: &str) -> ServiceError {
    warn!(id = %design.meta.id, step = design.tracking_step, action, "packing design transition rejected");
    ServiceError::InvalidTransition(format!(
        "packing design is at \"{}\", cannot {}",
        design.stage().label,
        action
    ))
}

impl PortalService {
    pub fn create_packing_design(
        &self,
        claims: &Claims,
        input: CreatePackingDesign,
    ) -> Result<PackingDesign, ServiceError> {
        let design = PackingDesign {
            meta: Self::new_meta(claims),
            product_name: required("productName", &input.product_name)?,
            brand_name: optional(input.brand_name),
            notes: optional(input.notes),
            files: Vec::new(),
            tracking_step: STEP_RECEIVED,
            post_print_step: None,
            feedback: None,
        };
        self.insert(&design)?;
        info!(id = %design.meta.id, owner = %design.meta.owner_id, "packing design submitted");
        Ok(design)
    }

    pub fn get_packing_design(&self, claims: &Claims, id: &str) -> Result<PackingDesign, ServiceError> {
        self.load(claims, id)
    }

    pub fn list_packing_designs(
        &self,
        claims: &Claims,
        filter: &RecordFilter,
        params: &ListParams,
    ) -> Result<ListResult<PackingDesign>, ServiceError> {
        self.list(claims, filter, params)
    }

    /// Owner or admin, only before review starts. Removes stored files.
    pub fn delete_packing_design(&self, claims: &Claims, id: &str) -> Result<(), ServiceError> {
        let design: PackingDesign = self.load(claims, id)?;
        if design.tracking_step != STEP_RECEIVED {
            return Err(step_error(&design, "delete"));
        }
        self.remove(Section::PackingDesigns, id, &design.meta.updated_at)?;
        let removed = self.blob.delete_prefix(&design_prefix(id)).map_err(blob_err)?;
        info!(id, files = removed, "packing design deleted");
        Ok(())
    }

    /// Store an artwork or proof file and attach it to the design.
    pub fn upload_design_file(
        &self,
        claims: &Claims,
        id: &str,
        file_name: &str,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<PackingDesign, ServiceError> {
        if data.is_empty() {
            return Err(ServiceError::Validation("file is empty".into()));
        }
        if data.len() > self.config.max_upload_bytes {
            return Err(ServiceError::Validation(format!(
                "file is {} bytes, the limit is {}",
                data.len(),
                self.config.max_upload_bytes
            )));
        }

        let design: PackingDesign = self.load(claims, id)?;
        if design.tracking_step >= STEP_SENT_FOR_PRINT {
            return Err(step_error(&design, "upload files"));
        }

        let name = sanitize_file_name(file_name);
        let key = format!("{}{}-{}", design_prefix(id), new_id(), name);
        self.blob.put(&key, data).map_err(blob_err)?;

        let file = DesignFile {
            key: key.clone(),
            name,
            content_type: content_type
                .filter(|c| !c.is_empty())
                .unwrap_or("application/octet-stream")
                .to_string(),
            size: data.len() as u64,
            uploaded_at: now_rfc3339(),
            uploaded_by: claims.sub.clone(),
        };
        let design = self.attach_design_file(claims, id, file)?;
        info!(id, key = %key, size = data.len(), "design file uploaded");
        Ok(design)
    }

    /// Record an already stored blob on the design. The step is checked
    /// again against the fresh record; on failure the blob is removed.
    pub(crate) fn attach_design_file(
        &self,
        claims: &Claims,
        id: &str,
        file: DesignFile,
    ) -> Result<PackingDesign, ServiceError> {
        let key = file.key.clone();
        let result = self.mutate(claims, id, |d: &mut PackingDesign| {
            if d.tracking_step >= STEP_SENT_FOR_PRINT {
                return Err(step_error(d, "upload files"));
            }
            d.files.push(file);
            Ok(None)
        });
        if result.is_err() {
            if let Err(e) = self.blob.delete(&key) {
                warn!(id, key = %key, error = %e, "failed to remove orphaned design file");
            }
        }
        result
    }

    /// Fetch one attached file. `file` is the last segment of its key.
    pub fn get_design_file(
        &self,
        claims: &Claims,
        id: &str,
        file: &str,
    ) -> Result<(DesignFile, Vec<u8>), ServiceError> {
        let design: PackingDesign = self.load(claims, id)?;
        let key = format!("{}{}", design_prefix(id), file);
        let meta = design
            .files
            .into_iter()
            .find(|f| f.key == key)
            .ok_or_else(|| ServiceError::NotFound(format!("file {}", file)))?;
        let data = self
            .blob
            .get(&meta.key)
            .map_err(blob_err)?
            .ok_or_else(|| ServiceError::NotFound(format!("file {}", file)))?;
        Ok((meta, data))
    }

    /// One step forward. Approving the proof (2→3) belongs to the owner;
    /// every other step to an admin. Reaching "Sent for Printing" starts
    /// post-print tracking.
    pub fn advance_packing_design(
        &self,
        claims: &Claims,
        id: &str,
        input: NoteInput,
    ) -> Result<PackingDesign, ServiceError> {
        let design = self.mutate(claims, id, |d: &mut PackingDesign| {
            if d.tracking_step >= STEP_SENT_FOR_PRINT {
                return Err(step_error(d, "advance"));
            }
            if d.tracking_step == STEP_PROOF_SHARED {
                if claims.sub != d.meta.owner_id {
                    return Err(ServiceError::PermissionDenied(
                        "only the customer can approve the proof".into(),
                    ));
                }
            } else {
                claims.require_admin()?;
            }
            d.tracking_step += 1;
            if d.tracking_step == STEP_SENT_FOR_PRINT {
                d.post_print_step = Some(0);
            }
            if d.tracking_step == STEP_CUSTOMER_APPROVED {
                d.feedback = None;
            }
            Ok(optional(input.note))
        })?;
        info!(id, step = design.tracking_step, "packing design advanced");
        Ok(design)
    }

    /// Send the design back to review with feedback. Admins may do this
    /// during review or after sharing the proof; the owner only once the
    /// proof is shared.
    pub fn request_design_changes(
        &self,
        claims: &Claims,
        id: &str,
        input: FeedbackInput,
    ) -> Result<PackingDesign, ServiceError> {
        let feedback = required("feedback", &input.feedback)?;
        self.mutate(claims, id, |d: &mut PackingDesign| {
            if !matches!(d.tracking_step, STEP_UNDER_REVIEW | STEP_PROOF_SHARED) {
                return Err(step_error(d, "request changes"));
            }
            let allowed = claims.is_admin()
                || (claims.sub == d.meta.owner_id && d.tracking_step == STEP_PROOF_SHARED);
            if !allowed {
                return Err(ServiceError::PermissionDenied(
                    "changes can be requested once the proof is shared".into(),
                ));
            }
            d.tracking_step = STEP_UNDER_REVIEW;
            d.feedback = Some(feedback.clone());
            Ok(Some(feedback))
        })
    }

    pub fn advance_post_print(
        &self,
        claims: &Claims,
        id: &str,
        input: NoteInput,
    ) -> Result<PackingDesign, ServiceError> {
        claims.require_admin()?;
        let last = last_step(POST_PRINT_STAGES);
        self.mutate(claims, id, |d: &mut PackingDesign| match d.post_print_step {
            Some(step) if step < last => {
                d.post_print_step = Some(step + 1);
                Ok(optional(input.note))
            }
            _ => Err(step_error(d, "advance post-print tracking")),
        })
    }
}
