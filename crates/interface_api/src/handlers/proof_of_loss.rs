//! Proof of Loss handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::LossEventId;
use domain_proof::ProofOfLossWizard;

use crate::auth::AuthUser;
use crate::dto::proof_of_loss::{
    ClaimPacketResponse, ProofOfLossFormResponse, SubmitProofOfLossRequest,
};
use crate::{error::ApiError, AppState};

/// Submits a completed Proof of Loss for a loss event
///
/// The request carries all three wizard steps at once; the handler
/// walks the wizard through them so the same step rules apply whether
/// the form arrives incrementally from a UI or in one shot here. A
/// resubmission overwrites the stored form.
pub async fn submit_form(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitProofOfLossRequest>,
) -> Result<Json<ClaimPacketResponse>, ApiError> {
    request.validate()?;

    let mut wizard = ProofOfLossWizard::start(LossEventId::from(id));
    wizard.set_insurance_info(
        request.insurer_name,
        request.policy_number,
        request.claim_number,
    );
    wizard.advance()?;
    if let Some(statement) = request.sworn_statement {
        wizard.set_sworn_statement(statement);
    }
    wizard.advance()?;
    wizard.sign(request.signature_data);

    let submission = wizard.submission()?;
    let packet = state.proof_of_loss.submit(user_id, submission).await?;

    Ok(Json(ClaimPacketResponse::from_packet(packet)))
}

/// Gets the caller's stored Proof of Loss form for a loss event
pub async fn get_form(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProofOfLossFormResponse>, ApiError> {
    let form = state
        .proof_of_loss
        .get_form(user_id, LossEventId::from(id))
        .await?;

    Ok(Json(ProofOfLossFormResponse::from_form(form)))
}
