//! Business shells created alongside invitations.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use directory_core::config::DirectoryConfig;
use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_core::traits::identity::IdentityGateway;
use directory_core::traits::storage::StorageProvider;
use directory_database::UnitOfWork;
use directory_entity::business::{Business, BusinessStatus, NewBusiness};
use directory_entity::location::Location;

use super::slug::{slugify, suffixed};
use crate::qr::{QR_CONTENT_TYPE, QrRenderer, qr_asset_path};

/// What a business shell is created from.
#[derive(Debug, Clone)]
pub struct ShellRequest {
    /// Business name.
    pub name: String,
    /// City to list the business in.
    pub location: Location,
    /// Contact first name.
    pub contact_first_name: Option<String>,
    /// Contact last name.
    pub contact_last_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
}

/// Side effects outside the database that must be undone if the unit of
/// work they belong to is rolled back.
#[derive(Debug, Default)]
pub struct Compensation {
    qr_path: Option<String>,
    external_invitation_id: Option<String>,
}

impl Compensation {
    /// Remember an uploaded QR asset.
    pub fn uploaded(&mut self, path: String) {
        self.qr_path = Some(path);
    }

    /// Remember a provider invitation.
    pub fn invited(&mut self, external_id: String) {
        self.external_invitation_id = Some(external_id);
    }
}

/// Creates PENDING business shells and their QR codes.
#[derive(Debug, Clone)]
pub struct BusinessProvisioner {
    storage: Arc<dyn StorageProvider>,
    renderer: QrRenderer,
    directory: DirectoryConfig,
}

impl BusinessProvisioner {
    /// Create a provisioner.
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        renderer: QrRenderer,
        directory: DirectoryConfig,
    ) -> Self {
        Self {
            storage,
            renderer,
            directory,
        }
    }

    /// The location used when a request does not name one.
    pub fn default_location(&self) -> AppResult<Location> {
        self.directory.default_location.parse().map_err(|_| {
            AppError::configuration(format!(
                "Unknown default location '{}'",
                self.directory.default_location
            ))
        })
    }

    /// Create a PENDING business with no owner inside `unit`.
    ///
    /// The QR code is uploaded before returning; its path is recorded in
    /// `compensation` so a rollback can remove it.
    pub async fn provision(
        &self,
        unit: &mut dyn UnitOfWork,
        request: &ShellRequest,
        compensation: &mut Compensation,
    ) -> AppResult<Business> {
        if unit
            .business_name_exists(&request.name, request.location)
            .await?
        {
            return Err(AppError::conflict(
                "A business with this name already exists in this location",
            ));
        }

        let slug = self.unique_slug(unit, &request.name).await?;
        let png = self.renderer.render(&self.directory.profile_url(&slug))?;
        let qr_path = qr_asset_path(&slug);
        let now = Utc::now();

        let business = unit
            .insert_business(&NewBusiness {
                name: request.name.clone(),
                slug: slug.clone(),
                description: None,
                category: None,
                contact_first_name: request.contact_first_name.clone(),
                contact_last_name: request.contact_last_name.clone(),
                email: request.email.clone(),
                phone: request.phone.clone(),
                status: BusinessStatus::Pending,
                location_id: request.location,
                user_id: None,
                qr_code_url: Some(self.storage.public_url(&qr_path)),
                qr_code_generated_at: Some(now),
            })
            .await?;

        compensation.uploaded(qr_path.clone());
        self.storage.write(&qr_path, png, QR_CONTENT_TYPE).await?;

        info!(
            business_id = %business.id,
            slug = %business.slug,
            location = %business.location_id,
            "Provisioned business shell"
        );
        Ok(business)
    }

    /// Render and upload the QR code for `slug`, returning its public URL.
    pub async fn publish_qr(&self, slug: &str) -> AppResult<String> {
        let png = self.renderer.render(&self.directory.profile_url(slug))?;
        let path = qr_asset_path(slug);
        self.storage.write(&path, png, QR_CONTENT_TYPE).await?;
        Ok(self.storage.public_url(&path))
    }

    /// Best-effort undo of recorded side effects. Failures are logged.
    pub async fn compensate(&self, compensation: Compensation, gateway: &dyn IdentityGateway) {
        if let Some(path) = compensation.qr_path {
            if let Err(e) = self.storage.delete(&path).await {
                warn!(path = %path, error = %e, "Failed to remove QR code after rollback");
            }
        }
        if let Some(external_id) = compensation.external_invitation_id {
            if let Err(e) = gateway.revoke_invitation(&external_id).await {
                warn!(
                    external_invitation_id = %external_id,
                    error = %e,
                    "Failed to revoke provider invitation after rollback"
                );
            }
        }
    }

    async fn unique_slug(&self, unit: &mut dyn UnitOfWork, name: &str) -> AppResult<String> {
        let base = slugify(name);
        let mut candidate = base.clone();
        while unit.business_slug_exists(&candidate).await? {
            candidate = suffixed(&base);
        }
        Ok(candidate)
    }
}
