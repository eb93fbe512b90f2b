use std::sync::Arc;

use supplier_core::repositories::{SupplierRepository, UserRepository};
use supplier_core::services::{AuthService, SupplierService};
use supplier_security::{JwtService, PasswordPolicy};
use supplier_shared::config::{IdentitySettings, JwtSettings};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub suppliers: SupplierService,
    pub auth: AuthService,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    pub fn new(
        supplier_repo: Arc<dyn SupplierRepository>,
        user_repo: Arc<dyn UserRepository>,
        jwt_settings: &JwtSettings,
        identity: &IdentitySettings,
    ) -> Self {
        let jwt = Arc::new(JwtService::new(jwt_settings));
        Self {
            suppliers: SupplierService::new(supplier_repo),
            auth: AuthService::new(
                user_repo,
                jwt.clone(),
                PasswordPolicy::from(&identity.password),
                identity.lockout.clone(),
            ),
            jwt,
        }
    }
}
