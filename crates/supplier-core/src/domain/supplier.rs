// ============================================================================
// Supplier Core - Supplier Entity
// File: crates/supplier-core/src/domain/supplier.rs
// Description: Supplier (fornecedor) entity and its validated draft
// ============================================================================

use serde::{Deserialize, Serialize};
use supplier_shared::constants::{SUPPLIER_DOCUMENT_MAX_LENGTH, SUPPLIER_NAME_MAX_LENGTH};
use uuid::Uuid;
use validator::Validate;

/// Supplier entity, one row of the `fornecedores` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub document: String,
    pub active: bool,
}

/// Incoming supplier payload, before validation.
///
/// Fields are optional so that a missing `name` or `document` is reported as a
/// field validation failure rather than a malformed body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct SupplierDraft {
    #[serde(default)]
    pub id: Option<Uuid>,

    #[serde(default, alias = "nome")]
    #[validate(
        required(message = "The name field is required."),
        length(min = 1, max = SUPPLIER_NAME_MAX_LENGTH, message = "Name must be between 1 and 200 characters")
    )]
    pub name: Option<String>,

    #[serde(default, alias = "documento")]
    #[validate(
        required(message = "The document field is required."),
        length(min = 1, max = SUPPLIER_DOCUMENT_MAX_LENGTH, message = "Document must be between 1 and 14 characters")
    )]
    pub document: Option<String>,

    #[serde(default, alias = "ativo")]
    pub active: bool,
}

impl SupplierDraft {
    pub fn new(name: impl Into<String>, document: impl Into<String>, active: bool) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            document: Some(document.into()),
            active,
        }
    }

    /// Trims text fields; blank values become absent so `required` rejects them.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            id: self.id,
            name: clean(self.name),
            document: clean(self.document),
            active: self.active,
        }
    }

    /// Normalizes and validates, then builds the entity under `id`.
    pub fn into_supplier(self, id: Uuid) -> Result<Supplier, validator::ValidationErrors> {
        let draft = self.normalized();
        draft.validate()?;

        Ok(Supplier {
            id,
            name: draft.name.unwrap_or_default(),
            document: draft.document.unwrap_or_default(),
            active: draft.active,
        })
    }
}
