//! User domain model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::Cpf;

/// Minimum credential length accepted at registration.
pub const MIN_CREDENTIAL_LEN: usize = 4;

/// A registered user of the system.
///
/// The credential is an opaque secret compared for equality only; hardening
/// authentication is out of scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub cpf: Cpf,
    pub name: String,
    pub credential: String,
    pub registered_at: NaiveDateTime,
}

impl User {
    pub fn new(
        cpf: Cpf,
        name: impl Into<String>,
        credential: impl Into<String>,
        registered_at: NaiveDateTime,
    ) -> Self {
        Self {
            cpf,
            name: name.into(),
            credential: credential.into(),
            registered_at,
        }
    }
}
