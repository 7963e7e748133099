//! The public contact form.

use crate::auth::AuthService;
use crate::portal::{Portal, PortalError};
use crate::store::{ContactStatus, NewContactSubmission, ProfileStore, CONTACT_SUBMISSIONS_TABLE};

/// Fields of the contact form as typed by the visitor.
///
/// Blank optional fields are not stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactForm {
    /// Sender name (required).
    pub name: String,
    /// Sender email (required).
    pub email: String,
    /// Sender phone.
    pub phone: String,
    /// Sender company.
    pub company: String,
    /// Service the sender is interested in.
    pub service_interest: String,
    /// Message body (required).
    pub message: String,
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl ContactForm {
    /// Validates the form and builds the submission to store.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::MissingField`] for a blank name, email or
    /// message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use technexus_portal::portal::ContactForm;
    /// use technexus_portal::store::ContactStatus;
    ///
    /// let form = ContactForm {
    ///     name: "Ada Obi".to_string(),
    ///     email: "ada@example.com".to_string(),
    ///     message: "We need a school portal.".to_string(),
    ///     ..ContactForm::default()
    /// };
    /// let submission = form.into_submission().unwrap();
    /// assert_eq!(submission.status, ContactStatus::New);
    /// assert_eq!(submission.phone, None);
    /// ```
    pub fn into_submission(self) -> Result<NewContactSubmission, PortalError> {
        let name = optional(&self.name).ok_or(PortalError::MissingField { field: "name" })?;
        let email = optional(&self.email).ok_or(PortalError::MissingField { field: "email" })?;
        let message =
            optional(&self.message).ok_or(PortalError::MissingField { field: "message" })?;

        Ok(NewContactSubmission {
            name,
            email,
            phone: optional(&self.phone),
            company: optional(&self.company),
            service_interest: optional(&self.service_interest),
            message,
            status: ContactStatus::New,
        })
    }
}

impl<A: AuthService, P: ProfileStore> Portal<A, P> {
    /// Stores a contact form submission with status `new`.
    ///
    /// Works for anonymous visitors; the row is not read back.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::MissingField`] for a blank required field and
    /// [`PortalError::Store`] if the data API call fails.
    pub async fn submit_contact(&self, form: ContactForm) -> Result<(), PortalError> {
        let submission = form.into_submission()?;
        let token = self.session().access_token();
        self.checked(
            self.rest()
                .insert_only(CONTACT_SUBMISSIONS_TABLE, &[&submission], token.as_deref())
                .await,
        )?;
        tracing::debug!(email = %submission.email, "contact submission stored");
        Ok(())
    }
}
