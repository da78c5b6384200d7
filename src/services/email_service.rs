// src/services/email_service.rs

use std::sync::Arc;

use tera::{Context, Tera};

use crate::{
    common::error::AppError,
    models::email::{RejectionEmailPayload, RenderedEmail},
    services::storage_service::StorageService,
};

const REJECTION_TEMPLATE: &str = "delivery-partner/rejected.html";
const REJECTION_SUBJECT: &str = "Delivery Partner Application Status Update";

#[derive(Clone)]
pub struct EmailService {
    templates: Arc<Tera>,
    storage: StorageService,
    frontend_url: String,
    support_email: String,
    logo_key: Option<String>,
}

impl EmailService {
    pub fn new(
        storage: StorageService,
        frontend_url: String,
        support_email: String,
        logo_key: Option<String>,
    ) -> Result<Self, tera::Error> {
        // Templates .html têm autoescape ligado
        let mut templates = Tera::default();
        templates.add_raw_template(
            REJECTION_TEMPLATE,
            include_str!("../../templates/delivery-partner/rejected.html"),
        )?;

        Ok(Self {
            templates: Arc::new(templates),
            storage,
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
            support_email,
            logo_key,
        })
    }

    // Sem logo configurado (ou sem URL) o e-mail sai sem imagem
    async fn company_logo(&self) -> Option<String> {
        let key = self.logo_key.as_deref()?;
        self.storage.presigned_url(key, None).await
    }

    /// Só monta o e-mail; o envio fica com quem chamou.
    pub async fn render_rejection(&self, payload: &RejectionEmailPayload) -> Result<RenderedEmail, AppError> {
        let mut context = Context::new();
        context.insert("name", &payload.name);
        context.insert("reason", &payload.reason);
        context.insert("note", &payload.note);
        context.insert("support_email", &self.support_email);
        context.insert("reapply_link", &format!("{}/partner/apply", self.frontend_url));
        context.insert("logo_url", &self.company_logo().await);

        let html = self.templates.render(REJECTION_TEMPLATE, &context)?;
        tracing::info!(to = %payload.email, "✉️ E-mail de recusa de entregador gerado");

        Ok(RenderedEmail {
            subject: REJECTION_SUBJECT.to_string(),
            html,
        })
    }
}
