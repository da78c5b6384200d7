// src/common/i18n.rs

use std::collections::HashMap;

const DEFAULT_LANG: &str = "en";

// Mensagens de erro voltadas ao usuário, por idioma.
// As chaves são as mesmas devolvidas por `AppError::message_key`.
const MESSAGES: &[(&str, &[(&str, &str)])] = &[
    (
        "en",
        &[
            ("error.validation", "One or more fields are invalid."),
            ("error.invalid_date", "Dates must use the YYYY-MM-DD format."),
            ("error.date_range", "The start date must not be after the end date."),
            ("error.invalid_upload", "Only documents and images are allowed (max 20MB)."),
            ("error.storage", "Failed to upload the file."),
            ("error.report_unavailable", "The dashboard could not be generated."),
            ("error.cancelled", "The request was cancelled while the server was shutting down."),
            ("error.internal", "An unexpected error occurred."),
        ],
    ),
    (
        "pt",
        &[
            ("error.validation", "Um ou mais campos são inválidos."),
            ("error.invalid_date", "As datas devem usar o formato AAAA-MM-DD."),
            ("error.date_range", "A data inicial não pode ser posterior à data final."),
            ("error.invalid_upload", "Apenas documentos e imagens são permitidos (máx. 20MB)."),
            ("error.storage", "Falha ao enviar o arquivo."),
            ("error.report_unavailable", "Não foi possível gerar o dashboard."),
            ("error.cancelled", "A requisição foi cancelada durante o desligamento do servidor."),
            ("error.internal", "Ocorreu um erro inesperado."),
        ],
    ),
];

#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let messages = MESSAGES
            .iter()
            .map(|(lang, entries)| (*lang, entries.iter().copied().collect()))
            .collect();
        Self { messages }
    }

    /// Busca a mensagem no idioma pedido, caindo para inglês e, por fim, para a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        [lang, DEFAULT_LANG]
            .iter()
            .filter_map(|l| self.messages.get(l))
            .find_map(|table| table.get(key))
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}
